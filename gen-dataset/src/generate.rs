//! Generating the whole data set: directories first, then files.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::DatasetConfig;
use crate::distribution::DepthDistribution;
use crate::error::Error;
use crate::file::{create_file, FileLen, ZeroBuffer};
use crate::log::{Log, LogExt};
use crate::plan::plan_files;
use crate::pool::{Pacing, WorkerPool};
use crate::progress::{DrawTarget, ProgressReporter, ProgressState};
use crate::tree::{build_tree, DirLabels};

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateStats {
    /// Directories that didn't exist before the run
    pub dirs_created: u64,
    pub files_created: u64,
    pub bytes_written: FileLen,
    pub elapsed: Duration,
}

/// Seed of the random generator used for placing files.
/// Different on every run, layouts are not meant to be reproducible.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Creates the directory tree and the files described by `config` under `root`.
///
/// The directories are created first, on the calling thread.
/// Then the location of every file is planned up-front, and finally the files are
/// written by `config.threads` workers while the progress is reported on the standard
/// output (if enabled).
///
/// Stops at the first error, which names the path that could not be created.
/// Files and directories created before the error are left in place.
pub fn generate(
    config: &DatasetConfig,
    root: &Path,
    log: &dyn Log,
) -> Result<GenerateStats, Error> {
    let start = Instant::now();

    let labels = DirLabels::new(config.branches);
    if config.depth > 0 && labels.is_empty() {
        log.warn("No branches per directory, all files go to the root directory");
    }
    log.info(format!(
        "Creating {} directories in {}",
        config.dir_count(),
        root.display()
    ));
    let dirs_created = build_tree(config.depth, &labels, root)?;

    let distribution = DepthDistribution::new(config.depth, config.branches);
    let mut rng = StdRng::seed_from_u64(clock_seed());
    let paths = plan_files(config.count, &labels, &distribution, &mut rng);

    let buffer = ZeroBuffer::new(config.file_size, config.buffer_size);
    let pool = WorkerPool::new(config.threads);
    let pacing = Pacing::new(config.max_wait);
    log.info(format!(
        "Creating {} files of size {} ({} in total) with {} threads",
        paths.len(),
        config.file_size,
        config.total_size(),
        pool.threads()
    ));

    let state = Arc::new(ProgressState::new());
    let target = if config.progress {
        DrawTarget::stdout()
    } else {
        DrawTarget::Hidden
    };
    let reporter = ProgressReporter::start(state.clone(), paths.len() as u64, target);
    let result = pool.run(&paths, |path| {
        create_file(&root.join(path), &buffer, config.file_size)?;
        state.inc(1);
        pacing.pause();
        Ok(())
    });
    reporter.finish();
    result?;

    let files_created = state.completed();
    let stats = GenerateStats {
        dirs_created,
        files_created,
        bytes_written: config.file_size * files_created,
        elapsed: start.elapsed(),
    };
    log.info(format!(
        "Created {} directories and {} files ({}) in {:.3} s",
        stats.dirs_created,
        stats.files_created,
        stats.bytes_written,
        stats.elapsed.as_secs_f64()
    ));
    Ok(stats)
}
