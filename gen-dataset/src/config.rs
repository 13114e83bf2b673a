//! Main program configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use console::Term;

use crate::file::FileLen;
use crate::tree::dir_count;

/// Settings of a single generator run, after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Number of directory levels below the root
    pub depth: usize,
    /// Number of subdirectories in each directory
    pub branches: usize,
    /// Number of files to create
    pub count: usize,
    /// Size of each file, 0 creates empty files
    pub file_size: FileLen,
    /// Maximum amount of data passed to a single write call
    pub buffer_size: usize,
    /// Upper bound of the random pause after each file
    pub max_wait: Duration,
    /// Number of worker threads creating files
    pub threads: usize,
    /// Whether to draw the progress bar on the standard output
    pub progress: bool,
}

impl DatasetConfig {
    pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

    /// Number of directories in the tree, excluding the root.
    pub fn dir_count(&self) -> u64 {
        dir_count(self.depth, self.branches)
    }

    /// Amount of data in all files together.
    pub fn total_size(&self) -> FileLen {
        self.file_size * self.count as u64
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            depth: 0,
            branches: 0,
            count: 0,
            file_size: FileLen(0),
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
            max_wait: Duration::ZERO,
            threads: 1,
            progress: false,
        }
    }
}

fn parse_file_len(s: &str) -> Result<FileLen, String> {
    FileLen::from_str(s).map_err(|e| format!("Invalid size {s}: {e}"))
}

const fn after_help() -> &'static str {
    "The tree is created in DIR, or in the current working directory if DIR is not given.\n\
     Files are placed in directories at random, with deeper levels receiving more files,\n\
     proportionally to the number of directories they contain."
}

/// Generates a synthetic tree of directories and files for file system benchmarks
#[derive(clap::Parser, Debug)]
#[command(about, version, after_help = after_help(), max_term_width = 100)]
pub struct Config {
    /// Number of directory levels to create below the root
    #[arg(short = 'd', long, value_name = "NUMBER")]
    pub depth: usize,

    /// Number of subdirectories in each directory
    #[arg(short = 'b', long, value_name = "NUMBER")]
    pub branches: usize,

    /// Number of files to create
    #[arg(short = 'c', long, value_name = "NUMBER")]
    pub count: usize,

    /// Size of each file.
    ///
    /// Accepts units like kB, MB, GB (powers of 1000) or KiB, MiB, GiB (powers of 1024).
    #[arg(short = 's', long, value_name = "SIZE", default_value = "0",
          value_parser = parse_file_len)]
    pub size: FileLen,

    /// Maximum amount of data written with a single write call
    #[arg(long, value_name = "SIZE", default_value = "1MiB", value_parser = parse_file_len)]
    pub buffer_size: FileLen,

    /// Pause for a random time of up to given milliseconds after creating each file
    #[arg(short = 'w', long, value_name = "MILLIS", default_value_t = 0)]
    pub max_wait: u64,

    /// Number of threads creating files [default: number of CPUs]
    #[arg(short = 't', long, value_name = "NUMBER")]
    pub threads: Option<usize>,

    /// Don't ask for confirmation before creating the files
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Don't print informational messages and the progress bar
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Override progress reporting, by default (=auto) only report when stdout is a terminal.
    /// Possible values: true, false, auto.
    #[arg(long, value_name = "VAL", require_equals = true,
          value_parser(["auto", "true", "false"]), default_value = "auto",
          hide_possible_values = true, hide_default_value = true)]
    pub progress: String,

    /// Directory to create the tree in; created if it doesn't exist
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == Some(0) {
            return Err("The number of threads must be at least 1".to_owned());
        }
        if self.buffer_size.0 == 0 {
            return Err("The buffer size must be at least 1 byte".to_owned());
        }
        if self.buffer_size.0 > usize::MAX as u64 {
            return Err(format!("The buffer size {} is too large", self.buffer_size));
        }
        Ok(())
    }

    fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    fn show_progress(&self) -> bool {
        match self.progress.as_str() {
            "true" => true,
            "false" => false,
            _ => !self.quiet && Term::stdout().is_term(),
        }
    }

    /// Returns the settings of the generator.
    /// Call [`Config::validate`] first.
    pub fn dataset(&self) -> DatasetConfig {
        DatasetConfig {
            depth: self.depth,
            branches: self.branches,
            count: self.count,
            file_size: self.size,
            buffer_size: self.buffer_size.0 as usize,
            max_wait: Duration::from_millis(self.max_wait),
            threads: self.thread_count(),
            progress: self.show_progress(),
        }
    }
}
