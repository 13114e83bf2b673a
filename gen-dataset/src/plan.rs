//! Planning where the generated files go.

use std::path::PathBuf;

use rand::Rng;
use rand_distr::Distribution;

use crate::distribution::DepthDistribution;
use crate::tree::DirLabels;

/// Extension of every generated file.
pub const FILE_EXT: &str = "dat";

/// Returns the name of the file with given sequential number.
/// Names are unique within a single run.
pub fn file_name(index: usize) -> String {
    format!("file_{index}.{FILE_EXT}")
}

/// Generates `count` relative file paths, each pointing into a directory of the tree
/// built from the same `labels` and a depth not exceeding `depth_distribution.len()`.
///
/// For each file, the depth is drawn from `depth_distribution`, and then the directory
/// at that depth is chosen by picking a random branch at every level.
/// When there are no branches, all files are placed in the root.
pub fn plan_files<R: Rng + ?Sized>(
    count: usize,
    labels: &DirLabels,
    depth_distribution: &DepthDistribution,
    rng: &mut R,
) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(count);
    for i in 0..count {
        let depth = if labels.is_empty() {
            0
        } else {
            depth_distribution.sample(rng)
        };
        let mut path = PathBuf::new();
        for _ in 0..depth {
            path.push(&labels[rng.gen_range(0..labels.len())]);
        }
        path.push(file_name(i));
        paths.push(path);
    }
    paths
}
