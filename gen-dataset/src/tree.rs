//! Construction of the directory hierarchy.

use std::fs;
use std::io::ErrorKind;
use std::ops::Index;
use std::path::Path;

use crate::error::Error;

/// Names of the subdirectories created in every directory of the tree.
/// The name of the subdirectory at branch `i` is the decimal representation of `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirLabels(Vec<String>);

impl DirLabels {
    pub fn new(branches: usize) -> DirLabels {
        DirLabels((0..branches).map(|i| i.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }
}

impl Index<usize> for DirLabels {
    type Output = str;

    fn index(&self, branch: usize) -> &str {
        &self.0[branch]
    }
}

/// Returns the number of directories in a full tree of given depth and branching factor,
/// not counting the root: `branches + branches^2 + ... + branches^depth`.
/// Saturates at `u64::MAX`.
pub fn dir_count(depth: usize, branches: usize) -> u64 {
    match branches {
        0 => 0,
        1 => depth as u64,
        _ => {
            let mut total: u64 = 0;
            let mut level: u64 = 1;
            for _ in 0..depth {
                level = level.saturating_mul(branches as u64);
                total = total.saturating_add(level);
                if total == u64::MAX {
                    break;
                }
            }
            total
        }
    }
}

/// Recursively creates a tree of directories of the given `depth` under `root`.
/// Every directory gets one subdirectory per label.
///
/// Directories that already exist are left untouched, so running this twice against
/// the same root is harmless. Any other failure stops the build and is reported with
/// the path of the directory that couldn't be created.
///
/// Returns the number of directories that were actually created.
pub fn build_tree(depth: usize, labels: &DirLabels, root: &Path) -> Result<u64, Error> {
    if depth == 0 {
        return Ok(0);
    }
    let mut created = 0;
    for label in labels.iter() {
        let dir = root.join(label);
        if create_dir(&dir)? {
            created += 1;
        }
        created += build_tree(depth - 1, labels, &dir)?;
    }
    Ok(created)
}

/// Returns true if the directory was created, false if it already existed.
fn create_dir(dir: &Path) -> Result<bool, Error> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(false),
        Err(e) => Err(Error::io("Failed to create directory", dir, e)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::test::{count_dirs, with_dir};

    #[test]
    fn labels() {
        let labels = DirLabels::new(3);
        assert_eq!(labels.len(), 3);
        assert_eq!(&labels[0], "0");
        assert_eq!(&labels[2], "2");
        assert!(DirLabels::new(0).is_empty());
    }

    #[test]
    fn count_of_dirs() {
        assert_eq!(dir_count(0, 0), 0);
        assert_eq!(dir_count(0, 5), 0);
        assert_eq!(dir_count(3, 0), 0);
        assert_eq!(dir_count(3, 1), 3);
        assert_eq!(dir_count(2, 2), 6);
        assert_eq!(dir_count(3, 3), 39);
        assert_eq!(dir_count(100, 1000), u64::MAX);
    }

    #[test]
    fn count_of_dirs_in_huge_trees() {
        assert_eq!(dir_count(usize::MAX, 0), 0);
        assert_eq!(dir_count(usize::MAX, 1), usize::MAX as u64);
        assert_eq!(dir_count(usize::MAX, 2), u64::MAX);
    }

    #[test]
    fn build_full_tree() {
        with_dir("target/test/tree/full", |root| {
            for (depth, branches) in [(1, 1), (1, 4), (2, 2), (3, 3), (4, 1)] {
                let dir = root.join(format!("d{depth}_b{branches}"));
                fs::create_dir(&dir).unwrap();
                let created = build_tree(depth, &DirLabels::new(branches), &dir).unwrap();
                let expected = dir_count(depth, branches);
                assert_eq!(created, expected);
                assert_eq!(count_dirs(&dir) as u64, expected);
            }
        });
    }

    #[test]
    fn build_tree_is_idempotent() {
        with_dir("target/test/tree/idempotent", |root| {
            let labels = DirLabels::new(3);
            assert_eq!(build_tree(2, &labels, root).unwrap(), 12);
            assert_eq!(build_tree(2, &labels, root).unwrap(), 0);
            assert_eq!(count_dirs(root), 12);
        });
    }

    #[test]
    fn build_tree_completes_partial_tree() {
        with_dir("target/test/tree/partial", |root| {
            fs::create_dir_all(root.join("1").join("0")).unwrap();
            let created = build_tree(2, &DirLabels::new(2), root).unwrap();
            assert_eq!(created, 4);
            assert_eq!(count_dirs(root), 6);
        });
    }

    #[test]
    fn build_tree_with_zero_depth_does_nothing() {
        with_dir("target/test/tree/zero_depth", |root| {
            assert_eq!(build_tree(0, &DirLabels::new(4), root).unwrap(), 0);
            assert_eq!(count_dirs(root), 0);
        });
    }

    #[test]
    fn build_tree_reports_file_in_the_way() {
        with_dir("target/test/tree/file_in_the_way", |root| {
            fs::write(root.join("1"), b"").unwrap();
            let err = build_tree(1, &DirLabels::new(2), root).unwrap_err();
            assert!(err.message.starts_with("Failed to create directory"));
            assert!(err.message.contains(&root.join("1").display().to_string()));
        });
    }
}
