#[cfg(test)]
pub mod test {
    use std::fs::{create_dir_all, remove_dir_all};
    use std::path::{Path, PathBuf};

    /// Runs test code that needs access to temporary file storage.
    /// Makes sure the test root directory exists and is empty.
    /// Deletes the directory and its contents after the test unless test fails.
    pub fn with_dir<F>(test_root: &str, test_code: F)
    where
        F: FnOnce(&PathBuf),
    {
        let test_root = PathBuf::from(test_root);
        remove_dir_all(&test_root).ok();
        create_dir_all(&test_root).unwrap();
        (test_code)(&test_root.canonicalize().unwrap());
        remove_dir_all(&test_root).unwrap();
    }

    /// Counts directories below `root`, not including `root` itself.
    pub fn count_dirs(root: &Path) -> usize {
        let mut count = 0;
        for entry in std::fs::read_dir(root).unwrap() {
            let entry = entry.unwrap();
            if entry.file_type().unwrap().is_dir() {
                count += 1 + count_dirs(&entry.path());
            }
        }
        count
    }

    /// Lists regular files below `root`, recursively.
    pub fn list_files(root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(root).unwrap() {
            let entry = entry.unwrap();
            let file_type = entry.file_type().unwrap();
            if file_type.is_dir() {
                files.extend(list_files(&entry.path()));
            } else if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files
    }
}
