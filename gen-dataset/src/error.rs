use std::fmt::{Display, Formatter};
use std::path::Path;
use std::{fmt, io};

/// Error reported by top-level gen-dataset functions
#[derive(Debug)]
pub struct Error {
    pub message: String,
}

impl Error {
    pub fn new(msg: String) -> Error {
        Error { message: msg }
    }

    /// Describes a failed file system operation on the given path.
    /// The message contains the action, the path and the OS error text,
    /// e.g. `Failed to create directory 0/1: Permission denied (os error 13)`.
    pub fn io(action: &str, path: &Path, cause: io::Error) -> Error {
        Error::new(format!("{} {}: {}", action, path.display(), cause))
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s.to_owned())
    }
}
