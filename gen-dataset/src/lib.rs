pub mod config;
pub mod distribution;
pub mod file;
pub mod log;
pub mod plan;
pub mod pool;
pub mod progress;
pub mod tree;

mod error;
mod generate;
mod util;

pub use config::{Config, DatasetConfig};
pub use error::Error;
pub use file::FileLen;
pub use generate::{generate, GenerateStats};
