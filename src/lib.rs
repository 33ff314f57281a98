pub mod config;
pub mod driver;
pub mod error;
pub mod scheduler;
pub mod spooler;

pub use error::{PrintError, Result};
