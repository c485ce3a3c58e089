//! Environment detection module.
//!
//! Determines whether the program is running on the host or inside a container.
mod checks;
mod detect;
mod error;

pub use checks::{marker_file_exists, sched_indicates_container};
pub use detect::{ContainmentDetector, RuntimeEnvironment};
pub use error::{Error, Result};
