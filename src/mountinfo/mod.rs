//! Overlay mount inspection.
//!
//! Inside a container the root filesystem is the only overlay mount, and its
//! `workdir` option identifies the container's storage on the host.
mod detect;
mod error;
mod parser;

pub use detect::{extract_overlay_workdir, try_extract_overlay_workdir};
pub use error::{Error, Result};
pub use parser::{MountEntry, MountOption, ParseError, parse_mount_line};
