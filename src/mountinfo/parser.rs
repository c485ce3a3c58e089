//! Parser for lines printed by `mount(8)`.
//!
//! A line has the shape
//!
//! ```text
//! <source> on <mount point> type <fs type> (<option>,<option>,...)
//! ```
//!
//! where every option is either a bare flag (`rw`) or a `key=value` pair
//! (`workdir=/var/lib/docker/overlay2/<id>/work`).

/// Represents a parsed mount line.
#[derive(Debug, PartialEq, Eq)]
pub struct MountEntry<'a> {
    /// Source of the mount, e.g. `overlay`.
    pub source: Option<&'a str>,
    /// Mount point, e.g. `/`.
    pub mount_point: Option<&'a str>,
    /// Filesystem type, e.g. `overlay`.
    pub fs_type: Option<&'a str>,
    /// Mount options in their original order.
    pub options: Vec<MountOption<'a>>,
}

/// A single mount option.
#[derive(Debug, PartialEq, Eq)]
pub struct MountOption<'a> {
    pub key: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> MountEntry<'a> {
    /// Returns the value of the first `key=value` option with the given key.
    ///
    /// Bare flags never match, since they carry no value.
    pub fn option_value(&self, key: &str) -> Option<&'a str> {
        self.options
            .iter()
            .filter(|opt| opt.key == key)
            .find_map(|opt| opt.value)
    }

    /// Returns the overlay work directory, if present.
    pub fn workdir(&self) -> Option<&'a str> {
        self.option_value("workdir")
    }
}

/// Errors that may occur when parsing a mount line.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("empty mount line")]
    Empty,

    #[error("missing option list `(...)` in line: `{0}`")]
    MissingOptions(String),
}

/// Parses a single line of `mount` output.
///
/// Only the option list is mandatory. The leading `<source> on <mount point> type
/// <fs type>` part is recorded when it has the expected shape and left as `None`
/// otherwise. Unknown options are kept but otherwise ignored.
///
/// # Errors
///
/// - [`ParseError::Empty`] if the line is blank.
/// - [`ParseError::MissingOptions`] if the line has no `(`.
pub fn parse_mount_line(line: &str) -> Result<MountEntry<'_>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (head, opts) = line
        .split_once('(')
        .ok_or_else(|| ParseError::MissingOptions(line.to_owned()))?;
    let opts = opts.trim_end_matches(')');

    let options = opts
        .split(',')
        .filter(|opt| !opt.is_empty())
        .map(|opt| match opt.split_once('=') {
            Some((key, value)) => MountOption {
                key,
                value: Some(value),
            },
            None => MountOption {
                key: opt,
                value: None,
            },
        })
        .collect();

    let (source, target) = match head.trim().split_once(" on ") {
        Some((source, target)) => (Some(source), Some(target)),
        None => (None, None),
    };
    let (mount_point, fs_type) = match target.and_then(|target| target.rsplit_once(" type ")) {
        Some((mount_point, fs_type)) => (Some(mount_point), Some(fs_type)),
        None => (target, None),
    };

    Ok(MountEntry {
        source,
        mount_point,
        fs_type,
        options,
    })
}
