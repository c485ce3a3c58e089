use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Error that occurs when opening a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to open file `{path}`: {source}")]
pub struct FileOpenError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Error that occurs when opening or reading a file fails.
#[derive(Debug, thiserror::Error)]
pub enum FileReadError {
    #[error(transparent)]
    Open(#[from] FileOpenError),
    #[error("failed to read file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Opens a file at the given path and wraps it in a [`BufReader`].
///
/// # Errors
///
/// Returns a [`FileOpenError`] if the file cannot be opened.
///
/// # Example
/// ```no_run
/// # use docker_image_hook::fsutil;
/// let reader = fsutil::open_file_reader("/some/file.txt")?;
/// # Ok::<(), fsutil::FileOpenError>(())
/// ```
pub fn open_file_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, FileOpenError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileOpenError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Like [`open_file_reader`], but a missing file yields `Ok(None)`.
///
/// # Errors
///
/// Returns a [`FileOpenError`] for every failure other than [`io::ErrorKind::NotFound`].
pub fn open_file_reader_if_exists(
    path: impl AsRef<Path>,
) -> Result<Option<BufReader<File>>, FileOpenError> {
    match open_file_reader(path) {
        Ok(reader) => Ok(Some(reader)),
        Err(err) if err.source.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Reads the first line of a file as raw bytes, including the trailing newline if any.
///
/// The file is closed before returning. A missing file yields `Ok(None)`.
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file exists but cannot be opened or read.
pub fn read_first_line(path: impl AsRef<Path>) -> Result<Option<Vec<u8>>, FileReadError> {
    let path = path.as_ref();
    let Some(mut reader) = open_file_reader_if_exists(path)? else {
        return Ok(None);
    };

    let mut line = Vec::with_capacity(128);
    reader
        .read_until(b'\n', &mut line)
        .map_err(|source| FileReadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(line))
}

/// Reads the whole file into a string. A missing file yields `Ok(None)`.
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file exists but cannot be opened or read,
/// including when its content is not valid UTF-8.
pub fn read_to_string_if_exists(path: impl AsRef<Path>) -> Result<Option<String>, FileReadError> {
    let path = path.as_ref();
    let Some(mut reader) = open_file_reader_if_exists(path)? else {
        return Ok(None);
    };

    let mut content = String::with_capacity(512);
    reader
        .read_to_string(&mut content)
        .map_err(|source| FileReadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(content))
}
