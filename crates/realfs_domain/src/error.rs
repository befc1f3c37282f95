use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure reported by the platform while a filesystem call was in progress.
///
/// Carries the message and raw OS code of the underlying failure together
/// with the filename that was in scope when the call was made.
#[derive(Debug)]
pub struct FsError {
    message: String,
    code: Option<i32>,
    filename: Option<PathBuf>,
    source: Option<io::Error>,
}

impl FsError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None, filename: None, source: None }
    }

    /// Wraps an I/O failure, taking its message and raw OS code.
    pub fn from_io(error: io::Error, filename: Option<PathBuf>) -> Self {
        Self {
            message: error.to_string(),
            code: error.raw_os_error(),
            filename,
            source: Some(error),
        }
    }

    pub fn code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn raw_code(&self) -> Option<i32> {
        self.code
    }

    /// The filename that was in scope when the failure happened.
    pub fn target_filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(filename) => write!(f, "{}: {}", filename.display(), self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A value handed to a constructor is of the wrong kind.
    #[error("{name} is not valid: {reason}")]
    NotValid { name: String, reason: String },

    #[error(transparent)]
    Fs(#[from] FsError),
}

impl Error {
    pub fn not_valid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::NotValid { name: name.into(), reason: reason.into() }
    }

    /// Returns the platform failure, if this is one.
    pub fn as_fs(&self) -> Option<&FsError> {
        match self {
            Error::Fs(e) => Some(e),
            Error::NotValid { .. } => None,
        }
    }

    pub fn target_filename(&self) -> Option<&Path> {
        self.as_fs().and_then(FsError::target_filename)
    }
}

pub type Result<A> = std::result::Result<A, Error>;

#[cfg(test)]
mod test {
    use std::error::Error as _;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_io_keeps_code_and_filename() {
        let io = io::Error::from_raw_os_error(2);
        let error = FsError::from_io(io, Some(PathBuf::from("/tmp/missing")));

        assert_eq!(error.raw_code(), Some(2));
        assert_eq!(error.target_filename(), Some(Path::new("/tmp/missing")));
        assert!(error.source().is_some());
        assert!(error.to_string().starts_with("/tmp/missing: "));
    }

    #[test]
    fn test_display_without_filename() {
        let error = FsError::new("stream is closed").code(9);
        assert_eq!(error.to_string(), "stream is closed");
        assert_eq!(error.raw_code(), Some(9));
        assert!(error.source().is_none());
    }

    #[test]
    fn test_not_valid_has_no_filename() {
        let error = Error::not_valid("File handle", "require stream resource, directory given");
        assert_eq!(
            error.to_string(),
            "File handle is not valid: require stream resource, directory given"
        );
        assert!(error.as_fs().is_none());
        assert_eq!(error.target_filename(), None);
    }

    #[test]
    fn test_fs_variant_exposes_filename() {
        let error: Error = FsError::new("boom").filename("a.txt").into();
        assert_eq!(error.target_filename(), Some(Path::new("a.txt")));
    }
}
