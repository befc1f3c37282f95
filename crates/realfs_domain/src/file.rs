use crate::{LockOperation, LockStatus, MetaData, Result, Stat, Whence};

/// An open stream on a filesystem object.
///
/// Every method maps onto one platform call on the underlying descriptor.
/// Once [`FsFile::close`] has been called, all further calls fail with an
/// error carrying the handle's filename.
pub trait FsFile {
    fn close(&mut self) -> Result<()>;

    /// Returns `true` once a read has reached the end of the stream.
    fn is_eof(&mut self) -> Result<bool>;

    fn flush(&mut self) -> Result<()>;

    /// Writes `data`, or only its first `length` bytes when given.
    /// Returns the number of bytes written.
    fn write(&mut self, data: &[u8], length: Option<usize>) -> Result<usize>;

    /// Reads up to `length` bytes. An empty result means end of stream.
    fn read(&mut self, length: usize) -> Result<Vec<u8>>;

    /// Reads one byte; `None` at end of stream.
    fn get_char(&mut self) -> Result<Option<u8>>;

    /// Reads one line including its newline, at most `length - 1` bytes when
    /// a length is given; `None` at end of stream.
    fn get_line(&mut self, length: Option<usize>) -> Result<Option<Vec<u8>>>;

    fn lock(&mut self, operation: LockOperation) -> Result<LockStatus>;

    fn get_stat(&mut self) -> Result<Stat>;

    fn set_position(&mut self, offset: i64, whence: Whence) -> Result<()>;

    fn get_position(&mut self) -> Result<u64>;

    fn rewind_position(&mut self) -> Result<()>;

    /// Resizes the file to `size` bytes, or empties it when `size` is absent.
    fn truncate(&mut self, size: Option<u64>) -> Result<()>;

    fn get_meta_data(&mut self) -> Result<MetaData>;
}
