use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use realfs_domain::{
    Error, FsFile, LockOperation, LockStatus, MetaData, Result, Stat, Whence,
};

use crate::catcher::ErrorCatcher;
use crate::sys;

/// An open file owned exclusively by this handle.
///
/// Reads and writes go straight to the descriptor; nothing is buffered here.
#[derive(Debug)]
pub struct RealFile {
    file: Option<File>,
    filename: Option<PathBuf>,
    mode: String,
    eof: bool,
}

struct Stream<'a> {
    file: &'a mut File,
    eof: &'a mut bool,
}

impl RealFile {
    /// Wraps an open file. Anything that is not a stream (a directory, or a
    /// descriptor that cannot be inspected) is rejected.
    pub fn new(file: File, filename: Option<PathBuf>, mode: impl Into<String>) -> Result<Self> {
        let metadata = file.metadata().map_err(|e| {
            Error::not_valid("File handle", format!("require stream resource, {e}"))
        })?;
        if metadata.is_dir() {
            return Err(Error::not_valid(
                "File handle",
                "require stream resource, directory given",
            ));
        }
        Ok(Self { file: Some(file), filename, mode: mode.into(), eof: false })
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    fn call<T>(&mut self, op: impl FnOnce(Stream<'_>) -> io::Result<T>) -> Result<T> {
        let Self { file, filename, eof, .. } = self;
        ErrorCatcher::catch(filename.as_deref(), || match file.as_mut() {
            Some(file) => op(Stream { file, eof }),
            None => Err(closed()),
        })
    }
}

fn closed() -> io::Error {
    io::Error::from_raw_os_error(libc::EBADF)
}

impl Stream<'_> {
    /// Fills up to `length` bytes, raising the EOF flag on a zero-length read.
    fn read_up_to(&mut self, length: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0; length];
        let mut filled = 0;
        while filled < length {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => {
                    *self.eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }
}

impl FsFile for RealFile {
    fn close(&mut self) -> Result<()> {
        self.call(|_| Ok(()))?;
        self.file = None;
        Ok(())
    }

    fn is_eof(&mut self) -> Result<bool> {
        self.call(|stream| Ok(*stream.eof))
    }

    fn flush(&mut self) -> Result<()> {
        self.call(|stream| stream.file.flush())
    }

    fn write(&mut self, data: &[u8], length: Option<usize>) -> Result<usize> {
        // A zero length means "no limit", as with an absent one.
        let data = match length.filter(|&length| length > 0) {
            Some(length) => &data[..length.min(data.len())],
            None => data,
        };
        self.call(|stream| {
            stream.file.write_all(data)?;
            Ok(data.len())
        })
    }

    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        self.call(|mut stream| stream.read_up_to(length))
    }

    fn get_char(&mut self) -> Result<Option<u8>> {
        self.call(|mut stream| Ok(stream.read_up_to(1)?.first().copied()))
    }

    fn get_line(&mut self, length: Option<usize>) -> Result<Option<Vec<u8>>> {
        let limit = length.filter(|&length| length > 0).map(|length| length - 1);
        self.call(|mut stream| {
            // Room for the terminator only, so nothing can be read.
            if limit == Some(0) {
                return Ok(None);
            }
            let mut line = Vec::new();
            while limit != Some(line.len()) {
                match stream.read_up_to(1)?.first() {
                    Some(&byte) => {
                        line.push(byte);
                        if byte == b'\n' {
                            break;
                        }
                    }
                    None if line.is_empty() => return Ok(None),
                    None => break,
                }
            }
            Ok(Some(line))
        })
    }

    fn lock(&mut self, operation: LockOperation) -> Result<LockStatus> {
        self.call(|stream| sys::flock(stream.file, operation))
    }

    fn get_stat(&mut self) -> Result<Stat> {
        self.call(|stream| Ok(Stat::from(&stream.file.metadata()?)))
    }

    fn set_position(&mut self, offset: i64, whence: Whence) -> Result<()> {
        self.call(|stream| {
            let position = match whence {
                Whence::Set => SeekFrom::Start(
                    u64::try_from(offset)
                        .map_err(|_| io::Error::from_raw_os_error(libc::EINVAL))?,
                ),
                Whence::Current => SeekFrom::Current(offset),
                Whence::End => SeekFrom::End(offset),
            };
            stream.file.seek(position)?;
            *stream.eof = false;
            Ok(())
        })
    }

    fn get_position(&mut self) -> Result<u64> {
        self.call(|stream| stream.file.stream_position())
    }

    fn rewind_position(&mut self) -> Result<()> {
        self.call(|stream| {
            stream.file.rewind()?;
            *stream.eof = false;
            Ok(())
        })
    }

    fn truncate(&mut self, size: Option<u64>) -> Result<()> {
        self.call(|stream| stream.file.set_len(size.unwrap_or(0)))
    }

    fn get_meta_data(&mut self) -> Result<MetaData> {
        let filename = self
            .filename
            .as_ref()
            .map(|filename| filename.to_string_lossy().into_owned());
        let mode = self.mode.clone();
        self.call(|stream| {
            Ok(MetaData {
                filename,
                mode,
                eof: *stream.eof,
                blocked: sys::is_blocking(stream.file)?,
                seekable: stream.file.stream_position().is_ok(),
                stream_type: "STDIO".to_string(),
                wrapper_type: "plainfile".to_string(),
            })
        })
    }
}
