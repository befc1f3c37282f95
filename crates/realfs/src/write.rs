use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use realfs_domain::{LockOperation, WriteFlags};

use crate::sys;

/// Writes `data` to `path`, creating it if needed. Returns the number of
/// bytes written.
///
/// With [`WriteFlags::LOCK_EX`] the file is truncated only after the
/// exclusive lock has been acquired, so readers holding a shared lock never
/// observe a half-written file.
pub(crate) fn write_file(path: &Path, data: &[u8], flags: WriteFlags) -> io::Result<usize> {
    let append = flags.contains(WriteFlags::APPEND);
    let lock = flags.contains(WriteFlags::LOCK_EX);

    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(!lock);
    }
    let mut file = options.open(path)?;

    if lock {
        sys::flock(&file, LockOperation::EXCLUSIVE)?;
        if !append {
            file.set_len(0)?;
        }
    }

    file.write_all(data)?;
    Ok(data.len())
}
