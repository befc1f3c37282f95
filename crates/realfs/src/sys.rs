use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;
use std::path::Path;

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::sys::stat::{self, Mode};
use nix::sys::statvfs::statvfs;
use nix::sys::time::{TimeVal, TimeValLike};
use nix::unistd::{self, AccessFlags, Group, User};
use realfs_domain::{LockKind, LockOperation, LockStatus, Principal};

pub(crate) fn flock(file: &File, operation: LockOperation) -> io::Result<LockStatus> {
    let mut bits = match operation.kind {
        LockKind::Shared => libc::LOCK_SH,
        LockKind::Exclusive => libc::LOCK_EX,
        LockKind::Unlock => libc::LOCK_UN,
    };
    if operation.non_blocking {
        bits |= libc::LOCK_NB;
    }

    // SAFETY: the descriptor is owned by `file`, which outlives the call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), bits) };
    if rc == 0 {
        return Ok(LockStatus { acquired: true, would_block: false });
    }

    let error = io::Error::last_os_error();
    if error.kind() == io::ErrorKind::WouldBlock {
        Ok(LockStatus { acquired: false, would_block: true })
    } else {
        Err(error)
    }
}

pub(crate) fn is_blocking(file: &File) -> io::Result<bool> {
    let flags = OFlag::from_bits_truncate(fcntl(file, FcntlArg::F_GETFL)?);
    Ok(!flags.contains(OFlag::O_NONBLOCK))
}

pub(crate) fn access(path: &Path, flags: AccessFlags) -> bool {
    unistd::access(path, flags).is_ok()
}

/// Sets the process umask and returns the previous one.
pub(crate) fn umask(mask: u32) -> u32 {
    let previous = stat::umask(Mode::from_bits_truncate(mask as libc::mode_t));
    previous.bits() as u32
}

pub(crate) fn utimes(path: &Path, access_time: i64, modification_time: i64) -> io::Result<()> {
    stat::utimes(
        path,
        &TimeVal::seconds(access_time),
        &TimeVal::seconds(modification_time),
    )?;
    Ok(())
}

pub(crate) struct Space {
    pub free: u64,
    pub total: u64,
}

pub(crate) fn space(path: &Path) -> io::Result<Space> {
    let vfs = statvfs(path)?;
    let fragment = vfs.fragment_size() as u64;
    Ok(Space {
        free: vfs.blocks_available() as u64 * fragment,
        total: vfs.blocks() as u64 * fragment,
    })
}

pub(crate) fn uid(owner: &Principal) -> io::Result<u32> {
    match owner {
        Principal::Id(id) => Ok(*id),
        Principal::Name(name) => User::from_name(name)?
            .map(|user| user.uid.as_raw())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("Unable to find uid for {name}"))
            }),
    }
}

pub(crate) fn gid(group: &Principal) -> io::Result<u32> {
    match group {
        Principal::Id(id) => Ok(*id),
        Principal::Name(name) => Group::from_name(name)?
            .map(|group| group.gid.as_raw())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("Unable to find gid for {name}"))
            }),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_flock_conflict_reports_would_block() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let first = File::open(file.path()).unwrap();
        let second = File::open(file.path()).unwrap();

        let status = flock(&first, LockOperation::EXCLUSIVE.nb()).unwrap();
        assert_eq!(status, LockStatus { acquired: true, would_block: false });

        let status = flock(&second, LockOperation::SHARED.nb()).unwrap();
        assert_eq!(status, LockStatus { acquired: false, would_block: true });

        flock(&first, LockOperation::UNLOCK).unwrap();
        let status = flock(&second, LockOperation::SHARED.nb()).unwrap();
        assert!(status.acquired);
    }

    #[test]
    fn test_files_block_by_default() {
        let file = tempfile::tempfile().unwrap();
        assert!(is_blocking(&file).unwrap());
    }

    #[test]
    fn test_numeric_principals_pass_through() {
        assert_eq!(uid(&Principal::Id(1234)).unwrap(), 1234);
        assert_eq!(gid(&Principal::Id(99)).unwrap(), 99);
    }

    #[test]
    fn test_unknown_user_name() {
        let error = uid(&Principal::Name("no-such-user-realfs".to_string())).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_root_user_resolves() {
        assert_eq!(uid(&Principal::Name("root".to_string())).unwrap(), 0);
    }
}
