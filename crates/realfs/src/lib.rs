//! # RealFS
//!
//! The [`Fs`] facade backed by the host filesystem.
//!
//! Every method forwards to exactly one platform primitive. The call runs
//! inside an [`ErrorCatcher`] context, so any failure comes back as an
//! [`FsError`](realfs_domain::FsError) carrying the path that was being
//! worked on, the OS error code and the underlying `io::Error` as its source.

mod catcher;
mod open_mode;
mod pattern;
mod read;
mod real_file;
mod sys;
mod write;

use std::fs::{self, DirBuilder, OpenOptions, Permissions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub use catcher::{CatchGuard, CatcherState, ErrorCatcher};
use nix::unistd::AccessFlags;
pub use real_file::RealFile;
use realfs_domain::{
    FileType, Fs, GlobFlags, LineFlags, Principal, Result, Stat, WriteFlags,
};
use tracing::trace;

#[derive(Clone, Copy, Debug, Default)]
pub struct RealFS;

impl RealFS {
    pub fn new() -> Self {
        Self
    }

    fn metadata(filename: &Path) -> Result<fs::Metadata> {
        ErrorCatcher::catch(Some(filename), || fs::metadata(filename))
    }
}

impl Fs for RealFS {
    type File = RealFile;

    fn open(&self, filename: &Path, mode: &str) -> Result<RealFile> {
        let file = ErrorCatcher::catch(Some(filename), || {
            let file = open_mode::open_options(mode)?.open(filename)?;
            if file.metadata()?.is_dir() {
                return Err(io::Error::from_raw_os_error(libc::EISDIR));
            }
            Ok(file)
        })?;
        RealFile::new(file, Some(filename.to_path_buf()), mode)
    }

    fn is_exists(&self, filename: &Path) -> bool {
        filename.exists()
    }

    fn is_file(&self, filename: &Path) -> bool {
        filename.is_file()
    }

    fn is_dir(&self, filename: &Path) -> bool {
        filename.is_dir()
    }

    fn is_link(&self, filename: &Path) -> bool {
        filename.is_symlink()
    }

    fn is_executable(&self, filename: &Path) -> bool {
        sys::access(filename, AccessFlags::X_OK)
    }

    fn is_writable(&self, filename: &Path) -> bool {
        sys::access(filename, AccessFlags::W_OK)
    }

    fn is_readable(&self, filename: &Path) -> bool {
        sys::access(filename, AccessFlags::R_OK)
    }

    fn write(&self, filename: &Path, data: &[u8], flags: WriteFlags) -> Result<usize> {
        ErrorCatcher::catch(Some(filename), || write::write_file(filename, data, flags))
    }

    fn read(&self, filename: &Path, offset: Option<i64>, length: Option<u64>) -> Result<Vec<u8>> {
        ErrorCatcher::catch(Some(filename), || read::read_range(filename, offset, length))
    }

    fn get_file_lines(&self, filename: &Path, flags: LineFlags) -> Result<Vec<String>> {
        let content = ErrorCatcher::catch(Some(filename), || fs::read(filename))?;
        Ok(read::split_lines(&content, flags))
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<()> {
        ErrorCatcher::catch(Some(source), || fs::copy(source, destination).map(drop))
    }

    fn rename(&self, source: &Path, destination: &Path) -> Result<()> {
        ErrorCatcher::catch(Some(source), || fs::rename(source, destination))
    }

    fn unlink(&self, filename: &Path) -> Result<()> {
        ErrorCatcher::catch(Some(filename), || fs::remove_file(filename))
    }

    fn make_dir(&self, dirname: &Path, mode: u32, recursive: bool) -> Result<()> {
        ErrorCatcher::catch(Some(dirname), || {
            // A recursive create still refuses an existing target.
            if recursive && dirname.exists() {
                return Err(io::Error::from_raw_os_error(libc::EEXIST));
            }
            DirBuilder::new().recursive(recursive).mode(mode).create(dirname)
        })
    }

    fn remove_dir(&self, dirname: &Path) -> Result<()> {
        ErrorCatcher::catch(Some(dirname), || fs::remove_dir(dirname))
    }

    fn change_mode(&self, filename: &Path, mode: u32) -> Result<()> {
        ErrorCatcher::catch(Some(filename), || {
            fs::set_permissions(filename, Permissions::from_mode(mode))
        })
    }

    fn change_owner(&self, filename: &Path, owner: &Principal) -> Result<()> {
        ErrorCatcher::catch(Some(filename), || {
            std::os::unix::fs::chown(filename, Some(sys::uid(owner)?), None)
        })
    }

    fn change_group(&self, filename: &Path, group: &Principal) -> Result<()> {
        ErrorCatcher::catch(Some(filename), || {
            std::os::unix::fs::chown(filename, None, Some(sys::gid(group)?))
        })
    }

    fn get_mode(&self, filename: &Path, mask: Option<u32>) -> Result<u32> {
        let mode = Self::metadata(filename)?.mode();
        Ok(match mask {
            Some(mask) => mode & mask,
            None => mode,
        })
    }

    fn get_owner(&self, filename: &Path) -> Result<u32> {
        Ok(Self::metadata(filename)?.uid())
    }

    fn get_group(&self, filename: &Path) -> Result<u32> {
        Ok(Self::metadata(filename)?.gid())
    }

    fn get_type(&self, filename: &Path) -> Result<FileType> {
        let metadata = ErrorCatcher::catch(Some(filename), || fs::symlink_metadata(filename))?;
        Ok(FileType::from(metadata.file_type()))
    }

    fn get_size(&self, filename: &Path) -> Result<u64> {
        Ok(Self::metadata(filename)?.len())
    }

    fn get_modification_time(&self, filename: &Path) -> Result<i64> {
        Ok(Self::metadata(filename)?.mtime())
    }

    fn get_access_time(&self, filename: &Path) -> Result<i64> {
        Ok(Self::metadata(filename)?.atime())
    }

    fn get_inode_change_time(&self, filename: &Path) -> Result<i64> {
        Ok(Self::metadata(filename)?.ctime())
    }

    fn touch(&self, filename: &Path, time: Option<i64>, access_time: Option<i64>) -> Result<()> {
        ErrorCatcher::catch(Some(filename), || {
            if !filename.exists() {
                OpenOptions::new().write(true).create(true).truncate(false).open(filename)?;
            }
            let time = match time {
                Some(time) => time,
                None => now()?,
            };
            sys::utimes(filename, access_time.unwrap_or(time), time)
        })
    }

    fn change_umask(&self, mask: u32) {
        sys::umask(mask);
    }

    fn get_umask(&self) -> u32 {
        let mask = sys::umask(0);
        sys::umask(mask);
        mask
    }

    fn get_stat(&self, filename: &Path) -> Result<Stat> {
        Ok(Stat::from(&Self::metadata(filename)?))
    }

    fn clear_stat_cache(&self, clear_real_path: bool, filename: Option<&Path>) {
        // Metadata is never cached, so there is nothing to drop.
        trace!(clear_real_path, filename = ?filename, "Stat cache clear requested");
    }

    fn get_real_path(&self, filename: &Path) -> Option<PathBuf> {
        fs::canonicalize(filename).ok()
    }

    fn create_hard_link(&self, target: &Path, link: &Path) -> Result<()> {
        ErrorCatcher::catch(Some(link), || fs::hard_link(target, link))
    }

    fn create_symbolic_link(&self, target: &Path, link: &Path) -> Result<()> {
        ErrorCatcher::catch(Some(link), || std::os::unix::fs::symlink(target, link))
    }

    fn get_link_target(&self, link: &Path) -> Result<PathBuf> {
        ErrorCatcher::catch(Some(link), || fs::read_link(link))
    }

    fn change_link_owner(&self, link: &Path, owner: &Principal) -> Result<()> {
        ErrorCatcher::catch(Some(link), || {
            std::os::unix::fs::lchown(link, Some(sys::uid(owner)?), None)
        })
    }

    fn change_link_group(&self, link: &Path, group: &Principal) -> Result<()> {
        ErrorCatcher::catch(Some(link), || {
            std::os::unix::fs::lchown(link, None, Some(sys::gid(group)?))
        })
    }

    fn get_link_stat(&self, link: &Path) -> Result<Stat> {
        let metadata = ErrorCatcher::catch(Some(link), || fs::symlink_metadata(link))?;
        Ok(Stat::from(&metadata))
    }

    fn get_free_space(&self, dirname: &Path) -> Result<u64> {
        ErrorCatcher::catch(Some(dirname), || Ok(sys::space(dirname)?.free))
    }

    fn get_total_space(&self, dirname: &Path) -> Result<u64> {
        ErrorCatcher::catch(Some(dirname), || Ok(sys::space(dirname)?.total))
    }

    fn create_temp_file(&self) -> Result<RealFile> {
        let file = ErrorCatcher::catch(None, tempfile::tempfile)?;
        RealFile::new(file, None, "r+b")
    }

    fn glob(&self, pattern: &str, flags: GlobFlags) -> Result<Vec<String>> {
        ErrorCatcher::catch(None, || pattern::glob(pattern, flags))
    }

    fn change_current_directory(&self, directory: &Path) -> Result<()> {
        ErrorCatcher::catch(Some(directory), || std::env::set_current_dir(directory))
    }

    fn get_current_directory(&self) -> Result<PathBuf> {
        ErrorCatcher::catch(None, std::env::current_dir)
    }
}

fn now() -> io::Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(io::Error::other)?;
    i64::try_from(elapsed.as_secs()).map_err(io::Error::other)
}
