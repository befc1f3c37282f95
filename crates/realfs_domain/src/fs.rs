use std::path::{Path, PathBuf};

use crate::{FileType, FsFile, GlobFlags, LineFlags, Principal, Result, Stat, WriteFlags};

/// Path-based access to a filesystem.
///
/// Predicates never fail. Every other operation either returns its value or
/// an error annotated with the path that was being worked on.
pub trait Fs {
    type File: FsFile;

    /// Opens `filename` with an fopen-style mode such as `"r"`, `"w+"` or
    /// `"ab"`.
    fn open(&self, filename: &Path, mode: &str) -> Result<Self::File>;

    fn is_exists(&self, filename: &Path) -> bool;
    fn is_file(&self, filename: &Path) -> bool;
    fn is_dir(&self, filename: &Path) -> bool;
    /// Does not follow the final symlink.
    fn is_link(&self, filename: &Path) -> bool;
    fn is_executable(&self, filename: &Path) -> bool;
    fn is_writable(&self, filename: &Path) -> bool;
    fn is_readable(&self, filename: &Path) -> bool;

    /// Writes `data` to `filename` and returns the number of bytes written.
    fn write(&self, filename: &Path, data: &[u8], flags: WriteFlags) -> Result<usize>;

    /// Reads the whole file, or the part starting at `offset` (negative
    /// counts from the end) limited to `length` bytes.
    fn read(&self, filename: &Path, offset: Option<i64>, length: Option<u64>) -> Result<Vec<u8>>;

    fn get_file_lines(&self, filename: &Path, flags: LineFlags) -> Result<Vec<String>>;

    fn copy(&self, source: &Path, destination: &Path) -> Result<()>;
    fn rename(&self, source: &Path, destination: &Path) -> Result<()>;
    fn unlink(&self, filename: &Path) -> Result<()>;
    fn make_dir(&self, dirname: &Path, mode: u32, recursive: bool) -> Result<()>;
    fn remove_dir(&self, dirname: &Path) -> Result<()>;

    fn change_mode(&self, filename: &Path, mode: u32) -> Result<()>;
    fn change_owner(&self, filename: &Path, owner: &Principal) -> Result<()>;
    fn change_group(&self, filename: &Path, group: &Principal) -> Result<()>;

    /// Returns the raw mode, and-ed with `mask` when one is given.
    fn get_mode(&self, filename: &Path, mask: Option<u32>) -> Result<u32>;
    fn get_owner(&self, filename: &Path) -> Result<u32>;
    fn get_group(&self, filename: &Path) -> Result<u32>;
    fn get_type(&self, filename: &Path) -> Result<FileType>;
    fn get_size(&self, filename: &Path) -> Result<u64>;
    fn get_modification_time(&self, filename: &Path) -> Result<i64>;
    fn get_access_time(&self, filename: &Path) -> Result<i64>;
    fn get_inode_change_time(&self, filename: &Path) -> Result<i64>;

    /// Sets access and modification times, creating the file if needed.
    fn touch(&self, filename: &Path, time: Option<i64>, access_time: Option<i64>) -> Result<()>;

    fn change_umask(&self, mask: u32);
    fn get_umask(&self) -> u32;

    fn get_stat(&self, filename: &Path) -> Result<Stat>;
    fn clear_stat_cache(&self, clear_real_path: bool, filename: Option<&Path>);
    fn get_real_path(&self, filename: &Path) -> Option<PathBuf>;

    fn create_hard_link(&self, target: &Path, link: &Path) -> Result<()>;
    fn create_symbolic_link(&self, target: &Path, link: &Path) -> Result<()>;
    fn get_link_target(&self, link: &Path) -> Result<PathBuf>;
    fn change_link_owner(&self, link: &Path, owner: &Principal) -> Result<()>;
    fn change_link_group(&self, link: &Path, group: &Principal) -> Result<()>;
    fn get_link_stat(&self, link: &Path) -> Result<Stat>;

    fn get_free_space(&self, dirname: &Path) -> Result<u64>;
    fn get_total_space(&self, dirname: &Path) -> Result<u64>;

    /// Opens an anonymous read/write file removed when closed.
    fn create_temp_file(&self) -> Result<Self::File>;

    fn glob(&self, pattern: &str, flags: GlobFlags) -> Result<Vec<String>>;

    fn change_current_directory(&self, directory: &Path) -> Result<()>;
    fn get_current_directory(&self) -> Result<PathBuf>;
}
