use std::fs::Metadata;
use std::os::unix::fs::{FileTypeExt, MetadataExt};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Snapshot of filesystem metadata for a path or an open handle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub dev: u64,
    pub ino: u64,
    /// Type and permission bits, as reported by the platform.
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u64,
    pub size: u64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
    pub blksize: u64,
    pub blocks: u64,
}

impl From<&Metadata> for Stat {
    fn from(meta: &Metadata) -> Self {
        Self {
            dev: meta.dev(),
            ino: meta.ino(),
            mode: meta.mode(),
            nlink: meta.nlink(),
            uid: meta.uid(),
            gid: meta.gid(),
            rdev: meta.rdev(),
            size: meta.size(),
            atime: meta.atime(),
            mtime: meta.mtime(),
            ctime: meta.ctime(),
            blksize: meta.blksize(),
            blocks: meta.blocks(),
        }
    }
}

impl Stat {
    /// Permission bits only, without the file type.
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Fifo,
    Char,
    Dir,
    Block,
    Link,
    File,
    Socket,
    Unknown,
}

impl From<std::fs::FileType> for FileType {
    fn from(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            FileType::Link
        } else if ft.is_dir() {
            FileType::Dir
        } else if ft.is_file() {
            FileType::File
        } else if ft.is_fifo() {
            FileType::Fifo
        } else if ft.is_char_device() {
            FileType::Char
        } else if ft.is_block_device() {
            FileType::Block
        } else if ft.is_socket() {
            FileType::Socket
        } else {
            FileType::Unknown
        }
    }
}

/// Runtime state of an open handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    /// Path the handle was opened on; `None` for anonymous handles.
    pub filename: Option<String>,
    pub mode: String,
    pub eof: bool,
    /// `true` when the descriptor is in blocking mode.
    pub blocked: bool,
    pub seekable: bool,
    pub stream_type: String,
    pub wrapper_type: String,
}

/// Owner or group given either by numeric id or by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    Id(u32),
    Name(String),
}

impl From<u32> for Principal {
    fn from(id: u32) -> Self {
        Principal::Id(id)
    }
}

impl From<&str> for Principal {
    fn from(name: &str) -> Self {
        match name.parse::<u32>() {
            Ok(id) => Principal::Id(id),
            Err(_) => Principal::Name(name.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_file_type_names() {
        assert_eq!(FileType::Dir.to_string(), "dir");
        assert_eq!(FileType::Char.to_string(), "char");
        assert_eq!(FileType::from_str("link").unwrap(), FileType::Link);
    }

    #[test]
    fn test_principal_from_str() {
        assert_eq!(Principal::from("1000"), Principal::Id(1000));
        assert_eq!(Principal::from("www-data"), Principal::Name("www-data".to_string()));
    }

    #[test]
    fn test_stat_permissions() {
        let stat = Stat { mode: 0o100644, ..Default::default() };
        assert_eq!(stat.permissions(), 0o644);
    }

    #[test]
    fn test_stat_serializes_with_plain_keys() {
        let stat = Stat { ino: 7, size: 12, ..Default::default() };
        let json = serde_json::to_value(&stat).unwrap();
        assert_eq!(json["ino"], 7);
        assert_eq!(json["size"], 12);
    }
}
