use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

macro_rules! bit_flags {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $flag:ident = $value:expr;)* }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            $($(#[$fmeta])* pub const $flag: Self = Self($value);)*

            pub const fn empty() -> Self {
                Self(0)
            }

            /// Keeps unknown bits so values round-trip unchanged.
            pub const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

bit_flags! {
    /// Flags for whole-file writes.
    WriteFlags {
        /// Hold an exclusive advisory lock while writing.
        LOCK_EX = 2;
        /// Append to the existing content instead of truncating.
        APPEND = 8;
    }
}

bit_flags! {
    /// Flags for splitting a file into lines.
    LineFlags {
        /// Strip the trailing newline from every line.
        IGNORE_NEW_LINES = 2;
        /// Drop empty lines. Only effective with `IGNORE_NEW_LINES`.
        SKIP_EMPTY_LINES = 4;
    }
}

bit_flags! {
    /// Flags for pattern matching, using the glibc values.
    GlobFlags {
        ERR = 1;
        MARK = 2;
        NOSORT = 4;
        NOCHECK = 16;
        NOESCAPE = 64;
        BRACE = 1024;
        ONLYDIR = 8192;
    }
}

/// Reference point for repositioning a handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Whence {
    #[default]
    Set = 0,
    Current = 1,
    End = 2,
}

impl Whence {
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Whence::Set),
            1 => Some(Whence::Current),
            2 => Some(Whence::End),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockKind {
    Shared,
    Exclusive,
    Unlock,
}

/// Advisory lock request: a lock kind, optionally non-blocking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOperation {
    pub kind: LockKind,
    pub non_blocking: bool,
}

impl LockOperation {
    pub const LOCK_SH: i32 = 1;
    pub const LOCK_EX: i32 = 2;
    pub const LOCK_UN: i32 = 3;
    pub const LOCK_NB: i32 = 4;

    pub const SHARED: Self = Self { kind: LockKind::Shared, non_blocking: false };
    pub const EXCLUSIVE: Self = Self { kind: LockKind::Exclusive, non_blocking: false };
    pub const UNLOCK: Self = Self { kind: LockKind::Unlock, non_blocking: false };

    pub fn nb(self) -> Self {
        Self { non_blocking: true, ..self }
    }

    /// Decodes `LOCK_SH`/`LOCK_EX`/`LOCK_UN`, optionally or-ed with `LOCK_NB`.
    pub fn from_bits(bits: i32) -> Option<Self> {
        let kind = match bits & !Self::LOCK_NB {
            Self::LOCK_SH => LockKind::Shared,
            Self::LOCK_EX => LockKind::Exclusive,
            Self::LOCK_UN => LockKind::Unlock,
            _ => return None,
        };
        Some(Self { kind, non_blocking: bits & Self::LOCK_NB != 0 })
    }

    pub fn bits(self) -> i32 {
        let base = match self.kind {
            LockKind::Shared => Self::LOCK_SH,
            LockKind::Exclusive => Self::LOCK_EX,
            LockKind::Unlock => Self::LOCK_UN,
        };
        if self.non_blocking {
            base | Self::LOCK_NB
        } else {
            base
        }
    }
}

/// Outcome of an advisory lock request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStatus {
    pub acquired: bool,
    /// Set when the request conflicted with a lock held elsewhere, whether or
    /// not the call itself succeeded.
    pub would_block: bool,
}
