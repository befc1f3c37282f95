use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::parse_mode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(level)
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Inspect and change files through the realfs facade", long_about = None)]
pub struct Cli {
    /// Log level for realfs crates; overrides REALFS_LOG
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Write logs to hourly files in this directory instead of stderr
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Octal umask to apply before running the command
    #[arg(long, value_parser = parse_mode, global = true)]
    pub umask: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print metadata of a path, following symlinks
    Stat { path: PathBuf },
    /// Print metadata of a path without following a final symlink
    Lstat { path: PathBuf },
    /// Print file content
    Cat {
        path: PathBuf,
        /// Byte offset; negative values count from the end
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<i64>,
        /// Maximum number of bytes
        #[arg(long)]
        length: Option<u64>,
    },
    /// Write content to a file
    Write {
        path: PathBuf,
        content: String,
        #[arg(long)]
        append: bool,
        /// Hold an exclusive lock while writing
        #[arg(long)]
        lock: bool,
    },
    /// Print a file line by line
    Lines {
        path: PathBuf,
        #[arg(long)]
        ignore_new_lines: bool,
        #[arg(long)]
        skip_empty: bool,
    },
    /// List paths matching a wildcard pattern
    Glob {
        pattern: String,
        #[arg(long)]
        only_dir: bool,
        /// Append a slash to directories
        #[arg(long)]
        mark: bool,
        /// Expand {a,b} alternatives
        #[arg(long)]
        brace: bool,
        /// Print the pattern itself when nothing matches
        #[arg(long)]
        nocheck: bool,
        /// Treat backslashes as ordinary characters
        #[arg(long)]
        noescape: bool,
    },
    /// Create a directory
    Mkdir {
        path: PathBuf,
        #[arg(short, long)]
        parents: bool,
        #[arg(long, value_parser = parse_mode, default_value = "777")]
        mode: u32,
    },
    /// Remove a file
    Rm { path: PathBuf },
    /// Remove an empty directory
    Rmdir { path: PathBuf },
    /// Change permission bits
    Chmod {
        #[arg(value_parser = parse_mode)]
        mode: u32,
        path: PathBuf,
    },
    /// Change the owner of a path, by name or numeric id
    Chown {
        owner: String,
        path: PathBuf,
        /// Change the symlink itself rather than its target
        #[arg(long)]
        no_dereference: bool,
    },
    /// Update timestamps, creating the file if needed
    Touch {
        path: PathBuf,
        /// Modification time as unix seconds
        #[arg(long)]
        time: Option<i64>,
    },
    /// Create a link
    Ln {
        target: PathBuf,
        link: PathBuf,
        #[arg(short, long)]
        symbolic: bool,
    },
    /// Print free and total space of the filesystem holding a path
    Df { path: PathBuf },
    /// Print the type of a path
    Type { path: PathBuf },
    /// Print the canonical absolute path
    Realpath { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_cat_with_negative_offset() {
        let cli = Cli::parse_from(["realfs", "cat", "a.txt", "--offset", "-4"]);
        let expected =
            Command::Cat { path: PathBuf::from("a.txt"), offset: Some(-4), length: None };
        assert_eq!(cli.command, expected);
    }

    #[test]
    fn test_parse_octal_mode() {
        let cli = Cli::parse_from(["realfs", "chmod", "0750", "a.txt"]);
        assert_eq!(cli.command, Command::Chmod { mode: 0o750, path: PathBuf::from("a.txt") });
    }

    #[test]
    fn test_reject_bad_mode() {
        assert!(Cli::try_parse_from(["realfs", "mkdir", "d", "--mode", "999"]).is_err());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }
}
