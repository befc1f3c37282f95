use std::io::Write;

use anyhow::{Context, Result};
use realfs_domain::{Fs, GlobFlags, LineFlags, Principal, WriteFlags};
use tracing::info;

use crate::cli::Command;

/// Runs one command against `fs`, printing its output to `out`.
pub fn run<F: Fs>(fs: &F, command: Command, out: &mut impl Write) -> Result<()> {
    info!(command = ?command, "Running command");
    match command {
        Command::Stat { path } => {
            let stat = fs.get_stat(&path)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&stat)?)?;
        }
        Command::Lstat { path } => {
            let stat = fs.get_link_stat(&path)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&stat)?)?;
        }
        Command::Cat { path, offset, length } => {
            out.write_all(&fs.read(&path, offset, length)?)?;
        }
        Command::Write { path, content, append, lock } => {
            let mut flags = WriteFlags::empty();
            if append {
                flags |= WriteFlags::APPEND;
            }
            if lock {
                flags |= WriteFlags::LOCK_EX;
            }
            let written = fs.write(&path, content.as_bytes(), flags)?;
            writeln!(out, "{written}")?;
        }
        Command::Lines { path, ignore_new_lines, skip_empty } => {
            let mut flags = LineFlags::empty();
            if ignore_new_lines {
                flags |= LineFlags::IGNORE_NEW_LINES;
            }
            if skip_empty {
                flags |= LineFlags::SKIP_EMPTY_LINES;
            }
            let lines = fs.get_file_lines(&path, flags)?;
            writeln!(out, "{}", serde_json::to_string(&lines)?)?;
        }
        Command::Glob { pattern, only_dir, mark, brace, nocheck, noescape } => {
            let flags = [
                (only_dir, GlobFlags::ONLYDIR),
                (mark, GlobFlags::MARK),
                (brace, GlobFlags::BRACE),
                (nocheck, GlobFlags::NOCHECK),
                (noescape, GlobFlags::NOESCAPE),
            ]
            .into_iter()
            .filter(|(enabled, _)| *enabled)
            .fold(GlobFlags::empty(), |flags, (_, flag)| flags | flag);
            for path in fs.glob(&pattern, flags)? {
                writeln!(out, "{path}")?;
            }
        }
        Command::Mkdir { path, parents, mode } => fs.make_dir(&path, mode, parents)?,
        Command::Rm { path } => fs.unlink(&path)?,
        Command::Rmdir { path } => fs.remove_dir(&path)?,
        Command::Chmod { mode, path } => fs.change_mode(&path, mode)?,
        Command::Chown { owner, path, no_dereference } => {
            let owner = Principal::from(owner.as_str());
            if no_dereference {
                fs.change_link_owner(&path, &owner)?;
            } else {
                fs.change_owner(&path, &owner)?;
            }
        }
        Command::Touch { path, time } => fs.touch(&path, time, None)?,
        Command::Ln { target, link, symbolic } => {
            if symbolic {
                fs.create_symbolic_link(&target, &link)?;
            } else {
                fs.create_hard_link(&target, &link)?;
            }
        }
        Command::Df { path } => {
            let space = serde_json::json!({
                "free": fs.get_free_space(&path)?,
                "total": fs.get_total_space(&path)?,
            });
            writeln!(out, "{space}")?;
        }
        Command::Type { path } => writeln!(out, "{}", fs.get_type(&path)?)?,
        Command::Realpath { path } => {
            let real = fs
                .get_real_path(&path)
                .with_context(|| format!("Failed to resolve path {}", path.display()))?;
            writeln!(out, "{}", real.display())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use realfs::RealFS;

    use super::*;

    fn run_to_string(command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(&RealFS::new(), command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_write_append_and_cat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let written = run_to_string(Command::Write {
            path: path.clone(),
            content: "hello".to_string(),
            append: false,
            lock: true,
        })
        .unwrap();
        assert_eq!(written, "5\n");

        run_to_string(Command::Write {
            path: path.clone(),
            content: " world".to_string(),
            append: true,
            lock: false,
        })
        .unwrap();

        let actual = run_to_string(Command::Cat { path: path.clone(), offset: None, length: None })
            .unwrap();
        assert_eq!(actual, "hello world");

        let actual =
            run_to_string(Command::Cat { path, offset: Some(-5), length: Some(3) }).unwrap();
        assert_eq!(actual, "wor");
    }

    #[test]
    fn test_lines_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        fs::write(&path, "one\ntwo\n\nthree\n\n\n").unwrap();

        let command = Command::Lines { path, ignore_new_lines: true, skip_empty: true };
        let actual = run_to_string(command).unwrap();
        assert_eq!(actual, "[\"one\",\"two\",\"three\"]\n");
    }

    #[test]
    fn test_stat_prints_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.txt");
        fs::write(&path, "1234").unwrap();

        let actual = run_to_string(Command::Stat { path }).unwrap();
        let stat: serde_json::Value = serde_json::from_str(&actual).unwrap();
        assert_eq!(stat["size"], 4);
    }

    #[test]
    fn test_mkdir_type_and_glob() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");

        run_to_string(Command::Mkdir { path: sub.clone(), parents: false, mode: 0o755 }).unwrap();
        assert_eq!(run_to_string(Command::Type { path: sub.clone() }).unwrap(), "dir\n");

        let actual = run_to_string(Command::Glob {
            pattern: format!("{}/*", dir.path().display()),
            only_dir: true,
            mark: true,
            brace: false,
            nocheck: false,
            noescape: false,
        })
        .unwrap();
        assert_eq!(actual, format!("{}/\n", sub.display()));
    }

    #[test]
    fn test_missing_path_error_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let error = run_to_string(Command::Rm { path: path.clone() }).unwrap_err();
        assert!(error.to_string().contains(&path.display().to_string()));

        let error = run_to_string(Command::Realpath { path: PathBuf::from(&path) }).unwrap_err();
        assert!(error.to_string().contains("Failed to resolve path"));
    }
}
