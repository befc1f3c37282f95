use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use realfs_domain::LineFlags;

/// Reads `path` from `offset` (negative counts back from the end), limited
/// to `length` bytes.
pub(crate) fn read_range(
    path: &Path,
    offset: Option<i64>,
    length: Option<u64>,
) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    if let Some(offset) = offset {
        let from = match u64::try_from(offset) {
            Ok(offset) => SeekFrom::Start(offset),
            Err(_) => SeekFrom::End(offset),
        };
        file.seek(from)?;
    }

    let mut content = Vec::new();
    match length {
        Some(length) => file.take(length).read_to_end(&mut content)?,
        None => file.read_to_end(&mut content)?,
    };
    Ok(content)
}

/// Splits `content` into lines, keeping or stripping the newlines.
///
/// Empty lines are only skipped when newlines are stripped; a stripped line
/// also loses a `\r` in front of its `\n`. Trailing text without a newline
/// becomes the last line.
pub(crate) fn split_lines(content: &[u8], flags: LineFlags) -> Vec<String> {
    let keep_newline = !flags.contains(LineFlags::IGNORE_NEW_LINES);
    let skip_empty = flags.contains(LineFlags::SKIP_EMPTY_LINES);

    let mut lines = Vec::new();
    let mut rest = content;
    while let Some(end) = rest.iter().position(|&b| b == b'\n') {
        let (line, tail) = rest.split_at(end + 1);
        rest = tail;
        let line = if keep_newline {
            line
        } else {
            let line = &line[..end];
            line.strip_suffix(b"\r").unwrap_or(line)
        };
        if !keep_newline && skip_empty && line.is_empty() {
            continue;
        }
        lines.push(String::from_utf8_lossy(line).into_owned());
    }
    if !rest.is_empty() {
        lines.push(String::from_utf8_lossy(rest).into_owned());
    }
    lines
}

#[cfg(test)]
mod test {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    const CONTENT: &[u8] = b"one\ntwo\n\nthree\n\n\n";

    fn create_test_file(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_read_range() {
        let file = create_test_file("0123456789");
        assert_eq!(read_range(file.path(), None, None).unwrap(), b"0123456789");
        assert_eq!(read_range(file.path(), Some(3), None).unwrap(), b"3456789");
        assert_eq!(read_range(file.path(), Some(3), Some(2)).unwrap(), b"34");
        assert_eq!(read_range(file.path(), Some(-4), Some(2)).unwrap(), b"67");
        assert_eq!(read_range(file.path(), None, Some(0)).unwrap(), b"");
        assert_eq!(read_range(file.path(), Some(20), None).unwrap(), b"");
    }

    #[test]
    fn test_read_range_before_start_fails() {
        let file = create_test_file("0123");
        let error = read_range(file.path(), Some(-10), None).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_split_lines_keeps_newlines() {
        let actual = split_lines(CONTENT, LineFlags::empty());
        let expected = vec!["one\n", "two\n", "\n", "three\n", "\n", "\n"];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_split_lines_ignore_new_lines() {
        let actual = split_lines(CONTENT, LineFlags::IGNORE_NEW_LINES);
        let expected = vec!["one", "two", "", "three", "", ""];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_split_lines_skip_empty() {
        let flags = LineFlags::IGNORE_NEW_LINES | LineFlags::SKIP_EMPTY_LINES;
        assert_eq!(split_lines(CONTENT, flags), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_skip_empty_needs_ignore_new_lines() {
        let actual = split_lines(b"a\n\nb", LineFlags::SKIP_EMPTY_LINES);
        assert_eq!(actual, vec!["a\n", "\n", "b"]);
    }

    #[test]
    fn test_split_lines_windows_endings() {
        let actual = split_lines(b"a\r\nb\r\n", LineFlags::IGNORE_NEW_LINES);
        assert_eq!(actual, vec!["a", "b"]);
    }

    #[test]
    fn test_split_lines_empty() {
        assert_eq!(split_lines(b"", LineFlags::empty()), Vec::<String>::new());
    }
}
