use std::ffi::{CStr, CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::{io, mem, slice};

use realfs_domain::GlobFlags;
use tracing::trace;

/// Finds paths matching a shell wildcard pattern with the platform's
/// `glob(3)`. Flag bits are passed through unchanged.
pub(crate) fn glob(pattern: &str, flags: GlobFlags) -> io::Result<Vec<String>> {
    let c_pattern = CString::new(pattern)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: glob_t is a plain C struct whose documented initial state is all zeroes.
    let mut matches: libc::glob_t = unsafe { mem::zeroed() };
    // SAFETY: the pattern is NUL-terminated and `matches` is a valid glob_t that
    // is released with globfree below, whatever glob returns.
    let status = unsafe {
        libc::glob(c_pattern.as_ptr(), flags.bits() as libc::c_int, None, &mut matches)
    };
    let result = match status {
        0 => Ok(collect(&matches)),
        libc::GLOB_NOMATCH => Ok(Vec::new()),
        libc::GLOB_ABORTED => Err(io::Error::other(format!(
            "Failed to read a directory while matching {pattern}"
        ))),
        libc::GLOB_NOSPACE => Err(io::Error::from(io::ErrorKind::OutOfMemory)),
        other => Err(io::Error::other(format!("glob failed with status {other}"))),
    };
    // SAFETY: `matches` was initialised above and is not used after this call.
    unsafe { libc::globfree(&mut matches) };

    let mut found = result?;
    // GLOB_ONLYDIR is only a hint to glob(3).
    if flags.contains(GlobFlags::ONLYDIR) {
        found.retain(|path| Path::new(path).is_dir());
    }
    trace!(pattern, count = found.len(), "Pattern matched");
    Ok(found)
}

fn collect(matches: &libc::glob_t) -> Vec<String> {
    if matches.gl_pathv.is_null() {
        return Vec::new();
    }
    // SAFETY: after a successful glob, gl_pathv holds gl_pathc valid C strings.
    let paths = unsafe { slice::from_raw_parts(matches.gl_pathv, matches.gl_pathc) };
    paths
        .iter()
        .filter(|path| !path.is_null())
        .map(|&path| {
            // SAFETY: each non-null entry is a NUL-terminated string owned by `matches`.
            let bytes = unsafe { CStr::from_ptr(path) }.to_bytes();
            OsStr::from_bytes(bytes).to_string_lossy().into_owned()
        })
        .collect()
}
