use std::cell::{Cell, RefCell};
use std::io;
use std::path::{Path, PathBuf};

use realfs_domain::{FsError, Result};
use tracing::{debug, trace};

thread_local! {
    static STATE: RefCell<CatcherState> = const { RefCell::new(CatcherState::Idle) };
    static GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// State of the calling thread's error context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatcherState {
    Idle,
    /// A call is in progress; failures are attributed to this filename.
    Armed(Option<PathBuf>),
}

/// Turns the failure of one platform call into an [`FsError`] annotated with
/// the filename in scope.
///
/// The context is per thread and at most one level deep: arming it while it
/// is already armed replaces the previous context.
pub struct ErrorCatcher;

impl ErrorCatcher {
    /// Arms the context for `filename`. The returned guard disarms it when
    /// dropped, unless a later `start` has replaced it in the meantime.
    pub fn start(filename: Option<&Path>) -> CatchGuard {
        STATE.with(|state| {
            let mut state = state.borrow_mut();
            if let CatcherState::Armed(previous) = &*state {
                debug!(previous = ?previous, next = ?filename, "Replacing armed error context");
            }
            *state = CatcherState::Armed(filename.map(Path::to_path_buf));
        });
        let generation = GENERATION.with(|current| {
            let next = current.get().wrapping_add(1);
            current.set(next);
            next
        });
        CatchGuard { generation }
    }

    /// Disarms the context. Does nothing when idle.
    pub fn stop() {
        STATE.with(|state| *state.borrow_mut() = CatcherState::Idle);
    }

    pub fn state() -> CatcherState {
        STATE.with(|state| state.borrow().clone())
    }

    /// Converts `error` using the armed filename and disarms the context.
    pub fn raise(error: io::Error) -> FsError {
        let filename = STATE.with(|state| {
            match std::mem::replace(&mut *state.borrow_mut(), CatcherState::Idle) {
                CatcherState::Armed(filename) => filename,
                CatcherState::Idle => None,
            }
        });
        debug!(filename = ?filename, error = %error, "Filesystem call failed");
        FsError::from_io(error, filename)
    }

    /// Runs `op` with the context armed for `filename`.
    pub fn catch<T>(filename: Option<&Path>, op: impl FnOnce() -> io::Result<T>) -> Result<T> {
        trace!(filename = ?filename, "Forwarding filesystem call");
        let _guard = Self::start(filename);
        op().map_err(|error| Self::raise(error).into())
    }
}

#[must_use = "the error context is disarmed as soon as the guard is dropped"]
pub struct CatchGuard {
    generation: u64,
}

impl Drop for CatchGuard {
    fn drop(&mut self) {
        if GENERATION.with(Cell::get) == self.generation {
            ErrorCatcher::stop();
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn armed(path: &str) -> CatcherState {
        CatcherState::Armed(Some(PathBuf::from(path)))
    }

    #[test]
    fn test_start_and_stop() {
        assert_eq!(ErrorCatcher::state(), CatcherState::Idle);
        let guard = ErrorCatcher::start(Some(Path::new("a.txt")));
        assert_eq!(ErrorCatcher::state(), armed("a.txt"));
        drop(guard);
        assert_eq!(ErrorCatcher::state(), CatcherState::Idle);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        ErrorCatcher::stop();
        ErrorCatcher::stop();
        assert_eq!(ErrorCatcher::state(), CatcherState::Idle);
    }

    #[test]
    fn test_second_start_replaces_first() {
        let first = ErrorCatcher::start(Some(Path::new("first")));
        let second = ErrorCatcher::start(Some(Path::new("second")));
        assert_eq!(ErrorCatcher::state(), armed("second"));

        // The replaced guard must not disarm the newer context.
        drop(first);
        assert_eq!(ErrorCatcher::state(), armed("second"));

        drop(second);
        assert_eq!(ErrorCatcher::state(), CatcherState::Idle);
    }

    #[test]
    fn test_raise_disarms_and_attaches_filename() {
        let _guard = ErrorCatcher::start(Some(Path::new("missing.txt")));
        let error = ErrorCatcher::raise(io::Error::from_raw_os_error(libc::ENOENT));

        assert_eq!(ErrorCatcher::state(), CatcherState::Idle);
        assert_eq!(error.target_filename(), Some(Path::new("missing.txt")));
        assert_eq!(error.raw_code(), Some(libc::ENOENT));
    }

    #[test]
    fn test_raise_when_idle_has_no_filename() {
        let error = ErrorCatcher::raise(io::Error::other("boom"));
        assert_eq!(error.target_filename(), None);
        assert_eq!(error.raw_code(), None);
    }

    #[test]
    fn test_catch_success_leaves_idle() {
        let actual = ErrorCatcher::catch(Some(Path::new("x")), || Ok(42)).unwrap();
        assert_eq!(actual, 42);
        assert_eq!(ErrorCatcher::state(), CatcherState::Idle);
    }

    #[test]
    fn test_catch_failure_carries_filename() {
        let actual = ErrorCatcher::catch(Some(Path::new("/no/such")), || {
            std::fs::read("/no/such/file")
        });
        let error = actual.unwrap_err();
        assert_eq!(error.target_filename(), Some(Path::new("/no/such")));
        assert_eq!(ErrorCatcher::state(), CatcherState::Idle);
    }

    #[test]
    fn test_context_is_per_thread() {
        let _guard = ErrorCatcher::start(Some(Path::new("main")));
        let other = std::thread::spawn(ErrorCatcher::state).join().unwrap();
        assert_eq!(other, CatcherState::Idle);
        assert_eq!(ErrorCatcher::state(), armed("main"));
    }
}
