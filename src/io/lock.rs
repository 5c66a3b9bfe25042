use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Name of the lock file created in the journal root
pub const LOCK_FILE: &str = ".daybook.lock";

/// Advisory lock serializing writers on one journal root.
///
/// Toggle, insert and migrate all rewrite whole files, so two of them
/// running at once would otherwise drop one side's edits. The lock file is
/// never removed: waiters hold descriptors on it, and unlinking would let a
/// later writer lock a fresh inode alongside them.
pub struct FileLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("timed out waiting for {path}: another daybook process is writing")]
    Timeout { path: PathBuf },
}

impl FileLock {
    /// Acquire the lock for `root`, waiting up to `timeout`.
    pub fn acquire(root: &Path, timeout: Duration) -> Result<Self, LockError> {
        fs::create_dir_all(root).map_err(|e| LockError::CreateError {
            path: root.to_path_buf(),
            source: e,
        })?;
        let lock_path = root.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::CreateError {
                path: lock_path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        loop {
            match try_lock(&file) {
                Ok(()) => {
                    tracing::trace!(lock = %lock_path.display(), "lock acquired");
                    return Ok(FileLock { _file: file });
                }
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => {
                    return Err(LockError::Timeout { path: lock_path });
                }
            }
        }
    }

    /// Acquire with the default 5 second timeout
    pub fn acquire_default(root: &Path) -> Result<Self, LockError> {
        Self::acquire(root, Duration::from_secs(5))
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_and_release() {
        let tmp = TempDir::new().unwrap();

        let lock = FileLock::acquire_default(tmp.path());
        assert!(lock.is_ok());
        assert!(tmp.path().join(LOCK_FILE).exists());
        drop(lock);
        // released with the descriptor, file stays
        assert!(tmp.path().join(LOCK_FILE).exists());

        let again = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(again.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_second_writer_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire_default(tmp.path()).unwrap();

        let second = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_handoff_to_waiter_keeps_third_writer_out() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        let first = FileLock::acquire_default(&root).unwrap();

        let waiter = {
            let root = root.clone();
            std::thread::spawn(move || FileLock::acquire(&root, Duration::from_secs(5)))
        };
        std::thread::sleep(Duration::from_millis(100));
        drop(first);
        let second = waiter.join().unwrap().unwrap();

        let third = FileLock::acquire(&root, Duration::from_millis(50));
        assert!(matches!(third, Err(LockError::Timeout { .. })));

        drop(second);
        assert!(FileLock::acquire(&root, Duration::from_millis(50)).is_ok());
    }

    #[test]
    fn test_creates_missing_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("journal");
        let _lock = FileLock::acquire_default(&root).unwrap();
        assert!(root.is_dir());
    }
}
