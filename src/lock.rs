//! Process-wide registry of write locks, one per resolved backing-file path.
//!
//! Each store instance serializes its mutations through the lock registered
//! for its file path. Two stores opened on the same path receive the same
//! lock, so their writers serialize against each other; stores on different
//! paths never contend.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A `tokio` mutex so the same lock serves both the blocking and the
/// suspending write paths (`blocking_lock` vs `lock().await`).
pub(crate) type WriteLock = Arc<tokio::sync::Mutex<()>>;

static LOCKS: Lazy<Mutex<HashMap<PathBuf, WriteLock>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Get the shared write lock for a backing-file path, creating it on first use.
pub(crate) fn for_path(path: &Path) -> WriteLock {
    let mut locks = LOCKS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    locks
        .entry(path.to_path_buf())
        .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_returns_same_lock() {
        let lock1 = for_path(Path::new("/tmp/jsonstore-lock-test/Widget.json"));
        let lock2 = for_path(Path::new("/tmp/jsonstore-lock-test/Widget.json"));
        assert!(Arc::ptr_eq(&lock1, &lock2));
    }

    #[test]
    fn different_path_returns_different_lock() {
        let lock1 = for_path(Path::new("/tmp/jsonstore-lock-test/Widget.json"));
        let lock2 = for_path(Path::new("/tmp/jsonstore-lock-test/Gadget.json"));
        assert!(!Arc::ptr_eq(&lock1, &lock2));
    }

    #[test]
    fn registry_locks_are_functional() {
        let lock = for_path(Path::new("/tmp/jsonstore-lock-test/Functional.json"));
        let guard = lock.try_lock().unwrap();
        assert!(lock.try_lock().is_err());
        drop(guard);
        assert!(lock.try_lock().is_ok());
    }
}
