//! Per-user serialization of syncs

use scorebook_core::errors::{ExError, ExErrorKind};
use scorebook_store::errors::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One mutex per user, present only while a sync holds or awaits it
///
/// Two syncs for the same user run one after the other; different users
/// never wait on each other.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, user_id: i64) -> Result<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| poisoned(user_id))?;
        Ok(locks.entry(user_id).or_default().clone())
    }

    /// Run `f` while holding the user's lock
    ///
    /// # Errors
    ///
    /// Returns `Concurrency` if a previous holder panicked, otherwise
    /// whatever `f` returns.
    pub fn with_user<T>(&self, user_id: i64, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.lock_for(user_id)?;
        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(poisoned(user_id)),
        };
        self.release(user_id, &lock);
        result
    }

    /// Drop the registry entry when `lock` is its last outside holder
    ///
    /// Clones are only handed out under the registry mutex, so a count of
    /// two (registry plus `lock`) means no other caller holds or awaits it.
    fn release(&self, user_id: i64, lock: &Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        let idle = locks
            .get(&user_id)
            .is_some_and(|entry| Arc::ptr_eq(entry, lock) && Arc::strong_count(entry) == 2);
        if idle {
            locks.remove(&user_id);
        }
    }

    /// Number of users with a sync in flight or waiting
    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(user_id: i64) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("user_lock")
        .with_entity_id(user_id.to_string())
        .with_message("A previous sync for this user panicked while holding its lock")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_same_user_is_serialized() {
        let locks = Arc::new(UserLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    locks
                        .with_user(7, || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_seen.fetch_max(now, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(10));
                            inside.fetch_sub(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[test]
    fn test_entries_are_dropped_after_use() {
        let locks = UserLocks::new();
        for user_id in 0..100 {
            locks
                .with_user(user_id, || {
                    assert_eq!(locks.len(), 1);
                    Ok(())
                })
                .unwrap();
        }
        assert!(locks.is_empty());
    }

    #[test]
    fn test_waiting_caller_keeps_entry() {
        let locks = Arc::new(UserLocks::new());
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        let holder = {
            let locks = Arc::clone(&locks);
            thread::spawn(move || {
                locks
                    .with_user(5, || {
                        entered_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                        Ok(())
                    })
                    .unwrap();
            })
        };
        entered_rx.recv().unwrap();

        let waiter = {
            let locks = Arc::clone(&locks);
            thread::spawn(move || locks.with_user(5, || Ok(())).unwrap())
        };
        // Give the waiter time to block on the user's mutex
        thread::sleep(Duration::from_millis(50));
        assert_eq!(locks.len(), 1);

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        waiter.join().unwrap();
        assert!(locks.is_empty());
    }

    #[test]
    fn test_poisoned_lock_reports_concurrency() {
        let locks = Arc::new(UserLocks::new());
        let cloned = Arc::clone(&locks);
        let _ = thread::spawn(move || {
            let _ = cloned.with_user(3, || -> Result<()> { panic!("boom") });
        })
        .join();

        let err = locks.with_user(3, || Ok(())).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Concurrency);
        assert!(locks.with_user(4, || Ok(())).is_ok());
    }
}
