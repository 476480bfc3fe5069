use mizar_common::prelude::*;

/// Interface implemented by a distributed lock client.
///
/// The remote service arbitrates the held/free state of each lock id; the
/// guard never holds a local mutex. A `false` return covers an elapsed wait,
/// an interrupted wait and an unavailable lock service alike: in every case
/// no lock is held afterwards.
pub trait Lock: Send + Sync {
    /// Tries to acquire `lock_id`, blocking for at most `time_to_try_ms`
    /// (`LockSpec::WAIT_FOREVER_MS` blocks indefinitely, 0 attempts exactly
    /// once). An acquired lease is force released by the service once
    /// `lease_time_ms` elapses without an explicit release.
    fn acquire_lock_try_and_lease_time(
        &self,
        lock_id: &InlineStr,
        time_to_try_ms: i64,
        lease_time_ms: i64,
    ) -> bool;

    /// Releases `lock_id`. Callable only by the holder; safe to call even if
    /// the lease already expired.
    fn release_lock(&self, lock_id: &InlineStr);
}

/// Token bound to one acquired lock id for a single acquire/release cycle.
/// Releasing consumes the handle; a handle dropped without being consumed
/// (early return, unwind) still releases, so the lease can never stay held
/// past the guarded section.
pub struct LockHandle {
    lock: Arc<dyn Lock>,
    lock_id: InlineStr,
    released: bool,
}

impl LockHandle {
    pub(crate) fn new(lock: Arc<dyn Lock>, lock_id: InlineStr) -> Self {
        Self {
            lock,
            lock_id,
            released: false,
        }
    }

    pub fn lock_id(&self) -> &InlineStr {
        &self.lock_id
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.lock.release_lock(&self.lock_id);
        }
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        self.release_once();
    }
}
