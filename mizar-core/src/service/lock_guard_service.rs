use std::time::Instant;

use mizar_common::prelude::*;
use mizar_common::{InvocationContext, LockSpec};

use crate::config::{OperationFailurePolicy, Properties};
use crate::metrics::Monitors;
use crate::runtime::{Lock, LockHandle};
use crate::utils::LockKeyUtils;

/// What happened to one guarded invocation. Callers can always tell "the
/// operation ran" apart from "the lock was never ours".
#[derive(Debug)]
pub enum GuardOutcome<T> {
    /// The operation ran while holding the lock and returned a value.
    Completed(T),
    /// The operation ran while holding the lock and failed; the lock was
    /// released anyway. Only reported under the Swallow policy.
    Failed(ErrorCode),
    /// Acquisition was refused (wait elapsed, wait cancelled, or the lock
    /// service was unavailable). The operation never ran.
    Refused,
    /// No lock identity could be formed. The lock service was never
    /// contacted and the operation never ran.
    Skipped,
}

impl<T> GuardOutcome<T> {
    /// True if the guarded operation was actually entered.
    pub fn did_run(&self) -> bool {
        match self {
            Self::Completed(_) | Self::Failed(_) => true,
            Self::Refused | Self::Skipped => false,
        }
    }

    pub fn into_completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }
}

/// Drives the exclusive section of a guarded invocation: derive the lock
/// identity, acquire with a bounded wait, run the operation exactly once on
/// the calling thread, release on every exit path.
///
/// Multiple local invocations are coordinated purely by funneling them
/// through the same remote acquire call when their identities coincide; the
/// service holds no local mutex. No fairness among waiters is assumed beyond
/// what the lock client provides.
pub struct LockGuardService {
    lock: Arc<dyn Lock>,
    properties: Properties,
}

impl LockGuardService {
    pub fn new(lock: Arc<dyn Lock>) -> Self {
        Self::with_properties(lock, Properties::default())
    }

    pub fn with_properties(lock: Arc<dyn Lock>, properties: Properties) -> Self {
        Self { lock, properties }
    }

    /// Full interception pipeline: resolve the lock identity from the spec
    /// and live arguments, then guard the operation with it.
    pub fn execute<T, F>(
        &self,
        spec: &LockSpec,
        ctx: &InvocationContext,
        operation: F,
    ) -> MizResult<GuardOutcome<T>>
    where
        F: FnOnce() -> MizResult<T>,
    {
        let lock_id = LockKeyUtils::resolve_lock_key(spec, ctx);
        self.guard(&lock_id, spec, operation)
    }

    pub fn execute_cancellable<T, F>(
        &self,
        spec: &LockSpec,
        ctx: &InvocationContext,
        cancelled: &AtomicBool,
        operation: F,
    ) -> MizResult<GuardOutcome<T>>
    where
        F: FnOnce() -> MizResult<T>,
    {
        let lock_id = LockKeyUtils::resolve_lock_key(spec, ctx);
        self.guard_cancellable(&lock_id, spec, cancelled, operation)
    }

    pub fn guard<T, F>(
        &self,
        lock_id: &InlineStr,
        spec: &LockSpec,
        operation: F,
    ) -> MizResult<GuardOutcome<T>>
    where
        F: FnOnce() -> MizResult<T>,
    {
        self.guard_cancellable(lock_id, spec, &AtomicBool::new(false), operation)
    }

    /// An empty `lock_id` skips the operation outright. A refused
    /// acquisition surfaces the spec's fail_msg and never runs the
    /// operation. While holding, the operation runs exactly once on the
    /// invoking thread and the release is guaranteed on every exit path,
    /// including unwind; lease expiry is only the crash backstop.
    pub fn guard_cancellable<T, F>(
        &self,
        lock_id: &InlineStr,
        spec: &LockSpec,
        cancelled: &AtomicBool,
        operation: F,
    ) -> MizResult<GuardOutcome<T>>
    where
        F: FnOnce() -> MizResult<T>,
    {
        if lock_id.is_empty() {
            debug!("empty lockId, skipping guarded operation");
            return Ok(GuardOutcome::Skipped);
        }
        spec.validate()?;

        if !self.properties.lock_guard_enabled {
            return self.settle(lock_id, operation());
        }

        let handle = match self.acquire(lock_id, spec, cancelled) {
            Some(handle) => handle,
            None => {
                error!("{}", spec.fail_msg);
                Monitors::record_acquire_lock_unsuccessful();
                return Ok(GuardOutcome::Refused);
            }
        };
        debug!(
            "Thread {:?} acquired lock to lockId {}.",
            std::thread::current().id(),
            lock_id
        );

        let start = Instant::now();
        // the handle releases on drop, so an unwinding operation cannot
        // leave the lease held
        let result = operation();
        handle.release();
        Monitors::record_lock_held_time(start.elapsed().as_millis() as i64);
        debug!(
            "Thread {:?} released lock to lockId {}.",
            std::thread::current().id(),
            lock_id
        );

        self.settle(lock_id, result)
    }

    fn acquire(
        &self,
        lock_id: &InlineStr,
        spec: &LockSpec,
        cancelled: &AtomicBool,
    ) -> Option<LockHandle> {
        if cancelled.load(AtomicOrdering::SeqCst) {
            return None;
        }
        if !self.lock.acquire_lock_try_and_lease_time(
            lock_id,
            spec.wait_time_ms,
            spec.lease_time_ms,
        ) {
            debug!(
                "Thread {:?} failed to acquire lock to lockId {}.",
                std::thread::current().id(),
                lock_id
            );
            return None;
        }
        let handle = LockHandle::new(self.lock.clone(), lock_id.clone());
        if cancelled.load(AtomicOrdering::SeqCst) {
            // the acquire won a race against cancellation: abandon it so no
            // dangling lease outlives the refused invocation
            drop(handle);
            return None;
        }
        Some(handle)
    }

    fn settle<T>(&self, lock_id: &InlineStr, result: MizResult<T>) -> MizResult<GuardOutcome<T>> {
        match result {
            Ok(value) => Ok(GuardOutcome::Completed(value)),
            Err(e) => {
                Monitors::record_guarded_operation_error();
                match self.properties.operation_failure_policy {
                    OperationFailurePolicy::Swallow => {
                        error!("guarded operation failed under lockId {}: {}", lock_id, e);
                        Monitors::error("LockGuardService", "guard");
                        Ok(GuardOutcome::Failed(e))
                    }
                    OperationFailurePolicy::Propagate => Err(e),
                }
            }
        }
    }
}
