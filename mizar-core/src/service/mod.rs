mod lock_guard_service;

pub use lock_guard_service::{GuardOutcome, LockGuardService};
