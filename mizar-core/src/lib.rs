mod config;
mod metrics;
mod runtime;
mod service;
mod utils;

pub use config::{OperationFailurePolicy, Properties};
pub use runtime::{Lock, LockHandle};
pub use service::{GuardOutcome, LockGuardService};
pub use utils::LockKeyUtils;
