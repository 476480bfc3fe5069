use std::str::FromStr;

use mizar_common::prelude::*;
use mizar_common::EnvUtils;
use strum_macros::{AsRefStr, EnumString};

/// What the guard does when the guarded operation itself fails while the
/// lock is held. The lock is released first in either case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum OperationFailurePolicy {
    /// Log the failure and report it through the guard outcome. The caller
    /// never sees the original error as an Err.
    Swallow,
    /// Re-raise the failure to the caller once the lock has been released.
    Propagate,
}

pub struct Properties {
    /// Used to enable/disable acquiring the distributed lock around guarded
    /// operations. When disabled the operation runs unguarded.
    pub lock_guard_enabled: bool,
    /// Failure handling for the guarded operation.
    pub operation_failure_policy: OperationFailurePolicy,
}

impl Properties {
    pub const ENV_LOCK_GUARD_ENABLED: &'static str = "MIZAR_LOCK_GUARD_ENABLED";
    pub const ENV_OPERATION_FAILURE_POLICY: &'static str = "MIZAR_OPERATION_FAILURE_POLICY";

    /// Defaults overridden by environment variables where present.
    pub fn from_env() -> Self {
        let mut properties = Properties::default();
        if let Some(enabled) = EnvUtils::get_env_bool(Self::ENV_LOCK_GUARD_ENABLED) {
            properties.lock_guard_enabled = enabled;
        }
        if let Some(policy) = EnvUtils::get_env_str(Self::ENV_OPERATION_FAILURE_POLICY) {
            match OperationFailurePolicy::from_str(&policy) {
                Ok(policy) => properties.operation_failure_policy = policy,
                Err(_) => warn!(
                    "unrecognized {} value: {}",
                    Self::ENV_OPERATION_FAILURE_POLICY,
                    policy
                ),
            }
        }
        properties
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            lock_guard_enabled: true,
            operation_failure_policy: OperationFailurePolicy::Swallow,
        }
    }
}
