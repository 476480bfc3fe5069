use crate::prelude::*;

/// Declaration of the lock an operation must hold while it runs. Supplied
/// once when the operation is registered and read-only at call time.
#[derive(Clone, Debug)]
pub struct LockSpec {
    /// Explicit lock name. When non-empty it is used verbatim and attribute
    /// based derivation is skipped entirely.
    pub lock_key: InlineStr,
    /// Ordered dotted paths, each rooted at a parameter name, whose resolved
    /// values discriminate the lock identity. A path whose root names no
    /// parameter contributes nothing.
    pub attribute_names: Vec<InlineStr>,
    /// How long an acquired lease is considered held if the holder never
    /// releases it (crash backstop). Must be bounded and positive.
    /// Defaults to 10 seconds.
    pub lease_time_ms: i64,
    /// How long an invocation blocks trying to acquire before being refused.
    /// WAIT_FOREVER_MS waits indefinitely, 0 attempts exactly once.
    /// Defaults to 5 seconds.
    pub wait_time_ms: i64,
    /// User-facing text surfaced when acquisition is refused.
    pub fail_msg: InlineStr,
}

impl LockSpec {
    pub const DEFAULT_LEASE_TIME_MS: i64 = 10_000;
    pub const DEFAULT_WAIT_TIME_MS: i64 = 5_000;
    /// Sentinel wait time meaning "block until the lock is acquired".
    pub const WAIT_FOREVER_MS: i64 = -1;
    pub const DEFAULT_FAIL_MSG: &'static str = "failed to acquire lock, please retry later";

    pub fn new() -> Self {
        Self {
            lock_key: InlineStr::new(),
            attribute_names: Vec::default(),
            lease_time_ms: Self::DEFAULT_LEASE_TIME_MS,
            wait_time_ms: Self::DEFAULT_WAIT_TIME_MS,
            fail_msg: Self::DEFAULT_FAIL_MSG.into(),
        }
    }

    pub fn with_lock_key(lock_key: impl Into<InlineStr>) -> Self {
        let mut spec = Self::new();
        spec.lock_key = lock_key.into();
        spec
    }

    pub fn with_attribute_names(attribute_names: Vec<InlineStr>) -> Self {
        let mut spec = Self::new();
        spec.attribute_names = attribute_names;
        spec
    }

    /// The lease bounds how long a crashed holder can wedge the lock, so it
    /// can never be infinite; the wait time may be, via the sentinel.
    pub fn validate(&self) -> MizResult<()> {
        if self.lease_time_ms <= 0 {
            return fmt_err!(
                InvalidLockSpec,
                "leaseTimeMs must be a bounded positive duration, got {}",
                self.lease_time_ms
            );
        }
        if self.wait_time_ms < 0 && self.wait_time_ms != Self::WAIT_FOREVER_MS {
            return fmt_err!(
                InvalidLockSpec,
                "waitTimeMs must be non-negative or WAIT_FOREVER_MS, got {}",
                self.wait_time_ms
            );
        }
        Ok(())
    }
}

impl Default for LockSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<serde_json::Value> for LockSpec {
    type Error = ErrorCode;
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let attribute_names = if let Some(json) = value.get("attributeNames") {
            if json.as_null().is_none() {
                let mut attribute_names = Vec::default();
                for v in json
                    .as_array()
                    .ok_or(ErrorCode::IllegalArgument("attributeNames invalid"))?
                {
                    if let Some(v) = v.as_str() {
                        attribute_names.push(v.into());
                    } else {
                        return fmt_err!(
                            IllegalArgument,
                            "attributeNames invalid, entries must be string"
                        );
                    }
                }
                attribute_names
            } else {
                Vec::default()
            }
        } else {
            Vec::default()
        };

        Ok(Self {
            lock_key: value
                .get("lockKey")
                .and_then(|x| x.as_str())
                .unwrap_or("")
                .trim()
                .into(),
            attribute_names,
            lease_time_ms: value
                .get("leaseTimeMs")
                .unwrap_or(&serde_json::json!(Self::DEFAULT_LEASE_TIME_MS))
                .as_i64()
                .ok_or(ErrorCode::IllegalArgument("leaseTimeMs invalid"))?,
            wait_time_ms: value
                .get("waitTimeMs")
                .unwrap_or(&serde_json::json!(Self::DEFAULT_WAIT_TIME_MS))
                .as_i64()
                .ok_or(ErrorCode::IllegalArgument("waitTimeMs invalid"))?,
            fail_msg: value
                .get("failMsg")
                .and_then(|x| x.as_str())
                .unwrap_or(Self::DEFAULT_FAIL_MSG)
                .trim()
                .into(),
        })
    }
}
