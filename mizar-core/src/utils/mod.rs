mod lock_key_utils;

pub use lock_key_utils::LockKeyUtils;
