mod lock_spec;

pub use lock_spec::LockSpec;
