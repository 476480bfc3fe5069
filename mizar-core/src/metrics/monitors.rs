pub struct Monitors;

impl Monitors {
    pub fn error(class_name: &str, method_name: &str) {}

    pub fn record_acquire_lock_unsuccessful() {}

    pub fn record_guarded_operation_error() {}

    pub fn record_lock_held_time(duration_ms: i64) {}
}
