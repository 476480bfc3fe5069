mod sync;

pub use sync::{Lock, LockHandle};
