mod properties;

pub use properties::{OperationFailurePolicy, Properties};
