mod invocation;

pub use invocation::InvocationContext;
