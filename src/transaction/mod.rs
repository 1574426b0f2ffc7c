//! Transaction contracts for dbscope.
//!
//! A transaction is scoped to a single helper operation: it is begun
//! immediately before the caller's task runs, committed when the task
//! returns `Ok`, and rolled back when it returns `Err`. Helpers never leak a
//! transaction past the end of an operation.

mod contract;
mod isolation;

pub use contract::Transaction;
pub use isolation::IsolationLevel;
