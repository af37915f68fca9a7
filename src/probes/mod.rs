//! Probe implementations
//!
//! Each probe sends its requests one at a time, writes a human-readable
//! report to the given writer and returns the typed outcome to the caller.
//! No probe aborts part-way because of a failed exchange.

pub mod execute_check;
pub mod health;
pub mod interview_flow;
pub mod key_tester;
pub mod model_lister;
