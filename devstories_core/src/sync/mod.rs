//! Keeping view state in step with the remote API.
//!
//! Reads run on worker threads and report back as messages; each message
//! touches only its own slice of view state. Writes go through the same path
//! and either patch the affected records or trigger a fresh read.

mod debounce;
mod orchestrator;
mod slice;
mod ticket;

pub use debounce::Debouncer;
pub use orchestrator::{FetchOrchestrator, Job};
pub use slice::ListSlice;
pub use ticket::{ViewEpoch, ViewTicket};
