//! Unit tests for gesture composition, scroll computation, and batch
//! sequencing, all running against the in-memory page under tokio's paused
//! clock so timing assertions are exact.

mod batch_tests;
mod scroll_tests;
mod support;
