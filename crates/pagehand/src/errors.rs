use thiserror::Error;

/// Errors surfaced by input synthesis, gesture sequencing, and scrolling.
///
/// Compound gestures and batches propagate the first failure unchanged and
/// abort their remaining steps; there is no internal retry or recovery.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutomationError {
    /// No element occupies the queried point, or a selector matched nothing.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A symbolic scroll direction outside `up`, `down`, `left`, `right`.
    #[error("invalid scroll direction: {0}")]
    InvalidDirection(String),

    /// A required collaborator (e.g. the interaction layer behind a
    /// scroll-and-click) is not wired into the calling object.
    #[error("module unavailable: {0}")]
    ModuleUnavailable(String),

    /// The engine failed to construct or dispatch a synthetic event.
    #[error("event dispatch failed: {0}")]
    DispatchFailed(String),

    /// Malformed input, e.g. an operation script that does not parse.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A suspension point was interrupted by `stop_execution()`.
    #[error("operation cancelled: {0}")]
    OperationCancelled(String),
}
