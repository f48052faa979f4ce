//! Small shared helpers.

use crate::errors::AutomationError;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shared cancellation slot. Wrapped in a `RwLock` so `reset_cancellation`
/// can install a fresh token; every clone of a toolkit shares the same slot.
pub(crate) type CancellationSlot = Arc<RwLock<CancellationToken>>;

pub(crate) fn new_cancellation_slot() -> CancellationSlot {
    Arc::new(RwLock::new(CancellationToken::new()))
}

pub(crate) fn current_token(slot: &CancellationSlot) -> CancellationToken {
    slot.read()
        .map(|token| token.clone())
        .unwrap_or_else(|_| CancellationToken::new())
}

/// Sleep that races the cancellation token. Cancellation wins when both are
/// ready, so an already-cancelled token fails even a zero-length suspension.
pub(crate) async fn cancellable_sleep(
    token: &CancellationToken,
    duration: Duration,
    what: &str,
) -> Result<(), AutomationError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AutomationError::OperationCancelled(format!(
            "{what} cancelled by stop_execution"
        ))),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Linear interpolation between two scalars at `progress` in `[0, 1]`.
pub(crate) fn lerp(start: f64, end: f64, progress: f64) -> f64 {
    start + (end - start) * progress
}
