//! Page input synthesis through an injected engine capability
//!
//! This crate provides a Playwright-style API for simulating user input
//! (clicks, drags, typing, scrolling) against a live page. All page reads
//! and writes go through the [`PageEngine`] trait, so the same gesture and
//! batch sequencing runs against a webview bridge, a devtools connection,
//! or the in-memory [`VirtualPage`] used for testing.

use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{info, instrument};

pub mod errors;
pub mod events;
pub mod interactor;
pub mod overlay;
pub mod page;
pub mod scroller;
#[cfg(test)]
mod tests;
pub mod types;
mod utils;

pub use errors::AutomationError;
pub use events::{EventKind, EventTarget, Modifiers, MouseButton, SyntheticEvent};
pub use interactor::{
    InteractionOp, InteractionOutcome, InteractionProvider, Interactor, DOUBLE_CLICK_GAP_MS,
    DRAG_STEPS,
};
pub use overlay::CoordinateOverlay;
pub use page::{DispatchRecord, ElementRef, PageEngine, VirtualPage};
pub use scroller::{
    BatchStep, ElementTarget, ScrollAndClickOutcome, ScrollByOutcome, ScrollDirection, ScrollOp,
    ScrollOutcome, ScrollTarget, ScrollToElementOutcome, Scroller,
};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    BatchOperateOptions, BatchOptions, ClickOptions, ClickOutcome, DragOptions, DragOutcome,
    GestureOutcome, Point, Rect, ScrollAlignment, ScrollAndClickOptions, ScrollBehavior,
    ScrollOptions, ScrollPosition, ScrollToElementOptions, TypeOptions, TypeOutcome,
};

/// The main entry point for page input synthesis.
///
/// Owns the interaction layer, the scroll layer (with the interaction layer
/// injected for combined operations), the coordinate overlay, and one
/// shared cancellation slot. Clones share everything, so `stop_execution`
/// on any clone interrupts them all.
pub struct Toolkit {
    engine: Arc<dyn PageEngine>,
    interactor: Arc<Interactor>,
    scroller: Arc<Scroller>,
    overlay: Arc<CoordinateOverlay>,
    /// Cancellation token for stopping execution (wrapped in RwLock to allow reset)
    cancellation_token: Arc<RwLock<CancellationToken>>,
}

impl Toolkit {
    pub fn new(engine: Arc<dyn PageEngine>) -> Self {
        let cancellation_token = utils::new_cancellation_slot();
        let interactor = Arc::new(Interactor::with_cancellation(
            engine.clone(),
            cancellation_token.clone(),
        ));
        let provider: Arc<dyn InteractionProvider> = interactor.clone();
        let scroller = Arc::new(Scroller::with_parts(
            engine.clone(),
            Some(provider),
            cancellation_token.clone(),
        ));
        let overlay = Arc::new(CoordinateOverlay::new(engine.clone()));
        Self {
            engine,
            interactor,
            scroller,
            overlay,
            cancellation_token,
        }
    }

    /// The engine this toolkit was built over.
    pub fn engine(&self) -> &Arc<dyn PageEngine> {
        &self.engine
    }

    pub fn interactor(&self) -> &Interactor {
        &self.interactor
    }

    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    pub fn overlay(&self) -> &CoordinateOverlay {
        &self.overlay
    }

    // ============== INTERACTION LAYER ==============

    #[instrument(skip(self, options))]
    pub async fn click(
        &self,
        x: f64,
        y: f64,
        options: &ClickOptions,
    ) -> Result<ClickOutcome, AutomationError> {
        self.interactor.click_at(Point::new(x, y), options).await
    }

    #[instrument(skip(self, options))]
    pub async fn double_click(
        &self,
        x: f64,
        y: f64,
        options: &ClickOptions,
    ) -> Result<GestureOutcome, AutomationError> {
        self.interactor.double_click(Point::new(x, y), options).await
    }

    #[instrument(skip(self, options))]
    pub async fn right_click(
        &self,
        x: f64,
        y: f64,
        options: &ClickOptions,
    ) -> Result<GestureOutcome, AutomationError> {
        self.interactor.right_click(Point::new(x, y), options).await
    }

    #[instrument(skip(self, text, options))]
    pub async fn type_text(
        &self,
        x: f64,
        y: f64,
        text: &str,
        options: &TypeOptions,
    ) -> Result<TypeOutcome, AutomationError> {
        self.interactor
            .type_text(Point::new(x, y), text, options)
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn drag(
        &self,
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        options: &DragOptions,
    ) -> Result<DragOutcome, AutomationError> {
        self.interactor
            .drag(Point::new(start_x, start_y), Point::new(end_x, end_y), options)
            .await
    }

    /// Execute a gesture-level batch; see [`Interactor::batch`].
    pub async fn batch(
        &self,
        operations: &[InteractionOp],
        options: &BatchOptions,
    ) -> Result<Vec<InteractionOutcome>, AutomationError> {
        self.interactor.batch(operations, options).await
    }

    // ============== SCROLL LAYER ==============

    #[instrument(skip(self, options))]
    pub async fn scroll(
        &self,
        direction: &str,
        distance: Option<f64>,
        options: &ScrollOptions,
    ) -> Result<ScrollOutcome, AutomationError> {
        self.scroller.scroll(direction, distance, options).await
    }

    #[instrument(skip(self, options))]
    pub async fn scroll_to_position(
        &self,
        target: ScrollTarget,
        options: &ScrollOptions,
    ) -> Result<ScrollOutcome, AutomationError> {
        self.scroller.scroll_to_position(target, options).await
    }

    #[instrument(skip(self, options))]
    pub async fn scroll_by(
        &self,
        dx: f64,
        dy: f64,
        options: &ScrollOptions,
    ) -> Result<ScrollByOutcome, AutomationError> {
        self.scroller.scroll_by(dx, dy, options).await
    }

    pub async fn scroll_to_element(
        &self,
        target: impl Into<ElementTarget>,
        options: &ScrollToElementOptions,
    ) -> Result<ScrollToElementOutcome, AutomationError> {
        self.scroller.scroll_to_element(target, options).await
    }

    #[instrument(skip(self, options))]
    pub async fn scroll_and_click(
        &self,
        scroll_x: f64,
        scroll_y: f64,
        click_x: f64,
        click_y: f64,
        options: &ScrollAndClickOptions,
    ) -> Result<ScrollAndClickOutcome, AutomationError> {
        self.scroller
            .scroll_and_click(scroll_x, scroll_y, click_x, click_y, options)
            .await
    }

    /// Execute a heterogeneous batch; see [`Scroller::batch_operate`].
    pub async fn batch_operate(
        &self,
        steps: &[BatchStep],
        options: &BatchOperateOptions,
    ) -> Result<Vec<InteractionOutcome>, AutomationError> {
        self.scroller.batch_operate(steps, options).await
    }

    /// Current scroll offset and extents for an element or the viewport.
    pub async fn position(
        &self,
        element: Option<&ElementRef>,
    ) -> Result<ScrollPosition, AutomationError> {
        self.scroller.position(element).await
    }

    // ============== CANCELLATION ==============

    /// Cancel the shared token, interrupting every suspended step in every
    /// clone of this toolkit. In-flight operations surface
    /// `OperationCancelled`.
    pub fn stop_execution(&self) {
        info!("stopping all in-flight operations");
        if let Ok(token) = self.cancellation_token.read() {
            token.cancel();
        }
    }

    /// Install a fresh token so new operations can run after
    /// `stop_execution`.
    pub fn reset_cancellation(&self) {
        if let Ok(mut token) = self.cancellation_token.write() {
            if token.is_cancelled() {
                info!("resetting cancellation state for new operations");
                *token = CancellationToken::new();
            }
        }
    }

    /// Get a clone of the current cancellation token for use in async
    /// operations.
    pub fn cancellation_token(&self) -> CancellationToken {
        utils::current_token(&self.cancellation_token)
    }

    /// Delay execution for a specified number of milliseconds, interruptible
    /// by `stop_execution`.
    pub async fn delay(&self, delay_ms: u64) -> Result<(), AutomationError> {
        utils::cancellable_sleep(
            &self.cancellation_token(),
            Duration::from_millis(delay_ms),
            "delay",
        )
        .await
    }
}

impl Clone for Toolkit {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            interactor: self.interactor.clone(),
            scroller: self.scroller.clone(),
            overlay: self.overlay.clone(),
            // Clones share the same cancellation slot so stop_execution
            // affects all of them.
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}
