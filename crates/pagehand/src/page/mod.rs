//! The page capability seam
//!
//! Every page read and write goes through [`PageEngine`]; the toolkit never
//! touches a page directly. Real embeddings (a webview bridge, a devtools
//! connection) implement the trait once; the in-memory [`VirtualPage`] ships
//! with the crate for tests, examples, and dry runs.

use crate::errors::AutomationError;
use crate::events::{EventTarget, SyntheticEvent};
use crate::types::{Point, Rect, ScrollAlignment, ScrollBehavior, ScrollPosition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod virtual_page;

pub use virtual_page::{DispatchRecord, VirtualPage};

/// Handle to an element resolved at a specific moment.
///
/// The toolkit never caches these across suspension points; every
/// coordinate-taking operation re-resolves its target at execution time, so
/// an element that moved or disappeared in between shows up as a fresh
/// lookup failure rather than a stale reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    pub id: u64,
    /// Lower-case tag name, as reported by the page.
    pub tag: String,
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} #{}>", self.tag, self.id)
    }
}

/// Capability interface over a single live page.
///
/// Implementations must tolerate concurrent page mutation by real users or
/// page scripts; the toolkit's only defensive measure is re-resolving
/// elements immediately before dispatch.
#[async_trait]
pub trait PageEngine: Send + Sync {
    /// Hit-test the page at a viewport point. `None` when nothing occupies
    /// the point (including points outside the viewport).
    async fn element_at(&self, point: Point) -> Result<Option<ElementRef>, AutomationError>;

    /// Resolve a selector to the first matching element.
    async fn find_element(&self, selector: &str) -> Result<Option<ElementRef>, AutomationError>;

    /// Dispatch a synthesized event on the given target.
    async fn dispatch(
        &self,
        target: &EventTarget,
        event: SyntheticEvent,
    ) -> Result<(), AutomationError>;

    /// The element's current text value, or `None` when the element exposes
    /// no text value at all (a `div`, an image, ...).
    async fn text_value(&self, element: &ElementRef) -> Result<Option<String>, AutomationError>;

    /// Replace the element's text value.
    async fn set_text_value(
        &self,
        element: &ElementRef,
        value: &str,
    ) -> Result<(), AutomationError>;

    /// Current scroll offset and extents for an element, or for the document
    /// viewport when `target` is `None`.
    async fn scroll_position(
        &self,
        target: Option<&ElementRef>,
    ) -> Result<ScrollPosition, AutomationError>;

    /// Request an absolute scroll. The page clamps to its own bounds.
    async fn scroll_to(
        &self,
        target: Option<&ElementRef>,
        x: f64,
        y: f64,
        behavior: ScrollBehavior,
    ) -> Result<(), AutomationError>;

    /// Request a relative scroll by a signed delta.
    async fn scroll_by(
        &self,
        target: Option<&ElementRef>,
        dx: f64,
        dy: f64,
        behavior: ScrollBehavior,
    ) -> Result<(), AutomationError>;

    /// Bring an element into the viewport with the given alignment.
    async fn scroll_into_view(
        &self,
        element: &ElementRef,
        block: ScrollAlignment,
        inline: ScrollAlignment,
        behavior: ScrollBehavior,
    ) -> Result<(), AutomationError>;

    /// The element's bounding rectangle in viewport coordinates.
    async fn bounding_rect(&self, element: &ElementRef) -> Result<Rect, AutomationError>;

    /// Render the live cursor-coordinate readout.
    async fn show_coordinate_overlay(&self) -> Result<(), AutomationError>;

    /// Remove the live cursor-coordinate readout.
    async fn hide_coordinate_overlay(&self) -> Result<(), AutomationError>;
}
