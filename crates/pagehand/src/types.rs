//! Shared geometry, option records, and gesture outcomes
//!
//! Option records mirror the keys page scripts submit (serde names follow
//! the script vocabulary: `delay`, `typingDelay`, `duration`, ...); every
//! field is optional with a per-operation default.

use crate::events::{Modifiers, MouseButton};
use crate::page::ElementRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default per-character delay while typing, in milliseconds.
pub const DEFAULT_TYPING_DELAY_MS: u64 = 100;
/// Default total duration of a drag gesture, in milliseconds.
pub const DEFAULT_DRAG_DURATION_MS: u64 = 500;
/// Default delay between operations in a gesture batch, in milliseconds.
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1000;
/// Default settle delay after issuing a scroll request, in milliseconds.
pub const DEFAULT_SETTLE_MS: u64 = 500;
/// Default gap between the scroll and the click of a combined
/// scroll-and-click, in milliseconds.
pub const DEFAULT_CLICK_DELAY_MS: u64 = 300;
/// Default delay between batch-orchestrator steps, in milliseconds.
pub const DEFAULT_OPERATION_DELAY_MS: u64 = 300;

/// A viewport pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Scroll offset plus content/viewport extents for a scrollable target.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
}

impl ScrollPosition {
    /// Maximum horizontal scroll offset.
    pub fn max_x(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    /// Maximum vertical scroll offset.
    pub fn max_y(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn offset(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Requested scroll animation behavior, forwarded to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Auto,
}

/// Alignment of a scrolled-into-view element within its viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAlignment {
    Start,
    Center,
    End,
    Nearest,
}

/// Options for a single synthesized click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClickOptions {
    /// Wait this long before resolving the element and dispatching.
    #[serde(rename = "delay")]
    pub delay_ms: u64,
    pub button: MouseButton,
    pub ctrl_key: bool,
    pub shift_key: bool,
}

impl ClickOptions {
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl_key,
            shift: self.shift_key,
        }
    }
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            button: MouseButton::Primary,
            ctrl_key: false,
            shift_key: false,
        }
    }
}

/// Options for typing text at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeOptions {
    /// Clear the target's current text value before typing.
    pub clear: bool,
    #[serde(rename = "typingDelay")]
    pub typing_delay_ms: u64,
    /// Options for the focusing click that precedes typing.
    #[serde(flatten)]
    pub click: ClickOptions,
}

impl Default for TypeOptions {
    fn default() -> Self {
        Self {
            clear: false,
            typing_delay_ms: DEFAULT_TYPING_DELAY_MS,
            click: ClickOptions::default(),
        }
    }
}

/// Options for a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragOptions {
    /// Total duration of the gesture; each interpolation step gets an even
    /// share.
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DRAG_DURATION_MS,
        }
    }
}

/// Options for a gesture-level batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchOptions {
    #[serde(rename = "delayBetween")]
    pub delay_between_ms: u64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay_between_ms: DEFAULT_BATCH_DELAY_MS,
        }
    }
}

/// Options for a scroll request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    /// Settle delay after the scroll request is issued.
    #[serde(rename = "duration")]
    pub settle_ms: u64,
    /// Scroll this element instead of the document viewport.
    pub element: Option<ElementRef>,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            behavior: ScrollBehavior::default(),
            settle_ms: DEFAULT_SETTLE_MS,
            element: None,
        }
    }
}

/// Options for scrolling an element into view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollToElementOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollAlignment,
    pub inline: ScrollAlignment,
    #[serde(rename = "duration")]
    pub settle_ms: u64,
}

impl Default for ScrollToElementOptions {
    fn default() -> Self {
        Self {
            behavior: ScrollBehavior::default(),
            block: ScrollAlignment::Start,
            inline: ScrollAlignment::Nearest,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

/// Options for the combined scroll-then-click convenience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollAndClickOptions {
    #[serde(rename = "scrollDuration")]
    pub scroll_settle_ms: u64,
    #[serde(rename = "clickDelay")]
    pub click_delay_ms: u64,
    pub click: ClickOptions,
}

impl Default for ScrollAndClickOptions {
    fn default() -> Self {
        Self {
            scroll_settle_ms: DEFAULT_SETTLE_MS,
            click_delay_ms: DEFAULT_CLICK_DELAY_MS,
            click: ClickOptions::default(),
        }
    }
}

/// Options for the batch orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchOperateOptions {
    /// Settle duration handed to each step's scroll directive.
    #[serde(rename = "scrollDelay")]
    pub scroll_delay_ms: u64,
    /// Delay after a scroll directive and between steps.
    #[serde(rename = "operationDelay")]
    pub operation_delay_ms: u64,
}

impl Default for BatchOperateOptions {
    fn default() -> Self {
        Self {
            scroll_delay_ms: DEFAULT_SETTLE_MS,
            operation_delay_ms: DEFAULT_OPERATION_DELAY_MS,
        }
    }
}

/// Result of a completed click.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickOutcome {
    /// The element resolved at dispatch time.
    pub element: ElementRef,
    pub tag_name: String,
    pub coordinates: Point,
}

/// Result of a completed compound pointer gesture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureOutcome {
    pub coordinates: Point,
    /// The dedicated event this gesture ends with (`dblclick`,
    /// `contextmenu`).
    pub event_type: crate::events::EventKind,
}

/// Result of a completed typing gesture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOutcome {
    pub coordinates: Point,
    pub text: String,
    pub tag_name: String,
}

/// Result of a completed drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragOutcome {
    pub start: Point,
    pub end: Point,
}
