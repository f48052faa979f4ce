//! Scroll computation, settle timing, and batch orchestration
//!
//! The [`Scroller`] turns symbolic directions and structured targets into
//! clamped absolute offsets, issues the scroll through the engine, and
//! waits a settle delay before resolving. It also hosts the heterogeneous
//! batch orchestrator, which interleaves scroll directives with interaction
//! directives executed through an injected [`InteractionProvider`].

use crate::errors::AutomationError;
use crate::interactor::{InteractionOp, InteractionOutcome, InteractionProvider};
use crate::page::{ElementRef, PageEngine};
use crate::types::{
    BatchOperateOptions, ClickOutcome, Point, Rect, ScrollAndClickOptions, ScrollOptions,
    ScrollPosition, ScrollToElementOptions,
};
use crate::utils::{self, CancellationSlot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// One of the four cardinal scroll directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for ScrollDirection {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(ScrollDirection::Up),
            "down" => Ok(ScrollDirection::Down),
            "left" => Ok(ScrollDirection::Left),
            "right" => Ok(ScrollDirection::Right),
            other => Err(AutomationError::InvalidDirection(format!(
                "{other}. expected one of: up, down, left, right"
            ))),
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::Left => "left",
            ScrollDirection::Right => "right",
        })
    }
}

/// A structured scroll destination.
///
/// One variant per mode; the old "first applicable flag wins" record cannot
/// be expressed any more. Directional variants move by `distance` from the
/// current offset, or snap to the relevant extreme when `distance` is
/// absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollTarget {
    Up {
        #[serde(default)]
        distance: Option<f64>,
    },
    Down {
        #[serde(default)]
        distance: Option<f64>,
    },
    Left {
        #[serde(default)]
        distance: Option<f64>,
    },
    Right {
        #[serde(default)]
        distance: Option<f64>,
    },
    /// Absolute offsets; an absent axis keeps its current offset.
    Absolute {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    /// Home both axes.
    Top,
    Bottom,
    LeftEdge,
    RightEdge,
}

impl ScrollTarget {
    pub fn absolute(x: f64, y: f64) -> Self {
        Self::Absolute {
            x: Some(x),
            y: Some(y),
        }
    }

    fn from_direction(direction: ScrollDirection, distance: Option<f64>) -> Self {
        match direction {
            ScrollDirection::Up => ScrollTarget::Up { distance },
            ScrollDirection::Down => ScrollTarget::Down { distance },
            ScrollDirection::Left => ScrollTarget::Left { distance },
            ScrollDirection::Right => ScrollTarget::Right { distance },
        }
    }
}

/// Match-arm order is the documented priority order: directional moves,
/// then absolute offsets, then edge snaps. Up/left subtract, down/right
/// add; everything clamps to `[0, max]` per axis.
fn resolve_target(target: ScrollTarget, current: &ScrollPosition) -> Point {
    let (max_x, max_y) = (current.max_x(), current.max_y());
    let (x, y) = match target {
        ScrollTarget::Up { distance } => (current.x, distance.map_or(0.0, |d| current.y - d)),
        ScrollTarget::Down { distance } => (current.x, distance.map_or(max_y, |d| current.y + d)),
        ScrollTarget::Left { distance } => (distance.map_or(0.0, |d| current.x - d), current.y),
        ScrollTarget::Right { distance } => (distance.map_or(max_x, |d| current.x + d), current.y),
        ScrollTarget::Absolute { x, y } => (x.unwrap_or(current.x), y.unwrap_or(current.y)),
        ScrollTarget::Top => (0.0, 0.0),
        ScrollTarget::Bottom => (current.x, max_y),
        ScrollTarget::LeftEdge => (0.0, current.y),
        ScrollTarget::RightEdge => (max_x, current.y),
    };
    Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// The scroll directive of a batch step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScrollOp {
    Direction {
        direction: ScrollDirection,
        #[serde(default)]
        distance: Option<f64>,
    },
    To(ScrollTarget),
}

/// One step of a heterogeneous batch: an optional scroll directive followed
/// by an optional interaction directive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchStep {
    pub scroll: Option<ScrollOp>,
    pub action: Option<InteractionOp>,
}

impl BatchStep {
    pub fn with_scroll(mut self, scroll: ScrollOp) -> Self {
        self.scroll = Some(scroll);
        self
    }

    pub fn with_action(mut self, action: InteractionOp) -> Self {
        self.action = Some(action);
        self
    }

    /// Parse a step list from a JSON script.
    pub fn steps_from_json(json: &str) -> Result<Vec<Self>, AutomationError> {
        serde_json::from_str(json)
            .map_err(|e| AutomationError::InvalidArgument(format!("invalid batch script: {e}")))
    }
}

/// An element reference or a lookup selector.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementTarget {
    Element(ElementRef),
    Selector(String),
}

impl From<ElementRef> for ElementTarget {
    fn from(element: ElementRef) -> Self {
        Self::Element(element)
    }
}

impl From<&ElementRef> for ElementTarget {
    fn from(element: &ElementRef) -> Self {
        Self::Element(element.clone())
    }
}

impl From<&str> for ElementTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ElementTarget {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

/// Result of a settled scroll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollOutcome {
    pub from: Point,
    pub to: Point,
    pub direction: Option<ScrollDirection>,
    pub distance: Option<f64>,
}

/// Result of a settled relative scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollByOutcome {
    pub dx: f64,
    pub dy: f64,
}

/// Result of scrolling an element into view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollToElementOutcome {
    pub element: ElementRef,
    /// Bounding rectangle after the scroll settled.
    pub rect: Rect,
}

/// Result of a combined scroll-then-click.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollAndClickOutcome {
    pub scroll_position: Point,
    pub click_position: Point,
    pub click: ClickOutcome,
}

/// Computes, issues, and settles scroll requests; orchestrates
/// heterogeneous batches.
pub struct Scroller {
    engine: Arc<dyn PageEngine>,
    interactions: Option<Arc<dyn InteractionProvider>>,
    cancellation_token: CancellationSlot,
}

impl Scroller {
    /// A scroller with no interaction layer wired in. Combined operations
    /// (`scroll_and_click`, batch steps with interaction directives) will
    /// fail with `ModuleUnavailable`.
    pub fn new(engine: Arc<dyn PageEngine>) -> Self {
        Self::with_parts(engine, None, utils::new_cancellation_slot())
    }

    pub fn with_interactions(
        engine: Arc<dyn PageEngine>,
        interactions: Arc<dyn InteractionProvider>,
    ) -> Self {
        Self::with_parts(engine, Some(interactions), utils::new_cancellation_slot())
    }

    pub(crate) fn with_parts(
        engine: Arc<dyn PageEngine>,
        interactions: Option<Arc<dyn InteractionProvider>>,
        cancellation_token: CancellationSlot,
    ) -> Self {
        Self {
            engine,
            interactions,
            cancellation_token,
        }
    }

    fn token(&self) -> CancellationToken {
        utils::current_token(&self.cancellation_token)
    }

    async fn pause(&self, duration: Duration, what: &str) -> Result<(), AutomationError> {
        utils::cancellable_sleep(&self.token(), duration, what).await
    }

    fn interactions(&self) -> Result<&Arc<dyn InteractionProvider>, AutomationError> {
        self.interactions.as_ref().ok_or_else(|| {
            AutomationError::ModuleUnavailable(
                "no interaction layer is wired into this scroller".to_string(),
            )
        })
    }

    /// Current scroll offset and extents for an element or the viewport.
    #[instrument(skip(self, element))]
    pub async fn position(
        &self,
        element: Option<&ElementRef>,
    ) -> Result<ScrollPosition, AutomationError> {
        self.engine.scroll_position(element).await
    }

    /// Scroll by symbolic direction. An unrecognized direction fails before
    /// any engine call.
    #[instrument(skip(self, options))]
    pub async fn scroll(
        &self,
        direction: &str,
        distance: Option<f64>,
        options: &ScrollOptions,
    ) -> Result<ScrollOutcome, AutomationError> {
        let direction: ScrollDirection = direction.parse()?;
        self.scroll_direction(direction, distance, options).await
    }

    /// Typed form of [`scroll`](Self::scroll).
    pub async fn scroll_direction(
        &self,
        direction: ScrollDirection,
        distance: Option<f64>,
        options: &ScrollOptions,
    ) -> Result<ScrollOutcome, AutomationError> {
        let mut outcome = self
            .scroll_to_position(ScrollTarget::from_direction(direction, distance), options)
            .await?;
        outcome.direction = Some(direction);
        outcome.distance = distance;
        Ok(outcome)
    }

    /// Scroll to a structured target, clamped to content bounds, then wait
    /// the settle delay.
    #[instrument(skip(self, options))]
    pub async fn scroll_to_position(
        &self,
        target: ScrollTarget,
        options: &ScrollOptions,
    ) -> Result<ScrollOutcome, AutomationError> {
        let element = options.element.as_ref();
        let current = self.engine.scroll_position(element).await?;
        let to = resolve_target(target, &current);
        self.engine
            .scroll_to(element, to.x, to.y, options.behavior)
            .await?;
        self.pause(Duration::from_millis(options.settle_ms), "scroll settle")
            .await?;
        debug!(from = %current.offset(), to = %to, "scroll settled");
        Ok(ScrollOutcome {
            from: current.offset(),
            to,
            direction: None,
            distance: None,
        })
    }

    /// Relative scroll by a signed delta, straight through the engine
    /// primitive. The page itself bounds the result, not the toolkit.
    #[instrument(skip(self, options))]
    pub async fn scroll_by(
        &self,
        dx: f64,
        dy: f64,
        options: &ScrollOptions,
    ) -> Result<ScrollByOutcome, AutomationError> {
        self.engine
            .scroll_by(options.element.as_ref(), dx, dy, options.behavior)
            .await?;
        self.pause(Duration::from_millis(options.settle_ms), "scroll settle")
            .await?;
        Ok(ScrollByOutcome { dx, dy })
    }

    /// Bring an element (by reference or selector) into view, wait the
    /// settle delay, and report its now-current bounding rectangle.
    #[instrument(skip(self, target, options))]
    pub async fn scroll_to_element(
        &self,
        target: impl Into<ElementTarget>,
        options: &ScrollToElementOptions,
    ) -> Result<ScrollToElementOutcome, AutomationError> {
        let element = match target.into() {
            ElementTarget::Element(element) => element,
            ElementTarget::Selector(selector) => self
                .engine
                .find_element(&selector)
                .await?
                .ok_or_else(|| {
                    AutomationError::ElementNotFound(format!(
                        "no element matches selector '{selector}'"
                    ))
                })?,
        };
        self.engine
            .scroll_into_view(&element, options.block, options.inline, options.behavior)
            .await?;
        self.pause(Duration::from_millis(options.settle_ms), "scroll settle")
            .await?;
        let rect = self.engine.bounding_rect(&element).await?;
        Ok(ScrollToElementOutcome { element, rect })
    }

    /// Exactly one absolute scroll followed by exactly one click, with a
    /// fixed gap between them. Requires the interaction layer, checked
    /// before anything scrolls.
    #[instrument(skip(self, options))]
    pub async fn scroll_and_click(
        &self,
        scroll_x: f64,
        scroll_y: f64,
        click_x: f64,
        click_y: f64,
        options: &ScrollAndClickOptions,
    ) -> Result<ScrollAndClickOutcome, AutomationError> {
        let interactions = self.interactions()?.clone();
        let scroll_options = ScrollOptions {
            settle_ms: options.scroll_settle_ms,
            ..ScrollOptions::default()
        };
        self.scroll_to_position(ScrollTarget::absolute(scroll_x, scroll_y), &scroll_options)
            .await?;
        self.pause(
            Duration::from_millis(options.click_delay_ms),
            "pre-click settle",
        )
        .await?;
        let click = interactions
            .click_at(Point::new(click_x, click_y), &options.click)
            .await?;
        Ok(ScrollAndClickOutcome {
            scroll_position: Point::new(scroll_x, scroll_y),
            click_position: Point::new(click_x, click_y),
            click,
        })
    }

    /// Execute steps strictly in order: scroll directive (settled with
    /// `scroll_delay_ms`), post-scroll delay, interaction directive,
    /// inter-step delay. The first failing step rejects the whole batch;
    /// interaction outcomes are returned only on full success.
    #[instrument(skip(self, steps, options), fields(steps = steps.len()))]
    pub async fn batch_operate(
        &self,
        steps: &[BatchStep],
        options: &BatchOperateOptions,
    ) -> Result<Vec<InteractionOutcome>, AutomationError> {
        let mut results = Vec::new();
        for (index, step) in steps.iter().enumerate() {
            if let Some(scroll) = &step.scroll {
                let scroll_options = ScrollOptions {
                    settle_ms: options.scroll_delay_ms,
                    ..ScrollOptions::default()
                };
                match scroll {
                    ScrollOp::Direction {
                        direction,
                        distance,
                    } => {
                        self.scroll_direction(*direction, *distance, &scroll_options)
                            .await?;
                    }
                    ScrollOp::To(target) => {
                        self.scroll_to_position(*target, &scroll_options).await?;
                    }
                }
                self.pause(
                    Duration::from_millis(options.operation_delay_ms),
                    "post-scroll delay",
                )
                .await?;
            }

            if let Some(action) = &step.action {
                let outcome = self.interactions()?.perform(action).await?;
                results.push(outcome);
            }

            if index + 1 < steps.len() {
                self.pause(
                    Duration::from_millis(options.operation_delay_ms),
                    "inter-step delay",
                )
                .await?;
            }
        }
        Ok(results)
    }
}
