//! Pointer and keyboard gesture composition
//!
//! The [`Interactor`] synthesizes primitive events and sequences them into
//! compound gestures with fixed inter-step timing. Every coordinate-taking
//! gesture resolves its target element at execution time; nothing is cached
//! across suspension points.

use crate::errors::AutomationError;
use crate::events::{EventKind, EventTarget, MouseButton, SyntheticEvent};
use crate::page::{ElementRef, PageEngine};
use crate::types::{
    BatchOptions, ClickOptions, ClickOutcome, DragOptions, DragOutcome, GestureOutcome, Point,
    TypeOptions, TypeOutcome,
};
use crate::utils::{self, CancellationSlot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Gap between the two clicks of a double-click, in milliseconds.
pub const DOUBLE_CLICK_GAP_MS: u64 = 50;
/// Number of interpolated move events in a drag gesture.
pub const DRAG_STEPS: u32 = 20;

/// One interaction operation, as submitted to a batch.
///
/// Serializes externally tagged (`{"click": {...}}`), the shape page
/// scripts submit operation lists in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InteractionOp {
    Click {
        x: f64,
        y: f64,
        #[serde(default)]
        options: ClickOptions,
    },
    DoubleClick {
        x: f64,
        y: f64,
        #[serde(default)]
        options: ClickOptions,
    },
    RightClick {
        x: f64,
        y: f64,
        #[serde(default)]
        options: ClickOptions,
    },
    Type {
        x: f64,
        y: f64,
        text: String,
        #[serde(default)]
        options: TypeOptions,
    },
    Drag {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        #[serde(default)]
        options: DragOptions,
    },
}

impl InteractionOp {
    pub fn click(x: f64, y: f64) -> Self {
        Self::Click {
            x,
            y,
            options: ClickOptions::default(),
        }
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Self::DoubleClick {
            x,
            y,
            options: ClickOptions::default(),
        }
    }

    pub fn right_click(x: f64, y: f64) -> Self {
        Self::RightClick {
            x,
            y,
            options: ClickOptions::default(),
        }
    }

    pub fn type_text(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self::Type {
            x,
            y,
            text: text.into(),
            options: TypeOptions::default(),
        }
    }

    pub fn drag(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self::Drag {
            start_x,
            start_y,
            end_x,
            end_y,
            options: DragOptions::default(),
        }
    }

    /// Parse an operation list from a JSON script.
    pub fn ops_from_json(json: &str) -> Result<Vec<Self>, AutomationError> {
        serde_json::from_str(json)
            .map_err(|e| AutomationError::InvalidArgument(format!("invalid operation script: {e}")))
    }
}

/// Per-operation result, positionally aligned with the submitted batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionOutcome {
    Click(ClickOutcome),
    DoubleClick(GestureOutcome),
    RightClick(GestureOutcome),
    Type(TypeOutcome),
    Drag(DragOutcome),
}

impl InteractionOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            InteractionOutcome::Click(_) => "click",
            InteractionOutcome::DoubleClick(_) => "doubleClick",
            InteractionOutcome::RightClick(_) => "rightClick",
            InteractionOutcome::Type(_) => "type",
            InteractionOutcome::Drag(_) => "drag",
        }
    }
}

/// Capability surface the scroll layer needs from the interaction layer.
///
/// Implemented by [`Interactor`]; injected rather than discovered, so a
/// missing provider is an explicit wiring decision, not a loading accident.
#[async_trait]
pub trait InteractionProvider: Send + Sync {
    async fn click_at(
        &self,
        point: Point,
        options: &ClickOptions,
    ) -> Result<ClickOutcome, AutomationError>;

    async fn perform(
        &self,
        operation: &InteractionOp,
    ) -> Result<InteractionOutcome, AutomationError>;
}

/// Synthesizes input events and sequences compound gestures.
pub struct Interactor {
    engine: Arc<dyn PageEngine>,
    cancellation_token: CancellationSlot,
}

impl Interactor {
    pub fn new(engine: Arc<dyn PageEngine>) -> Self {
        Self::with_cancellation(engine, utils::new_cancellation_slot())
    }

    pub(crate) fn with_cancellation(
        engine: Arc<dyn PageEngine>,
        cancellation_token: CancellationSlot,
    ) -> Self {
        Self {
            engine,
            cancellation_token,
        }
    }

    fn token(&self) -> CancellationToken {
        utils::current_token(&self.cancellation_token)
    }

    async fn pause(&self, duration: Duration, what: &str) -> Result<(), AutomationError> {
        utils::cancellable_sleep(&self.token(), duration, what).await
    }

    /// Wait the configured delay, then resolve the element at `point` and
    /// dispatch a click on it. Lookup and dispatch run back to back with no
    /// suspension in between.
    #[instrument(skip(self, options))]
    pub async fn click_at(
        &self,
        point: Point,
        options: &ClickOptions,
    ) -> Result<ClickOutcome, AutomationError> {
        if options.delay_ms > 0 {
            self.pause(Duration::from_millis(options.delay_ms), "click delay")
                .await?;
        }
        let element = self.engine.element_at(point).await?.ok_or_else(|| {
            AutomationError::ElementNotFound(format!("no element at {point}"))
        })?;
        let event = SyntheticEvent::click(point, options.button, options.modifiers());
        self.engine
            .dispatch(&EventTarget::Element(element.clone()), event)
            .await?;
        debug!(element = %element, "dispatched click at {point}");
        Ok(ClickOutcome {
            tag_name: element.tag.clone(),
            element,
            coordinates: point,
        })
    }

    /// Two clicks 50 ms apart, then a dedicated `dblclick` event if the
    /// point is still occupied. Losing the element between the second click
    /// and the dblclick is not a failure.
    #[instrument(skip(self, options))]
    pub async fn double_click(
        &self,
        point: Point,
        options: &ClickOptions,
    ) -> Result<GestureOutcome, AutomationError> {
        self.click_at(point, options).await?;
        self.pause(Duration::from_millis(DOUBLE_CLICK_GAP_MS), "double-click gap")
            .await?;
        self.click_at(point, options).await?;

        if let Some(element) = self.engine.element_at(point).await? {
            self.engine
                .dispatch(
                    &EventTarget::Element(element),
                    SyntheticEvent::pointer(EventKind::DblClick, point),
                )
                .await?;
        }
        Ok(GestureOutcome {
            coordinates: point,
            event_type: EventKind::DblClick,
        })
    }

    /// A secondary-button click followed by a `contextmenu` event at the
    /// same point.
    #[instrument(skip(self, options))]
    pub async fn right_click(
        &self,
        point: Point,
        options: &ClickOptions,
    ) -> Result<GestureOutcome, AutomationError> {
        let mut click = options.clone();
        click.button = MouseButton::Secondary;
        self.click_at(point, &click).await?;

        if let Some(element) = self.engine.element_at(point).await? {
            let event = SyntheticEvent::pointer(EventKind::ContextMenu, point)
                .with_button(MouseButton::Secondary);
            self.engine
                .dispatch(&EventTarget::Element(element), event)
                .await?;
        }
        Ok(GestureOutcome {
            coordinates: point,
            event_type: EventKind::ContextMenu,
        })
    }

    /// A focusing click, an optional clear, then one keydown/input/keyup
    /// triplet per character with a per-character delay. Elements without a
    /// text value still receive the key events, just no input events.
    #[instrument(skip(self, text, options), fields(chars = text.len()))]
    pub async fn type_text(
        &self,
        point: Point,
        text: &str,
        options: &TypeOptions,
    ) -> Result<TypeOutcome, AutomationError> {
        self.click_at(point, &options.click).await?;

        let element = self.engine.element_at(point).await?.ok_or_else(|| {
            AutomationError::ElementNotFound(format!(
                "no element at {point} after focusing click"
            ))
        })?;

        if options.clear && self.engine.text_value(&element).await?.is_some() {
            self.engine.set_text_value(&element, "").await?;
        }

        for ch in text.chars() {
            self.engine
                .dispatch(
                    &EventTarget::Element(element.clone()),
                    SyntheticEvent::key(EventKind::KeyDown, ch),
                )
                .await?;

            if let Some(mut value) = self.engine.text_value(&element).await? {
                value.push(ch);
                self.engine.set_text_value(&element, &value).await?;
                self.engine
                    .dispatch(
                        &EventTarget::Element(element.clone()),
                        SyntheticEvent::input(ch.to_string()),
                    )
                    .await?;
            }

            self.engine
                .dispatch(
                    &EventTarget::Element(element.clone()),
                    SyntheticEvent::key(EventKind::KeyUp, ch),
                )
                .await?;

            if options.typing_delay_ms > 0 {
                self.pause(Duration::from_millis(options.typing_delay_ms), "typing delay")
                    .await?;
            }
        }

        Ok(TypeOutcome {
            coordinates: point,
            text: text.to_string(),
            tag_name: element.tag,
        })
    }

    /// Press down on the element at `start`, interpolate 20 move events on
    /// the document over the configured duration, release at `end`. Only
    /// the initial lookup can fail; the path may cross empty space.
    #[instrument(skip(self, options))]
    pub async fn drag(
        &self,
        start: Point,
        end: Point,
        options: &DragOptions,
    ) -> Result<DragOutcome, AutomationError> {
        let origin = self.engine.element_at(start).await?.ok_or_else(|| {
            AutomationError::ElementNotFound(format!("no element at drag start {start}"))
        })?;
        self.engine
            .dispatch(
                &EventTarget::Element(origin),
                SyntheticEvent::pointer(EventKind::MouseDown, start),
            )
            .await?;

        let step_gap =
            Duration::from_secs_f64(options.duration_ms as f64 / DRAG_STEPS as f64 / 1000.0);
        for step in 1..=DRAG_STEPS {
            let progress = step as f64 / DRAG_STEPS as f64;
            let at = Point::new(
                utils::lerp(start.x, end.x, progress),
                utils::lerp(start.y, end.y, progress),
            );
            self.engine
                .dispatch(
                    &EventTarget::Document,
                    SyntheticEvent::pointer(EventKind::MouseMove, at),
                )
                .await?;
            self.pause(step_gap, "drag step").await?;
        }

        self.engine
            .dispatch(
                &EventTarget::Document,
                SyntheticEvent::pointer(EventKind::MouseUp, end),
            )
            .await?;
        Ok(DragOutcome { start, end })
    }

    /// Execute operations strictly in submission order with a uniform delay
    /// between completions. The first failure aborts the rest; no partial
    /// result list is returned.
    #[instrument(skip(self, operations, options), fields(operations = operations.len()))]
    pub async fn batch(
        &self,
        operations: &[InteractionOp],
        options: &BatchOptions,
    ) -> Result<Vec<InteractionOutcome>, AutomationError> {
        let mut results = Vec::with_capacity(operations.len());
        for (index, operation) in operations.iter().enumerate() {
            let outcome = self.perform(operation).await?;
            results.push(outcome);
            if options.delay_between_ms > 0 && index + 1 < operations.len() {
                self.pause(
                    Duration::from_millis(options.delay_between_ms),
                    "batch delay",
                )
                .await?;
            }
        }
        Ok(results)
    }

    /// Dispatch a single operation to the matching gesture.
    pub async fn perform(
        &self,
        operation: &InteractionOp,
    ) -> Result<InteractionOutcome, AutomationError> {
        match operation {
            InteractionOp::Click { x, y, options } => self
                .click_at(Point::new(*x, *y), options)
                .await
                .map(InteractionOutcome::Click),
            InteractionOp::DoubleClick { x, y, options } => self
                .double_click(Point::new(*x, *y), options)
                .await
                .map(InteractionOutcome::DoubleClick),
            InteractionOp::RightClick { x, y, options } => self
                .right_click(Point::new(*x, *y), options)
                .await
                .map(InteractionOutcome::RightClick),
            InteractionOp::Type {
                x,
                y,
                text,
                options,
            } => self
                .type_text(Point::new(*x, *y), text, options)
                .await
                .map(InteractionOutcome::Type),
            InteractionOp::Drag {
                start_x,
                start_y,
                end_x,
                end_y,
                options,
            } => self
                .drag(
                    Point::new(*start_x, *start_y),
                    Point::new(*end_x, *end_y),
                    options,
                )
                .await
                .map(InteractionOutcome::Drag),
        }
    }
}

#[async_trait]
impl InteractionProvider for Interactor {
    async fn click_at(
        &self,
        point: Point,
        options: &ClickOptions,
    ) -> Result<ClickOutcome, AutomationError> {
        Interactor::click_at(self, point, options).await
    }

    async fn perform(
        &self,
        operation: &InteractionOp,
    ) -> Result<InteractionOutcome, AutomationError> {
        Interactor::perform(self, operation).await
    }
}
