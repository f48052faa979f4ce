//! In-memory page engine
//!
//! Models a scrollable document holding absolutely positioned elements and
//! records every dispatched event, so tests and dry runs can assert on the
//! exact event stream a gesture produces. Element bounds are stored in
//! document coordinates; hit-testing and bounding rectangles account for the
//! current scroll offset the way a real page would.

use super::{ElementRef, PageEngine};
use crate::errors::AutomationError;
use crate::events::{EventKind, EventTarget, SyntheticEvent};
use crate::types::{Point, Rect, ScrollAlignment, ScrollBehavior, ScrollPosition};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use tracing::trace;

/// A dispatched event together with the target it was dispatched on.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    pub target: EventTarget,
    pub event: SyntheticEvent,
}

struct NodeScroll {
    content_width: f64,
    content_height: f64,
    x: f64,
    y: f64,
}

struct Node {
    id: u64,
    tag: String,
    dom_id: Option<String>,
    /// Document coordinates.
    bounds: Rect,
    /// `Some` for text-capable elements (inputs, textareas).
    value: Option<String>,
    scroll: Option<NodeScroll>,
}

struct PageState {
    client_width: f64,
    client_height: f64,
    content_width: f64,
    content_height: f64,
    offset: Point,
    nodes: Vec<Node>,
    events: Vec<DispatchRecord>,
    overlay_visible: bool,
    next_id: u64,
}

impl PageState {
    fn max_x(&self) -> f64 {
        (self.content_width - self.client_width).max(0.0)
    }

    fn max_y(&self) -> f64 {
        (self.content_height - self.client_height).max(0.0)
    }

    fn node(&self, element: &ElementRef) -> Result<&Node, AutomationError> {
        self.nodes
            .iter()
            .find(|n| n.id == element.id)
            .ok_or_else(|| {
                AutomationError::ElementNotFound(format!("{element} is no longer attached"))
            })
    }

    fn node_mut(&mut self, element: &ElementRef) -> Result<&mut Node, AutomationError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == element.id)
            .ok_or_else(|| {
                AutomationError::ElementNotFound(format!("{element} is no longer attached"))
            })
    }
}

/// The in-memory [`PageEngine`] used by the test suite and examples.
pub struct VirtualPage {
    state: Mutex<PageState>,
}

impl Default for VirtualPage {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl VirtualPage {
    /// A page whose content initially matches the viewport (nothing to
    /// scroll until [`set_content_size`](Self::set_content_size) grows it).
    pub fn new(client_width: f64, client_height: f64) -> Self {
        Self {
            state: Mutex::new(PageState {
                client_width,
                client_height,
                content_width: client_width,
                content_height: client_height,
                offset: Point::default(),
                nodes: Vec::new(),
                events: Vec::new(),
                overlay_visible: false,
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_content_size(&self, width: f64, height: f64) {
        let mut state = self.lock();
        state.content_width = width;
        state.content_height = height;
    }

    fn insert(
        &self,
        tag: &str,
        dom_id: Option<&str>,
        bounds: Rect,
        value: Option<String>,
        scroll: Option<NodeScroll>,
    ) -> ElementRef {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let tag = tag.to_ascii_lowercase();
        state.nodes.push(Node {
            id,
            tag: tag.clone(),
            dom_id: dom_id.map(str::to_string),
            bounds,
            value,
            scroll,
        });
        ElementRef { id, tag }
    }

    /// Add an element with no text value. Later elements sit on top of
    /// earlier ones where bounds overlap.
    pub fn add_element(&self, tag: &str, bounds: Rect) -> ElementRef {
        self.insert(tag, None, bounds, None, None)
    }

    /// Add an element addressable by `#id` selector.
    pub fn add_element_with_id(&self, tag: &str, dom_id: &str, bounds: Rect) -> ElementRef {
        self.insert(tag, Some(dom_id), bounds, None, None)
    }

    /// Add a text-capable element with an empty value.
    pub fn add_input(&self, tag: &str, bounds: Rect) -> ElementRef {
        self.insert(tag, None, bounds, Some(String::new()), None)
    }

    /// Add a text-capable element with an existing value.
    pub fn add_input_with_value(&self, tag: &str, bounds: Rect, value: &str) -> ElementRef {
        self.insert(tag, None, bounds, Some(value.to_string()), None)
    }

    /// Add an element that scrolls its own content independently of the
    /// document.
    pub fn add_scroll_container(
        &self,
        tag: &str,
        bounds: Rect,
        content_width: f64,
        content_height: f64,
    ) -> ElementRef {
        self.insert(
            tag,
            None,
            bounds,
            None,
            Some(NodeScroll {
                content_width,
                content_height,
                x: 0.0,
                y: 0.0,
            }),
        )
    }

    /// Detach an element, as if a page script removed it.
    pub fn remove(&self, element: &ElementRef) {
        let mut state = self.lock();
        state.nodes.retain(|n| n.id != element.id);
    }

    /// The element's current text value, for assertions.
    pub fn value_of(&self, element: &ElementRef) -> Option<String> {
        let state = self.lock();
        state
            .nodes
            .iter()
            .find(|n| n.id == element.id)
            .and_then(|n| n.value.clone())
    }

    /// Every event dispatched so far, in dispatch order.
    pub fn events(&self) -> Vec<DispatchRecord> {
        self.lock().events.clone()
    }

    /// Dispatched events of one kind, in dispatch order.
    pub fn events_of(&self, kind: EventKind) -> Vec<DispatchRecord> {
        self.lock()
            .events
            .iter()
            .filter(|r| r.event.kind == kind)
            .cloned()
            .collect()
    }

    pub fn clear_events(&self) {
        self.lock().events.clear();
    }

    /// Current document scroll offset.
    pub fn offset(&self) -> Point {
        self.lock().offset
    }

    /// Current scroll offset of a scroll container, for assertions.
    pub fn element_offset(&self, element: &ElementRef) -> Option<Point> {
        let state = self.lock();
        state
            .nodes
            .iter()
            .find(|n| n.id == element.id)
            .and_then(|n| n.scroll.as_ref())
            .map(|s| Point::new(s.x, s.y))
    }

    pub fn overlay_visible(&self) -> bool {
        self.lock().overlay_visible
    }
}

fn align(start: f64, size: f64, current: f64, viewport: f64, alignment: ScrollAlignment) -> f64 {
    match alignment {
        ScrollAlignment::Start => start,
        ScrollAlignment::Center => start + size / 2.0 - viewport / 2.0,
        ScrollAlignment::End => start + size - viewport,
        ScrollAlignment::Nearest => {
            if start >= current && start + size <= current + viewport {
                current
            } else if start < current {
                start
            } else {
                start + size - viewport
            }
        }
    }
}

#[async_trait]
impl PageEngine for VirtualPage {
    async fn element_at(&self, point: Point) -> Result<Option<ElementRef>, AutomationError> {
        let state = self.lock();
        if point.x < 0.0
            || point.y < 0.0
            || point.x >= state.client_width
            || point.y >= state.client_height
        {
            return Ok(None);
        }
        let doc = Point::new(point.x + state.offset.x, point.y + state.offset.y);
        Ok(state
            .nodes
            .iter()
            .rev()
            .find(|n| n.bounds.contains(doc))
            .map(|n| ElementRef {
                id: n.id,
                tag: n.tag.clone(),
            }))
    }

    async fn find_element(&self, selector: &str) -> Result<Option<ElementRef>, AutomationError> {
        let state = self.lock();
        let found = if let Some(id) = selector.strip_prefix('#') {
            state
                .nodes
                .iter()
                .find(|n| n.dom_id.as_deref() == Some(id))
        } else {
            state.nodes.iter().find(|n| n.tag == selector)
        };
        Ok(found.map(|n| ElementRef {
            id: n.id,
            tag: n.tag.clone(),
        }))
    }

    async fn dispatch(
        &self,
        target: &EventTarget,
        event: SyntheticEvent,
    ) -> Result<(), AutomationError> {
        let mut state = self.lock();
        trace!(kind = %event.kind, ?target, "virtual page dispatch");
        state.events.push(DispatchRecord {
            target: target.clone(),
            event,
        });
        Ok(())
    }

    async fn text_value(&self, element: &ElementRef) -> Result<Option<String>, AutomationError> {
        let state = self.lock();
        Ok(state.node(element)?.value.clone())
    }

    async fn set_text_value(
        &self,
        element: &ElementRef,
        value: &str,
    ) -> Result<(), AutomationError> {
        let mut state = self.lock();
        state.node_mut(element)?.value = Some(value.to_string());
        Ok(())
    }

    async fn scroll_position(
        &self,
        target: Option<&ElementRef>,
    ) -> Result<ScrollPosition, AutomationError> {
        let state = self.lock();
        match target {
            None => Ok(ScrollPosition {
                x: state.offset.x,
                y: state.offset.y,
                scroll_width: state.content_width,
                scroll_height: state.content_height,
                client_width: state.client_width,
                client_height: state.client_height,
            }),
            Some(element) => {
                let node = state.node(element)?;
                match &node.scroll {
                    Some(s) => Ok(ScrollPosition {
                        x: s.x,
                        y: s.y,
                        scroll_width: s.content_width,
                        scroll_height: s.content_height,
                        client_width: node.bounds.width,
                        client_height: node.bounds.height,
                    }),
                    // Non-scrollable elements report content == client.
                    None => Ok(ScrollPosition {
                        x: 0.0,
                        y: 0.0,
                        scroll_width: node.bounds.width,
                        scroll_height: node.bounds.height,
                        client_width: node.bounds.width,
                        client_height: node.bounds.height,
                    }),
                }
            }
        }
    }

    async fn scroll_to(
        &self,
        target: Option<&ElementRef>,
        x: f64,
        y: f64,
        _behavior: ScrollBehavior,
    ) -> Result<(), AutomationError> {
        let mut state = self.lock();
        match target {
            None => {
                let (max_x, max_y) = (state.max_x(), state.max_y());
                state.offset = Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y));
            }
            Some(element) => {
                let node = state.node_mut(element)?;
                let bounds = node.bounds;
                if let Some(s) = node.scroll.as_mut() {
                    s.x = x.clamp(0.0, (s.content_width - bounds.width).max(0.0));
                    s.y = y.clamp(0.0, (s.content_height - bounds.height).max(0.0));
                }
            }
        }
        Ok(())
    }

    async fn scroll_by(
        &self,
        target: Option<&ElementRef>,
        dx: f64,
        dy: f64,
        behavior: ScrollBehavior,
    ) -> Result<(), AutomationError> {
        let current = self.scroll_position(target).await?;
        self.scroll_to(target, current.x + dx, current.y + dy, behavior)
            .await
    }

    async fn scroll_into_view(
        &self,
        element: &ElementRef,
        block: ScrollAlignment,
        inline: ScrollAlignment,
        _behavior: ScrollBehavior,
    ) -> Result<(), AutomationError> {
        let mut state = self.lock();
        let bounds = state.node(element)?.bounds;
        let x = align(
            bounds.x,
            bounds.width,
            state.offset.x,
            state.client_width,
            inline,
        );
        let y = align(
            bounds.y,
            bounds.height,
            state.offset.y,
            state.client_height,
            block,
        );
        let (max_x, max_y) = (state.max_x(), state.max_y());
        state.offset = Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y));
        Ok(())
    }

    async fn bounding_rect(&self, element: &ElementRef) -> Result<Rect, AutomationError> {
        let state = self.lock();
        let bounds = state.node(element)?.bounds;
        Ok(Rect::new(
            bounds.x - state.offset.x,
            bounds.y - state.offset.y,
            bounds.width,
            bounds.height,
        ))
    }

    async fn show_coordinate_overlay(&self) -> Result<(), AutomationError> {
        self.lock().overlay_visible = true;
        Ok(())
    }

    async fn hide_coordinate_overlay(&self) -> Result<(), AutomationError> {
        self.lock().overlay_visible = false;
        Ok(())
    }
}
