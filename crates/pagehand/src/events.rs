//! Synthetic event model
//!
//! Events are plain data handed to the [`PageEngine`](crate::page::PageEngine);
//! the engine owns the actual dispatch into the page. Every event is built
//! bubbling and cancelable, matching what a hand-written page listener would
//! expect from real user input.

use crate::page::ElementRef;
use crate::types::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mouse button carried by pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

impl MouseButton {
    /// The DOM `MouseEvent.button` code for this button.
    pub fn code(self) -> u8 {
        match self {
            MouseButton::Primary => 0,
            MouseButton::Auxiliary => 1,
            MouseButton::Secondary => 2,
        }
    }
}

/// Modifier flags carried by pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// The kind of synthetic event being dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    DblClick,
    ContextMenu,
    MouseDown,
    MouseMove,
    MouseUp,
    KeyDown,
    KeyUp,
    Input,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DblClick => "dblclick",
            EventKind::ContextMenu => "contextmenu",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseUp => "mouseup",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::Input => "input",
        }
    }

    pub fn is_pointer(self) -> bool {
        matches!(
            self,
            EventKind::Click
                | EventKind::DblClick
                | EventKind::ContextMenu
                | EventKind::MouseDown
                | EventKind::MouseMove
                | EventKind::MouseUp
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event is dispatched: a concrete element or the document itself
/// (drag move/release events go to the document so nothing needs to occupy
/// the path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTarget {
    Document,
    Element(ElementRef),
}

/// A synthesized input event.
///
/// Pointer events carry viewport coordinates, a button, and modifier flags;
/// keyboard events carry the key character; input events carry the inserted
/// data. Unused fields stay at their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticEvent {
    pub kind: EventKind,
    pub point: Option<Point>,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    pub key: Option<char>,
    pub data: Option<String>,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl SyntheticEvent {
    fn base(kind: EventKind) -> Self {
        Self {
            kind,
            point: None,
            button: MouseButton::Primary,
            modifiers: Modifiers::default(),
            key: None,
            data: None,
            bubbles: true,
            cancelable: true,
        }
    }

    /// A pointer event of the given kind at a viewport point.
    pub fn pointer(kind: EventKind, point: Point) -> Self {
        Self {
            point: Some(point),
            ..Self::base(kind)
        }
    }

    /// A click event carrying button and modifier state.
    pub fn click(point: Point, button: MouseButton, modifiers: Modifiers) -> Self {
        Self {
            point: Some(point),
            button,
            modifiers,
            ..Self::base(EventKind::Click)
        }
    }

    /// A keydown/keyup event for a single character.
    pub fn key(kind: EventKind, key: char) -> Self {
        Self {
            key: Some(key),
            ..Self::base(kind)
        }
    }

    /// An input event describing inserted text.
    pub fn input(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::base(EventKind::Input)
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
