//! Multi-touch contact tracking
//!
//! Touch events arrive from the platform's event-delivery context and are
//! folded into a [`TouchRegistry`]. Ended and cancelled contacts are removed
//! rather than stored, so a contact id goes absent → active → absent.

pub mod registry;

pub use registry::TouchRegistry;

use serde::{Deserialize, Serialize};

/// 2D coordinate in device pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Stored phase of a live contact
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Began,
    Moved,
}

/// State of one active contact
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub position: Position,
    pub phase: TouchPhase,
}

/// One entry of a touch snapshot, as handed to readers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: i32,
    pub position: Position,
    pub phase: TouchPhase,
}

/// Position of one pointer inside a batched move event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub id: i32,
    pub position: Position,
}

/// Raw touch event as delivered by the event source
#[derive(Clone, Debug, PartialEq)]
pub enum TouchEvent {
    /// First finger down or an additional pointer down
    Begin { id: i32, position: Position },
    /// All pointers currently reported by the source
    Move { pointers: Vec<PointerSample> },
    /// One pointer lifted
    End { id: i32 },
    /// Gesture aborted, every contact is invalid
    Cancel,
}
