//! Concurrent input-state aggregation for touch, gamepad and action bindings.
//!
//! Producers (the platform's event-delivery context) push raw touch and motion
//! events into an [`InputAggregator`]; any number of reader contexts query a
//! coherent [`InputSnapshot`] at arbitrary times without blocking producers.
//!
//! # Architecture
//!
//! ```text
//! touch events  ──► TouchRegistry ─────────┐
//! motion events ──► GamepadStateHolder ────┼──► InputAggregator::query_snapshot()
//!                   ActionBindingTable ────┘
//! ```
//!
//! Each component is independently consistent. The aggregator never takes a
//! lock spanning more than one component.

pub mod aggregator;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod haptics;
pub mod mapping;
pub mod touch;

pub use aggregator::{
    Capabilities, InputAggregator, InputNotice, InputSnapshot, SnapshotReceiver,
};
pub use config::InputSettings;
pub use error::{InputError, Result};
