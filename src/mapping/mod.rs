//! Logical action bindings
//!
//! Maps the fixed set of game actions to the physical inputs (key codes,
//! button names) that trigger them. Caller-supplied bindings cross an
//! untrusted boundary and are bounded before they are stored.

pub mod bindings;

pub use bindings::{Action, ActionBindingTable, BindingLimits};
