use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::InputSettings;

/// Closed set of logical actions that can be bound
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    Action,
    Cancel,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Action,
        Action::Cancel,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Action::MoveForward => "moveForward",
            Action::MoveBackward => "moveBackward",
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::Jump => "jump",
            Action::Action => "action",
            Action::Cancel => "cancel",
        }
    }

    /// Compiled-in bindings used until the action is overridden
    pub fn default_bindings(self) -> &'static [&'static str] {
        match self {
            Action::MoveForward => &["KeyW", "ArrowUp"],
            Action::MoveBackward => &["KeyS", "ArrowDown"],
            Action::MoveLeft => &["KeyA", "ArrowLeft"],
            Action::MoveRight => &["KeyD", "ArrowRight"],
            Action::Jump => &["Space"],
            Action::Action => &["KeyE", "Enter"],
            Action::Cancel => &["Escape"],
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or(())
    }
}

/// Bounds applied to caller-supplied bindings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindingLimits {
    /// Entries past this count are dropped
    pub max_entries: usize,
    /// Entries of this length or longer are dropped
    pub max_length: usize,
}

impl Default for BindingLimits {
    fn default() -> Self {
        Self {
            max_entries: 5,
            max_length: 32,
        }
    }
}

impl From<&InputSettings> for BindingLimits {
    fn from(settings: &InputSettings) -> Self {
        Self {
            max_entries: settings.max_bindings_per_action,
            max_length: settings.max_binding_length,
        }
    }
}

/// Validated mapping from [`Action`] to an ordered list of physical inputs.
#[derive(Debug)]
pub struct ActionBindingTable {
    limits: BindingLimits,
    bindings: RwLock<HashMap<Action, Vec<String>>>,
}

impl Default for ActionBindingTable {
    fn default() -> Self {
        Self::new(BindingLimits::default())
    }
}

impl ActionBindingTable {
    pub fn new(limits: BindingLimits) -> Self {
        let bindings = Action::ALL
            .into_iter()
            .map(|action| {
                let defaults = action
                    .default_bindings()
                    .iter()
                    .map(|input| input.to_string())
                    .collect();
                (action, defaults)
            })
            .collect();

        Self {
            limits,
            bindings: RwLock::new(bindings),
        }
    }

    /// Replaces the list for `action` wholesale.
    ///
    /// Unknown action names are ignored. The list is cut to the first
    /// `max_entries` items before over-long entries are dropped, so dropping
    /// never pulls later items forward. Returns whether the action was known.
    pub fn set_bindings<S: AsRef<str>>(&self, action: &str, inputs: &[S]) -> bool {
        let Ok(action) = action.parse::<Action>() else {
            warn!("Ignoring bindings for unknown action {:?}", action);
            return false;
        };

        let bounded: Vec<String> = inputs
            .iter()
            .take(self.limits.max_entries)
            .map(AsRef::as_ref)
            .filter(|input| input.chars().count() < self.limits.max_length)
            .map(str::to_string)
            .collect();

        debug!("Binding {} to {:?}", action, bounded);
        self.bindings.write().insert(action, bounded);
        true
    }

    /// Applies every entry of a partial mapping.
    pub fn set_mapping<'a, I, S>(&self, mapping: I)
    where
        I: IntoIterator<Item = (&'a str, &'a [S])>,
        S: AsRef<str> + 'a,
    {
        for (action, inputs) in mapping {
            self.set_bindings(action, inputs);
        }
    }

    pub fn get_bindings(&self, action: Action) -> Vec<String> {
        self.bindings
            .read()
            .get(&action)
            .cloned()
            .unwrap_or_default()
    }

    /// Current bindings for every action, keyed by action name.
    pub fn all(&self) -> HashMap<Action, Vec<String>> {
        self.bindings.read().clone()
    }
}
