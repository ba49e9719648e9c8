//! Registry mapping human-readable action names to integer codes.
//!
//! Codes are dense and start at 0, in definition order. Call trees only
//! store codes; names are resolved through this registry at export time.

use crate::utils::config::UNKNOWN_ACTION_PREFIX;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Integer identifier of an action
pub type ActionCode = i32;

#[derive(Debug, Default)]
struct Registry {
    names: Vec<String>,
    codes: HashMap<String, ActionCode>,
}

/// Thread-safe set of known actions
///
/// Shared between trees as an `Arc<ActionsSet>`; new actions can be
/// defined at any time, including while trees referencing the set exist.
#[derive(Debug, Default)]
pub struct ActionsSet {
    registry: RwLock<Registry>,
}

impl ActionsSet {
    /// Create an empty actions set
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new action and return its code
    ///
    /// Defining a name twice returns the code it already has.
    pub fn define_new_action(&self, name: &str) -> ActionCode {
        let mut registry = self.write();

        if let Some(&code) = registry.codes.get(name) {
            return code;
        }

        let code = registry.names.len() as ActionCode;
        registry.names.push(name.to_string());
        registry.codes.insert(name.to_string(), code);

        debug!("Defined action '{}' with code {}", name, code);
        code
    }

    /// Resolve an action code to its name
    ///
    /// Codes that were never defined resolve to a placeholder name
    /// built from [`UNKNOWN_ACTION_PREFIX`] so exports stay well-formed.
    pub fn get_action_name(&self, code: ActionCode) -> String {
        let registry = self.read();

        usize::try_from(code)
            .ok()
            .and_then(|index| registry.names.get(index))
            .cloned()
            .unwrap_or_else(|| format!("{}{}", UNKNOWN_ACTION_PREFIX, code))
    }

    /// Look up the code of a defined action
    pub fn get_action_code(&self, name: &str) -> Option<ActionCode> {
        self.read().codes.get(name).copied()
    }

    /// Check whether `code` names a defined action
    pub fn contains_code(&self, code: ActionCode) -> bool {
        usize::try_from(code).is_ok_and(|index| index < self.read().names.len())
    }

    /// Number of defined actions
    pub fn len(&self) -> usize {
        self.read().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(|poisoned| {
            warn!("Actions set lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(|poisoned| {
            warn!("Actions set lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}
