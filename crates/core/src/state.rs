//! Derived module state - lock evaluation output.

use serde::{Deserialize, Serialize};

/// Why a module is locked for the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockReason {
    /// The previous module is not fully completed.
    PreviousIncomplete,
    /// The previous module is completed but awaits instructor validation.
    AwaitingValidation,
    /// The previous module never unlocks the next one (admin override).
    AdminLocked,
}

impl std::fmt::Display for LockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            LockReason::PreviousIncomplete => "finish this module to unlock the next",
            LockReason::AwaitingValidation => "an instructor must validate this module",
            LockReason::AdminLocked => "this module is locked by an administrator",
        };
        f.write_str(msg)
    }
}

/// Lock/unlock status of one module, computed fresh from the course and
/// completion set on every evaluation - never cached across mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleState {
    /// Whether the learner may work on this module
    pub is_locked: bool,

    /// Reason shown when locked
    pub locked_reason: Option<LockReason>,

    /// Fully completed but requires an instructor's approval
    pub awaiting_validation: bool,

    /// All lessons completed (vacuously true for empty modules)
    pub module_completed: bool,
}

impl ModuleState {
    /// An unlocked state with no pending validation.
    pub fn unlocked(module_completed: bool, awaiting_validation: bool) -> Self {
        Self {
            is_locked: false,
            locked_reason: None,
            awaiting_validation,
            module_completed,
        }
    }
}
