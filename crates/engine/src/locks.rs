//! Module lock evaluation.
//!
//! Computes, for an ordered list of modules and a completion set, the
//! lock/unlock/awaiting-validation status of every module. Pure and
//! deterministic; callers re-evaluate after every mutation instead of
//! caching the result.

use coursetrack_core::{LessonId, LockReason, Module, ModuleState};
use std::collections::HashSet;

/// Evaluate lock state for every module, in order.
///
/// With `sequential == false` nothing is ever locked. With
/// `sequential == true` the lock decision for module *i* is the carry
/// produced while evaluating module *i - 1*, so a module's state depends
/// only on earlier modules. The first module is never locked.
///
/// Modules with no lessons are vacuously complete and never block
/// progression; curriculum placeholders must not deadlock the sequence.
pub fn evaluate(
    modules: &[Module],
    completed: &HashSet<LessonId>,
    sequential: bool,
) -> Vec<ModuleState> {
    if !sequential {
        return modules
            .iter()
            .map(|m| {
                let done = module_completed(m, completed);
                ModuleState::unlocked(done, m.requires_validation && done)
            })
            .collect();
    }

    let mut states = Vec::with_capacity(modules.len());
    let mut locked_for_next = false;
    let mut reason_for_next = None;

    for module in modules {
        let done = module_completed(module, completed);

        // Lock decision for this module comes from the carry, before the
        // carry is updated using this module.
        states.push(ModuleState {
            is_locked: locked_for_next,
            locked_reason: reason_for_next,
            awaiting_validation: module.requires_validation && done,
            module_completed: done,
        });

        (locked_for_next, reason_for_next) = if !done {
            (true, Some(LockReason::PreviousIncomplete))
        } else if module.requires_validation && !module.unlocks_next_module {
            (true, Some(LockReason::AwaitingValidation))
        } else if !module.unlocks_next_module {
            (true, Some(LockReason::AdminLocked))
        } else {
            (false, None)
        };
    }

    states
}

/// A module is completed when every lesson is in the completion set;
/// an empty module is vacuously complete.
pub fn module_completed(module: &Module, completed: &HashSet<LessonId>) -> bool {
    module.lessons.iter().all(|l| completed.contains(&l.id))
}
