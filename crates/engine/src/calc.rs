//! Completion percentage calculation.

use coursetrack_core::{LessonId, Module};
use std::collections::HashSet;

/// Aggregate completion percentage for a whole course, 0-100.
///
/// Lessons in `completed` that are no longer part of the curriculum do
/// not count; a course with no lessons reports 0.
pub fn course_progress(completed: &HashSet<LessonId>, modules: &[Module]) -> u8 {
    let total: usize = modules.iter().map(|m| m.lessons.len()).sum();
    let done = modules
        .iter()
        .flat_map(|m| m.lessons.iter())
        .filter(|l| completed.contains(&l.id))
        .count();
    percentage(done, total)
}

/// Completion percentage for one module's lessons, 0-100.
///
/// An empty module reports 100 (vacuously complete).
pub fn module_progress(completed: &HashSet<LessonId>, module: &Module) -> u8 {
    if module.lessons.is_empty() {
        return 100;
    }
    let done = module
        .lessons
        .iter()
        .filter(|l| completed.contains(&l.id))
        .count();
    percentage(done, module.lessons.len())
}

/// First incomplete lesson in course order (module order, then lesson
/// order within module). Lock-agnostic: callers that present this as an
/// actionable "resume here" must filter locked modules themselves.
pub fn next_lesson(modules: &[Module], completed: &HashSet<LessonId>) -> Option<LessonId> {
    modules
        .iter()
        .flat_map(|m| m.lessons.iter())
        .map(|l| l.id)
        .find(|id| !completed.contains(id))
}

fn percentage(done: usize, total: usize) -> u8 {
    let ratio = done as f64 / total.max(1) as f64;
    (ratio * 100.0).round() as u8
}
