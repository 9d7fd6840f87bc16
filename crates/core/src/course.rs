//! Curriculum model - courses, modules, lessons.

use serde::{Deserialize, Serialize};
use crate::id::{CourseId, LessonId, ModuleId};

/// A course is an ordered list of modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,

    /// Course title
    pub title: String,

    /// Ordered modules
    pub modules: Vec<Module>,

    /// If true, a module is inaccessible until the previous one
    /// satisfies its unlock conditions.
    pub sequential_modules: bool,
}

impl Course {
    /// All lesson ids in course order (module order, then lesson order).
    pub fn lesson_ids(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter().map(|l| l.id))
    }

    /// Total lesson count across all modules.
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Whether the given lesson belongs to this course.
    pub fn contains_lesson(&self, id: LessonId) -> bool {
        self.lesson_ids().any(|l| l == id)
    }

    /// The module owning the given lesson, if any.
    pub fn module_of(&self, id: LessonId) -> Option<&Module> {
        self.modules
            .iter()
            .find(|m| m.lessons.iter().any(|l| l.id == id))
    }

    /// Look up a lesson by id.
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter())
            .find(|l| l.id == id)
    }
}

/// A module is an ordered group of lessons; the unit of sequential gating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Unique identifier
    pub id: ModuleId,

    /// Module title
    pub title: String,

    /// Ordered lessons
    pub lessons: Vec<Lesson>,

    /// An instructor must approve completion before this module
    /// contributes to unlocking the next one.
    pub requires_validation: bool,

    /// Administrative override; if false, the module never unlocks the
    /// next one even when fully completed.
    pub unlocks_next_module: bool,
}

/// A lesson is the atomic content unit; the unit of completion tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier
    pub id: LessonId,

    /// Lesson title
    pub title: String,

    /// Free-text duration estimate (e.g. "30 min"), used only as a
    /// fallback when no timer time was recorded.
    pub duration_hint: Option<String>,

    /// Reference to external content (URL or asset key).
    pub content_ref: Option<String>,
}
