//! Time-log model - records of active time spent on a course.

use serde::{Deserialize, Serialize};
use crate::id::{CourseId, EntryId};
use crate::Time;

/// What kind of entity a time-log entry is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A course (the only kind emitted by the progression engine).
    Course,
}

/// One logged block of active time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeLogEntry {
    /// Unique identifier
    pub id: EntryId,

    /// Entity kind
    pub entity_type: EntityType,

    /// Course the time was spent on
    pub course_id: CourseId,

    /// Display title (usually the lesson title)
    pub title: String,

    /// When the time was logged
    pub date: Time,

    /// Active minutes (>= 1)
    pub duration_minutes: u32,

    /// Free-text description
    pub description: String,
}

impl TimeLogEntry {
    /// Create a course-scoped entry.
    pub fn course(
        course_id: CourseId,
        title: impl Into<String>,
        date: Time,
        duration_minutes: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            entity_type: EntityType::Course,
            course_id,
            title: title.into(),
            date,
            duration_minutes,
            description: description.into(),
        }
    }
}
