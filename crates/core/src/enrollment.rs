//! Enrollment model - the persisted learner state for one course.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use crate::id::{CourseId, LessonId, UserId};
use crate::Time;

/// Persisted learner state for one (course, user) pair.
///
/// `completed_lessons` is the single source of truth for "done" status;
/// a lesson is done iff its id is a member. No per-lesson boolean exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    /// Course this enrollment belongs to
    pub course_id: CourseId,

    /// Learner
    pub user_id: UserId,

    /// Completion set
    pub completed_lessons: HashSet<LessonId>,

    /// Aggregate completion percentage (0-100)
    pub progress: u8,

    /// Free-text notes keyed by lesson
    pub notes: HashMap<LessonId, String>,

    /// Last update time
    pub updated_at: Time,
}

impl Enrollment {
    /// Create an empty enrollment (progress 0, nothing completed).
    pub fn new(course_id: CourseId, user_id: UserId, now: Time) -> Self {
        Self {
            course_id,
            user_id,
            completed_lessons: HashSet::new(),
            progress: 0,
            notes: HashMap::new(),
            updated_at: now,
        }
    }

    /// The remote-visible portion of this enrollment.
    pub fn snapshot(&self) -> EnrollmentSnapshot {
        EnrollmentSnapshot {
            completed_lessons: self.completed_lessons.clone(),
            progress: self.progress,
            notes: self.notes.clone(),
        }
    }
}

/// Snapshot delivered by the push feed and applied by reconciliation.
///
/// Last-writer-wins: applying a snapshot unconditionally replaces the
/// local completion set, progress and notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentSnapshot {
    /// Completion set
    pub completed_lessons: HashSet<LessonId>,

    /// Aggregate completion percentage (0-100)
    pub progress: u8,

    /// Free-text notes keyed by lesson
    pub notes: HashMap<LessonId, String>,
}
