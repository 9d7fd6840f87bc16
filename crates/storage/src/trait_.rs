//! Collaborator trait abstractions.

use async_trait::async_trait;
use coursetrack_core::{Course, CourseId, Enrollment, EnrollmentSnapshot, TimeLogEntry, UserId};
use tokio::sync::mpsc;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Read access to curriculum structure.
///
/// Implementations are not expected to cache; the controller layer
/// memoizes per course id so repeated mounts do not re-fetch.
#[async_trait]
pub trait CurriculumSource: Send + Sync {
    /// Load a course with its modules and lessons.
    async fn load_course(&self, id: CourseId) -> Result<Option<Course>>;
}

/// Persisted learner state, one record per (course, user) pair.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Load an enrollment, if one exists.
    async fn get_enrollment(
        &self,
        course_id: CourseId,
        user_id: UserId,
    ) -> Result<Option<Enrollment>>;

    /// Create or update an enrollment.
    async fn upsert_enrollment(&mut self, enrollment: &Enrollment) -> Result<()>;
}

/// Append-only sink for time-log records.
///
/// Fire-and-forget from the controller's perspective: append failures
/// are logged, never surfaced to the learner.
#[async_trait]
pub trait TimeLogSink: Send + Sync {
    /// Append one entry.
    async fn append(&mut self, entry: &TimeLogEntry) -> Result<()>;
}

/// Server-push update feed for enrollment snapshots.
#[async_trait]
pub trait PushFeed: Send + Sync {
    /// Subscribe to snapshots for one (course, user) pair. Dropping the
    /// receiver unsubscribes.
    async fn subscribe(
        &self,
        course_id: CourseId,
        user_id: UserId,
    ) -> Result<mpsc::Receiver<EnrollmentSnapshot>>;
}
