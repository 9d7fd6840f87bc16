//! Controller error taxonomy.
//!
//! Only persistence failures on the core mutation paths reach the
//! caller. Disallowed actions are silent no-ops (the UI is expected to
//! have disabled the control) and transient time-log failures are
//! logged and contained.

use coursetrack_core::CourseId;
use coursetrack_storage::StorageError;

/// Errors surfaced by the progression controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The enrollment upsert failed; the local mutation was rolled back.
    #[error("failed to persist enrollment: {0}")]
    Persistence(#[source] StorageError),

    /// The requested course does not exist in the curriculum source.
    #[error("course not found: {0}")]
    CourseNotFound(CourseId),

    /// A collaborator failed while opening the session.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
