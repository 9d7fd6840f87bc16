//! coursetrack core data models.
//!
//! This crate defines the fundamental data structures for the
//! learner-progress tracking engine.

#![warn(missing_docs)]

// Core identities
mod id;

// Curriculum structure
mod course;

// Learner state
mod enrollment;
mod state;
mod timelog;

// Re-exports
pub use id::*;

// Curriculum
pub use course::{Course, Module, Lesson};

// Learner state
pub use enrollment::{Enrollment, EnrollmentSnapshot};
pub use state::{ModuleState, LockReason};
pub use timelog::{TimeLogEntry, EntityType};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
