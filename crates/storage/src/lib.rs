//! Persistence collaborators for coursetrack.
//!
//! This crate provides the trait seams the progression controller talks
//! to (curriculum, enrollments, time log, push feed) and a JSON-file
//! reference implementation.

#![warn(missing_docs)]

pub mod json_storage;
pub mod trait_;

pub use json_storage::JsonStorage;
pub use trait_::{
    CurriculumSource, EnrollmentStore, PushFeed, Result, StorageError, TimeLogSink,
};
