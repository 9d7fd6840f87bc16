//! Progression controller
//!
//! Orchestrates the pure engine over the persistence collaborators:
//! lesson selection, completion toggles with optimistic publish and
//! compensating rollback, the active-time timer, time-log emission and
//! reconciliation with the server-push feed.

#![warn(missing_docs)]

pub mod clock;
pub mod controller;
pub mod error;
pub mod session;

pub use clock::{Clock, SystemClock};
pub use controller::{ContentOpener, ProgressView, ProgressionController, STARTED_PROGRESS_FLOOR};
pub use error::ControllerError;
pub use session::{CachedCurriculum, CourseSession};
