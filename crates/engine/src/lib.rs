//! Progression engine (pure logic)
//!
//! Module lock evaluation, completion percentages, the per-lesson
//! active-time timer and duration-hint parsing. Everything here is
//! deterministic: time is passed in, never sampled.

#![warn(missing_docs)]

pub mod calc;
pub mod duration;
pub mod locks;
pub mod timer;

pub use calc::{course_progress, module_progress, next_lesson};
pub use duration::{format_elapsed, parse_duration_hint, DEFAULT_LOG_MINUTES};
pub use locks::evaluate;
pub use timer::LessonTimer;
