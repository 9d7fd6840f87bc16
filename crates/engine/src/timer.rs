//! Per-lesson active-time timer.
//!
//! A value-type state machine with externally supplied timestamps, so
//! elapsed time can be computed on demand without a polling side effect.
//! A caller-owned interval may still poll for display purposes, but
//! correctness never depends on that poll.

use coursetrack_core::{LessonId, Time};

/// Tracks one lesson's accumulated active time across start/pause/resume.
///
/// At most one lesson is timed at a time. Starting a different lesson
/// discards the previous lesson's unsaved elapsed time; only completion
/// persists time, as a time-log entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonTimer {
    lesson_id: Option<LessonId>,
    started_at: Option<Time>,
    accumulated_ms: i64,
    running: bool,
}

impl LessonTimer {
    /// A fresh idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The lesson currently being timed, if any.
    pub fn lesson(&self) -> Option<LessonId> {
        self.lesson_id
    }

    /// Whether the timer is accumulating time right now.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start timing `lesson`.
    ///
    /// Same lesson, already running: no-op. Same lesson, paused: resume.
    /// Different lesson (or idle): reset and start from zero.
    pub fn start(&mut self, lesson: LessonId, now: Time) {
        if self.lesson_id == Some(lesson) {
            if self.running {
                return;
            }
            self.started_at = Some(now);
            self.running = true;
            return;
        }

        *self = Self {
            lesson_id: Some(lesson),
            started_at: Some(now),
            accumulated_ms: 0,
            running: true,
        };
    }

    /// Pause a running timer or resume a paused one. No-op when idle.
    pub fn pause_resume(&mut self, now: Time) {
        if self.lesson_id.is_none() {
            return;
        }
        if self.running {
            if let Some(started) = self.started_at.take() {
                self.accumulated_ms += (now - started).num_milliseconds().max(0);
            }
            self.running = false;
        } else {
            self.started_at = Some(now);
            self.running = true;
        }
    }

    /// Elapsed milliseconds for `lesson`; 0 when that lesson is not the
    /// one being timed (even if it was timed earlier and reset).
    pub fn elapsed_ms(&self, lesson: LessonId, now: Time) -> i64 {
        if self.lesson_id != Some(lesson) {
            return 0;
        }
        let live = match (self.running, self.started_at) {
            (true, Some(started)) => (now - started).num_milliseconds().max(0),
            _ => 0,
        };
        self.accumulated_ms + live
    }

    /// Back to idle, discarding any unsaved time.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Convert elapsed milliseconds to loggable minutes: nearest whole
    /// minute, floored at 1. Returns `None` for zero (or negative)
    /// elapsed time, meaning "nothing to log from the timer".
    pub fn minutes_for_log(elapsed_ms: i64) -> Option<u32> {
        if elapsed_ms <= 0 {
            return None;
        }
        let minutes = (elapsed_ms as f64 / 60_000.0).round() as u32;
        Some(minutes.max(1))
    }
}
