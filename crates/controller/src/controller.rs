//! Progression & gating controller.
//!
//! Owns the local course/enrollment state and mutates it only through
//! the operations defined here. Lock state is re-evaluated from scratch
//! before every gated action; completion toggles publish optimistically
//! and roll back when the enrollment upsert fails.

use std::collections::HashSet;
use std::sync::Arc;

use coursetrack_core::{
    Course, Enrollment, EnrollmentSnapshot, LessonId, ModuleState, TimeLogEntry,
};
use coursetrack_engine::{
    course_progress, evaluate, next_lesson, parse_duration_hint, LessonTimer, DEFAULT_LOG_MINUTES,
};
use coursetrack_storage::{EnrollmentStore, TimeLogSink};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::ControllerError;

/// Nominal progress shown once a learner has started working, even
/// before the first lesson is marked complete. A UX floor, not a real
/// percentage.
pub const STARTED_PROGRESS_FLOOR: u8 = 5;

/// Opens a lesson's external content (presentation collaborator).
pub trait ContentOpener: Send + Sync {
    /// Open the referenced content.
    fn open(&self, content_ref: &str);
}

/// Observer-facing snapshot of the local state, published on every
/// mutation (optimistically, before persistence resolves).
#[derive(Debug, Clone, Default)]
pub struct ProgressView {
    /// Completion set
    pub completed_lessons: HashSet<LessonId>,

    /// Aggregate percentage (0-100)
    pub progress: u8,

    /// Lessons started but not completed
    pub in_progress: HashSet<LessonId>,

    /// Currently displayed lesson
    pub selected: Option<LessonId>,
}

/// Orchestrates lock evaluation, completion toggling, the lesson timer
/// and reconciliation for one (course, user) pair.
pub struct ProgressionController<S: EnrollmentStore + TimeLogSink> {
    store: Arc<Mutex<S>>,
    clock: Arc<dyn Clock>,
    opener: Option<Arc<dyn ContentOpener>>,

    course: Course,
    enrollment: Enrollment,
    in_progress: HashSet<LessonId>,
    timer: LessonTimer,
    selected: Option<LessonId>,

    view_tx: watch::Sender<ProgressView>,
    view_rx: watch::Receiver<ProgressView>,
}

impl<S: EnrollmentStore + TimeLogSink> ProgressionController<S> {
    /// Create a controller over already-loaded course and enrollment.
    pub fn new(
        course: Course,
        enrollment: Enrollment,
        store: Arc<Mutex<S>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (view_tx, view_rx) = watch::channel(ProgressView::default());
        let mut controller = Self {
            store,
            clock,
            opener: None,
            course,
            enrollment,
            in_progress: HashSet::new(),
            timer: LessonTimer::new(),
            selected: None,
            view_tx,
            view_rx,
        };
        controller.ensure_selection();
        controller.publish();
        controller
    }

    /// Set the presentation collaborator.
    pub fn with_opener(mut self, opener: Arc<dyn ContentOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    // === Observers ===

    /// Watch channel carrying the latest published view.
    pub fn subscribe(&self) -> watch::Receiver<ProgressView> {
        self.view_rx.clone()
    }

    /// Current course (curriculum structure).
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Completion set.
    pub fn completed(&self) -> &HashSet<LessonId> {
        &self.enrollment.completed_lessons
    }

    /// Aggregate percentage.
    pub fn progress(&self) -> u8 {
        self.enrollment.progress
    }

    /// Lessons started but not completed.
    pub fn in_progress(&self) -> &HashSet<LessonId> {
        &self.in_progress
    }

    /// Currently displayed lesson.
    pub fn selected(&self) -> Option<LessonId> {
        self.selected
    }

    /// Note text for a lesson.
    pub fn note(&self, lesson: LessonId) -> Option<&str> {
        self.enrollment.notes.get(&lesson).map(|s| s.as_str())
    }

    /// Fresh lock evaluation, one state per module in course order.
    pub fn module_states(&self) -> Vec<ModuleState> {
        evaluate(
            &self.course.modules,
            &self.enrollment.completed_lessons,
            self.course.sequential_modules,
        )
    }

    /// Elapsed active milliseconds for a lesson (0 unless it is the
    /// currently timed lesson).
    pub fn elapsed_ms(&self, lesson: LessonId) -> i64 {
        self.timer.elapsed_ms(lesson, self.clock.now())
    }

    /// Whether the timer is accumulating right now.
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// First incomplete lesson the learner can actually act on: course
    /// order, skipping lessons that sit in locked modules.
    pub fn resume_target(&self) -> Option<LessonId> {
        let states = self.module_states();
        self.course
            .modules
            .iter()
            .zip(states.iter())
            .filter(|(_, state)| !state.is_locked)
            .flat_map(|(module, _)| module.lessons.iter())
            .map(|l| l.id)
            .find(|id| !self.enrollment.completed_lessons.contains(id))
    }

    // === Operations ===

    /// Set the currently displayed lesson. Unknown ids fall back to the
    /// next incomplete lesson, then to the first lesson of the first
    /// module.
    pub fn select_lesson(&mut self, id: LessonId) {
        if self.course.contains_lesson(id) {
            self.selected = Some(id);
        } else {
            self.selected = self.fallback_selection();
        }
        self.publish();
    }

    /// Start working on a lesson: start/resume its timer, mark it
    /// in-progress, raise the progress floor, open its content.
    ///
    /// Silently rejected when the owning module is locked and the lesson
    /// is not already completed.
    pub fn start_lesson(&mut self, id: LessonId) {
        if !self.course.contains_lesson(id) {
            debug!(lesson = %id, "start rejected: unknown lesson");
            return;
        }
        if self.is_gated(id) {
            debug!(lesson = %id, "start rejected: module is locked");
            return;
        }

        self.timer.start(id, self.clock.now());
        if !self.enrollment.completed_lessons.contains(&id) {
            self.in_progress.insert(id);
        }
        if self.enrollment.progress == 0 {
            self.enrollment.progress = STARTED_PROGRESS_FLOOR;
        }
        self.selected = Some(id);
        self.publish();

        if let (Some(opener), Some(content)) = (
            self.opener.as_ref(),
            self.course.lesson(id).and_then(|l| l.content_ref.as_deref()),
        ) {
            opener.open(content);
        }
    }

    /// Toggle a lesson's completion.
    ///
    /// Applies the local flip and publishes before the upsert resolves;
    /// an upsert failure rolls the flip back and is the only error the
    /// caller sees. Completion emits exactly one time-log entry (timer
    /// elapsed, else duration hint, else the 5-minute default).
    pub async fn toggle_completion(&mut self, id: LessonId) -> Result<(), ControllerError> {
        if !self.course.contains_lesson(id) {
            debug!(lesson = %id, "toggle rejected: unknown lesson");
            return Ok(());
        }
        if self.is_gated(id) {
            debug!(lesson = %id, "toggle rejected: module is locked");
            return Ok(());
        }

        let now = self.clock.now();
        let was_completed = self.enrollment.completed_lessons.contains(&id);
        let previous = self.enrollment.clone();

        if was_completed {
            self.enrollment.completed_lessons.remove(&id);
        } else {
            self.enrollment.completed_lessons.insert(id);
        }
        // Both directions: a completed lesson is not "in progress", and
        // un-completing does not restore the marker either.
        self.in_progress.remove(&id);

        let computed = course_progress(&self.enrollment.completed_lessons, &self.course.modules);
        self.enrollment.progress = if computed == 0 && previous.progress > 0 {
            STARTED_PROGRESS_FLOOR
        } else {
            computed
        };
        self.enrollment.updated_at = now;

        // Optimistic publish, then persist.
        self.publish();

        let upsert = {
            let mut store = self.store.lock().await;
            store.upsert_enrollment(&self.enrollment).await
        };
        if let Err(e) = upsert {
            self.enrollment = previous;
            self.publish();
            return Err(ControllerError::Persistence(e));
        }

        if !was_completed {
            self.log_completion_time(id, now).await;
            if self.timer.lesson() == Some(id) {
                self.timer.reset();
            }
            let next = next_lesson(&self.course.modules, &self.enrollment.completed_lessons);
            if let Some(next) = next {
                if self.selected != Some(next) {
                    self.select_lesson(next);
                }
            }
        } else if self.timer.lesson() == Some(id) {
            self.timer.reset();
        }

        Ok(())
    }

    /// Pause a running timer or resume a paused one.
    pub fn pause_resume_timer(&mut self) {
        self.timer.pause_resume(self.clock.now());
    }

    /// Replace a lesson's note and persist it, with the same
    /// optimistic/rollback discipline as completion toggles. An empty
    /// text removes the note.
    pub async fn set_note(
        &mut self,
        lesson: LessonId,
        text: impl Into<String>,
    ) -> Result<(), ControllerError> {
        if !self.course.contains_lesson(lesson) {
            debug!(lesson = %lesson, "note rejected: unknown lesson");
            return Ok(());
        }

        let text = text.into();
        let previous = self.enrollment.clone();

        if text.is_empty() {
            self.enrollment.notes.remove(&lesson);
        } else {
            self.enrollment.notes.insert(lesson, text);
        }
        self.enrollment.updated_at = self.clock.now();

        let upsert = {
            let mut store = self.store.lock().await;
            store.upsert_enrollment(&self.enrollment).await
        };
        if let Err(e) = upsert {
            self.enrollment = previous;
            return Err(ControllerError::Persistence(e));
        }
        Ok(())
    }

    /// Apply a push-feed snapshot: last writer wins. The remote store is
    /// the source of truth for persisted state; local optimistic state
    /// is only a short-lived prediction. Timer and in-progress markers
    /// are session-local and stay untouched.
    pub fn apply_remote_update(&mut self, snapshot: EnrollmentSnapshot) {
        self.enrollment.completed_lessons = snapshot.completed_lessons;
        self.enrollment.progress = snapshot.progress;
        self.enrollment.notes = snapshot.notes;
        self.publish();
    }

    /// Replace the curriculum (external reload). Re-runs the selection
    /// fallback in case the selected lesson disappeared.
    pub fn set_curriculum(&mut self, course: Course) {
        self.course = course;
        self.ensure_selection();
        self.publish();
    }

    // === Internals ===

    /// True when the lesson's module is locked and the lesson is not
    /// already completed (completed lessons stay reviewable).
    fn is_gated(&self, id: LessonId) -> bool {
        if self.enrollment.completed_lessons.contains(&id) {
            return false;
        }
        let states = self.module_states();
        self.course
            .modules
            .iter()
            .zip(states.iter())
            .find(|(module, _)| module.lessons.iter().any(|l| l.id == id))
            .map(|(_, state)| state.is_locked)
            .unwrap_or(false)
    }

    fn fallback_selection(&self) -> Option<LessonId> {
        next_lesson(&self.course.modules, &self.enrollment.completed_lessons)
            .or_else(|| self.course.lesson_ids().next())
    }

    fn ensure_selection(&mut self) {
        match self.selected {
            Some(id) if self.course.contains_lesson(id) => {}
            _ => self.selected = self.fallback_selection(),
        }
    }

    /// Emit one time-log entry for a just-completed lesson. Preference
    /// order: timer elapsed, duration hint, default. Failures are logged
    /// and contained; the completion already succeeded locally.
    async fn log_completion_time(&mut self, id: LessonId, now: coursetrack_core::Time) {
        let elapsed = self.timer.elapsed_ms(id, now);
        let minutes = LessonTimer::minutes_for_log(elapsed)
            .or_else(|| {
                self.course
                    .lesson(id)
                    .and_then(|l| l.duration_hint.as_deref())
                    .and_then(parse_duration_hint)
            })
            .unwrap_or(DEFAULT_LOG_MINUTES);

        let title = self
            .course
            .lesson(id)
            .map(|l| l.title.clone())
            .unwrap_or_default();
        let entry = TimeLogEntry::course(
            self.course.id,
            title.clone(),
            now,
            minutes,
            format!("Lesson completed: {}", title),
        );

        let result = {
            let mut store = self.store.lock().await;
            store.append(&entry).await
        };
        if let Err(e) = result {
            warn!(lesson = %id, error = %e, "time-log append failed; completion stands");
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(ProgressView {
            completed_lessons: self.enrollment.completed_lessons.clone(),
            progress: self.enrollment.progress,
            in_progress: self.in_progress.clone(),
            selected: self.selected,
        });
    }
}
