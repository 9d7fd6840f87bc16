//! Course session wiring.
//!
//! Loads the curriculum (memoized per course id), loads or auto-creates
//! the enrollment, and forwards push-feed snapshots into the controller
//! until teardown.

use std::collections::HashMap;
use std::sync::Arc;

use coursetrack_core::{Course, CourseId, Enrollment, UserId};
use coursetrack_storage::{CurriculumSource, EnrollmentStore, PushFeed, Result, TimeLogSink};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::clock::Clock;
use crate::controller::ProgressionController;
use crate::error::ControllerError;

/// Memoizing wrapper over a [`CurriculumSource`]: one fetch per course
/// id, so repeated session mounts do not hit the loader again.
pub struct CachedCurriculum<C: CurriculumSource> {
    inner: C,
    cache: Mutex<HashMap<CourseId, Course>>,
}

impl<C: CurriculumSource> CachedCurriculum<C> {
    /// Wrap a source.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Load a course, serving repeats from the cache.
    pub async fn load_course(&self, id: CourseId) -> Result<Option<Course>> {
        let mut cache = self.cache.lock().await;
        if let Some(course) = cache.get(&id) {
            return Ok(Some(course.clone()));
        }
        let loaded = self.inner.load_course(id).await?;
        if let Some(course) = &loaded {
            cache.insert(id, course.clone());
        }
        Ok(loaded)
    }

    /// Drop a cached course (forces a re-fetch on next load).
    pub async fn invalidate(&self, id: CourseId) {
        self.cache.lock().await.remove(&id);
    }
}

/// A live session for one (course, user) pair: the controller plus the
/// push-feed forwarding task.
pub struct CourseSession<S: EnrollmentStore + TimeLogSink + 'static> {
    controller: Arc<Mutex<ProgressionController<S>>>,
    feed_task: Option<JoinHandle<()>>,
}

impl<S: EnrollmentStore + TimeLogSink + 'static> CourseSession<S> {
    /// Open a session: load the course, load or auto-create the
    /// enrollment, subscribe to the push feed.
    pub async fn open<C, F>(
        curriculum: &CachedCurriculum<C>,
        store: Arc<Mutex<S>>,
        feed: &F,
        course_id: CourseId,
        user_id: UserId,
        clock: Arc<dyn Clock>,
    ) -> std::result::Result<Self, ControllerError>
    where
        C: CurriculumSource,
        F: PushFeed,
    {
        let course = curriculum
            .load_course(course_id)
            .await?
            .ok_or(ControllerError::CourseNotFound(course_id))?;

        let enrollment = {
            let mut store = store.lock().await;
            match store.get_enrollment(course_id, user_id).await? {
                Some(enrollment) => enrollment,
                None => {
                    let enrollment = Enrollment::new(course_id, user_id, clock.now());
                    store.upsert_enrollment(&enrollment).await?;
                    enrollment
                }
            }
        };

        let controller = Arc::new(Mutex::new(ProgressionController::new(
            course,
            enrollment,
            store,
            clock,
        )));

        let mut rx = feed.subscribe(course_id, user_id).await?;
        let feed_controller = controller.clone();
        let feed_task = tokio::spawn(async move {
            while let Some(snapshot) = rx.recv().await {
                debug!(course = %course_id, "applying push snapshot");
                feed_controller.lock().await.apply_remote_update(snapshot);
            }
        });

        Ok(Self {
            controller,
            feed_task: Some(feed_task),
        })
    }

    /// Shared handle to the controller.
    pub fn controller(&self) -> Arc<Mutex<ProgressionController<S>>> {
        self.controller.clone()
    }

    /// Tear down: stop forwarding and drop the feed subscription.
    pub fn close(mut self) {
        if let Some(task) = self.feed_task.take() {
            task.abort();
        }
    }
}

impl<S: EnrollmentStore + TimeLogSink + 'static> Drop for CourseSession<S> {
    fn drop(&mut self) {
        if let Some(task) = self.feed_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use async_trait::async_trait;
    use coursetrack_core::{EnrollmentSnapshot, Lesson, LessonId, Module, ModuleId, TimeLogEntry};
    use coursetrack_storage::Result as StorageResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    struct CountingSource {
        course: Course,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl CurriculumSource for CountingSource {
        async fn load_course(&self, id: CourseId) -> StorageResult<Option<Course>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok((self.course.id == id).then(|| self.course.clone()))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        enrollment: Option<Enrollment>,
    }

    #[async_trait]
    impl EnrollmentStore for MemoryStore {
        async fn get_enrollment(
            &self,
            _course_id: CourseId,
            _user_id: UserId,
        ) -> StorageResult<Option<Enrollment>> {
            Ok(self.enrollment.clone())
        }

        async fn upsert_enrollment(&mut self, enrollment: &Enrollment) -> StorageResult<()> {
            self.enrollment = Some(enrollment.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl TimeLogSink for MemoryStore {
        async fn append(&mut self, _entry: &TimeLogEntry) -> StorageResult<()> {
            Ok(())
        }
    }

    struct ChannelFeed {
        tx: Mutex<Option<mpsc::Sender<EnrollmentSnapshot>>>,
    }

    #[async_trait]
    impl PushFeed for ChannelFeed {
        async fn subscribe(
            &self,
            _course_id: CourseId,
            _user_id: UserId,
        ) -> StorageResult<mpsc::Receiver<EnrollmentSnapshot>> {
            let (tx, rx) = mpsc::channel(8);
            *self.tx.lock().await = Some(tx);
            Ok(rx)
        }
    }

    fn one_lesson_course() -> Course {
        Course {
            id: CourseId::new(),
            title: "course".to_string(),
            sequential_modules: false,
            modules: vec![Module {
                id: ModuleId::new(),
                title: "M1".to_string(),
                requires_validation: false,
                unlocks_next_module: true,
                lessons: vec![Lesson {
                    id: LessonId::new(),
                    title: "l1".to_string(),
                    duration_hint: None,
                    content_ref: None,
                }],
            }],
        }
    }

    #[tokio::test]
    async fn curriculum_is_fetched_once_per_course() {
        let course = one_lesson_course();
        let id = course.id;
        let source = CachedCurriculum::new(CountingSource {
            course,
            fetches: AtomicUsize::new(0),
        });

        source.load_course(id).await.unwrap().unwrap();
        source.load_course(id).await.unwrap().unwrap();
        assert_eq!(source.inner.fetches.load(Ordering::SeqCst), 1);

        source.invalidate(id).await;
        source.load_course(id).await.unwrap().unwrap();
        assert_eq!(source.inner.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn open_auto_creates_missing_enrollment() {
        let course = one_lesson_course();
        let course_id = course.id;
        let curriculum = CachedCurriculum::new(CountingSource {
            course,
            fetches: AtomicUsize::new(0),
        });
        let store = Arc::new(Mutex::new(MemoryStore::default()));
        let feed = ChannelFeed { tx: Mutex::new(None) };

        let session = CourseSession::open(
            &curriculum,
            store.clone(),
            &feed,
            course_id,
            UserId::new(),
            Arc::new(SystemClock),
        )
        .await
        .unwrap();

        let created = store.lock().await.enrollment.clone().unwrap();
        assert_eq!(created.progress, 0);
        assert!(created.completed_lessons.is_empty());
        session.close();
    }

    #[tokio::test]
    async fn open_fails_for_unknown_course() {
        let curriculum = CachedCurriculum::new(CountingSource {
            course: one_lesson_course(),
            fetches: AtomicUsize::new(0),
        });
        let store = Arc::new(Mutex::new(MemoryStore::default()));
        let feed = ChannelFeed { tx: Mutex::new(None) };

        let result = CourseSession::open(
            &curriculum,
            store,
            &feed,
            CourseId::new(),
            UserId::new(),
            Arc::new(SystemClock),
        )
        .await;
        assert!(matches!(result, Err(ControllerError::CourseNotFound(_))));
    }

    #[tokio::test]
    async fn push_snapshots_reach_the_controller() {
        let course = one_lesson_course();
        let course_id = course.id;
        let lesson_id = course.modules[0].lessons[0].id;
        let curriculum = CachedCurriculum::new(CountingSource {
            course,
            fetches: AtomicUsize::new(0),
        });
        let store = Arc::new(Mutex::new(MemoryStore::default()));
        let feed = ChannelFeed { tx: Mutex::new(None) };

        let session = CourseSession::open(
            &curriculum,
            store,
            &feed,
            course_id,
            UserId::new(),
            Arc::new(SystemClock),
        )
        .await
        .unwrap();

        let mut view = session.controller().lock().await.subscribe();

        let tx = feed.tx.lock().await.clone().unwrap();
        let mut completed = std::collections::HashSet::new();
        completed.insert(lesson_id);
        tx.send(EnrollmentSnapshot {
            completed_lessons: completed,
            progress: 100,
            notes: Default::default(),
        })
        .await
        .unwrap();

        // Wait for the forwarding task to publish the reconciled view.
        view.changed().await.unwrap();
        let latest = view.borrow_and_update().clone();
        assert_eq!(latest.progress, 100);
        assert!(latest.completed_lessons.contains(&lesson_id));

        session.close();
    }

    #[tokio::test]
    async fn existing_enrollment_is_reused() {
        let course = one_lesson_course();
        let course_id = course.id;
        let user_id = UserId::new();
        let curriculum = CachedCurriculum::new(CountingSource {
            course,
            fetches: AtomicUsize::new(0),
        });

        let mut existing = Enrollment::new(course_id, user_id, chrono::Utc::now());
        existing.progress = 50;
        let store = Arc::new(Mutex::new(MemoryStore {
            enrollment: Some(existing),
        }));
        let feed = ChannelFeed { tx: Mutex::new(None) };

        let session = CourseSession::open(
            &curriculum,
            store,
            &feed,
            course_id,
            user_id,
            Arc::new(SystemClock),
        )
        .await
        .unwrap();

        assert_eq!(session.controller().lock().await.progress(), 50);
        session.close();
    }
}
