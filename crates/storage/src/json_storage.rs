//! JSON file storage implementation.
//!
//! Stores courses, enrollments and time-log entries as JSON files under
//! a root directory. Suitable for local/offline use and for tests; a
//! server-backed deployment replaces this with its own implementations
//! of the collaborator traits.

use std::path::{Path, PathBuf};

use coursetrack_core::{Course, CourseId, Enrollment, TimeLogEntry, UserId};
use tokio::fs;

use super::{CurriculumSource, EnrollmentStore, Result, StorageError, TimeLogSink};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, ensuring the subdirectories exist.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("courses")).await?;
        fs::create_dir_all(root.join("enrollments")).await?;
        fs::create_dir_all(root.join("timelog")).await?;

        Ok(Self { root })
    }

    fn course_path(&self, id: CourseId) -> PathBuf {
        self.root.join("courses").join(format!("{}.json", id))
    }

    fn enrollment_path(&self, course_id: CourseId, user_id: UserId) -> PathBuf {
        self.root
            .join("enrollments")
            .join(format!("{}_{}.json", course_id, user_id))
    }

    fn entry_path(&self, entry: &TimeLogEntry) -> PathBuf {
        self.root.join("timelog").join(format!("{}.json", entry.id))
    }

    /// Save a course (authoring/seeding path, not used by the controller).
    pub async fn save_course(&mut self, course: &Course) -> Result<()> {
        let json = serde_json::to_string_pretty(course)?;
        fs::write(self.course_path(course.id), json.as_bytes()).await?;
        Ok(())
    }

    /// List all stored courses.
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        list_dir(&self.root.join("courses")).await
    }

    /// List time-log entries for one course, oldest first.
    pub async fn list_time_log(&self, course_id: CourseId) -> Result<Vec<TimeLogEntry>> {
        let mut entries: Vec<TimeLogEntry> = list_dir(&self.root.join("timelog")).await?;
        entries.retain(|e| e.course_id == course_id);
        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl CurriculumSource for JsonStorage {
    async fn load_course(&self, id: CourseId) -> Result<Option<Course>> {
        read_json(&self.course_path(id)).await
    }
}

#[async_trait::async_trait]
impl EnrollmentStore for JsonStorage {
    async fn get_enrollment(
        &self,
        course_id: CourseId,
        user_id: UserId,
    ) -> Result<Option<Enrollment>> {
        read_json(&self.enrollment_path(course_id, user_id)).await
    }

    async fn upsert_enrollment(&mut self, enrollment: &Enrollment) -> Result<()> {
        let path = self.enrollment_path(enrollment.course_id, enrollment.user_id);
        let json = serde_json::to_string_pretty(enrollment)?;
        fs::write(&path, json.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TimeLogSink for JsonStorage {
    async fn append(&mut self, entry: &TimeLogEntry) -> Result<()> {
        let json = serde_json::to_string_pretty(entry)?;
        fs::write(self.entry_path(entry), json.as_bytes()).await?;
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if let Ok(Some(item)) = read_json(&entry.path()).await {
            items.push(item);
        }
    }
    Ok(items)
}
