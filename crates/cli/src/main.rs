//! coursetrack CLI - learner progress tracking over JSON storage.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use coursetrack_controller::{ProgressionController, SystemClock};
use coursetrack_core::{Course, CourseId, Enrollment, Lesson, LessonId, Module, ModuleId, UserId};
use coursetrack_engine::{evaluate, format_elapsed, module_progress};
use coursetrack_storage::{CurriculumSource, EnrollmentStore, JsonStorage};
use tokio::sync::Mutex;

#[derive(Parser)]
#[command(name = "coursetrack")]
#[command(about = "Learner progress tracking engine", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, default_value = ".coursetrack")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a small demo course and print its id
    Seed,
    /// Show module lock states and completion for a learner
    Status {
        /// Course ID
        course: String,
        /// Learner ID
        user: String,
    },
    /// Toggle a lesson's completion
    Toggle {
        /// Course ID
        course: String,
        /// Learner ID
        user: String,
        /// Lesson ID
        lesson: String,
    },
    /// Set (or clear, with empty text) a lesson note
    Note {
        /// Course ID
        course: String,
        /// Learner ID
        user: String,
        /// Lesson ID
        lesson: String,
        /// Note text
        text: String,
    },
    /// List logged time for a course
    Log {
        /// Course ID
        course: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();
    let storage = JsonStorage::new(&cli.data).await?;

    match cli.command {
        Commands::Seed => seed(storage).await,
        Commands::Status { course, user } => {
            status(storage, parse_course(&course)?, parse_user(&user)?).await
        }
        Commands::Toggle {
            course,
            user,
            lesson,
        } => {
            toggle(
                storage,
                parse_course(&course)?,
                parse_user(&user)?,
                lesson.parse::<LessonId>().context("invalid lesson id")?,
            )
            .await
        }
        Commands::Note {
            course,
            user,
            lesson,
            text,
        } => {
            note(
                storage,
                parse_course(&course)?,
                parse_user(&user)?,
                lesson.parse::<LessonId>().context("invalid lesson id")?,
                text,
            )
            .await
        }
        Commands::Log { course } => log(storage, parse_course(&course)?).await,
    }
}

fn parse_course(s: &str) -> Result<CourseId> {
    s.parse().context("invalid course id")
}

fn parse_user(s: &str) -> Result<UserId> {
    s.parse().context("invalid user id")
}

async fn seed(mut storage: JsonStorage) -> Result<()> {
    let lesson = |title: &str, hint: Option<&str>| Lesson {
        id: LessonId::new(),
        title: title.to_string(),
        duration_hint: hint.map(|s| s.to_string()),
        content_ref: None,
    };

    let course = Course {
        id: CourseId::new(),
        title: "Getting started".to_string(),
        sequential_modules: true,
        modules: vec![
            Module {
                id: ModuleId::new(),
                title: "Basics".to_string(),
                requires_validation: false,
                unlocks_next_module: true,
                lessons: vec![
                    lesson("Introduction", Some("15 min")),
                    lesson("First steps", Some("45 min")),
                ],
            },
            Module {
                id: ModuleId::new(),
                title: "Practice".to_string(),
                requires_validation: true,
                unlocks_next_module: true,
                lessons: vec![lesson("Exercises", Some("1 hour"))],
            },
        ],
    };

    storage.save_course(&course).await?;
    info!(course = %course.id, "seeded demo course");
    println!("{}", course.id);
    for module in &course.modules {
        println!("  module {} {}", module.id, module.title);
        for l in &module.lessons {
            println!("    lesson {} {}", l.id, l.title);
        }
    }
    Ok(())
}

async fn load_pair(
    storage: &JsonStorage,
    course_id: CourseId,
    user_id: UserId,
) -> Result<(Course, Enrollment)> {
    let Some(course) = storage.load_course(course_id).await? else {
        bail!("course {} not found (run `coursetrack seed` first?)", course_id);
    };
    let enrollment = storage
        .get_enrollment(course_id, user_id)
        .await?
        .unwrap_or_else(|| Enrollment::new(course_id, user_id, chrono::Utc::now()));
    Ok((course, enrollment))
}

async fn status(storage: JsonStorage, course_id: CourseId, user_id: UserId) -> Result<()> {
    let (course, enrollment) = load_pair(&storage, course_id, user_id).await?;
    let states = evaluate(
        &course.modules,
        &enrollment.completed_lessons,
        course.sequential_modules,
    );

    println!("{} - {}%", course.title, enrollment.progress);
    for (module, state) in course.modules.iter().zip(states.iter()) {
        let marker = if state.is_locked {
            "locked"
        } else if state.awaiting_validation {
            "awaiting validation"
        } else if state.module_completed {
            "completed"
        } else {
            "open"
        };
        println!(
            "  [{marker}] {} ({}%)",
            module.title,
            module_progress(&enrollment.completed_lessons, module)
        );
        if let Some(reason) = state.locked_reason {
            println!("      {}", reason);
        }
        for l in &module.lessons {
            let done = if enrollment.completed_lessons.contains(&l.id) {
                "x"
            } else {
                " "
            };
            println!("    [{done}] {} {}", l.id, l.title);
        }
    }
    Ok(())
}

async fn toggle(
    storage: JsonStorage,
    course_id: CourseId,
    user_id: UserId,
    lesson: LessonId,
) -> Result<()> {
    let (course, enrollment) = load_pair(&storage, course_id, user_id).await?;
    let store = Arc::new(Mutex::new(storage));
    let mut controller =
        ProgressionController::new(course, enrollment, store, Arc::new(SystemClock));

    controller.toggle_completion(lesson).await?;
    println!("progress: {}%", controller.progress());
    Ok(())
}

async fn note(
    storage: JsonStorage,
    course_id: CourseId,
    user_id: UserId,
    lesson: LessonId,
    text: String,
) -> Result<()> {
    let (course, enrollment) = load_pair(&storage, course_id, user_id).await?;
    let store = Arc::new(Mutex::new(storage));
    let mut controller =
        ProgressionController::new(course, enrollment, store, Arc::new(SystemClock));
    controller.set_note(lesson, text).await?;
    Ok(())
}

async fn log(storage: JsonStorage, course_id: CourseId) -> Result<()> {
    let entries = storage.list_time_log(course_id).await?;
    if entries.is_empty() {
        println!("no time logged");
        return Ok(());
    }
    let mut total_minutes: i64 = 0;
    for entry in &entries {
        total_minutes += i64::from(entry.duration_minutes);
        println!(
            "{}  {:>4} min  {}  {}",
            entry.date.format("%Y-%m-%d %H:%M"),
            entry.duration_minutes,
            entry.title,
            entry.description,
        );
    }
    println!("total: {}", format_elapsed(total_minutes * 60_000));
    Ok(())
}
