use chrono::{DateTime, Utc};
use log::info;

use crate::error_handling::types::DataError;
use crate::models::{CourseProgress, Module, ProgressBook, StudentProgress, User};
use crate::storage::{Collection, Store};

fn require_student(store: &Store, student_id: &str) -> Result<(), DataError> {
    let users: Vec<User> = store.read(Collection::Users)?;
    if users.iter().any(|u| u.id == student_id && u.is_student()) {
        Ok(())
    } else {
        Err(DataError::not_found("student", student_id))
    }
}

fn require_module(store: &Store, module_id: &str) -> Result<Module, DataError> {
    let modules: Vec<Module> = store.read(Collection::Modules)?;
    modules
        .into_iter()
        .find(|m| m.id == module_id)
        .ok_or_else(|| DataError::not_found("module", module_id))
}

/// Enrolls a student in a module, creating the progress record on first use.
/// Enrolling again returns the existing course entry unchanged.
pub fn enroll(store: &Store, student_id: &str, module_id: &str, now: DateTime<Utc>) -> Result<CourseProgress, DataError> {
    require_student(store, student_id)?;
    let module = require_module(store, module_id)?;

    store.update(Collection::StudentProgress, |book: &mut ProgressBook| {
        let progress = book
            .entry(student_id.to_string())
            .or_insert_with(|| StudentProgress::new(student_id));
        if let Some(existing) = progress.course(module_id) {
            return Ok(existing.clone());
        }
        let mut course = CourseProgress::new(module_id, now);
        course.recompute(module.total_lessons());
        progress.courses.push(course.clone());
        progress.refresh();
        info!("Enrolled {} in {}", student_id, module_id);
        Ok(course)
    })
}

/// Marks a lesson completed for an enrolled student.
///
/// The lesson's duration is credited as study time to the course and to
/// today's study log. Completing an already completed lesson only refreshes
/// `lastAccessedAt`.
pub fn complete_lesson(
    store: &Store,
    student_id: &str,
    module_id: &str,
    lesson_id: &str,
    now: DateTime<Utc>,
) -> Result<CourseProgress, DataError> {
    let module = require_module(store, module_id)?;
    let lesson = module
        .lesson(lesson_id)
        .ok_or_else(|| DataError::not_found("lesson", lesson_id))?;
    let hours = lesson.duration_minutes as f64 / 60.0;

    store.update(Collection::StudentProgress, |book: &mut ProgressBook| {
        let progress = book
            .get_mut(student_id)
            .ok_or_else(|| DataError::not_found("student progress", student_id))?;
        let course = progress
            .course_mut(module_id)
            .ok_or_else(|| DataError::not_found("enrollment", format!("{}/{}", student_id, module_id)))?;

        course.last_accessed_at = now;
        if course.completed_lesson_ids.iter().any(|id| id == lesson_id) {
            return Ok(course.clone());
        }
        course.completed_lesson_ids.push(lesson_id.to_string());
        course.total_study_hours += hours;
        course.recompute(module.total_lessons());
        let snapshot = course.clone();

        progress.log_study(now.date_naive(), hours, 1);
        progress.refresh();
        Ok(snapshot)
    })
}
