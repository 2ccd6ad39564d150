use log::{debug, info};
use serde::Deserialize;
use uuid::Uuid;

use crate::error_handling::types::DataError;
use crate::models::{Lesson, Module, ProgressBook, Resource, ResourceType, User};
use crate::storage::{Collection, Store};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    pub title: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub media_ref: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonUpdate {
    pub title: Option<String>,
    pub duration_minutes: Option<u32>,
    pub media_ref: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub url: String,
    #[serde(default)]
    pub lesson_ref: Option<String>,
}

fn find_module<'a>(modules: &'a mut [Module], module_id: &str) -> Result<&'a mut Module, DataError> {
    modules
        .iter_mut()
        .find(|m| m.id == module_id)
        .ok_or_else(|| DataError::not_found("module", module_id))
}

/// Appends a lesson after the current last one.
pub fn add_lesson(store: &Store, module_id: &str, lesson: NewLesson) -> Result<Lesson, DataError> {
    if lesson.duration_minutes == 0 {
        return Err(DataError::Malformed("lesson duration must be positive".into()));
    }
    if lesson.title.trim().is_empty() {
        return Err(DataError::Malformed("lesson title is required".into()));
    }
    let (created, module) = store.update(Collection::Modules, |modules: &mut Vec<Module>| {
        let module = find_module(modules, module_id)?;
        let created = Lesson {
            id: format!("{}-lesson-{}", module.id, Uuid::new_v4().simple()),
            title: lesson.title.trim().to_string(),
            duration_minutes: lesson.duration_minutes,
            media_ref: lesson.media_ref,
            order: module.next_order(),
        };
        module.lessons.push(created.clone());
        Ok::<_, DataError>((created, module.clone()))
    })?;
    info!("Added lesson {} to {}", created.id, module_id);
    resync_enrolled_progress(store, &module)?;
    Ok(created)
}

pub fn update_lesson(store: &Store, module_id: &str, lesson_id: &str, update: LessonUpdate) -> Result<Lesson, DataError> {
    if update.duration_minutes == Some(0) {
        return Err(DataError::Malformed("lesson duration must be positive".into()));
    }
    store.update(Collection::Modules, |modules: &mut Vec<Module>| {
        let module = find_module(modules, module_id)?;
        let lesson = module
            .lessons
            .iter_mut()
            .find(|l| l.id == lesson_id)
            .ok_or_else(|| DataError::not_found("lesson", lesson_id))?;
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(DataError::Malformed("lesson title is required".into()));
            }
            lesson.title = title.trim().to_string();
        }
        if let Some(minutes) = update.duration_minutes {
            lesson.duration_minutes = minutes;
        }
        if let Some(media_ref) = update.media_ref {
            lesson.media_ref = media_ref;
        }
        Ok(lesson.clone())
    })
}

/// Removes a lesson. Resources pointing at it lose their `lessonRef` and
/// enrolled students' progress is re-derived against the shorter module.
pub fn remove_lesson(store: &Store, module_id: &str, lesson_id: &str) -> Result<(), DataError> {
    let module = store.update(Collection::Modules, |modules: &mut Vec<Module>| {
        let module = find_module(modules, module_id)?;
        let idx = module
            .lessons
            .iter()
            .position(|l| l.id == lesson_id)
            .ok_or_else(|| DataError::not_found("lesson", lesson_id))?;
        module.lessons.remove(idx);
        for resource in &mut module.resources {
            if resource.lesson_ref.as_deref() == Some(lesson_id) {
                resource.lesson_ref = None;
            }
        }
        Ok::<_, DataError>(module.clone())
    })?;
    info!("Removed lesson {} from {}", lesson_id, module_id);
    resync_enrolled_progress(store, &module)
}

pub fn add_resource(store: &Store, module_id: &str, resource: NewResource) -> Result<Resource, DataError> {
    if resource.url.trim().is_empty() {
        return Err(DataError::Malformed("resource url is required".into()));
    }
    store.update(Collection::Modules, |modules: &mut Vec<Module>| {
        let module = find_module(modules, module_id)?;
        if let Some(lesson_id) = &resource.lesson_ref {
            if module.lesson(lesson_id).is_none() {
                return Err(DataError::not_found("lesson", lesson_id.as_str()));
            }
        }
        let created = Resource {
            id: format!("{}-res-{}", module.id, Uuid::new_v4().simple()),
            title: resource.title,
            kind: resource.kind,
            url: resource.url.trim().to_string(),
            lesson_ref: resource.lesson_ref,
        };
        module.resources.push(created.clone());
        Ok(created)
    })
}

pub fn remove_resource(store: &Store, module_id: &str, resource_id: &str) -> Result<(), DataError> {
    store.update(Collection::Modules, |modules: &mut Vec<Module>| {
        let module = find_module(modules, module_id)?;
        let before = module.resources.len();
        module.resources.retain(|r| r.id != resource_id);
        if module.resources.len() == before {
            return Err(DataError::not_found("resource", resource_id));
        }
        Ok(())
    })
}

/// Adds `teacher_id` to the module's assigned teachers. Assigning twice is a no-op.
pub fn assign_teacher(store: &Store, module_id: &str, teacher_id: &str) -> Result<(), DataError> {
    let users: Vec<User> = store.read(Collection::Users)?;
    if !users.iter().any(|u| u.id == teacher_id && u.is_teacher()) {
        return Err(DataError::not_found("teacher", teacher_id));
    }
    store.update(Collection::Modules, |modules: &mut Vec<Module>| {
        let module = find_module(modules, module_id)?;
        if !module.has_teacher(teacher_id) {
            module.assigned_teacher_ids.push(teacher_id.to_string());
        }
        Ok(())
    })
}

/// Brings every enrolled student's course entry back in line with the
/// module's current lesson list.
fn resync_enrolled_progress(store: &Store, module: &Module) -> Result<(), DataError> {
    let total = module.total_lessons();
    let touched = store.update(Collection::StudentProgress, |book: &mut ProgressBook| {
        let mut touched = 0;
        for progress in book.values_mut() {
            let Some(course) = progress.course_mut(&module.id) else {
                continue;
            };
            course.completed_lesson_ids.retain(|id| module.lesson(id).is_some());
            course.recompute(total);
            progress.refresh();
            touched += 1;
        }
        Ok::<_, DataError>(touched)
    })?;
    debug!("Resynced {} progress record(s) for {}", touched, module.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::management::progress_tracking::{complete_lesson, enroll};
    use crate::models::{CourseStatus, Role};
    use crate::seeding::catalogue;
    use crate::test_support::user;
    use chrono::Utc;

    fn catalogue_store() -> Store {
        let store = Store::in_memory();
        let now = Utc::now();
        store
            .write(
                Collection::Users,
                &vec![
                    user("teacher-001", Role::Teacher, now),
                    user("teacher-003", Role::Teacher, now),
                    user("student-001", Role::Student, now),
                ],
            )
            .unwrap();
        store
            .write(Collection::Modules, &catalogue::baseline_modules())
            .unwrap();
        store
    }

    fn module(store: &Store, id: &str) -> Module {
        let modules: Vec<Module> = store.read(Collection::Modules).unwrap();
        modules.into_iter().find(|m| m.id == id).unwrap()
    }

    #[test]
    fn test_add_lesson_takes_next_order() {
        let store = catalogue_store();
        let lesson = NewLesson {
            title: "Phrasal Verbs".into(),
            duration_minutes: 30,
            media_ref: None,
        };
        let created = add_lesson(&store, "module-002", lesson).unwrap();
        assert_eq!(created.order, 5);
        let m = module(&store, "module-002");
        assert_eq!(m.total_lessons(), 5);
        assert!(m.lesson_order_is_valid());

        let zero = NewLesson {
            title: "Empty".into(),
            duration_minutes: 0,
            media_ref: None,
        };
        assert!(matches!(add_lesson(&store, "module-002", zero), Err(DataError::Malformed(_))));
        assert_eq!(module(&store, "module-002").total_lessons(), 5);
    }

    #[test]
    fn test_update_lesson() {
        let store = catalogue_store();
        let update = LessonUpdate {
            title: Some("Vowels".into()),
            duration_minutes: Some(22),
            ..Default::default()
        };
        let lesson = update_lesson(&store, "module-004", "module-004-lesson-01", update).unwrap();
        assert_eq!(lesson.title, "Vowels");
        assert_eq!(lesson.duration_minutes, 22);
        assert_eq!(lesson.order, 1);

        let bad = LessonUpdate {
            duration_minutes: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            update_lesson(&store, "module-004", "module-004-lesson-01", bad),
            Err(DataError::Malformed(_))
        ));
    }

    #[test]
    fn test_remove_lesson_clears_refs_and_resyncs_progress() {
        let store = catalogue_store();
        let now = Utc::now();
        enroll(&store, "student-001", "module-004", now).unwrap();
        for n in 1..=3 {
            let lesson_id = format!("module-004-lesson-{:02}", n);
            complete_lesson(&store, "student-001", "module-004", &lesson_id, now).unwrap();
        }

        remove_lesson(&store, "module-004", "module-004-lesson-04").unwrap();
        let book: ProgressBook = store.read(Collection::StudentProgress).unwrap();
        let course = book["student-001"].course("module-004").unwrap();
        assert_eq!(course.progress_percent, 100);
        assert_eq!(course.status, CourseStatus::Completed);

        remove_lesson(&store, "module-001", "module-001-lesson-01").unwrap();
        let m = module(&store, "module-001");
        assert!(m.resources.iter().all(|r| r.lesson_ref.as_deref() != Some("module-001-lesson-01")));

        let book: ProgressBook = store.read(Collection::StudentProgress).unwrap();
        remove_lesson(&store, "module-004", "module-004-lesson-01").unwrap();
        let after: ProgressBook = store.read(Collection::StudentProgress).unwrap();
        let progress = &after["student-001"];
        assert_eq!(progress.total_lessons_completed, book["student-001"].total_lessons_completed - 1);

        assert!(remove_lesson(&store, "module-004", "module-004-lesson-01")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_resources() {
        let store = catalogue_store();
        let empty_url = NewResource {
            title: "Broken".into(),
            kind: ResourceType::Link,
            url: " ".into(),
            lesson_ref: None,
        };
        assert!(matches!(add_resource(&store, "module-001", empty_url), Err(DataError::Malformed(_))));

        let dangling = NewResource {
            title: "Dangling".into(),
            kind: ResourceType::Pdf,
            url: "https://example.com/a.pdf".into(),
            lesson_ref: Some("module-002-lesson-01".into()),
        };
        assert!(add_resource(&store, "module-001", dangling).unwrap_err().is_not_found());

        let good = NewResource {
            title: "Worksheet".into(),
            kind: ResourceType::Pdf,
            url: "https://example.com/w.pdf".into(),
            lesson_ref: Some("module-001-lesson-02".into()),
        };
        let created = add_resource(&store, "module-001", good).unwrap();
        assert_eq!(module(&store, "module-001").resources.len(), 3);
        remove_resource(&store, "module-001", &created.id).unwrap();
        assert_eq!(module(&store, "module-001").resources.len(), 2);
        assert!(remove_resource(&store, "module-001", &created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_assign_teacher_requires_teacher_role() {
        let store = catalogue_store();
        assign_teacher(&store, "module-002", "teacher-003").unwrap();
        assign_teacher(&store, "module-002", "teacher-003").unwrap();
        let m = module(&store, "module-002");
        assert_eq!(m.assigned_teacher_ids, vec!["teacher-002", "teacher-003"]);

        assert!(assign_teacher(&store, "module-002", "student-001")
            .unwrap_err()
            .is_not_found());
        assert!(assign_teacher(&store, "module-999", "teacher-001")
            .unwrap_err()
            .is_not_found());
    }
}
