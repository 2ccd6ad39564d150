//! Mutations applied after seeding: account edits, catalogue maintenance by
//! teachers, lesson completion and teacher payouts.
//!
//! Every operation validates its input first and then runs as a single
//! [`Store::update`](crate::storage::Store::update), so a rejected call never
//! leaves a partially modified collection behind. Referential checks against
//! other collections (does this teacher exist, is that lesson in the module)
//! are done here because the store itself enforces none.

pub mod courses;
pub mod payments;
pub mod progress_tracking;
pub mod users;

pub use courses::{
    add_lesson, add_resource, assign_teacher, remove_lesson, remove_resource, update_lesson, LessonUpdate,
    NewLesson, NewResource,
};
pub use payments::{log_teacher_hours, record_teacher_payment};
pub use progress_tracking::{complete_lesson, enroll};
pub use users::{register_user, touch_last_active, update_profile, NewUser, ProfileUpdate};
