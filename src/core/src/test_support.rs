//! Fixtures shared by the unit tests.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::error_handling::types::StorageError;
use crate::models::{
    ChatMessage, CourseProgress, MessageRole, PlanType, ProficiencyLevel, ProgressBook, Role, StudentProgress,
    Subscription, SubscriptionBook, SubscriptionStatus, TextConversation, User, VoiceSession,
};
use crate::storage::{Collection, CollectionStorage, Store};

pub fn user(id: &str, role: Role, last_active_at: DateTime<Utc>) -> User {
    User {
        id: id.to_string(),
        display_name: format!("User {}", id),
        email: format!("{}@learnhub.test", id),
        password_secret: "secret".to_string(),
        role,
        profile_image_ref: None,
        joined_at: last_active_at,
        last_active_at,
    }
}

pub fn voice_session(id: &str, student_id: &str, created_at: DateTime<Utc>) -> VoiceSession {
    VoiceSession {
        id: id.to_string(),
        student_id: student_id.to_string(),
        title: None,
        created_at,
        duration_seconds: 95,
        transcript: "I would like to order a coffee please".to_string(),
        word_count: 8,
        unique_word_count: 8,
        lexical_density: 0.5,
        lexical_diversity: 1.0,
        feedback: None,
        linked_conversation_id: None,
    }
}

/// A conversation with one question and one answer.
pub fn conversation(id: &str, student_id: &str, created_at: DateTime<Utc>) -> TextConversation {
    TextConversation {
        id: id.to_string(),
        student_id: student_id.to_string(),
        title: format!("Conversation {}", id),
        created_at,
        updated_at: created_at,
        messages: vec![
            ChatMessage {
                role: MessageRole::User,
                content: "How do I say goodbye politely?".to_string(),
                sent_at: created_at,
            },
            ChatMessage {
                role: MessageRole::Assistant,
                content: "You could say: it was lovely to see you!".to_string(),
                sent_at: created_at,
            },
        ],
    }
}

/// Two students, one teacher and the admin; one pending subscription; `s1`
/// has an Advanced progress record.
pub fn populated_store() -> Store {
    let store = Store::in_memory();
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    store
        .write(
            Collection::Users,
            &vec![
                user("s1", Role::Student, now),
                user("s2", Role::Student, now),
                user("t1", Role::Teacher, now),
                user("admin-001", Role::Admin, now),
            ],
        )
        .unwrap();

    let mut subs = SubscriptionBook::new();
    for (id, status) in [("s1", SubscriptionStatus::Active), ("s2", SubscriptionStatus::Pending)] {
        subs.insert(
            id.to_string(),
            Subscription {
                student_id: id.to_string(),
                plan: PlanType::Monthly,
                status,
                start_date: now,
                next_payment_date: now,
                amount: 29.99,
            },
        );
    }
    store.write(Collection::Subscriptions, &subs).unwrap();

    let mut progress = StudentProgress::new("s1");
    let mut course = CourseProgress::new("module-001", now);
    course.completed_lesson_ids = vec!["module-001-lesson-01".to_string()];
    course.recompute(1);
    progress.courses.push(course);
    progress.refresh();
    assert_eq!(progress.level, ProficiencyLevel::Advanced);
    let mut book = ProgressBook::new();
    book.insert("s1".to_string(), progress);
    store.write(Collection::StudentProgress, &book).unwrap();
    store
}

/// Backend whose every operation fails, as a corrupted or unreachable medium would.
pub struct FailingStorage;

impl CollectionStorage for FailingStorage {
    fn load(&self, name: &str) -> Result<Option<Value>, StorageError> {
        Err(StorageError::read(name, "medium unavailable"))
    }

    fn save(&self, name: &str, _document: &Value) -> Result<(), StorageError> {
        Err(StorageError::write(name, "medium unavailable"))
    }

    fn remove(&self, name: &str) -> Result<bool, StorageError> {
        Err(StorageError::write(name, "medium unavailable"))
    }

    fn names(&self) -> Result<Vec<String>, StorageError> {
        Err(StorageError::ConnectionFailed("medium unavailable".to_string()))
    }
}

pub fn failing_store() -> Store {
    Store::new(Arc::new(FailingStorage))
}
