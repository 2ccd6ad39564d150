use std::fmt;

use serde::{Deserialize, Serialize};

/// Every named collection persisted by the platform.
///
/// List collections are stored as JSON arrays, keyed ones as JSON objects
/// mapping the owner id to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    Modules,
    Subscriptions,
    TeacherPayments,
    StudentProgress,
    VoiceSessions,
    TextConversations,
    PlatformSettings,
    SeedMarker,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Modules => "modules",
            Collection::Subscriptions => "subscriptions",
            Collection::TeacherPayments => "teacher_payments",
            Collection::StudentProgress => "student_progress",
            Collection::VoiceSessions => "voice_sessions",
            Collection::TextConversations => "text_conversations",
            Collection::PlatformSettings => "platform_settings",
            Collection::SeedMarker => "seed_marker",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
