//! Domain records persisted in the Collection Store.
//!
//! Relations between records are expressed by id only; nothing embeds a live
//! copy of a record owned by another collection.

pub mod ai_history;
pub mod billing;
pub mod course;
pub mod progress;
pub mod user;

pub use ai_history::{
    ChatMessage, HistoryDetail, HistoryPayload, HistoryRecord, MessageRole, SourceType,
    TextConversation, VoiceSession,
};
pub use billing::{
    PaymentBook, PaymentMethod, PaymentRecord, PaymentRecordStatus, PaymentStatus, PlanType,
    PlatformSettings, PricingTable, Subscription, SubscriptionBook, SubscriptionStatus,
    TeacherPayment,
};
pub use course::{Lesson, Module, ModuleStatus, ProficiencyLevel, Resource, ResourceType};
pub use progress::{AchievementCode, CourseProgress, CourseStatus, ProgressBook, StudentProgress, StudyLog};
pub use user::{Role, User};
