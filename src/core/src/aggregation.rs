//! Derived statistics computed on demand. Nothing here writes to the store.

pub mod overview;
pub mod student_dashboard;

pub use overview::{
    platform_overview, platform_overview_at, role_counts, teacher_payment_summary, PlatformOverview,
    RoleCounts, TeacherPaymentSummary,
};
pub use student_dashboard::{student_dashboard, StudentDashboard};
