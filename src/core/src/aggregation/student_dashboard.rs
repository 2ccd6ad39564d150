use serde::Serialize;

use crate::error_handling::types::DataError;
use crate::models::{
    AchievementCode, ProficiencyLevel, ProgressBook, TextConversation, User, VoiceSession,
};
use crate::storage::{Collection, Store};

/// Per-student statistics shown on the student home screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub student_id: String,
    pub enrolled_modules_count: usize,
    pub completed_modules_count: usize,
    pub total_study_hours: f64,
    pub total_lessons_completed: u32,
    pub current_streak: u32,
    /// `None` until the student has a progress record.
    pub level: Option<ProficiencyLevel>,
    pub achievements: Vec<AchievementCode>,
    pub voice_sessions: usize,
    pub text_conversations: usize,
    pub average_lexical_density: f64,
    pub average_lexical_diversity: f64,
}

/// Builds the dashboard for `student_id`.
///
/// Fails with `NotFound` when no student user has that id. A student that
/// has no progress record yet gets zeroed progress figures.
pub fn student_dashboard(store: &Store, student_id: &str) -> Result<StudentDashboard, DataError> {
    let users: Vec<User> = store.read(Collection::Users)?;
    if !users.iter().any(|u| u.id == student_id && u.is_student()) {
        return Err(DataError::not_found("student", student_id));
    }

    let progress_book: ProgressBook = store.read(Collection::StudentProgress)?;
    let voice: Vec<VoiceSession> = store.read(Collection::VoiceSessions)?;
    let text: Vec<TextConversation> = store.read(Collection::TextConversations)?;

    let sessions: Vec<&VoiceSession> = voice.iter().filter(|s| s.student_id == student_id).collect();
    let text_conversations = text.iter().filter(|c| c.student_id == student_id).count();
    let average_lexical_density = mean(sessions.iter().map(|s| s.lexical_density));
    let average_lexical_diversity = mean(sessions.iter().map(|s| s.lexical_diversity));

    let mut dashboard = StudentDashboard {
        student_id: student_id.to_string(),
        enrolled_modules_count: 0,
        completed_modules_count: 0,
        total_study_hours: 0.0,
        total_lessons_completed: 0,
        current_streak: 0,
        level: None,
        achievements: Vec::new(),
        voice_sessions: sessions.len(),
        text_conversations,
        average_lexical_density,
        average_lexical_diversity,
    };

    if let Some(progress) = progress_book.get(student_id) {
        dashboard.enrolled_modules_count = progress.courses.len();
        dashboard.completed_modules_count = progress.completed_courses();
        dashboard.total_study_hours = progress.total_study_hours;
        dashboard.total_lessons_completed = progress.total_lessons_completed;
        dashboard.current_streak = progress.current_streak_days;
        dashboard.level = Some(progress.level);
        dashboard.achievements = progress.achievements.iter().copied().collect();
    }
    Ok(dashboard)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseProgress, Role, StudentProgress};
    use crate::test_support::{conversation, user, voice_session};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_dashboard_reads_progress_and_voice_metrics() {
        let store = Store::in_memory();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        store
            .write(Collection::Users, &vec![user("s1", Role::Student, now), user("s2", Role::Student, now)])
            .unwrap();

        let mut progress = StudentProgress::new("s1");
        let mut course = CourseProgress::new("m1", now);
        course.completed_lesson_ids = vec!["l1".into(), "l2".into()];
        course.total_study_hours = 1.5;
        course.recompute(2);
        progress.courses.push(course);
        progress.courses.push(CourseProgress::new("m2", now));
        progress.refresh();
        let mut book = ProgressBook::new();
        book.insert("s1".into(), progress);
        store.write(Collection::StudentProgress, &book).unwrap();

        let mut a = voice_session("v1", "s1", now);
        a.lexical_density = 0.4;
        a.lexical_diversity = 0.6;
        let mut b = voice_session("v2", "s1", now);
        b.lexical_density = 0.6;
        b.lexical_diversity = 0.8;
        let other = voice_session("v3", "s2", now);
        store.write(Collection::VoiceSessions, &vec![a, b, other]).unwrap();
        store
            .write(Collection::TextConversations, &vec![conversation("c1", "s1", now)])
            .unwrap();

        let dash = student_dashboard(&store, "s1").unwrap();
        assert_eq!(dash.enrolled_modules_count, 2);
        assert_eq!(dash.completed_modules_count, 1);
        assert_eq!(dash.total_lessons_completed, 2);
        assert_eq!(dash.total_study_hours, 1.5);
        assert_eq!(dash.voice_sessions, 2);
        assert_eq!(dash.text_conversations, 1);
        assert!((dash.average_lexical_density - 0.5).abs() < 1e-9);
        assert!((dash.average_lexical_diversity - 0.7).abs() < 1e-9);
        assert!(dash.achievements.contains(&AchievementCode::CourseCompleted));
        assert_eq!(dash.level, Some(ProficiencyLevel::Intermediate));
    }

    #[test]
    fn test_student_without_progress_gets_zeroed_stats() {
        let store = Store::in_memory();
        let now = Utc::now();
        store.write(Collection::Users, &vec![user("s1", Role::Student, now)]).unwrap();

        let dash = student_dashboard(&store, "s1").unwrap();
        assert_eq!(dash.enrolled_modules_count, 0);
        assert_eq!(dash.current_streak, 0);
        assert_eq!(dash.level, None);
        assert_eq!(dash.average_lexical_density, 0.0);
    }

    #[test]
    fn test_unknown_or_non_student_is_not_found() {
        let store = Store::in_memory();
        store
            .write(Collection::Users, &vec![user("t1", Role::Teacher, Utc::now())])
            .unwrap();
        assert!(student_dashboard(&store, "t1").unwrap_err().is_not_found());
        assert!(student_dashboard(&store, "nobody").unwrap_err().is_not_found());
    }
}
