//! Per-student learning progress and the rules keeping its derived fields honest.
//!
//! Every mutation of a [`StudentProgress`] should end with
//! [`StudentProgress::refresh`], which recomputes totals, streak, level and
//! achievements from the underlying course entries and study logs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::course::ProficiencyLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourseStatus {
    InProgress,
    Completed,
}

/// Badge identifiers unlocked by thresholds on progress metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCode {
    FirstLesson,
    TenHours,
    FiftyHours,
    WeekStreak,
    CourseCompleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_lesson_ids: Vec<String>,
    pub progress_percent: u32,
    pub total_study_hours: f64,
    pub status: CourseStatus,
    pub last_accessed_at: DateTime<Utc>,
}

impl CourseProgress {
    pub fn new(course_id: impl Into<String>, enrolled_at: DateTime<Utc>) -> Self {
        Self {
            course_id: course_id.into(),
            enrolled_at,
            completed_lesson_ids: Vec::new(),
            progress_percent: 0,
            total_study_hours: 0.0,
            status: CourseStatus::InProgress,
            last_accessed_at: enrolled_at,
        }
    }

    /// Recomputes `progress_percent` and `status` against the module's lesson count.
    ///
    /// A module without lessons can never be completed.
    pub fn recompute(&mut self, total_lessons: usize) {
        let completed = self.completed_lesson_ids.len();
        if total_lessons == 0 {
            self.progress_percent = 0;
            self.status = CourseStatus::InProgress;
            return;
        }
        self.progress_percent = (100.0 * completed as f64 / total_lessons as f64).round() as u32;
        self.status = if completed == total_lessons {
            CourseStatus::Completed
        } else {
            CourseStatus::InProgress
        };
    }

    pub fn is_completed(&self) -> bool {
        self.status == CourseStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLog {
    pub date: NaiveDate,
    pub hours: f64,
    pub lessons_completed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub student_id: String,
    pub level: ProficiencyLevel,
    #[serde(default)]
    pub courses: Vec<CourseProgress>,
    pub total_study_hours: f64,
    pub total_lessons_completed: u32,
    pub current_streak_days: u32,
    #[serde(default)]
    pub achievements: BTreeSet<AchievementCode>,
    /// Ordered by date, oldest first.
    #[serde(default)]
    pub study_logs: Vec<StudyLog>,
}

/// The `student_progress` collection, keyed by student id.
pub type ProgressBook = BTreeMap<String, StudentProgress>;

impl StudentProgress {
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            level: ProficiencyLevel::Beginner,
            courses: Vec::new(),
            total_study_hours: 0.0,
            total_lessons_completed: 0,
            current_streak_days: 0,
            achievements: BTreeSet::new(),
            study_logs: Vec::new(),
        }
    }

    pub fn course(&self, course_id: &str) -> Option<&CourseProgress> {
        self.courses.iter().find(|c| c.course_id == course_id)
    }

    pub fn course_mut(&mut self, course_id: &str) -> Option<&mut CourseProgress> {
        self.courses.iter_mut().find(|c| c.course_id == course_id)
    }

    /// Adds `hours` and `lessons` to the log entry for `date`, keeping the log sorted.
    pub fn log_study(&mut self, date: NaiveDate, hours: f64, lessons: u32) {
        match self.study_logs.binary_search_by_key(&date, |l| l.date) {
            Ok(idx) => {
                let entry = &mut self.study_logs[idx];
                entry.hours += hours;
                entry.lessons_completed += lessons;
            }
            Err(idx) => self.study_logs.insert(
                idx,
                StudyLog {
                    date,
                    hours,
                    lessons_completed: lessons,
                },
            ),
        }
    }

    /// Recomputes every derived field. Achievements are only ever added.
    pub fn refresh(&mut self) {
        self.total_lessons_completed = self
            .courses
            .iter()
            .map(|c| c.completed_lesson_ids.len() as u32)
            .sum();
        self.total_study_hours = self.courses.iter().map(|c| c.total_study_hours).sum();
        self.current_streak_days = current_streak(&self.study_logs);
        self.level = ProficiencyLevel::from_mean_percent(self.mean_progress_percent());
        let earned = self.earned_achievements();
        self.achievements.extend(earned);
    }

    pub fn mean_progress_percent(&self) -> f64 {
        if self.courses.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.courses.iter().map(|c| c.progress_percent).sum();
        sum as f64 / self.courses.len() as f64
    }

    pub fn completed_courses(&self) -> usize {
        self.courses.iter().filter(|c| c.is_completed()).count()
    }

    fn earned_achievements(&self) -> Vec<AchievementCode> {
        let mut earned = Vec::new();
        if self.total_lessons_completed >= 1 {
            earned.push(AchievementCode::FirstLesson);
        }
        if self.total_study_hours >= 10.0 {
            earned.push(AchievementCode::TenHours);
        }
        if self.total_study_hours >= 50.0 {
            earned.push(AchievementCode::FiftyHours);
        }
        if self.current_streak_days >= 7 {
            earned.push(AchievementCode::WeekStreak);
        }
        if self.courses.iter().any(|c| c.is_completed()) {
            earned.push(AchievementCode::CourseCompleted);
        }
        earned
    }
}

/// Consecutive days with study time, counting back from the newest log entry.
pub fn current_streak(logs: &[StudyLog]) -> u32 {
    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;
    for log in logs.iter().rev() {
        if log.hours <= 0.0 {
            break;
        }
        if let Some(day) = expected {
            if log.date != day {
                break;
            }
        }
        streak += 1;
        expected = log.date.pred_opt();
    }
    streak
}
