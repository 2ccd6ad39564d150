//! Course catalogue records: modules with their nested lessons and resources.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proficiency tier shared by modules and by the level derived for each student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "Beginner",
            ProficiencyLevel::Intermediate => "Intermediate",
            ProficiencyLevel::Advanced => "Advanced",
        }
    }

    pub fn parse(value: &str) -> Option<ProficiencyLevel> {
        match value {
            "Beginner" => Some(ProficiencyLevel::Beginner),
            "Intermediate" => Some(ProficiencyLevel::Intermediate),
            "Advanced" => Some(ProficiencyLevel::Advanced),
            _ => None,
        }
    }

    /// Level reached by a student whose enrolled courses average `percent` completion.
    pub fn from_mean_percent(percent: f64) -> ProficiencyLevel {
        if percent < 40.0 {
            ProficiencyLevel::Beginner
        } else if percent < 75.0 {
            ProficiencyLevel::Intermediate
        } else {
            ProficiencyLevel::Advanced
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Pdf,
    Link,
    Image,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// Always greater than zero.
    pub duration_minutes: u32,
    #[serde(default)]
    pub media_ref: Option<String>,
    /// Unique and increasing within the owning module.
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub url: String,
    #[serde(default)]
    pub lesson_ref: Option<String>,
}

/// A course. Teachers are linked by id through `assigned_teacher_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: ProficiencyLevel,
    pub status: ModuleStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub assigned_teacher_ids: Vec<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Module {
    pub fn total_lessons(&self) -> usize {
        self.lessons.len()
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    /// The `order` value the next appended lesson receives.
    pub fn next_order(&self) -> u32 {
        self.lessons.iter().map(|l| l.order).max().map_or(1, |o| o + 1)
    }

    pub fn has_teacher(&self, teacher_id: &str) -> bool {
        self.assigned_teacher_ids.iter().any(|t| t == teacher_id)
    }

    /// Lessons sorted by `order`.
    pub fn lessons_in_order(&self) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self.lessons.iter().collect();
        lessons.sort_by_key(|l| l.order);
        lessons
    }

    /// Whether every lesson carries a distinct `order` and the list is sorted by it.
    pub fn lesson_order_is_valid(&self) -> bool {
        self.lessons.windows(2).all(|w| w[0].order < w[1].order)
    }
}
