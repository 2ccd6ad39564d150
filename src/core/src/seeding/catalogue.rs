//! Fixed baseline content: the module catalogue and the demo roster.
//!
//! Everything here is deterministic so that reseeding an empty store always
//! produces byte-identical catalogue documents.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Lesson, Module, ModuleStatus, ProficiencyLevel, Resource, ResourceType};

pub const ADMIN_ID: &str = "admin-001";
pub const ADMIN_EMAIL: &str = "admin@learnhub.local";
pub const ADMIN_NAME: &str = "Platform Admin";

/// `(id, display name, email)` of the demo teachers. Catalogue modules are assigned to these ids.
pub const DEMO_TEACHERS: [(&str, &str, &str); 2] = [
    ("teacher-001", "Amira Haddad", "amira.haddad@learnhub.local"),
    ("teacher-002", "Lucas Moreau", "lucas.moreau@learnhub.local"),
];

pub const DEMO_STUDENTS: [(&str, &str, &str); 6] = [
    ("student-001", "Sara Ibrahim", "sara.ibrahim@learnhub.local"),
    ("student-002", "Omar Khalil", "omar.khalil@learnhub.local"),
    ("student-003", "Lina Farouk", "lina.farouk@learnhub.local"),
    ("student-004", "Youssef Nabil", "youssef.nabil@learnhub.local"),
    ("student-005", "Mona Adel", "mona.adel@learnhub.local"),
    ("student-006", "Karim Saleh", "karim.saleh@learnhub.local"),
];

struct ModuleSpec {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    level: ProficiencyLevel,
    teachers: &'static [&'static str],
    lessons: &'static [(&'static str, u32)],
    resources: &'static [(&'static str, ResourceType, &'static str, Option<usize>)],
}

const MODULES: [ModuleSpec; 5] = [
    ModuleSpec {
        id: "module-001",
        title: "English Foundations",
        description: "Alphabet, sounds, greetings and the core grammar every learner needs.",
        level: ProficiencyLevel::Beginner,
        teachers: &["teacher-001"],
        lessons: &[
            ("The English Alphabet", 20),
            ("Greetings and Introductions", 25),
            ("Numbers and Time", 30),
            ("Present Simple", 35),
            ("Everyday Vocabulary", 30),
        ],
        resources: &[
            ("Alphabet chart", ResourceType::Pdf, "https://cdn.learnhub.local/foundations/alphabet.pdf", Some(0)),
            ("Pronunciation guide", ResourceType::Link, "https://learnhub.local/guides/pronunciation", None),
        ],
    },
    ModuleSpec {
        id: "module-002",
        title: "Everyday Conversation",
        description: "Practical dialogues for shopping, travel and small talk.",
        level: ProficiencyLevel::Beginner,
        teachers: &["teacher-002"],
        lessons: &[
            ("At the Café", 25),
            ("Asking for Directions", 25),
            ("Shopping Basics", 30),
            ("Making Plans", 30),
        ],
        resources: &[
            ("Travel phrasebook", ResourceType::Pdf, "https://cdn.learnhub.local/conversation/phrasebook.pdf", None),
            ("City map exercise", ResourceType::Image, "https://cdn.learnhub.local/conversation/map.png", Some(1)),
        ],
    },
    ModuleSpec {
        id: "module-003",
        title: "Business English",
        description: "Emails, meetings and presentations for the workplace.",
        level: ProficiencyLevel::Intermediate,
        teachers: &["teacher-001", "teacher-002"],
        lessons: &[
            ("Writing Professional Emails", 40),
            ("Running a Meeting", 45),
            ("Negotiation Language", 45),
            ("Presenting Data", 40),
            ("Networking Small Talk", 30),
            ("Job Interviews", 45),
        ],
        resources: &[
            ("Email templates", ResourceType::Pdf, "https://cdn.learnhub.local/business/email-templates.pdf", Some(0)),
            ("Meeting vocabulary", ResourceType::Link, "https://learnhub.local/guides/meetings", Some(1)),
            ("Interview checklist", ResourceType::Other, "https://cdn.learnhub.local/business/interview.docx", Some(5)),
        ],
    },
    ModuleSpec {
        id: "module-004",
        title: "Pronunciation Lab",
        description: "Stress, rhythm and intonation drills with voice practice.",
        level: ProficiencyLevel::Intermediate,
        teachers: &["teacher-002"],
        lessons: &[
            ("Vowel Sounds", 20),
            ("Consonant Clusters", 25),
            ("Word Stress", 25),
            ("Sentence Rhythm", 30),
        ],
        resources: &[("IPA reference", ResourceType::Pdf, "https://cdn.learnhub.local/pronunciation/ipa.pdf", None)],
    },
    ModuleSpec {
        id: "module-005",
        title: "Academic Writing",
        description: "Essay structure, argumentation and citation for university study.",
        level: ProficiencyLevel::Advanced,
        teachers: &["teacher-001"],
        lessons: &[
            ("Thesis Statements", 40),
            ("Paragraph Cohesion", 45),
            ("Building an Argument", 50),
            ("Citing Sources", 35),
            ("Editing and Proofreading", 40),
        ],
        resources: &[
            ("Citation style sheet", ResourceType::Pdf, "https://cdn.learnhub.local/academic/citations.pdf", Some(3)),
            ("Sample essays", ResourceType::Link, "https://learnhub.local/academic/samples", None),
        ],
    },
];

fn catalogue_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds the fixed module catalogue.
pub fn baseline_modules() -> Vec<Module> {
    let created_at = catalogue_created_at();
    MODULES
        .iter()
        .map(|entry| {
            let lessons: Vec<Lesson> = entry
                .lessons
                .iter()
                .enumerate()
                .map(|(i, (title, minutes))| Lesson {
                    id: format!("{}-lesson-{:02}", entry.id, i + 1),
                    title: (*title).to_string(),
                    duration_minutes: *minutes,
                    media_ref: Some(format!("media/{}/{:02}.mp4", entry.id, i + 1)),
                    order: i as u32 + 1,
                })
                .collect();
            let resources = entry
                .resources
                .iter()
                .enumerate()
                .map(|(i, (title, kind, url, lesson_idx))| Resource {
                    id: format!("{}-res-{:02}", entry.id, i + 1),
                    title: (*title).to_string(),
                    kind: *kind,
                    url: (*url).to_string(),
                    lesson_ref: lesson_idx.and_then(|idx| lessons.get(idx)).map(|l| l.id.clone()),
                })
                .collect();
            Module {
                id: entry.id.to_string(),
                title: entry.title.to_string(),
                description: entry.description.to_string(),
                level: entry.level,
                status: ModuleStatus::Published,
                created_at,
                assigned_teacher_ids: entry.teachers.iter().map(|t| t.to_string()).collect(),
                lessons,
                resources,
            }
        })
        .collect()
}
