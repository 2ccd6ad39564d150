//! Idempotent baseline population of the Collection Store.
//!
//! [`SeedGenerator::run`] is safe to call on every startup. A `seed_marker`
//! document records a completed run; while it is present nothing is
//! generated. Without it, each step checks its own target and only fills in
//! what is missing, so a run interrupted by a storage failure can simply be
//! retried.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error_handling::types::StorageError;
use crate::models::{
    CourseProgress, Module, PaymentBook, PaymentMethod, PaymentRecord, PaymentRecordStatus,
    PaymentStatus, PlanType, PlatformSettings, ProgressBook, Role, StudentProgress, Subscription,
    SubscriptionBook, SubscriptionStatus, TeacherPayment, User,
};
use crate::seeding::catalogue::{self, ADMIN_EMAIL, ADMIN_ID, ADMIN_NAME, DEMO_STUDENTS, DEMO_TEACHERS};
use crate::seeding::random_source::RandomSource;
use crate::storage::{Collection, Store};

/// Bumped whenever the shape of seeded data changes.
pub const SEED_VERSION: u32 = 1;

const STUDY_LOG_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStep {
    DemoUsers,
    Admin,
    PlatformSettings,
    Modules,
    Subscriptions,
    TeacherPayments,
    StudentProgress,
}

/// Persisted proof that seeding completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedMarker {
    pub version: u32,
    pub seeded_at: DateTime<Utc>,
    pub steps: Vec<SeedStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub step: SeedStep,
    pub created: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    /// The marker was already present and nothing ran.
    pub skipped: bool,
    pub steps: Vec<StepOutcome>,
}

impl SeedReport {
    fn record(&mut self, step: SeedStep, created: usize) {
        info!("Seed step {:?}: created {} record(s)", step, created);
        self.steps.push(StepOutcome { step, created });
    }

    /// Records created by `step`, or 0 if it did not run.
    pub fn created(&self, step: SeedStep) -> usize {
        self.steps
            .iter()
            .find(|o| o.step == step)
            .map_or(0, |o| o.created)
    }

    pub fn total_created(&self) -> usize {
        self.steps.iter().map(|o| o.created).sum()
    }
}

#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Populate a demo roster of teachers and students when no users exist yet.
    pub demo_users: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self { demo_users: true }
    }
}

pub struct SeedGenerator<'a, R: RandomSource> {
    store: &'a Store,
    rng: R,
    now: DateTime<Utc>,
    options: SeedOptions,
}

impl<'a, R: RandomSource> SeedGenerator<'a, R> {
    pub fn new(store: &'a Store, rng: R) -> Self {
        Self {
            store,
            rng,
            now: Utc::now(),
            options: SeedOptions::default(),
        }
    }

    /// Pins the clock used for every synthesized timestamp.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_options(mut self, options: SeedOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs every step that is still needed and writes the marker last.
    ///
    /// Storage failures propagate unmodified. No marker is written in that
    /// case, so the next call retries generation.
    pub fn run(&mut self) -> Result<SeedReport, StorageError> {
        if let Some(marker) = self.store.read_existing::<SeedMarker>(Collection::SeedMarker)? {
            if marker.version >= SEED_VERSION {
                info!("Store already seeded at {} (v{}), skipping", marker.seeded_at, marker.version);
                return Ok(SeedReport {
                    skipped: true,
                    steps: Vec::new(),
                });
            }
            info!("Seed marker v{} is outdated, filling in missing data", marker.version);
        }

        let mut report = SeedReport::default();
        if self.options.demo_users {
            let created = self.ensure_demo_users()?;
            report.record(SeedStep::DemoUsers, created);
        }
        let created = self.ensure_admin()?;
        report.record(SeedStep::Admin, created);
        let (settings, created) = self.ensure_platform_settings()?;
        report.record(SeedStep::PlatformSettings, created);
        let created = self.ensure_modules()?;
        report.record(SeedStep::Modules, created);

        let users: Vec<User> = self.store.read(Collection::Users)?;
        let created = self.ensure_subscriptions(&users, &settings)?;
        report.record(SeedStep::Subscriptions, created);
        let created = self.ensure_teacher_payments(&users, &settings)?;
        report.record(SeedStep::TeacherPayments, created);
        let created = self.ensure_student_progress(&users)?;
        report.record(SeedStep::StudentProgress, created);

        let marker = SeedMarker {
            version: SEED_VERSION,
            seeded_at: self.now,
            steps: report.steps.iter().map(|o| o.step).collect(),
        };
        self.store.write(Collection::SeedMarker, &marker)?;
        info!("Seeding finished, {} record(s) created", report.total_created());
        Ok(report)
    }

    fn ensure_demo_users(&mut self) -> Result<usize, StorageError> {
        if self.store.contains(Collection::Users)? {
            debug!("Users collection exists, no demo roster");
            return Ok(0);
        }
        let mut users = Vec::with_capacity(DEMO_TEACHERS.len() + DEMO_STUDENTS.len());
        for (id, name, email) in DEMO_TEACHERS {
            users.push(self.demo_user(id, name, email, Role::Teacher));
        }
        for (id, name, email) in DEMO_STUDENTS {
            users.push(self.demo_user(id, name, email, Role::Student));
        }
        self.store.write(Collection::Users, &users)?;
        Ok(users.len())
    }

    fn demo_user(&mut self, id: &str, name: &str, email: &str, role: Role) -> User {
        let joined_at = self.now - Duration::days(self.rng.range_i64(30, 365));
        let last_active_at = self.now - Duration::hours(self.rng.range_i64(0, 72));
        User {
            id: id.to_string(),
            display_name: name.to_string(),
            email: email.to_string(),
            password_secret: Uuid::new_v4().simple().to_string(),
            role,
            profile_image_ref: None,
            joined_at,
            last_active_at,
        }
    }

    fn ensure_admin(&mut self) -> Result<usize, StorageError> {
        let now = self.now;
        self.store.update(Collection::Users, |users: &mut Vec<User>| {
            if users.iter().any(|u| u.role == Role::Admin) {
                return Ok::<_, StorageError>(0);
            }
            users.push(User {
                id: ADMIN_ID.to_string(),
                display_name: ADMIN_NAME.to_string(),
                email: ADMIN_EMAIL.to_string(),
                password_secret: Uuid::new_v4().simple().to_string(),
                role: Role::Admin,
                profile_image_ref: None,
                joined_at: now,
                last_active_at: now,
            });
            Ok(1)
        })
    }

    fn ensure_platform_settings(&mut self) -> Result<(PlatformSettings, usize), StorageError> {
        if let Some(settings) = self.store.read_existing(Collection::PlatformSettings)? {
            return Ok((settings, 0));
        }
        let settings = PlatformSettings::default();
        self.store.write(Collection::PlatformSettings, &settings)?;
        Ok((settings, 1))
    }

    fn ensure_modules(&mut self) -> Result<usize, StorageError> {
        if self.store.contains(Collection::Modules)? {
            return Ok(0);
        }
        let modules = catalogue::baseline_modules();
        self.store.write(Collection::Modules, &modules)?;
        Ok(modules.len())
    }

    fn ensure_subscriptions(&mut self, users: &[User], settings: &PlatformSettings) -> Result<usize, StorageError> {
        let store = self.store;
        store.update(Collection::Subscriptions, |book: &mut SubscriptionBook| {
            let mut created = 0;
            for student in users.iter().filter(|u| u.is_student()) {
                if book.contains_key(&student.id) {
                    continue;
                }
                let subscription = self.synthesize_subscription(&student.id, settings);
                book.insert(student.id.clone(), subscription);
                created += 1;
            }
            Ok::<_, StorageError>(created)
        })
    }

    fn synthesize_subscription(&mut self, student_id: &str, settings: &PlatformSettings) -> Subscription {
        let plan = *self.rng.pick(&PlanType::ALL);
        let status = *self.rng.pick(&SubscriptionStatus::ALL);
        let start_date = self.now - Duration::days(self.rng.range_i64(0, 180));
        let next_payment_date = self.now + Duration::days(self.rng.range_i64(1, 31));
        Subscription {
            student_id: student_id.to_string(),
            plan,
            status,
            start_date,
            next_payment_date,
            amount: settings.pricing.price(plan),
        }
    }

    fn ensure_teacher_payments(&mut self, users: &[User], settings: &PlatformSettings) -> Result<usize, StorageError> {
        let store = self.store;
        store.update(Collection::TeacherPayments, |book: &mut PaymentBook| {
            let mut created = 0;
            for teacher in users.iter().filter(|u| u.is_teacher()) {
                if book.contains_key(&teacher.id) {
                    continue;
                }
                let payment = self.synthesize_teacher_payment(&teacher.id, settings.teacher_hourly_rate);
                book.insert(teacher.id.clone(), payment);
                created += 1;
            }
            Ok::<_, StorageError>(created)
        })
    }

    fn synthesize_teacher_payment(&mut self, teacher_id: &str, hourly_rate: f64) -> TeacherPayment {
        let total_hours = self.rng.range_i64(20, 120) as f64;
        let total_amount = total_hours * hourly_rate;
        let paid_amount = (total_amount * self.rng.range_f64(0.3, 0.8)).floor();
        let mut payment = TeacherPayment::new(teacher_id, total_hours, hourly_rate, paid_amount);
        if payment.pending_amount > 0.0 && self.rng.chance(0.25) {
            payment.status = PaymentStatus::Overdue;
        }

        let entries = 1 + self.rng.below(5);
        let share = (paid_amount / entries as f64).floor();
        let remainder = paid_amount - share * entries as f64;
        for i in 0..entries {
            let back = Duration::days(30 * i as i64) + Duration::hours(self.rng.range_i64(0, 5 * 24));
            let method = *self.rng.pick(&[PaymentMethod::BankTransfer, PaymentMethod::Paypal]);
            payment.payment_history.push(PaymentRecord {
                amount: if i == 0 { share + remainder } else { share },
                date: self.now - back,
                method,
                status: PaymentRecordStatus::Completed,
            });
        }
        payment
    }

    fn ensure_student_progress(&mut self, users: &[User]) -> Result<usize, StorageError> {
        let modules: Vec<Module> = self.store.read(Collection::Modules)?;
        let store = self.store;
        store.update(Collection::StudentProgress, |book: &mut ProgressBook| {
            let mut created = 0;
            for student in users.iter().filter(|u| u.is_student()) {
                if book.contains_key(&student.id) {
                    continue;
                }
                let progress = self.synthesize_progress(&student.id, &modules);
                book.insert(student.id.clone(), progress);
                created += 1;
            }
            Ok::<_, StorageError>(created)
        })
    }

    fn synthesize_progress(&mut self, student_id: &str, modules: &[Module]) -> StudentProgress {
        let mut progress = StudentProgress::new(student_id);
        let fraction = self.rng.range_f64(0.1, 0.95);

        let wanted = (2 + self.rng.below(3)).min(modules.len());
        let mut indices: Vec<usize> = (0..modules.len()).collect();
        for i in 0..wanted {
            let j = i + self.rng.below(indices.len() - i);
            indices.swap(i, j);
        }

        for &idx in &indices[..wanted] {
            let module = &modules[idx];
            let total = module.total_lessons();
            let jittered = (fraction + self.rng.range_f64(-0.1, 0.1)).clamp(0.0, 1.0);
            let completed = ((jittered * total as f64).round() as usize).min(total);
            let done: Vec<_> = module.lessons_in_order().into_iter().take(completed).collect();
            let minutes: u32 = done.iter().map(|l| l.duration_minutes).sum();

            let enrolled_at = self.now - Duration::days(self.rng.range_i64(10, 90));
            let mut course = CourseProgress::new(module.id.clone(), enrolled_at);
            course.completed_lesson_ids = done.iter().map(|l| l.id.clone()).collect();
            course.total_study_hours = round_tenth(minutes as f64 / 60.0 * self.rng.range_f64(1.0, 3.0));
            course.last_accessed_at = self.now - Duration::hours(self.rng.range_i64(0, 7 * 24));
            course.recompute(total);
            progress.courses.push(course);
        }

        let today = self.now.date_naive();
        for back in (0..STUDY_LOG_DAYS).rev() {
            let date = today - Duration::days(back);
            let (hours, lessons) = if self.rng.chance(0.7) {
                (round_tenth(self.rng.range_f64(0.5, 3.0)), 1 + self.rng.below(3) as u32)
            } else {
                (0.0, 0)
            };
            progress.log_study(date, hours, lessons);
        }

        progress.refresh();
        progress
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
