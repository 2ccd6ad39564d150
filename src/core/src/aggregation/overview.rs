use chrono::{DateTime, Local, TimeZone};
use log::debug;
use serde::Serialize;

use crate::error_handling::types::StorageError;
use crate::models::{Module, PaymentBook, PaymentStatus, PlatformSettings, Role, SubscriptionBook, SubscriptionStatus, User};
use crate::storage::{Collection, Store};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCounts {
    pub students: usize,
    pub teachers: usize,
    pub admins: usize,
}

impl RoleCounts {
    fn tally(users: &[User]) -> Self {
        let mut counts = RoleCounts::default();
        for user in users {
            match user.role {
                Role::Student => counts.students += 1,
                Role::Teacher => counts.teachers += 1,
                Role::Admin => counts.admins += 1,
            }
        }
        counts
    }
}

/// Admin landing statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOverview {
    pub total_students: usize,
    pub total_teachers: usize,
    pub total_modules: usize,
    /// Sum of every subscription amount, pending ones included.
    pub total_revenue: f64,
    pub pending_payments: usize,
    pub active_today: usize,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPaymentSummary {
    pub teachers: usize,
    pub total_owed: f64,
    pub total_paid: f64,
    pub total_pending: f64,
    pub overdue_teachers: usize,
}

pub fn role_counts(store: &Store) -> Result<RoleCounts, StorageError> {
    let users: Vec<User> = store.read(Collection::Users)?;
    Ok(RoleCounts::tally(&users))
}

/// Overview evaluated against the host's local clock.
pub fn platform_overview(store: &Store) -> Result<PlatformOverview, StorageError> {
    platform_overview_at(store, &Local::now())
}

/// Overview where "active today" means `lastActiveAt` falls on the calendar
/// day of `now` in `now`'s time zone.
pub fn platform_overview_at<Tz: TimeZone>(store: &Store, now: &DateTime<Tz>) -> Result<PlatformOverview, StorageError> {
    let users: Vec<User> = store.read(Collection::Users)?;
    let modules: Vec<Module> = store.read(Collection::Modules)?;
    let subscriptions: SubscriptionBook = store.read(Collection::Subscriptions)?;
    let settings: PlatformSettings = store.read(Collection::PlatformSettings)?;

    let counts = RoleCounts::tally(&users);
    let today = now.date_naive();
    let tz = now.timezone();
    let active_today = users
        .iter()
        .filter(|u| u.last_active_at.with_timezone(&tz).date_naive() == today)
        .count();

    let revenue: f64 = subscriptions.values().map(|s| s.amount).sum();
    let pending_payments = subscriptions
        .values()
        .filter(|s| s.status == SubscriptionStatus::Pending)
        .count();

    debug!(
        "Overview over {} users, {} subscriptions, {} modules",
        users.len(),
        subscriptions.len(),
        modules.len()
    );
    Ok(PlatformOverview {
        total_students: counts.students,
        total_teachers: counts.teachers,
        total_modules: modules.len(),
        total_revenue: round_cents(revenue),
        pending_payments,
        active_today,
        currency: settings.currency,
    })
}

pub fn teacher_payment_summary(store: &Store) -> Result<TeacherPaymentSummary, StorageError> {
    let book: PaymentBook = store.read(Collection::TeacherPayments)?;
    let mut summary = TeacherPaymentSummary {
        teachers: book.len(),
        ..Default::default()
    };
    for payment in book.values() {
        summary.total_owed += payment.total_amount;
        summary.total_paid += payment.paid_amount;
        summary.total_pending += payment.pending_amount;
        if payment.status == PaymentStatus::Overdue {
            summary.overdue_teachers += 1;
        }
    }
    summary.total_owed = round_cents(summary.total_owed);
    summary.total_paid = round_cents(summary.total_paid);
    summary.total_pending = round_cents(summary.total_pending);
    Ok(summary)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanType, Subscription, TeacherPayment};
    use crate::test_support::{failing_store, user};
    use chrono::{Duration, FixedOffset, Utc};

    fn fixture(store: &Store, now: DateTime<Utc>) {
        let mut users = Vec::new();
        for i in 0..5 {
            users.push(user(&format!("s{}", i), Role::Student, now - Duration::days(2)));
        }
        users.push(user("t0", Role::Teacher, now));
        users.push(user("t1", Role::Teacher, now - Duration::days(9)));
        users.push(user("a0", Role::Admin, now));
        store.write(Collection::Users, &users).unwrap();

        let amounts = [
            (PlanType::Monthly, 29.99),
            (PlanType::Monthly, 29.99),
            (PlanType::Quarterly, 79.99),
            (PlanType::Yearly, 299.99),
            (PlanType::Monthly, 29.99),
        ];
        let mut book = SubscriptionBook::new();
        for (i, (plan, amount)) in amounts.into_iter().enumerate() {
            let id = format!("s{}", i);
            book.insert(
                id.clone(),
                Subscription {
                    student_id: id,
                    plan,
                    status: if i == 3 { SubscriptionStatus::Pending } else { SubscriptionStatus::Active },
                    start_date: now,
                    next_payment_date: now,
                    amount,
                },
            );
        }
        store.write(Collection::Subscriptions, &book).unwrap();
    }

    #[test]
    fn test_overview_matches_fixture() {
        let store = Store::in_memory();
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 15, 0, 0).unwrap();
        fixture(&store, now);

        let overview = platform_overview_at(&store, &now).unwrap();
        assert_eq!(overview.total_students, 5);
        assert_eq!(overview.total_teachers, 2);
        assert_eq!(overview.total_modules, 0);
        assert_eq!(overview.total_revenue, 469.95);
        assert_eq!(overview.pending_payments, 1);
        assert_eq!(overview.active_today, 2);
        assert_eq!(overview.currency, "USD");
    }

    #[test]
    fn test_active_today_uses_evaluator_time_zone() {
        let store = Store::in_memory();
        // 23:30 UTC on the 20th is already the 21st in UTC+2
        let seen = Utc.with_ymd_and_hms(2024, 5, 20, 23, 30, 0).unwrap();
        store
            .write(Collection::Users, &vec![user("s0", Role::Student, seen)])
            .unwrap();

        let utc_now = Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap();
        assert_eq!(platform_overview_at(&store, &utc_now).unwrap().active_today, 1);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let local_now = plus_two.with_ymd_and_hms(2024, 5, 21, 9, 0, 0).unwrap();
        assert_eq!(platform_overview_at(&store, &local_now).unwrap().active_today, 1);
        let local_before = plus_two.with_ymd_and_hms(2024, 5, 20, 20, 0, 0).unwrap();
        assert_eq!(platform_overview_at(&store, &local_before).unwrap().active_today, 0);
    }

    #[test]
    fn test_role_counts_and_payment_summary() {
        let store = Store::in_memory();
        let now = Utc::now();
        fixture(&store, now);
        assert_eq!(
            role_counts(&store).unwrap(),
            RoleCounts {
                students: 5,
                teachers: 2,
                admins: 1
            }
        );

        let mut book = PaymentBook::new();
        let mut late = TeacherPayment::new("t0", 40.0, 25.0, 500.0);
        late.status = PaymentStatus::Overdue;
        book.insert("t0".into(), late);
        book.insert("t1".into(), TeacherPayment::new("t1", 20.0, 25.0, 500.0));
        store.write(Collection::TeacherPayments, &book).unwrap();

        let summary = teacher_payment_summary(&store).unwrap();
        assert_eq!(summary.teachers, 2);
        assert_eq!(summary.total_owed, 1500.0);
        assert_eq!(summary.total_paid, 1000.0);
        assert_eq!(summary.total_pending, 500.0);
        assert_eq!(summary.overdue_teachers, 1);
    }

    #[test]
    fn test_storage_failure_is_not_masked_as_empty() {
        let store = failing_store();
        assert!(platform_overview(&store).is_err());
        assert!(role_counts(&store).is_err());
    }
}
