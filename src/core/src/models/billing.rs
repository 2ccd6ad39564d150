//! Student subscriptions, teacher payouts and the platform settings that price them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Monthly,
    Quarterly,
    Yearly,
}

impl PlanType {
    pub const ALL: [PlanType; 3] = [PlanType::Monthly, PlanType::Quarterly, PlanType::Yearly];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Pending,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 2] = [SubscriptionStatus::Active, SubscriptionStatus::Pending];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub student_id: String,
    pub plan: PlanType,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub next_payment_date: DateTime<Utc>,
    /// Price of `plan` in the pricing table when the subscription was created.
    pub amount: f64,
}

/// The `subscriptions` collection, keyed by student id.
pub type SubscriptionBook = BTreeMap<String, Subscription>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Paypal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub status: PaymentRecordStatus,
}

/// Payout ledger for one teacher.
///
/// `total_amount == total_hours * hourly_rate` and
/// `pending_amount == total_amount - paid_amount` hold after every
/// [`TeacherPayment::recompute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPayment {
    pub teacher_id: String,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    pub status: PaymentStatus,
    /// Newest first.
    #[serde(default)]
    pub payment_history: Vec<PaymentRecord>,
}

/// The `teacher_payments` collection, keyed by teacher id.
pub type PaymentBook = BTreeMap<String, TeacherPayment>;

impl TeacherPayment {
    pub fn new(teacher_id: impl Into<String>, total_hours: f64, hourly_rate: f64, paid_amount: f64) -> Self {
        let mut payment = Self {
            teacher_id: teacher_id.into(),
            total_hours,
            hourly_rate,
            total_amount: 0.0,
            paid_amount,
            pending_amount: 0.0,
            status: PaymentStatus::Pending,
            payment_history: Vec::new(),
        };
        payment.recompute();
        payment
    }

    /// Re-derives totals. An overdue ledger stays overdue until it is settled.
    pub fn recompute(&mut self) {
        self.total_amount = self.total_hours * self.hourly_rate;
        self.pending_amount = self.total_amount - self.paid_amount;
        self.status = if self.pending_amount <= 0.0 {
            PaymentStatus::Paid
        } else if self.status == PaymentStatus::Overdue {
            PaymentStatus::Overdue
        } else {
            PaymentStatus::Pending
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTable {
    pub monthly: f64,
    pub quarterly: f64,
    pub yearly: f64,
}

impl PricingTable {
    pub fn price(&self, plan: PlanType) -> f64 {
        match plan {
            PlanType::Monthly => self.monthly,
            PlanType::Quarterly => self.quarterly,
            PlanType::Yearly => self.yearly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSettings {
    pub platform_name: String,
    pub currency: String,
    pub pricing: PricingTable,
    pub teacher_hourly_rate: f64,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            platform_name: "LearnHub".to_string(),
            currency: "USD".to_string(),
            pricing: PricingTable {
                monthly: 29.99,
                quarterly: 79.99,
                yearly: 299.99,
            },
            teacher_hourly_rate: 25.0,
        }
    }
}
