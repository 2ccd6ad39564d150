use chrono::{DateTime, Utc};
use log::info;

use crate::error_handling::types::DataError;
use crate::models::{PaymentBook, PaymentMethod, PaymentRecord, PaymentRecordStatus, PlatformSettings, TeacherPayment, User};
use crate::storage::{Collection, Store};

/// Adds taught hours to a teacher's ledger, opening one at the platform
/// hourly rate if the teacher has none yet.
pub fn log_teacher_hours(store: &Store, teacher_id: &str, hours: f64) -> Result<TeacherPayment, DataError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(DataError::Malformed(format!("hours must be positive, got {}", hours)));
    }
    let users: Vec<User> = store.read(Collection::Users)?;
    if !users.iter().any(|u| u.id == teacher_id && u.is_teacher()) {
        return Err(DataError::not_found("teacher", teacher_id));
    }
    let settings: PlatformSettings = store.read(Collection::PlatformSettings)?;

    store.update(Collection::TeacherPayments, |book: &mut PaymentBook| {
        let payment = book
            .entry(teacher_id.to_string())
            .or_insert_with(|| TeacherPayment::new(teacher_id, 0.0, settings.teacher_hourly_rate, 0.0));
        payment.total_hours += hours;
        payment.recompute();
        Ok(payment.clone())
    })
}

/// Records a completed payout and moves `amount` from pending to paid.
///
/// The amount must be positive and no larger than what is still pending.
pub fn record_teacher_payment(
    store: &Store,
    teacher_id: &str,
    amount: f64,
    method: PaymentMethod,
    now: DateTime<Utc>,
) -> Result<TeacherPayment, DataError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DataError::Malformed(format!("payment amount must be positive, got {}", amount)));
    }
    let payment = store.update(Collection::TeacherPayments, |book: &mut PaymentBook| {
        let payment = book
            .get_mut(teacher_id)
            .ok_or_else(|| DataError::not_found("teacher payment", teacher_id))?;
        if amount > payment.pending_amount {
            return Err(DataError::Malformed(format!(
                "payment of {} exceeds the pending {}",
                amount, payment.pending_amount
            )));
        }
        payment.paid_amount += amount;
        payment.payment_history.insert(
            0,
            PaymentRecord {
                amount,
                date: now,
                method,
                status: PaymentRecordStatus::Completed,
            },
        );
        payment.recompute();
        Ok(payment.clone())
    })?;
    info!("Paid {} to {}, {} still pending", amount, teacher_id, payment.pending_amount);
    Ok(payment)
}
