use std::str::FromStr;

use serde::Serialize;

/// Payment status of a student-to-teacher-plan subscription.
///
/// Created as `successful`; `refunded` exists for the (out-of-scope) refund
/// transition so the column constraint doesn't need a migration later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Successful,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Successful => "successful",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "successful" => Ok(PaymentStatus::Successful),
            "refunded" => Ok(PaymentStatus::Refunded),
            _ => Err(()),
        }
    }
}

/// One successful student subscription to a teacher's content plan.
/// Write-once apart from the refund status transition.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionRecord {
    pub id: String,
    pub student_id: String,
    pub teacher_id: String,
    pub plan_id: String,
    pub status: PaymentStatus,
    pub started_at: i64,
    pub expires_at: i64,
    /// Gross amount paid by the student, minor units.
    pub amount_cents: i64,
    /// Net amount credited to the teacher after commission, minor units.
    pub net_amount_cents: i64,
    pub referral_code: Option<String>,
    /// Gateway payment id; UNIQUE in the store, the natural idempotency key.
    pub gateway_payment_ref: String,
    pub gateway_order_ref: String,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub student_id: String,
    pub teacher_id: String,
    pub plan_id: String,
    pub started_at: i64,
    pub expires_at: i64,
    pub amount_cents: i64,
    pub net_amount_cents: i64,
    pub referral_code: Option<String>,
    pub gateway_payment_ref: String,
    pub gateway_order_ref: String,
}
