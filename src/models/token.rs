use serde::Serialize;

use crate::models::OrderContext;

/// A persisted, single-use, time-bound record of "what should happen" once a
/// deferred (PayU) payment is confirmed. Never deleted; `used` is the audit
/// trail of redemption.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationToken {
    /// High-entropy random lookup key.
    pub token: String,
    pub user_id: String,
    pub plan_id: String,
    /// One of the three `user_type` flows.
    pub flow: String,
    pub teacher_id: Option<String>,
    /// Gross amount paid, minor units.
    pub original_amount_cents: i64,
    pub referral_code: Option<String>,
    /// Gateway transaction id (PayU txnid).
    pub gateway_order_ref: String,
    /// Gateway payment id (PayU mihpayid) when provided; the idempotency key
    /// for the downstream mutation.
    pub gateway_payment_ref: Option<String>,
    pub expires_at: i64,
    pub used: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct CreateActivationToken {
    pub context: OrderContext,
    pub original_amount_cents: i64,
    pub gateway_order_ref: String,
    pub gateway_payment_ref: Option<String>,
    pub expires_at: i64,
}
