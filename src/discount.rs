//! Referral discount resolution for teacher content plans.
//!
//! Discounts are best-effort: a missing, expired, or inapplicable code, or
//! any lookup error, yields the base price. A buyer must never be blocked
//! from paying full price because a discount could not be resolved.

use chrono::Utc;
use rusqlite::Connection;

use crate::db::queries;

/// Outcome of resolving a referral code against a plan's base price.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountResult {
    /// Final amount in major units, never below 1.0.
    pub amount: f64,
    /// Set only when a discount actually applied.
    pub description: Option<String>,
}

impl DiscountResult {
    fn base(amount: f64) -> Self {
        DiscountResult {
            amount,
            description: None,
        }
    }
}

/// Resolve the final charge for a teacher plan, applying `code` if it is
/// valid for this teacher and plan. Fails open to the base price.
pub fn resolve_final_amount(
    conn: &Connection,
    teacher_id: &str,
    plan_id: &str,
    base_amount: f64,
    code: Option<&str>,
) -> DiscountResult {
    let code = match code.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => return DiscountResult::base(base_amount),
    };

    let referral = match queries::find_referral_code(conn, teacher_id, code) {
        Ok(Some(r)) => r,
        Ok(None) => return DiscountResult::base(base_amount),
        Err(e) => {
            tracing::warn!(teacher_id, code, error = %e, "referral lookup failed, charging base price");
            return DiscountResult::base(base_amount);
        }
    };

    if referral.is_expired(Utc::now().timestamp()) || !referral.applies_to(plan_id) {
        return DiscountResult::base(base_amount);
    }

    let discounted = base_amount * (1.0 - referral.percentage as f64 / 100.0);
    let amount = ((discounted * 100.0).round() / 100.0).max(1.0);

    DiscountResult {
        amount,
        description: Some(format!(
            "{}% off with code {}",
            referral.percentage, referral.code
        )),
    }
}
