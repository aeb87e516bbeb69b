//! Plan activation: the single write path that turns a verified payment
//! into entitlements.
//!
//! All three flows run inside one SQLite transaction opened by the caller
//! (together with the token claim), so a failure anywhere leaves no partial
//! state. Flow C is additionally idempotent across whole retries: the
//! subscription insert is keyed by the gateway payment id, and the wallet
//! credit and list updates only run when that insert actually created a row.

use chrono::Utc;
use rusqlite::Connection;

use crate::db::queries;
use crate::error::{msg, AppError, OptionExt, Result};
use crate::models::{plan, CreateSubscription, OrderContext, OrderFlow};

/// Fraction of a content-plan sale credited to the teacher. The remainder
/// is the platform commission.
pub const TEACHER_SHARE: f64 = 0.90;

/// All activations grant one year of access.
pub const YEAR_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Net amount credited to the teacher for a gross sale, in minor units.
pub fn net_teacher_share(gross_cents: i64, rate: f64) -> i64 {
    (gross_cents as f64 * rate).round() as i64
}

/// Everything activation needs from a redeemed token.
#[derive(Debug, Clone)]
pub struct ActivationInput {
    pub context: OrderContext,
    /// Amount actually charged, in minor units.
    pub gross_cents: i64,
    pub gateway_order_ref: String,
    pub gateway_payment_ref: String,
}

/// What the activation granted, for the API response.
#[derive(Debug, Clone)]
pub struct ActivationOutcome {
    pub flow: OrderFlow,
    pub plan_id: String,
    pub plan_name: String,
    pub expires_at: i64,
    /// False when Flow C found an existing subscription for this payment
    /// (a replayed redemption); side effects were skipped.
    pub newly_recorded: bool,
}

/// Apply the flow-specific entitlement changes. Must be called on a
/// connection with an open transaction; the caller commits after the token
/// claim and this both succeed.
pub fn activate(conn: &Connection, input: &ActivationInput) -> Result<ActivationOutcome> {
    let now = Utc::now().timestamp();
    let expires_at = now + YEAR_SECONDS;

    match &input.context {
        OrderContext::StudentPlatformPlan { user_id, plan_id } => {
            let catalog_plan =
                plan::student_platform_plan(plan_id).or_not_found(msg::PLAN_NOT_FOUND)?;

            // Re-activation simply resets the expiry window.
            if !queries::set_student_platform_plan(conn, user_id, plan_id, expires_at)? {
                return Err(AppError::NotFound(msg::STUDENT_NOT_FOUND.into()));
            }

            Ok(ActivationOutcome {
                flow: OrderFlow::StudentPlatformPlan,
                plan_id: plan_id.clone(),
                plan_name: catalog_plan.name.to_string(),
                expires_at,
                newly_recorded: true,
            })
        }

        OrderContext::TeacherPlatformPlan { user_id, plan_id } => {
            let catalog_plan =
                plan::teacher_platform_plan(plan_id).or_not_found(msg::PLAN_NOT_FOUND)?;

            if !queries::set_teacher_platform_plan(
                conn,
                user_id,
                plan_id,
                catalog_plan.max_content_plans,
            )? {
                return Err(AppError::NotFound(msg::TEACHER_NOT_FOUND.into()));
            }

            Ok(ActivationOutcome {
                flow: OrderFlow::TeacherPlatformPlan,
                plan_id: plan_id.clone(),
                plan_name: catalog_plan.name.to_string(),
                expires_at,
                newly_recorded: true,
            })
        }

        OrderContext::StudentTeacherPlan {
            user_id,
            plan_id,
            teacher_id,
            referral_code,
        } => {
            let student =
                queries::get_student_by_id(conn, user_id)?.or_not_found(msg::STUDENT_NOT_FOUND)?;
            let teacher = queries::get_teacher_by_id(conn, teacher_id)?
                .or_not_found(msg::TEACHER_NOT_FOUND)?;
            let content_plan = queries::get_teacher_plan_by_id(conn, plan_id)?
                .filter(|p| p.teacher_id == teacher.id)
                .or_not_found(msg::TEACHER_PLAN_NOT_FOUND)?;

            let net_cents = net_teacher_share(input.gross_cents, TEACHER_SHARE);

            let (subscription, created) = queries::insert_subscription_if_absent(
                conn,
                &CreateSubscription {
                    student_id: student.id.clone(),
                    teacher_id: teacher.id.clone(),
                    plan_id: content_plan.id.clone(),
                    started_at: now,
                    expires_at,
                    amount_cents: input.gross_cents,
                    net_amount_cents: net_cents,
                    referral_code: referral_code.clone(),
                    gateway_payment_ref: input.gateway_payment_ref.clone(),
                    gateway_order_ref: input.gateway_order_ref.clone(),
                },
            )?;

            if created {
                queries::enroll_student_in_plan(conn, &content_plan.id, &student.id)?;
                queries::link_student_to_teacher(conn, &student.id, &teacher.id)?;
                credit_wallet(
                    conn,
                    &teacher.id,
                    net_cents,
                    &subscription.id,
                    &format!("Sale of {} to {}", content_plan.name, student.name),
                )?;
            } else {
                tracing::info!(
                    payment_ref = %input.gateway_payment_ref,
                    subscription_id = %subscription.id,
                    "subscription already recorded for payment, skipping side effects"
                );
            }

            Ok(ActivationOutcome {
                flow: OrderFlow::StudentTeacherPlan,
                plan_id: content_plan.id,
                plan_name: content_plan.name,
                expires_at: subscription.expires_at,
                newly_recorded: created,
            })
        }
    }
}

/// Record a wallet credit: one ledger entry plus an atomic counter bump,
/// always on the same connection so they commit or roll back together.
pub fn credit_wallet(
    conn: &Connection,
    teacher_id: &str,
    amount_cents: i64,
    subscription_id: &str,
    description: &str,
) -> Result<()> {
    queries::create_wallet_entry(conn, teacher_id, amount_cents, subscription_id, description)?;
    if !queries::increment_wallet_balance(conn, teacher_id, amount_cents)? {
        return Err(AppError::NotFound(msg::TEACHER_NOT_FOUND.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_share_rounds_to_nearest_paise() {
        assert_eq!(net_teacher_share(80000, TEACHER_SHARE), 72000);
        assert_eq!(net_teacher_share(100, TEACHER_SHARE), 90);
        assert_eq!(net_teacher_share(1, TEACHER_SHARE), 1);
        assert_eq!(net_teacher_share(0, TEACHER_SHARE), 0);
    }
}
