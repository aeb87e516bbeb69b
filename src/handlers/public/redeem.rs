use axum::extract::State;
use chrono::Utc;
use rusqlite::TransactionBehavior;
use serde::{Deserialize, Serialize};

use crate::activation::{self, ActivationInput};
use crate::db::{queries, AppState};
use crate::error::{msg, AppError, Result};
use crate::extractors::Json;
use crate::models::OrderContext;

/// Request body for POST /activate
#[derive(Debug, Deserialize)]
pub struct ActivateBody {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    pub success: bool,
    pub message: String,
    pub plan_id: String,
    pub expires_at: i64,
}

/// POST /activate - Redeem an activation token.
///
/// The token claim and the entitlement mutations share one transaction:
/// of two concurrent redemptions exactly one sees the conditional claim
/// succeed, and a crash before commit rolls the claim back so the token
/// can be retried.
pub async fn activate_plan(
    State(state): State<AppState>,
    Json(body): Json<ActivateBody>,
) -> Result<Json<ActivateResponse>> {
    let mut conn = state.db.get()?;
    // Immediate: concurrent redeemers queue as writers up front instead of
    // deadlocking on a read-to-write upgrade.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let token = queries::get_activation_token(&tx, &body.token)?
        .ok_or_else(|| AppError::NotFound(msg::TOKEN_NOT_FOUND.into()))?;

    if token.used {
        return Err(AppError::Conflict(msg::TOKEN_ALREADY_USED.into()));
    }
    if Utc::now().timestamp() > token.expires_at {
        return Err(AppError::Forbidden(msg::TOKEN_EXPIRED.into()));
    }

    if !queries::try_claim_activation_token(&tx, &token.token)? {
        return Err(AppError::Conflict(msg::TOKEN_ALREADY_USED.into()));
    }

    let context = OrderContext::from_parts(
        &token.flow,
        &token.user_id,
        &token.plan_id,
        token.teacher_id.as_deref(),
        token.referral_code.as_deref(),
    )?;

    // Flow C keys its idempotency on the gateway payment id; tokens issued
    // without one (gateway omitted it) fall back to the token itself, which
    // is equally unique per payment.
    let payment_ref = token
        .gateway_payment_ref
        .clone()
        .unwrap_or_else(|| format!("token:{}", token.token));

    let outcome = activation::activate(
        &tx,
        &ActivationInput {
            context,
            gross_cents: token.original_amount_cents,
            gateway_order_ref: token.gateway_order_ref.clone(),
            gateway_payment_ref: payment_ref,
        },
    )?;
    tx.commit()?;

    tracing::info!(
        flow = outcome.flow.as_str(),
        plan_id = %outcome.plan_id,
        "activation token redeemed"
    );

    Ok(Json(ActivateResponse {
        success: true,
        message: format!("{} activated", outcome.plan_name),
        plan_id: outcome.plan_id,
        expires_at: outcome.expires_at,
    }))
}
