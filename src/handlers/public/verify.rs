use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::activation::{self, ActivationInput};
use crate::db::AppState;
use crate::error::{msg, AppError, Result};
use crate::extractors::Json;
use crate::models::OrderContext;

/// Request body for POST /verify - Razorpay checkout callback fields plus
/// the client's claim about what was bought.
#[derive(Debug, Deserialize)]
pub struct VerifyBody {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub user_id: String,
    pub plan_id: String,
    pub user_type: String,
    #[serde(default)]
    pub teacher_id_for_plan: Option<String>,
    #[serde(default)]
    pub referral_code_used: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
    pub message: String,
    pub plan_id: String,
    pub expires_at: i64,
}

/// POST /verify - Verify a Razorpay payment and activate the plan inline.
///
/// Authenticity is established three ways before anything mutates: the
/// callback signature, the order's paid status on the gateway, and a
/// field-for-field match between the gateway's copy of the order context
/// and the caller's claim. Every mismatch gets the same generic message.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(body): Json<VerifyBody>,
) -> Result<Json<VerifyResponse>> {
    let razorpay = state
        .razorpay
        .as_ref()
        .ok_or_else(|| AppError::Internal(msg::RAZORPAY_NOT_CONFIGURED.into()))?;

    let claim = OrderContext::from_parts(
        &body.user_type,
        &body.user_id,
        &body.plan_id,
        body.teacher_id_for_plan.as_deref(),
        body.referral_code_used.as_deref(),
    )?;

    if !razorpay.verify_payment_signature(
        &body.razorpay_order_id,
        &body.razorpay_payment_id,
        &body.razorpay_signature,
    ) {
        tracing::warn!(order_id = %body.razorpay_order_id, "signature mismatch");
        return Err(AppError::Forbidden(msg::VERIFICATION_FAILED.into()));
    }

    // Amount, status and context all come from the gateway's copy of the
    // order, never from the request.
    let order = razorpay.fetch_order(&body.razorpay_order_id).await?;

    if order.status != "paid" {
        tracing::warn!(order_id = %order.id, status = %order.status, "order not paid");
        return Err(AppError::Forbidden(msg::VERIFICATION_FAILED.into()));
    }

    let recorded = OrderContext::from_notes(&order.notes)
        .map_err(|_| AppError::Forbidden(msg::VERIFICATION_FAILED.into()))?;
    if !recorded.matches(&claim) {
        tracing::warn!(order_id = %order.id, "order context mismatch");
        return Err(AppError::Forbidden(msg::VERIFICATION_FAILED.into()));
    }

    let mut conn = state.db.get()?;
    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
    let outcome = activation::activate(
        &tx,
        &ActivationInput {
            context: recorded,
            gross_cents: order.amount,
            gateway_order_ref: order.id,
            gateway_payment_ref: body.razorpay_payment_id.clone(),
        },
    )?;
    tx.commit()?;

    tracing::info!(
        payment_id = %body.razorpay_payment_id,
        flow = outcome.flow.as_str(),
        plan_id = %outcome.plan_id,
        "payment verified and plan activated"
    );

    Ok(Json(VerifyResponse {
        verified: true,
        message: format!("{} activated", outcome.plan_name),
        plan_id: outcome.plan_id,
        expires_at: outcome.expires_at,
    }))
}
