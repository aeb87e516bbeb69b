use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::discount;
use crate::error::{msg, AppError, Result};
use crate::extractors::Json;
use crate::models::OrderContext;
use crate::util::{build_receipt, to_minor_units};

/// Request body for POST /orders
#[derive(Debug, Deserialize)]
pub struct CreateOrderBody {
    /// Amount in major units (rupees).
    pub amount: f64,
    pub user_id: String,
    pub plan_id: String,
    pub user_type: String,
    #[serde(default)]
    pub teacher_id_for_plan: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Amount in minor units, as the checkout widget expects.
    pub amount: i64,
    pub currency: String,
    /// Public key id for the checkout widget.
    pub key_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_description: Option<String>,
}

/// POST /orders - Create a gateway order for one of the three purchase flows.
///
/// The business context travels to the gateway inside the order notes, so
/// verification later compares the gateway's copy against the caller's
/// claim. A failed or abandoned order is never retried; the client simply
/// creates a new one.
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderBody>,
) -> Result<Json<CreateOrderResponse>> {
    if !body.amount.is_finite() || body.amount <= 0.0 {
        return Err(AppError::BadRequest(msg::INVALID_AMOUNT.into()));
    }

    let razorpay = state
        .razorpay
        .as_ref()
        .ok_or_else(|| AppError::Internal(msg::RAZORPAY_NOT_CONFIGURED.into()))?;

    let context = OrderContext::from_parts(
        &body.user_type,
        &body.user_id,
        &body.plan_id,
        body.teacher_id_for_plan.as_deref(),
        body.referral_code.as_deref(),
    )?;

    // Referral discounts only exist for teacher content plans.
    let (final_amount, discount_description) = match context.teacher_id() {
        Some(teacher_id) => {
            let conn = state.db.get()?;
            let resolved = discount::resolve_final_amount(
                &conn,
                teacher_id,
                context.plan_id(),
                body.amount,
                context.referral_code(),
            );
            (resolved.amount, resolved.description)
        }
        None => (body.amount, None),
    };

    let receipt = build_receipt(
        context.flow().abbrev(),
        context.plan_id(),
        context.user_id(),
    );
    let amount_minor = to_minor_units(final_amount);

    let order = razorpay
        .create_order(amount_minor, "INR", &receipt, &context.to_notes())
        .await?;

    tracing::info!(
        order_id = %order.id,
        flow = context.flow().as_str(),
        amount_minor,
        "gateway order created"
    );

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: razorpay.key_id().to_string(),
        discount_description,
    }))
}
