use axum::extract::State;
use axum::response::Redirect;
use chrono::Utc;

use crate::db::{queries, AppState};
use crate::error::{msg, AppError, Result};
use crate::extractors::Form;
use crate::models::{CreateActivationToken, OrderContext};
use crate::payments::payu::{self, PayuCallback};
use crate::util::{append_query_params, generate_activation_token, to_minor_units};

/// Activation tokens stay redeemable for a week, then expire unredeemed.
pub const TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// POST /payu/callback - PayU redirects the buyer's browser here after a
/// payment attempt.
///
/// This is the asynchronous half of verification: the reverse hash and
/// transaction status are checked, then a single-use activation token is
/// persisted and the browser is sent to the activation page carrying it.
/// The actual entitlement mutation happens later, at POST /activate.
pub async fn payu_callback(
    State(state): State<AppState>,
    Form(cb): Form<PayuCallback>,
) -> Result<Redirect> {
    let payu = state
        .payu
        .as_ref()
        .ok_or_else(|| AppError::Internal(msg::PAYU_NOT_CONFIGURED.into()))?;

    if !payu::verify_callback_hash(&payu.merchant_key, &payu.salt, &cb) {
        tracing::warn!(txnid = %cb.txnid, "callback hash mismatch");
        return Ok(failure_redirect(&state, msg::VERIFICATION_FAILED, &cb.txnid));
    }

    if cb.status != "success" {
        tracing::info!(txnid = %cb.txnid, status = %cb.status, "payment not successful");
        return Ok(failure_redirect(&state, "Payment was not successful", &cb.txnid));
    }

    // udf1..udf5 carry user id, plan id, flow, teacher id, referral code.
    let context = match OrderContext::from_parts(
        &cb.udf3,
        &cb.udf1,
        &cb.udf2,
        Some(cb.udf4.as_str()),
        Some(cb.udf5.as_str()),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::warn!(txnid = %cb.txnid, error = %e, "malformed callback context");
            return Ok(failure_redirect(&state, msg::VERIFICATION_FAILED, &cb.txnid));
        }
    };

    let amount: f64 = match cb.amount.parse() {
        Ok(a) => a,
        Err(_) => {
            tracing::warn!(txnid = %cb.txnid, amount = %cb.amount, "unparseable amount");
            return Ok(failure_redirect(&state, msg::VERIFICATION_FAILED, &cb.txnid));
        }
    };

    let token = generate_activation_token();
    let plan_id = context.plan_id().to_string();
    let conn = state.db.get()?;
    queries::create_activation_token(
        &conn,
        &token,
        &CreateActivationToken {
            context,
            original_amount_cents: to_minor_units(amount),
            gateway_order_ref: cb.txnid.clone(),
            gateway_payment_ref: (!cb.mihpayid.is_empty()).then(|| cb.mihpayid.clone()),
            expires_at: Utc::now().timestamp() + TOKEN_TTL_SECONDS,
        },
    )?;

    tracing::info!(txnid = %cb.txnid, "payment verified, activation token issued");

    Ok(Redirect::to(&format!(
        "{}/{}/{}",
        state.activate_page_url,
        token,
        urlencoding::encode(&plan_id)
    )))
}

fn failure_redirect(state: &AppState, message: &str, reference: &str) -> Redirect {
    let url = append_query_params(
        &state.status_page_url,
        &[
            ("status", "failed"),
            ("message", message),
            ("reference", reference),
        ],
    );
    Redirect::to(&url)
}
