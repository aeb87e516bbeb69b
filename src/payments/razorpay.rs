//! Razorpay integration: order creation, order fetch, and callback
//! signature verification.
//!
//! Razorpay's checkout callback is authenticated with an HMAC-SHA256 over
//! `{order_id}|{payment_id}` keyed by the API secret. The hex digest is
//! compared in constant time; a mismatch says nothing about which input was
//! wrong.

use std::collections::BTreeMap;
use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::RazorpayConfig;
use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

const API_BASE: &str = "https://api.razorpay.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Order as created on / fetched from the gateway. Amounts are minor units.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    error: GatewayErrorBody,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone)]
pub struct RazorpayClient {
    client: Client,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create an order on the gateway, carrying the business context in the
    /// order notes so verification can read it back from the gateway's copy.
    pub async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
        notes: &BTreeMap<String, String>,
    ) -> Result<RazorpayOrder> {
        let response = self
            .client
            .post(format!("{}/orders", API_BASE))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderRequest {
                amount: amount_minor,
                currency,
                receipt,
                notes,
            })
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Razorpay API error: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let description = serde_json::from_str::<GatewayError>(&error_text)
                .map(|e| e.error.description)
                .unwrap_or(error_text);
            return Err(AppError::Internal(format!(
                "Razorpay order creation failed: {}",
                description
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Razorpay response parse error: {}", e)))
    }

    /// Fetch the gateway's copy of an order. Used at verification time so
    /// amount, status and notes come from the gateway, not the caller.
    pub async fn fetch_order(&self, order_id: &str) -> Result<RazorpayOrder> {
        let response = self
            .client
            .get(format!("{}/orders/{}", API_BASE, order_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Razorpay API error: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Razorpay order fetch failed with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Razorpay response parse error: {}", e)))
    }

    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        verify_payment_signature(&self.key_secret, order_id, payment_id, signature)
    }
}

/// Check a checkout callback signature: HMAC-SHA256 over
/// `{order_id}|{payment_id}`, hex-encoded, constant-time comparison.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let expected = sign_payload(secret, order_id, payment_id);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

pub fn sign_payload(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length; unreachable in practice.
        Err(_) => return String::new(),
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
