//! Planpay - payment verification and plan activation for a test-prep platform
//!
//! This library covers the money path only: order creation with referral
//! discounts, signature verification for two payment gateways (Razorpay and
//! PayU), single-use activation tokens, and the transactional plan-activation
//! fan-out that updates subscriber tiers, enrollment, and the teacher wallet
//! ledger.

pub mod activation;
pub mod config;
pub mod db;
pub mod discount;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod payments;
pub mod util;
