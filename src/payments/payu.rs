//! PayU integration: redirect-callback hash verification and the mirrored
//! payment-request hash.
//!
//! PayU authenticates both directions with SHA-512 over a pipe-joined field
//! sequence keyed by the merchant salt. The response ("reverse") sequence is
//! the request sequence reversed, with the salt and transaction status at
//! the front. The five empty placeholders are part of the protocol and must
//! be reproduced exactly.

use serde::Deserialize;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

/// Fields PayU posts back to the callback URL after a payment attempt.
/// The udf slots carry the order context: udf1 = user id, udf2 = plan id,
/// udf3 = flow, udf4 = teacher id, udf5 = referral code.
#[derive(Debug, Clone, Deserialize)]
pub struct PayuCallback {
    #[serde(default)]
    pub mihpayid: String,
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub status: String,
    pub hash: String,
    #[serde(default)]
    pub udf1: String,
    #[serde(default)]
    pub udf2: String,
    #[serde(default)]
    pub udf3: String,
    #[serde(default)]
    pub udf4: String,
    #[serde(default)]
    pub udf5: String,
}

/// Verify the reverse hash on a callback in constant time.
pub fn verify_callback_hash(merchant_key: &str, salt: &str, cb: &PayuCallback) -> bool {
    let expected = response_hash(merchant_key, salt, cb);
    let posted = cb.hash.trim().to_lowercase();
    expected.as_bytes().ct_eq(posted.as_bytes()).into()
}

/// SHA-512 over
/// `salt|status|||||||udf5|udf4|udf3|udf2|udf1|email|firstname|productinfo|amount|txnid|key`.
pub fn response_hash(merchant_key: &str, salt: &str, cb: &PayuCallback) -> String {
    let fields: [&str; 18] = [
        salt,
        &cb.status,
        "",
        "",
        "",
        "",
        "",
        &cb.udf5,
        &cb.udf4,
        &cb.udf3,
        &cb.udf2,
        &cb.udf1,
        &cb.email,
        &cb.firstname,
        &cb.productinfo,
        &cb.amount,
        &cb.txnid,
        merchant_key,
    ];
    sha512_hex(&fields.join("|"))
}

/// Forward hash sent with the payment form:
/// `key|txnid|amount|productinfo|firstname|email|udf1|udf2|udf3|udf4|udf5||||||salt`.
#[allow(clippy::too_many_arguments)]
pub fn payment_request_hash(
    merchant_key: &str,
    salt: &str,
    txnid: &str,
    amount: &str,
    productinfo: &str,
    firstname: &str,
    email: &str,
    udf: &[&str; 5],
) -> String {
    let fields: [&str; 17] = [
        merchant_key,
        txnid,
        amount,
        productinfo,
        firstname,
        email,
        udf[0],
        udf[1],
        udf[2],
        udf[3],
        udf[4],
        "",
        "",
        "",
        "",
        "",
        salt,
    ];
    sha512_hex(&fields.join("|"))
}

fn sha512_hex(payload: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}
