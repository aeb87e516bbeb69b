use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// Gateways reject receipts longer than this.
pub const RECEIPT_MAX_LEN: usize = 40;

/// Convert a major-unit amount to integer minor units (rupees to paise).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Build a human-traceable receipt id:
/// `pp_{flow}_{plan fragment}_{user tail}_{random}`, truncated to the
/// gateway limit.
pub fn build_receipt(flow_abbrev: &str, plan_id: &str, user_id: &str) -> String {
    let plan_frag: String = plan_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(6)
        .collect::<String>()
        .to_lowercase();
    let chars: Vec<char> = user_id.chars().collect();
    let tail_start = chars.len().saturating_sub(8);
    let user_tail: String = chars[tail_start..].iter().collect();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();

    let mut receipt = format!("pp_{flow_abbrev}_{plan_frag}_{user_tail}_{suffix}");
    receipt.truncate(RECEIPT_MAX_LEN);
    receipt
}

/// 24 bytes of OS entropy, hex-encoded (48 chars). Unguessable by
/// construction, no counters or timestamps involved.
pub fn generate_activation_token() -> String {
    let mut bytes = [0u8; 24];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Append query parameters to a URL, handling whether it already carries a
/// query string.
pub fn append_query_params(url: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let mut out = String::from(url);
    for (i, (key, value)) in params.iter().enumerate() {
        let sep = if i == 0 {
            if url.contains('?') { '&' } else { '?' }
        } else {
            '&'
        };
        out.push(sep);
        out.push_str(&urlencoding::encode(key));
        out.push('=');
        out.push_str(&urlencoding::encode(value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_rounds_to_nearest_paise() {
        assert_eq!(to_minor_units(499.0), 49900);
        assert_eq!(to_minor_units(800.0), 80000);
        assert_eq!(to_minor_units(0.01), 1);
        assert_eq!(to_minor_units(10.555), 1056);
    }

    #[test]
    fn receipt_stays_within_gateway_limit() {
        let receipt = build_receipt(
            "stp",
            "a-very-long-plan-identifier-string",
            "user-with-a-long-identifier-0001",
        );
        assert!(receipt.len() <= RECEIPT_MAX_LEN);
        assert!(receipt.starts_with("pp_stp_"));
    }

    #[test]
    fn activation_tokens_are_48_hex_chars() {
        let token = generate_activation_token();
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_activation_token());
    }

    #[test]
    fn query_params_respect_existing_query_string() {
        assert_eq!(
            append_query_params("https://x.test/p", &[("a", "1"), ("b", "two words")]),
            "https://x.test/p?a=1&b=two%20words"
        );
        assert_eq!(
            append_query_params("https://x.test/p?a=1", &[("b", "2")]),
            "https://x.test/p?a=1&b=2"
        );
    }
}
