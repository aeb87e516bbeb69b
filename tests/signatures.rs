//! Gateway signature verification: known-good digests and tamper rejection

use planpay::payments::{payu, razorpay};

const RZP_SECRET: &str = "test_secret_key";
const RZP_ORDER: &str = "order_MkWa7S9ZQCxxxx";
const RZP_PAYMENT: &str = "pay_MkWbEHu2Fqxxxx";
// Precomputed HMAC-SHA256(test_secret_key, "order_...|pay_...")
const RZP_SIGNATURE: &str = "b7fd2ae3c1328379b797c5eac7f54c0b22dbb387a6d2552431cc109ddcf86e7d";

const PAYU_KEY: &str = "testkey";
const PAYU_SALT: &str = "testsalt";
// Precomputed SHA-512 over the reverse sequence for the callback below
const PAYU_HASH: &str = "6715a1122a15d4d5b4c21354500546e436f3506ebb6050a4257b4fdb3d3be8fe1ec4147681b8cf3d67100d5b56157772dc49e74ff906a70d0fc1ca5019fac363";

fn payu_callback() -> payu::PayuCallback {
    payu::PayuCallback {
        mihpayid: "403993715531234567".into(),
        txnid: "pp_stp_plango_nt-0001_x9k2qa".into(),
        amount: "800.00".into(),
        productinfo: "Gold Plan".into(),
        firstname: "Asha".into(),
        email: "asha@example.com".into(),
        status: "success".into(),
        hash: PAYU_HASH.into(),
        udf1: "student-0001".into(),
        udf2: "plan-gold".into(),
        udf3: "student_teacher_plan".into(),
        udf4: "teacher-0001".into(),
        udf5: "".into(),
    }
}

/// Flip one hex digit at the given position.
fn corrupt_hex(hex: &str, pos: usize) -> String {
    let mut chars: Vec<char> = hex.chars().collect();
    chars[pos] = if chars[pos] == '0' { '1' } else { '0' };
    chars.into_iter().collect()
}

#[test]
fn razorpay_known_good_signature_verifies() {
    assert_eq!(
        razorpay::sign_payload(RZP_SECRET, RZP_ORDER, RZP_PAYMENT),
        RZP_SIGNATURE
    );
    assert!(razorpay::verify_payment_signature(
        RZP_SECRET,
        RZP_ORDER,
        RZP_PAYMENT,
        RZP_SIGNATURE
    ));
}

#[test]
fn razorpay_wrong_secret_rejected() {
    assert!(!razorpay::verify_payment_signature(
        "wrong_secret",
        RZP_ORDER,
        RZP_PAYMENT,
        RZP_SIGNATURE
    ));
    // Digest under the wrong secret, precomputed
    assert_eq!(
        razorpay::sign_payload("wrong_secret", RZP_ORDER, RZP_PAYMENT),
        "35b4b008a44ff820f6442ba2e4aadea435c2c2a88b67cd44f149a86c9f3364ff"
    );
}

#[test]
fn razorpay_any_single_digit_corruption_rejected() {
    for pos in 0..RZP_SIGNATURE.len() {
        let bad = corrupt_hex(RZP_SIGNATURE, pos);
        assert!(
            !razorpay::verify_payment_signature(RZP_SECRET, RZP_ORDER, RZP_PAYMENT, &bad),
            "corruption at position {} was accepted",
            pos
        );
    }
}

#[test]
fn razorpay_swapped_ids_rejected() {
    assert!(!razorpay::verify_payment_signature(
        RZP_SECRET,
        RZP_PAYMENT,
        RZP_ORDER,
        RZP_SIGNATURE
    ));
}

#[test]
fn razorpay_truncated_or_padded_signature_rejected() {
    assert!(!razorpay::verify_payment_signature(
        RZP_SECRET,
        RZP_ORDER,
        RZP_PAYMENT,
        &RZP_SIGNATURE[..RZP_SIGNATURE.len() - 1]
    ));
    let padded = format!("{}0", RZP_SIGNATURE);
    assert!(!razorpay::verify_payment_signature(
        RZP_SECRET, RZP_ORDER, RZP_PAYMENT, &padded
    ));
    assert!(!razorpay::verify_payment_signature(
        RZP_SECRET, RZP_ORDER, RZP_PAYMENT, ""
    ));
}

#[test]
fn payu_known_good_hash_verifies() {
    let cb = payu_callback();
    assert_eq!(payu::response_hash(PAYU_KEY, PAYU_SALT, &cb), PAYU_HASH);
    assert!(payu::verify_callback_hash(PAYU_KEY, PAYU_SALT, &cb));
}

#[test]
fn payu_uppercase_hash_accepted() {
    let mut cb = payu_callback();
    cb.hash = PAYU_HASH.to_uppercase();
    assert!(payu::verify_callback_hash(PAYU_KEY, PAYU_SALT, &cb));
}

#[test]
fn payu_any_single_digit_corruption_rejected() {
    for pos in 0..PAYU_HASH.len() {
        let mut cb = payu_callback();
        cb.hash = corrupt_hex(PAYU_HASH, pos);
        assert!(
            !payu::verify_callback_hash(PAYU_KEY, PAYU_SALT, &cb),
            "corruption at position {} was accepted",
            pos
        );
    }
}

#[test]
fn payu_tampered_fields_rejected() {
    let mut cb = payu_callback();
    cb.amount = "1.00".into();
    assert!(!payu::verify_callback_hash(PAYU_KEY, PAYU_SALT, &cb));

    let mut cb = payu_callback();
    cb.status = "failure".into();
    assert!(!payu::verify_callback_hash(PAYU_KEY, PAYU_SALT, &cb));

    let mut cb = payu_callback();
    cb.udf1 = "someone-else".into();
    assert!(!payu::verify_callback_hash(PAYU_KEY, PAYU_SALT, &cb));

    // Wrong salt
    let cb = payu_callback();
    assert!(!payu::verify_callback_hash(PAYU_KEY, "othersalt", &cb));
}

#[test]
fn payu_forward_hash_matches_known_vector() {
    let hash = payu::payment_request_hash(
        PAYU_KEY,
        PAYU_SALT,
        "pp_stp_plango_nt-0001_x9k2qa",
        "800.00",
        "Gold Plan",
        "Asha",
        "asha@example.com",
        &[
            "student-0001",
            "plan-gold",
            "student_teacher_plan",
            "teacher-0001",
            "",
        ],
    );
    assert_eq!(
        hash,
        "9197e3fbed3c46a66842ab00d938024b1b92c15f24d7005665402fdc29d6e27c4586077247061d4705ee117429da2c6f7fc3922f5b7fc7b6ee85394d37e90f1c"
    );
}
