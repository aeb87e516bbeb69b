//! Order context validation, receipt construction, unit conversion

use planpay::models::{OrderContext, OrderFlow};
use planpay::util::{build_receipt, to_minor_units, RECEIPT_MAX_LEN};

#[test]
fn minor_unit_conversion_rounds_to_nearest() {
    assert_eq!(to_minor_units(499.0), 49900);
    assert_eq!(to_minor_units(800.0), 80000);
    assert_eq!(to_minor_units(0.01), 1);
    assert_eq!(to_minor_units(10.555), 1056);
    assert_eq!(to_minor_units(1299.99), 129999);
}

#[test]
fn receipt_carries_flow_and_respects_length_limit() {
    let receipt = build_receipt("spp", "Dpp", "student-0001");
    assert!(receipt.starts_with("pp_spp_dpp_"));
    assert!(receipt.len() <= RECEIPT_MAX_LEN);

    let long = build_receipt(
        "stp",
        "an-extremely-long-plan-identifier",
        "user-with-an-extremely-long-identifier",
    );
    assert!(long.len() <= RECEIPT_MAX_LEN);
    assert!(long.starts_with("pp_stp_anextr_"));
}

#[test]
fn receipts_are_unique_per_attempt() {
    let a = build_receipt("spp", "Dpp", "student-0001");
    let b = build_receipt("spp", "Dpp", "student-0001");
    assert_ne!(a, b);
}

#[test]
fn context_rejects_unknown_flow() {
    let err = OrderContext::from_parts("admin", "u1", "p1", None, None).unwrap_err();
    assert!(err.to_string().contains("user_type"));
}

#[test]
fn context_requires_user_and_plan() {
    assert!(OrderContext::from_parts("student_platform_plan", "", "p1", None, None).is_err());
    assert!(OrderContext::from_parts("student_platform_plan", "u1", "", None, None).is_err());
}

#[test]
fn teacher_plan_flow_requires_teacher_id() {
    assert!(OrderContext::from_parts("student_teacher_plan", "u1", "p1", None, None).is_err());
    assert!(OrderContext::from_parts("student_teacher_plan", "u1", "p1", Some(""), None).is_err());

    let ctx =
        OrderContext::from_parts("student_teacher_plan", "u1", "p1", Some("t1"), None).unwrap();
    assert_eq!(ctx.flow(), OrderFlow::StudentTeacherPlan);
    assert_eq!(ctx.teacher_id(), Some("t1"));
}

#[test]
fn notes_round_trip_preserves_identity() {
    let ctx = OrderContext::from_parts(
        "student_teacher_plan",
        "student-0001",
        "plan-gold",
        Some("teacher-0001"),
        Some("SAVE20"),
    )
    .unwrap();

    let notes = ctx.to_notes();
    assert_eq!(notes.get("user_type").unwrap(), "student_teacher_plan");
    assert_eq!(notes.get("teacher_id_for_plan").unwrap(), "teacher-0001");
    assert_eq!(notes.get("referral_code_used").unwrap(), "SAVE20");

    let decoded = OrderContext::from_notes(&notes).unwrap();
    assert_eq!(decoded, ctx);
}

#[test]
fn platform_flows_omit_teacher_fields_from_notes() {
    let ctx = OrderContext::from_parts("student_platform_plan", "u1", "Dpp", None, None).unwrap();
    let notes = ctx.to_notes();
    assert!(!notes.contains_key("teacher_id_for_plan"));
    assert!(!notes.contains_key("referral_code_used"));
    assert_eq!(OrderContext::from_notes(&notes).unwrap(), ctx);
}

#[test]
fn context_match_ignores_referral_but_not_identity() {
    let bought = OrderContext::from_parts(
        "student_teacher_plan",
        "u1",
        "p1",
        Some("t1"),
        Some("SAVE20"),
    )
    .unwrap();
    let claimed_no_code =
        OrderContext::from_parts("student_teacher_plan", "u1", "p1", Some("t1"), None).unwrap();
    assert!(bought.matches(&claimed_no_code));

    let other_user =
        OrderContext::from_parts("student_teacher_plan", "u2", "p1", Some("t1"), None).unwrap();
    assert!(!bought.matches(&other_user));

    let other_teacher =
        OrderContext::from_parts("student_teacher_plan", "u1", "p1", Some("t2"), None).unwrap();
    assert!(!bought.matches(&other_teacher));

    let other_flow =
        OrderContext::from_parts("student_platform_plan", "u1", "p1", None, None).unwrap();
    assert!(!bought.matches(&other_flow));
}
