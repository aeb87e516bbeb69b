//! Test utilities and fixtures for Planpay integration tests

#![allow(dead_code)]

use rusqlite::Connection;

pub use planpay::db::{init_db, queries};
pub use planpay::models::*;

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// Create a test student with default values
pub fn create_test_student(conn: &Connection, name: &str, email: &str) -> Student {
    queries::create_student(
        conn,
        &CreateStudent {
            name: name.to_string(),
            email: email.to_string(),
        },
    )
    .expect("Failed to create test student")
}

/// Create a test teacher with default values
pub fn create_test_teacher(conn: &Connection, name: &str, email: &str) -> Teacher {
    queries::create_teacher(
        conn,
        &CreateTeacher {
            name: name.to_string(),
            email: email.to_string(),
        },
    )
    .expect("Failed to create test teacher")
}

/// Create a test teacher content plan
pub fn create_test_teacher_plan(
    conn: &Connection,
    teacher_id: &str,
    name: &str,
    price_cents: i64,
) -> TeacherPlan {
    queries::create_teacher_plan(
        conn,
        &CreateTeacherPlan {
            teacher_id: teacher_id.to_string(),
            name: name.to_string(),
            price_cents,
        },
    )
    .expect("Failed to create test teacher plan")
}

/// Create a referral code scoped to the given plans
pub fn create_test_referral_code(
    conn: &Connection,
    teacher_id: &str,
    code: &str,
    percentage: i64,
    plan_ids: Vec<String>,
) -> ReferralCode {
    queries::create_referral_code(
        conn,
        &CreateReferralCode {
            teacher_id: teacher_id.to_string(),
            code: code.to_string(),
            percentage,
            plan_ids,
            expires_at: None,
        },
    )
    .expect("Failed to create test referral code")
}

/// Persist an activation token for the given context
pub fn create_test_token(
    conn: &Connection,
    context: OrderContext,
    amount_cents: i64,
    expires_at: i64,
) -> ActivationToken {
    let token = planpay::util::generate_activation_token();
    queries::create_activation_token(
        conn,
        &token,
        &CreateActivationToken {
            context,
            original_amount_cents: amount_cents,
            gateway_order_ref: format!("txn_{}", &token[..8]),
            gateway_payment_ref: Some(format!("pay_{}", &token[..8])),
            expires_at,
        },
    )
    .expect("Failed to create test activation token")
}
