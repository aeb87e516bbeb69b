//! Activation token redemption through the handler: single-use,
//! time-bound, exactly-once under concurrency

mod common;

use chrono::Utc;
use common::*;
use planpay::db::{create_pool, AppState};
use planpay::error::{msg, AppError};
use planpay::extractors::Json;
use planpay::handlers::public::{activate_plan, ActivateBody};
use planpay::handlers::public::TOKEN_TTL_SECONDS;

fn test_state(dir: &tempfile::TempDir) -> AppState {
    let path = dir.path().join("planpay-test.db");
    let db = create_pool(path.to_str().expect("utf-8 temp path")).expect("Failed to create pool");
    {
        let conn = db.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize schema");
    }
    AppState {
        db,
        base_url: "http://127.0.0.1:3000".into(),
        status_page_url: "http://127.0.0.1:3000/payment-status".into(),
        activate_page_url: "http://127.0.0.1:3000/activate-plan".into(),
        razorpay: None,
        payu: None,
    }
}

async fn redeem(state: &AppState, token: &str) -> Result<i64, AppError> {
    let response = activate_plan(
        axum::extract::State(state.clone()),
        Json(ActivateBody {
            token: token.to_string(),
        }),
    )
    .await?;
    assert!(response.success);
    Ok(response.expires_at)
}

#[tokio::test]
async fn redemption_activates_and_consumes_the_token() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let token = {
        let conn = state.db.get().unwrap();
        let student = create_test_student(&conn, "Asha", "asha@example.com");
        let context =
            OrderContext::from_parts("student_platform_plan", &student.id, "Dpp", None, None)
                .unwrap();
        create_test_token(
            &conn,
            context,
            49900,
            Utc::now().timestamp() + TOKEN_TTL_SECONDS,
        )
    };

    let expires_at = redeem(&state, &token.token).await.unwrap();
    assert!(expires_at > Utc::now().timestamp());

    let conn = state.db.get().unwrap();
    let stored = queries::get_activation_token(&conn, &token.token).unwrap().unwrap();
    assert!(stored.used);

    // Second attempt: specific "already used" conflict
    let err = redeem(&state, &token.token).await.unwrap_err();
    match err {
        AppError::Conflict(m) => assert_eq!(m, msg::TOKEN_ALREADY_USED),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);

    let err = redeem(&state, "feedfacefeedfacefeedfacefeedfacefeedfacefeedface")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn expired_token_is_rejected_without_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let (student_id, token) = {
        let conn = state.db.get().unwrap();
        let student = create_test_student(&conn, "Asha", "asha@example.com");
        let context =
            OrderContext::from_parts("student_platform_plan", &student.id, "Dpp", None, None)
                .unwrap();
        let token = create_test_token(&conn, context, 49900, Utc::now().timestamp() - 60);
        (student.id, token)
    };

    let err = redeem(&state, &token.token).await.unwrap_err();
    match err {
        AppError::Forbidden(m) => assert_eq!(m, msg::TOKEN_EXPIRED),
        other => panic!("expected forbidden, got {:?}", other),
    }

    // Tier untouched, token still unredeemed (audit trail)
    let conn = state.db.get().unwrap();
    let stored = queries::get_student_by_id(&conn, &student_id).unwrap().unwrap();
    assert_eq!(stored.platform_plan, None);
    let stored_token = queries::get_activation_token(&conn, &token.token).unwrap().unwrap();
    assert!(!stored_token.used);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redemption_exactly_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let token = {
        let conn = state.db.get().unwrap();
        let student = create_test_student(&conn, "Asha", "asha@example.com");
        let teacher = create_test_teacher(&conn, "Meera", "meera@example.com");
        let plan = create_test_teacher_plan(&conn, &teacher.id, "Gold Plan", 100_000);
        let context = OrderContext::from_parts(
            "student_teacher_plan",
            &student.id,
            &plan.id,
            Some(&teacher.id),
            None,
        )
        .unwrap();
        create_test_token(
            &conn,
            context,
            100_000,
            Utc::now().timestamp() + TOKEN_TTL_SECONDS,
        )
    };

    let a = {
        let state = state.clone();
        let token = token.token.clone();
        tokio::spawn(async move { redeem(&state, &token).await })
    };
    let b = {
        let state = state.clone();
        let token = token.token.clone();
        tokio::spawn(async move { redeem(&state, &token).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one redemption must win: {:?}", results);

    // The store saw exactly one activation: one subscription, one credit
    let conn = state.db.get().unwrap();
    let teachers: Vec<Teacher> = {
        let mut stmt = conn
            .prepare("SELECT id FROM teachers")
            .unwrap();
        let ids: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        ids.iter()
            .map(|id| queries::get_teacher_by_id(&conn, id).unwrap().unwrap())
            .collect()
    };
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0].wallet_balance_cents, 90_000);
    assert_eq!(
        queries::ledger_total_for_teacher(&conn, &teachers[0].id).unwrap(),
        90_000
    );
}
