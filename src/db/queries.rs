use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

use super::from_row::{
    query_all, query_one, ACTIVATION_TOKEN_COLS, REFERRAL_CODE_COLS, STUDENT_COLS,
    SUBSCRIPTION_COLS, TEACHER_COLS, TEACHER_PLAN_COLS, WALLET_LEDGER_COLS,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

// ============ Students ============

pub fn create_student(conn: &Connection, input: &CreateStudent) -> Result<Student> {
    let id = gen_id();
    let now = now();
    let email = input.email.trim().to_lowercase();

    conn.execute(
        "INSERT INTO students (id, name, email, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, &input.name, &email, now, now],
    )?;

    Ok(Student {
        id,
        name: input.name.clone(),
        email,
        platform_plan: None,
        platform_plan_expires_at: None,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_student_by_id(conn: &Connection, id: &str) -> Result<Option<Student>> {
    query_one(
        conn,
        &format!("SELECT {} FROM students WHERE id = ?1", STUDENT_COLS),
        &[&id],
    )
}

/// Set a student's platform plan and expiry. Returns false if the student
/// does not exist.
pub fn set_student_platform_plan(
    conn: &Connection,
    student_id: &str,
    plan_id: &str,
    expires_at: i64,
) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE students SET platform_plan = ?1, platform_plan_expires_at = ?2, updated_at = ?3
         WHERE id = ?4",
        params![plan_id, expires_at, now(), student_id],
    )?;
    Ok(affected > 0)
}

/// Add a teacher to the student's subscribed-teachers list. Additive:
/// existing links are untouched, re-adding is a no-op.
pub fn link_student_to_teacher(conn: &Connection, student_id: &str, teacher_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO student_teacher_links (student_id, teacher_id, created_at)
         VALUES (?1, ?2, ?3)",
        params![student_id, teacher_id, now()],
    )?;
    Ok(())
}

pub fn list_subscribed_teacher_ids(conn: &Connection, student_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT teacher_id FROM student_teacher_links WHERE student_id = ?1 ORDER BY created_at",
    )?;
    let rows = stmt
        .query_map(params![student_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ Teachers ============

pub fn create_teacher(conn: &Connection, input: &CreateTeacher) -> Result<Teacher> {
    let id = gen_id();
    let now = now();
    let email = input.email.trim().to_lowercase();

    conn.execute(
        "INSERT INTO teachers (id, name, email, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, &input.name, &email, now, now],
    )?;

    Ok(Teacher {
        id,
        name: input.name.clone(),
        email,
        platform_plan: None,
        max_content_plans: 0,
        wallet_balance_cents: 0,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_teacher_by_id(conn: &Connection, id: &str) -> Result<Option<Teacher>> {
    query_one(
        conn,
        &format!("SELECT {} FROM teachers WHERE id = ?1", TEACHER_COLS),
        &[&id],
    )
}

/// Set a teacher's platform plan and content-plan quota.
pub fn set_teacher_platform_plan(
    conn: &Connection,
    teacher_id: &str,
    plan_id: &str,
    max_content_plans: i64,
) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE teachers SET platform_plan = ?1, max_content_plans = ?2, updated_at = ?3
         WHERE id = ?4",
        params![plan_id, max_content_plans, now(), teacher_id],
    )?;
    Ok(affected > 0)
}

/// Atomic balance increment. Never read-modify-write: concurrent credits to
/// the same teacher must not lose updates.
pub fn increment_wallet_balance(conn: &Connection, teacher_id: &str, delta_cents: i64) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE teachers
         SET wallet_balance_cents = wallet_balance_cents + ?1, updated_at = ?2
         WHERE id = ?3",
        params![delta_cents, now(), teacher_id],
    )?;
    Ok(affected > 0)
}

/// Derived balance: sum over ledger entries. Used for reconciliation against
/// the cached counter.
pub fn ledger_total_for_teacher(conn: &Connection, teacher_id: &str) -> Result<i64> {
    let total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM wallet_ledger WHERE teacher_id = ?1",
        params![teacher_id],
        |row| row.get(0),
    )?;
    Ok(total)
}

// ============ Teacher plans ============

pub fn create_teacher_plan(conn: &Connection, input: &CreateTeacherPlan) -> Result<TeacherPlan> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO teacher_plans (id, teacher_id, name, price_cents, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, &input.teacher_id, &input.name, input.price_cents, now],
    )?;

    Ok(TeacherPlan {
        id,
        teacher_id: input.teacher_id.clone(),
        name: input.name.clone(),
        price_cents: input.price_cents,
        created_at: now,
    })
}

pub fn get_teacher_plan_by_id(conn: &Connection, id: &str) -> Result<Option<TeacherPlan>> {
    query_one(
        conn,
        &format!("SELECT {} FROM teacher_plans WHERE id = ?1", TEACHER_PLAN_COLS),
        &[&id],
    )
}

/// Add a student to the plan's enrolled list. Additive, re-enrollment is a
/// no-op.
pub fn enroll_student_in_plan(conn: &Connection, plan_id: &str, student_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO plan_enrollments (plan_id, student_id, enrolled_at)
         VALUES (?1, ?2, ?3)",
        params![plan_id, student_id, now()],
    )?;
    Ok(())
}

pub fn list_enrolled_student_ids(conn: &Connection, plan_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT student_id FROM plan_enrollments WHERE plan_id = ?1 ORDER BY enrolled_at",
    )?;
    let rows = stmt
        .query_map(params![plan_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ Referral codes ============

pub fn create_referral_code(conn: &Connection, input: &CreateReferralCode) -> Result<ReferralCode> {
    let id = gen_id();
    let now = now();
    let code = input.code.trim().to_string();
    let plan_ids_json = serde_json::to_string(&input.plan_ids)?;

    conn.execute(
        "INSERT INTO referral_codes (id, teacher_id, code, percentage, plan_ids, expires_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![&id, &input.teacher_id, &code, input.percentage, &plan_ids_json, input.expires_at, now],
    )?;

    Ok(ReferralCode {
        id,
        teacher_id: input.teacher_id.clone(),
        code,
        percentage: input.percentage,
        plan_ids: input.plan_ids.clone(),
        expires_at: input.expires_at,
        created_at: now,
    })
}

/// Look up a referral code scoped to a teacher, case-insensitively.
/// Expiry and plan applicability are checked by the caller.
pub fn find_referral_code(
    conn: &Connection,
    teacher_id: &str,
    code: &str,
) -> Result<Option<ReferralCode>> {
    let code = code.trim();
    query_one(
        conn,
        &format!(
            "SELECT {} FROM referral_codes WHERE teacher_id = ?1 AND LOWER(code) = LOWER(?2)",
            REFERRAL_CODE_COLS
        ),
        &[&teacher_id, &code],
    )
}

// ============ Activation tokens ============

pub fn create_activation_token(
    conn: &Connection,
    token: &str,
    input: &CreateActivationToken,
) -> Result<ActivationToken> {
    let now = now();
    let ctx = &input.context;

    conn.execute(
        "INSERT INTO activation_tokens (token, user_id, plan_id, flow, teacher_id, original_amount_cents, referral_code, gateway_order_ref, gateway_payment_ref, expires_at, used, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11)",
        params![
            token,
            ctx.user_id(),
            ctx.plan_id(),
            ctx.flow().as_str(),
            ctx.teacher_id(),
            input.original_amount_cents,
            ctx.referral_code(),
            &input.gateway_order_ref,
            input.gateway_payment_ref,
            input.expires_at,
            now,
        ],
    )?;

    Ok(ActivationToken {
        token: token.to_string(),
        user_id: ctx.user_id().to_string(),
        plan_id: ctx.plan_id().to_string(),
        flow: ctx.flow().as_str().to_string(),
        teacher_id: ctx.teacher_id().map(String::from),
        original_amount_cents: input.original_amount_cents,
        referral_code: ctx.referral_code().map(String::from),
        gateway_order_ref: input.gateway_order_ref.clone(),
        gateway_payment_ref: input.gateway_payment_ref.clone(),
        expires_at: input.expires_at,
        used: false,
        created_at: now,
    })
}

pub fn get_activation_token(conn: &Connection, token: &str) -> Result<Option<ActivationToken>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM activation_tokens WHERE token = ?1",
            ACTIVATION_TOKEN_COLS
        ),
        &[&token],
    )
}

/// Conditionally claim a token: flips `used` only if it is still unset.
/// Returns false when another redemption got there first. Run inside the
/// same transaction as the downstream mutations so a failed activation
/// rolls the claim back.
pub fn try_claim_activation_token(conn: &Connection, token: &str) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE activation_tokens SET used = 1 WHERE token = ?1 AND used = 0",
        params![token],
    )?;
    Ok(affected > 0)
}

// ============ Subscriptions ============

/// Insert a subscription record unless one already exists for the gateway
/// payment ref. Returns the record plus whether this call created it; the
/// caller uses that flag to skip the wallet credit on replays.
pub fn insert_subscription_if_absent(
    conn: &Connection,
    input: &CreateSubscription,
) -> Result<(SubscriptionRecord, bool)> {
    if let Some(existing) = get_subscription_by_payment_ref(conn, &input.gateway_payment_ref)? {
        return Ok((existing, false));
    }

    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO subscriptions (id, student_id, teacher_id, plan_id, status, started_at, expires_at, amount_cents, net_amount_cents, referral_code, gateway_payment_ref, gateway_order_ref, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            &id,
            &input.student_id,
            &input.teacher_id,
            &input.plan_id,
            PaymentStatus::Successful.as_str(),
            input.started_at,
            input.expires_at,
            input.amount_cents,
            input.net_amount_cents,
            input.referral_code,
            &input.gateway_payment_ref,
            &input.gateway_order_ref,
            now,
        ],
    )?;

    Ok((
        SubscriptionRecord {
            id,
            student_id: input.student_id.clone(),
            teacher_id: input.teacher_id.clone(),
            plan_id: input.plan_id.clone(),
            status: PaymentStatus::Successful,
            started_at: input.started_at,
            expires_at: input.expires_at,
            amount_cents: input.amount_cents,
            net_amount_cents: input.net_amount_cents,
            referral_code: input.referral_code.clone(),
            gateway_payment_ref: input.gateway_payment_ref.clone(),
            gateway_order_ref: input.gateway_order_ref.clone(),
            created_at: now,
        },
        true,
    ))
}

pub fn get_subscription_by_payment_ref(
    conn: &Connection,
    payment_ref: &str,
) -> Result<Option<SubscriptionRecord>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM subscriptions WHERE gateway_payment_ref = ?1",
            SUBSCRIPTION_COLS
        ),
        &[&payment_ref],
    )
}

// ============ Wallet ledger ============

pub fn create_wallet_entry(
    conn: &Connection,
    teacher_id: &str,
    amount_cents: i64,
    subscription_id: &str,
    description: &str,
) -> Result<WalletLedgerEntry> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO wallet_ledger (id, teacher_id, amount_cents, subscription_id, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![&id, teacher_id, amount_cents, subscription_id, description, now],
    )?;

    Ok(WalletLedgerEntry {
        id,
        teacher_id: teacher_id.to_string(),
        amount_cents,
        subscription_id: subscription_id.to_string(),
        description: description.to_string(),
        created_at: now,
    })
}

pub fn list_wallet_entries_for_teacher(
    conn: &Connection,
    teacher_id: &str,
) -> Result<Vec<WalletLedgerEntry>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM wallet_ledger WHERE teacher_id = ?1 ORDER BY created_at DESC",
            WALLET_LEDGER_COLS
        ),
        &[&teacher_id],
    )
}
