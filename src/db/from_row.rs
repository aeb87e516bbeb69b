//! Row mapping trait and helpers for reducing boilerplate in queries.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Parse a string column into an enum type, converting parse errors to
/// rusqlite errors instead of panicking on corrupt data.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT Constants ============

pub const STUDENT_COLS: &str =
    "id, name, email, platform_plan, platform_plan_expires_at, created_at, updated_at";

pub const TEACHER_COLS: &str =
    "id, name, email, platform_plan, max_content_plans, wallet_balance_cents, created_at, updated_at";

pub const TEACHER_PLAN_COLS: &str = "id, teacher_id, name, price_cents, created_at";

pub const REFERRAL_CODE_COLS: &str =
    "id, teacher_id, code, percentage, plan_ids, expires_at, created_at";

pub const ACTIVATION_TOKEN_COLS: &str = "token, user_id, plan_id, flow, teacher_id, original_amount_cents, referral_code, gateway_order_ref, gateway_payment_ref, expires_at, used, created_at";

pub const SUBSCRIPTION_COLS: &str = "id, student_id, teacher_id, plan_id, status, started_at, expires_at, amount_cents, net_amount_cents, referral_code, gateway_payment_ref, gateway_order_ref, created_at";

pub const WALLET_LEDGER_COLS: &str =
    "id, teacher_id, amount_cents, subscription_id, description, created_at";

// ============ FromRow Implementations ============

impl FromRow for Student {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Student {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            platform_plan: row.get(3)?,
            platform_plan_expires_at: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl FromRow for Teacher {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Teacher {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            platform_plan: row.get(3)?,
            max_content_plans: row.get(4)?,
            wallet_balance_cents: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl FromRow for TeacherPlan {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(TeacherPlan {
            id: row.get(0)?,
            teacher_id: row.get(1)?,
            name: row.get(2)?,
            price_cents: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl FromRow for ReferralCode {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let plan_ids_str: String = row.get(4)?;
        Ok(ReferralCode {
            id: row.get(0)?,
            teacher_id: row.get(1)?,
            code: row.get(2)?,
            percentage: row.get(3)?,
            plan_ids: serde_json::from_str(&plan_ids_str).unwrap_or_default(),
            expires_at: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl FromRow for ActivationToken {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ActivationToken {
            token: row.get(0)?,
            user_id: row.get(1)?,
            plan_id: row.get(2)?,
            flow: row.get(3)?,
            teacher_id: row.get(4)?,
            original_amount_cents: row.get(5)?,
            referral_code: row.get(6)?,
            gateway_order_ref: row.get(7)?,
            gateway_payment_ref: row.get(8)?,
            expires_at: row.get(9)?,
            used: row.get::<_, i32>(10)? != 0,
            created_at: row.get(11)?,
        })
    }
}

impl FromRow for SubscriptionRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(SubscriptionRecord {
            id: row.get(0)?,
            student_id: row.get(1)?,
            teacher_id: row.get(2)?,
            plan_id: row.get(3)?,
            status: parse_enum(row, 4, "status")?,
            started_at: row.get(5)?,
            expires_at: row.get(6)?,
            amount_cents: row.get(7)?,
            net_amount_cents: row.get(8)?,
            referral_code: row.get(9)?,
            gateway_payment_ref: row.get(10)?,
            gateway_order_ref: row.get(11)?,
            created_at: row.get(12)?,
        })
    }
}

impl FromRow for WalletLedgerEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(WalletLedgerEntry {
            id: row.get(0)?,
            teacher_id: row.get(1)?,
            amount_cents: row.get(2)?,
            subscription_id: row.get(3)?,
            description: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}
