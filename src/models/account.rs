use serde::Serialize;

/// A student account. Only the subscription-facing fields live here; profile
/// data is owned by out-of-scope features.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Platform plan id from the static catalog, None = free tier.
    pub platform_plan: Option<String>,
    pub platform_plan_expires_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A teacher account with its platform subscription and wallet.
#[derive(Debug, Clone, Serialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    pub platform_plan: Option<String>,
    /// Content-plan quota granted by the platform plan.
    pub max_content_plans: i64,
    /// Cached balance in minor units. Updated only via atomic increments
    /// in the same transaction as the matching ledger entry.
    pub wallet_balance_cents: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A teacher's content plan that students subscribe to.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherPlan {
    pub id: String,
    pub teacher_id: String,
    pub name: String,
    pub price_cents: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct CreateTeacher {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct CreateTeacherPlan {
    pub teacher_id: String,
    pub name: String,
    pub price_cents: i64,
}
