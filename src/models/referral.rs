use serde::Serialize;

/// A teacher-owned referral/discount code. Read-only from this subsystem's
/// perspective; code management is owned by out-of-scope features.
#[derive(Debug, Clone, Serialize)]
pub struct ReferralCode {
    pub id: String,
    pub teacher_id: String,
    pub code: String,
    /// Discount percentage, 0-100.
    pub percentage: i64,
    /// Teacher-plan ids this code applies to.
    pub plan_ids: Vec<String>,
    /// None = never expires.
    pub expires_at: Option<i64>,
    pub created_at: i64,
}

impl ReferralCode {
    pub fn applies_to(&self, plan_id: &str) -> bool {
        self.plan_ids.iter().any(|p| p == plan_id)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp < now)
    }
}

#[derive(Debug, Clone)]
pub struct CreateReferralCode {
    pub teacher_id: String,
    pub code: String,
    pub percentage: i64,
    pub plan_ids: Vec<String>,
    pub expires_at: Option<i64>,
}
