use serde::Serialize;

/// Append-only record of one wallet credit. The teacher's cached balance is
/// incremented by exactly this amount in the same transaction; the two must
/// never drift.
#[derive(Debug, Clone, Serialize)]
pub struct WalletLedgerEntry {
    pub id: String,
    pub teacher_id: String,
    /// Net amount credited, minor units.
    pub amount_cents: i64,
    /// Source subscription this credit stems from.
    pub subscription_id: String,
    pub description: String,
    pub created_at: i64,
}
