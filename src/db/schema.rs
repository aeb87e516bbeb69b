use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Students (only subscription-facing fields; profiles are owned elsewhere)
        CREATE TABLE IF NOT EXISTS students (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            platform_plan TEXT,
            platform_plan_expires_at INTEGER,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_students_email ON students(email);

        -- Teachers (platform subscription, quota, cached wallet balance)
        CREATE TABLE IF NOT EXISTS teachers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            platform_plan TEXT,
            max_content_plans INTEGER NOT NULL DEFAULT 0,
            wallet_balance_cents INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_teachers_email ON teachers(email);

        -- Teacher content plans (what students subscribe to)
        CREATE TABLE IF NOT EXISTS teacher_plans (
            id TEXT PRIMARY KEY,
            teacher_id TEXT NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            price_cents INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_teacher_plans_teacher ON teacher_plans(teacher_id);

        -- Enrolled-students list of a teacher plan. Additive list-union:
        -- INSERT OR IGNORE against the unique pair.
        CREATE TABLE IF NOT EXISTS plan_enrollments (
            plan_id TEXT NOT NULL REFERENCES teacher_plans(id) ON DELETE CASCADE,
            student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            enrolled_at INTEGER NOT NULL,
            UNIQUE(plan_id, student_id)
        );
        CREATE INDEX IF NOT EXISTS idx_plan_enrollments_student ON plan_enrollments(student_id);

        -- Subscribed-teachers list of a student. Same additive semantics.
        CREATE TABLE IF NOT EXISTS student_teacher_links (
            student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            teacher_id TEXT NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            created_at INTEGER NOT NULL,
            UNIQUE(student_id, teacher_id)
        );
        CREATE INDEX IF NOT EXISTS idx_student_teacher_links_teacher ON student_teacher_links(teacher_id);

        -- Referral codes (teacher-owned, read-only here)
        CREATE TABLE IF NOT EXISTS referral_codes (
            id TEXT PRIMARY KEY,
            teacher_id TEXT NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            code TEXT NOT NULL,
            percentage INTEGER NOT NULL CHECK (percentage BETWEEN 0 AND 100),
            plan_ids TEXT NOT NULL DEFAULT '[]',
            expires_at INTEGER,
            created_at INTEGER NOT NULL,
            UNIQUE(teacher_id, code)
        );

        -- Activation tokens. Never deleted: used + timestamps are the audit
        -- trail of deferred-payment redemption.
        CREATE TABLE IF NOT EXISTS activation_tokens (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            plan_id TEXT NOT NULL,
            flow TEXT NOT NULL CHECK (flow IN ('student_platform_plan', 'teacher_platform_plan', 'student_teacher_plan')),
            teacher_id TEXT,
            original_amount_cents INTEGER NOT NULL,
            referral_code TEXT,
            gateway_order_ref TEXT NOT NULL,
            gateway_payment_ref TEXT,
            expires_at INTEGER NOT NULL,
            used INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_activation_tokens_user ON activation_tokens(user_id);

        -- Student subscriptions to teacher plans. The UNIQUE payment ref is
        -- the idempotency key for Flow C.
        CREATE TABLE IF NOT EXISTS subscriptions (
            id TEXT PRIMARY KEY,
            student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            teacher_id TEXT NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            plan_id TEXT NOT NULL REFERENCES teacher_plans(id) ON DELETE CASCADE,
            status TEXT NOT NULL CHECK (status IN ('successful', 'refunded')),
            started_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL,
            amount_cents INTEGER NOT NULL,
            net_amount_cents INTEGER NOT NULL,
            referral_code TEXT,
            gateway_payment_ref TEXT NOT NULL UNIQUE,
            gateway_order_ref TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_subscriptions_student ON subscriptions(student_id);
        CREATE INDEX IF NOT EXISTS idx_subscriptions_teacher ON subscriptions(teacher_id);
        CREATE INDEX IF NOT EXISTS idx_subscriptions_plan ON subscriptions(plan_id);

        -- Wallet ledger (append-only)
        CREATE TABLE IF NOT EXISTS wallet_ledger (
            id TEXT PRIMARY KEY,
            teacher_id TEXT NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            amount_cents INTEGER NOT NULL,
            subscription_id TEXT NOT NULL REFERENCES subscriptions(id) ON DELETE CASCADE,
            description TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_wallet_ledger_teacher ON wallet_ledger(teacher_id, created_at DESC);
        "#,
    )?;
    Ok(())
}
