use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planpay::config::Config;
use planpay::db::{create_pool, init_db, queries, AppState};
use planpay::handlers;
use planpay::models::{CreateReferralCode, CreateStudent, CreateTeacher, CreateTeacherPlan};
use planpay::payments::razorpay::RazorpayClient;

#[derive(Parser, Debug)]
#[command(name = "planpay")]
#[command(about = "Payment verification and plan activation service")]
struct Cli {
    /// Seed the database with dev data (student, teacher, plan, referral code)
    #[arg(long)]
    seed: bool,
}

/// Seeds the database with dev data for manual testing.
/// Only runs in dev mode and when the database is empty.
fn seed_dev_data(state: &AppState) {
    let conn = state.db.get().expect("Failed to get db connection for seeding");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
        .expect("Failed to count students");
    if count > 0 {
        tracing::info!("Database already has data, skipping seed");
        return;
    }

    tracing::info!("============================================");
    tracing::info!("SEEDING DEV DATA");
    tracing::info!("============================================");

    let student = queries::create_student(
        &conn,
        &CreateStudent {
            name: "Dev Student".to_string(),
            email: "student@planpay.local".to_string(),
        },
    )
    .expect("Failed to create dev student");

    let teacher = queries::create_teacher(
        &conn,
        &CreateTeacher {
            name: "Dev Teacher".to_string(),
            email: "teacher@planpay.local".to_string(),
        },
    )
    .expect("Failed to create dev teacher");

    let plan = queries::create_teacher_plan(
        &conn,
        &CreateTeacherPlan {
            teacher_id: teacher.id.clone(),
            name: "Dev Crash Course".to_string(),
            price_cents: 100_000,
        },
    )
    .expect("Failed to create dev teacher plan");

    let referral = queries::create_referral_code(
        &conn,
        &CreateReferralCode {
            teacher_id: teacher.id.clone(),
            code: "DEV20".to_string(),
            percentage: 20,
            plan_ids: vec![plan.id.clone()],
            expires_at: None,
        },
    )
    .expect("Failed to create dev referral code");

    tracing::info!("Student: {} (id: {})", student.name, student.id);
    tracing::info!("Teacher: {} (id: {})", teacher.name, teacher.id);
    tracing::info!("Teacher Plan: {} (id: {})", plan.name, plan.id);
    tracing::info!("Referral Code: {} ({}% off)", referral.code, referral.percentage);

    // Copy-paste friendly output for Bruno env files
    println!();
    println!("--- COPY FROM HERE ---");
    println!("  student_id: {}", student.id);
    println!("  teacher_id: {}", teacher.id);
    println!("  teacher_plan_id: {}", plan.id);
    println!("  referral_code: {}", referral.code);
    println!("--- END COPY ---");
    println!();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planpay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }
    if config.razorpay.is_none() {
        tracing::warn!("Razorpay credentials not set; /orders and /verify will fail");
    }
    if config.payu.is_none() {
        tracing::warn!("PayU credentials not set; /payu/callback will fail");
    }

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let state = AppState {
        db: db_pool,
        base_url: config.base_url.clone(),
        status_page_url: config.status_page_url.clone(),
        activate_page_url: config.activate_page_url.clone(),
        razorpay: config.razorpay.as_ref().map(RazorpayClient::new),
        payu: config.payu.clone(),
    };

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed flag ignored: not in dev mode (set PLANPAY_ENV=dev)");
        } else {
            seed_dev_data(&state);
        }
    }

    let app = handlers::public::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Planpay server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
