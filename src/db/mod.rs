mod from_row;
mod schema;
pub mod queries;

pub use schema::init_db;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::PayuConfig;
use crate::payments::razorpay::RazorpayClient;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state: the pooled store client plus the configuration the
/// handlers need. The pool is the one privileged store connection of the
/// service; it is established lazily and reused across requests.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub base_url: String,
    pub status_page_url: String,
    pub activate_page_url: String,
    pub razorpay: Option<RazorpayClient>,
    pub payu: Option<PayuConfig>,
}

/// Create the connection pool. WAL keeps readers off the writer's back;
/// busy_timeout makes concurrent redemption attempts queue on the write lock
/// instead of failing.
pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
    });
    Pool::builder().max_size(10).build(manager)
}
