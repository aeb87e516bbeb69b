use std::env;

/// Razorpay API credentials (synchronous gateway).
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
}

/// PayU merchant credentials (asynchronous/redirect gateway).
#[derive(Debug, Clone)]
pub struct PayuConfig {
    pub merchant_key: String,
    pub salt: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub base_url: String,
    /// Browser landing page for payment outcomes ({status, message, reference}).
    pub status_page_url: String,
    /// Base of the token-activation page; the PayU callback redirects to
    /// `{activate_page_url}/{token}/{plan_slug}`.
    pub activate_page_url: String,
    pub razorpay: Option<RazorpayConfig>,
    pub payu: Option<PayuConfig>,
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("PLANPAY_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let razorpay = match (env::var("RAZORPAY_KEY_ID"), env::var("RAZORPAY_KEY_SECRET")) {
            (Ok(key_id), Ok(key_secret)) => Some(RazorpayConfig { key_id, key_secret }),
            _ => None,
        };

        let payu = match (env::var("PAYU_MERCHANT_KEY"), env::var("PAYU_SALT")) {
            (Ok(merchant_key), Ok(salt)) => Some(PayuConfig { merchant_key, salt }),
            _ => None,
        };

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "planpay.db".to_string()),
            status_page_url: env::var("STATUS_PAGE_URL")
                .unwrap_or_else(|_| format!("{}/payment-status", base_url)),
            activate_page_url: env::var("ACTIVATE_PAGE_URL")
                .unwrap_or_else(|_| format!("{}/activate-plan", base_url)),
            base_url,
            razorpay,
            payu,
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
