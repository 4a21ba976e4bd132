use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::store::RedirectPolicy;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub redirects: RedirectPolicy,
    pub session_file: Option<PathBuf>,
    pub mock_bind_addr: String,
    pub mock_admin_email: String,
    pub mock_admin_password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string());
        let api_timeout = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let defaults = RedirectPolicy::default();
        let redirects = RedirectPolicy {
            on_unauthorized: env::var("UNAUTHORIZED_REDIRECT").unwrap_or(defaults.on_unauthorized),
            on_forbidden: env::var("FORBIDDEN_REDIRECT").unwrap_or(defaults.on_forbidden),
        };

        let session_file = env::var("SESSION_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let mock_bind_addr =
            env::var("MOCK_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
        let mock_admin_email =
            env::var("MOCK_ADMIN_EMAIL").unwrap_or_else(|_| "admin@clinic.local".to_string());
        let mock_admin_password =
            env::var("MOCK_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        Ok(Self {
            api_base_url,
            api_timeout,
            redirects,
            session_file,
            mock_bind_addr,
            mock_admin_email,
            mock_admin_password,
        })
    }
}
