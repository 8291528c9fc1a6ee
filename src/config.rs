use std::env;
use std::net::SocketAddr;

use crate::auth::GOOGLE_TOKENINFO_URL;
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub tokeninfo_url: String,
    /// When set, tokens issued for another OAuth client are rejected.
    pub google_client_id: Option<String>,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://dashboard.db?mode=rwc".to_string());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::Config(format!("DB_MAX_CONNECTIONS is invalid: {}", v)))?,
            None => 5,
        };

        let tokeninfo_url =
            lookup("GOOGLE_TOKENINFO_URL").unwrap_or_else(|| GOOGLE_TOKENINFO_URL.to_string());

        let google_client_id = lookup("GOOGLE_CLIENT_ID").filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            tokeninfo_url,
            google_client_id,
        })
    }
}
