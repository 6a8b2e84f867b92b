use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_expiry: u64, // seconds, default 7 days
}

impl JwtConfig {
    pub fn from_env() -> Result<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable must be set"))?;

        if secret.len() < 32 {
            return Err(anyhow::anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let token_expiry = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(604800); // 7 days

        Ok(Self {
            secret,
            token_expiry,
        })
    }
}
