use std::env;

use thiserror::Error;

use crate::metadata::DEFAULT_FAVICON_PROXY;

const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least 32 bytes")]
    WeakJwtSecret,

    #[error("SERVER_PORT is not a valid port: {0}")]
    InvalidPort(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub favicon_proxy_url: String,
    pub is_dev: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret);
        }

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 8080,
        };

        Ok(Config {
            jwt_secret,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port,
            favicon_proxy_url: env::var("FAVICON_PROXY_URL")
                .unwrap_or_else(|_| DEFAULT_FAVICON_PROXY.to_string()),
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
