use crate::error::{AppError, Result};
use std::{env, str::FromStr};

pub const DEFAULT_SESSION_COOKIE: &str = "auth-demo";
pub const DEFAULT_LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub session: SessionConfig,
    pub sales: SalesConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub login_path: String,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            secure: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SalesConfig {
    pub commit_mode: SaleCommitMode,
}

/// How a recorded sale and its stock adjustment reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaleCommitMode {
    /// Sale insert and stock compare-and-set in one store transaction.
    #[default]
    Atomic,
    /// Two independent writes; a failed stock update leaves the sale recorded.
    Sequential,
}

impl FromStr for SaleCommitMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(SaleCommitMode::Atomic),
            "sequential" => Ok(SaleCommitMode::Sequential),
            other => Err(AppError::ConfigError(format!(
                "Invalid SALE_COMMIT_MODE value: {}",
                other
            ))),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            session: SessionConfig {
                cookie_name: env::var("SESSION_COOKIE")
                    .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_string()),
                login_path: parse_login_path(
                    &env::var("LOGIN_PATH").unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string()),
                )?,
                secure: env::var("COOKIE_SECURE")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid COOKIE_SECURE value".to_string()))?,
            },
            sales: SalesConfig {
                commit_mode: env::var("SALE_COMMIT_MODE")
                    .unwrap_or_else(|_| "atomic".to_string())
                    .parse()?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_login_path(raw: &str) -> Result<String> {
    let path = raw.trim().trim_end_matches('/');
    if !path.starts_with('/') || path.len() < 2 {
        return Err(AppError::ConfigError(format!(
            "Invalid LOGIN_PATH value: {}",
            raw
        )));
    }
    Ok(path.to_string())
}
