mod app_config;

pub use app_config::{
    AppConfig, CorsConfig, DEFAULT_LOGIN_PATH, DEFAULT_SESSION_COOKIE, DatabaseConfig,
    SaleCommitMode, SalesConfig, ServerConfig, SessionConfig,
};
