//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
    pub mail: MailSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub cors_origin: String,
    pub json_logs: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

/// External identity provider: token validation parameters and the admin
/// endpoint used to create instructor accounts.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub admin_url: String,
    pub admin_api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailSettings {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: String,
    pub login_url: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "lms-server")?
            .set_default("app.cors_origin", "http://localhost:5173")?
            .set_default("app.json_logs", true)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.run_migrations", true)?
            .set_default("identity.timeout_secs", crate::constants::DEFAULT_HTTP_TIMEOUT_SECS)?
            .set_default("mail.enabled", false)?
            .set_default("mail.smtp_host", "localhost")?
            .set_default("mail.smtp_port", 587)?
            .set_default("mail.from_address", "LMS <no-reply@localhost>")?
            .set_default("mail.login_url", "http://localhost:5173/login")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
