use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Ceiling for any request body, uploads included.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Signs the flash cookie. Any length works; it is stretched internally.
    pub session_secret: String,
    pub session_duration_hours: i64,
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub max_width: u32,
    pub max_height: u32,
}

/// Account created on startup when the store has no administrator yet.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_user_id: String,
    pub admin_full_name: String,
    pub admin_password: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("server.max_upload_bytes", defaults.server.max_upload_bytes as i64)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("auth.session_secret", defaults.auth.session_secret)?
            .set_default("auth.session_duration_hours", defaults.auth.session_duration_hours)?
            .set_default("auth.secure_cookies", defaults.auth.secure_cookies)?
            .set_default("uploads.dir", defaults.uploads.dir)?
            .set_default("uploads.max_width", defaults.uploads.max_width as i64)?
            .set_default("uploads.max_height", defaults.uploads.max_height as i64)?
            .set_default("bootstrap.admin_user_id", defaults.bootstrap.admin_user_id)?
            .set_default("bootstrap.admin_full_name", defaults.bootstrap.admin_full_name)?
            .set_default("bootstrap.admin_password", defaults.bootstrap.admin_password)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with ACAD_PULSE__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("ACAD_PULSE").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                max_upload_bytes: 16 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "sqlite://acadpulse.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_secret: "change-me-in-production".to_string(),
                session_duration_hours: 24,
                secure_cookies: false,
            },
            uploads: UploadConfig {
                dir: "static/uploads".to_string(),
                max_width: 800,
                max_height: 600,
            },
            bootstrap: BootstrapConfig {
                admin_user_id: "ADMIN001".to_string(),
                admin_full_name: "College Admin".to_string(),
                admin_password: "AdminPass2026".to_string(),
            },
        }
    }
}
