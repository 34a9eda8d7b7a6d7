use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 5] = [
    "http://13.49.68.57:8221",
    "http://13.49.68.57:3055",
    "http://13.49.68.57:5500",
    "http://127.0.0.1:5500",
    "http://13.49.68.57:5501",
];

/// What an update does to `profile_image` when the request carries no new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePolicy {
    /// Leave the stored image in place.
    Keep,
    /// Overwrite with the request's value, clearing the image when no file was sent.
    Replace,
}

impl ImagePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" => Some(ImagePolicy::Keep),
            "replace" => Some(ImagePolicy::Replace),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "Invalid value {:?} for {}: {}", value, key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return url.parse();
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub upload_dir: PathBuf,
    pub public_dir: PathBuf,
    pub cors_allowed_origins: Vec<String>,
    pub image_policy: ImagePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            host: var("DB_HOST", "postgres"),
            port: parse_number(&lookup, "DB_PORT", 5432)?,
            user: var("DB_USER", "postgres"),
            password: var("DB_PASSWORD", "admin123"),
            name: var("DB_NAME", "auth_db"),
            max_connections: parse_number(&lookup, "DB_MAX_CONNECTIONS", 10)?,
        };

        let image_policy = match lookup("EMPLOYEE_IMAGE_ON_UPDATE") {
            Some(raw) => ImagePolicy::parse(&raw).ok_or(ConfigError::Invalid {
                key: "EMPLOYEE_IMAGE_ON_UPDATE",
                value: raw,
                reason: "expected 'keep' or 'replace'",
            })?,
            None => ImagePolicy::Keep,
        };

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Config {
            host: var("EMPLOYEE_HOST", "0.0.0.0"),
            port: parse_number(&lookup, "EMPLOYEE_PORT", 3055)?,
            database,
            upload_dir: PathBuf::from(var("UPLOAD_DIR", "uploads")),
            public_dir: PathBuf::from(var("PUBLIC_DIR", "public")),
            cors_allowed_origins,
            image_policy,
        })
    }
}

fn parse_number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
            reason: "expected a positive number",
        }),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut origins = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if origin == "*" {
            return Err(ConfigError::Invalid {
                key: "CORS_ALLOWED_ORIGINS",
                value: raw.to_string(),
                reason: "wildcard origins are not allowed",
            });
        }
        origins.push(origin.trim_end_matches('/').to_string());
    }
    Ok(origins)
}
