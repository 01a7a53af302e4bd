use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

const DEFAULT_TEACHER_ROLES: &str = "teacher,admin";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    /// Roles accepted by the teacher guard, compared case-insensitively.
    pub teacher_roles: Vec<String>,
    pub max_upload_bytes: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            teacher_roles: parse_roles(
                &get_env("TEACHER_ROLES").unwrap_or_else(|_| DEFAULT_TEACHER_ROLES.to_string()),
            ),
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn parse_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .collect()
}

fn is_json_format(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("json")
}

/// Whether `LOG_FORMAT` asks for JSON log lines. Read on its own, before
/// `init_config`, because tracing is installed first.
pub fn json_logs() -> bool {
    get_env("LOG_FORMAT")
        .map(|raw| is_json_format(&raw))
        .unwrap_or(false)
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_trimmed_lowercased_and_non_empty() {
        assert_eq!(
            parse_roles(" Teacher, ADMIN ,,"),
            vec!["teacher".to_string(), "admin".to_string()]
        );
        assert!(parse_roles("").is_empty());
    }

    #[test]
    fn only_json_switches_the_log_format() {
        assert!(is_json_format("json"));
        assert!(is_json_format(" JSON "));
        assert!(!is_json_format("pretty"));
        assert!(!is_json_format(""));
    }
}
