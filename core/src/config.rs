//! Test-run settings: where the service lives and which credentials to use.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory. A missing `.env` is not an error.

use std::env;
use std::sync::OnceLock;

use tracing::{info, warn};

use crate::error::ClientError;
use crate::types::Credentials;

pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

pub const BASE_URL_VAR: &str = "PETFRIENDS_BASE_URL";
pub const VALID_EMAIL_VAR: &str = "PETFRIENDS_VALID_EMAIL";
pub const VALID_PASSWORD_VAR: &str = "PETFRIENDS_VALID_PASSWORD";
pub const INVALID_EMAIL_VAR: &str = "PETFRIENDS_INVALID_EMAIL";
pub const INVALID_PASSWORD_VAR: &str = "PETFRIENDS_INVALID_PASSWORD";

const FALLBACK_INVALID_EMAIL: &str = "no-such-user@example.invalid";
const FALLBACK_INVALID_PASSWORD: &str = "not-the-password";

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    /// A registered account.
    pub valid: Credentials,
    /// A pair the service must reject.
    pub invalid: Credentials,
}

impl Settings {
    /// Loads `.env` (if present) and reads the settings from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        load_dotenv();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Process-wide settings, loaded on first use.
    pub fn global() -> Result<&'static Settings, ClientError> {
        if let Some(settings) = SETTINGS.get() {
            return Ok(settings);
        }
        let settings = Self::from_env()?;
        Ok(SETTINGS.get_or_init(|| settings))
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ClientError::Config(format!("{name} must be set")))
        };

        let base_url = lookup(BASE_URL_VAR)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let valid = Credentials::new(required(VALID_EMAIL_VAR)?, required(VALID_PASSWORD_VAR)?);
        let invalid = Credentials::new(
            lookup(INVALID_EMAIL_VAR).unwrap_or_else(|| FALLBACK_INVALID_EMAIL.to_string()),
            lookup(INVALID_PASSWORD_VAR).unwrap_or_else(|| FALLBACK_INVALID_PASSWORD.to_string()),
        );

        Ok(Self {
            base_url,
            valid,
            invalid,
        })
    }
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("loaded environment from {}", path.display()),
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!("failed to load .env file: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_all_variables() {
        temp_env::with_vars(
            [
                (BASE_URL_VAR, Some("http://127.0.0.1:3000")),
                (VALID_EMAIL_VAR, Some("tester@example.com")),
                (VALID_PASSWORD_VAR, Some("pw")),
                (INVALID_EMAIL_VAR, Some("bad@example.com")),
                (INVALID_PASSWORD_VAR, Some("bad")),
            ],
            || {
                let settings = Settings::from_vars(|name| env::var(name).ok()).unwrap();
                assert_eq!(settings.base_url, "http://127.0.0.1:3000");
                assert_eq!(settings.valid, Credentials::new("tester@example.com", "pw"));
                assert_eq!(settings.invalid, Credentials::new("bad@example.com", "bad"));
            },
        );
    }

    #[test]
    fn base_url_and_invalid_pair_have_defaults() {
        temp_env::with_vars(
            [
                (BASE_URL_VAR, None),
                (VALID_EMAIL_VAR, Some("tester@example.com")),
                (VALID_PASSWORD_VAR, Some("pw")),
                (INVALID_EMAIL_VAR, None),
                (INVALID_PASSWORD_VAR, None),
            ],
            || {
                let settings = Settings::from_vars(|name| env::var(name).ok()).unwrap();
                assert_eq!(settings.base_url, DEFAULT_BASE_URL);
                assert_eq!(settings.invalid.email, FALLBACK_INVALID_EMAIL);
                assert_ne!(settings.invalid, settings.valid);
            },
        );
    }

    #[test]
    fn missing_valid_credentials_is_a_config_error() {
        temp_env::with_vars(
            [(VALID_EMAIL_VAR, None::<&str>), (VALID_PASSWORD_VAR, Some("pw"))],
            || {
                let err = Settings::from_vars(|name| env::var(name).ok()).unwrap_err();
                assert!(matches!(err, ClientError::Config(ref msg) if msg.contains(VALID_EMAIL_VAR)));
            },
        );
    }

    #[test]
    fn empty_valid_password_is_rejected() {
        let err = Settings::from_vars(|name| match name {
            VALID_EMAIL_VAR => Some("tester@example.com".to_string()),
            VALID_PASSWORD_VAR => Some(String::new()),
            _ => None,
        })
        .unwrap_err();
        assert!(err.to_string().contains(VALID_PASSWORD_VAR));
    }
}
