use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::mail::mime::escape_header_value;

const DEFAULT_FROM_EMAIL: &str = "webmaster@localhost";
const DEFAULT_API_BASE_URL: &str = "https://gmail.googleapis.com";
pub const ACCESS_TOKEN_ENV: &str = "POSTBOX_ACCESS_TOKEN";

/// Transports a profile can select. The in-memory outbox is library-only:
/// it would drop flushed mail when the process exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Console,
    File,
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub default_from_email: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub transport: TransportKind,
    #[serde(default)]
    pub file_dir: Option<PathBuf>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Settings {
    /// `From` value for messages that do not name a sender.
    pub fn from_address(&self) -> String {
        let email = self
            .default_from_email
            .as_deref()
            .map(escape_header_value)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string());
        let name = self
            .sender_name
            .as_deref()
            .map(escape_header_value)
            .filter(|value| !value.is_empty());

        match name {
            Some(name) => format!("{name} <{email}>"),
            None => email,
        }
    }

    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn access_token(&self) -> AppResult<String> {
        env::var(ACCESS_TOKEN_ENV)
            .ok()
            .or_else(|| self.access_token.clone())
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Auth(format!(
                    "http transport needs an access token; set `access_token` in the profile or {ACCESS_TOKEN_ENV}"
                ))
            })
    }
}

pub fn load(path: PathBuf) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(&path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::Config(format!("invalid settings file {}: {err}", path.display()))
    })
}
