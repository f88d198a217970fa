// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SESSION_DATA_DIR` | Directory holding `session.json` and `cookies.json` | `.tradebot` |
//! | `DERIV_APP_ID` | Application id for the WebSocket API and OAuth | `39777` |
//! | `DERIV_WS_URL` | WebSocket API endpoint | `wss://ws.derivws.com/websockets/v3` |
//! | `DERIV_OAUTH_URL` | OAuth authorize endpoint | `https://oauth.deriv.com/oauth2/authorize` |
//! | `SESSION_LANGUAGE` | Language code passed to OAuth and the API | `en` |
//! | `CALLBACK_HOST` | OAuth callback listener address | `127.0.0.1` |
//! | `CALLBACK_PORT` | OAuth callback listener port | `8080` |
//! | `AUTHORIZE_TIMEOUT_SECS` | Upper bound for the authorize round trip | `10` |
//! | `SESSION_ENVIRONMENT` | `production` or `development` | `production` |
//! | `DEV_LOGIN_ID` | Development fallback login id | Optional |
//! | `DEV_TOKEN` | Development fallback token | Optional |
//! | `DEV_CURRENCY` | Development fallback currency | `USD` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::models::AccountCredential;
use crate::storage::paths::DATA_ROOT;

/// Directory holding the credential store (`session.json`) and the
/// cookie jar (`cookies.json`).
///
/// # Default
/// `.tradebot` relative to the working directory
pub const DATA_DIR_ENV: &str = "SESSION_DATA_DIR";

/// Application id sent on the WebSocket URL and in the OAuth request.
///
/// # Default
/// `39777`
pub const APP_ID_ENV: &str = "DERIV_APP_ID";

/// WebSocket API endpoint used for `authorize`.
///
/// # Default
/// `wss://ws.derivws.com/websockets/v3`
pub const WS_URL_ENV: &str = "DERIV_WS_URL";

/// OAuth authorize endpoint the login URL is built from.
///
/// # Default
/// `https://oauth.deriv.com/oauth2/authorize`
pub const OAUTH_URL_ENV: &str = "DERIV_OAUTH_URL";

/// Language code passed to OAuth and the API.
///
/// # Default
/// `en`
pub const LANGUAGE_ENV: &str = "SESSION_LANGUAGE";

/// Address the OAuth callback listener binds to.
///
/// # Default
/// `127.0.0.1`
pub const CALLBACK_HOST_ENV: &str = "CALLBACK_HOST";

/// Port of the OAuth callback listener. Also used in the redirect URI.
///
/// # Default
/// `8080`
pub const CALLBACK_PORT_ENV: &str = "CALLBACK_PORT";

/// Whole seconds allowed for connect plus `authorize`. Must be non-zero.
///
/// # Default
/// `10`
pub const AUTHORIZE_TIMEOUT_ENV: &str = "AUTHORIZE_TIMEOUT_SECS";

/// Deployment environment, `production` or `development`.
///
/// The dev fallback credential is only honoured in `development`.
///
/// # Default
/// `production`
pub const ENVIRONMENT_ENV: &str = "SESSION_ENVIRONMENT";

/// Login id of the development fallback credential.
///
/// # Default
/// Unset. Must be set together with [`DEV_TOKEN_ENV`].
pub const DEV_LOGIN_ID_ENV: &str = "DEV_LOGIN_ID";

/// Token of the development fallback credential.
///
/// # Default
/// Unset. Must be set together with [`DEV_LOGIN_ID_ENV`].
pub const DEV_TOKEN_ENV: &str = "DEV_TOKEN";

/// Currency of the development fallback credential.
///
/// # Default
/// `USD`
pub const DEV_CURRENCY_ENV: &str = "DEV_CURRENCY";

/// Log output format, `json` or `pretty`.
///
/// # Default
/// `pretty`
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_APP_ID: &str = "39777";
pub const DEFAULT_WS_URL: &str = "wss://ws.derivws.com/websockets/v3";
pub const DEFAULT_OAUTH_URL: &str = "https://oauth.deriv.com/oauth2/authorize";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_CALLBACK_HOST: &str = "127.0.0.1";
pub const DEFAULT_CALLBACK_PORT: u16 = 8080;
pub const DEFAULT_AUTHORIZE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DEV_CURRENCY: &str = "USD";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value `{value}`: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("DEV_LOGIN_ID and DEV_TOKEN must be set together")]
    IncompleteDevCredential,
}

/// Deployment environment.
///
/// Only `Development` enables the fallback credential; nothing is inferred
/// from host names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub data_dir: PathBuf,
    pub app_id: String,
    pub ws_url: Url,
    pub oauth_url: Url,
    pub language: String,
    pub callback_host: String,
    pub callback_port: u16,
    pub authorize_timeout: Duration,
    pub environment: Environment,
    pub dev_credential: Option<AccountCredential>,
    pub log_format: LogFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_ROOT),
            app_id: DEFAULT_APP_ID.to_string(),
            ws_url: Url::parse(DEFAULT_WS_URL).expect("default WebSocket URL is valid"),
            oauth_url: Url::parse(DEFAULT_OAUTH_URL).expect("default OAuth URL is valid"),
            language: DEFAULT_LANGUAGE.to_string(),
            callback_host: DEFAULT_CALLBACK_HOST.to_string(),
            callback_port: DEFAULT_CALLBACK_PORT,
            authorize_timeout: DEFAULT_AUTHORIZE_TIMEOUT,
            environment: Environment::Production,
            dev_credential: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl SessionConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let environment = match get(ENVIRONMENT_ENV) {
            None => defaults.environment,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "production" | "prod" => Environment::Production,
                "development" | "dev" => Environment::Development,
                _ => {
                    return Err(invalid(
                        ENVIRONMENT_ENV,
                        value,
                        "expected `production` or `development`",
                    ))
                }
            },
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            None => defaults.log_format,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => return Err(invalid(LOG_FORMAT_ENV, value, "expected `json` or `pretty`")),
            },
        };

        let authorize_timeout = match get(AUTHORIZE_TIMEOUT_ENV) {
            None => defaults.authorize_timeout,
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(invalid(
                        AUTHORIZE_TIMEOUT_ENV,
                        value,
                        "expected a positive number of seconds",
                    ))
                }
            },
        };

        let callback_port = match get(CALLBACK_PORT_ENV) {
            None => defaults.callback_port,
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| invalid(CALLBACK_PORT_ENV, value.clone(), e.to_string()))?,
        };

        let dev_credential = match (get(DEV_LOGIN_ID_ENV), get(DEV_TOKEN_ENV)) {
            (Some(login_id), Some(token)) => Some(AccountCredential::new(
                login_id,
                token,
                get(DEV_CURRENCY_ENV).unwrap_or_else(|| DEFAULT_DEV_CURRENCY.to_string()),
            )),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteDevCredential),
        };

        Ok(Self {
            data_dir: get(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            app_id: get(APP_ID_ENV).unwrap_or(defaults.app_id),
            ws_url: parse_url(WS_URL_ENV, get(WS_URL_ENV), defaults.ws_url)?,
            oauth_url: parse_url(OAUTH_URL_ENV, get(OAUTH_URL_ENV), defaults.oauth_url)?,
            language: get(LANGUAGE_ENV).unwrap_or(defaults.language),
            callback_host: get(CALLBACK_HOST_ENV).unwrap_or(defaults.callback_host),
            callback_port,
            authorize_timeout,
            environment,
            dev_credential,
            log_format,
        })
    }

    /// Socket address string for the OAuth callback listener.
    pub fn callback_addr(&self) -> String {
        format!("{}:{}", self.callback_host, self.callback_port)
    }

    /// Redirect URI registered with OAuth: `http://<host>:<port>/callback`.
    pub fn redirect_uri(&self) -> Result<Url, ConfigError> {
        let raw = format!("http://{}/callback", self.callback_addr());
        Url::parse(&raw).map_err(|e| invalid(CALLBACK_HOST_ENV, raw, e.to_string()))
    }

    /// Credential substituted for an empty URL batch, development only.
    pub fn dev_fallback(&self) -> Option<&AccountCredential> {
        match self.environment {
            Environment::Development => self.dev_credential.as_ref(),
            Environment::Production => None,
        }
    }
}

fn invalid(var: &'static str, value: String, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value,
        reason: reason.into(),
    }
}

fn parse_url(var: &'static str, value: Option<String>, default: Url) -> Result<Url, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => Url::parse(&value).map_err(|e| invalid(var, value.clone(), e.to_string())),
    }
}
