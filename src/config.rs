// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines the environment variable names, default values and
//! validation rules for the process-wide [`Settings`]. Configuration is read
//! exactly once at startup; every rule is checked and all violations are
//! reported together in a single [`ConfigError`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GEMINI_API_KEY` | Model provider credential | Required when `NODE_ENV=production` |
//! | `PROMPTX_MCP_SERVER` | Command that launches the PromptX MCP server | `npx -y dpml-prompt@dev mcp-server` |
//! | `DEFAULT_MODEL` | `gemini-pro` or `gemini-pro-vision` | `gemini-pro` |
//! | `APP_NAME` | Display name used in responses | `小说创作系统` |
//! | `DEBUG` | Verbose logging when exactly `true` | `false` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port (1000-65535) | `3001` |
//! | `FRONTEND_URL` | Origin allowed by CORS | `http://localhost:3000` |
//! | `MEMORY_LIMIT` | Maximum conversation records kept (>= 10) | `100` |
//! | `NODE_ENV` | `production` makes the credential mandatory | unset |
//!
//! Unset variables and variables set to an empty string both fall back to
//! the default. Values are trimmed, except `GEMINI_API_KEY`, which is kept
//! verbatim.

use std::{
    fmt,
    num::IntErrorKind,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::secret::SecretString;

/// Environment variable holding the Gemini API credential.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable holding the PromptX MCP server launch command.
pub const PROMPTX_MCP_SERVER_ENV: &str = "PROMPTX_MCP_SERVER";

/// Environment variable selecting the default model.
pub const DEFAULT_MODEL_ENV: &str = "DEFAULT_MODEL";

/// Environment variable overriding the application display name.
pub const APP_NAME_ENV: &str = "APP_NAME";

/// Environment variable enabling debug mode. Only the exact value `true`
/// turns it on.
pub const DEBUG_ENV: &str = "DEBUG";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the front-end origin allowed by CORS.
pub const FRONTEND_URL_ENV: &str = "FRONTEND_URL";

/// Environment variable bounding the number of stored conversation records.
pub const MEMORY_LIMIT_ENV: &str = "MEMORY_LIMIT";

/// Environment kind marker. `production` tightens validation.
pub const NODE_ENV_ENV: &str = "NODE_ENV";

pub const DEFAULT_MCP_SERVER_COMMAND: &str = "npx -y dpml-prompt@dev mcp-server";
pub const DEFAULT_APP_NAME: &str = "小说创作系统";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_MEMORY_LIMIT: u32 = 100;

/// Lowest accepted port. Privileged and well-known ports are rejected.
pub const MIN_PORT: u16 = 1000;
pub const MAX_PORT: u16 = 65535;

/// Smallest accepted conversation history size.
pub const MIN_MEMORY_LIMIT: u32 = 10;

// =============================================================================
// Model Selection
// =============================================================================

/// Models the writing assistant may be configured to use.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ModelChoice {
    /// Text-only model
    #[default]
    GeminiPro,
    /// Multimodal model
    GeminiProVision,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 2] = [ModelChoice::GeminiPro, ModelChoice::GeminiProVision];

    /// Parse a model identifier. Matching is exact.
    pub fn parse(s: &str) -> Option<ModelChoice> {
        ModelChoice::ALL.into_iter().find(|model| model.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelChoice::GeminiPro => "gemini-pro",
            ModelChoice::GeminiProVision => "gemini-pro-vision",
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Environment Kind
// =============================================================================

/// Deployment environment derived from `NODE_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunEnvironment {
    #[default]
    Development,
    Production,
}

impl RunEnvironment {
    fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some("production") => RunEnvironment::Production,
            _ => RunEnvironment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, RunEnvironment::Production)
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Startup configuration failure.
///
/// Always carries every violation found in one validation pass, in the
/// order the rules are checked.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration validation failed:\n{}", .violations.join("\n"))]
    Invalid { violations: Vec<String> },
}

impl ConfigError {
    pub fn violations(&self) -> &[String] {
        match self {
            ConfigError::Invalid { violations } => violations,
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Validated process configuration.
///
/// Built once by [`Settings::from_env`] and shared read-only afterwards.
/// Fields are private; a value of this type always satisfies every
/// validation rule.
#[derive(Debug, Clone)]
pub struct Settings {
    gemini_api_key: SecretString,
    mcp_server_command: String,
    default_model: ModelChoice,
    app_name: String,
    debug: bool,
    host: IpAddr,
    port: u16,
    frontend_url: String,
    allowed_origin: String,
    memory_limit: u32,
    environment: RunEnvironment,
}

/// Redacted view of [`Settings`] safe to log or return.
///
/// The credential is reduced to `has_gemini_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsSummary {
    pub app_name: String,
    pub debug: bool,
    pub host: IpAddr,
    pub port: u16,
    pub frontend_url: String,
    pub memory_limit: u32,
    pub default_model: ModelChoice,
    pub mcp_server_command: String,
    pub environment: RunEnvironment,
    pub has_gemini_key: bool,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key-value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut violations = Vec::new();

        let environment = RunEnvironment::from_marker(read(NODE_ENV_ENV).as_deref());
        let gemini_api_key = SecretString::new(lookup(GEMINI_API_KEY_ENV).unwrap_or_default());
        if environment.is_production() && gemini_api_key.is_empty() {
            violations.push(format!(
                "{GEMINI_API_KEY_ENV} is required when {NODE_ENV_ENV}=production"
            ));
        }

        let default_model = record(&mut violations, parse_model(read(DEFAULT_MODEL_ENV)));
        let port = record(&mut violations, parse_port(read(PORT_ENV)));
        let frontend_url = read(FRONTEND_URL_ENV).unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());
        let allowed_origin = record(&mut violations, parse_origin(&frontend_url));
        let memory_limit = record(&mut violations, parse_memory_limit(read(MEMORY_LIMIT_ENV)));
        let host = record(&mut violations, parse_host(read(HOST_ENV)));

        let (Some(default_model), Some(port), Some(allowed_origin), Some(memory_limit), Some(host)) =
            (default_model, port, allowed_origin, memory_limit, host)
        else {
            return Err(ConfigError::Invalid { violations });
        };
        if !violations.is_empty() {
            return Err(ConfigError::Invalid { violations });
        }

        Ok(Self {
            gemini_api_key,
            mcp_server_command: read(PROMPTX_MCP_SERVER_ENV)
                .unwrap_or_else(|| DEFAULT_MCP_SERVER_COMMAND.to_string()),
            default_model,
            app_name: read(APP_NAME_ENV).unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            debug: read(DEBUG_ENV).as_deref() == Some("true"),
            host,
            port,
            frontend_url,
            allowed_origin,
            memory_limit,
            environment,
        })
    }

    pub fn gemini_api_key(&self) -> &SecretString {
        &self.gemini_api_key
    }

    pub fn mcp_server_command(&self) -> &str {
        &self.mcp_server_command
    }

    pub fn default_model(&self) -> ModelChoice {
        self.default_model
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Front-end URL exactly as configured.
    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }

    /// ASCII serialization of the front-end origin, as sent in
    /// `Access-Control-Allow-Origin`.
    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    pub fn memory_limit(&self) -> u32 {
        self.memory_limit
    }

    pub fn environment(&self) -> RunEnvironment {
        self.environment
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Redacted summary for startup logs and diagnostics.
    pub fn summary(&self) -> SettingsSummary {
        SettingsSummary {
            app_name: self.app_name.clone(),
            debug: self.debug,
            host: self.host,
            port: self.port,
            frontend_url: self.frontend_url.clone(),
            memory_limit: self.memory_limit,
            default_model: self.default_model,
            mcp_server_command: self.mcp_server_command.clone(),
            environment: self.environment,
            has_gemini_key: !self.gemini_api_key.is_empty(),
        }
    }
}

impl Default for Settings {
    /// Settings with every variable unset.
    fn default() -> Self {
        Self {
            gemini_api_key: SecretString::default(),
            mcp_server_command: DEFAULT_MCP_SERVER_COMMAND.to_string(),
            default_model: ModelChoice::default(),
            app_name: DEFAULT_APP_NAME.to_string(),
            debug: false,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            allowed_origin: DEFAULT_FRONTEND_URL.to_string(),
            memory_limit: DEFAULT_MEMORY_LIMIT,
            environment: RunEnvironment::default(),
        }
    }
}

// =============================================================================
// Field Parsers
// =============================================================================

fn record<T>(violations: &mut Vec<String>, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            violations.push(message);
            None
        }
    }
}

fn parse_model(raw: Option<String>) -> Result<ModelChoice, String> {
    let Some(raw) = raw else {
        return Ok(ModelChoice::default());
    };
    ModelChoice::parse(&raw).ok_or_else(|| {
        let allowed: Vec<&str> = ModelChoice::ALL.iter().map(ModelChoice::as_str).collect();
        format!(
            "{DEFAULT_MODEL_ENV} must be one of {}, got '{raw}'",
            allowed.join(", ")
        )
    })
}

/// Integers are parsed wide so that an out-of-range number is reported as a
/// range violation rather than a parse failure. Numbers beyond `i64` are
/// range violations too.
fn parse_integer(key: &str, raw: &str) -> Result<i64, String> {
    raw.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            format!("{key} is out of range: {raw}")
        }
        _ => format!("{key} must be an integer, got '{raw}'"),
    })
}

fn parse_port(raw: Option<String>) -> Result<u16, String> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PORT);
    };
    let value = parse_integer(PORT_ENV, &raw)?;
    if !(i64::from(MIN_PORT)..=i64::from(MAX_PORT)).contains(&value) {
        return Err(format!(
            "{PORT_ENV} is out of range: {value} (expected {MIN_PORT}-{MAX_PORT})"
        ));
    }
    u16::try_from(value).map_err(|_| format!("{PORT_ENV} is out of range: {value}"))
}

fn parse_memory_limit(raw: Option<String>) -> Result<u32, String> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MEMORY_LIMIT);
    };
    let value = parse_integer(MEMORY_LIMIT_ENV, &raw)?;
    if value < i64::from(MIN_MEMORY_LIMIT) {
        return Err(format!(
            "{MEMORY_LIMIT_ENV} is too small: {value} (minimum {MIN_MEMORY_LIMIT})"
        ));
    }
    u32::try_from(value).map_err(|_| format!("{MEMORY_LIMIT_ENV} is too large: {value}"))
}

fn parse_origin(frontend_url: &str) -> Result<String, String> {
    let url = Url::parse(frontend_url)
        .map_err(|e| format!("{FRONTEND_URL_ENV} is not a valid URL ({e}): '{frontend_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(format!(
            "{FRONTEND_URL_ENV} must be an http or https URL, got '{frontend_url}'"
        ));
    }
    Ok(url.origin().ascii_serialization())
}

fn parse_host(raw: Option<String>) -> Result<IpAddr, String> {
    let Some(raw) = raw else {
        return Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    };
    raw.parse()
        .map_err(|_| format!("{HOST_ENV} must be an IP address, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    fn violations(pairs: &[(&str, &str)]) -> Vec<String> {
        load(pairs)
            .expect_err("configuration should be rejected")
            .violations()
            .to_vec()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = load(&[]).expect("defaults are valid");

        assert!(settings.gemini_api_key().is_empty());
        assert_eq!(settings.mcp_server_command(), DEFAULT_MCP_SERVER_COMMAND);
        assert_eq!(settings.default_model(), ModelChoice::GeminiPro);
        assert_eq!(settings.app_name(), "小说创作系统");
        assert!(!settings.debug());
        assert_eq!(settings.port(), 3001);
        assert_eq!(settings.frontend_url(), "http://localhost:3000");
        assert_eq!(settings.memory_limit(), 100);
        assert_eq!(settings.environment(), RunEnvironment::Development);
        assert_eq!(settings.bind_addr(), "0.0.0.0:3001".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn default_impl_matches_empty_environment() {
        let loaded = load(&[]).unwrap();
        assert_eq!(Settings::default().summary(), loaded.summary());
        assert_eq!(Settings::default().allowed_origin(), loaded.allowed_origin());
    }

    #[test]
    fn explicit_values_are_coerced() {
        let settings = load(&[
            (GEMINI_API_KEY_ENV, "key-123"),
            (PROMPTX_MCP_SERVER_ENV, "promptx serve"),
            (DEFAULT_MODEL_ENV, "gemini-pro-vision"),
            (APP_NAME_ENV, "Studio"),
            (DEBUG_ENV, "true"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "8080"),
            (FRONTEND_URL_ENV, "https://studio.example.com/app"),
            (MEMORY_LIMIT_ENV, "250"),
        ])
        .expect("valid configuration");

        assert_eq!(settings.gemini_api_key().expose_secret(), "key-123");
        assert_eq!(settings.mcp_server_command(), "promptx serve");
        assert_eq!(settings.default_model(), ModelChoice::GeminiProVision);
        assert_eq!(settings.app_name(), "Studio");
        assert!(settings.debug());
        assert_eq!(settings.port(), 8080);
        assert_eq!(settings.frontend_url(), "https://studio.example.com/app");
        assert_eq!(settings.allowed_origin(), "https://studio.example.com");
        assert_eq!(settings.memory_limit(), 250);
        assert_eq!(settings.bind_addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let settings = load(&[(PORT_ENV, ""), (MEMORY_LIMIT_ENV, "  "), (FRONTEND_URL_ENV, "")])
            .expect("empty values use defaults");
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(settings.memory_limit(), DEFAULT_MEMORY_LIMIT);
        assert_eq!(settings.frontend_url(), DEFAULT_FRONTEND_URL);
    }

    #[test]
    fn debug_requires_exact_true() {
        for value in ["TRUE", "1", "yes", "True"] {
            let settings = load(&[(DEBUG_ENV, value)]).unwrap();
            assert!(!settings.debug(), "{value} must not enable debug");
        }
        assert!(load(&[(DEBUG_ENV, "true")]).unwrap().debug());
    }

    #[test]
    fn port_bounds_are_inclusive() {
        assert_eq!(load(&[(PORT_ENV, "1000")]).unwrap().port(), 1000);
        assert_eq!(load(&[(PORT_ENV, "65535")]).unwrap().port(), 65535);
    }

    #[test]
    fn port_outside_range_is_rejected() {
        for value in ["0", "50", "999", "65536", "100000", "-1"] {
            let errors = violations(&[(PORT_ENV, value)]);
            assert_eq!(errors.len(), 1, "port {value}");
            assert!(errors[0].starts_with(PORT_ENV), "{}", errors[0]);
            assert!(errors[0].contains("out of range"), "{}", errors[0]);
        }
    }

    #[test]
    fn overflowing_numbers_are_range_violations() {
        let errors = violations(&[(PORT_ENV, "99999999999999999999")]);
        assert_eq!(
            errors,
            vec!["PORT is out of range: 99999999999999999999".to_string()]
        );

        let errors = violations(&[(MEMORY_LIMIT_ENV, "-99999999999999999999")]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with(MEMORY_LIMIT_ENV));
        assert!(errors[0].contains("out of range"));
    }

    #[test]
    fn non_numeric_port_is_its_own_violation() {
        let errors = violations(&[(PORT_ENV, "http")]);
        assert_eq!(errors, vec!["PORT must be an integer, got 'http'".to_string()]);
    }

    #[test]
    fn memory_limit_floor_is_inclusive() {
        assert_eq!(load(&[(MEMORY_LIMIT_ENV, "10")]).unwrap().memory_limit(), 10);

        let errors = violations(&[(MEMORY_LIMIT_ENV, "9")]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with(MEMORY_LIMIT_ENV));
    }

    #[test]
    fn non_numeric_memory_limit_is_rejected() {
        let errors = violations(&[(MEMORY_LIMIT_ENV, "lots")]);
        assert_eq!(
            errors,
            vec!["MEMORY_LIMIT must be an integer, got 'lots'".to_string()]
        );
    }

    #[test]
    fn credential_optional_outside_production() {
        assert!(load(&[(GEMINI_API_KEY_ENV, "")]).is_ok());
        assert!(load(&[(NODE_ENV_ENV, "development")]).is_ok());
        assert!(load(&[(NODE_ENV_ENV, "Production")]).is_ok());
    }

    #[test]
    fn credential_is_stored_verbatim() {
        let settings = load(&[(GEMINI_API_KEY_ENV, " padded-key ")]).unwrap();
        assert_eq!(settings.gemini_api_key().expose_secret(), " padded-key ");

        let settings = load(&[(NODE_ENV_ENV, "production"), (GEMINI_API_KEY_ENV, "   ")])
            .expect("whitespace-only credential counts as present");
        assert!(settings.summary().has_gemini_key);
    }

    #[test]
    fn credential_required_in_production() {
        let errors = violations(&[(NODE_ENV_ENV, "production"), (GEMINI_API_KEY_ENV, "")]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains(GEMINI_API_KEY_ENV));

        let settings = load(&[(NODE_ENV_ENV, "production"), (GEMINI_API_KEY_ENV, "k")])
            .expect("credential present");
        assert!(settings.environment().is_production());
    }

    #[test]
    fn unknown_model_is_rejected() {
        let errors = violations(&[(DEFAULT_MODEL_ENV, "gpt-4")]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains(DEFAULT_MODEL_ENV));
        assert!(errors[0].contains("gemini-pro, gemini-pro-vision"));
    }

    #[test]
    fn invalid_frontend_url_is_rejected() {
        assert!(violations(&[(FRONTEND_URL_ENV, "not a url")])[0].starts_with(FRONTEND_URL_ENV));
        assert!(violations(&[(FRONTEND_URL_ENV, "ftp://files.example.com")])[0]
            .contains("http or https"));
    }

    #[test]
    fn invalid_host_is_rejected() {
        let errors = violations(&[(HOST_ENV, "localhost")]);
        assert_eq!(errors, vec!["HOST must be an IP address, got 'localhost'".to_string()]);
    }

    #[test]
    fn all_violations_are_reported_together() {
        let err = load(&[
            (NODE_ENV_ENV, "production"),
            (PORT_ENV, "50"),
            (MEMORY_LIMIT_ENV, "1"),
        ])
        .expect_err("three rules fail");

        let errors = err.violations();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with(GEMINI_API_KEY_ENV));
        assert!(errors[1].starts_with(PORT_ENV));
        assert!(errors[2].starts_with(MEMORY_LIMIT_ENV));

        let rendered = err.to_string();
        assert!(rendered.starts_with("configuration validation failed:\n"));
        assert_eq!(rendered.lines().count(), 4);
    }

    #[test]
    fn summary_redacts_credential() {
        let secret = "sk-very-secret-value";
        let settings = load(&[(GEMINI_API_KEY_ENV, secret)]).unwrap();
        let summary = settings.summary();
        assert!(summary.has_gemini_key);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains(secret));
        assert!(json.contains(r#""has_gemini_key":true"#));
        assert!(json.contains(r#""default_model":"gemini-pro""#));
        assert!(!format!("{settings:?}").contains(secret));

        assert!(!load(&[]).unwrap().summary().has_gemini_key);
    }

    #[test]
    fn model_choice_round_trips_through_str() {
        for model in ModelChoice::ALL {
            assert_eq!(ModelChoice::parse(model.as_str()), Some(model));
            assert_eq!(model.to_string(), model.as_str());
        }
        assert_eq!(ModelChoice::parse("GEMINI-PRO"), None);
    }
}
