// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Logging
//!
//! Installs the global `tracing` subscriber.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LOG_FORMAT` | `json` or `pretty` | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` (`debug,...` in debug mode) |

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_FILTER: &str = "info,tower_http=debug";
const DEBUG_FILTER: &str = "debug,tower_http=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to `Pretty`.
    pub fn from_str(s: &str) -> LogFormat {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> LogFormat {
        std::env::var(LOG_FORMAT_ENV)
            .map(|value| LogFormat::from_str(&value))
            .unwrap_or_default()
    }
}

fn default_filter(debug: bool) -> &'static str {
    if debug {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Initialize the global subscriber. `RUST_LOG` wins over the debug flag.
pub fn init(format: LogFormat, debug: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
