// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Startup gate between configuration loading and binding the listener.

use std::process::ExitCode;

use tracing::{error, info};

use crate::config::{ConfigError, Settings};

/// Accept loaded settings or produce the exit code for a refused start.
///
/// On failure every violation is logged and the caller must return the
/// code without binding.
pub fn validated_settings(loaded: Result<Settings, ConfigError>) -> Result<Settings, ExitCode> {
    match loaded {
        Ok(settings) => {
            info!(summary = ?settings.summary(), "Configuration loaded");
            Ok(settings)
        }
        Err(err) => {
            for violation in err.violations() {
                error!(%violation, "Invalid configuration");
            }
            error!(
                violations = err.violations().len(),
                "Configuration validation failed, refusing to start"
            );
            Err(ExitCode::FAILURE)
        }
    }
}
