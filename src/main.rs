// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, time::Duration};

use novel_studio_server::{
    api::router,
    config::Settings,
    observability::{self, LogFormat},
    startup,
    state::AppState,
};
use tracing::{error, info};

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    // Settings are read once; logging needs the debug flag, so it comes second.
    let settings = Settings::from_env();
    observability::init(
        LogFormat::from_env(),
        settings.as_ref().is_ok_and(Settings::debug),
    );

    let settings = match startup::validated_settings(settings) {
        Ok(settings) => settings,
        Err(code) => return code,
    };

    let addr = settings.bind_addr();
    let app_name = settings.app_name().to_string();
    let app = router(AppState::new(settings));

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, draining connections");
        shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    info!("{app_name} listening on http://{addr} (health at /api/health, docs at /docs)");

    if let Err(e) = axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
    {
        error!(error = %e, %addr, "HTTP server failed");
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
