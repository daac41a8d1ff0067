// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! racsd — the multi-project continuous-build daemon.
//!
//! Binds the HTTP control surface (spec.md §6), reconciles persisted
//! project state on startup (spec.md §4.8), and runs the periodic image
//! prune loop alongside it.

use std::sync::Arc;

use racs_daemon::config::Config;
use racs_daemon::http::{build_router, AppState};
use racs_engine::prune;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = Config::parse_env();

    let log_guard = match setup_logging(&config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to set up logging: {err}");
            std::process::exit(1)
        }
    };

    info!(port = config.port, state_dir = %config.state_dir.display(), "starting racsd");

    let engine = match racs_daemon::build_engine(&config).await {
        Ok(engine) => Arc::new(engine),
        Err(err) => {
            error!(error = %err, "startup reconciliation failed");
            drop(log_guard);
            std::process::exit(1)
        }
    };

    let prune_log = config.state_dir.join("tasks").join("prune.log");
    tokio::spawn(prune::run_loop(engine.shared().runner.clone(), prune_log, prune::PRUNE_INTERVAL));

    let router = build_router(AppState { engine, no_login: config.no_login });
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));

    let serve_result = match (&config.ssl_cert, &config.ssl_key) {
        (Some(cert), Some(key)) => {
            info!("serving HTTPS");
            let tls_config = match axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key).await {
                Ok(tls_config) => tls_config,
                Err(err) => {
                    error!(error = %err, "failed to load TLS certificate/key");
                    drop(log_guard);
                    std::process::exit(1)
                }
            };
            axum_server::bind_rustls(addr, tls_config).serve(router.into_make_service()).await
        }
        _ => {
            info!("serving plain HTTP");
            match TcpListener::bind(addr).await {
                Ok(listener) => axum::serve(listener, router).await,
                Err(err) => {
                    error!(error = %err, "failed to bind listener");
                    drop(log_guard);
                    std::process::exit(1)
                }
            }
        }
    };

    if let Err(err) = serve_result {
        error!(error = %err, "server exited with an error");
    }

    drop(log_guard);
}

fn setup_logging(
    config: &Config,
) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(&config.state_dir)?;

    let log_path = config.log_path();
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(&config.state_dir),
        log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("racsd.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
