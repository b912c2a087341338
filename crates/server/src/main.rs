//! `zpl-labeler`: the label printing web server.

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use zpl_labeler_catalog::load_catalog;
use zpl_labeler_print_client::Dispatcher;
use zpl_labeler_server::{AppState, ServerConfig, build_router, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logger(&config.log_level);

    let catalog = load_catalog(&config.catalog)
        .with_context(|| format!("loading catalog {}", config.catalog.display()))?;
    if !config.template.is_file() {
        tracing::warn!(
            template = %config.template.display(),
            "label template not found; label generation will fail until it exists"
        );
    }

    let dispatcher = Dispatcher::with_host_queue(config.dispatch_config());
    let settings = config.initial_printer_settings();

    tracing::info!(
        bind = %config.bind,
        products = catalog.len(),
        template = %config.template.display(),
        export_dir = %config.export_dir.display(),
        queue_backend = dispatcher.queue_backend(),
        "starting label server"
    );
    tracing::info!(
        transport = %settings.transport,
        ip = ?settings.ip,
        port = settings.port,
        printer_name = %settings.printer_name,
        "printer configuration"
    );

    let state = AppState::new(catalog, config.template.clone(), dispatcher, settings);
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!("listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
