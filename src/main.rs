use std::net::SocketAddr;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use viewscan::{config, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging (stdout + daily file rotation under ./logs)
    std::fs::create_dir_all("logs").ok();
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let file_appender = tracing_appender::rolling::daily("logs", "viewscan.log");
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Keep the guards alive so the non-blocking writers flush on exit
    let _log_guards = (stdout_guard, file_guard);

    // Load configuration (embedded defaults -> viewscan.toml -> env/.env)
    let app_cfg = config::load()?;

    let state = AppState::new(app_cfg.clone());
    match state.views.load().await {
        Ok(0) => warn!("No templates found under {}", app_cfg.views.root.display()),
        Ok(_) => {}
        Err(e) => warn!("Initial template load failed: {}", e),
    }
    if app_cfg.views.watch {
        let _watcher = state.views.spawn_watcher(Duration::from_millis(app_cfg.views.watch_interval_ms));
    }

    let app = routes::router(state);
    // CORS: permissive in debug builds for local development
    let app = if cfg!(debug_assertions) { app.layer(CorsLayer::permissive()) } else { app };

    let port: u16 = app_cfg.server.port;
    let host: String = app_cfg.server.host.clone();
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen addr {}:{} - {}", host, port, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("viewscan listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut term = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received. Stopping server...");
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}
