mod config;
mod frame;
mod handlers;
mod hub;
mod overlay;
mod registry;
mod router;
mod routes;
mod state;

use std::sync::Arc;

use crate::handlers::HandObserver;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match config::RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid relay configuration");
            std::process::exit(1);
        }
    };

    let observer: Option<Arc<dyn HandObserver>> = config.overlay.map(|size| {
        tracing::info!(width = size.width, height = size.height, "local overlay attached");
        Arc::new(overlay::ScreenPointer::new(size.width, size.height)) as Arc<dyn HandObserver>
    });
    let registry = registry::HandlerRegistry::with_defaults(observer);
    tracing::info!(handlers = registry.len(), "gesture handlers registered");

    // Static page for browser consumers. Non-fatal: the relay still works without it.
    let page_addr = config.page_addr();
    match tokio::net::TcpListener::bind(&page_addr).await {
        Ok(listener) => {
            let app = routes::page_app(config.index_html.clone());
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, app).await {
                    tracing::error!(error = %e, "page server failed");
                }
            });
            tracing::info!(addr = %page_addr, "page server listening");
        }
        Err(e) => tracing::error!(addr = %page_addr, error = %e, "page server failed to bind"),
    }

    let hub = hub::Hub::new(config.gesture_addr(), registry, config.consumer_buffer);
    let addr = match hub.start().await {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "gesture hub failed to start");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "gesture relay listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed, shutting down");
    }
    tracing::info!(consumers = hub.consumer_count().await, "shutting down");
    hub.stop().await;
}
