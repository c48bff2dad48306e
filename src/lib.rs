//! Shelf application library: the book catalogue modules and the server
//! entry point shared by `shelf-app` and the `shelf` CLI.

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use shelf_db::MemoryStore;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::books::handlers::SharedStore;

/// Registry holding every application module, backed by a fresh in-memory store
pub fn build_registry() -> anyhow::Result<ModuleRegistry> {
    build_registry_with_store(Arc::new(MemoryStore::new()))
}

/// Registry holding every application module, backed by `store`
pub fn build_registry_with_store(store: SharedStore) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store)?;
    Ok(registry)
}

/// Run the full module lifecycle around the HTTP server until Ctrl-C
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry()?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_modules(&ctx)
        .await
        .context("module startup failed")?;

    let served = shelf_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
