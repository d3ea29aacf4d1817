use afiliados_dashboard::core::ConfigProvider;
use afiliados_dashboard::utils::{logger, validation::Validate};
use afiliados_dashboard::{
    web, CliConfig, DashboardController, DashboardPipeline, DataStore, LoadEngine, LocalStorage,
};
use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.log_format);
    tracing::info!("Starting afiliados-dashboard");

    let settings = match cli.resolve().and_then(|settings| {
        settings.validate()?;
        Ok(settings)
    }) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    if cli.monitor {
        tracing::info!("🔍 Process monitoring enabled");
    }

    let addr: SocketAddr = settings
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", settings.bind_address()))?;

    // The load runs in the background; the page shows a loading state until it lands.
    let storage = LocalStorage::new(settings.data_dir.clone());
    let pipeline = DashboardPipeline::new(storage, settings);
    let store = Arc::new(DataStore::new());
    store.spawn_load(LoadEngine::new_with_monitoring(pipeline, cli.monitor));

    let app = web::build_router(DashboardController::new(store));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "dashboard listening");
    axum::serve(listener, app).await?;

    Ok(())
}
