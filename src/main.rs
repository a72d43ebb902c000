use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::{ConfigLoader, ServiceSettings};
use payroll_engine::render::{DocumentStore, TextRenderer};
use payroll_engine::service::PayrollService;
use payroll_engine::store::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payroll_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ServiceSettings::from_env()?;
    let db = Database::new(DbConfig::new(&settings.database_path)).await?;

    let service = PayrollService::new(
        db.clone(),
        Arc::new(TextRenderer::new()),
        DocumentStore::new(&settings.documents_dir),
    );

    match service.current_configuration().await? {
        Some(configuration) => info!(
            configuration_id = configuration.id,
            name = %configuration.rules.name,
            "Using effective configuration"
        ),
        None => {
            warn!(path = %settings.rules_path.display(), "No effective configuration; activating rule set");
            let loader = ConfigLoader::load(&settings.rules_path)?;
            let configuration = service.activate_configuration(loader.rules()).await?;
            info!(
                configuration_id = configuration.id,
                name = %configuration.rules.name,
                "Rule set activated"
            );
        }
    }

    let app = create_router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(settings.http_addr).await?;
    info!(addr = %settings.http_addr, "Payroll engine listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "Could not install Ctrl-C handler");
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await?;

    db.close().await;
    Ok(())
}
