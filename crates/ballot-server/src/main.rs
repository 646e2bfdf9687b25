//! Main entry point for the Ballot election administration server.

use std::sync::Arc;

use ballot_auth::service::user;
use ballot_migration::{Migrator, MigratorTrait};
use ballot_position::PositionCatalog;
use ballot_server::{
    error, metrics,
    model::{AppState, Configuration},
    startup,
};
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration and logging
    let configuration = Configuration::new()?;
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    let prometheus = match metrics::install_prometheus() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder not installed: {}", e);
            None
        }
    };
    metrics::init_metrics();

    if configuration.token_secret_key().trim().is_empty() {
        anyhow::bail!(
            "{} must be set to a base64 encoded secret",
            ballot_auth::TOKEN_SECRET_KEY
        );
    }

    let database_connection = configuration.database_connection().await?;
    Migrator::up(&database_connection, None).await?;
    info!("Database schema is up to date");

    match configuration.bootstrap_admin() {
        Some(admin) => {
            user::ensure_bootstrap_admin(
                &database_connection,
                &admin.email,
                &admin.password,
                configuration.password_hash_cost(),
            )
            .await?;
        }
        None => info!("No bootstrap SuperAdmin configured"),
    }

    let position_files = configuration.positions_config_files();
    let catalog = PositionCatalog::from_files(&position_files)?;
    info!(
        files = position_files.len(),
        election_types = catalog.election_types().count(),
        "Position catalog loaded"
    );

    error::set_expose_detail(!configuration.is_production());

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();
    let context_path = configuration.context_path();

    let app_state = Arc::new(AppState {
        configuration,
        database_connection,
        catalog: Arc::new(catalog),
        prometheus,
    });

    info!(
        "Ballot server listening on {}:{}{}",
        server_address, server_port, context_path
    );

    startup::main_server(app_state, context_path, server_address, server_port)?.await?;

    info!("Ballot server stopped");

    Ok(())
}
