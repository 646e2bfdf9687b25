//! Application state shared across all handlers

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use ballot_persistence::sea_orm::DatabaseConnection;
use ballot_position::PositionCatalog;

use super::config::Configuration;

#[derive(Clone)]
pub struct AppState {
    pub configuration: Configuration,
    pub database_connection: DatabaseConnection,
    /// Immutable position trees, loaded once at startup
    pub catalog: Arc<PositionCatalog>,
    /// Renders `/metrics`; absent when no recorder was installed
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn db(&self) -> &DatabaseConnection {
        &self.database_connection
    }

    pub fn catalog(&self) -> &PositionCatalog {
        &self.catalog
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("catalog", &self.catalog.election_types().collect::<Vec<_>>())
            .field("prometheus", &self.prometheus.is_some())
            .finish()
    }
}
