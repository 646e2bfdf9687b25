// Shared fixtures for HTTP API tests

#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use base64::Engine;
use metrics_exporter_prometheus::PrometheusBuilder;

use ballot_api::auth::CreateUserRequest;
use ballot_auth::{TOKEN_SECRET_KEY, service::auth, service::user};
use ballot_migration::{Migrator, MigratorTrait};
use ballot_persistence::Role;
use ballot_persistence::entity::users;
use ballot_persistence::sea_orm::{ConnectOptions, Database};
use ballot_position::PositionCatalog;
use ballot_server::model::{AppState, Configuration};

pub const PASSWORD: &str = "Password-2026";

// bcrypt's minimum cost keeps the suite fast
const TEST_HASH_COST: u32 = 4;

pub static SECRET: LazyLock<String> = LazyLock::new(|| {
    base64::engine::general_purpose::STANDARD.encode(b"ballot-http-test-secret-key-0123456789")
});

/// Build the application the way `main_server` does, minus the HTTP listener.
#[macro_export]
macro_rules! init_app {
    ($state: expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(ballot_server::middleware::auth::Authentication)
                .app_data(actix_web::web::Data::from($state.clone()))
                .service(ballot_server::api::metrics::render)
                .service(ballot_server::api::route::routes("/api")),
        )
        .await
    };
}

pub fn catalog() -> PositionCatalog {
    PositionCatalog::from_json_str(
        r#"{
            "PRIMARIES": {
                "DISTRICT": {"LCV": null, "WOMEN_MP": null},
                "VILLAGE_CELL": {
                    "CATEGORY_X": null,
                    "SIG_COMMITTEE": {
                        "YOUTH": {"CHAIRPERSON": null, "SECRETARY": null}
                    }
                }
            }
        }"#,
    )
    .unwrap()
}

pub async fn setup() -> Arc<AppState> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let database_connection = Database::connect(options).await.unwrap();
    Migrator::up(&database_connection, None).await.unwrap();

    let config = config::Config::builder()
        .set_override(TOKEN_SECRET_KEY, SECRET.as_str())
        .unwrap()
        .build()
        .unwrap();

    Arc::new(AppState {
        configuration: Configuration::from_config(config).unwrap(),
        database_connection,
        catalog: Arc::new(catalog()),
        prometheus: Some(PrometheusBuilder::new().build_recorder().handle()),
    })
}

pub async fn create_user(state: &AppState, email: &str, role: Role) -> users::Model {
    let request = CreateUserRequest {
        first_name: "Test".to_string(),
        last_name: role.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        role,
    };

    user::create(state.db(), &request, TEST_HASH_COST).await.unwrap()
}

pub fn token_for(user: &users::Model) -> String {
    auth::encode_jwt_token(user.id, &SECRET, 3600).unwrap()
}

pub fn expired_token_for(user: &users::Model) -> String {
    auth::encode_jwt_token(user.id, &SECRET, -60).unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Users for every role that can act on the system, with their tokens.
pub struct Staff {
    pub admin: String,
    pub coordinator: String,
    pub registra: String,
    pub accountant: String,
    pub peo: String,
}

pub async fn staff(state: &AppState) -> Staff {
    let admin = create_user(state, "admin@ballot.test", Role::SuperAdmin).await;
    let coordinator =
        create_user(state, "coordinator@ballot.test", Role::RegionalCoordinator).await;
    let registra = create_user(state, "registra@ballot.test", Role::DistrictRegistra).await;
    let accountant = create_user(state, "accountant@ballot.test", Role::Accountant).await;
    let peo = create_user(state, "peo@ballot.test", Role::Peo).await;

    Staff {
        admin: token_for(&admin),
        coordinator: token_for(&coordinator),
        registra: token_for(&registra),
        accountant: token_for(&accountant),
        peo: token_for(&peo),
    }
}
