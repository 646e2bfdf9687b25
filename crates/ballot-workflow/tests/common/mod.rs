// Shared fixtures for workflow integration tests

#![allow(dead_code)]

use ballot_auth::Actor;
use ballot_migration::{Migrator, MigratorTrait};
use ballot_persistence::Role;
use ballot_persistence::sea_orm::{ConnectOptions, Database, DatabaseConnection};
use ballot_position::PositionCatalog;

pub const SUPER_ADMIN_ID: i64 = 1;
pub const COORDINATOR_ID: i64 = 2;
pub const REGISTRA_ID: i64 = 3;
pub const ACCOUNTANT_ID: i64 = 4;
pub const PEO_ID: i64 = 5;

pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn actor(user_id: i64, role: Role) -> Actor {
    Actor {
        user_id,
        role,
        name: format!("{} {}", role, user_id),
    }
}

pub fn super_admin() -> Actor {
    actor(SUPER_ADMIN_ID, Role::SuperAdmin)
}

pub fn coordinator() -> Actor {
    actor(COORDINATOR_ID, Role::RegionalCoordinator)
}

pub fn registra() -> Actor {
    actor(REGISTRA_ID, Role::DistrictRegistra)
}

pub fn accountant() -> Actor {
    actor(ACCOUNTANT_ID, Role::Accountant)
}

pub fn peo() -> Actor {
    actor(PEO_ID, Role::Peo)
}

pub fn catalog() -> PositionCatalog {
    PositionCatalog::from_json_str(
        r#"{
            "PRIMARIES": {
                "DISTRICT": {"LCV": null, "WOMEN_MP": null},
                "VILLAGE_CELL": {
                    "CATEGORY_X": null,
                    "SIG_COMMITTEE": {
                        "YOUTH": {"CHAIRPERSON": null, "SECRETARY": null},
                        "ELDERLY": null
                    }
                }
            }
        }"#,
    )
    .unwrap()
}
