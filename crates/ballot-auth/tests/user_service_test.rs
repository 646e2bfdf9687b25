// Integration tests for the user service against an in-memory database

use ballot_api::auth::CreateUserRequest;
use ballot_auth::service::user;
use ballot_common::BallotError;
use ballot_migration::{Migrator, MigratorTrait};
use ballot_persistence::Role;
use ballot_persistence::sea_orm::{ConnectOptions, Database, DatabaseConnection};

const TEST_HASH_COST: u32 = 4;

async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn request(email: &str, role: Role) -> CreateUserRequest {
    CreateUserRequest {
        first_name: "Apio".to_string(),
        last_name: "Sarah".to_string(),
        email: email.to_string(),
        password: "passw0rd!".to_string(),
        role,
    }
}

#[tokio::test]
async fn test_create_and_authenticate() {
    let db = setup().await;

    let created = user::create(&db, &request("Apio@Example.org", Role::Accountant), TEST_HASH_COST)
        .await
        .unwrap();
    assert_eq!(created.email, "apio@example.org");
    assert_ne!(created.password, "passw0rd!");

    let user = user::authenticate(&db, "apio@example.org", "passw0rd!")
        .await
        .unwrap();
    assert_eq!(user.id, created.id);
    assert_eq!(user.role, Role::Accountant);
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let db = setup().await;
    user::create(&db, &request("peo@example.org", Role::Peo), TEST_HASH_COST)
        .await
        .unwrap();

    let err = user::authenticate(&db, "peo@example.org", "wrong-pass1")
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<BallotError>(),
        Some(&BallotError::InvalidCredentials)
    );

    let err = user::authenticate(&db, "nobody@example.org", "passw0rd!")
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<BallotError>(),
        Some(&BallotError::InvalidCredentials)
    );
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let db = setup().await;
    user::create(&db, &request("dr@example.org", Role::DistrictRegistra), TEST_HASH_COST)
        .await
        .unwrap();

    let err = user::create(&db, &request("DR@example.org", Role::Peo), TEST_HASH_COST)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BallotError>(),
        Some(BallotError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_bootstrap_admin_only_once() {
    let db = setup().await;

    let admin = user::ensure_bootstrap_admin(&db, "admin@example.org", "adm1nadmin", TEST_HASH_COST)
        .await
        .unwrap();
    assert_eq!(admin.map(|a| a.role), Some(Role::SuperAdmin));

    let again = user::ensure_bootstrap_admin(&db, "other@example.org", "adm1nadmin", TEST_HASH_COST)
        .await
        .unwrap();
    assert!(again.is_none());

    let page = user::search_page(&db, None, 1, 10).await.unwrap();
    assert_eq!(page.total_count, 1);

    let page = user::search_page(&db, Some(Role::Peo), 1, 10).await.unwrap();
    assert_eq!(page.total_count, 0);
}
