//! User service

use ballot_api::Page;
use ballot_api::auth::CreateUserRequest;
use ballot_common::BallotError;
use ballot_persistence::entity::users;
use ballot_persistence::sea_orm::*;
use ballot_persistence::{Role, now, unique_violation};
use tracing::info;

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> anyhow::Result<Option<users::Model>> {
    Ok(users::Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> anyhow::Result<Option<users::Model>> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email.trim().to_lowercase()))
        .one(conn)
        .await?;

    Ok(user)
}

/// Check an email and password pair, returning the active user
pub async fn authenticate<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    password: &str,
) -> anyhow::Result<users::Model> {
    let user = find_by_email(conn, email)
        .await?
        .filter(|user| user.is_active)
        .ok_or(BallotError::InvalidCredentials)?;

    if !bcrypt::verify(password, &user.password)? {
        return Err(BallotError::InvalidCredentials.into());
    }

    Ok(user)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    request: &CreateUserRequest,
    hash_cost: u32,
) -> anyhow::Result<users::Model> {
    let email = request.email.trim().to_lowercase();

    if find_by_email(conn, &email).await?.is_some() {
        return Err(BallotError::conflict(format!("user '{}' already exists", email)).into());
    }

    let timestamp = now();
    let entity = users::ActiveModel {
        first_name: Set(request.first_name.trim().to_string()),
        last_name: Set(request.last_name.trim().to_string()),
        email: Set(email.clone()),
        password: Set(bcrypt::hash(&request.password, hash_cost)?),
        role: Set(request.role),
        is_active: Set(true),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
        ..Default::default()
    };

    match entity.insert(conn).await {
        Ok(user) => Ok(user),
        Err(err) if unique_violation(&err) => {
            Err(BallotError::conflict(format!("user '{}' already exists", email)).into())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn search_page(
    db: &DatabaseConnection,
    role: Option<Role>,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<users::Model>> {
    let mut query = users::Entity::find().order_by_asc(users::Column::Id);
    if let Some(role) = role {
        query = query.filter(users::Column::Role.eq(role));
    }

    let paginator = query.paginate(db, page_size);
    let total_count = paginator.num_items().await?;
    let page_items = paginator.fetch_page(page_no.saturating_sub(1)).await?;

    Ok(Page::new(total_count, page_no, page_size, page_items))
}

/// Create the first SuperAdmin when no user exists yet
pub async fn ensure_bootstrap_admin(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    hash_cost: u32,
) -> anyhow::Result<Option<users::Model>> {
    if users::Entity::find().count(db).await? > 0 {
        return Ok(None);
    }

    let request = CreateUserRequest {
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: Role::SuperAdmin,
    };
    let admin = create(db, &request, hash_cost).await?;
    info!(email = %admin.email, "Created bootstrap SuperAdmin account");

    Ok(Some(admin))
}
