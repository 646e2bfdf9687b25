//! Administrative unit store, shared by all seven levels

use ballot_api::{
    Page,
    unit::{AdminUnitCreate, AdminUnitQuery, AdminUnitUpdate},
};
use ballot_auth::Actor;
use ballot_common::{BallotError, non_blank, page_bounds};
use ballot_persistence::entity::{administrative_unit, registrar};
use ballot_persistence::sea_orm::*;
use ballot_persistence::{AdminLevel, RecordStatus, now, snapshot};

use crate::service::audit::{self, ACTION_APPROVE, AuditEntry};
use crate::service::mutation::Attribution;

pub async fn find<C: ConnectionTrait>(
    conn: &C,
    level: AdminLevel,
    id: i64,
) -> anyhow::Result<Option<administrative_unit::Model>> {
    Ok(administrative_unit::Entity::find_by_id(id)
        .filter(administrative_unit::Column::Level.eq(level))
        .one(conn)
        .await?)
}

pub async fn get<C: ConnectionTrait>(
    conn: &C,
    level: AdminLevel,
    id: i64,
) -> anyhow::Result<administrative_unit::Model> {
    find(conn, level, id)
        .await?
        .ok_or_else(|| BallotError::not_found(level.label(), id).into())
}

pub async fn search_page(
    db: &DatabaseConnection,
    level: AdminLevel,
    query: &AdminUnitQuery,
) -> anyhow::Result<Page<administrative_unit::Model>> {
    let (page_no, page_size) = page_bounds(query.page_no, query.page_size);
    let mut select =
        administrative_unit::Entity::find().filter(administrative_unit::Column::Level.eq(level));

    if let Some(parent_id) = query.parent_id {
        select = select.filter(administrative_unit::Column::ParentId.eq(parent_id));
    }
    if let Some(status) = query.status {
        select = select.filter(administrative_unit::Column::Status.eq(status));
    }
    if let Some(name) = non_blank(query.name.as_deref()) {
        select = select.filter(administrative_unit::Column::Name.contains(&name));
    }

    let total_count = select.clone().count(db).await?;
    if total_count == 0 {
        return Ok(Page::default());
    }

    let page_items = select
        .order_by_asc(administrative_unit::Column::Name)
        .order_by_asc(administrative_unit::Column::Id)
        .paginate(db, page_size)
        .fetch_page(page_no - 1)
        .await?;

    Ok(Page::new(total_count, page_no, page_size, page_items))
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    level: AdminLevel,
    payload: &AdminUnitCreate,
    attribution: Attribution,
) -> anyhow::Result<administrative_unit::Model> {
    check_parent(conn, level, payload.parent_id).await?;
    check_unique_name(conn, level, payload.parent_id, &payload.name, None).await?;

    let status = if attribution.via_approval {
        RecordStatus::Approved
    } else {
        payload.status.unwrap_or(RecordStatus::Approved)
    };
    let timestamp = now();

    let model = administrative_unit::ActiveModel {
        level: Set(level),
        name: Set(payload.name.trim().to_string()),
        code: Set(non_blank(payload.code.as_deref())),
        parent_id: Set(payload.parent_id),
        status: Set(status),
        created_by: Set(Some(attribution.requested_by)),
        updated_by: Set(None),
        approved_by: Set((status == RecordStatus::Approved).then_some(attribution.approved_by)),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(model)
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    level: AdminLevel,
    id: i64,
    payload: &AdminUnitUpdate,
    actor_id: i64,
) -> anyhow::Result<(administrative_unit::Model, administrative_unit::Model)> {
    let old = get(conn, level, id).await?;

    let parent_id = payload.parent_id.or(old.parent_id);
    if payload.parent_id.is_some() {
        check_parent(conn, level, parent_id).await?;
    }

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or(&old.name)
        .to_string();
    if name != old.name || parent_id != old.parent_id {
        check_unique_name(conn, level, parent_id, &name, Some(id)).await?;
    }

    let mut active: administrative_unit::ActiveModel = old.clone().into();
    active.name = Set(name);
    if payload.code.is_some() {
        active.code = Set(non_blank(payload.code.as_deref()));
    }
    active.parent_id = Set(parent_id);
    active.updated_by = Set(Some(actor_id));
    active.updated_at = Set(now());

    let new = active.update(conn).await?;

    Ok((old, new))
}

/// Units with child units or registrars cannot be removed.
pub async fn delete<C: ConnectionTrait>(
    conn: &C,
    level: AdminLevel,
    id: i64,
) -> anyhow::Result<administrative_unit::Model> {
    let old = get(conn, level, id).await?;

    let children = administrative_unit::Entity::find()
        .filter(administrative_unit::Column::ParentId.eq(id))
        .count(conn)
        .await?;
    if children > 0 {
        return Err(BallotError::conflict(format!(
            "{} '{}' still has {} child units",
            level.label(),
            old.name,
            children
        ))
        .into());
    }

    let registrars = registrar::Entity::find()
        .filter(registrar::Column::AdministrativeUnitId.eq(id))
        .count(conn)
        .await?;
    if registrars > 0 {
        return Err(BallotError::conflict(format!(
            "{} '{}' still has {} registrars",
            level.label(),
            old.name,
            registrars
        ))
        .into());
    }

    administrative_unit::Entity::delete_by_id(id).exec(conn).await?;

    Ok(old)
}

/// Mark a pending unit approved; only SuperAdmin reaches this.
pub async fn approve(
    db: &DatabaseConnection,
    level: AdminLevel,
    id: i64,
    actor: &Actor,
) -> anyhow::Result<administrative_unit::Model> {
    let txn = db.begin().await?;
    let old = get(&txn, level, id).await?;

    if old.status == RecordStatus::Approved {
        return Err(BallotError::conflict(format!(
            "{} '{}' is already approved",
            level.label(),
            old.name
        ))
        .into());
    }

    let mut active: administrative_unit::ActiveModel = old.clone().into();
    active.status = Set(RecordStatus::Approved);
    active.approved_by = Set(Some(actor.user_id));
    active.updated_at = Set(now());
    let new = active.update(&txn).await?;

    audit::record(
        &txn,
        AuditEntry {
            action_type: ACTION_APPROVE,
            entity_type: level.resource(),
            entity_id: id,
            old_data: Some(snapshot(&old)?),
            new_data: Some(snapshot(&new)?),
            data: "{}".to_string(),
            action_by: actor.user_id,
            pending_action_id: None,
        },
    )
    .await?;

    txn.commit().await?;

    Ok(new)
}

async fn check_parent<C: ConnectionTrait>(
    conn: &C,
    level: AdminLevel,
    parent_id: Option<i64>,
) -> anyhow::Result<()> {
    match (level.parent(), parent_id) {
        (None, None) => Ok(()),
        (None, Some(_)) => {
            Err(BallotError::validation(format!("a {} has no parent unit", level.label())).into())
        }
        (Some(parent_level), None) => Err(BallotError::validation(format!(
            "parentId of a {} must reference a {}",
            level.label(),
            parent_level.label()
        ))
        .into()),
        (Some(parent_level), Some(parent_id)) => {
            if find(conn, parent_level, parent_id).await?.is_none() {
                return Err(BallotError::validation(format!(
                    "parentId {} is not a {}",
                    parent_id,
                    parent_level.label()
                ))
                .into());
            }

            Ok(())
        }
    }
}

async fn check_unique_name<C: ConnectionTrait>(
    conn: &C,
    level: AdminLevel,
    parent_id: Option<i64>,
    name: &str,
    exclude_id: Option<i64>,
) -> anyhow::Result<()> {
    let mut select = administrative_unit::Entity::find()
        .filter(administrative_unit::Column::Level.eq(level))
        .filter(administrative_unit::Column::Name.eq(name.trim()));

    select = match parent_id {
        Some(parent_id) => select.filter(administrative_unit::Column::ParentId.eq(parent_id)),
        None => select.filter(administrative_unit::Column::ParentId.is_null()),
    };
    if let Some(exclude_id) = exclude_id {
        select = select.filter(administrative_unit::Column::Id.ne(exclude_id));
    }

    if select.count(conn).await? > 0 {
        return Err(BallotError::conflict(format!(
            "a {} named '{}' already exists under this parent",
            level.label(),
            name.trim()
        ))
        .into());
    }

    Ok(())
}
