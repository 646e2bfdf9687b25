//! Nomination fees per position subtree, with an amount history

use ballot_api::election::{FeeCreate, FeeQuery, FeeUpdate};
use ballot_auth::Actor;
use ballot_common::{BallotError, POSITION_PATH_SEPARATOR};
use ballot_persistence::entity::{fee, fee_history};
use ballot_persistence::sea_orm::*;
use ballot_persistence::{now, snapshot, unique_violation};
use ballot_position::PositionCatalog;

use crate::service::audit::{self, AuditEntry};

pub const ENTITY_TYPE: &str = "fees";

pub async fn search(db: &DatabaseConnection, query: &FeeQuery) -> anyhow::Result<Vec<fee::Model>> {
    let mut select = fee::Entity::find();

    if let Some(election_type) = &query.election_type {
        select = select.filter(fee::Column::ElectionType.eq(election_type));
    }
    if let Some(level) = &query.level {
        select = select.filter(fee::Column::Level.eq(level));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(fee::Column::IsActive.eq(is_active));
    }

    Ok(select
        .order_by_asc(fee::Column::PositionPath)
        .all(db)
        .await?)
}

pub async fn get<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<fee::Model> {
    fee::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| BallotError::not_found("fee", id).into())
}

/// Position path a fee applies to: a whole level, a category subtree or a
/// single position. Selections after a terminal are ignored, so a fee can be
/// described with the same fields its participations store.
pub fn fee_path(catalog: &PositionCatalog, payload: &FeeCreate) -> anyhow::Result<String> {
    let selections = [
        payload.category.as_deref(),
        payload.subcategory.as_deref(),
        payload.position.as_deref(),
    ];
    let filled = selections.iter().take_while(|key| key.is_some()).count();
    let keys: Vec<&str> = selections[..filled].iter().flatten().copied().collect();

    let subtree = catalog
        .prefix_path(&payload.election_type, &payload.level, &keys)
        .map_err(BallotError::from)?;

    if !subtree.terminal && selections[filled..].iter().any(Option::is_some) {
        return Err(BallotError::validation(
            "fee selections must be filled from category downwards",
        )
        .into());
    }

    Ok(subtree.path)
}

pub async fn create(
    db: &DatabaseConnection,
    catalog: &PositionCatalog,
    payload: &FeeCreate,
    actor: &Actor,
) -> anyhow::Result<fee::Model> {
    let position_path = fee_path(catalog, payload)?;

    let txn = db.begin().await?;

    if fee::Entity::find()
        .filter(fee::Column::PositionPath.eq(&position_path))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(BallotError::conflict(format!(
            "a fee for '{}' already exists",
            position_path
        ))
        .into());
    }

    let timestamp = now();
    let model = fee::ActiveModel {
        election_type: Set(payload.election_type.clone()),
        level: Set(payload.level.clone()),
        category: Set(payload.category.clone()),
        subcategory: Set(payload.subcategory.clone()),
        position: Set(payload.position.clone()),
        position_path: Set(position_path.clone()),
        amount: Set(payload.amount),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_by: Set(Some(actor.user_id)),
        updated_by: Set(None),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        if unique_violation(&e) {
            anyhow::Error::from(BallotError::conflict(format!(
                "a fee for '{}' already exists",
                position_path
            )))
        } else {
            e.into()
        }
    })?;

    audit::record(
        &txn,
        AuditEntry {
            action_type: "CREATE",
            entity_type: ENTITY_TYPE,
            entity_id: model.id,
            old_data: None,
            new_data: Some(snapshot(&model)?),
            data: snapshot(payload)?,
            action_by: actor.user_id,
            pending_action_id: None,
        },
    )
    .await?;

    txn.commit().await?;

    Ok(model)
}

/// Change a fee; an amount change appends a history row in the same transaction.
pub async fn update(
    db: &DatabaseConnection,
    id: i64,
    payload: &FeeUpdate,
    actor: &Actor,
) -> anyhow::Result<fee::Model> {
    let txn = db.begin().await?;
    let old = get(&txn, id).await?;

    let mut active: fee::ActiveModel = old.clone().into();
    if let Some(amount) = payload.amount {
        active.amount = Set(amount);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_by = Set(Some(actor.user_id));
    active.updated_at = Set(now());
    let new = active.update(&txn).await?;

    if new.amount != old.amount {
        fee_history::ActiveModel {
            fee_id: Set(id),
            previous_amount: Set(old.amount),
            new_amount: Set(new.amount),
            changed_by: Set(actor.user_id),
            reason: Set(payload.reason.clone()),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    audit::record(
        &txn,
        AuditEntry {
            action_type: "UPDATE",
            entity_type: ENTITY_TYPE,
            entity_id: id,
            old_data: Some(snapshot(&old)?),
            new_data: Some(snapshot(&new)?),
            data: snapshot(payload)?,
            action_by: actor.user_id,
            pending_action_id: None,
        },
    )
    .await?;

    txn.commit().await?;

    Ok(new)
}

/// Amount changes of a fee, newest first.
pub async fn history(
    db: &DatabaseConnection,
    fee_id: i64,
) -> anyhow::Result<Vec<fee_history::Model>> {
    get(db, fee_id).await?;

    Ok(fee_history::Entity::find()
        .filter(fee_history::Column::FeeId.eq(fee_id))
        .order_by_desc(fee_history::Column::Id)
        .all(db)
        .await?)
}

/// The active fee with the longest path covering `position_path`.
pub async fn lookup_for_path<C: ConnectionTrait>(
    conn: &C,
    position_path: &str,
) -> anyhow::Result<Option<fee::Model>> {
    let mut segments = position_path.split(POSITION_PATH_SEPARATOR);
    let (Some(election_type), Some(level)) = (segments.next(), segments.next()) else {
        return Ok(None);
    };

    let candidates = fee::Entity::find()
        .filter(fee::Column::ElectionType.eq(election_type))
        .filter(fee::Column::Level.eq(level))
        .filter(fee::Column::IsActive.eq(true))
        .all(conn)
        .await?;

    Ok(candidates
        .into_iter()
        .filter(|fee| covers(&fee.position_path, position_path))
        .max_by_key(|fee| fee.position_path.len()))
}

fn covers(fee_path: &str, position_path: &str) -> bool {
    position_path == fee_path
        || position_path
            .strip_prefix(fee_path)
            .is_some_and(|rest| rest.starts_with(POSITION_PATH_SEPARATOR))
}
