//! Registrar store; every registrar belongs to one administrative unit

use ballot_api::unit::{RegistrarCreate, RegistrarUpdate};
use ballot_common::{BallotError, non_blank};
use ballot_persistence::entity::registrar;
use ballot_persistence::sea_orm::*;
use ballot_persistence::{RecordStatus, now};

use crate::service::admin_unit;
use crate::service::mutation::{Attribution, UnitScope};

pub async fn list(
    db: &DatabaseConnection,
    scope: UnitScope,
) -> anyhow::Result<Vec<registrar::Model>> {
    let unit = admin_unit::get(db, scope.level, scope.unit_id).await?;

    Ok(registrar::Entity::find()
        .filter(registrar::Column::AdministrativeUnitId.eq(unit.id))
        .order_by_asc(registrar::Column::LastName)
        .order_by_asc(registrar::Column::FirstName)
        .all(db)
        .await?)
}

/// A registrar of the scoped unit; registrars of other units are not found,
/// and neither is a unit of another level.
pub async fn get<C: ConnectionTrait>(
    conn: &C,
    scope: UnitScope,
    id: i64,
) -> anyhow::Result<registrar::Model> {
    let unit = admin_unit::get(conn, scope.level, scope.unit_id).await?;

    registrar::Entity::find_by_id(id)
        .filter(registrar::Column::AdministrativeUnitId.eq(unit.id))
        .one(conn)
        .await?
        .ok_or_else(|| BallotError::not_found("registrar", id).into())
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    scope: UnitScope,
    payload: &RegistrarCreate,
    attribution: Attribution,
) -> anyhow::Result<registrar::Model> {
    let unit_id = admin_unit::get(conn, scope.level, scope.unit_id).await?.id;

    check_unique_nin(conn, unit_id, &payload.nin_number, None).await?;

    let timestamp = now();
    let model = registrar::ActiveModel {
        administrative_unit_id: Set(unit_id),
        first_name: Set(payload.first_name.trim().to_string()),
        last_name: Set(payload.last_name.trim().to_string()),
        nin_number: Set(payload.nin_number.clone()),
        phone_number: Set(payload.phone_number.clone()),
        email: Set(non_blank(payload.email.as_deref())),
        status: Set(RecordStatus::Approved),
        created_by: Set(Some(attribution.requested_by)),
        updated_by: Set(None),
        approved_by: Set(Some(attribution.approved_by)),
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
    scope: UnitScope,
    id: i64,
    payload: &RegistrarUpdate,
    actor_id: i64,
) -> anyhow::Result<(registrar::Model, registrar::Model)> {
    let old = get(conn, scope, id).await?;

    if let Some(nin_number) = payload.nin_number.as_deref()
        && nin_number != old.nin_number
    {
        check_unique_nin(conn, old.administrative_unit_id, nin_number, Some(id)).await?;
    }

    let mut active: registrar::ActiveModel = old.clone().into();
    if let Some(first_name) = &payload.first_name {
        active.first_name = Set(first_name.trim().to_string());
    }
    if let Some(last_name) = &payload.last_name {
        active.last_name = Set(last_name.trim().to_string());
    }
    if let Some(nin_number) = &payload.nin_number {
        active.nin_number = Set(nin_number.clone());
    }
    if let Some(phone_number) = &payload.phone_number {
        active.phone_number = Set(phone_number.clone());
    }
    if payload.email.is_some() {
        active.email = Set(non_blank(payload.email.as_deref()));
    }
    active.updated_by = Set(Some(actor_id));
    active.updated_at = Set(now());

    let new = active.update(conn).await?;

    Ok((old, new))
}

pub async fn delete<C: ConnectionTrait>(
    conn: &C,
    scope: UnitScope,
    id: i64,
) -> anyhow::Result<registrar::Model> {
    let old = get(conn, scope, id).await?;

    registrar::Entity::delete_by_id(id).exec(conn).await?;

    Ok(old)
}

async fn check_unique_nin<C: ConnectionTrait>(
    conn: &C,
    unit_id: i64,
    nin_number: &str,
    exclude_id: Option<i64>,
) -> anyhow::Result<()> {
    let mut select = registrar::Entity::find()
        .filter(registrar::Column::AdministrativeUnitId.eq(unit_id))
        .filter(registrar::Column::NinNumber.eq(nin_number));
    if let Some(exclude_id) = exclude_id {
        select = select.filter(registrar::Column::Id.ne(exclude_id));
    }

    if select.count(conn).await? > 0 {
        return Err(BallotError::conflict(format!(
            "registrar with NIN '{}' is already registered for this unit",
            nin_number
        ))
        .into());
    }

    Ok(())
}
