//! Electoral positions: candidates and their participations
//!
//! A candidate is identified by NIN and created on first participation. Each
//! participation stores its selections together with the canonical position
//! path computed by the [`PositionCatalog`].

use std::collections::HashMap;

use ballot_api::{
    AdminUnitRefs, Page,
    election::{ElectoralPositionCreate, ElectoralPositionQuery, ElectoralPositionUpdate},
};
use ballot_common::{BallotError, page_bounds};
use ballot_persistence::entity::{candidate, candidate_participation, vote};
use ballot_persistence::sea_orm::sea_query::{Alias, Expr};
use ballot_persistence::sea_orm::*;
use ballot_persistence::{RecordStatus, now};
use ballot_position::{PositionCatalog, PositionSelection, ResolvedPosition};
use serde::Serialize;

use crate::service::mutation::Attribution;

/// A participation with its candidate, as listed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationView {
    #[serde(flatten)]
    pub participation: candidate_participation::Model,
    pub candidate: Option<candidate::Model>,
}

pub async fn get_participation<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> anyhow::Result<candidate_participation::Model> {
    candidate_participation::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| BallotError::not_found("candidate participation", id).into())
}

/// Load a participation under a row lock for the rest of the transaction.
pub async fn lock_participation<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> anyhow::Result<candidate_participation::Model> {
    candidate_participation::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| BallotError::not_found("candidate participation", id).into())
}

pub async fn get_view(db: &DatabaseConnection, id: i64) -> anyhow::Result<ParticipationView> {
    let participation = get_participation(db, id).await?;
    let candidate = candidate::Entity::find_by_id(participation.candidate_id)
        .one(db)
        .await?;

    Ok(ParticipationView {
        participation,
        candidate,
    })
}

pub async fn search_page(
    db: &DatabaseConnection,
    query: &ElectoralPositionQuery,
) -> anyhow::Result<Page<ParticipationView>> {
    let (page_no, page_size) = page_bounds(query.page_no, query.page_size);
    let mut select = filter_by_units(candidate_participation::Entity::find(), &query.unit_refs());

    if let Some(election_type) = &query.election_type {
        select = select.filter(candidate_participation::Column::ElectionType.eq(election_type));
    }
    if let Some(level) = &query.level {
        select = select.filter(candidate_participation::Column::Level.eq(level));
    }
    if let Some(position_path) = &query.position_path {
        select = select.filter(candidate_participation::Column::PositionPath.eq(position_path));
    }
    if let Some(year) = query.year {
        select = select.filter(candidate_participation::Column::Year.eq(year));
    }
    if let Some(is_nominated) = query.is_nominated {
        select = select.filter(candidate_participation::Column::IsNominated.eq(is_nominated));
    }

    let total_count = select.clone().count(db).await?;
    if total_count == 0 {
        return Ok(Page::default());
    }

    let participations = select
        .order_by_asc(candidate_participation::Column::PositionPath)
        .order_by_asc(candidate_participation::Column::Id)
        .paginate(db, page_size)
        .fetch_page(page_no - 1)
        .await?;

    let page_items = with_candidates(db, participations).await?;

    Ok(Page::new(total_count, page_no, page_size, page_items))
}

/// Attach each participation's candidate, loaded in one query.
pub async fn with_candidates<C: ConnectionTrait>(
    conn: &C,
    participations: Vec<candidate_participation::Model>,
) -> anyhow::Result<Vec<ParticipationView>> {
    let candidate_ids: Vec<i64> = participations.iter().map(|p| p.candidate_id).collect();
    let candidates: HashMap<i64, candidate::Model> = candidate::Entity::find()
        .filter(candidate::Column::Id.is_in(candidate_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(participations
        .into_iter()
        .map(|participation| ParticipationView {
            candidate: candidates.get(&participation.candidate_id).cloned(),
            participation,
        })
        .collect())
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    catalog: &PositionCatalog,
    payload: &ElectoralPositionCreate,
    attribution: Attribution,
) -> anyhow::Result<candidate_participation::Model> {
    let resolved = resolve_create(catalog, payload)?;

    let candidate = match candidate::Entity::find()
        .filter(candidate::Column::NinNumber.eq(&payload.nin_number))
        .one(conn)
        .await?
    {
        Some(candidate) => candidate,
        None => {
            let timestamp = now();
            candidate::ActiveModel {
                nin_number: Set(payload.nin_number.clone()),
                first_name: Set(payload.first_name.trim().to_string()),
                last_name: Set(payload.last_name.trim().to_string()),
                phone_number: Set(payload.phone_number.clone()),
                gender: Set(payload.gender.clone()),
                election_type: Set(payload.election_type.clone()),
                is_opposition: Set(payload.is_opposition),
                created_at: Set(timestamp),
                updated_at: Set(timestamp),
                ..Default::default()
            }
            .insert(conn)
            .await?
        }
    };

    check_duplicate(conn, candidate.id, &resolved.path, payload.year, None).await?;

    let timestamp = now();
    let units = &payload.units;
    let model = candidate_participation::ActiveModel {
        candidate_id: Set(candidate.id),
        election_type: Set(resolved.election_type.clone()),
        level: Set(resolved.level.clone()),
        position_path: Set(resolved.path.clone()),
        category: Set(resolved.category.clone()),
        subcategory: Set(resolved.subcategory.clone()),
        nested_category: Set(resolved.nested_category.clone()),
        position: Set(resolved.position.clone()),
        year: Set(payload.year),
        status: Set(RecordStatus::Approved),
        is_qualified: Set(payload.is_qualified),
        is_nominated: Set(false),
        nominated_by: Set(None),
        nominated_at: Set(None),
        reason_for_nomination: Set(None),
        nomination_notes: Set(None),
        region_id: Set(units.region_id),
        subregion_id: Set(units.subregion_id),
        district_id: Set(units.district_id),
        constituency_municipality_id: Set(units.constituency_municipality_id),
        subcounty_division_id: Set(units.subcounty_division_id),
        parish_ward_id: Set(units.parish_ward_id),
        village_cell_id: Set(units.village_cell_id),
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

/// Resolve the selections of a create payload without touching the database.
pub fn resolve_create(
    catalog: &PositionCatalog,
    payload: &ElectoralPositionCreate,
) -> anyhow::Result<ResolvedPosition> {
    let selection = PositionSelection {
        category: payload.category.clone(),
        subcategory: payload.subcategory.clone(),
        nested_category: payload.nested_category.clone(),
        position: payload.position.clone(),
    };

    Ok(catalog
        .resolve_complete(&payload.election_type, &payload.level, &selection)
        .map_err(BallotError::from)?)
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    catalog: &PositionCatalog,
    id: i64,
    payload: &ElectoralPositionUpdate,
    actor_id: i64,
) -> anyhow::Result<(candidate_participation::Model, candidate_participation::Model)> {
    let old = get_participation(conn, id).await?;
    let level = payload.level.as_deref().unwrap_or(&old.level);

    let resolved = if payload.touches_position() {
        catalog.resolve_complete(&old.election_type, level, &updated_selection(&old, payload))
    } else {
        catalog.reconcile(&old.position_path, &old.election_type, level, &stored_selection(&old))
    }
    .map_err(BallotError::from)?;

    let year = payload.year.unwrap_or(old.year);
    if resolved.path != old.position_path || year != old.year {
        check_duplicate(conn, old.candidate_id, &resolved.path, year, Some(id)).await?;
    }

    if payload.phone_number.is_some() || payload.gender.is_some() {
        if let Some(candidate) = candidate::Entity::find_by_id(old.candidate_id)
            .one(conn)
            .await?
        {
            let mut active: candidate::ActiveModel = candidate.into();
            if let Some(phone_number) = &payload.phone_number {
                active.phone_number = Set(Some(phone_number.clone()));
            }
            if let Some(gender) = &payload.gender {
                active.gender = Set(Some(gender.clone()));
            }
            active.updated_at = Set(now());
            active.update(conn).await?;
        }
    }

    let units = stored_units(&old).merged(&payload.units);
    let mut active: candidate_participation::ActiveModel = old.clone().into();
    active.level = Set(resolved.level.clone());
    active.position_path = Set(resolved.path.clone());
    active.category = Set(resolved.category.clone());
    active.subcategory = Set(resolved.subcategory.clone());
    active.nested_category = Set(resolved.nested_category.clone());
    active.position = Set(resolved.position.clone());
    active.year = Set(year);
    if let Some(is_qualified) = payload.is_qualified {
        active.is_qualified = Set(is_qualified);
    }
    active.region_id = Set(units.region_id);
    active.subregion_id = Set(units.subregion_id);
    active.district_id = Set(units.district_id);
    active.constituency_municipality_id = Set(units.constituency_municipality_id);
    active.subcounty_division_id = Set(units.subcounty_division_id);
    active.parish_ward_id = Set(units.parish_ward_id);
    active.village_cell_id = Set(units.village_cell_id);
    active.updated_by = Set(Some(actor_id));
    active.updated_at = Set(now());

    let new = active.update(conn).await?;

    Ok((old, new))
}

/// Participations with recorded votes cannot be removed.
pub async fn delete<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> anyhow::Result<candidate_participation::Model> {
    let old = get_participation(conn, id).await?;

    let votes = vote::Entity::find()
        .filter(vote::Column::CandidateParticipationId.eq(id))
        .count(conn)
        .await?;
    if votes > 0 {
        return Err(BallotError::conflict(format!(
            "candidate participation {} has recorded votes",
            id
        ))
        .into());
    }

    candidate_participation::Entity::delete_by_id(id)
        .exec(conn)
        .await?;

    Ok(old)
}

pub fn stored_units(participation: &candidate_participation::Model) -> AdminUnitRefs {
    AdminUnitRefs {
        region_id: participation.region_id,
        subregion_id: participation.subregion_id,
        district_id: participation.district_id,
        constituency_municipality_id: participation.constituency_municipality_id,
        subcounty_division_id: participation.subcounty_division_id,
        parish_ward_id: participation.parish_ward_id,
        village_cell_id: participation.village_cell_id,
    }
}

/// Filter rows carrying the seven unit columns by every id present in `units`.
pub fn filter_by_units<E>(mut select: Select<E>, units: &AdminUnitRefs) -> Select<E>
where
    E: EntityTrait,
{
    let columns = [
        ("region_id", units.region_id),
        ("subregion_id", units.subregion_id),
        ("district_id", units.district_id),
        ("constituency_municipality_id", units.constituency_municipality_id),
        ("subcounty_division_id", units.subcounty_division_id),
        ("parish_ward_id", units.parish_ward_id),
        ("village_cell_id", units.village_cell_id),
    ];

    for (column, id) in columns {
        if let Some(id) = id {
            select = select.filter(Expr::col((E::default(), Alias::new(column))).eq(id));
        }
    }

    select
}

fn stored_selection(participation: &candidate_participation::Model) -> PositionSelection {
    PositionSelection {
        category: participation.category.clone(),
        subcategory: participation.subcategory.clone(),
        nested_category: participation.nested_category.clone(),
        position: Some(participation.position.clone()),
    }
}

/// Selections deeper than the shallowest changed one come from the payload only.
fn updated_selection(
    old: &candidate_participation::Model,
    payload: &ElectoralPositionUpdate,
) -> PositionSelection {
    if let Some(category) = &payload.category {
        PositionSelection {
            category: category.clone(),
            subcategory: payload.subcategory.clone(),
            nested_category: payload.nested_category.clone(),
            position: payload.position.clone(),
        }
    } else if payload.subcategory.is_some() {
        PositionSelection {
            category: old.category.clone(),
            subcategory: payload.subcategory.clone(),
            nested_category: payload.nested_category.clone(),
            position: payload.position.clone(),
        }
    } else if payload.nested_category.is_some() {
        PositionSelection {
            category: old.category.clone(),
            subcategory: old.subcategory.clone(),
            nested_category: payload.nested_category.clone(),
            position: payload.position.clone(),
        }
    } else {
        PositionSelection {
            position: payload.position.clone().or_else(|| Some(old.position.clone())),
            ..stored_selection(old)
        }
    }
}

async fn check_duplicate<C: ConnectionTrait>(
    conn: &C,
    candidate_id: i64,
    position_path: &str,
    year: i32,
    exclude_id: Option<i64>,
) -> anyhow::Result<()> {
    let mut select = candidate_participation::Entity::find()
        .filter(candidate_participation::Column::CandidateId.eq(candidate_id))
        .filter(candidate_participation::Column::PositionPath.eq(position_path))
        .filter(candidate_participation::Column::Year.eq(year));
    if let Some(exclude_id) = exclude_id {
        select = select.filter(candidate_participation::Column::Id.ne(exclude_id));
    }

    if select.count(conn).await? > 0 {
        return Err(BallotError::conflict(format!(
            "candidate already participates for '{}' in {}",
            position_path, year
        ))
        .into());
    }

    Ok(())
}
