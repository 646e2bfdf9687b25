//! Vote recording and tallies

use std::collections::HashMap;

use ballot_api::election::{RecordVotesRequest, VoteSummaryQuery};
use ballot_auth::Actor;
use ballot_common::BallotError;
use ballot_persistence::entity::{candidate_participation, vote};
use ballot_persistence::sea_orm::*;
use ballot_persistence::{now, snapshot};
use serde::Serialize;

use crate::service::audit::{self, ACTION_RECORD_VOTES, AuditEntry};
use crate::service::candidate::{self as candidate_store, ParticipationView};

const ENTITY_TYPE: &str = "votes";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedVotes {
    pub vote: vote::Model,
    /// False when an existing row was updated
    pub created: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    #[serde(flatten)]
    pub view: ParticipationView,
    pub total_votes: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationVotes {
    #[serde(flatten)]
    pub view: ParticipationView,
    pub total_votes: i64,
    pub records: Vec<vote::Model>,
}

/// Record the vote count of a nominated participation.
///
/// The first vote row of the participation is updated in place; a row is only
/// inserted when none exists yet, so repeating a submission leaves one row.
pub async fn record(
    db: &DatabaseConnection,
    request: &RecordVotesRequest,
    actor: &Actor,
) -> anyhow::Result<RecordedVotes> {
    let txn = db.begin().await?;
    let participation =
        candidate_store::lock_participation(&txn, request.candidate_participation_id).await?;

    if !participation.is_nominated {
        return Err(BallotError::NotNominated(participation.id).into());
    }

    let existing = vote::Entity::find()
        .filter(vote::Column::CandidateParticipationId.eq(participation.id))
        .order_by_asc(vote::Column::Id)
        .one(&txn)
        .await?;
    let timestamp = now();

    let (old, new) = match existing {
        Some(old) => {
            let mut active: vote::ActiveModel = old.clone().into();
            let units = stored_units(&old).merged(&request.units);
            active.votes = Set(request.votes);
            active.region_id = Set(units.region_id);
            active.subregion_id = Set(units.subregion_id);
            active.district_id = Set(units.district_id);
            active.constituency_municipality_id = Set(units.constituency_municipality_id);
            active.subcounty_division_id = Set(units.subcounty_division_id);
            active.parish_ward_id = Set(units.parish_ward_id);
            active.village_cell_id = Set(units.village_cell_id);
            if request.notes.is_some() {
                active.notes = Set(request.notes.clone());
            }
            active.updated_by = Set(Some(actor.user_id));
            active.updated_at = Set(timestamp);

            (Some(old), active.update(&txn).await?)
        }
        None => {
            // Missing unit ids fall back to the participation's own
            let units = candidate_store::stored_units(&participation).merged(&request.units);
            let model = vote::ActiveModel {
                candidate_participation_id: Set(participation.id),
                votes: Set(request.votes),
                region_id: Set(units.region_id),
                subregion_id: Set(units.subregion_id),
                district_id: Set(units.district_id),
                constituency_municipality_id: Set(units.constituency_municipality_id),
                subcounty_division_id: Set(units.subcounty_division_id),
                parish_ward_id: Set(units.parish_ward_id),
                village_cell_id: Set(units.village_cell_id),
                notes: Set(request.notes.clone()),
                recorded_by: Set(actor.user_id),
                updated_by: Set(None),
                created_at: Set(timestamp),
                updated_at: Set(timestamp),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            (None, model)
        }
    };

    audit::record(
        &txn,
        AuditEntry {
            action_type: ACTION_RECORD_VOTES,
            entity_type: ENTITY_TYPE,
            entity_id: new.id,
            old_data: old.as_ref().map(snapshot).transpose()?,
            new_data: Some(snapshot(&new)?),
            data: snapshot(request)?,
            action_by: actor.user_id,
            pending_action_id: None,
        },
    )
    .await?;

    txn.commit().await?;

    tracing::info!(
        participation_id = participation.id,
        votes = request.votes,
        actor = actor.user_id,
        "Recorded votes"
    );

    Ok(RecordedVotes {
        created: old.is_none(),
        vote: new,
    })
}

/// Summed votes per nominated participation, highest first within a position.
pub async fn summary(
    db: &DatabaseConnection,
    query: &VoteSummaryQuery,
) -> anyhow::Result<Vec<VoteTally>> {
    let mut select = candidate_store::filter_by_units(
        candidate_participation::Entity::find()
            .filter(candidate_participation::Column::IsNominated.eq(true)),
        &query.unit_refs(),
    );

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

    let participations = select.all(db).await?;
    if participations.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = participations.iter().map(|p| p.id).collect();
    let mut totals: HashMap<i64, i64> = HashMap::new();
    for record in vote::Entity::find()
        .filter(vote::Column::CandidateParticipationId.is_in(ids))
        .all(db)
        .await?
    {
        *totals.entry(record.candidate_participation_id).or_default() += record.votes;
    }

    let mut tallies: Vec<VoteTally> = candidate_store::with_candidates(db, participations)
        .await?
        .into_iter()
        .map(|view| VoteTally {
            total_votes: totals.get(&view.participation.id).copied().unwrap_or_default(),
            view,
        })
        .collect();

    tallies.sort_by(|a, b| {
        a.view
            .participation
            .position_path
            .cmp(&b.view.participation.position_path)
            .then(b.total_votes.cmp(&a.total_votes))
            .then(a.view.participation.id.cmp(&b.view.participation.id))
    });

    Ok(tallies)
}

/// Every vote row of one participation with their sum.
pub async fn for_participation(
    db: &DatabaseConnection,
    participation_id: i64,
) -> anyhow::Result<ParticipationVotes> {
    let view = candidate_store::get_view(db, participation_id).await?;

    let records = vote::Entity::find()
        .filter(vote::Column::CandidateParticipationId.eq(participation_id))
        .order_by_asc(vote::Column::Id)
        .all(db)
        .await?;
    let total_votes = records.iter().map(|record| record.votes).sum();

    Ok(ParticipationVotes {
        view,
        total_votes,
        records,
    })
}

fn stored_units(record: &vote::Model) -> ballot_api::AdminUnitRefs {
    ballot_api::AdminUnitRefs {
        region_id: record.region_id,
        subregion_id: record.subregion_id,
        district_id: record.district_id,
        constituency_municipality_id: record.constituency_municipality_id,
        subcounty_division_id: record.subcounty_division_id,
        parish_ward_id: record.parish_ward_id,
        village_cell_id: record.village_cell_id,
    }
}
