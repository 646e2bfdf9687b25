//! Nominations: marking paid participations as nominated

use std::collections::HashSet;

use ballot_api::election::{NominateRequest, NominationQuery, RemoveNominationRequest};
use ballot_auth::Actor;
use ballot_common::BallotError;
use ballot_persistence::entity::{candidate, candidate_participation, payment};
use ballot_persistence::sea_orm::*;
use ballot_persistence::{PaymentStatus, now, snapshot};
use serde::Serialize;

use crate::service::audit::{self, ACTION_NOMINATE, ACTION_REMOVE_NOMINATION, AuditEntry};
use crate::service::candidate::{self as candidate_store, ParticipationView};
use crate::service::payment as payment_store;

const ENTITY_TYPE: &str = "nominations";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationCandidate {
    #[serde(flatten)]
    pub view: ParticipationView,
    pub fees_paid: bool,
}

/// Participations with their fee status, for building nomination lists.
pub async fn list_candidates(
    db: &DatabaseConnection,
    query: &NominationQuery,
) -> anyhow::Result<Vec<NominationCandidate>> {
    let mut select = candidate_store::filter_by_units(
        candidate_participation::Entity::find(),
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
    if let Some(nominated) = query.nominated {
        select = select.filter(candidate_participation::Column::IsNominated.eq(nominated));
    }

    let participations = select
        .order_by_asc(candidate_participation::Column::PositionPath)
        .order_by_asc(candidate_participation::Column::Id)
        .all(db)
        .await?;
    if participations.is_empty() {
        return Ok(Vec::new());
    }

    let views = candidate_store::with_candidates(db, participations).await?;
    let paid = paid_keys(db, &views).await?;

    Ok(views
        .into_iter()
        .map(|view| {
            let fees_paid = paid.covers(&view);
            NominationCandidate { view, fees_paid }
        })
        .filter(|item| query.fees_paid.is_none_or(|wanted| item.fees_paid == wanted))
        .collect())
}

pub async fn nominate(
    db: &DatabaseConnection,
    request: &NominateRequest,
    actor: &Actor,
) -> anyhow::Result<candidate_participation::Model> {
    let txn = db.begin().await?;
    let old = candidate_store::lock_participation(&txn, request.participation_id).await?;

    if old.candidate_id != request.candidate_id {
        return Err(BallotError::validation(format!(
            "participation {} does not belong to candidate {}",
            old.id, request.candidate_id
        ))
        .into());
    }
    for (field, expected, actual) in [
        ("electionType", &request.election_type, &old.election_type),
        ("level", &request.level, &old.level),
        ("positionPath", &request.position_path, &old.position_path),
    ] {
        if expected.as_ref().is_some_and(|expected| expected != actual) {
            return Err(BallotError::validation(format!(
                "{} does not match participation {}",
                field, old.id
            ))
            .into());
        }
    }

    let candidate = candidate::Entity::find_by_id(old.candidate_id)
        .one(&txn)
        .await?
        .ok_or_else(|| BallotError::not_found("candidate", old.candidate_id))?;

    if !payment_store::has_completed_payment(
        &txn,
        old.id,
        &candidate.nin_number,
        &old.position_path,
    )
    .await?
    {
        return Err(BallotError::FeesNotPaid {
            candidate_id: candidate.nin_number,
            position_path: old.position_path,
        }
        .into());
    }

    let timestamp = now();
    set_nomination(
        &txn,
        old.id,
        candidate_participation::ActiveModel {
            is_nominated: Set(true),
            nominated_by: Set(Some(actor.user_id)),
            nominated_at: Set(Some(timestamp)),
            reason_for_nomination: Set(request.reason_for_nomination.clone()),
            nomination_notes: Set(request.notes.clone()),
            updated_by: Set(Some(actor.user_id)),
            updated_at: Set(timestamp),
            ..Default::default()
        },
    )
    .await?;
    let new = candidate_store::get_participation(&txn, old.id).await?;

    audit::record(
        &txn,
        AuditEntry {
            action_type: ACTION_NOMINATE,
            entity_type: ENTITY_TYPE,
            entity_id: new.id,
            old_data: Some(snapshot(&old)?),
            new_data: Some(snapshot(&new)?),
            data: snapshot(request)?,
            action_by: actor.user_id,
            pending_action_id: None,
        },
    )
    .await?;

    txn.commit().await?;

    tracing::info!(
        participation_id = new.id,
        position_path = %new.position_path,
        actor = actor.user_id,
        "Nominated candidate"
    );

    Ok(new)
}

/// Clear a nomination; recorded votes are kept.
pub async fn remove(
    db: &DatabaseConnection,
    request: &RemoveNominationRequest,
    actor: &Actor,
) -> anyhow::Result<candidate_participation::Model> {
    let txn = db.begin().await?;
    let old = candidate_store::lock_participation(&txn, request.participation_id).await?;

    set_nomination(
        &txn,
        old.id,
        candidate_participation::ActiveModel {
            is_nominated: Set(false),
            nominated_by: Set(None),
            nominated_at: Set(None),
            reason_for_nomination: Set(None),
            nomination_notes: Set(request.notes.clone()),
            updated_by: Set(Some(actor.user_id)),
            updated_at: Set(now()),
            ..Default::default()
        },
    )
    .await?;
    let new = candidate_store::get_participation(&txn, old.id).await?;

    audit::record(
        &txn,
        AuditEntry {
            action_type: ACTION_REMOVE_NOMINATION,
            entity_type: ENTITY_TYPE,
            entity_id: new.id,
            old_data: Some(snapshot(&old)?),
            new_data: Some(snapshot(&new)?),
            data: snapshot(request)?,
            action_by: actor.user_id,
            pending_action_id: None,
        },
    )
    .await?;

    txn.commit().await?;

    Ok(new)
}

async fn set_nomination<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    changes: candidate_participation::ActiveModel,
) -> anyhow::Result<()> {
    let result = candidate_participation::Entity::update_many()
        .set(changes)
        .filter(candidate_participation::Column::Id.eq(id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(BallotError::not_found("candidate participation", id).into());
    }

    Ok(())
}

/// Completed payments indexed by participation and by (NIN, position path).
#[derive(Default)]
struct PaidKeys {
    participations: HashSet<i64>,
    candidates: HashSet<(String, String)>,
}

impl PaidKeys {
    fn covers(&self, view: &ParticipationView) -> bool {
        let participation = &view.participation;

        self.participations.contains(&participation.id)
            || view.candidate.as_ref().is_some_and(|candidate| {
                self.candidates.contains(&(
                    candidate.nin_number.clone(),
                    participation.position_path.clone(),
                ))
            })
    }
}

async fn paid_keys(
    db: &DatabaseConnection,
    views: &[ParticipationView],
) -> anyhow::Result<PaidKeys> {
    let participation_ids: Vec<i64> = views.iter().map(|v| v.participation.id).collect();
    let nins: Vec<String> = views
        .iter()
        .filter_map(|v| v.candidate.as_ref().map(|c| c.nin_number.clone()))
        .collect();

    let payments = payment::Entity::find()
        .filter(payment::Column::Status.eq(PaymentStatus::Completed))
        .filter(
            Condition::any()
                .add(payment::Column::CandidateParticipationId.is_in(participation_ids))
                .add(payment::Column::CandidateId.is_in(nins)),
        )
        .all(db)
        .await?;

    let mut keys = PaidKeys::default();
    for payment in payments {
        if let Some(participation_id) = payment.candidate_participation_id {
            keys.participations.insert(participation_id);
        }
        keys.candidates
            .insert((payment.candidate_id, payment.position_path));
    }

    Ok(keys)
}
