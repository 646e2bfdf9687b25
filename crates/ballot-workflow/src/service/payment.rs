//! Nomination fee payments

use ballot_api::election::{PaymentCreate, PaymentQuery};
use ballot_auth::Actor;
use ballot_common::BallotError;
use ballot_persistence::entity::{candidate, payment};
use ballot_persistence::sea_orm::*;
use ballot_persistence::{PaymentStatus, now, snapshot, unique_violation};
use ballot_position::PositionCatalog;

use crate::service::audit::{self, AuditEntry};
use crate::service::{candidate as candidate_store, fee};

pub const ENTITY_TYPE: &str = "payments";

pub async fn search(
    db: &DatabaseConnection,
    query: &PaymentQuery,
) -> anyhow::Result<Vec<payment::Model>> {
    let mut select = payment::Entity::find();

    if let Some(candidate_id) = &query.candidate_id {
        select = select.filter(payment::Column::CandidateId.eq(candidate_id));
    }
    if let Some(participation_id) = query.candidate_participation_id {
        select = select.filter(payment::Column::CandidateParticipationId.eq(participation_id));
    }
    if let Some(position_path) = &query.position_path {
        select = select.filter(payment::Column::PositionPath.eq(position_path));
    }
    if let Some(status) = query.status {
        select = select.filter(payment::Column::Status.eq(status));
    }

    Ok(select.order_by_desc(payment::Column::Id).all(db).await?)
}

pub async fn get<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<payment::Model> {
    payment::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| BallotError::not_found("payment", id).into())
}

/// Record a payment. Payments name either a participation, or a candidate NIN
/// together with a position path.
pub async fn create(
    db: &DatabaseConnection,
    catalog: &PositionCatalog,
    payload: &PaymentCreate,
    actor: &Actor,
) -> anyhow::Result<payment::Model> {
    let txn = db.begin().await?;

    let (candidate_id, position_path) = match payload.candidate_participation_id {
        Some(participation_id) => {
            let participation = candidate_store::get_participation(&txn, participation_id).await?;
            let candidate = candidate::Entity::find_by_id(participation.candidate_id)
                .one(&txn)
                .await?
                .ok_or_else(|| BallotError::not_found("candidate", participation.candidate_id))?;

            if payload
                .candidate_id
                .as_deref()
                .is_some_and(|nin| nin != candidate.nin_number)
            {
                return Err(BallotError::validation(
                    "candidateId does not match the participation's candidate",
                )
                .into());
            }
            if payload
                .position_path
                .as_deref()
                .is_some_and(|path| path != participation.position_path)
            {
                return Err(BallotError::validation(
                    "positionPath does not match the participation's position",
                )
                .into());
            }

            (candidate.nin_number, participation.position_path)
        }
        None => match (&payload.candidate_id, &payload.position_path) {
            (Some(candidate_id), Some(position_path)) => {
                catalog
                    .parse_path(position_path)
                    .map_err(BallotError::from)?;
                (candidate_id.clone(), position_path.clone())
            }
            _ => {
                return Err(BallotError::validation(
                    "either candidateParticipationId or candidateId and positionPath are required",
                )
                .into());
            }
        },
    };

    let amount = match payload.amount {
        Some(amount) => amount,
        None => fee::lookup_for_path(&txn, &position_path)
            .await?
            .map(|fee| fee.amount)
            .ok_or_else(|| {
                BallotError::validation(format!(
                    "no active fee covers '{}', an amount is required",
                    position_path
                ))
            })?,
    };

    let receipt_number = payload
        .receipt_number
        .clone()
        .unwrap_or_else(generate_receipt_number);
    if payment::Entity::find()
        .filter(payment::Column::ReceiptNumber.eq(&receipt_number))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(duplicate_receipt(&receipt_number).into());
    }

    let timestamp = now();
    let model = payment::ActiveModel {
        candidate_id: Set(candidate_id),
        candidate_participation_id: Set(payload.candidate_participation_id),
        position_path: Set(position_path),
        amount: Set(amount),
        payment_method: Set(payload.payment_method.clone()),
        transaction_code: Set(payload.transaction_code.clone()),
        receipt_number: Set(receipt_number.clone()),
        status: Set(payload.status.unwrap_or_default()),
        recorded_by: Set(actor.user_id),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        if unique_violation(&e) {
            anyhow::Error::from(duplicate_receipt(&receipt_number))
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

pub async fn update_status(
    db: &DatabaseConnection,
    id: i64,
    status: PaymentStatus,
    actor: &Actor,
) -> anyhow::Result<payment::Model> {
    let txn = db.begin().await?;
    let old = get(&txn, id).await?;

    let mut active: payment::ActiveModel = old.clone().into();
    active.status = Set(status);
    active.updated_at = Set(now());
    let new = active.update(&txn).await?;

    audit::record(
        &txn,
        AuditEntry {
            action_type: "UPDATE",
            entity_type: ENTITY_TYPE,
            entity_id: id,
            old_data: Some(snapshot(&old)?),
            new_data: Some(snapshot(&new)?),
            data: serde_json::json!({ "status": status }).to_string(),
            action_by: actor.user_id,
            pending_action_id: None,
        },
    )
    .await?;

    txn.commit().await?;

    Ok(new)
}

/// Whether a completed payment covers a participation, either linked directly
/// or recorded against the candidate's NIN and the same position path.
pub async fn has_completed_payment<C: ConnectionTrait>(
    conn: &C,
    participation_id: i64,
    nin_number: &str,
    position_path: &str,
) -> anyhow::Result<bool> {
    let count = payment::Entity::find()
        .filter(payment::Column::Status.eq(PaymentStatus::Completed))
        .filter(
            Condition::any()
                .add(payment::Column::CandidateParticipationId.eq(participation_id))
                .add(
                    Condition::all()
                        .add(payment::Column::CandidateId.eq(nin_number))
                        .add(payment::Column::PositionPath.eq(position_path)),
                ),
        )
        .count(conn)
        .await?;

    Ok(count > 0)
}

fn generate_receipt_number() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "RCP-{}-{}",
        chrono::Utc::now().format("%Y%m%d"),
        suffix[..8].to_uppercase()
    )
}

fn duplicate_receipt(receipt_number: &str) -> BallotError {
    BallotError::conflict(format!("receipt number '{}' already exists", receipt_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_receipt_number() {
        let receipt = generate_receipt_number();
        assert!(receipt.starts_with("RCP-"));
        assert_eq!(receipt.len(), "RCP-20260101-ABCDEF12".len());
        assert_ne!(receipt, generate_receipt_number());
    }
}
