//! Pending action store

use ballot_api::{Page, workflow::PendingActionQuery};
use ballot_common::{BallotError, page_bounds};
use ballot_persistence::entity::pending_action;
use ballot_persistence::sea_orm::*;
use ballot_persistence::{PendingStatus, now};

use crate::service::mutation::{MutationRequest, UnitScope};

/// Store a proposal for later approval.
pub async fn enqueue<C: ConnectionTrait>(
    conn: &C,
    request: &MutationRequest,
    requested_by: i64,
) -> anyhow::Result<pending_action::Model> {
    let timestamp = now();

    let model = pending_action::ActiveModel {
        action_type: Set(request.action),
        entity_kind: Set(request.kind),
        entity_type: Set(request.kind.entity_type().to_string()),
        entity_id: Set(request.entity_id),
        scope_level: Set(request.scope.map(|scope| scope.level)),
        scope_id: Set(request.scope.map(|scope| scope.unit_id)),
        data: Set(request.data.to_string()),
        requested_by: Set(requested_by),
        status: Set(PendingStatus::Pending),
        approved_by: Set(None),
        decided_at: Set(None),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::info!(
        pending_action_id = model.id,
        action = request.action.as_str(),
        entity_type = %model.entity_type,
        requested_by,
        "Queued pending action"
    );

    Ok(model)
}

pub async fn find<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> anyhow::Result<Option<pending_action::Model>> {
    Ok(pending_action::Entity::find_by_id(id).one(conn).await?)
}

pub async fn get<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<pending_action::Model> {
    find(conn, id)
        .await?
        .ok_or_else(|| BallotError::not_found("pending action", id).into())
}

/// Oldest first, so reviewers work through the queue in order.
pub async fn search_page(
    db: &DatabaseConnection,
    query: &PendingActionQuery,
) -> anyhow::Result<Page<pending_action::Model>> {
    let (page_no, page_size) = page_bounds(query.page_no, query.page_size);
    let mut select = pending_action::Entity::find();

    if let Some(status) = query.status {
        select = select.filter(pending_action::Column::Status.eq(status));
    }
    if let Some(entity_type) = &query.entity_type {
        select = select.filter(pending_action::Column::EntityType.eq(entity_type));
    }

    let total_count = select.clone().count(db).await?;
    if total_count == 0 {
        return Ok(Page::default());
    }

    let page_items = select
        .order_by_asc(pending_action::Column::Id)
        .paginate(db, page_size)
        .fetch_page(page_no - 1)
        .await?;

    Ok(Page::new(total_count, page_no, page_size, page_items))
}

/// Rebuild the stored request of a pending action.
pub fn to_request(model: &pending_action::Model) -> anyhow::Result<MutationRequest> {
    let data = serde_json::from_str(&model.data).map_err(|e| {
        BallotError::Internal(format!(
            "pending action {} has unreadable data: {}",
            model.id, e
        ))
    })?;

    Ok(MutationRequest {
        action: model.action_type,
        kind: model.entity_kind,
        entity_id: model.entity_id,
        scope: match (model.scope_level, model.scope_id) {
            (Some(level), Some(unit_id)) => Some(UnitScope::new(level, unit_id)),
            _ => None,
        },
        data,
    })
}

/// A decision taken on a pending action.
#[derive(Clone, Debug)]
pub struct Decision {
    pub status: PendingStatus,
    pub approved_by: i64,
    /// Set when an approved CREATE produced a new entity
    pub entity_id: Option<i64>,
    /// Replacement proposal applied on approval
    pub data: Option<String>,
}

/// Move a pending action out of `PENDING`. Only one caller can win; everyone
/// else gets [`BallotError::AlreadyProcessed`].
pub async fn mark_decided<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    decision: Decision,
) -> anyhow::Result<()> {
    let timestamp = now();
    let mut changes = pending_action::ActiveModel {
        status: Set(decision.status),
        approved_by: Set(Some(decision.approved_by)),
        decided_at: Set(Some(timestamp)),
        updated_at: Set(timestamp),
        ..Default::default()
    };
    if let Some(entity_id) = decision.entity_id {
        changes.entity_id = Set(Some(entity_id));
    }
    if let Some(data) = decision.data {
        changes.data = Set(data);
    }

    let result = pending_action::Entity::update_many()
        .set(changes)
        .filter(pending_action::Column::Id.eq(id))
        .filter(pending_action::Column::Status.eq(PendingStatus::Pending))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find(conn, id).await? {
            Some(_) => Err(BallotError::AlreadyProcessed(id).into()),
            None => Err(BallotError::not_found("pending action", id).into()),
        };
    }

    Ok(())
}
