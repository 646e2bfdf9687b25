//! Audit trail recording and queries

use ballot_api::{Page, workflow::AuditQuery};
use ballot_common::page_bounds;
use ballot_persistence::{entity::audit_trail, now};
use ballot_persistence::sea_orm::*;

pub const STATUS_APPROVED: &str = "APPROVED";

pub const ACTION_APPROVE: &str = "APPROVE";
pub const ACTION_NOMINATE: &str = "NOMINATE";
pub const ACTION_REMOVE_NOMINATION: &str = "REMOVE_NOMINATION";
pub const ACTION_RECORD_VOTES: &str = "RECORD_VOTES";

/// One applied change, written in the same transaction as the change itself.
#[derive(Clone, Debug)]
pub struct AuditEntry<'a> {
    pub action_type: &'a str,
    pub entity_type: &'a str,
    pub entity_id: i64,
    pub old_data: Option<String>,
    pub new_data: Option<String>,
    pub data: String,
    pub action_by: i64,
    pub pending_action_id: Option<i64>,
}

pub async fn record<C: ConnectionTrait>(
    conn: &C,
    entry: AuditEntry<'_>,
) -> anyhow::Result<audit_trail::Model> {
    let model = audit_trail::ActiveModel {
        action_type: Set(entry.action_type.to_string()),
        entity_type: Set(entry.entity_type.to_string()),
        entity_id: Set(entry.entity_id),
        old_data: Set(entry.old_data),
        new_data: Set(entry.new_data),
        data: Set(entry.data),
        action_by: Set(entry.action_by),
        status: Set(STATUS_APPROVED.to_string()),
        pending_action_id: Set(entry.pending_action_id),
        created_at: Set(now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::debug!(
        action = %model.action_type,
        entity_type = %model.entity_type,
        entity_id = model.entity_id,
        action_by = model.action_by,
        "Recorded audit entry"
    );

    Ok(model)
}

/// Newest entries first.
pub async fn search_page(
    db: &DatabaseConnection,
    query: &AuditQuery,
) -> anyhow::Result<Page<audit_trail::Model>> {
    let (page_no, page_size) = page_bounds(query.page_no, query.page_size);
    let mut select = audit_trail::Entity::find();

    if let Some(entity_type) = &query.entity_type {
        select = select.filter(audit_trail::Column::EntityType.eq(entity_type));
    }
    if let Some(entity_id) = query.entity_id {
        select = select.filter(audit_trail::Column::EntityId.eq(entity_id));
    }
    if let Some(action_by) = query.action_by {
        select = select.filter(audit_trail::Column::ActionBy.eq(action_by));
    }

    let total_count = select.clone().count(db).await?;
    if total_count == 0 {
        return Ok(Page::default());
    }

    let page_items = select
        .order_by_desc(audit_trail::Column::Id)
        .paginate(db, page_size)
        .fetch_page(page_no - 1)
        .await?;

    Ok(Page::new(total_count, page_no, page_size, page_items))
}
