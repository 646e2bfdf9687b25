//! Audit trail entity
//!
//! Append-only before/after snapshots of every applied mutation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_trail")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// CREATE, UPDATE, DELETE, APPROVE, NOMINATE, REMOVE_NOMINATION, RECORD_VOTES
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub old_data: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub new_data: Option<String>,
    /// Request body that produced the change
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub action_by: i64,
    pub status: String,
    pub pending_action_id: Option<i64>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
