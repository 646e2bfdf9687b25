//! Pending action entity
//!
//! A proposed mutation awaiting a SuperAdmin decision. `status` leaves
//! `PENDING` exactly once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AdminLevel, EntityKind, PendingActionType, PendingStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_action")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub action_type: PendingActionType,
    pub entity_kind: EntityKind,
    /// Resource name, e.g. `districts` or `electoral-positions`
    pub entity_type: String,
    pub entity_id: Option<i64>,
    /// Parent unit for registrar proposals
    pub scope_level: Option<AdminLevel>,
    pub scope_id: Option<i64>,
    /// Proposed request body, JSON text
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub requested_by: i64,
    pub status: PendingStatus,
    pub approved_by: Option<i64>,
    pub decided_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
