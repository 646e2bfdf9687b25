//! Administrative unit entity
//!
//! One table holds all seven levels; `level` discriminates and `parent_id`
//! points at a unit of the immediate parent level.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AdminLevel, RecordStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "administrative_unit")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub level: AdminLevel,
    pub name: String,
    pub code: Option<String>,
    pub parent_id: Option<i64>,
    pub status: RecordStatus,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub approved_by: Option<i64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
