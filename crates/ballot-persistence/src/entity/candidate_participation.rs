//! Candidate participation entity
//!
//! One candidacy for one position path in one election year.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RecordStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "candidate_participation")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub candidate_id: i64,
    pub election_type: String,
    pub level: String,
    pub position_path: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub nested_category: Option<String>,
    pub position: String,
    pub year: i32,
    pub status: RecordStatus,
    pub is_qualified: bool,
    pub is_nominated: bool,
    pub nominated_by: Option<i64>,
    pub nominated_at: Option<DateTime>,
    pub reason_for_nomination: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub nomination_notes: Option<String>,
    pub region_id: Option<i64>,
    pub subregion_id: Option<i64>,
    pub district_id: Option<i64>,
    pub constituency_municipality_id: Option<i64>,
    pub subcounty_division_id: Option<i64>,
    pub parish_ward_id: Option<i64>,
    pub village_cell_id: Option<i64>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub approved_by: Option<i64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::candidate::Entity",
        from = "Column::CandidateId",
        to = "super::candidate::Column::Id"
    )]
    Candidate,
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
