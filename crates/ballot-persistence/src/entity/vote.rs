use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub candidate_participation_id: i64,
    pub votes: i64,
    pub region_id: Option<i64>,
    pub subregion_id: Option<i64>,
    pub district_id: Option<i64>,
    pub constituency_municipality_id: Option<i64>,
    pub subcounty_division_id: Option<i64>,
    pub parish_ward_id: Option<i64>,
    pub village_cell_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub recorded_by: i64,
    pub updated_by: Option<i64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
