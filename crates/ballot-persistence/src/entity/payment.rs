use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Candidate NIN
    pub candidate_id: String,
    pub candidate_participation_id: Option<i64>,
    pub position_path: String,
    pub amount: i64,
    pub payment_method: String,
    pub transaction_code: Option<String>,
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub status: PaymentStatus,
    pub recorded_by: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
