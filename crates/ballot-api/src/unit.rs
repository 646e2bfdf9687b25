//! Administrative unit and registrar request models

use serde::{Deserialize, Serialize};
use validator::Validate;

use ballot_persistence::RecordStatus;

use crate::validation::{validate_nin, validate_phone};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUnitCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 32))]
    pub code: Option<String>,
    pub parent_id: Option<i64>,
    /// Only honoured for direct creates; replayed approvals always store `approved`.
    pub status: Option<RecordStatus>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUnitUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 32))]
    pub code: Option<String>,
    pub parent_id: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUnitQuery {
    pub parent_id: Option<i64>,
    pub status: Option<RecordStatus>,
    pub name: Option<String>,
    pub page_no: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarCreate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(custom(function = "validate_nin"))]
    pub nin_number: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarUpdate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_nin"))]
    pub nin_number: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}
