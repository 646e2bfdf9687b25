//! Candidate, fee, payment, nomination and vote request models

use serde::{Deserialize, Serialize};
use validator::Validate;

use ballot_persistence::PaymentStatus;

use crate::model::AdminUnitRefs;
use crate::validation::{validate_nin, validate_phone, validate_position_key};

/// Category / subcategory / nested category / position picked by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PositionSelectionRequest {
    #[validate(length(min = 1))]
    pub election_type: String,
    #[validate(length(min = 1))]
    pub level: String,
    #[validate(custom(function = "validate_position_key"))]
    pub category: String,
    #[validate(custom(function = "validate_position_key"))]
    pub subcategory: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub nested_category: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub position: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionOptionsQuery {
    pub election_type: String,
    pub level: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub nested_category: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralPositionCreate {
    #[validate(custom(function = "validate_nin"))]
    pub nin_number: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    #[serde(default)]
    pub is_opposition: bool,
    #[validate(length(min = 1))]
    pub election_type: String,
    #[validate(length(min = 1))]
    pub level: String,
    #[validate(custom(function = "validate_position_key"))]
    pub category: String,
    #[validate(custom(function = "validate_position_key"))]
    pub subcategory: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub nested_category: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub position: Option<String>,
    #[validate(range(min = 1990, max = 2200))]
    pub year: i32,
    #[serde(default)]
    pub is_qualified: bool,
    #[serde(flatten)]
    pub units: AdminUnitRefs,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralPositionUpdate {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub category: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub subcategory: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub nested_category: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub position: Option<String>,
    #[validate(range(min = 1990, max = 2200))]
    pub year: Option<i32>,
    pub is_qualified: Option<bool>,
    #[serde(flatten)]
    pub units: AdminUnitRefs,
}

impl ElectoralPositionUpdate {
    pub fn touches_position(&self) -> bool {
        self.level.is_some()
            || self.category.is_some()
            || self.subcategory.is_some()
            || self.nested_category.is_some()
            || self.position.is_some()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralPositionQuery {
    pub election_type: Option<String>,
    pub level: Option<String>,
    pub position_path: Option<String>,
    pub year: Option<i32>,
    pub is_nominated: Option<bool>,
    pub region_id: Option<i64>,
    pub subregion_id: Option<i64>,
    pub district_id: Option<i64>,
    pub constituency_municipality_id: Option<i64>,
    pub subcounty_division_id: Option<i64>,
    pub parish_ward_id: Option<i64>,
    pub village_cell_id: Option<i64>,
    pub page_no: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeeCreate {
    #[validate(length(min = 1))]
    pub election_type: String,
    #[validate(length(min = 1))]
    pub level: String,
    #[validate(custom(function = "validate_position_key"))]
    pub category: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub subcategory: Option<String>,
    #[validate(custom(function = "validate_position_key"))]
    pub position: Option<String>,
    #[validate(range(min = 0))]
    pub amount: i64,
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeeUpdate {
    #[validate(range(min = 0))]
    pub amount: Option<i64>,
    pub is_active: Option<bool>,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuery {
    pub election_type: Option<String>,
    pub level: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    /// Candidate NIN.
    #[validate(custom(function = "validate_nin"))]
    pub candidate_id: Option<String>,
    pub candidate_participation_id: Option<i64>,
    pub position_path: Option<String>,
    #[validate(range(min = 0))]
    pub amount: Option<i64>,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    #[validate(length(max = 100))]
    pub transaction_code: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub receipt_number: Option<String>,
    pub status: Option<PaymentStatus>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub status: PaymentStatus,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    pub candidate_id: Option<String>,
    pub candidate_participation_id: Option<i64>,
    pub position_path: Option<String>,
    pub status: Option<PaymentStatus>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NominateRequest {
    pub candidate_id: i64,
    pub participation_id: i64,
    pub election_type: Option<String>,
    pub level: Option<String>,
    pub position_path: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(length(max = 500))]
    pub reason_for_nomination: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveNominationRequest {
    pub participation_id: i64,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationQuery {
    pub election_type: Option<String>,
    pub level: Option<String>,
    pub position_path: Option<String>,
    pub year: Option<i32>,
    pub fees_paid: Option<bool>,
    pub nominated: Option<bool>,
    pub region_id: Option<i64>,
    pub subregion_id: Option<i64>,
    pub district_id: Option<i64>,
    pub constituency_municipality_id: Option<i64>,
    pub subcounty_division_id: Option<i64>,
    pub parish_ward_id: Option<i64>,
    pub village_cell_id: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordVotesRequest {
    pub candidate_participation_id: i64,
    #[validate(range(min = 0))]
    pub votes: i64,
    #[serde(flatten)]
    pub units: AdminUnitRefs,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummaryQuery {
    pub election_type: Option<String>,
    pub level: Option<String>,
    pub position_path: Option<String>,
    pub year: Option<i32>,
    pub region_id: Option<i64>,
    pub subregion_id: Option<i64>,
    pub district_id: Option<i64>,
    pub constituency_municipality_id: Option<i64>,
    pub subcounty_division_id: Option<i64>,
    pub parish_ward_id: Option<i64>,
    pub village_cell_id: Option<i64>,
}

macro_rules! unit_refs_from_query {
    ($($query:ty),*) => {
        $(
            impl $query {
                pub fn unit_refs(&self) -> AdminUnitRefs {
                    AdminUnitRefs {
                        region_id: self.region_id,
                        subregion_id: self.subregion_id,
                        district_id: self.district_id,
                        constituency_municipality_id: self.constituency_municipality_id,
                        subcounty_division_id: self.subcounty_division_id,
                        parish_ward_id: self.parish_ward_id,
                        village_cell_id: self.village_cell_id,
                    }
                }
            }
        )*
    };
}

unit_refs_from_query!(ElectoralPositionQuery, NominationQuery, VoteSummaryQuery);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_electoral_position_create_flattens_unit_ids() {
        let payload: ElectoralPositionCreate = serde_json::from_value(json!({
            "ninNumber": "CM90012345ABCD",
            "firstName": "Okello",
            "lastName": "Peter",
            "electionType": "PRIMARIES",
            "level": "VILLAGE_CELL",
            "category": "SIG_COMMITTEE",
            "subcategory": "YOUTH",
            "position": "CHAIRPERSON",
            "year": 2026,
            "districtId": 5,
            "villageCellId": 77
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.units.district_id, Some(5));
        assert_eq!(payload.units.village_cell_id, Some(77));
        assert!(!payload.is_opposition);
    }

    #[test]
    fn test_electoral_position_create_rejects_dotted_keys() {
        let payload = ElectoralPositionCreate {
            nin_number: "CM90012345ABCD".to_string(),
            first_name: "Okello".to_string(),
            last_name: "Peter".to_string(),
            election_type: "PRIMARIES".to_string(),
            level: "VILLAGE_CELL".to_string(),
            category: "SIG.COMMITTEE".to_string(),
            year: 2026,
            ..Default::default()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_touches_position() {
        let update = ElectoralPositionUpdate {
            is_qualified: Some(true),
            ..Default::default()
        };
        assert!(!update.touches_position());

        let update = ElectoralPositionUpdate {
            subcategory: Some("WOMEN".to_string()),
            ..Default::default()
        };
        assert!(update.touches_position());
    }

    #[test]
    fn test_record_votes_rejects_negative() {
        let request = RecordVotesRequest {
            candidate_participation_id: 1,
            votes: -3,
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_query_unit_refs() {
        let query = VoteSummaryQuery {
            parish_ward_id: Some(12),
            ..Default::default()
        };
        assert_eq!(query.unit_refs().parish_ward_id, Some(12));
    }
}
