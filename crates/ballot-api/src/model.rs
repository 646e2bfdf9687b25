//! Shared API models

use serde::{Deserialize, Serialize};

/// Generic pagination wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_count: u64,
    pub page_number: u64,
    pub pages_available: u64,
    pub page_items: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total_count: 0,
            page_number: 1,
            pages_available: 0,
            page_items: vec![],
        }
    }
}

impl<T> Page<T> {
    pub fn new(total_count: u64, page_number: u64, page_size: u64, page_items: Vec<T>) -> Self {
        Self {
            total_count,
            page_number,
            pages_available: if page_size > 0 {
                total_count.div_ceil(page_size)
            } else {
                0
            },
            page_items,
        }
    }
}

/// Administrative unit references carried by participations and vote records.
///
/// Which ids are meaningful depends on the level of the position; all are optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUnitRefs {
    pub region_id: Option<i64>,
    pub subregion_id: Option<i64>,
    pub district_id: Option<i64>,
    pub constituency_municipality_id: Option<i64>,
    pub subcounty_division_id: Option<i64>,
    pub parish_ward_id: Option<i64>,
    pub village_cell_id: Option<i64>,
}

impl AdminUnitRefs {
    pub fn is_empty(&self) -> bool {
        *self == AdminUnitRefs::default()
    }

    /// Fields present in `other` replace the ones in `self`.
    pub fn merged(&self, other: &AdminUnitRefs) -> AdminUnitRefs {
        AdminUnitRefs {
            region_id: other.region_id.or(self.region_id),
            subregion_id: other.subregion_id.or(self.subregion_id),
            district_id: other.district_id.or(self.district_id),
            constituency_municipality_id: other
                .constituency_municipality_id
                .or(self.constituency_municipality_id),
            subcounty_division_id: other.subcounty_division_id.or(self.subcounty_division_id),
            parish_ward_id: other.parish_ward_id.or(self.parish_ward_id),
            village_cell_id: other.village_cell_id.or(self.village_cell_id),
        }
    }
}
