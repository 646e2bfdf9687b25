//! String-backed enums stored in entity columns

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One level of the fixed seven-level administrative hierarchy.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    #[sea_orm(string_value = "region")]
    Region,
    #[sea_orm(string_value = "subregion")]
    Subregion,
    #[sea_orm(string_value = "district")]
    District,
    #[sea_orm(string_value = "constituency_municipality")]
    ConstituencyMunicipality,
    #[sea_orm(string_value = "subcounty_division")]
    SubcountyDivision,
    #[sea_orm(string_value = "parish_ward")]
    ParishWard,
    #[sea_orm(string_value = "village_cell")]
    VillageCell,
}

impl AdminLevel {
    pub const ALL: [AdminLevel; 7] = [
        AdminLevel::Region,
        AdminLevel::Subregion,
        AdminLevel::District,
        AdminLevel::ConstituencyMunicipality,
        AdminLevel::SubcountyDivision,
        AdminLevel::ParishWard,
        AdminLevel::VillageCell,
    ];

    /// The level a unit's `parent_id` must point at; `None` for regions.
    pub fn parent(self) -> Option<AdminLevel> {
        match self {
            AdminLevel::Region => None,
            AdminLevel::Subregion => Some(AdminLevel::Region),
            AdminLevel::District => Some(AdminLevel::Subregion),
            AdminLevel::ConstituencyMunicipality => Some(AdminLevel::District),
            AdminLevel::SubcountyDivision => Some(AdminLevel::ConstituencyMunicipality),
            AdminLevel::ParishWard => Some(AdminLevel::SubcountyDivision),
            AdminLevel::VillageCell => Some(AdminLevel::ParishWard),
        }
    }

    pub fn child(self) -> Option<AdminLevel> {
        AdminLevel::ALL
            .into_iter()
            .find(|level| level.parent() == Some(self))
    }

    /// Resource name used in routes and in `entity_type` columns.
    pub fn resource(self) -> &'static str {
        match self {
            AdminLevel::Region => "regions",
            AdminLevel::Subregion => "subregions",
            AdminLevel::District => "districts",
            AdminLevel::ConstituencyMunicipality => "constituencies-municipalities",
            AdminLevel::SubcountyDivision => "subcounties-divisions",
            AdminLevel::ParishWard => "parishes-wards",
            AdminLevel::VillageCell => "villages-cells",
        }
    }

    /// Human readable singular name, used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            AdminLevel::Region => "region",
            AdminLevel::Subregion => "subregion",
            AdminLevel::District => "district",
            AdminLevel::ConstituencyMunicipality => "constituency/municipality",
            AdminLevel::SubcountyDivision => "subcounty/division",
            AdminLevel::ParishWard => "parish/ward",
            AdminLevel::VillageCell => "village/cell",
        }
    }

    pub fn entity_kind(self) -> EntityKind {
        match self {
            AdminLevel::Region => EntityKind::Region,
            AdminLevel::Subregion => EntityKind::Subregion,
            AdminLevel::District => EntityKind::District,
            AdminLevel::ConstituencyMunicipality => EntityKind::ConstituencyMunicipality,
            AdminLevel::SubcountyDivision => EntityKind::SubcountyDivision,
            AdminLevel::ParishWard => EntityKind::ParishWard,
            AdminLevel::VillageCell => EntityKind::VillageCell,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Role {
    #[sea_orm(string_value = "SuperAdmin")]
    SuperAdmin,
    #[sea_orm(string_value = "RegionalCoordinator")]
    RegionalCoordinator,
    #[sea_orm(string_value = "DistrictRegistra")]
    DistrictRegistra,
    #[sea_orm(string_value = "Accountant")]
    Accountant,
    #[serde(rename = "PEO")]
    #[sea_orm(string_value = "PEO")]
    Peo,
    #[sea_orm(string_value = "User")]
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::RegionalCoordinator => "RegionalCoordinator",
            Role::DistrictRegistra => "DistrictRegistra",
            Role::Accountant => "Accountant",
            Role::Peo => "PEO",
            Role::User => "User",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum PendingActionType {
    #[sea_orm(string_value = "CREATE")]
    Create,
    #[sea_orm(string_value = "UPDATE")]
    Update,
    #[sea_orm(string_value = "DELETE")]
    Delete,
}

impl PendingActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            PendingActionType::Create => "CREATE",
            PendingActionType::Update => "UPDATE",
            PendingActionType::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum PendingStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl PendingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PendingStatus::Pending => "PENDING",
            PendingStatus::Approved => "APPROVED",
            PendingStatus::Rejected => "REJECTED",
        }
    }
}

/// Explicit discriminant naming the entity a mutation targets.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[sea_orm(string_value = "region")]
    Region,
    #[sea_orm(string_value = "subregion")]
    Subregion,
    #[sea_orm(string_value = "district")]
    District,
    #[sea_orm(string_value = "constituency_municipality")]
    ConstituencyMunicipality,
    #[sea_orm(string_value = "subcounty_division")]
    SubcountyDivision,
    #[sea_orm(string_value = "parish_ward")]
    ParishWard,
    #[sea_orm(string_value = "village_cell")]
    VillageCell,
    #[sea_orm(string_value = "registrar")]
    Registrar,
    #[sea_orm(string_value = "electoral_position")]
    ElectoralPosition,
}

impl EntityKind {
    pub fn admin_level(self) -> Option<AdminLevel> {
        match self {
            EntityKind::Region => Some(AdminLevel::Region),
            EntityKind::Subregion => Some(AdminLevel::Subregion),
            EntityKind::District => Some(AdminLevel::District),
            EntityKind::ConstituencyMunicipality => Some(AdminLevel::ConstituencyMunicipality),
            EntityKind::SubcountyDivision => Some(AdminLevel::SubcountyDivision),
            EntityKind::ParishWard => Some(AdminLevel::ParishWard),
            EntityKind::VillageCell => Some(AdminLevel::VillageCell),
            EntityKind::Registrar | EntityKind::ElectoralPosition => None,
        }
    }

    /// Resource name recorded as `entity_type` on pending actions and audit rows.
    pub fn entity_type(self) -> &'static str {
        match self {
            EntityKind::Registrar => "registrars",
            EntityKind::ElectoralPosition => "electoral-positions",
            other => other
                .admin_level()
                .map(AdminLevel::resource)
                .unwrap_or("unknown"),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[default]
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}
