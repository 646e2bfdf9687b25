//! Role policy
//!
//! Which role may do what, in one table.

use ballot_persistence::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ReadRecords,
    /// Create, update or delete administrative units, registrars and electoral positions
    ProposeChanges,
    DecidePendingActions,
    ViewAuditTrail,
    ManageUsers,
    ManageFees,
    RecordPayments,
    Nominate,
    RecordVotes,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ReadRecords => "read records",
            Permission::ProposeChanges => "change records",
            Permission::DecidePendingActions => "decide pending actions",
            Permission::ViewAuditTrail => "view the audit trail",
            Permission::ManageUsers => "manage users",
            Permission::ManageFees => "manage fees",
            Permission::RecordPayments => "record payments",
            Permission::Nominate => "nominate candidates",
            Permission::RecordVotes => "record votes",
        }
    }
}

/// How a write proposed by a role reaches the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Applied at once, together with its audit row
    Immediate,
    /// Queued as a pending action for a SuperAdmin decision
    Deferred,
    Denied,
}

pub trait AccessPolicy {
    fn allows(&self, permission: Permission) -> bool;

    fn write_mode(&self) -> WriteMode;
}

impl AccessPolicy for Role {
    fn allows(&self, permission: Permission) -> bool {
        use Permission::*;

        match self {
            Role::SuperAdmin => true,
            Role::RegionalCoordinator | Role::DistrictRegistra => matches!(
                permission,
                ReadRecords | ProposeChanges | Nominate | RecordVotes
            ),
            Role::Accountant => matches!(permission, ReadRecords | ManageFees | RecordPayments),
            Role::Peo => matches!(permission, ReadRecords | RecordVotes),
            Role::User => false,
        }
    }

    fn write_mode(&self) -> WriteMode {
        match self {
            Role::SuperAdmin => WriteMode::Immediate,
            Role::RegionalCoordinator | Role::DistrictRegistra => WriteMode::Deferred,
            Role::Accountant | Role::Peo | Role::User => WriteMode::Denied,
        }
    }
}
