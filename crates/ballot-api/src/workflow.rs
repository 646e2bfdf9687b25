//! Pending action and audit trail request models

use serde::{Deserialize, Serialize};

use ballot_persistence::PendingStatus;

/// SuperAdmin decision on a pending action.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDecisionRequest {
    pub status: PendingStatus,
    /// Replaces the stored proposal before an approval is replayed.
    pub data: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingActionQuery {
    pub status: Option<PendingStatus>,
    pub entity_type: Option<String>,
    pub page_no: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub action_by: Option<i64>,
    pub page_no: Option<u64>,
    pub page_size: Option<u64>,
}

/// Body of a `202 Accepted` response for a deferred write.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReceipt {
    pub pending_action_id: i64,
    pub status: PendingStatus,
    pub entity_type: String,
}
