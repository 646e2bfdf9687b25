//! Typed mutations of units, registrars and electoral positions
//!
//! A [`MutationRequest`] is what the gateway either applies directly or stores
//! as a pending action; the approval executor later replays the very same
//! request through [`apply`].

use ballot_api::{
    election::{ElectoralPositionCreate, ElectoralPositionUpdate},
    unit::{AdminUnitCreate, AdminUnitUpdate, RegistrarCreate, RegistrarUpdate},
    validation::describe,
};
use ballot_auth::Actor;
use ballot_common::BallotError;
use ballot_persistence::sea_orm::*;
use ballot_persistence::{AdminLevel, EntityKind, PendingActionType, RecordStatus, snapshot};
use ballot_position::PositionCatalog;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::service::audit::{self, AuditEntry};
use crate::service::{admin_unit, candidate, registrar};

/// The administrative unit a registrar belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitScope {
    pub level: AdminLevel,
    pub unit_id: i64,
}

impl UnitScope {
    pub fn new(level: AdminLevel, unit_id: i64) -> Self {
        UnitScope { level, unit_id }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MutationRequest {
    pub action: PendingActionType,
    pub kind: EntityKind,
    pub entity_id: Option<i64>,
    /// Parent unit of a registrar
    pub scope: Option<UnitScope>,
    pub data: Value,
}

impl MutationRequest {
    pub fn create(kind: EntityKind, scope: Option<UnitScope>, data: Value) -> Self {
        MutationRequest {
            action: PendingActionType::Create,
            kind,
            entity_id: None,
            scope,
            data,
        }
    }

    pub fn update(
        kind: EntityKind,
        scope: Option<UnitScope>,
        entity_id: i64,
        data: Value,
    ) -> Self {
        MutationRequest {
            action: PendingActionType::Update,
            kind,
            entity_id: Some(entity_id),
            scope,
            data,
        }
    }

    pub fn delete(kind: EntityKind, scope: Option<UnitScope>, entity_id: i64) -> Self {
        MutationRequest {
            action: PendingActionType::Delete,
            kind,
            entity_id: Some(entity_id),
            scope,
            data: Value::Object(Default::default()),
        }
    }

    fn target_id(&self) -> anyhow::Result<i64> {
        self.entity_id.ok_or_else(|| {
            BallotError::validation(format!(
                "{} of {} requires an entity id",
                self.action.as_str(),
                self.kind.entity_type()
            ))
            .into()
        })
    }

    fn unit_scope(&self) -> anyhow::Result<UnitScope> {
        self.scope.ok_or_else(|| {
            BallotError::validation("registrar mutations require an administrative unit").into()
        })
    }
}

/// Who a change is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attribution {
    pub requested_by: i64,
    pub approved_by: i64,
    pub via_approval: bool,
}

impl Attribution {
    pub fn direct(actor_id: i64) -> Self {
        Attribution {
            requested_by: actor_id,
            approved_by: actor_id,
            via_approval: false,
        }
    }

    pub fn approval(requested_by: i64, approved_by: i64) -> Self {
        Attribution {
            requested_by,
            approved_by,
            via_approval: true,
        }
    }
}

/// Outcome of an applied mutation with its before/after snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedMutation {
    pub entity_id: i64,
    pub old_data: Option<String>,
    pub new_data: Option<String>,
    pub record: Option<Value>,
}

/// Deserialize and validate a mutation payload.
pub fn parse_payload<T>(data: &Value) -> anyhow::Result<T>
where
    T: DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_value(data.clone())
        .map_err(|e| BallotError::validation(format!("invalid request body: {}", e)))?;
    payload
        .validate()
        .map_err(|e| BallotError::validation(describe(&e)))?;

    Ok(payload)
}

/// Check the shape of a request before it is applied or stored for approval.
pub fn validate(catalog: &PositionCatalog, request: &MutationRequest) -> anyhow::Result<()> {
    match request.action {
        PendingActionType::Create if request.entity_id.is_some() => {
            return Err(BallotError::validation("CREATE must not carry an entity id").into());
        }
        PendingActionType::Update | PendingActionType::Delete => {
            request.target_id()?;
        }
        PendingActionType::Create => {}
    }
    if request.kind == EntityKind::Registrar {
        request.unit_scope()?;
    }

    match (request.action, request.kind) {
        (PendingActionType::Delete, _) => {}
        (PendingActionType::Create, EntityKind::Registrar) => {
            parse_payload::<RegistrarCreate>(&request.data)?;
        }
        (PendingActionType::Update, EntityKind::Registrar) => {
            parse_payload::<RegistrarUpdate>(&request.data)?;
        }
        (PendingActionType::Create, EntityKind::ElectoralPosition) => {
            let payload = parse_payload::<ElectoralPositionCreate>(&request.data)?;
            candidate::resolve_create(catalog, &payload)?;
        }
        (PendingActionType::Update, EntityKind::ElectoralPosition) => {
            parse_payload::<ElectoralPositionUpdate>(&request.data)?;
        }
        (PendingActionType::Create, _) => {
            parse_payload::<AdminUnitCreate>(&request.data)?;
        }
        (PendingActionType::Update, _) => {
            parse_payload::<AdminUnitUpdate>(&request.data)?;
        }
    }

    Ok(())
}

/// Current approval status of the entity an UPDATE or DELETE targets.
pub async fn current_status<C: ConnectionTrait>(
    conn: &C,
    request: &MutationRequest,
) -> anyhow::Result<RecordStatus> {
    let id = request.target_id()?;

    let status = match request.kind {
        EntityKind::Registrar => registrar::get(conn, request.unit_scope()?, id).await?.status,
        EntityKind::ElectoralPosition => candidate::get_participation(conn, id).await?.status,
        kind => admin_unit::get(conn, unit_level(kind)?, id).await?.status,
    };

    Ok(status)
}

/// Apply a request on `conn`; the caller owns the transaction.
pub async fn apply<C: ConnectionTrait>(
    conn: &C,
    catalog: &PositionCatalog,
    request: &MutationRequest,
    attribution: Attribution,
) -> anyhow::Result<AppliedMutation> {
    let actor_id = attribution.approved_by;

    match (request.action, request.kind) {
        (PendingActionType::Create, EntityKind::Registrar) => {
            let payload = parse_payload::<RegistrarCreate>(&request.data)?;
            let new = registrar::create(conn, request.unit_scope()?, &payload, attribution).await?;
            created(new.id, &new)
        }
        (PendingActionType::Update, EntityKind::Registrar) => {
            let payload = parse_payload::<RegistrarUpdate>(&request.data)?;
            let (old, new) = registrar::update(
                conn,
                request.unit_scope()?,
                request.target_id()?,
                &payload,
                actor_id,
            )
            .await?;
            updated(new.id, &old, &new)
        }
        (PendingActionType::Delete, EntityKind::Registrar) => {
            let old = registrar::delete(conn, request.unit_scope()?, request.target_id()?).await?;
            deleted(old.id, &old)
        }
        (PendingActionType::Create, EntityKind::ElectoralPosition) => {
            let payload = parse_payload::<ElectoralPositionCreate>(&request.data)?;
            let new = candidate::create(conn, catalog, &payload, attribution).await?;
            created(new.id, &new)
        }
        (PendingActionType::Update, EntityKind::ElectoralPosition) => {
            let payload = parse_payload::<ElectoralPositionUpdate>(&request.data)?;
            let (old, new) =
                candidate::update(conn, catalog, request.target_id()?, &payload, actor_id).await?;
            updated(new.id, &old, &new)
        }
        (PendingActionType::Delete, EntityKind::ElectoralPosition) => {
            let old = candidate::delete(conn, request.target_id()?).await?;
            deleted(old.id, &old)
        }
        (PendingActionType::Create, kind) => {
            let payload = parse_payload::<AdminUnitCreate>(&request.data)?;
            let new = admin_unit::create(conn, unit_level(kind)?, &payload, attribution).await?;
            created(new.id, &new)
        }
        (PendingActionType::Update, kind) => {
            let payload = parse_payload::<AdminUnitUpdate>(&request.data)?;
            let (old, new) = admin_unit::update(
                conn,
                unit_level(kind)?,
                request.target_id()?,
                &payload,
                actor_id,
            )
            .await?;
            updated(new.id, &old, &new)
        }
        (PendingActionType::Delete, kind) => {
            let old = admin_unit::delete(conn, unit_level(kind)?, request.target_id()?).await?;
            deleted(old.id, &old)
        }
    }
}

/// Apply a SuperAdmin's request and record it in the audit trail atomically.
pub async fn mutate_with_audit(
    db: &DatabaseConnection,
    catalog: &PositionCatalog,
    request: &MutationRequest,
    actor: &Actor,
) -> anyhow::Result<AppliedMutation> {
    let txn = db.begin().await?;

    let applied = apply(&txn, catalog, request, Attribution::direct(actor.user_id)).await?;
    audit::record(&txn, audit_entry(request, &applied, actor.user_id, None)).await?;

    txn.commit().await?;

    tracing::info!(
        action = request.action.as_str(),
        entity_type = request.kind.entity_type(),
        entity_id = applied.entity_id,
        actor = actor.user_id,
        "Applied mutation"
    );

    Ok(applied)
}

pub(crate) fn audit_entry<'a>(
    request: &'a MutationRequest,
    applied: &AppliedMutation,
    action_by: i64,
    pending_action_id: Option<i64>,
) -> AuditEntry<'a> {
    AuditEntry {
        action_type: request.action.as_str(),
        entity_type: request.kind.entity_type(),
        entity_id: applied.entity_id,
        old_data: applied.old_data.clone(),
        new_data: applied.new_data.clone(),
        data: request.data.to_string(),
        action_by,
        pending_action_id,
    }
}

fn unit_level(kind: EntityKind) -> anyhow::Result<ballot_persistence::AdminLevel> {
    kind.admin_level().ok_or_else(|| {
        BallotError::Internal(format!("{} is not an administrative unit", kind.entity_type()))
            .into()
    })
}

fn created<T: serde::Serialize>(entity_id: i64, new: &T) -> anyhow::Result<AppliedMutation> {
    Ok(AppliedMutation {
        entity_id,
        old_data: None,
        new_data: Some(snapshot(new)?),
        record: Some(serde_json::to_value(new)?),
    })
}

fn updated<T: serde::Serialize>(
    entity_id: i64,
    old: &T,
    new: &T,
) -> anyhow::Result<AppliedMutation> {
    Ok(AppliedMutation {
        entity_id,
        old_data: Some(snapshot(old)?),
        new_data: Some(snapshot(new)?),
        record: Some(serde_json::to_value(new)?),
    })
}

fn deleted<T: serde::Serialize>(entity_id: i64, old: &T) -> anyhow::Result<AppliedMutation> {
    Ok(AppliedMutation {
        entity_id,
        old_data: Some(snapshot(old)?),
        new_data: None,
        record: None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog() -> PositionCatalog {
        PositionCatalog::from_json_str(
            r#"{"PRIMARIES": {"DISTRICT": {"LCV": null, "WOMEN_MP": null}}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_requires_entity_id_for_updates() {
        let request = MutationRequest {
            action: PendingActionType::Update,
            kind: EntityKind::District,
            entity_id: None,
            scope: None,
            data: json!({"name": "Gulu"}),
        };

        let err = validate(&catalog(), &request).unwrap_err();
        assert!(matches!(
            ballot_common::find_ballot_error(&err),
            Some(BallotError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_registrar_requires_unit() {
        let request = MutationRequest::delete(EntityKind::Registrar, None, 4);
        assert!(validate(&catalog(), &request).is_err());

        let request = MutationRequest::delete(
            EntityKind::Registrar,
            Some(UnitScope::new(AdminLevel::District, 2)),
            4,
        );
        assert!(validate(&catalog(), &request).is_ok());
    }

    #[test]
    fn test_validate_resolves_electoral_positions() {
        let body = json!({
            "ninNumber": "CM90012345ABCD",
            "firstName": "Okello",
            "lastName": "Peter",
            "electionType": "PRIMARIES",
            "level": "DISTRICT",
            "category": "MAYOR",
            "year": 2026
        });
        let err = validate(
            &catalog(),
            &MutationRequest::create(EntityKind::ElectoralPosition, None, body),
        )
        .unwrap_err();
        assert!(matches!(
            ballot_common::find_ballot_error(&err),
            Some(BallotError::Position(_))
        ));
    }

    #[test]
    fn test_parse_payload_reports_field_errors() {
        let err = parse_payload::<AdminUnitCreate>(&json!({"name": ""})).unwrap_err();
        assert!(matches!(
            ballot_common::find_ballot_error(&err),
            Some(BallotError::Validation(message)) if message.contains("name")
        ));

        let err = parse_payload::<AdminUnitCreate>(&json!({"name": 5})).unwrap_err();
        assert!(err.to_string().contains("invalid request body"));
    }
}
