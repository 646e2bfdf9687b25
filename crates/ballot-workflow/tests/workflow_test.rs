// Integration tests for the mutation gateway and the approval executor

mod common;

use ballot_api::workflow::{AuditQuery, PendingActionQuery, PendingDecisionRequest};
use ballot_common::{BallotError, find_ballot_error};
use ballot_persistence::entity::{
    administrative_unit, audit_trail, candidate, candidate_participation, pending_action,
};
use ballot_persistence::sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use ballot_persistence::{AdminLevel, EntityKind, PendingActionType, PendingStatus, RecordStatus};
use ballot_workflow::service::{
    admin_unit, approval, audit, gateway, pending_action as pending_store, registrar,
};
use ballot_workflow::{GatewayOutcome, MutationRequest, UnitScope};
use serde_json::json;

use common::*;

fn ballot_error(err: &anyhow::Error) -> BallotError {
    find_ballot_error(err)
        .cloned()
        .unwrap_or_else(|| panic!("not a ballot error: {:#}", err))
}

fn applied_id(outcome: GatewayOutcome) -> i64 {
    match outcome {
        GatewayOutcome::Applied(applied) => applied.entity_id,
        GatewayOutcome::Deferred(pending) => panic!("deferred: {:?}", pending),
    }
}

fn deferred(outcome: GatewayOutcome) -> pending_action::Model {
    match outcome {
        GatewayOutcome::Deferred(pending) => pending,
        GatewayOutcome::Applied(applied) => panic!("applied: {:?}", applied),
    }
}

/// Region and subregion created directly by SuperAdmin.
async fn seed_subregion(db: &DatabaseConnection) -> (i64, i64) {
    let catalog = catalog();
    let admin = super_admin();

    let region = applied_id(
        gateway::submit(
            db,
            &catalog,
            &admin,
            MutationRequest::create(EntityKind::Region, None, json!({"name": "Northern"})),
        )
        .await
        .unwrap(),
    );
    let subregion = applied_id(
        gateway::submit(
            db,
            &catalog,
            &admin,
            MutationRequest::create(
                EntityKind::Subregion,
                None,
                json!({"name": "Acholi", "parentId": region}),
            ),
        )
        .await
        .unwrap(),
    );

    (region, subregion)
}

fn approve() -> PendingDecisionRequest {
    PendingDecisionRequest {
        status: PendingStatus::Approved,
        data: None,
    }
}

#[tokio::test]
async fn test_super_admin_writes_apply_with_audit() {
    let db = setup().await;
    let (region, subregion) = seed_subregion(&db).await;

    let unit = admin_unit::get(&db, AdminLevel::Subregion, subregion).await.unwrap();
    assert_eq!(unit.parent_id, Some(region));
    assert_eq!(unit.status, RecordStatus::Approved);
    assert_eq!(unit.approved_by, Some(SUPER_ADMIN_ID));

    let trail = audit::search_page(
        &db,
        &AuditQuery {
            entity_type: Some("subregions".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(trail.total_count, 1);
    let entry = &trail.page_items[0];
    assert_eq!(entry.action_type, "CREATE");
    assert_eq!(entry.entity_id, subregion);
    assert_eq!(entry.old_data, None);
    assert!(entry.new_data.as_deref().unwrap().contains("Acholi"));
    assert_eq!(entry.pending_action_id, None);

    assert_eq!(pending_action::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_proposal_is_deferred_then_approved() {
    let db = setup().await;
    let catalog = catalog();
    let (_, subregion) = seed_subregion(&db).await;

    let pending = deferred(
        gateway::submit(
            &db,
            &catalog,
            &coordinator(),
            MutationRequest::create(
                EntityKind::District,
                None,
                json!({"name": "Gulu", "parentId": subregion}),
            ),
        )
        .await
        .unwrap(),
    );
    assert_eq!(pending.status, PendingStatus::Pending);
    assert_eq!(pending.entity_type, "districts");
    assert_eq!(pending.requested_by, COORDINATOR_ID);
    assert_eq!(
        administrative_unit::Entity::find().count(&db).await.unwrap(),
        2,
        "nothing is written before approval"
    );

    let decided = approval::decide(&db, &catalog, pending.id, &approve(), &super_admin())
        .await
        .unwrap();
    assert_eq!(decided.status, PendingStatus::Approved);
    assert_eq!(decided.approved_by, Some(SUPER_ADMIN_ID));
    assert!(decided.decided_at.is_some());

    let district_id = decided.entity_id.unwrap();
    let district = admin_unit::get(&db, AdminLevel::District, district_id).await.unwrap();
    assert_eq!(district.name, "Gulu");
    assert_eq!(district.status, RecordStatus::Approved);
    assert_eq!(district.created_by, Some(COORDINATOR_ID));
    assert_eq!(district.approved_by, Some(SUPER_ADMIN_ID));

    let entries = audit_trail::Entity::find().all(&db).await.unwrap();
    let entry = entries
        .iter()
        .find(|entry| entry.pending_action_id == Some(pending.id))
        .unwrap();
    assert_eq!(entry.entity_type, "districts");
    assert_eq!(entry.entity_id, district_id);
    assert_eq!(entry.action_by, SUPER_ADMIN_ID);
    assert_eq!(entry.status, "APPROVED");
}

#[tokio::test]
async fn test_second_decision_is_already_processed() {
    let db = setup().await;
    let catalog = catalog();
    let (_, subregion) = seed_subregion(&db).await;

    let pending = deferred(
        gateway::submit(
            &db,
            &catalog,
            &registra(),
            MutationRequest::create(
                EntityKind::District,
                None,
                json!({"name": "Kitgum", "parentId": subregion}),
            ),
        )
        .await
        .unwrap(),
    );

    approval::decide(&db, &catalog, pending.id, &approve(), &super_admin())
        .await
        .unwrap();

    let err = approval::decide(&db, &catalog, pending.id, &approve(), &super_admin())
        .await
        .unwrap_err();
    assert_eq!(ballot_error(&err), BallotError::AlreadyProcessed(pending.id));

    let reject = PendingDecisionRequest {
        status: PendingStatus::Rejected,
        data: None,
    };
    let err = approval::decide(&db, &catalog, pending.id, &reject, &super_admin())
        .await
        .unwrap_err();
    assert_eq!(ballot_error(&err), BallotError::AlreadyProcessed(pending.id));

    let districts = admin_unit::search_page(&db, AdminLevel::District, &Default::default())
        .await
        .unwrap();
    assert_eq!(districts.total_count, 1, "the proposal is applied exactly once");
}

#[tokio::test]
async fn test_reject_leaves_entities_untouched() {
    let db = setup().await;
    let catalog = catalog();
    let (_, subregion) = seed_subregion(&db).await;

    let pending = deferred(
        gateway::submit(
            &db,
            &catalog,
            &coordinator(),
            MutationRequest::create(
                EntityKind::District,
                None,
                json!({"name": "Amuru", "parentId": subregion}),
            ),
        )
        .await
        .unwrap(),
    );

    let reject = PendingDecisionRequest {
        status: PendingStatus::Rejected,
        data: None,
    };
    let decided = approval::decide(&db, &catalog, pending.id, &reject, &super_admin())
        .await
        .unwrap();
    assert_eq!(decided.status, PendingStatus::Rejected);
    assert_eq!(decided.entity_id, None);

    let districts = admin_unit::search_page(&db, AdminLevel::District, &Default::default())
        .await
        .unwrap();
    assert_eq!(districts.total_count, 0);
}

#[tokio::test]
async fn test_failed_replay_keeps_action_pending() {
    let db = setup().await;
    let catalog = catalog();
    seed_subregion(&db).await;
    let audit_rows = audit_trail::Entity::find().count(&db).await.unwrap();

    // The parent does not exist, which only the replay can notice
    let pending = deferred(
        gateway::submit(
            &db,
            &catalog,
            &coordinator(),
            MutationRequest::create(
                EntityKind::District,
                None,
                json!({"name": "Nwoya", "parentId": 999}),
            ),
        )
        .await
        .unwrap(),
    );

    let err = approval::decide(&db, &catalog, pending.id, &approve(), &super_admin())
        .await
        .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Validation(_)));

    let reloaded = pending_store::get(&db, pending.id).await.unwrap();
    assert_eq!(reloaded.status, PendingStatus::Pending);
    assert_eq!(reloaded.approved_by, None);
    assert_eq!(
        audit_trail::Entity::find().count(&db).await.unwrap(),
        audit_rows,
        "no audit row for a rolled back approval"
    );
}

#[tokio::test]
async fn test_approval_with_replacement_data() {
    let db = setup().await;
    let catalog = catalog();
    let (_, subregion) = seed_subregion(&db).await;

    let pending = deferred(
        gateway::submit(
            &db,
            &catalog,
            &coordinator(),
            MutationRequest::create(
                EntityKind::District,
                None,
                json!({"name": "Guluu", "parentId": subregion}),
            ),
        )
        .await
        .unwrap(),
    );

    let decision = PendingDecisionRequest {
        status: PendingStatus::Approved,
        data: Some(json!({"name": "Gulu", "parentId": subregion})),
    };
    let decided = approval::decide(&db, &catalog, pending.id, &decision, &super_admin())
        .await
        .unwrap();

    let district = admin_unit::get(&db, AdminLevel::District, decided.entity_id.unwrap())
        .await
        .unwrap();
    assert_eq!(district.name, "Gulu");
    assert!(decided.data.contains("\"Gulu\""));
}

#[tokio::test]
async fn test_proposals_against_approved_records_are_forbidden() {
    let db = setup().await;
    let catalog = catalog();
    let (region, _) = seed_subregion(&db).await;

    let err = gateway::submit(
        &db,
        &catalog,
        &registra(),
        MutationRequest::update(EntityKind::Region, None, region, json!({"name": "North"})),
    )
    .await
    .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Forbidden(_)));

    let err = gateway::submit(
        &db,
        &catalog,
        &coordinator(),
        MutationRequest::delete(EntityKind::Region, None, region),
    )
    .await
    .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Forbidden(_)));

    assert_eq!(pending_action::Entity::find().count(&db).await.unwrap(), 0);
    let unit = admin_unit::get(&db, AdminLevel::Region, region).await.unwrap();
    assert_eq!(unit.name, "Northern");
}

#[tokio::test]
async fn test_proposals_against_pending_records_are_queued() {
    let db = setup().await;
    let catalog = catalog();

    let region = applied_id(
        gateway::submit(
            &db,
            &catalog,
            &super_admin(),
            MutationRequest::create(
                EntityKind::Region,
                None,
                json!({"name": "Western", "status": "pending"}),
            ),
        )
        .await
        .unwrap(),
    );
    let unit = admin_unit::get(&db, AdminLevel::Region, region).await.unwrap();
    assert_eq!(unit.status, RecordStatus::Pending);
    assert_eq!(unit.approved_by, None);

    let pending = deferred(
        gateway::submit(
            &db,
            &catalog,
            &coordinator(),
            MutationRequest::update(EntityKind::Region, None, region, json!({"name": "West"})),
        )
        .await
        .unwrap(),
    );
    assert_eq!(pending.action_type, PendingActionType::Update);
    assert_eq!(pending.entity_id, Some(region));

    approval::decide(&db, &catalog, pending.id, &approve(), &super_admin())
        .await
        .unwrap();
    let unit = admin_unit::get(&db, AdminLevel::Region, region).await.unwrap();
    assert_eq!(unit.name, "West");
    assert_eq!(unit.updated_by, Some(SUPER_ADMIN_ID));

    let approved = admin_unit::approve(&db, AdminLevel::Region, region, &super_admin())
        .await
        .unwrap();
    assert_eq!(approved.status, RecordStatus::Approved);

    let err = admin_unit::approve(&db, AdminLevel::Region, region, &super_admin())
        .await
        .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Conflict(_)));
}

#[tokio::test]
async fn test_roles_without_write_access_are_denied() {
    let db = setup().await;
    let catalog = catalog();

    for actor in [accountant(), peo()] {
        let err = gateway::submit(
            &db,
            &catalog,
            &actor,
            MutationRequest::create(EntityKind::Region, None, json!({"name": "Central"})),
        )
        .await
        .unwrap_err();
        assert!(matches!(ballot_error(&err), BallotError::Forbidden(_)));
    }

    let pending = deferred(
        gateway::submit(
            &db,
            &catalog,
            &coordinator(),
            MutationRequest::create(EntityKind::Region, None, json!({"name": "Central"})),
        )
        .await
        .unwrap(),
    );
    let err = approval::decide(&db, &catalog, pending.id, &approve(), &coordinator())
        .await
        .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Forbidden(_)));
}

#[tokio::test]
async fn test_invalid_proposals_are_rejected_before_queueing() {
    let db = setup().await;
    let catalog = catalog();

    let err = gateway::submit(
        &db,
        &catalog,
        &coordinator(),
        MutationRequest::create(EntityKind::Region, None, json!({"code": "N"})),
    )
    .await
    .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Validation(_)));

    let err = gateway::submit(
        &db,
        &catalog,
        &coordinator(),
        MutationRequest::create(
            EntityKind::ElectoralPosition,
            None,
            json!({
                "ninNumber": "CM90012345ABCD",
                "firstName": "Okello",
                "lastName": "Peter",
                "electionType": "PRIMARIES",
                "level": "VILLAGE_CELL",
                "category": "SIG_COMMITTEE",
                "year": 2026
            }),
        ),
    )
    .await
    .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Position(_)));

    assert_eq!(pending_action::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_pending_action_listing() {
    let db = setup().await;
    let catalog = catalog();

    for name in ["Central", "Eastern", "Karamoja"] {
        gateway::submit(
            &db,
            &catalog,
            &coordinator(),
            MutationRequest::create(EntityKind::Region, None, json!({ "name": name })),
        )
        .await
        .unwrap();
    }
    let first = pending_store::search_page(&db, &PendingActionQuery::default())
        .await
        .unwrap()
        .page_items[0]
        .id;
    approval::decide(&db, &catalog, first, &approve(), &super_admin())
        .await
        .unwrap();

    let waiting = pending_store::search_page(
        &db,
        &PendingActionQuery {
            status: Some(PendingStatus::Pending),
            page_size: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(waiting.total_count, 2);
    assert_eq!(waiting.pages_available, 2);
    assert_eq!(waiting.page_items.len(), 1);
}

#[tokio::test]
async fn test_units_with_children_cannot_be_deleted() {
    let db = setup().await;
    let catalog = catalog();
    let (region, subregion) = seed_subregion(&db).await;

    let err = gateway::submit(
        &db,
        &catalog,
        &super_admin(),
        MutationRequest::delete(EntityKind::Region, None, region),
    )
    .await
    .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Conflict(_)));

    gateway::submit(
        &db,
        &catalog,
        &super_admin(),
        MutationRequest::delete(EntityKind::Subregion, None, subregion),
    )
    .await
    .unwrap();
    assert!(
        admin_unit::find(&db, AdminLevel::Subregion, subregion)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_sibling_names_are_unique() {
    let db = setup().await;
    let catalog = catalog();
    let (region, _) = seed_subregion(&db).await;

    let err = gateway::submit(
        &db,
        &catalog,
        &super_admin(),
        MutationRequest::create(
            EntityKind::Subregion,
            None,
            json!({"name": "Acholi", "parentId": region}),
        ),
    )
    .await
    .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Conflict(_)));
}

#[tokio::test]
async fn test_registrar_proposal_round_trip() {
    let db = setup().await;
    let catalog = catalog();
    let (_, subregion) = seed_subregion(&db).await;
    let scope = UnitScope::new(AdminLevel::Subregion, subregion);

    let pending = deferred(
        gateway::submit(
            &db,
            &catalog,
            &coordinator(),
            MutationRequest::create(
                EntityKind::Registrar,
                Some(scope),
                json!({
                    "firstName": "Akello",
                    "lastName": "Grace",
                    "ninNumber": "CF85034567XYZW",
                    "phoneNumber": "+256772000111"
                }),
            ),
        )
        .await
        .unwrap(),
    );
    assert_eq!(pending.scope_id, Some(subregion));
    assert_eq!(pending.scope_level, Some(AdminLevel::Subregion));
    assert_eq!(pending.entity_type, "registrars");
    assert_eq!(pending_store::to_request(&pending).unwrap().scope, Some(scope));

    let decided = approval::decide(&db, &catalog, pending.id, &approve(), &super_admin())
        .await
        .unwrap();
    let registrars = registrar::list(&db, scope).await.unwrap();
    assert_eq!(registrars.len(), 1);
    assert_eq!(Some(registrars[0].id), decided.entity_id);
    assert_eq!(registrars[0].created_by, Some(COORDINATOR_ID));

    // Approved registrars can no longer be changed through proposals
    let err = gateway::submit(
        &db,
        &catalog,
        &coordinator(),
        MutationRequest::delete(EntityKind::Registrar, Some(scope), registrars[0].id),
    )
    .await
    .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::Forbidden(_)));
}

#[tokio::test]
async fn test_registrar_scope_must_match_unit_level() {
    let db = setup().await;
    let catalog = catalog();
    let (region, subregion) = seed_subregion(&db).await;

    // A region id under the district scope names no district
    let err = gateway::submit(
        &db,
        &catalog,
        &super_admin(),
        MutationRequest::create(
            EntityKind::Registrar,
            Some(UnitScope::new(AdminLevel::District, region)),
            json!({
                "firstName": "Akello",
                "lastName": "Grace",
                "ninNumber": "CF85034567XYZW",
                "phoneNumber": "+256772000111"
            }),
        ),
    )
    .await
    .unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::NotFound { .. }));

    let created = applied_id(
        gateway::submit(
            &db,
            &catalog,
            &super_admin(),
            MutationRequest::create(
                EntityKind::Registrar,
                Some(UnitScope::new(AdminLevel::Subregion, subregion)),
                json!({
                    "firstName": "Akello",
                    "lastName": "Grace",
                    "ninNumber": "CF85034567XYZW",
                    "phoneNumber": "+256772000111"
                }),
            ),
        )
        .await
        .unwrap(),
    );

    let wrong_level = UnitScope::new(AdminLevel::Region, subregion);
    assert!(registrar::list(&db, wrong_level).await.is_err());
    let err = registrar::get(&db, wrong_level, created).await.unwrap_err();
    assert!(matches!(ballot_error(&err), BallotError::NotFound { .. }));
    assert!(
        registrar::get(&db, UnitScope::new(AdminLevel::Subregion, subregion), created)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_approved_electoral_position_reuses_candidate() {
    let db = setup().await;
    let catalog = catalog();

    let proposal = |position: &str| {
        MutationRequest::create(
            EntityKind::ElectoralPosition,
            None,
            json!({
                "ninNumber": "CM90012345ABCD",
                "firstName": "Okello",
                "lastName": "Peter",
                "electionType": "PRIMARIES",
                "level": "VILLAGE_CELL",
                "category": "SIG_COMMITTEE",
                "subcategory": "YOUTH",
                "position": position,
                "year": 2026,
                "villageCellId": 77
            }),
        )
    };

    let pending = deferred(
        gateway::submit(&db, &catalog, &coordinator(), proposal("CHAIRPERSON"))
            .await
            .unwrap(),
    );
    assert_eq!(pending.entity_type, "electoral-positions");
    assert_eq!(candidate::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(candidate_participation::Entity::find().count(&db).await.unwrap(), 0);

    let decided = approval::decide(&db, &catalog, pending.id, &approve(), &super_admin())
        .await
        .unwrap();
    assert_eq!(decided.status, PendingStatus::Approved);

    let candidates = candidate::Entity::find().all(&db).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].nin_number, "CM90012345ABCD");

    let chair = candidate_participation::Entity::find_by_id(decided.entity_id.unwrap())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chair.candidate_id, candidates[0].id);
    assert_eq!(
        chair.position_path,
        "PRIMARIES.VILLAGE_CELL.SIG_COMMITTEE.YOUTH.CHAIRPERSON"
    );
    assert_eq!(chair.status, RecordStatus::Approved);
    assert_eq!(chair.created_by, Some(COORDINATOR_ID));
    assert_eq!(chair.approved_by, Some(SUPER_ADMIN_ID));
    assert!(!chair.is_nominated);

    let audit_rows = audit_trail::Entity::find().all(&db).await.unwrap();
    assert_eq!(audit_rows.len(), 1);
    assert_eq!(audit_rows[0].entity_id, chair.id);
    assert_eq!(audit_rows[0].pending_action_id, Some(pending.id));

    // A second proposal for the same NIN attaches to the existing candidate
    let pending = deferred(
        gateway::submit(&db, &catalog, &registra(), proposal("SECRETARY"))
            .await
            .unwrap(),
    );
    let decided = approval::decide(&db, &catalog, pending.id, &approve(), &super_admin())
        .await
        .unwrap();

    assert_eq!(candidate::Entity::find().count(&db).await.unwrap(), 1);
    let secretary = candidate_participation::Entity::find_by_id(decided.entity_id.unwrap())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(secretary.candidate_id, candidates[0].id);
    assert_eq!(secretary.position, "SECRETARY");
    assert_eq!(secretary.created_by, Some(REGISTRA_ID));
    assert_eq!(candidate_participation::Entity::find().count(&db).await.unwrap(), 2);
}
