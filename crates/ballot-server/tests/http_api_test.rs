// HTTP API tests driving the real routes, middleware and error mapping

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use ballot_persistence::Role;

use common::*;

/// Send a request and read back status and JSON body.
macro_rules! call {
    ($app: expr, $req: expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn get(uri: &str, token: &str) -> TestRequest {
    TestRequest::get().uri(uri).insert_header(bearer(token))
}

fn post(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

fn put(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::put()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

#[actix_web::test]
async fn test_missing_token_is_rejected() {
    let state = setup().await;
    let app = init_app!(state);

    let (status, body) = call!(app, TestRequest::get().uri("/api/regions"));

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
    assert_eq!(body["status"], 401);
}

#[actix_web::test]
async fn test_expired_and_forged_tokens_are_rejected() {
    let state = setup().await;
    let admin = create_user(&state, "admin@ballot.test", Role::SuperAdmin).await;
    let app = init_app!(state);

    let (status, body) = call!(app, get("/api/regions", &expired_token_for(&admin)));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_EXPIRED");

    let forged = format!("{}x", token_for(&admin));
    let (status, body) = call!(app, get("/api/regions", &forged));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn test_login_and_me() {
    let state = setup().await;
    create_user(&state, "registra@ballot.test", Role::DistrictRegistra).await;
    let app = init_app!(state);

    let (status, body) = call!(
        app,
        TestRequest::post().uri("/api/auth/login").set_json(json!({
            "email": "registra@ballot.test",
            "password": PASSWORD
        }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tokenType"], "Bearer");
    assert_eq!(body["data"]["expiresIn"], 3600);
    assert_eq!(body["data"]["user"]["role"], "DistrictRegistra");
    assert!(body["data"]["user"].get("password").is_none());

    let token = body["data"]["accessToken"].as_str().unwrap().to_string();
    let (status, body) = call!(app, get("/api/auth/me", &token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "registra@ballot.test");

    let (status, body) = call!(
        app,
        TestRequest::post().uri("/api/auth/login").set_json(json!({
            "email": "registra@ballot.test",
            "password": "wrong-password-1"
        }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[actix_web::test]
async fn test_proposed_update_waits_for_approval() {
    let state = setup().await;
    let staff = staff(&state).await;
    let app = init_app!(state);

    let (status, body) =
        call!(app, post("/api/regions", &staff.admin, json!({"name": "Northern"})));
    assert_eq!(status, StatusCode::CREATED);
    let region_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        post(
            "/api/subregions",
            &staff.admin,
            json!({"name": "Acholi", "parentId": region_id})
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    let subregion_id = body["data"]["id"].as_i64().unwrap();

    // Staged as a draft so coordinators may still propose changes to it
    let (status, body) = call!(
        app,
        post(
            "/api/districts",
            &staff.admin,
            json!({"name": "Gulu", "parentId": subregion_id, "status": "pending"})
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let district_id = body["data"]["id"].as_i64().unwrap();
    let district_uri = format!("/api/districts/{}", district_id);

    let (status, body) = call!(
        app,
        put(&district_uri, &staff.coordinator, json!({"name": "Gulu City"}))
    );
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["entityType"], "districts");
    let pending_id = body["data"]["pendingActionId"].as_i64().unwrap();

    let (_, body) = call!(app, get(&district_uri, &staff.coordinator));
    assert_eq!(body["data"]["name"], "Gulu");

    // Only SuperAdmin reviews the queue
    let (status, body) = call!(app, get("/api/pending-actions", &staff.coordinator));
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = call!(app, get("/api/pending-actions?status=PENDING", &staff.admin));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 1);

    let decision_uri = format!("/api/pending-actions/{}", pending_id);
    let (status, body) = call!(
        app,
        put(&decision_uri, &staff.admin, json!({"status": "APPROVED"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "APPROVED");

    let (_, body) = call!(app, get(&district_uri, &staff.admin));
    assert_eq!(body["data"]["name"], "Gulu City");

    let (status, body) = call!(
        app,
        put(&decision_uri, &staff.admin, json!({"status": "REJECTED"}))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_PROCESSED");

    let (status, body) = call!(
        app,
        get(
            &format!("/api/audit-trail?entityType=districts&entityId={}", district_id),
            &staff.admin
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 2);
}

#[actix_web::test]
async fn test_gateway_writes_need_a_writing_role() {
    let state = setup().await;
    let staff = staff(&state).await;
    let app = init_app!(state);

    for token in [&staff.accountant, &staff.peo] {
        let (status, body) = call!(app, post("/api/regions", token, json!({"name": "Eastern"})));
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    // Reading is open to every staff role
    let (status, body) = call!(app, get("/api/regions", &staff.peo));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 0);
}

#[actix_web::test]
async fn test_registrars_live_under_a_unit_of_the_route_level() {
    let state = setup().await;
    let staff = staff(&state).await;
    let app = init_app!(state);

    let (status, body) =
        call!(app, post("/api/regions", &staff.admin, json!({"name": "Western"})));
    assert_eq!(status, StatusCode::CREATED);
    let region_id = body["data"]["id"].as_i64().unwrap();

    // A region id is not a district id
    let district_registrars = format!("/api/districts/{}/registrars", region_id);
    let (status, body) = call!(
        app,
        post(&district_registrars, &staff.admin, json!({"name": "Okello", "nin": "CM123"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = call!(app, get(&district_registrars, &staff.admin));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let region_registrars = format!("/api/regions/{}/registrars", region_id);
    let (status, body) = call!(app, get(&region_registrars, &staff.admin));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[actix_web::test]
async fn test_nomination_requires_paid_fees() {
    let state = setup().await;
    let staff = staff(&state).await;
    let app = init_app!(state);

    let (status, body) = call!(
        app,
        post(
            "/api/electoral-positions",
            &staff.admin,
            json!({
                "ninNumber": "CM90012345ABCD",
                "firstName": "Okello",
                "lastName": "Peter",
                "electionType": "PRIMARIES",
                "level": "VILLAGE_CELL",
                "category": "SIG_COMMITTEE",
                "subcategory": "YOUTH",
                "position": "CHAIRPERSON",
                "year": 2026,
                "villageCellId": 77
            })
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["data"]["positionPath"],
        "PRIMARIES.VILLAGE_CELL.SIG_COMMITTEE.YOUTH.CHAIRPERSON"
    );
    let participation_id = body["data"]["id"].as_i64().unwrap();
    let candidate_id = body["data"]["candidateId"].as_i64().unwrap();

    let nominate = json!({
        "candidateId": candidate_id,
        "participationId": participation_id,
        "positionPath": "PRIMARIES.VILLAGE_CELL.SIG_COMMITTEE.YOUTH.CHAIRPERSON"
    });

    let (status, body) =
        call!(app, post("/api/nominations/nominate", &staff.registra, nominate.clone()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FEES_NOT_PAID");

    // Accountants record payments but do not nominate
    let (status, _) =
        call!(app, post("/api/nominations/nominate", &staff.accountant, nominate.clone()));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(
        app,
        post(
            "/api/payments",
            &staff.accountant,
            json!({
                "candidateParticipationId": participation_id,
                "amount": 20000,
                "paymentMethod": "mobile money"
            })
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "completed");

    let (status, body) = call!(app, post("/api/nominations/nominate", &staff.registra, nominate));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isNominated"], true);

    let (status, body) = call!(
        app,
        post(
            "/api/votes/record",
            &staff.peo,
            json!({"candidateParticipationId": participation_id, "votes": 120, "villageCellId": 77})
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["votes"], 120);
}

#[actix_web::test]
async fn test_position_resolution_preview() {
    let state = setup().await;
    let staff = staff(&state).await;
    let app = init_app!(state);

    let (status, body) = call!(app, get("/api/positions", &staff.peo));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["PRIMARIES"], json!(["DISTRICT", "VILLAGE_CELL"]));

    let (status, body) = call!(
        app,
        post(
            "/api/positions/resolve",
            &staff.registra,
            json!({
                "electionType": "PRIMARIES",
                "level": "VILLAGE_CELL",
                "category": "SIG_COMMITTEE"
            })
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "incomplete");
    assert_eq!(body["data"]["slot"], "subcategory");
    assert_eq!(body["data"]["prefix"], "PRIMARIES.VILLAGE_CELL.SIG_COMMITTEE");

    let (status, body) = call!(
        app,
        post(
            "/api/positions/resolve",
            &staff.registra,
            json!({"electionType": "PRIMARIES", "level": "VILLAGE_CELL", "category": "CATEGORY_X"})
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "resolved");
    assert_eq!(body["data"]["path"], "PRIMARIES.VILLAGE_CELL.CATEGORY_X");
    assert_eq!(body["data"]["position"], "CATEGORY_X");

    let (status, body) = call!(
        app,
        get(
            "/api/positions/options?electionType=PRIMARIES&level=VILLAGE_CELL&category=SIG_COMMITTEE&subcategory=YOUTH",
            &staff.registra
        )
    );
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["CHAIRPERSON", "SECRETARY"]);

    let (status, body) = call!(
        app,
        post(
            "/api/positions/resolve",
            &staff.registra,
            json!({"electionType": "PRIMARIES", "level": "VILLAGE_CELL", "category": "UNKNOWN"})
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_POSITION");
}

#[actix_web::test]
async fn test_malformed_body_is_a_validation_error() {
    let state = setup().await;
    let staff = staff(&state).await;
    let app = init_app!(state);

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/api/fees")
            .insert_header(bearer(&staff.admin))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"electionType\": ")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = call!(app, get("/api/districts/abc", &staff.admin));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_metrics_endpoint_is_public() {
    let state = setup().await;
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/metrics").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
