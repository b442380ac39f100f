mod common;

use axum::http::StatusCode;
use common::{json_request, login, read_json, send, test_app};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_needs_no_token() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(json_request("GET", "/v1/system/health", None, None))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "ok");
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() {
    let app = test_app().await;

    let (status, body) = send(&app, json_request("GET", "/v1/inventory", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = send(&app, json_request("GET", "/v1/inventory", Some("nope"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_me_logout() {
    let app = test_app().await;
    let token = login(&app, "TECH@example.com").await;

    let (status, me) = send(&app, json_request("GET", "/v1/auth/me", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "tech@example.com");
    assert!(me.get("password_hash").is_none());

    let (status, _) = send(&app, json_request("POST", "/v1/auth/logout", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, json_request("GET", "/v1/auth/me", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "tech@example.com", "password": "wrong-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_admin_requires_admin_role() {
    let app = test_app().await;
    let tech = login(&app, "tech@example.com").await;
    let admin = login(&app, "admin@example.com").await;

    let (status, _) = send(&app, json_request("GET", "/v1/users", Some(&tech), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, json_request("GET", "/v1/users", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/v1/users",
            Some(&admin),
            Some(json!({
                "email": "eng@example.com",
                "display_name": "Engineer",
                "role": "engineer",
                "password": "secret-pass"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/users",
            Some(&admin),
            Some(json!({ "email": "ENG@example.com", "display_name": "Again", "role": "engineer" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/v1/users/{}", created["id"]);
    let (status, _) = send(&app, json_request("DELETE", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn inventory_crud_and_low_stock() {
    let app = test_app().await;
    let token = login(&app, "tech@example.com").await;

    let (status, item) = send(
        &app,
        json_request(
            "POST",
            "/v1/inventory",
            Some(&token),
            Some(json!({
                "name": "AHU Filter",
                "category": "HVAC",
                "current_stock": 3,
                "min_stock": 10,
                "max_stock": 50
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["unit"], "pcs");
    let uri = format!("/v1/inventory/{}", item["id"]);

    let (status, low) =
        send(&app, json_request("GET", "/v1/inventory/low-stock", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(low["items"][0]["name"], "AHU Filter");
    assert_eq!(low["items"][0]["urgency"], "critical");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("{uri}/stock"),
            Some(&token),
            Some(json!({ "change": -5, "reason": "too many" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "insufficient_stock");

    let (status, updated) = send(
        &app,
        json_request(
            "POST",
            &format!("{uri}/stock"),
            Some(&token),
            Some(json!({ "change": 20, "requisition_type": "return", "reason": "delivery" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["current_stock"], 23);

    let (status, _) = send(&app, json_request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, json_request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn collection_adjustment_by_name() {
    let app = test_app().await;
    let token = login(&app, "tech@example.com").await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/v1/collections/ppeItems",
            Some(&token),
            Some(json!({ "items": [
                { "name": "Gloves", "quantity": 10 },
                { "name": "Helmet", "quantity": 2 }
            ] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/quantity/adjust",
            Some(&token),
            Some(json!({
                "category": "ppe",
                "item_name": "gloves",
                "requisition_type": "issue",
                "quantity": 3
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adjusted"], true);
    assert_eq!(body["adjustment"]["previous_quantity"], 10);
    assert_eq!(body["adjustment"]["new_quantity"], 7);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/quantity/adjust",
            Some(&token),
            Some(json!({
                "category": "ppe",
                "item_name": "Boots",
                "requisition_type": "issue",
                "quantity": 1
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adjusted"], false);

    let (_, ppe) =
        send(&app, json_request("GET", "/v1/collections/ppeItems", Some(&token), None)).await;
    assert_eq!(ppe["items"][0]["quantity"], 7);
    assert_eq!(ppe["items"][1]["quantity"], 2);

    let (_, ledger) = send(
        &app,
        json_request("GET", "/v1/quantity/updates?item_name=Gloves", Some(&token), None),
    )
    .await;
    assert_eq!(ledger["items"].as_array().map(Vec::len), Some(1));

    let (status, _) =
        send(&app, json_request("GET", "/v1/collections/gadgets", Some(&token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn requisition_completion_moves_stock_once() {
    let app = test_app().await;
    let token = login(&app, "tech@example.com").await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/spare-parts",
            Some(&token),
            Some(json!({ "name": "Step Chain", "quantity": 8, "location": "Store A" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, requisition) = send(
        &app,
        json_request(
            "POST",
            "/v1/requisitions",
            Some(&token),
            Some(json!({
                "item_type": "spare_parts",
                "item_name": "STEP CHAIN",
                "quantity": 3,
                "requisition_type": "issue",
                "reason": "escalator 4 repair"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(requisition["status"], "pending");
    assert!(requisition["reference_number"].as_str().is_some_and(|r| r.starts_with("REQ-")));

    let uri = format!("/v1/requisitions/{}", requisition["id"]);
    let (status, completion) =
        send(&app, json_request("POST", &format!("{uri}/complete"), Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completion["requisition"]["status"], "completed");
    assert_eq!(completion["adjustment"]["new_quantity"], 5);

    let (status, body) =
        send(&app, json_request("POST", &format!("{uri}/complete"), Some(&token), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalid_state");

    let (_, stats) =
        send(&app, json_request("GET", "/v1/stats/dashboard", Some(&token), None)).await;
    assert_eq!(stats["spare_parts_total_quantity"], 5);

    let (_, notifications) =
        send(&app, json_request("GET", "/v1/notifications", Some(&token), None)).await;
    assert!(notifications["items"].as_array().is_some_and(|n| !n.is_empty()));

    let (_, sync) = send(&app, json_request("GET", "/v1/sync", Some(&token), None)).await;
    assert!(sync["revision"].as_u64().is_some_and(|r| r >= 2));
}

#[tokio::test]
async fn gate_pass_decision_happens_once() {
    let app = test_app().await;
    let token = login(&app, "admin@example.com").await;

    let (status, pass) = send(
        &app,
        json_request(
            "POST",
            "/v1/gate-passes",
            Some(&token),
            Some(json!({
                "destination": "Depot B",
                "items_description": "2x drill",
                "receiver": { "name": "Ali", "department": "Track" }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pass["approval_status"], "pending");

    let uri = format!("/v1/gate-passes/{}/decision", pass["id"]);
    let (status, decided) = send(
        &app,
        json_request("POST", &uri, Some(&token), Some(json!({ "decision": "approved" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["approved_by"], "Test admin");

    let (status, _) = send(
        &app,
        json_request("POST", &uri, Some(&token), Some(json!({ "decision": "rejected" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn issuance_requisition_lifecycle() {
    let app = test_app().await;
    let token = login(&app, "tech@example.com").await;

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/v1/issuance-requisitions",
            Some(&token),
            Some(json!({
                "department": "Lift Maintenance",
                "required_date": "2026-11-01",
                "items": [
                    { "item_code": "EM-1", "item_description": "Door roller", "unit": "pcs", "quantity": 4 }
                ]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["requisition_number"].as_str().is_some_and(|n| n.starts_with("IR-")));

    let uri = format!("/v1/issuance-requisitions/{}", created["id"]);
    let (status, updated) = send(
        &app,
        json_request("PATCH", &uri, Some(&token), Some(json!({ "status": "completed" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");

    let (status, body) = send(
        &app,
        json_request("PATCH", &uri, Some(&token), Some(json!({ "priority": "high" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalid_state");

    let (_, counts) = send(
        &app,
        json_request("GET", "/v1/issuance-requisitions/counts", Some(&token), None),
    )
    .await;
    assert_eq!(counts["completed"], 1);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/issuance-requisitions",
            Some(&token),
            Some(json!({ "department": "Power", "items": [] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
