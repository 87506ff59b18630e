//! Matching and invitation flow through the HTTP API

mod common;

use axum::http::StatusCode;
use common::TestApp;
use linguabridge::db::repositories::EmailRepository;

#[tokio::test]
async fn test_onsite_radius_is_tighter_of_request_and_travel_limit() {
    let app = TestApp::new().await;
    let customer = app.create_customer("Broward Legal", "intake@browardlegal.test").await;
    let near = app.create_interpreter("Alvarez", 10.0, 50.0).await;
    app.create_interpreter("Brown", 40.0, 30.0).await;
    app.create_interpreter("Chen", 60.0, 100.0).await;

    let (quote_id, _) = app.create_onsite_quote(&customer).await;
    let project_id = app.paid_project(&quote_id).await;

    let (status, body) = app
        .post_empty(&format!("/api/v1/projects/{}/matches?max_distance_miles=50", project_id))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let candidates = body["data"]["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["linguist"]["id"], near.as_str());
    let distance = candidates[0]["distance_miles"].as_f64().unwrap();
    assert!((distance - 10.0).abs() < 0.01, "distance {}", distance);
}

#[tokio::test]
async fn test_wider_radius_uses_config_default() {
    let app = TestApp::new().await;
    let customer = app.create_customer("Broward Legal", "intake@browardlegal.test").await;
    app.create_interpreter("Alvarez", 10.0, 50.0).await;
    app.create_interpreter("Chen", 60.0, 100.0).await;

    let (quote_id, _) = app.create_onsite_quote(&customer).await;
    let project_id = app.paid_project(&quote_id).await;

    let (_, body) = app
        .post_empty(&format!("/api/v1/projects/{}/matches?max_distance_miles=75", project_id))
        .await;
    let names: Vec<_> = body["data"]["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["linguist"]["last_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Alvarez", "Chen"]);

    let (_, body) = app
        .post_empty(&format!("/api/v1/projects/{}/matches", project_id))
        .await;
    assert_eq!(body["data"]["max_distance_miles"].as_f64(), Some(50.0));
    assert_eq!(body["data"]["candidates"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invitation_acceptance_is_exclusive() {
    let app = TestApp::new().await;
    let customer = app.create_customer("Broward Legal", "intake@browardlegal.test").await;
    let first = app.create_interpreter("Alvarez", 5.0, 50.0).await;
    app.create_interpreter("Baptiste", 12.0, 50.0).await;

    let (quote_id, _) = app.create_onsite_quote(&customer).await;
    let project_id = app.paid_project(&quote_id).await;

    let (status, body) = app
        .post_empty(&format!("/api/v1/projects/{}/invitations", project_id))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["sent"], 2);
    let invitations = body["data"]["invitations"].as_array().unwrap().clone();

    let token_for = |linguist: &str| {
        invitations
            .iter()
            .find(|i| i["linguist_id"] == linguist)
            .map(|i| i["token"].as_str().unwrap().to_string())
            .unwrap()
    };
    let winner = token_for(&first);
    let loser = invitations
        .iter()
        .find(|i| i["linguist_id"] != first.as_str())
        .map(|i| i["token"].as_str().unwrap().to_string())
        .unwrap();

    let queued = EmailRepository::list_for_recipient(app.db.pool(), "alvarez@linguists.test")
        .await
        .unwrap();
    assert!(queued.iter().any(|e| e.body.contains(&winner)));

    let (status, body) = app
        .post_empty(&format!("/api/v1/invitations/{}/accept", winner))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["project"]["status"], "assigned");
    assert_eq!(body["data"]["project"]["linguist_id"], first.as_str());
    assert_eq!(body["data"]["expired_others"], 1);
    assert!(body["data"]["purchase_order"]["po_number"]
        .as_str()
        .unwrap()
        .starts_with("PO-"));

    let (status, body) = app
        .post_empty(&format!("/api/v1/invitations/{}/accept", loser))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (_, body) = app
        .get(&format!("/api/v1/projects/{}/invitations", project_id))
        .await;
    let statuses: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["ACCEPTED", "EXPIRED"]);

    let (_, body) = app
        .get(&format!("/api/v1/projects/{}/purchase-orders", project_id))
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .post_empty(&format!("/api/v1/projects/{}/invitations", project_id))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_decline_and_unknown_token() {
    let app = TestApp::new().await;
    let customer = app.create_customer("Broward Legal", "intake@browardlegal.test").await;
    app.create_interpreter("Alvarez", 5.0, 50.0).await;

    let (quote_id, _) = app.create_onsite_quote(&customer).await;
    let project_id = app.paid_project(&quote_id).await;

    let (_, body) = app
        .post_empty(&format!("/api/v1/projects/{}/invitations", project_id))
        .await;
    let token = body["data"]["invitations"][0]["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .post_empty(&format!("/api/v1/invitations/{}/decline", token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "DECLINED");

    let (status, _) = app
        .post_empty(&format!("/api/v1/invitations/{}/accept", token))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.post_empty("/api/v1/invitations/no-such-token/accept").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
