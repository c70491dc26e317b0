//! Integration tests for permission gates and tiered routes.

mod helpers;

use http::StatusCode;

use warden_entity::user::User;
use warden_store::traits::DocumentStore;

#[tokio::test]
async fn test_user_listing_tiers() {
    let app = helpers::TestApp::new().await;
    app.create_user("alice", "secret", &["manageUsers"]).await;
    app.create_user("bob", "pw", &["dev"]).await;

    let alice = app.login("alice", "secret").await;
    let full = app
        .request("GET", "/api/v1/users", None, Some(&alice))
        .await;
    assert_eq!(full.status, StatusCode::OK);
    let users = full.json();
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users[0].get("username").is_some());
    assert!(users[0].get("password_hash").is_none());
    assert!(users[0].get("current_token").is_none());

    let bob = app.login("bob", "pw").await;
    let summary = app.request("GET", "/api/v1/users", None, Some(&bob)).await;
    assert_eq!(summary.status, StatusCode::OK);
    let users = summary.json();
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users[0].get("id").is_some());
    assert!(users[0].get("username").is_none());
}

#[tokio::test]
async fn test_single_tier_route_exhausted_is_unauthorized() {
    let app = helpers::TestApp::new().await;
    app.create_user("alice", "secret", &["manageUsers"]).await;
    app.create_user("carol", "pw", &["manageRoles"]).await;

    let alice = app.login("alice", "secret").await;
    let denied = app
        .request("GET", "/api/v1/roles/permissions", None, Some(&alice))
        .await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);

    let carol = app.login("carol", "pw").await;
    let catalog = app
        .request("GET", "/api/v1/roles/permissions", None, Some(&carol))
        .await;
    assert_eq!(catalog.status, StatusCode::OK);
    let body = catalog.json();
    assert_eq!(body[0]["category"], "General");
    assert_eq!(body[1]["children"][1]["value"], "manageUsers");
}

#[tokio::test]
async fn test_user_without_roles_is_integrity_error() {
    let app = helpers::TestApp::new().await;
    app.insert_user(User::new("orphan", app.hash("pw"), vec![]))
        .await;

    let token = app.login("orphan", "pw").await;
    let response = app
        .request("GET", "/api/v1/users", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json()["message"],
        "server error checking role permissions"
    );
}

#[tokio::test]
async fn test_permissions_reflect_role_edits() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_user("alice", "secret", &["dev"]).await;
    let token = app.login("alice", "secret").await;

    let before = app
        .request("GET", "/api/v1/auth/permissions", None, Some(&token))
        .await;
    assert_eq!(before.json(), serde_json::json!(["dev"]));

    let role = app.store.find_roles(&alice.role_ids).await.unwrap().remove(0);
    app.store
        .upsert_role(&role.name, "", &["manageUsers"])
        .await
        .unwrap();

    let after = app
        .request("GET", "/api/v1/auth/permissions", None, Some(&token))
        .await;
    assert_eq!(after.json(), serde_json::json!(["dev", "manageUsers"]));

    let listing = app
        .request("GET", "/api/v1/users", None, Some(&token))
        .await;
    assert!(listing.json()[0].get("username").is_some());
}

#[tokio::test]
async fn test_profile_lists_roles_and_permissions() {
    let app = helpers::TestApp::new().await;
    app.create_user("alice", "secret", &["manageUsers", "dev"]).await;
    let token = app.login("alice", "secret").await;

    let me = app
        .request("GET", "/api/v1/users/me", None, Some(&token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    let body = me.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["roles"], serde_json::json!(["alice-role"]));
    assert_eq!(body["permissions"], serde_json::json!(["dev", "manageUsers"]));
    assert!(body["first_login_at"].is_string());
}
