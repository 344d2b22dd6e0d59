//! Cascade-deletion integration tests.
//!
//! Deleting an account sweeps circles, friendships, and all dependent data,
//! releases the username reservation, and soft-resets the account document.
//! A persisted marker records the cascade's stage so an interrupted deletion
//! resumes where it stopped.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use ledgerly_core::{default_categories, CircleId, UserId, Username, DEFAULT_PRIMARY_COLOR};
use ledgerly_store::{DeletionMarker, DeletionStage, Store};
use serde_json::json;

#[tokio::test]
async fn cascade_sweeps_everything_and_resets_the_account() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;
    let bob = harness.create_user("bob").await;
    let carol = harness.create_user("carol").await;

    // Username, budget, friendship, shared circle
    harness
        .server
        .put("/v1/users/me/username")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "username": "alice" }))
        .await
        .assert_status_ok();
    harness
        .server
        .patch("/v1/users/me")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "budget_cents": 100_000, "budget_is_set": true }))
        .await
        .assert_status_ok();
    harness.befriend(&alice, &bob).await;

    let circle_id = harness.create_circle(&alice, "Trip").await;
    harness
        .server
        .post(&format!("/v1/circles/{circle_id}/join"))
        .add_header("authorization", harness.auth_header(&bob))
        .await
        .assert_status_ok();

    // Dependent data: transaction, recurring expense, settlement, a pending
    // friend request from carol (which also leaves alice a notification)
    harness
        .server
        .post("/v1/transactions")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({
            "amount_cents": 1_250,
            "category": "Food",
            "description": "Lunch",
        }))
        .await
        .assert_status_ok();
    harness
        .server
        .post("/v1/recurring-expenses")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({
            "amount_cents": 999,
            "category": "Entertainment",
            "description": "Streaming",
            "frequency": "monthly",
            "next_due": "2026-09-01T00:00:00Z",
        }))
        .await
        .assert_status_ok();
    harness
        .server
        .post("/v1/settlements")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "payee": bob, "amount_cents": 5_000 }))
        .await
        .assert_status_ok();
    harness
        .server
        .post("/v1/friends/requests")
        .add_header("authorization", harness.auth_header(&carol))
        .json(&json!({ "to": alice }))
        .await
        .assert_status_ok();

    assert!(!harness.store.notifications_for_user(&alice).unwrap().is_empty());

    // The cascade
    harness
        .server
        .delete("/v1/users/me")
        .add_header("authorization", harness.auth_header(&alice))
        .await
        .assert_status_ok();

    // Account document survives, soft-reset to registration defaults
    let user = harness.store.get_user(&alice).unwrap().unwrap();
    assert_eq!(user.display_name, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.budget_cents, 0);
    assert!(!user.budget_is_set);
    assert!(user.photo_url.is_none());
    assert!(user.username.is_none());
    assert_eq!(user.categories, default_categories());
    assert_eq!(user.primary_color, DEFAULT_PRIMARY_COLOR);

    // Username reservation released
    let username = Username::parse("alice").unwrap();
    assert_eq!(harness.store.get_username_owner(&username).unwrap(), None);

    // Friendships gone from both sides
    assert!(harness.store.friendships_for_user(&alice).unwrap().is_empty());
    assert!(harness.store.friendships_for_user(&bob).unwrap().is_empty());

    // Left the circle; bob's membership is intact and in sync
    let circle_id: CircleId = circle_id.parse().unwrap();
    let circle = harness.store.get_circle(&circle_id).unwrap().unwrap();
    assert_eq!(circle.member_ids, vec![bob]);
    assert!(!circle.members.contains_key(&alice));
    assert!(circle.members.contains_key(&bob));

    // Dependent data swept, including documents referencing other accounts
    assert!(harness.store.transactions_for_user(&alice).unwrap().is_empty());
    assert!(harness.store.recurring_expenses_for_user(&alice).unwrap().is_empty());
    assert!(harness.store.notifications_for_user(&alice).unwrap().is_empty());
    assert!(harness.store.friend_requests_for_user(&alice).unwrap().is_empty());
    assert!(harness.store.friend_requests_for_user(&carol).unwrap().is_empty());
    assert!(harness.store.settlements_for_user(&alice).unwrap().is_empty());
    assert!(harness.store.settlements_for_user(&bob).unwrap().is_empty());

    // Completed cascade leaves no marker
    assert!(harness.store.get_deletion_marker(&alice).unwrap().is_none());
}

#[tokio::test]
async fn former_username_is_reservable_again() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;
    let bob = harness.create_user("bob").await;

    harness
        .server
        .put("/v1/users/me/username")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "username": "coveted" }))
        .await
        .assert_status_ok();

    harness
        .server
        .delete("/v1/users/me")
        .add_header("authorization", harness.auth_header(&alice))
        .await
        .assert_status_ok();

    harness
        .server
        .put("/v1/users/me/username")
        .add_header("authorization", harness.auth_header(&bob))
        .json(&json!({ "username": "coveted" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn sole_member_circle_is_deleted_with_its_owner() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;
    let circle_id = harness.create_circle(&alice, "Just me").await;

    harness
        .server
        .delete("/v1/users/me")
        .add_header("authorization", harness.auth_header(&alice))
        .await
        .assert_status_ok();

    let circle_id: CircleId = circle_id.parse().unwrap();
    assert!(harness.store.get_circle(&circle_id).unwrap().is_none());
}

#[tokio::test]
async fn marker_resumes_the_cascade_from_its_recorded_stage() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;
    let bob = harness.create_user("bob").await;
    harness.befriend(&alice, &bob).await;

    let circle_id = harness.create_circle(&alice, "Trip").await;
    harness
        .server
        .post("/v1/transactions")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({
            "amount_cents": 500,
            "category": "Food",
            "description": "Coffee",
        }))
        .await
        .assert_status_ok();

    // Simulate a cascade that crashed after the friendship stage: the
    // marker is already at clearing-data, so the earlier stages must not
    // run again.
    let mut marker = DeletionMarker::new(alice);
    marker.advance(DeletionStage::ClearingData);
    harness.store.put_deletion_marker(&marker).unwrap();

    harness
        .server
        .delete("/v1/users/me")
        .add_header("authorization", harness.auth_header(&alice))
        .await
        .assert_status_ok();

    // Skipped stages left their data alone
    assert_eq!(harness.store.friendships_for_user(&alice).unwrap().len(), 1);
    let circle_id: CircleId = circle_id.parse().unwrap();
    assert!(harness.store.get_circle(&circle_id).unwrap().is_some());

    // The resumed stage ran to completion
    assert!(harness.store.transactions_for_user(&alice).unwrap().is_empty());
    let user = harness.store.get_user(&alice).unwrap().unwrap();
    assert_eq!(user.budget_cents, 0);
    assert!(harness.store.get_deletion_marker(&alice).unwrap().is_none());
}

#[tokio::test]
async fn deleting_an_unknown_account_is_not_found() {
    let harness = TestHarness::new();
    let ghost = UserId::generate();

    let response = harness
        .server
        .delete("/v1/users/me")
        .add_header("authorization", harness.auth_header(&ghost))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deletion_is_idempotent_for_a_reset_account() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;

    for _ in 0..2 {
        harness
            .server
            .delete("/v1/users/me")
            .add_header("authorization", harness.auth_header(&alice))
            .await
            .assert_status_ok();
    }

    let user = harness.store.get_user(&alice).unwrap().unwrap();
    assert_eq!(user.budget_cents, 0);
    assert!(harness.store.get_deletion_marker(&alice).unwrap().is_none());
}
