//! Profile-propagation integration tests.
//!
//! A display-field change must land in the account document and in every
//! denormalized snapshot of it (friendships, circles) as one atomic batch.

mod common;

use common::TestHarness;
use ledgerly_core::{CircleId, ProfilePatch, UserId};
use ledgerly_store::{StagedBatch, StagedWrite, Store};
use serde_json::json;

#[tokio::test]
async fn display_name_change_reaches_every_snapshot() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;
    let bob = harness.create_user("bob").await;
    harness.befriend(&alice, &bob).await;

    let circle_id = harness.create_circle(&alice, "Trip").await;
    harness
        .server
        .post(&format!("/v1/circles/{circle_id}/join"))
        .add_header("authorization", harness.auth_header(&bob))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .patch("/v1/users/me/profile")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "display_name": "Alicia" }))
        .await;
    response.assert_status_ok();

    let user = harness.store.get_user(&alice).unwrap().unwrap();
    assert_eq!(user.display_name, "Alicia");

    let friendships = harness.store.friendships_for_user(&alice).unwrap();
    assert_eq!(friendships.len(), 1);
    assert_eq!(friendships[0].users[&alice].display_name, "Alicia");
    // The other participant's snapshot is untouched
    assert_eq!(friendships[0].users[&bob].display_name, "bob");

    let circle_id: CircleId = circle_id.parse().unwrap();
    let circle = harness.store.get_circle(&circle_id).unwrap().unwrap();
    assert_eq!(circle.members[&alice].display_name, "Alicia");
    assert_eq!(circle.members[&bob].display_name, "bob");
}

#[tokio::test]
async fn partial_patch_leaves_unsupplied_fields_alone() {
    let harness = TestHarness::new();

    let alice = UserId::generate();
    harness
        .server
        .post("/v1/users")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({
            "display_name": "alice",
            "email": "alice@example.com",
            "photo_url": "https://img.example/alice.png",
        }))
        .await
        .assert_status_ok();
    let bob = harness.create_user("bob").await;
    harness.befriend(&alice, &bob).await;

    harness
        .server
        .patch("/v1/users/me/profile")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "display_name": "Alicia" }))
        .await
        .assert_status_ok();

    let friendships = harness.store.friendships_for_user(&alice).unwrap();
    let snapshot = &friendships[0].users[&alice];
    assert_eq!(snapshot.display_name, "Alicia");
    assert_eq!(snapshot.photo_url.as_deref(), Some("https://img.example/alice.png"));
}

#[tokio::test]
async fn disjoint_field_updates_both_apply() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;
    let bob = harness.create_user("bob").await;
    harness.befriend(&alice, &bob).await;

    // Two flows touching different fields: neither clobbers the other.
    harness
        .server
        .patch("/v1/users/me/profile")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "display_name": "Alicia" }))
        .await
        .assert_status_ok();

    harness
        .server
        .patch("/v1/users/me/profile")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "photo_url": "https://img.example/new.png" }))
        .await
        .assert_status_ok();

    let friendships = harness.store.friendships_for_user(&alice).unwrap();
    let snapshot = &friendships[0].users[&alice];
    assert_eq!(snapshot.display_name, "Alicia");
    assert_eq!(snapshot.photo_url.as_deref(), Some("https://img.example/new.png"));
}

#[tokio::test]
async fn explicit_null_clears_the_photo_everywhere() {
    let harness = TestHarness::new();

    let alice = UserId::generate();
    harness
        .server
        .post("/v1/users")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({
            "display_name": "alice",
            "email": "alice@example.com",
            "photo_url": "https://img.example/alice.png",
        }))
        .await
        .assert_status_ok();
    let bob = harness.create_user("bob").await;
    harness.befriend(&alice, &bob).await;

    harness
        .server
        .patch("/v1/users/me/profile")
        .add_header("authorization", harness.auth_header(&alice))
        .json(&json!({ "photo_url": null }))
        .await
        .assert_status_ok();

    let user = harness.store.get_user(&alice).unwrap().unwrap();
    assert!(user.photo_url.is_none());

    let friendships = harness.store.friendships_for_user(&alice).unwrap();
    assert!(friendships[0].users[&alice].photo_url.is_none());
}

#[tokio::test]
async fn failed_commit_changes_no_snapshot() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;
    let bob = harness.create_user("bob").await;
    harness.befriend(&alice, &bob).await;

    let friendship_id = harness.store.friendships_for_user(&alice).unwrap()[0].id;

    // A batch that stages a snapshot merge and then fails on a merge into a
    // missing account: the snapshot merge must not be applied either.
    let mut batch = StagedBatch::new();
    batch.stage(StagedWrite::MergeFriendshipSnapshot {
        id: friendship_id,
        user_id: alice,
        patch: ProfilePatch {
            display_name: Some("Alicia".into()),
            photo_url: None,
        },
    });
    batch.stage(StagedWrite::MergeProfile {
        user_id: UserId::generate(),
        patch: ProfilePatch {
            display_name: Some("ghost".into()),
            photo_url: None,
        },
    });

    assert!(harness.store.commit(batch).is_err());

    let friendship = harness.store.get_friendship(&friendship_id).unwrap().unwrap();
    assert_eq!(friendship.users[&alice].display_name, "alice");
}

#[tokio::test]
async fn profile_update_without_relationships_still_applies() {
    let harness = TestHarness::new();
    let loner = harness.create_user("loner").await;

    let response = harness
        .server
        .patch("/v1/users/me/profile")
        .add_header("authorization", harness.auth_header(&loner))
        .json(&json!({ "display_name": "Still Loner" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["display_name"], "Still Loner");
}
