//! Store-contract tests run against the in-memory adapter.
//!
//! Exercises the scoping and state rules every adapter must enforce:
//! - unique email / username
//! - events keyed by (owner, id)
//! - friend requests: unknown recipient, duplicates, guarded replies
//! - cascade on account deletion

use std::sync::Arc;

use assert_matches::assert_matches;
use eardis_core::notification::NotificationStatus;
use eardis_db::models::event::{EventPatch, NewEvent};
use eardis_db::models::notification::NewFriendRequest;
use eardis_db::models::user::{NewUser, User};
use eardis_db::{AccountStore, EventStore, MemoryStore, NotificationStore, StoreError};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(name: &str) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{name}@test.com"),
        password_hash: "hash".to_string(),
        salt: "salt".to_string(),
    }
}

async fn create_user(store: &MemoryStore, name: &str) -> User {
    store
        .create_user(&new_user(name))
        .await
        .expect("user creation should succeed")
}

fn new_event(owner_id: Uuid, title: &str) -> NewEvent {
    NewEvent {
        owner_id,
        title: title.to_string(),
        description: None,
        location: None,
        starts_at: None,
        ends_at: None,
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_email_or_username_conflicts() {
    let store = MemoryStore::new();
    create_user(&store, "alice").await;

    let same_name = NewUser {
        email: "other@test.com".to_string(),
        ..new_user("alice")
    };
    assert_matches!(
        store.create_user(&same_name).await,
        Err(StoreError::Conflict(_))
    );

    let same_email = NewUser {
        username: "alice2".to_string(),
        ..new_user("alice")
    };
    assert_matches!(
        store.create_user(&same_email).await,
        Err(StoreError::Conflict(_))
    );
}

#[tokio::test]
async fn login_lookup_matches_email_or_username() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;

    let by_name = store.find_user_by_login("alice").await.unwrap().unwrap();
    let by_email = store
        .find_user_by_login("alice@test.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, alice.id);
    assert_eq!(by_email.id, alice.id);
    assert!(store.find_user_by_login("bob").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn events_are_listed_per_owner_only() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    store.create_event(&new_event(alice.id, "standup")).await.unwrap();

    let alice_events = store.list_events_by_owner(alice.id).await.unwrap();
    assert_eq!(alice_events.len(), 1);
    assert_eq!(alice_events[0].owner_id, alice.id);

    assert!(store.list_events_by_owner(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_for_unknown_owner_is_not_found() {
    let store = MemoryStore::new();
    assert_matches!(
        store.list_events_by_owner(Uuid::new_v4()).await,
        Err(StoreError::NotFound)
    );
}

#[tokio::test]
async fn patch_and_delete_are_owner_scoped() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;
    let event = store.create_event(&new_event(alice.id, "standup")).await.unwrap();

    let patch = EventPatch {
        title: Some("hijacked".to_string()),
        ..Default::default()
    };
    assert_matches!(
        store.patch_event(bob.id, event.id, &patch).await,
        Err(StoreError::NotFound)
    );
    assert_matches!(
        store.delete_event(bob.id, event.id).await,
        Err(StoreError::NotFound)
    );

    let patched = store.patch_event(alice.id, event.id, &patch).await.unwrap();
    assert_eq!(patched.title, "hijacked");
    assert_eq!(patched.owner_id, alice.id);

    store.delete_event(alice.id, event.id).await.unwrap();
    assert_matches!(
        store.delete_event(alice.id, event.id).await,
        Err(StoreError::NotFound)
    );
}

// ---------------------------------------------------------------------------
// Friend requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn friend_request_to_unknown_user_is_not_found() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;

    let result = store
        .create_friend_request(&NewFriendRequest {
            sender_id: alice.id,
            recipient_id: Uuid::new_v4(),
        })
        .await;
    assert_matches!(result, Err(StoreError::NotFound));
}

#[tokio::test]
async fn second_pending_request_between_pair_conflicts() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    let request = NewFriendRequest {
        sender_id: alice.id,
        recipient_id: bob.id,
    };
    store.create_friend_request(&request).await.unwrap();
    assert_matches!(
        store.create_friend_request(&request).await,
        Err(StoreError::Conflict(_))
    );

    let reverse = NewFriendRequest {
        sender_id: bob.id,
        recipient_id: alice.id,
    };
    assert_matches!(
        store.create_friend_request(&reverse).await,
        Err(StoreError::Conflict(_))
    );
}

#[tokio::test]
async fn accept_is_terminal_and_records_friendship() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    let request = store
        .create_friend_request(&NewFriendRequest {
            sender_id: alice.id,
            recipient_id: bob.id,
        })
        .await
        .unwrap();

    let accepted = store.accept_friend_request(request.id, bob.id).await.unwrap();
    assert_eq!(accepted.status, NotificationStatus::Accepted);
    assert!(accepted.resolved_at.is_some());

    assert_matches!(
        store.accept_friend_request(request.id, bob.id).await,
        Err(StoreError::AlreadyResolved)
    );
    assert_matches!(
        store.decline_friend_request(request.id, bob.id).await,
        Err(StoreError::AlreadyResolved)
    );

    let friends = store.list_friends(alice.id).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, bob.id);

    assert_matches!(
        store
            .create_friend_request(&NewFriendRequest {
                sender_id: bob.id,
                recipient_id: alice.id,
            })
            .await,
        Err(StoreError::Conflict(_))
    );
}

#[tokio::test]
async fn only_the_recipient_can_reply() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    let request = store
        .create_friend_request(&NewFriendRequest {
            sender_id: alice.id,
            recipient_id: bob.id,
        })
        .await
        .unwrap();

    assert_matches!(
        store.accept_friend_request(request.id, alice.id).await,
        Err(StoreError::NotFound)
    );

    let declined = store.decline_friend_request(request.id, bob.id).await.unwrap();
    assert_eq!(declined.status, NotificationStatus::Declined);
    assert!(store.list_friends(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_user_cascades() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;

    store.create_event(&new_event(alice.id, "standup")).await.unwrap();
    store
        .create_friend_request(&NewFriendRequest {
            sender_id: alice.id,
            recipient_id: bob.id,
        })
        .await
        .unwrap();

    store.delete_user(alice.id).await.unwrap();

    assert!(store.find_user_by_id(alice.id).await.unwrap().is_none());
    assert!(store.list_notifications_for(bob.id).await.unwrap().is_empty());
    assert_matches!(
        store.list_events_by_owner(alice.id).await,
        Err(StoreError::NotFound)
    );
    assert_matches!(store.delete_user(alice.id).await, Err(StoreError::NotFound));
}

// ---------------------------------------------------------------------------
// Concurrent writers
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn opposite_requests_sent_together_leave_one_pending() {
    let store = Arc::new(MemoryStore::new());

    for i in 0..20 {
        let a = create_user(&store, &format!("left{i}")).await.id;
        let b = create_user(&store, &format!("right{i}")).await.id;

        let forward = tokio::spawn({
            let store = Arc::clone(&store);
            async move {
                store
                    .create_friend_request(&NewFriendRequest {
                        sender_id: a,
                        recipient_id: b,
                    })
                    .await
            }
        });
        let backward = tokio::spawn({
            let store = Arc::clone(&store);
            async move {
                store
                    .create_friend_request(&NewFriendRequest {
                        sender_id: b,
                        recipient_id: a,
                    })
                    .await
            }
        });

        let results = [forward.await.unwrap(), backward.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(StoreError::Conflict(_)))));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn replies_sent_together_resolve_once() {
    let store = Arc::new(MemoryStore::new());

    for i in 0..20 {
        let a = create_user(&store, &format!("sender{i}")).await.id;
        let b = create_user(&store, &format!("recipient{i}")).await.id;
        let request_id = store
            .create_friend_request(&NewFriendRequest {
                sender_id: a,
                recipient_id: b,
            })
            .await
            .unwrap()
            .id;

        let accept = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.accept_friend_request(request_id, b).await }
        });
        let decline = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.decline_friend_request(request_id, b).await }
        });

        let results = [accept.await.unwrap(), decline.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(StoreError::AlreadyResolved))));
    }
}
