//! In-process store adapter.
//!
//! Mirrors the PostgreSQL adapter's constraints (unique email/username,
//! owner-scoped event keys, one pending request per pair, guarded reply
//! transitions) so service and HTTP tests can run without a database.
//! All state sits behind one `RwLock`; each method holds it for the whole
//! operation, which gives the same serialization the row locks give in
//! PostgreSQL.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use eardis_core::notification::{NotificationKind, NotificationStatus, Reply};
use eardis_core::types::DbId;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::event::{Event, EventPatch, NewEvent};
use crate::models::notification::{NewFriendRequest, Notification};
use crate::models::user::{NewUser, User};
use crate::store::{
    friendship_key, AccountStore, EventStore, NotificationStore, Store, StoreError,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<DbId, User>,
    events: HashMap<DbId, Event>,
    notifications: HashMap<DbId, Notification>,
    friendships: BTreeSet<(DbId, DbId)>,
}

impl Tables {
    fn ensure_user_exists(&self, id: DbId) -> Result<(), StoreError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    /// Open friend request between the pair, in either direction.
    fn pending_between(&self, a: DbId, b: DbId) -> bool {
        let pair = friendship_key(a, b);
        self.notifications.values().any(|n| {
            n.kind == NotificationKind::FriendRequest
                && !n.status.is_terminal()
                && friendship_key(n.sender_id, n.recipient_id) == pair
        })
    }

    fn resolve_friend_request(
        &mut self,
        notification_id: DbId,
        recipient_id: DbId,
        reply: Reply,
    ) -> Result<Notification, StoreError> {
        let notification = self
            .notifications
            .get_mut(&notification_id)
            .filter(|n| {
                n.recipient_id == recipient_id && n.kind == NotificationKind::FriendRequest
            })
            .ok_or(StoreError::NotFound)?;

        let next = notification
            .status
            .transition(reply)
            .map_err(|_| StoreError::AlreadyResolved)?;
        notification.status = next;
        notification.resolved_at = Some(Utc::now());
        let resolved = notification.clone();

        if next == NotificationStatus::Accepted {
            self.friendships
                .insert(friendship_key(resolved.sender_id, resolved.recipient_id));
        }
        Ok(resolved)
    }
}

/// Store holding everything in memory. Cheap to construct per test.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::Conflict("uq_users_username".to_string()));
        }
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict("uq_users_email".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            salt: input.salt.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email == login || u.username == login)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        tables.events.retain(|_, e| e.owner_id != id);
        tables
            .notifications
            .retain(|_, n| n.sender_id != id && n.recipient_id != id);
        tables
            .friendships
            .retain(|(low, high)| *low != id && *high != id);
        Ok(())
    }

    async fn list_friends(&self, id: DbId) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;
        tables.ensure_user_exists(id)?;
        let mut friends: Vec<User> = tables
            .friendships
            .iter()
            .filter_map(|(low, high)| match (*low == id, *high == id) {
                (true, _) => Some(*high),
                (_, true) => Some(*low),
                _ => None,
            })
            .filter_map(|friend_id| tables.users.get(&friend_id).cloned())
            .collect();
        friends.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(friends)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, input: &NewEvent) -> Result<Event, StoreError> {
        let mut tables = self.tables.write().await;
        tables.ensure_user_exists(input.owner_id)?;

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            owner_id: input.owner_id,
            title: input.title.clone(),
            description: input.description.clone(),
            location: input.location.clone(),
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            created_at: now,
            updated_at: now,
        };
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn list_events_by_owner(&self, owner_id: DbId) -> Result<Vec<Event>, StoreError> {
        let tables = self.tables.read().await;
        tables.ensure_user_exists(owner_id)?;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect();
        // NULLS LAST on starts_at, then creation order.
        events.sort_by(|a, b| {
            match (a.starts_at, b.starts_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then(a.created_at.cmp(&b.created_at))
        });
        Ok(events)
    }

    async fn patch_event(
        &self,
        owner_id: DbId,
        event_id: DbId,
        input: &EventPatch,
    ) -> Result<Event, StoreError> {
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .get_mut(&event_id)
            .filter(|e| e.owner_id == owner_id)
            .ok_or(StoreError::NotFound)?;

        let starts_at = input.starts_at.or(event.starts_at);
        let ends_at = input.ends_at.or(event.ends_at);
        if let (Some(start), Some(end)) = (starts_at, ends_at) {
            if end < start {
                return Err(StoreError::Conflict("ck_events_window".to_string()));
            }
        }

        if let Some(title) = &input.title {
            event.title = title.clone();
        }
        if let Some(description) = &input.description {
            event.description = Some(description.clone());
        }
        if let Some(location) = &input.location {
            event.location = Some(location.clone());
        }
        event.starts_at = starts_at;
        event.ends_at = ends_at;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn delete_event(&self, owner_id: DbId, event_id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .events
            .get(&event_id)
            .is_some_and(|e| e.owner_id == owner_id);
        if !owned {
            return Err(StoreError::NotFound);
        }
        tables.events.remove(&event_id);
        Ok(())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn list_notifications_for(
        &self,
        recipient_id: DbId,
    ) -> Result<Vec<Notification>, StoreError> {
        let tables = self.tables.read().await;
        tables.ensure_user_exists(recipient_id)?;
        let mut notifications: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn create_friend_request(
        &self,
        input: &NewFriendRequest,
    ) -> Result<Notification, StoreError> {
        let mut tables = self.tables.write().await;
        tables.ensure_user_exists(input.sender_id)?;
        tables.ensure_user_exists(input.recipient_id)?;

        if input.sender_id == input.recipient_id {
            return Err(StoreError::Conflict(
                "ck_notifications_not_self".to_string(),
            ));
        }
        if tables
            .friendships
            .contains(&friendship_key(input.sender_id, input.recipient_id))
        {
            return Err(StoreError::Conflict("already friends".to_string()));
        }
        if tables.pending_between(input.sender_id, input.recipient_id) {
            return Err(StoreError::Conflict(
                "uq_notifications_pending_pair".to_string(),
            ));
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            kind: NotificationKind::FriendRequest,
            sender_id: input.sender_id,
            recipient_id: input.recipient_id,
            status: NotificationStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        };
        tables
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn accept_friend_request(
        &self,
        notification_id: DbId,
        recipient_id: DbId,
    ) -> Result<Notification, StoreError> {
        self.tables
            .write()
            .await
            .resolve_friend_request(notification_id, recipient_id, Reply::Accept)
    }

    async fn decline_friend_request(
        &self,
        notification_id: DbId,
        recipient_id: DbId,
    ) -> Result<Notification, StoreError> {
        self.tables
            .write()
            .await
            .resolve_friend_request(notification_id, recipient_id, Reply::Decline)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
