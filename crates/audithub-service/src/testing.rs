//! In-memory store fakes shared by the service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use audithub_cache::ValidationCaches;
use audithub_core::config::auth::AuthConfig;
use audithub_core::config::cache::CacheConfig;
use audithub_core::result::AppResult;
use audithub_core::types::pagination::{Page, PageRequest};
use audithub_database::store::{AuditLogStore, SessionDirectory, ShareGrantStore};
use audithub_entity::audit::{AuditEvent, CreateAuditEvent};
use audithub_entity::session::EditSession;
use audithub_entity::share::{CreateShareGrant, ShareGrant};

use crate::context::RequestContext;

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        identity_jwt_secret: "identity-secret".to_string(),
        share_token_secret: "share-secret".to_string(),
        share_token_ttl_hours: 24,
        leeway_seconds: 5,
    }
}

pub fn caches() -> ValidationCaches {
    ValidationCaches::new(&CacheConfig::default())
}

pub fn request_context(user_id: &str) -> RequestContext {
    RequestContext::new(user_id, None)
}

/// Session directory fake.
#[derive(Debug, Default)]
pub struct MemorySessionDirectory {
    sessions: DashMap<String, EditSession>,
}

impl MemorySessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(id: &str, owner_id: &str) -> Self {
        let dir = Self::new();
        dir.add_session(id, owner_id);
        dir
    }

    pub fn add_session(&self, id: &str, owner_id: &str) {
        self.sessions.insert(
            id.to_string(),
            EditSession {
                id: id.to_string(),
                owner_id: owner_id.to_string(),
                title: None,
                created_at: Utc::now(),
            },
        );
    }
}

#[async_trait]
impl SessionDirectory for MemorySessionDirectory {
    async fn find_session(&self, id: &str) -> AppResult<Option<EditSession>> {
        Ok(self.sessions.get(id).map(|s| s.clone()))
    }
}

/// Share grant store fake that counts lookups, so tests can assert how
/// many durable round trips the cache actually saved.
#[derive(Debug, Default)]
pub struct MemoryGrantStore {
    grants: DashMap<Uuid, ShareGrant>,
    lookups: AtomicUsize,
}

impl MemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// The id of the single stored grant; panics if there is not exactly one.
    pub fn only_grant_id(&self) -> Uuid {
        assert_eq!(self.grants.len(), 1, "expected exactly one grant");
        *self.grants.iter().next().unwrap().key()
    }
}

#[async_trait]
impl ShareGrantStore for MemoryGrantStore {
    async fn insert_grant(&self, grant: &CreateShareGrant) -> AppResult<ShareGrant> {
        let stored = ShareGrant {
            id: grant.id,
            session_id: grant.session_id.clone(),
            created_by: grant.created_by.clone(),
            can_read: grant.permissions.read,
            can_comment: grant.permissions.comment,
            can_edit: grant.permissions.edit,
            expires_at: grant.expires_at,
            revoked: false,
            created_at: Utc::now(),
        };
        self.grants.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_grant(&self, id: Uuid) -> AppResult<Option<ShareGrant>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.grants.get(&id).map(|g| g.clone()))
    }

    async fn mark_revoked(&self, id: Uuid) -> AppResult<bool> {
        match self.grants.get_mut(&id) {
            Some(mut grant) => {
                grant.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Audit log store fake: a flat append-only list.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn all_events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLogStore for MemoryAuditStore {
    async fn insert_event(&self, event: &CreateAuditEvent) -> AppResult<AuditEvent> {
        let stored = AuditEvent {
            id: Uuid::new_v4(),
            session_id: event.session_id.clone(),
            user_id: event.user_id.clone(),
            event_type: event.event_type.clone(),
            details: event.details.clone(),
            timestamp: event.timestamp,
            success: event.success,
        };
        self.events.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn session_history(
        &self,
        session_id: &str,
        page: &PageRequest,
    ) -> AppResult<Page<AuditEvent>> {
        let events = self.events.lock().unwrap();
        let mut matching: Vec<AuditEvent> = events
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect();
        matching.sort_by_key(|e| e.timestamp);

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Page::new(total, items))
    }
}
