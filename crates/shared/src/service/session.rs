use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::model::UserProfile;

/// Authenticated user context, keyed by the backend-issued token.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub token: String,
    pub profile: UserProfile,
    pub established_at: DateTime<Utc>,
    pub validated_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn user_id(&self) -> &str {
        &self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.is_admin()
    }
}

/// Live sessions. Populated on login, refreshed whenever a privileged
/// request re-validates the token, and cleared on logout or rejection.
/// Sessions idle for longer than `idle_ttl` are dropped on the next write
/// and are invisible to [`SessionStore::get`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionContext>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn establish(&self, token: &str, profile: UserProfile) -> SessionContext {
        let now = Utc::now();
        let session = SessionContext {
            token: token.to_string(),
            profile,
            established_at: now,
            validated_at: now,
        };

        info!("Session established for user {}", session.user_id());

        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, now);
        sessions.insert(token.to_string(), session.clone());

        session
    }

    /// Records a successful re-validation. Unknown or expired tokens (for
    /// example issued before a restart) are adopted as new sessions.
    pub async fn refresh(&self, token: &str, profile: UserProfile) -> SessionContext {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        self.evict(&mut sessions, now);

        if let Some(session) = sessions.get_mut(token) {
            session.profile = profile;
            session.validated_at = now;
            return session.clone();
        }

        let session = SessionContext {
            token: token.to_string(),
            profile,
            established_at: now,
            validated_at: now,
        };
        debug!("Session adopted for user {}", session.user_id());
        sessions.insert(token.to_string(), session.clone());

        session
    }

    pub async fn get(&self, token: &str) -> Option<SessionContext> {
        let now = Utc::now();

        self.sessions
            .read()
            .await
            .get(token)
            .filter(|s| !self.is_idle(s, now))
            .cloned()
    }

    /// Drops every session idle at `now`, returning how many were removed.
    pub async fn evict_idle_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, now)
    }

    fn is_idle(&self, session: &SessionContext, now: DateTime<Utc>) -> bool {
        now - session.validated_at > self.idle_ttl
    }

    fn evict(&self, sessions: &mut HashMap<String, SessionContext>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, s| !self.is_idle(s, now));

        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {evicted} idle sessions");
        }
        evicted
    }

    pub async fn end(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);

        if let Some(session) = &removed {
            info!("Session ended for user {}", session.user_id());
        }

        removed.is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
