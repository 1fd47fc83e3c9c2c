//! Session context: the single in-memory source of truth for the token and
//! user id, written through to key/value storage on every change.

use std::sync::Arc;

use contracts::system::auth::{reconcile_session, SessionResolution, TokenClaims};
use leptos::prelude::*;

use crate::shared::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "token";
pub const USER_ID_KEY: &str = "userId";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub claims: Option<TokenClaims>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.claims.as_ref().map(|c| c.is_admin()).unwrap_or(false)
    }

    /// Email from the token when present, else the user id
    pub fn display_name(&self) -> String {
        self.claims
            .as_ref()
            .and_then(|c| c.email.clone())
            .or_else(|| self.user_id.clone())
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    state: ArcRwSignal<SessionState>,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state.get_untracked())
            .finish()
    }
}

impl SessionStore {
    /// Empty session that persists through `storage`
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: ArcRwSignal::new(SessionState::default()),
            storage,
        }
    }

    /// Rehydrate from storage once at startup.
    ///
    /// Invalid, expired or mismatched credentials are wiped; a missing user
    /// id is recovered from the token subject and written back.
    pub fn restore(storage: Arc<dyn KeyValueStore>, now_secs: i64) -> Self {
        let store = Self::new(storage);
        let token = store.storage.get(TOKEN_KEY);
        let user_id = store.storage.get(USER_ID_KEY);

        match reconcile_session(token.as_deref(), user_id.as_deref(), now_secs) {
            SessionResolution::Anonymous => {}
            SessionResolution::Authenticated {
                token,
                user_id: reconciled,
                claims,
            } => {
                if user_id.as_deref() != Some(reconciled.as_str()) {
                    store.storage.set(USER_ID_KEY, &reconciled);
                }
                log::info!("Session restored for user {}", reconciled);
                store.state.set(SessionState {
                    token: Some(token),
                    user_id: Some(reconciled),
                    claims: Some(claims),
                });
            }
            SessionResolution::Invalidated { reason } => {
                log::warn!("Discarding stored session: {}", reason);
                store.clear_storage();
            }
        }
        store
    }

    pub fn get_token(&self) -> Option<String> {
        self.state.with_untracked(|s| s.token.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.with_untracked(|s| s.user_id.clone())
    }

    /// Untracked copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    /// Reactive read, for views
    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.is_authenticated())
    }

    /// Reactive read, for views
    pub fn is_admin(&self) -> bool {
        self.state.with(|s| s.is_admin())
    }

    /// Reactive read, for views
    pub fn display_name(&self) -> String {
        self.state.with(|s| s.display_name())
    }

    pub fn login(&self, token: String, user_id: String) -> Result<(), String> {
        let claims = TokenClaims::decode(&token)?;
        self.storage.set(TOKEN_KEY, &token);
        self.storage.set(USER_ID_KEY, &user_id);
        self.state.set(SessionState {
            token: Some(token),
            user_id: Some(user_id),
            claims: Some(claims),
        });
        Ok(())
    }

    /// Login using the token subject as the user id
    pub fn login_with_token(&self, token: String) -> Result<(), String> {
        let claims = TokenClaims::decode(&token)?;
        self.login(token, claims.sub)
    }

    pub fn logout(&self) {
        self.clear_storage();
        if self.state.with_untracked(|s| *s != SessionState::default()) {
            self.state.set(SessionState::default());
        }
    }

    fn clear_storage(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_ID_KEY);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::storage::MemoryStorage;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use serde_json::json;

    pub(crate) fn make_token(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{}.{}.sig", header, body)
    }

    pub(crate) fn logged_in_store() -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        let token = make_token(json!({ "sub": "u1", "role": "admin", "exp": i64::MAX }));
        store.login(token, "u1".into()).unwrap();
        (store, storage)
    }

    #[test]
    fn test_login_persists_and_logout_clears() {
        let (store, storage) = logged_in_store();
        assert!(store.get_token().is_some());
        assert!(storage.get(TOKEN_KEY).is_some());
        assert_eq!(storage.get(USER_ID_KEY).as_deref(), Some("u1"));
        assert!(store.snapshot().is_admin());

        store.logout();
        assert_eq!(store.get_token(), None);
        assert_eq!(storage.get(TOKEN_KEY), None);
        assert_eq!(storage.get(USER_ID_KEY), None);
    }

    #[test]
    fn test_login_rejects_undecodable_token() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        assert!(store.login("garbage".into(), "u1".into()).is_err());
        assert_eq!(storage.get(TOKEN_KEY), None);
        assert_eq!(store.get_token(), None);
    }

    #[test]
    fn test_restore_adopts_subject() {
        let token = make_token(json!({ "sub": 7, "exp": 1000 }));
        let storage = Arc::new(MemoryStorage::with_items([(TOKEN_KEY, token.as_str())]));
        let store = SessionStore::restore(storage.clone(), 10);
        assert_eq!(store.user_id().as_deref(), Some("7"));
        assert_eq!(storage.get(USER_ID_KEY).as_deref(), Some("7"));
        assert!(!store.snapshot().is_admin());
    }

    #[test]
    fn test_restore_wipes_expired_token() {
        let token = make_token(json!({ "sub": "u1", "exp": 5 }));
        let storage = Arc::new(MemoryStorage::with_items([
            (TOKEN_KEY, token.as_str()),
            (USER_ID_KEY, "u1"),
        ]));
        let store = SessionStore::restore(storage.clone(), 10);
        assert_eq!(store.get_token(), None);
        assert_eq!(storage.get(TOKEN_KEY), None);
        assert_eq!(storage.get(USER_ID_KEY), None);
    }

    #[test]
    fn test_restore_wipes_mismatched_user() {
        let token = make_token(json!({ "sub": "u1", "exp": 1000 }));
        let storage = Arc::new(MemoryStorage::with_items([
            (TOKEN_KEY, token.as_str()),
            (USER_ID_KEY, "u2"),
        ]));
        let store = SessionStore::restore(storage.clone(), 10);
        assert_eq!(store.snapshot(), SessionState::default());
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_display_name_prefers_email() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage);
        let token = make_token(json!({ "sub": "u2", "email": "ann@example.com", "exp": i64::MAX }));
        store.login_with_token(token).unwrap();
        assert_eq!(store.snapshot().display_name(), "ann@example.com");

        let (admin, _) = logged_in_store();
        assert_eq!(admin.snapshot().display_name(), "u1");
    }
}
