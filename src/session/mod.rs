pub mod guard;

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::api::client::ApiClient;
use crate::api::error::ApiError;

/// Admin role carried in the session. Gates which destructive candidate
/// actions are offered; the backend independently enforces authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub role: Role,
}

/// The authenticated-admin context: an opaque bearer token plus identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: AdminUser,
}

/// Resolution state of the process-wide session.
///
/// Starts at `Resolving` until the persisted session has been looked up;
/// transitions are driven by [`SessionStore`] mutations only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Resolving,
    Unauthenticated,
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Resolving)
    }
}

/// Observer notified on every session-state change.
pub trait SessionObserver: Send + Sync {
    /// Observer name for logging and debugging.
    fn name(&self) -> &'static str;

    fn session_changed(&self, state: &SessionState);
}

/// Where the session is persisted between invocations. The file-backed
/// implementation lives in the CLI layer; tests inject [`MemorySessionStorage`].
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, ApiError>;
    fn save(&self, session: &Session) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// In-memory storage, mainly for tests.
#[derive(Default)]
pub struct MemorySessionStorage {
    session: Mutex<Option<Session>>,
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.session.lock().map_err(poisoned)?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), ApiError> {
        *self.session.lock().map_err(poisoned)? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.session.lock().map_err(poisoned)? = None;
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> ApiError {
    ApiError::Storage("session state lock poisoned".to_string())
}

/// Explicitly constructed, dependency-injected session store.
///
/// Created on app start in the `Resolving` state; [`SessionStore::resolve`]
/// looks up any persisted session, and every mutation notifies subscribed
/// observers with the new state.
pub struct SessionStore {
    state: Mutex<SessionState>,
    observers: Mutex<Vec<Arc<dyn SessionObserver>>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: Mutex::new(SessionState::Resolving),
            observers: Mutex::new(Vec::new()),
            storage,
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        if let Ok(mut observers) = self.observers.lock() {
            observers.push(observer);
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or(SessionState::Resolving)
    }

    fn set_state(&self, next: SessionState) -> Result<(), ApiError> {
        *self.state.lock().map_err(poisoned)? = next.clone();
        if let Ok(observers) = self.observers.lock() {
            for observer in observers.iter() {
                tracing::debug!(observer = observer.name(), "notifying session observer");
                observer.session_changed(&next);
            }
        }
        Ok(())
    }

    /// Attempt to resolve a persisted session. Called once on startup.
    pub fn resolve(&self) -> Result<SessionState, ApiError> {
        let next = match self.storage.load()? {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Unauthenticated,
        };
        self.set_state(next)?;
        Ok(self.state())
    }

    /// Store a freshly issued session and persist it.
    pub fn establish(&self, session: Session) -> Result<(), ApiError> {
        self.storage.save(&session)?;
        self.set_state(SessionState::Authenticated(session))
    }

    /// Logout: drop all session fields and the persisted copy.
    pub fn clear(&self) -> Result<(), ApiError> {
        self.storage.clear()?;
        self.set_state(SessionState::Unauthenticated)
    }

    /// Exchange credentials for a session via `POST /auth/admin-login`.
    ///
    /// Both fields must be non-empty; an empty field fails locally without
    /// issuing a request. On success the returned session is stored exactly
    /// as the backend sent it.
    pub async fn submit_credentials(
        &self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let response = client.admin_login(email, password).await?;
        let session = Session {
            token: response.token,
            user: response.user,
        };
        self.establish(session.clone())?;
        Ok(session)
    }
}

/// Human-readable login failure text, in priority order: the structured
/// backend `message`, then the transport error text, then a fixed fallback.
pub fn login_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Backend { message: Some(message), .. } => message.clone(),
        ApiError::Transport(err) => err.to_string(),
        _ => "Login failed".to_string(),
    }
}
