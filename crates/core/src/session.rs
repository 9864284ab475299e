//! Signed-in session and role gating.
//!
//! The session (bearer token, role, therapist id) lives in one process-wide [`SessionState`].
//! Everything that needs identity reads through it; only `login` and `logout` change it, and only
//! `SessionState` talks to the [`SessionStore`] that persists it between runs.
//!
//! Roles gate which navigation actions are offered. This is a convenience for the front end, not
//! a security boundary; the backend enforces access.

use crate::error::{SessionError, SessionResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, RwLock};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Senior,
    #[default]
    Junior,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Senior, Role::Junior];

    /// Value used on the wire.
    pub fn as_wire(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Senior => "SENIOR",
            Role::Junior => "JUNIOR",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Senior => "Senior Therapist",
            Role::Junior => "Therapist",
        }
    }

    pub fn can_view_all_clients(self) -> bool {
        matches!(self, Role::Admin | Role::Senior)
    }

    pub fn can_view_therapist_notes(self) -> bool {
        matches!(self, Role::Admin | Role::Senior)
    }

    pub fn can_manage_therapists(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts either the wire value or the label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_wire().eq_ignore_ascii_case(s) || r.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown role {s:?}"))
    }
}

/// Navigation entries offered on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    IntakeForm,
    SoapNote,
    SelfAssessment,
    AssignedClients,
    SessionHistory,
    AllClients,
    TherapistNotes,
    ManageTherapists,
}

impl NavAction {
    pub fn label(self) -> &'static str {
        match self {
            NavAction::IntakeForm => "Intake Form",
            NavAction::SoapNote => "SOAP Form",
            NavAction::SelfAssessment => "Self Assessment",
            NavAction::AssignedClients => "Assigned Clients",
            NavAction::SessionHistory => "Session History",
            NavAction::AllClients => "View All Clients",
            NavAction::TherapistNotes => "View Therapist Notes",
            NavAction::ManageTherapists => "Manage Therapists",
        }
    }
}

/// Actions available to `role`, in dashboard order.
pub fn available_actions(role: Role) -> Vec<NavAction> {
    let mut actions = vec![
        NavAction::IntakeForm,
        NavAction::SoapNote,
        NavAction::SelfAssessment,
        NavAction::AssignedClients,
        NavAction::SessionHistory,
    ];
    if role.can_view_all_clients() {
        actions.push(NavAction::AllClients);
    }
    if role.can_view_therapist_notes() {
        actions.push(NavAction::TherapistNotes);
    }
    if role.can_manage_therapists() {
        actions.push(NavAction::ManageTherapists);
    }
    actions
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub role: Role,
    #[serde(default)]
    pub therapist_id: Option<u64>,
}

/// Where the session is persisted between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> SessionResult<Option<Session>>;
    fn save(&self, session: &Session) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// JSON file store.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(SessionError::FileRead)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let session = serde_json::from_str(&raw).map_err(SessionError::Deserialization)?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(SessionError::SessionDirCreation)?;
            }
        }
        let json = serde_json::to_string_pretty(session).map_err(SessionError::Serialization)?;
        fs::write(&self.path, json).map_err(SessionError::FileWrite)
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::FileRemove(e)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionResult<Option<Session>> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| SessionError::LockPoisoned)?
            .clone())
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        *self.inner.lock().map_err(|_| SessionError::LockPoisoned)? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.inner.lock().map_err(|_| SessionError::LockPoisoned)? = None;
        Ok(())
    }
}

/// Process-wide session accessor.
pub struct SessionState {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl SessionState {
    /// Restores any persisted session from `store`.
    pub fn new(store: Box<dyn SessionStore>) -> SessionResult<Self> {
        let current = store.load()?;
        if let Some(session) = &current {
            tracing::debug!(role = %session.role, "restored session");
        }
        Ok(Self {
            store,
            current: RwLock::new(current),
        })
    }

    /// In-memory session, empty at start.
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemorySessionStore::default()),
            current: RwLock::new(None),
        }
    }

    pub fn login(&self, token: impl Into<String>, role: Role) -> SessionResult<Session> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let session = Session {
            token,
            role,
            therapist_id: None,
        };
        self.store.save(&session)?;
        *self.current.write().map_err(|_| SessionError::LockPoisoned)? = Some(session.clone());
        tracing::info!(role = %role, "logged in");
        Ok(session)
    }

    pub fn logout(&self) -> SessionResult<()> {
        self.store.clear()?;
        *self.current.write().map_err(|_| SessionError::LockPoisoned)? = None;
        tracing::info!("logged out");
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().ok().and_then(|s| s.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current
            .read()
            .map(|s| s.is_some())
            .unwrap_or(false)
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    pub fn role(&self) -> Option<Role> {
        self.current().map(|s| s.role)
    }

    pub fn therapist_id(&self) -> Option<u64> {
        self.current().and_then(|s| s.therapist_id)
    }

    /// Records the signed-in therapist's id. A no-op when logged out.
    pub fn set_therapist_id(&self, therapist_id: Option<u64>) -> SessionResult<()> {
        let mut guard = self.current.write().map_err(|_| SessionError::LockPoisoned)?;
        if let Some(session) = guard.as_mut() {
            session.therapist_id = therapist_id;
            self.store.save(session)?;
        }
        Ok(())
    }
}

/// Username from the `sub` claim of a JWT, without verifying it.
pub fn jwt_subject(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims
        .get("sub")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
