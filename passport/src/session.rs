//! Persisted login state.
//!
//! A session is two entries in a key/value store: the bearer token under
//! [`TOKEN_KEY`] and the JSON-encoded [`UserProfile`] under [`USER_KEY`]. Their
//! absence is the logged-out state. Clearing is idempotent and removes both
//! entries together.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::{PassportError, Result};
use crate::types::UserProfile;

/// Store key holding the bearer token.
pub const TOKEN_KEY: &str = "auth_token";
/// Store key holding the serialized user profile.
pub const USER_KEY: &str = "user";

/// A logged-in session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub profile: Option<UserProfile>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// Durable storage for the current [`Session`].
///
/// Implementations are shared between concurrent requests and must make
/// [`SessionStore::clear`] safe to call any number of times.
pub trait SessionStore: Send + Sync {
    /// Current bearer token, if logged in.
    fn token(&self) -> Result<Option<String>>;

    /// Stored user profile, if any.
    fn profile(&self) -> Result<Option<UserProfile>>;

    /// Replace the stored session.
    fn set(&self, session: &Session) -> Result<()>;

    /// Remove both session keys. Returns `true` if anything was removed.
    fn clear(&self) -> Result<bool>;
}

fn entries_for(session: &Session) -> Result<Vec<(&'static str, String)>> {
    let mut entries = vec![(TOKEN_KEY, session.token.clone())];
    if let Some(profile) = &session.profile {
        entries.push((USER_KEY, serde_json::to_string(profile)?));
    }
    Ok(entries)
}

fn profile_from(raw: Option<&String>) -> Option<UserProfile> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable stored profile");
            None
        }
    }
}

fn remove_session_keys(map: &mut HashMap<String, String>) -> bool {
    let token = map.remove(TOKEN_KEY).is_some();
    let user = map.remove(USER_KEY).is_some();
    token || user
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `session`.
    pub fn with_session(session: &Session) -> Result<Self> {
        let store = Self::new();
        store.set(session)?;
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a consistent map of strings.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Result<Option<String>> {
        Ok(self.lock().get(TOKEN_KEY).cloned())
    }

    fn profile(&self) -> Result<Option<UserProfile>> {
        Ok(profile_from(self.lock().get(USER_KEY)))
    }

    fn set(&self, session: &Session) -> Result<()> {
        let entries = entries_for(session)?;
        let mut map = self.lock();
        map.remove(USER_KEY);
        for (key, value) in entries {
            map.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        Ok(remove_session_keys(&mut self.lock()))
    }
}

// ---------------------------------------------------------------------------
// File-backed
// ---------------------------------------------------------------------------

/// Store persisted as a JSON object in a single file.
///
/// A missing file is an empty store. Writes go to a sibling temp file that is
/// renamed over the original, so readers never see a half-written map.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<HashMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(PassportError::Store(e)),
        }
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = map.len(), "session store written");
        Ok(())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Result<Option<String>> {
        let _guard = self.guard();
        Ok(self.read_map()?.remove(TOKEN_KEY))
    }

    fn profile(&self) -> Result<Option<UserProfile>> {
        let _guard = self.guard();
        Ok(profile_from(self.read_map()?.get(USER_KEY)))
    }

    fn set(&self, session: &Session) -> Result<()> {
        let entries = entries_for(session)?;
        let _guard = self.guard();
        let mut map = self.read_map()?;
        map.remove(USER_KEY);
        for (key, value) in entries {
            map.insert(key.to_string(), value);
        }
        self.write_map(&map)
    }

    fn clear(&self) -> Result<bool> {
        let _guard = self.guard();
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(PassportError::Json(e)) => {
                // An unparsable file counts as a session to remove.
                warn!(path = %self.path.display(), error = %e, "resetting corrupt session file");
                self.write_map(&HashMap::new())?;
                return Ok(true);
            }
            Err(e) => return Err(e),
        };
        if !remove_session_keys(&mut map) {
            return Ok(false);
        }
        self.write_map(&map)?;
        Ok(true)
    }
}
