use crate::api::AuthBackend;
use crate::models::{Role, User};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// Holds the current authenticated identity and bearer credential, persisted
/// under a state directory so a session survives restarts.
///
/// Invariant: an active session always carries both a user record and a
/// token. If either half is missing or unparseable at restore time, the
/// persisted state is cleared and the store reverts to unauthenticated.
pub struct SessionStore {
    state_dir: PathBuf,
    user: Option<User>,
    token: Option<String>,
}

impl SessionStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            user: None,
            token: None,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// Rehydrate a persisted session and propagate its credential to the
    /// backend. Corrupt or partial state self-heals by clearing both files;
    /// no error surfaces to the caller.
    pub fn restore(&mut self, backend: &dyn AuthBackend) {
        let token = fs::read_to_string(self.state_dir.join(TOKEN_FILE))
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let user_json = fs::read_to_string(self.state_dir.join(USER_FILE)).ok();

        let (Some(token), Some(user_json)) = (token, user_json) else {
            self.clear_persisted();
            return;
        };

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => {
                debug!("Restored session for {}", user.username);
                backend.set_auth_token(Some(&token));
                self.user = Some(user);
                self.token = Some(token);
            }
            Err(e) => {
                warn!("Stored user record is unreadable, clearing session: {e}");
                self.clear_persisted();
            }
        }
    }

    /// Authenticate against the backend. On success the identity and
    /// credential are persisted and activated; on failure the error
    /// propagates and the existing session state is left untouched.
    pub async fn login(
        &mut self,
        backend: &dyn AuthBackend,
        username: &str,
        password: &str,
    ) -> Result<User> {
        let auth = backend.login(username, password).await?;
        self.activate(backend, auth.token, auth.user.clone())?;
        info!("Logged in as {}", auth.user.username);
        Ok(auth.user)
    }

    /// Create an account; same contract shape as login.
    pub async fn signup(
        &mut self,
        backend: &dyn AuthBackend,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User> {
        let auth = backend.register(username, email, password, role).await?;
        self.activate(backend, auth.token, auth.user.clone())?;
        info!("Registered {} as {}", auth.user.username, auth.user.role.as_str());
        Ok(auth.user)
    }

    /// Drop the session everywhere: persisted files, in-memory state, and
    /// the backend's outgoing credential. Idempotent.
    pub fn logout(&mut self, backend: &dyn AuthBackend) {
        self.clear_persisted();
        self.user = None;
        self.token = None;
        backend.set_auth_token(None);
    }

    fn activate(&mut self, backend: &dyn AuthBackend, token: String, user: User) -> Result<()> {
        fs::create_dir_all(&self.state_dir).with_context(|| {
            format!("Failed to create state directory {:?}", self.state_dir)
        })?;
        fs::write(self.state_dir.join(TOKEN_FILE), &token)
            .context("Failed to persist session token")?;
        let user_json = serde_json::to_string_pretty(&user)?;
        fs::write(self.state_dir.join(USER_FILE), user_json)
            .context("Failed to persist session user")?;

        backend.set_auth_token(Some(&token));
        self.user = Some(user);
        self.token = Some(token);
        Ok(())
    }

    fn clear_persisted(&self) {
        for name in [TOKEN_FILE, USER_FILE] {
            if let Err(e) = fs::remove_file(self.state_dir.join(name)) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove {name}: {e}");
                }
            }
        }
    }
}
