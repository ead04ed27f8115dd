// ── Persistent token stores ──
//
// Both stores keep a single bearer token per profile under the fixed
// `admin_token` key, so switching profiles never leaks a session.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use iiec_core::{CoreError, TOKEN_KEY, TokenStore};

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "iiec";

fn storage_error(action: &str, err: impl std::fmt::Display) -> CoreError {
    CoreError::TokenStore {
        message: format!("failed to {action} token: {err}"),
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept in `<data_dir>/<profile>/admin_token`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_profile(data_dir: &Path, profile: &str) -> Self {
        Self::new(data_dir.join(profile).join(TOKEN_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<SecretString>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token.to_owned())))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error("read", e)),
        }
    }

    fn set(&self, token: &SecretString) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| storage_error("store", e))?;
        }
        std::fs::write(&self.path, token.expose_secret()).map_err(|e| storage_error("store", e))?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "token written");
        Ok(())
    }

    fn remove(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| storage_error("protect", e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the system keyring as `iiec` / `<profile>/admin_token`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    user: String,
}

impl KeyringTokenStore {
    pub fn new(profile: &str) -> Self {
        Self {
            user: format!("{profile}/{TOKEN_KEY}"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.user)
            .map_err(|e| storage_error("access keyring for", e))
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<SecretString>, CoreError> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(SecretString::from(secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(storage_error("read", e)),
        }
    }

    fn set(&self, token: &SecretString) -> Result<(), CoreError> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| storage_error("store", e))
    }

    fn remove(&self) -> Result<(), CoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(storage_error("remove", e)),
        }
    }
}
