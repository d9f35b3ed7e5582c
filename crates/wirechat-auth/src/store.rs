//! Credential storage backends.
//!
//! The store holds at most one credential pair and replaces it atomically:
//! both tokens are swapped under a single write lock, never independently.

use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::credentials::CredentialPair;

/// Reads and writes the active credential pair.
///
/// Implementations are process-scoped and shared via `Arc`; there are no
/// module-level singletons.
pub trait CredentialStore: Send + Sync {
    /// Returns the current pair, if one is stored.
    fn read(&self) -> Option<CredentialPair>;

    /// Replaces the stored pair atomically.
    fn write(&self, pair: CredentialPair);

    /// Removes the stored pair.
    fn clear(&self);
}

/// In-memory credential store, one instance per client process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Option<CredentialPair>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a pair.
    pub fn with_pair(pair: CredentialPair) -> Self {
        Self {
            inner: RwLock::new(Some(pair)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> Option<CredentialPair> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    fn write(&self, pair: CredentialPair) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(pair);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

/// JSON-on-disk credential store so CLI invocations share a session.
///
/// Disk writes are best-effort: a failed write keeps the in-memory copy
/// and logs a warning.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    cached: RwLock<Option<CredentialPair>>,
}

impl FileCredentialStore {
    /// Opens the store at `path`, loading any previously persisted pair.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = std::fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok());
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    fn persist(&self, pair: Option<&CredentialPair>) {
        let result = match pair {
            Some(pair) => serde_json::to_vec_pretty(pair)
                .map_err(std::io::Error::other)
                .and_then(|bytes| {
                    if let Some(parent) = self.path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    write_owner_only(&self.path, &bytes)
                }),
            None => match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
        };
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to persist credentials");
        }
    }
}

/// The file holds bearer tokens, so it must not be readable by other
/// users. Mode 0600 is applied at creation and re-applied on overwrite.
#[cfg(unix)]
fn write_owner_only(path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_owner_only(path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> Option<CredentialPair> {
        self.cached.read().ok().and_then(|guard| guard.clone())
    }

    fn write(&self, pair: CredentialPair) {
        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(pair.clone());
        }
        self.persist(Some(&pair));
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.cached.write() {
            *guard = None;
        }
        self.persist(None);
    }
}
