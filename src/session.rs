use std::fmt;
use std::fmt::{Debug, Formatter};
use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the admin console configuration inside the storage file.
pub const STORAGE_KEY: &str = "cms_config";

/// Target repository and credentials of the admin console.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            token: String::new(),
        }
    }
}

impl Debug for SessionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .finish()
    }
}

impl SessionConfig {
    /// The console only talks to GitHub once it has a token and a repository name.
    pub fn is_complete(&self) -> bool {
        !self.token.is_empty() && !self.repo.is_empty()
    }

    pub fn trimmed(self) -> Self {
        SessionConfig {
            owner: self.owner.trim().to_string(),
            repo: self.repo.trim().to_string(),
            branch: self.branch.trim().to_string(),
            token: self.token.trim().to_string(),
        }
    }
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> io::Result<Option<SessionConfig>>;
    fn save(&self, config: &SessionConfig) -> io::Result<()>;
}

/// Key/value JSON file holding the session under [`STORAGE_KEY`].
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        FileSessionStore { path }
    }

    /// `<config dir>/SimpleCMS/storage.json`
    pub fn default_path() -> io::Result<PathBuf> {
        match dirs::config_dir() {
            Some(dir) => Ok(dir.join("SimpleCMS").join("storage.json")),
            None => Err(io::Error::new(ErrorKind::NotFound, "Could not find user config dir")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_storage(&self) -> io::Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e),
        };

        serde_json::from_str(&content).map_err(|e| io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing storage file {}: {}", self.path.display(), e)))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> io::Result<Option<SessionConfig>> {
        let mut storage = self.read_storage()?;
        match storage.remove(STORAGE_KEY) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Invalid {}: {}", STORAGE_KEY, e))),
        }
    }

    fn save(&self, config: &SessionConfig) -> io::Result<()> {
        let mut storage = self.read_storage()?;
        let value = serde_json::to_value(config)?;
        storage.insert(STORAGE_KEY.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&storage)?;
        fs::write(&self.path, content)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemorySessionStore {
    config: Mutex<Option<SessionConfig>>,
}

#[cfg(test)]
impl MemorySessionStore {
    pub fn with_config(config: SessionConfig) -> Self {
        MemorySessionStore { config: Mutex::new(Some(config)) }
    }
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn load(&self) -> io::Result<Option<SessionConfig>> {
        let config = self.config.lock().map_err(|e| io::Error::new(ErrorKind::Other, e.to_string()))?;
        Ok(config.clone())
    }

    fn save(&self, config: &SessionConfig) -> io::Result<()> {
        let mut stored = self.config.lock().map_err(|e| io::Error::new(ErrorKind::Other, e.to_string()))?;
        *stored = Some(config.clone());
        Ok(())
    }
}
