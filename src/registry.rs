//! Authority registry.
//!
//! The registry maps authority names to validated configurations, building
//! each one lazily on first use and sharing it for the life of the registry.
//! It is an ordinary value owned by the application; wrap it in an `Arc` to
//! share it between request threads.
//!
//! # Examples
//!
//! ```ignore
//! use authlink::registry::AuthorityRegistry;
//!
//! let registry = AuthorityRegistry::from_directory("config/authorities");
//! let first = registry.resolve("loc_names")?;
//! let again = registry.resolve("LOC_NAMES")?;
//! assert!(std::sync::Arc::ptr_eq(&first, &again));
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::AuthorityConfig;
use crate::error::{LinkedDataError, Result};

/// Where raw authority configuration blocks come from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A directory holding one `<name>.json` file per authority.
    Directory(PathBuf),
    /// Raw blocks held in memory, keyed by authority name.
    Memory(IndexMap<String, Value>),
}

impl ConfigSource {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        match self {
            Self::Memory(blocks) => Ok(blocks
                .iter()
                .find(|(name, _)| normalize(name) == key)
                .map(|(_, block)| block.clone())),
            Self::Directory(dir) => {
                let Some(path) = find_config_file(dir, key)? else {
                    return Ok(None);
                };
                let text = fs::read_to_string(&path)?;
                Ok(Some(serde_json::from_str(&text)?))
            },
        }
    }

    fn names(&self) -> Result<Vec<String>> {
        match self {
            Self::Memory(blocks) => Ok(blocks.keys().map(|k| normalize(k)).collect()),
            Self::Directory(dir) => {
                let mut names: Vec<String> = json_files(dir)?
                    .into_iter()
                    .filter_map(|path| {
                        path.file_stem()
                            .and_then(|s| s.to_str())
                            .map(normalize)
                    })
                    .collect();
                names.sort();
                Ok(names)
            },
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn find_config_file(dir: &Path, key: &str) -> Result<Option<PathBuf>> {
    Ok(json_files(dir)?.into_iter().find(|path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| normalize(stem) == key)
    }))
}

/// One authority's cache cell. `building` serializes the first build of this
/// authority only; other authorities resolve while it runs.
#[derive(Debug, Default)]
struct Slot {
    config: OnceLock<Arc<AuthorityConfig>>,
    building: Mutex<()>,
}

/// Lazily populated cache of authority configurations.
#[derive(Debug)]
pub struct AuthorityRegistry {
    source: ConfigSource,
    entries: RwLock<HashMap<String, Arc<Slot>>>,
}

impl AuthorityRegistry {
    /// Creates a registry over `source`.
    #[must_use]
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry reading `<dir>/<name>.json` files.
    #[must_use]
    pub fn from_directory(dir: impl Into<PathBuf>) -> Self {
        Self::new(ConfigSource::Directory(dir.into()))
    }

    /// Creates a registry over in-memory raw blocks.
    pub fn from_blocks<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self::new(ConfigSource::Memory(
            blocks.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Returns the configuration of `authority_name`, building it on first use.
    ///
    /// Names are matched case-insensitively. Repeated calls return the same
    /// shared instance; concurrent first calls build it exactly once. The map
    /// lock is only held to find a slot, so a slow build never delays lookups
    /// of other authorities.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidLinkedDataAuthority`] if no
    /// configuration exists for the name, or the configuration error raised
    /// while validating it.
    pub fn resolve(&self, authority_name: &str) -> Result<Arc<AuthorityConfig>> {
        let key = normalize(authority_name);
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(unknown(authority_name));
        }

        let slot = self.slot(&key);
        if let Some(config) = slot.config.get() {
            debug!(authority = %key, "authority config cache hit");
            return Ok(Arc::clone(config));
        }

        let guard = slot.building.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = slot.config.get() {
            return Ok(Arc::clone(config));
        }

        debug!(authority = %key, "authority config cache miss");
        match self.build(&key, authority_name) {
            Ok(config) => Ok(Arc::clone(slot.config.get_or_init(|| config))),
            Err(e) => {
                drop(guard);
                self.discard(&key, &slot);
                Err(e)
            },
        }
    }

    fn slot(&self, key: &str) -> Arc<Slot> {
        if let Some(slot) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return Arc::clone(slot);
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key.to_string()).or_default())
    }

    fn build(&self, key: &str, authority_name: &str) -> Result<Arc<AuthorityConfig>> {
        let block = self
            .source
            .load(key)?
            .ok_or_else(|| unknown(authority_name))?;
        let config = Arc::new(AuthorityConfig::from_value(key, &block)?);
        info!(
            authority = %key,
            search = config.supports_search(),
            term = config.supports_term(),
            "registered linked data authority"
        );
        Ok(config)
    }

    /// Drops an empty slot left behind by a failed build.
    fn discard(&self, key: &str, slot: &Arc<Slot>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let unused = entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && current.config.get().is_none());
        if unused {
            entries.remove(key);
        }
    }

    /// Returns true if `authority_name` has already been resolved.
    #[must_use]
    pub fn is_registered(&self, authority_name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize(authority_name))
            .is_some_and(|slot| slot.config.get().is_some())
    }

    /// Returns the number of resolved authorities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.config.get().is_some())
            .count()
    }

    /// Returns true if nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the names of every configured authority.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the configuration directory cannot be read.
    pub fn names(&self) -> Result<Vec<String>> {
        self.source.names()
    }
}

fn unknown(authority_name: &str) -> LinkedDataError {
    LinkedDataError::InvalidLinkedDataAuthority(format!(
        "unable to initialize linked data authority '{authority_name}'"
    ))
}
