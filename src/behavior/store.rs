use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::behavior::{parse_definitions, Behavior, BehaviorError, BehaviorSource};

/// Errors raised by the persistent behavior store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read behavior store {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write behavior store {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt behavior store {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read behavior definitions {}: {source}", path.display())]
    Definitions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}

/// On-disk layout of the store
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    behaviors: Vec<Behavior>,
}

impl StoreFile {
    fn upsert(&mut self, behavior: Behavior) {
        match self
            .behaviors
            .iter_mut()
            .find(|b| b.description == behavior.description)
        {
            Some(existing) => *existing = behavior,
            None => self.behaviors.push(behavior),
        }
    }
}

/// JSON-file key/value store of behaviors, keyed by description
///
/// When the store holds no rows, [`BehaviorSource::load_behaviors`] seeds it
/// from the definitions file (if one is configured), persists the rows and
/// reads them back so callers always see the stored format.
///
/// # Example Usage
/// ```no_run
/// use trout::behavior::{BehaviorSource, BehaviorStore};
///
/// let store = BehaviorStore::open("behaviors.json").with_definitions("malicious_behaviors.txt");
/// let behaviors = store.load_behaviors()?;
/// println!("{} behaviors available", behaviors.len());
/// # Ok::<(), trout::behavior::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BehaviorStore {
    path: PathBuf,
    definitions: Option<PathBuf>,
}

impl BehaviorStore {
    /// Point at a store file. Nothing is read until first use; a missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            definitions: None,
        }
    }

    /// Definitions file used to seed an empty store
    pub fn with_definitions<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.definitions = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn definitions_path(&self) -> Option<&Path> {
        self.definitions.as_deref()
    }

    /// All stored rows, in insertion order, without seeding
    pub fn behaviors(&self) -> Result<Vec<Behavior>, StoreError> {
        Ok(self.read()?.behaviors)
    }

    /// Insert a behavior, replacing any row with the same description
    pub fn insert(&self, behavior: Behavior) -> Result<(), StoreError> {
        behavior.validate()?;

        let mut file = self.read()?;
        file.upsert(behavior);
        self.write(&file)
    }

    /// Build, stamp and persist a new behavior from its parts
    pub fn insert_sequence(
        &self,
        description: &str,
        sequence: Vec<String>,
    ) -> Result<Behavior, StoreError> {
        let behavior = Behavior::new(description, sequence)?;
        self.insert(behavior.clone())?;
        Ok(behavior)
    }

    /// Seed the store from the definitions file, returning the number of rows written
    pub fn seed(&self) -> Result<usize, StoreError> {
        let Some(definitions) = &self.definitions else {
            tracing::warn!(
                "No behavior definitions file configured; cannot seed {}",
                self.path.display()
            );
            return Ok(0);
        };

        let content =
            fs::read_to_string(definitions).map_err(|source| StoreError::Definitions {
                path: definitions.clone(),
                source,
            })?;

        let seeded = parse_definitions(&content)?;
        if seeded.is_empty() {
            tracing::error!(
                "Could not retrieve any behaviors from {}",
                definitions.display()
            );
            return Ok(0);
        }

        let mut file = self.read()?;
        let count = seeded.len();
        for behavior in seeded {
            file.upsert(behavior);
        }
        self.write(&file)?;

        tracing::info!(
            "Seeded {} behaviors from {} into {}",
            count,
            definitions.display(),
            self.path.display()
        );
        Ok(count)
    }

    fn read(&self) -> Result<StoreFile, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(StoreFile::default());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, file: &StoreFile) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(file).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Write-then-rename so a crash never leaves a truncated store
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

impl BehaviorSource for BehaviorStore {
    fn load_behaviors(&self) -> Result<Vec<Behavior>, StoreError> {
        let behaviors = self.behaviors()?;
        if !behaviors.is_empty() {
            return Ok(behaviors);
        }

        tracing::warn!(
            "Could not retrieve malicious behaviors from {}. Seeding from definitions",
            self.path.display()
        );
        self.seed()?;

        // Re-read so seeded rows come back in their stored form
        self.behaviors()
    }
}
