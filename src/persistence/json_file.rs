use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use log::{debug, error, info};
use thiserror::Error;

use crate::domain::{Container, Entity, HandleError};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("File does not exist: {0}")]
    Missing(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// What the service does when the backing file cannot be read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the failure to the caller.
    #[default]
    Surface,
    /// Log it and carry on: unreadable files count as empty collections and
    /// failed writes still report success.
    Mask,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Surface => write!(f, "surface"),
            FailurePolicy::Mask => write!(f, "mask"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "surface" => Ok(FailurePolicy::Surface),
            "mask" => Ok(FailurePolicy::Mask),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

pub fn read_container<C: Container, P: AsRef<Path>>(path: P) -> Result<C, PersistenceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            PersistenceError::Missing(path.to_path_buf())
        } else {
            PersistenceError::Read { path: path.to_path_buf(), source }
        }
    })?;

    serde_json::from_str(&text).map_err(|source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrites the whole file with the pretty-printed container.
pub fn write_container<C: Container, P: AsRef<Path>>(path: P, container: &C) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(container).map_err(PersistenceError::Serialize)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| PersistenceError::Write { path: path.to_path_buf(), source })?;

    file.write_all(json.as_bytes())
        .map_err(|source| PersistenceError::Write { path: path.to_path_buf(), source })
}

/// One collection file. Every access loads the file afresh; the mutex keeps
/// load-modify-save cycles on the same file from interleaving.
#[derive(Debug)]
pub struct JsonFileStore<C> {
    path: PathBuf,
    failures: FailurePolicy,
    lock: Mutex<()>,
    _container: PhantomData<fn() -> C>,
}

impl<C: Container> JsonFileStore<C> {
    pub fn new<P: Into<PathBuf>>(path: P, failures: FailurePolicy) -> Self {
        JsonFileStore {
            path: path.into(),
            failures,
            lock: Mutex::new(()),
            _container: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<C, PersistenceError> {
        read_container(&self.path)
    }

    pub fn save(&self, container: &C) -> Result<(), PersistenceError> {
        write_container(&self.path, container)
    }

    /// Loads the collection, degrading to an empty one when the file does
    /// not exist yet or when failures are masked.
    fn snapshot(&self) -> Result<C, PersistenceError> {
        match self.load() {
            Ok(container) => Ok(container),
            Err(PersistenceError::Missing(path)) => {
                info!("{} not found, starting with an empty {}", path.display(), C::KEY);
                Ok(C::default())
            }
            Err(err) => {
                error!("{}", err);
                match self.failures {
                    FailurePolicy::Mask => Ok(C::default()),
                    FailurePolicy::Surface => Err(err),
                }
            }
        }
    }

    fn persist(&self, container: &C) -> Result<(), PersistenceError> {
        match self.save(container) {
            Ok(()) => {
                debug!("Saved {} {} to {}", container.items().len(), C::KEY, self.path.display());
                Ok(())
            }
            Err(err) => {
                error!("{}", err);
                match self.failures {
                    FailurePolicy::Mask => Ok(()),
                    FailurePolicy::Surface => Err(err),
                }
            }
        }
    }

    pub fn read<T, F>(&self, f: F) -> Result<T, HandleError>
    where
        F: FnOnce(&[Entity]) -> T,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let container = self.snapshot()?;
        Ok(f(container.items()))
    }

    /// Runs `f` over a fresh snapshot and saves the result when `f` succeeds.
    /// Nothing is written when `f` fails.
    pub fn modify<T, F>(&self, f: F) -> Result<T, HandleError>
    where
        F: FnOnce(&mut Vec<Entity>) -> Result<T, HandleError>,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut container = self.snapshot()?;
        let result = f(container.items_mut())?;
        self.persist(&container)?;
        Ok(result)
    }
}
