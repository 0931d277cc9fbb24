use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::team::TEAM_COUNT;

/// The key every snapshot lives under. Stores are generic key-value maps and
/// the whole session is one value.
pub const SESSION_KEY: &str = "ghici.session";

/// The durable slice of a session. Everything else, the running round and
/// the skipped words included, is rebuilt from scratch on restore.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub teams: [String; TEAM_COUNT],
    pub words: Vec<String>,
    pub scores: [u32; TEAM_COUNT],
}

/// Where session snapshots go. Implementations must tolerate being called
/// from the session actor after every command, so `save` should be cheap.
pub trait SessionStore: Send + Sync {
    fn save(&self, session: &SavedSession) -> Result<(), Error>;
    fn load(&self) -> Result<Option<SavedSession>, Error>;
}

/// An in-process store, mostly for tests and single-instance deployments.
/// Values are serialized to JSON so that swapping in an external key-value
/// backend does not change the stored shape.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &SavedSession) -> Result<(), Error> {
        let value = serde_json::to_string(session)
            .map_err(|error| Error::Store(format!("Could not serialize the session. {error}")))?;
        let mut entries = self
            .entries
            .write()
            .map_err(|error| Error::Store(format!("The store lock is poisoned. {error}")))?;
        entries.insert(SESSION_KEY.to_string(), value);
        Ok(())
    }

    fn load(&self) -> Result<Option<SavedSession>, Error> {
        let entries = self
            .entries
            .read()
            .map_err(|error| Error::Store(format!("The store lock is poisoned. {error}")))?;
        match entries.get(SESSION_KEY) {
            Some(value) => serde_json::from_str(value)
                .map(Some)
                .map_err(|error| Error::Store(format!("Could not deserialize the session. {error}"))),
            None => Ok(None),
        }
    }
}
