use crate::favorites::error::FavoritesError;
use crate::favorites::storage::KeyValueStorage;
use crate::record::RecordId;
use serde_json::Value;
use tracing::{debug, warn};

/// Storage key under which the favorite ids are persisted.
pub const FAVORITES_KEY: &str = "favoriteIds";

/// Insertion-ordered set of favorite record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: Vec<RecordId>,
}

impl FavoritesSet {
    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, id: RecordId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &RecordId) -> bool {
        match self.ids.iter().position(|existing| existing == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ids)
    }

    /// Parse a persisted payload. Anything that is not a JSON array yields an
    /// empty set; numeric entries are kept as their text, others skipped.
    fn from_payload(payload: &str) -> Self {
        let mut set = FavoritesSet::default();
        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Array(items)) => {
                for item in items {
                    match item {
                        Value::String(s) => {
                            set.insert(RecordId::new(s));
                        }
                        Value::Number(n) => {
                            set.insert(RecordId::new(n.to_string()));
                        }
                        other => debug!(?other, "ignoring non-scalar favorite entry"),
                    }
                }
            }
            Ok(other) => warn!(?other, "favorites payload is not an array; starting empty"),
            Err(e) => warn!(error = %e, "favorites payload is corrupt; starting empty"),
        }
        set
    }
}

/// The persisted favorites set together with its storage.
///
/// Every mutation is written through to storage before it returns.
#[derive(Debug)]
pub struct FavoritesStore<S: KeyValueStorage> {
    storage: S,
    set: FavoritesSet,
}

impl<S: KeyValueStorage> FavoritesStore<S> {
    /// Read the persisted favorites. Missing or malformed data yields an empty
    /// set, never an error.
    pub fn load(storage: S) -> Self {
        let set = match storage.get_item(FAVORITES_KEY) {
            Ok(Some(payload)) => FavoritesSet::from_payload(&payload),
            Ok(None) => FavoritesSet::default(),
            Err(e) => {
                warn!(error = %e, "failed to read favorites; starting empty");
                FavoritesSet::default()
            }
        };
        debug!(count = set.len(), "loaded favorites");
        Self { storage, set }
    }

    /// Flip membership of `id` and persist the result. If the write fails the
    /// in-memory set is restored and the error returned.
    pub fn toggle(&mut self, id: &RecordId) -> Result<&FavoritesSet, FavoritesError> {
        let previous = self.set.clone();
        let added = if self.set.contains(id) {
            self.set.remove(id);
            false
        } else {
            self.set.insert(id.clone());
            true
        };

        if let Err(e) = self.persist() {
            self.set = previous;
            return Err(e);
        }
        debug!(%id, added, "toggled favorite");
        Ok(&self.set)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.set.contains(id)
    }

    pub fn ids(&self) -> &FavoritesSet {
        &self.set
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> Result<(), FavoritesError> {
        let payload = self.set.to_json()?;
        self.storage.set_item(FAVORITES_KEY, &payload)?;
        Ok(())
    }
}
