// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Saved Games
//
// The hosted persistence service sits behind `GameStore`. The engine only ever
// hands it an opaque JSON document; callers in `simulation` turn every error
// into `None`/`false`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("saved game not found: {0}")]
    NotFound(String),

    #[error("save name cannot be empty")]
    EmptyName,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to encode saved game: {0}")]
    Encode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedGame {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Bumped on every overwrite of the same (user, name).
    pub revision: u64,
    pub state: serde_json::Value,
}

/// Listing entry without the (potentially large) state document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedGameInfo {
    pub id: String,
    pub name: String,
    pub revision: u64,
}

impl From<&SavedGame> for SavedGameInfo {
    fn from(game: &SavedGame) -> Self {
        Self { id: game.id.clone(), name: game.name.clone(), revision: game.revision }
    }
}

// ---------------------------------------------------------------------------
// GameStore
// ---------------------------------------------------------------------------

pub trait GameStore {
    /// Saves under (user, name). An existing save with the same name is
    /// overwritten (last write wins) and keeps its id.
    fn save(&mut self, user_id: &str, name: &str, state: serde_json::Value) -> Result<String, StoreError>;

    fn list(&self, user_id: &str) -> Result<Vec<SavedGameInfo>, StoreError>;

    fn load(&self, id: &str) -> Result<SavedGame, StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// In-process store. Backs tests, the bench and offline play.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    games: BTreeMap<String, SavedGame>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn find(&self, user_id: &str, name: &str) -> Option<&SavedGame> {
        self.games.values().find(|g| g.user_id == user_id && g.name == name)
    }
}

impl GameStore for MemoryStore {
    fn save(&mut self, user_id: &str, name: &str, state: serde_json::Value) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let (id, revision) = match self.find(user_id, name) {
            Some(existing) => (existing.id.clone(), existing.revision + 1),
            None => {
                self.next_id += 1;
                (format!("save-{}", self.next_id), 1)
            }
        };

        self.games.insert(
            id.clone(),
            SavedGame {
                id: id.clone(),
                user_id: user_id.to_string(),
                name: name.to_string(),
                revision,
                state,
            },
        );
        Ok(id)
    }

    fn list(&self, user_id: &str) -> Result<Vec<SavedGameInfo>, StoreError> {
        Ok(self
            .games
            .values()
            .filter(|g| g.user_id == user_id)
            .map(SavedGameInfo::from)
            .collect())
    }

    fn load(&self, id: &str) -> Result<SavedGame, StoreError> {
        self.games
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.games
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let id = store.save("alice", "first run", json!({ "cash": "10000" })).unwrap();
        let game = store.load(&id).unwrap();
        assert_eq!(game.name, "first run");
        assert_eq!(game.revision, 1);
        assert_eq!(game.state["cash"], "10000");
    }

    #[test]
    fn test_same_name_overwrites() {
        let mut store = MemoryStore::new();
        let a = store.save("alice", "slot", json!(1)).unwrap();
        let b = store.save("alice", "slot", json!(2)).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        let game = store.load(&a).unwrap();
        assert_eq!(game.state, json!(2));
        assert_eq!(game.revision, 2);
    }

    #[test]
    fn test_list_is_per_user() {
        let mut store = MemoryStore::new();
        store.save("alice", "one", json!(null)).unwrap();
        store.save("alice", "two", json!(null)).unwrap();
        store.save("bob", "one", json!(null)).unwrap();
        assert_eq!(store.list("alice").unwrap().len(), 2);
        assert_eq!(store.list("bob").unwrap().len(), 1);
        assert!(store.list("carol").unwrap().is_empty());
    }

    #[test]
    fn test_missing_and_delete() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.load("nope"), Err(StoreError::NotFound(_))));
        let id = store.save("alice", "x", json!(null)).unwrap();
        store.delete(&id).unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.delete(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.save("alice", "   ", json!(null)), Err(StoreError::EmptyName)));
    }
}
