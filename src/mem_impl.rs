//! In-memory storage backend.

use {Error, FileEntry, StoreInterface};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard};

/// Process-local storage: two keyword-indexed maps behind a mutex.
///
/// Nothing survives a restart, which makes this backend a development and
/// testing vehicle. Cloning produces another handle to the same storage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    files: Arc<Mutex<HashMap<String, FileEntry>>>,
    texts: Arc<Mutex<HashMap<String, String>>>,
}

/// A poisoned lock only means some thread panicked mid-operation; the maps
/// themselves stay usable, so the poison marker is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Default::default()
    }
}

impl StoreInterface for MemoryStore {
    fn file_exists(&self, key: &str) -> Result<bool, Error> {
        Ok(lock(&self.files).contains_key(key))
    }

    fn text_exists(&self, key: &str) -> Result<bool, Error> {
        Ok(lock(&self.texts).contains_key(key))
    }

    fn insert_file(&self, key: &str, file_name: &str, data: &[u8]) -> Result<(), Error> {
        match lock(&self.files).entry(key.to_string()) {
            Entry::Occupied(_) => Err(Error::KeyCollision(key.into())),
            Entry::Vacant(slot) => {
                slot.insert(FileEntry { file_name: file_name.into(),
                                        data: data.to_vec(), });
                Ok(())
            }
        }
    }

    fn insert_text(&self, key: &str, content: &str) -> Result<(), Error> {
        match lock(&self.texts).entry(key.to_string()) {
            Entry::Occupied(_) => Err(Error::KeyCollision(key.into())),
            Entry::Vacant(slot) => {
                slot.insert(content.to_string());
                Ok(())
            }
        }
    }

    fn load_file(&self, key: &str) -> Result<Option<FileEntry>, Error> {
        Ok(lock(&self.files).get(key).cloned())
    }

    fn load_file_name(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(lock(&self.files).get(key).map(|entry| entry.file_name.clone()))
    }

    fn load_text(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(lock(&self.texts).get(key).cloned())
    }

    fn max_data_size(&self) -> usize {
        15 * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_independent() {
        let db = MemoryStore::new();
        db.insert_file("k", "f.bin", b"bytes").unwrap();
        db.insert_text("k", "words").unwrap();
        assert!(db.file_exists("k").unwrap());
        assert!(db.text_exists("k").unwrap());
        assert_eq!(Some("words".to_string()), db.load_text("k").unwrap());
        assert_eq!(Some("f.bin".to_string()), db.load_file_name("k").unwrap());
    }

    #[test]
    fn second_claim_of_a_key_is_rejected() {
        let db = MemoryStore::new();
        db.insert_text("k", "first").unwrap();
        match db.insert_text("k", "second") {
            Err(Error::KeyCollision(_)) => {}
            x => panic!("Expected KeyCollision, got {:?}", x),
        }
        assert_eq!(Some("first".to_string()), db.load_text("k").unwrap());
    }

    #[test]
    fn clones_share_storage() {
        let db = MemoryStore::new();
        db.clone().insert_text("k", "shared").unwrap();
        assert_eq!(Some("shared".to_string()), db.load_text("k").unwrap());
    }

    #[test]
    fn missing_keys_are_simply_absent() {
        let db = MemoryStore::new();
        assert!(!db.file_exists("nope").unwrap());
        assert_eq!(None, db.load_file("nope").unwrap());
        assert_eq!(None, db.load_text("nope").unwrap());
    }
}
