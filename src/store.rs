//! The record store: key issuance and lookup on top of a storage backend.

use {Content, Error, StoreInterface};
use key;

/// How many generated codes a single put may try before giving up. A
/// collision on a generated code is a roughly one-in-four-billion event, so
/// the bound is a backstop against a backend gone mad, not a working path.
const MAX_GENERATE_ATTEMPTS: usize = 16;

/// A record store bound to a storage backend.
///
/// Issues access codes, claims them in the backend and resolves them back to
/// contents. Records are immutable: there is no update and no removal.
pub struct Store {
    db: Box<StoreInterface>,
}

impl Store {
    /// Wraps a storage backend.
    pub fn new(db: Box<StoreInterface>) -> Self {
        Store { db }
    }

    /// Stores a file under a caller-supplied keyword or a generated code.
    ///
    /// Returns the key the record has been claimed under.
    pub fn put_file(&self,
                    key: Option<&str>,
                    file_name: &str,
                    data: &[u8])
                    -> Result<String, Error> {
        self.put(key,
                 |k| self.db.file_exists(k),
                 |k| self.db.insert_file(k, file_name, data))
    }

    /// Stores a text under a caller-supplied keyword or a generated code.
    pub fn put_text(&self, key: Option<&str>, content: &str) -> Result<String, Error> {
        self.put(key,
                 |k| self.db.text_exists(k),
                 |k| self.db.insert_text(k, content))
    }

    /// Resolves a key to its content.
    ///
    /// The file namespace is consulted first, then the text namespace: a
    /// file claimed under the same key as a text shadows the text.
    pub fn get(&self, key: &str) -> Result<Content, Error> {
        key::validate(key)?;
        if let Some(entry) = self.db.load_file(key)? {
            return Ok(Content::File(entry));
        }
        match self.db.load_text(key)? {
            Some(text) => Ok(Content::Text(text)),
            None => Err(Error::KeyNotFound(key.into())),
        }
    }

    /// Returns the file name behind a key, if the key holds a file.
    pub fn file_name(&self, key: &str) -> Result<Option<String>, Error> {
        key::validate(key)?;
        self.db.load_file_name(key)
    }

    /// Tells the maximum payload size that could be handled.
    pub fn max_data_size(&self) -> usize {
        self.db.max_data_size()
    }

    /// Claims a key and inserts a record through the given closures.
    ///
    /// An explicit keyword is used as is: if it is taken the put is rejected
    /// with `KeyCollision`. Without one, codes are generated until a free
    /// one is claimed. The existence pre-check on the explicit path is a
    /// fast reject; a concurrent claim slipping in between still loses at
    /// the insert, which is the authoritative check.
    fn put<E, I>(&self, key: Option<&str>, exists: E, insert: I) -> Result<String, Error>
        where E: Fn(&str) -> Result<bool, Error>,
              I: Fn(&str) -> Result<(), Error>
    {
        match key {
            Some(key) => {
                key::validate(key)?;
                if exists(key)? {
                    return Err(Error::KeyCollision(key.into()));
                }
                insert(key)?;
                Ok(key.into())
            }
            None => {
                let mut last_taken = String::new();
                for _ in 0..MAX_GENERATE_ATTEMPTS {
                    let key = key::generate();
                    match insert(&key) {
                        Ok(()) => return Ok(key),
                        Err(Error::KeyCollision(_)) => {
                            warn!("Generated key '{}' is already taken, retrying", key);
                            last_taken = key;
                        }
                        Err(e) => return Err(e),
                    }
                }
                Err(Error::KeyCollision(last_taken))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FileEntry;
    use mem_impl::MemoryStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn store() -> Store {
        Store::new(Box::new(MemoryStore::new()))
    }

    #[test]
    fn text_round_trip() {
        let store = store();
        let key = store.put_text(None, "hello world").unwrap();
        assert_eq!(Content::Text("hello world".into()), store.get(&key).unwrap());
        match store.get(&format!("{}x", key)) {
            Err(Error::KeyNotFound(_)) => {}
            x => panic!("Expected KeyNotFound, got {:?}", x),
        }
    }

    #[test]
    fn file_round_trip() {
        let store = store();
        let key = store.put_file(None, "a.txt", b"data").unwrap();
        let expected = FileEntry { file_name: "a.txt".into(),
                                   data: b"data".to_vec(), };
        assert_eq!(Content::File(expected), store.get(&key).unwrap());
    }

    #[test]
    fn keyword_put_is_stored_under_the_keyword() {
        let store = store();
        let key = store.put_text(Some("notes"), "remember me").unwrap();
        assert_eq!("notes", key);
        assert_eq!(Content::Text("remember me".into()), store.get("notes").unwrap());
    }

    #[test]
    fn taken_keyword_is_rejected_and_nothing_is_lost() {
        let store = store();
        store.put_text(Some("words"), "first").unwrap();
        match store.put_text(Some("words"), "second") {
            Err(Error::KeyCollision(ref key)) if key == "words" => {}
            x => panic!("Expected KeyCollision, got {:?}", x),
        }
        assert_eq!(Content::Text("first".into()), store.get("words").unwrap());
    }

    #[test]
    fn bad_keyword_is_rejected() {
        let store = store();
        match store.put_text(Some("../escape"), "payload") {
            Err(Error::InvalidKey(_)) => {}
            x => panic!("Expected InvalidKey, got {:?}", x),
        }
    }

    #[test]
    fn files_shadow_texts() {
        let store = store();
        store.put_text(Some("shared"), "text side").unwrap();
        store.put_file(Some("shared"), "a.txt", b"file side").unwrap();
        match store.get("shared").unwrap() {
            Content::File(entry) => assert_eq!(b"file side".to_vec(), entry.data),
            x => panic!("A file should shadow a text, got {:?}", x),
        }
        assert_eq!(Some("a.txt".to_string()), store.file_name("shared").unwrap());
    }

    /// A backend that pretends the first few generated keys are taken.
    struct Contended {
        inner: MemoryStore,
        rejections: AtomicUsize,
    }

    impl StoreInterface for Contended {
        fn file_exists(&self, key: &str) -> Result<bool, Error> {
            self.inner.file_exists(key)
        }

        fn text_exists(&self, key: &str) -> Result<bool, Error> {
            self.inner.text_exists(key)
        }

        fn insert_file(&self, key: &str, file_name: &str, data: &[u8]) -> Result<(), Error> {
            self.inner.insert_file(key, file_name, data)
        }

        fn insert_text(&self, key: &str, content: &str) -> Result<(), Error> {
            if self.rejections.load(Ordering::SeqCst) > 0 {
                self.rejections.fetch_sub(1, Ordering::SeqCst);
                return Err(Error::KeyCollision(key.into()));
            }
            self.inner.insert_text(key, content)
        }

        fn load_file(&self, key: &str) -> Result<Option<FileEntry>, Error> {
            self.inner.load_file(key)
        }

        fn load_file_name(&self, key: &str) -> Result<Option<String>, Error> {
            self.inner.load_file_name(key)
        }

        fn load_text(&self, key: &str) -> Result<Option<String>, Error> {
            self.inner.load_text(key)
        }

        fn max_data_size(&self) -> usize {
            self.inner.max_data_size()
        }
    }

    #[test]
    fn generated_key_retries_past_collisions() {
        let db = Contended { inner: MemoryStore::new(),
                             rejections: AtomicUsize::new(3), };
        let store = Store::new(Box::new(db));
        let key = store.put_text(None, "persistent").unwrap();
        assert_eq!(Content::Text("persistent".into()), store.get(&key).unwrap());
    }

    #[test]
    fn hopeless_contention_is_reported() {
        let db = Contended { inner: MemoryStore::new(),
                             rejections: AtomicUsize::new(1_000), };
        let store = Store::new(Box::new(db));
        match store.put_text(None, "never lands") {
            Err(Error::KeyCollision(_)) => {}
            x => panic!("Expected KeyCollision, got {:?}", x),
        }
    }

    #[test]
    fn concurrent_puts_of_one_keyword_admit_one_writer() {
        let db = MemoryStore::new();
        let store = Arc::new(Store::new(Box::new(db)));
        let threads: Vec<_> = (0..4).map(|n| {
                                        let store = Arc::clone(&store);
                                        thread::spawn(move || {
                                            store.put_text(Some("contended"),
                                                           &format!("writer {}", n))
                                        })
                                    })
                                    .collect();
        let results: Vec<_> = threads.into_iter()
                                     .map(|handle| handle.join().unwrap())
                                     .collect();
        let wins = results.iter().filter(|outcome| outcome.is_ok()).count();
        assert_eq!(1, wins, "Exactly one writer must claim the key: {:?}", results);
        for outcome in results {
            if let Err(err) = outcome {
                match err {
                    Error::KeyCollision(_) => {}
                    x => panic!("Losers must see KeyCollision, got {:?}", x),
                }
            }
        }
    }
}
