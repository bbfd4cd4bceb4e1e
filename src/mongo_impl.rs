//! MongoDB storage backend.
//!
//! Records live in two collections, one per namespace. The key plays the
//! role of `_id`, so the unique index on `_id` is what makes an insert
//! claim-or-fail: a lost race shows up as a duplicate-key error from the
//! server and is mapped to a key collision.

use {DbOptions, Error, FileEntry, StoreInterface};
use bson::{self, Bson, Document};
use mongo_driver::MongoError;
use mongo_driver::client::ClientPool;
use mongo_driver::collection::Collection;
use std::sync::Arc;

/// A MongoDB-backed store.
///
/// Holds a client pool; every operation pops a client from the pool and
/// releases it once the call is done.
#[derive(Debug)]
pub struct MongoStore {
    options: DbOptions,
    client_pool: Arc<ClientPool>,
}

impl MongoStore {
    /// Creates a store with the given options.
    pub fn new(options: DbOptions) -> Self {
        let client_pool = Arc::new(ClientPool::new(options.uri.clone(), None));
        MongoStore { options,
                     client_pool, }
    }

    fn files(&self) -> Collection {
        self.client_pool.pop()
            .take_collection(self.options.db_name.clone(),
                             self.options.files_collection.clone())
    }

    fn texts(&self) -> Collection {
        self.client_pool.pop()
            .take_collection(self.options.db_name.clone(),
                             self.options.texts_collection.clone())
    }
}

fn binary_to_bson(data: &[u8]) -> Bson {
    Bson::Binary(bson::spec::BinarySubtype::Generic, data.to_vec())
}

fn binary_from_bson(data: Bson) -> Result<Vec<u8>, bson::DecoderError> {
    use bson::DecoderError;
    use bson::spec::BinarySubtype;
    match data {
        Bson::Binary(BinarySubtype::Generic, x) => Ok(x),
        x => {
            let msg = format!("Should be generic binary, but: {:?}", x.element_type());
            Err(DecoderError::InvalidType(msg))
        }
    }
}

/// The server reports a violated unique index with an E11000 code line;
/// on an `_id` that means the key has been claimed already.
fn is_duplicate_key(err: &MongoError) -> bool {
    format!("{}", err).contains("E11000")
}

fn insert_unique(collection: &Collection, doc: &Document, key: &str) -> Result<(), Error> {
    match collection.insert(doc, None) {
        Ok(()) => Ok(()),
        Err(ref err) if is_duplicate_key(err) => Err(Error::KeyCollision(key.into())),
        Err(err) => Err(err.into()),
    }
}

fn find_one(collection: &Collection, key: &str) -> Result<Option<Document>, Error> {
    let filter = doc!("_id": key);
    match collection.find(&filter, None)?.next() {
        Some(doc) => Ok(Some(doc?)),
        None => Ok(None),
    }
}

fn exists(collection: &Collection, key: &str) -> Result<bool, Error> {
    Ok(find_one(collection, key)?.is_some())
}

impl StoreInterface for MongoStore {
    fn file_exists(&self, key: &str) -> Result<bool, Error> {
        exists(&self.files(), key)
    }

    fn text_exists(&self, key: &str) -> Result<bool, Error> {
        exists(&self.texts(), key)
    }

    fn insert_file(&self, key: &str, file_name: &str, data: &[u8]) -> Result<(), Error> {
        let new_doc = doc!("_id": key, "filename": file_name, "data": binary_to_bson(data));
        insert_unique(&self.files(), &new_doc, key)
    }

    fn insert_text(&self, key: &str, content: &str) -> Result<(), Error> {
        let new_doc = doc!("_id": key, "content": content);
        insert_unique(&self.texts(), &new_doc, key)
    }

    fn load_file(&self, key: &str) -> Result<Option<FileEntry>, Error> {
        debug!("Looking for a file doc _id = {:?}", key);
        let doc = match find_one(&self.files(), key)? {
            Some(doc) => doc,
            None => return Ok(None),
        };
        let file_name = match doc.get_str("filename") {
            Ok(name) => name.to_string(),
            Err(_) => return Err(Error::DanglingReference(key.into())),
        };
        match doc.get("data").cloned() {
            Some(data) => Ok(Some(FileEntry { file_name,
                                              data: binary_from_bson(data)
                                                        .map_err(MongoError::from)?, })),
            None => Err(Error::DanglingReference(key.into())),
        }
    }

    fn load_file_name(&self, key: &str) -> Result<Option<String>, Error> {
        let doc = match find_one(&self.files(), key)? {
            Some(doc) => doc,
            None => return Ok(None),
        };
        match doc.get_str("filename") {
            Ok(name) => Ok(Some(name.to_string())),
            Err(_) => Err(Error::DanglingReference(key.into())),
        }
    }

    fn load_text(&self, key: &str) -> Result<Option<String>, Error> {
        debug!("Looking for a text doc _id = {:?}", key);
        let doc = match find_one(&self.texts(), key)? {
            Some(doc) => doc,
            None => return Ok(None),
        };
        match doc.get_str("content") {
            Ok(content) => Ok(Some(content.to_string())),
            Err(_) => Err(Error::DanglingReference(key.into())),
        }
    }

    fn max_data_size(&self) -> usize {
        15 * 1024 * 1024
    }
}
