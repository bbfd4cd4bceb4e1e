//! A simple file and text sharing library.
//!
//! A client uploads a file (bytes plus a file name) or a piece of text and
//! receives a short access code; later the content is retrieved by presenting
//! that code. A caller may also pick its own keyword instead of a generated
//! code, as long as the keyword is still free.
//!
//! The library is split into a storage-agnostic core and a set of storage
//! backends. The [StoreInterface](trait.StoreInterface.html) trait is the
//! boundary: implementations are provided for MongoDB
//! ([mongo_impl](mongo_impl/index.html)), a local directory
//! ([fs_impl](fs_impl/index.html)) and process memory
//! ([mem_impl](mem_impl/index.html)). On top of that,
//! [web::run_web](web/fn.run_web.html) serves the whole thing over HTTP.

#[macro_use]
extern crate bson;
extern crate data_encoding;
extern crate iron;
#[macro_use]
extern crate log;
extern crate mime_guess;
extern crate mongo_driver;
#[macro_use]
extern crate quick_error;
extern crate rand;
extern crate tree_magic;

#[cfg(test)]
extern crate reqwest;

pub mod error;
pub mod fs_impl;
pub mod key;
pub mod mem_impl;
mod mime;
pub mod mongo_impl;
mod read;
mod request;
pub mod store;
pub mod web;


pub use error::Error;
pub use iron::error::HttpResult;
pub use mongo_driver::MongoError;
pub use store::Store;

/// Database options.
#[derive(Debug, Clone)]
pub struct DbOptions {
    /// Database connection URI.
    pub uri: mongo_driver::client::Uri,
    /// Database name.
    pub db_name: String,
    /// Collection that holds file records.
    pub files_collection: String,
    /// Collection that holds text records.
    pub texts_collection: String,
}

/// A stored file: the name it was uploaded under plus its raw contents.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// Name the file was uploaded under.
    pub file_name: String,
    /// Raw contents.
    pub data: Vec<u8>,
}

/// A record resolved by an access code.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// A file with its name.
    File(FileEntry),
    /// A piece of UTF-8 text.
    Text(String),
}

/// Interface to a record store.
///
/// There are two independent namespaces, one for files and one for texts; a
/// key taken in one says nothing about the other. Records are immutable:
/// once a key is claimed the data behind it is never updated nor removed.
///
/// The `insert_*` methods claim a key and store the record in one go: if the
/// key is already taken they must fail with
/// [Error::KeyCollision](enum.Error.html) and leave the existing record
/// intact, no matter how many writers race for the key.
pub trait StoreInterface: Send + Sync {
    /// Checks whether a key is taken in the file namespace.
    fn file_exists(&self, key: &str) -> Result<bool, Error>;

    /// Checks whether a key is taken in the text namespace.
    fn text_exists(&self, key: &str) -> Result<bool, Error>;

    /// Claims `key` in the file namespace and stores a file under it.
    fn insert_file(&self, key: &str, file_name: &str, data: &[u8]) -> Result<(), Error>;

    /// Claims `key` in the text namespace and stores a text under it.
    fn insert_text(&self, key: &str, content: &str) -> Result<(), Error>;

    /// Loads a file record.
    ///
    /// `Ok(None)` means the key is not taken in the file namespace. A key
    /// whose index entry is present while the contents are gone yields
    /// [Error::DanglingReference](enum.Error.html).
    fn load_file(&self, key: &str) -> Result<Option<FileEntry>, Error>;

    /// Loads the name a file was uploaded under, without its contents.
    fn load_file_name(&self, key: &str) -> Result<Option<String>, Error>;

    /// Loads a text record.
    fn load_text(&self, key: &str) -> Result<Option<String>, Error>;

    /// Tells the maximum payload size that could be handled.
    fn max_data_size(&self) -> usize;
}
