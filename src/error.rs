//! Library errors.

use iron::IronError;
use iron::status;
use mongo_driver::MongoError;
use std::io;
use std::str;

quick_error! {
    /// Container for errors that might happen while storing or serving
    /// records.
    #[derive(Debug)]
    pub enum Error {
        /// Input/output error.
        Io(err: io::Error) {
            from()
            cause(err)
        }
        /// Key already taken at write time.
        KeyCollision(key: String) {
            description("Key already taken")
            display("Key '{}' is already taken", key)
        }
        /// Lookup key unmatched in any namespace.
        KeyNotFound(key: String) {
            description("Key not found")
            display("Key '{}' not found", key)
        }
        /// An index entry exists but the data behind it is gone.
        DanglingReference(key: String) {
            description("Record data is missing")
            display("Key '{}' points to missing data", key)
        }
        /// Database failure; the operation may be retried.
        Database(err: MongoError) {
            from()
            cause(err)
        }
        /// Key doesn't qualify as a keyword.
        InvalidKey(key: String) {
            description("Invalid key")
            display("Invalid key '{}'", key)
        }
        /// Data limit exceeded.
        TooBig {
            description("Too large upload")
        }
        /// File upload without a file name.
        NoFileName {
            description("File name segment not found in the URL")
        }
        /// Upload kind is neither `file` nor `text`.
        UnknownKind(kind: String) {
            description("Unknown upload kind")
            display("Unknown upload kind '{}'", kind)
        }
        /// UTF8 conversion error.
        Utf8(err: str::Utf8Error) {
            from()
            cause(err)
        }
        /// URL parsing error.
        Url(err: String) {
            description("Can't parse URL")
            display("Can't parse URL: {}", err)
        }
    }
}

impl From<Error> for IronError {
    fn from(err: Error) -> IronError {
        match err {
            e @ Error::KeyNotFound(_) => IronError::new(e, status::NotFound),
            e @ Error::KeyCollision(_) => IronError::new(e, status::Conflict),
            e @ Error::TooBig => IronError::new(e, status::PayloadTooLarge),
            e @ Error::DanglingReference(_) => IronError::new(e, status::InternalServerError),
            e @ Error::Database(_) => IronError::new(e, status::ServiceUnavailable),
            e => IronError::new(e, status::BadRequest),
        }
    }
}
