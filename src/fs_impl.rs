//! Filesystem storage backend.
//!
//! Layout under the root directory:
//!
//! * `files/<key>.name` — the index entry of a file record, holds the
//!   uploaded file name;
//! * `files/<key>` — the file contents;
//! * `texts/<key>` — a text record.
//!
//! A key is claimed by creating its index entry with `create_new`, which the
//! filesystem admits exactly once. An index entry whose contents file is
//! missing is a dangling reference and is reported as such, distinctly from
//! an unknown key.

use {Error, FileEntry, StoreInterface};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::str;

const MAX_DATA_SIZE: usize = 15 * 1024 * 1024;

/// Storage in a local directory.
pub struct FileStore {
    files_dir: PathBuf,
    texts_dir: PathBuf,
}

impl FileStore {
    /// Opens a store under the given root directory, creating the layout if
    /// needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let files_dir = root.as_ref().join("files");
        let texts_dir = root.as_ref().join("texts");
        fs::create_dir_all(&files_dir)?;
        fs::create_dir_all(&texts_dir)?;
        Ok(FileStore { files_dir,
                       texts_dir, })
    }

    fn name_path(&self, key: &str) -> PathBuf {
        self.files_dir.join(format!("{}.name", key))
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.files_dir.join(key)
    }

    fn text_path(&self, key: &str) -> PathBuf {
        self.texts_dir.join(key)
    }
}

/// Creates a file that must not exist yet. An `AlreadyExists` failure means
/// the key has been claimed by somebody else.
fn claim(path: &Path, key: &str) -> Result<File, Error> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(file),
        Err(e) => {
            if e.kind() == ErrorKind::AlreadyExists {
                Err(Error::KeyCollision(key.into()))
            } else {
                Err(e.into())
            }
        }
    }
}

/// Reads a whole file, with `Ok(None)` for a file that isn't there.
fn read_opt(path: &Path) -> Result<Option<Vec<u8>>, Error> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            return if e.kind() == ErrorKind::NotFound {
                       Ok(None)
                   } else {
                       Err(e.into())
                   };
        }
    };
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(Some(data))
}

impl StoreInterface for FileStore {
    fn file_exists(&self, key: &str) -> Result<bool, Error> {
        Ok(self.name_path(key).exists())
    }

    fn text_exists(&self, key: &str) -> Result<bool, Error> {
        Ok(self.text_path(key).exists())
    }

    fn insert_file(&self, key: &str, file_name: &str, data: &[u8]) -> Result<(), Error> {
        let mut index = claim(&self.name_path(key), key)?;
        index.write_all(file_name.as_bytes())?;
        let mut blob = File::create(self.blob_path(key))?;
        blob.write_all(data)?;
        Ok(())
    }

    fn insert_text(&self, key: &str, content: &str) -> Result<(), Error> {
        let mut file = claim(&self.text_path(key), key)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn load_file(&self, key: &str) -> Result<Option<FileEntry>, Error> {
        let file_name = match self.load_file_name(key)? {
            Some(name) => name,
            None => return Ok(None),
        };
        match read_opt(&self.blob_path(key))? {
            Some(data) => Ok(Some(FileEntry { file_name,
                                              data, })),
            None => Err(Error::DanglingReference(key.into())),
        }
    }

    fn load_file_name(&self, key: &str) -> Result<Option<String>, Error> {
        match read_opt(&self.name_path(key))? {
            Some(bytes) => Ok(Some(str::from_utf8(&bytes)?.to_string())),
            None => Ok(None),
        }
    }

    fn load_text(&self, key: &str) -> Result<Option<String>, Error> {
        match read_opt(&self.text_path(key))? {
            Some(bytes) => Ok(Some(str::from_utf8(&bytes)?.to_string())),
            None => Ok(None),
        }
    }

    fn max_data_size(&self) -> usize {
        MAX_DATA_SIZE
    }
}
