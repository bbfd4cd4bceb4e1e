//! A helper module for guessing content types of served files.

use iron::headers::ContentType;
use mime_guess;
use std::path::Path;
use tree_magic;

/// Converts a given mime type into a content type.
pub fn to_content_type(mime_type: String) -> ContentType {
    match mime_type.parse() {
        Ok(mime) => ContentType(mime),
        Err(()) => ContentType::plaintext(),
    }
}

/// Guesses a mime type from a file name extension.
fn mime_from_file_name(name: &str) -> Option<&'static str> {
    Path::new(name).extension()
                   .and_then(|s| s.to_str())
                   .and_then(mime_guess::get_mime_type_str)
}

/// Guesses a mime type of a stored file: by its name first, by its contents
/// when the extension says nothing.
pub fn data_mime_type(file_name: &str, data: &[u8]) -> String {
    mime_from_file_name(file_name).map(Into::into)
                                  .unwrap_or_else(|| tree_magic::from_u8(data))
}
