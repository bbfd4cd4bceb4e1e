//! Module that deals with a web server.
//!
//! See [run_web](fn.run_web.html) documentation for details.

use {Content, Error, HttpResult, Store, StoreInterface};
use iron::{self, Handler, Url};
use iron::headers::ContentType;
use iron::method::Method;
use iron::modifiers::Redirect;
use iron::prelude::*;
use iron::status;
use mime;
use read::load_data;
use request::RequestExt;
use std::net::ToSocketAddrs;
use std::str;

/// An intermediate structure that ties a record store to the web.
struct ShareBin {
    store: Store,
    url_prefix: String,
}

/// A short plain-text notice served at the root.
const USAGE: &'static str = "sharebin\n\n\
                             POST /text         store the body as a text\n\
                             POST /file/<name>  store the body as a file called <name>\n\
                             GET  /<code>       fetch a stored record\n\n\
                             Uploads reply with an access code; pass ?key=<keyword>\n\
                             to pick your own keyword instead.\n";

impl ShareBin {
    /// Initializes a web frontend over a record store.
    fn new(store: Store, url_prefix: String) -> Self {
        ShareBin { store,
                   url_prefix, }
    }

    /// Serves a stored record.
    fn serve_record(&self, key: &str, name_provided: bool) -> IronResult<Response> {
        if !name_provided {
            // A file is better fetched under its own name: redirect
            // `/<key>` to `/<key>/<file-name>`.
            if let Some(name) = self.store.file_name(key)? {
                let new_url = Url::parse(&format!("{}{}/{}", self.url_prefix, key, name))
                    .map_err(|e| Error::Url(e))?;
                return Ok(Response::with((status::MovedPermanently, Redirect(new_url))));
            }
        }
        match self.store.get(key)? {
            Content::File(entry) => {
                let mime_type = mime::data_mime_type(&entry.file_name, &entry.data);
                debug!("Mime: {}", mime_type);
                let mut response = Response::new();
                response.headers.set(mime::to_content_type(mime_type));
                response.set_mut((status::Ok, entry.data));
                Ok(response)
            }
            Content::Text(text) => {
                let mut response = Response::new();
                response.headers.set(ContentType::plaintext());
                response.set_mut((status::Ok, text));
                Ok(response)
            }
        }
    }

    /// Handles `GET` requests.
    ///
    /// Without a URI segment a short usage notice is rendered; otherwise the
    /// first segment is the access code and the record is fetched.
    fn get(&self, req: &mut Request) -> IronResult<Response> {
        let key = match req.url_segment_n(0) {
            None => {
                let mut response = Response::new();
                response.headers.set(ContentType::plaintext());
                response.set_mut((status::Ok, USAGE));
                return Ok(response);
            }
            Some(key) => key.to_string(),
        };
        self.serve_record(&key, req.url_segment_n(1).is_some())
    }

    /// Handles `POST` and `PUT` requests.
    ///
    /// The first URI segment picks the namespace (`file` or `text`), the
    /// second one is the file name for a file upload. An optional `key`
    /// argument requests a concrete keyword instead of a generated code.
    fn post(&self, req: &mut Request) -> IronResult<Response> {
        let kind = req.url_segment_n(0).unwrap_or("").to_string();
        let file_name = req.url_segment_n(1).map(|s| s.to_string());
        let keyword = req.get_arg("key").map(|s| s.into_owned());
        debug!("Upload kind: {:?}, file name: {:?}, keyword: {:?}",
               kind,
               file_name,
               keyword);
        let data = load_data(&mut req.body, self.store.max_data_size())?;
        let keyword = keyword.as_ref().map(|s| s.as_str());
        let key = match kind.as_str() {
            "file" => {
                let file_name = file_name.ok_or(Error::NoFileName)?;
                self.store.put_file(keyword, &file_name, &data)?
            }
            "text" => {
                let text = str::from_utf8(&data).map_err(Error::from)?;
                self.store.put_text(keyword, text)?
            }
            other => return Err(Error::UnknownKind(other.into()).into()),
        };
        debug!("Claimed key: {}", key);
        Ok(Response::with((status::Created,
                           format!("{}{}\n", self.url_prefix, key))))
    }
}

impl Handler for ShareBin {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        match req.method {
            Method::Get => self.get(req),
            Method::Post | Method::Put => self.post(req),
            // Records are immutable: no removal, no update.
            _ => Ok(Response::with(status::MethodNotAllowed)),
        }
    }
}

/// Runs a web server.
///
/// This is the main function of the library. Starts a web server over a
/// storage backend and serves `GET`, `POST` and `PUT` requests; `POST` and
/// `PUT` are not distinguished, since CLI clients disagree on which one to
/// use for sending data.
///
/// The call returns a `HttpResult` which comes directly from `Iron`, which
/// means you can possibly terminate the server in a clean way. If you don't
/// `close` it explicitly, the object will hang forever in its `drop`
/// implementation. For more details have a look at the
/// `iron::error::HttpResult` documentation.
///
/// # Arguments
///
/// * `db` is a storage backend, any implementation of
/// [StoreInterface](../trait.StoreInterface.html).
///
/// * `addr` is a local address for the server to listen on, e.g.
/// `"0.0.0.0:8000"`.
///
/// * `url_prefix` is used for responding to uploads: a successful one is
/// answered with `${url_prefix}key\n`, so you probably want to put an
/// external address of your service instance here. No matter how many ending
/// slashes you add to it (even zero), exactly one will be kept.
pub fn run_web<Db, A>(db: Db, addr: A, url_prefix: &str) -> HttpResult<iron::Listening>
    where Db: StoreInterface + 'static,
          A: ToSocketAddrs
{
    // Make sure there is only one trailing slash.
    let url_prefix = format!("{}/", url_prefix.trim_right_matches('/'));
    let handler = ShareBin::new(Store::new(Box::new(db)), url_prefix);
    Iron::new(handler).http(addr)
}
