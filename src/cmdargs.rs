extern crate clap;

use sharebin::DbOptions;
use std::path::PathBuf;

type MongoUri = ::mongo_driver::client::Uri;

quick_error! {
    /// Commandline parsing errors.
    #[derive(Debug)]
    pub enum Error {
        /// A required argument has not been provided.
        NoArgument(arg: String) {
            description("Argument not found")
            display("No argument '{}' provided", arg)
        }
        /// URI parsing failure.
        ParseUri(uri: String) {
            description("Can't parse URI")
            display("Can't parse URI {}", uri)
        }
    }
}

/// Which storage backend to run against.
#[derive(Debug)]
pub enum Backend {
    /// A MongoDB server.
    Mongo(DbOptions),
    /// A local directory.
    Files(PathBuf),
    /// Process memory, lost on exit.
    Memory,
}

#[derive(Debug)]
/// Command line options.
pub struct Options {
    /// Selected storage backend.
    pub backend: Backend,
    /// Address the web server listens on.
    pub web_addr: String,
    /// Prefix for the record URLs in upload replies.
    pub url_prefix: String,
    /// Verbosity level.
    pub verbose: usize,
}

/// A helper to simplify a creation of a "no argument" error.
fn no_arg(arg: &str) -> Error {
    Error::NoArgument(arg.into())
}

fn parse_uri(arg: &str) -> Result<MongoUri, Error> {
    match MongoUri::new(arg.to_string()) {
        Some(uri) => Ok(uri),
        None => Err(Error::ParseUri(arg.to_string())),
    }
}

/// Parses command line arguments.
pub fn parse() -> Result<Options, Error> {
    let args = build_cli().get_matches();
    let backend = if let Some(uri) = args.value_of("DB_URI") {
        let uri = parse_uri(uri)?;
        let db_name = args.value_of("DB_NAME").ok_or(no_arg("DB_NAME"))?
                          .to_string();
        let files_collection = args.value_of("FILES_COLLECTION").ok_or(no_arg("FILES_COLLECTION"))?
                                   .to_string();
        let texts_collection = args.value_of("TEXTS_COLLECTION").ok_or(no_arg("TEXTS_COLLECTION"))?
                                   .to_string();
        Backend::Mongo(DbOptions { uri,
                                   db_name,
                                   files_collection,
                                   texts_collection, })
    } else if let Some(path) = args.value_of("STORAGE_PATH") {
        Backend::Files(path.into())
    } else {
        Backend::Memory
    };
    let web_addr = args.value_of("WEB_ADDR").ok_or(no_arg("WEB_ADDR"))?
                       .to_string();
    let url_prefix = args.value_of("URL_PREFIX").unwrap_or("").to_string();
    let verbose = args.occurrences_of("VERBOSE") as usize;

    Ok(Options { backend,
                 web_addr,
                 url_prefix,
                 verbose, })
}

/// Builds command line arguments.
fn build_cli() -> clap::App<'static, 'static> {
    use self::clap::{App, Arg};
    App::new("ShareBin web server").about("Launches a file and text sharing web server.")
                                   .arg(Arg::with_name("DB_URI").long("db-uri")
                                                                .value_name("URI")
                                                                .takes_value(true)
                                                                .requires("DB_NAME")
                                                                .conflicts_with("STORAGE_PATH")
                                                                .help("MongoDB URI (mongodb://...); \
                                                                       stores records in a database"))
                                   .arg(Arg::with_name("DB_NAME").long("db-name")
                                                                 .value_name("name")
                                                                 .takes_value(true)
                                                                 .help("Name of the database"))
                                   .arg(Arg::with_name("FILES_COLLECTION").long("files-collection")
                                                                          .value_name("name")
                                                                          .takes_value(true)
                                                                          .default_value("files")
                                                                          .help("Collection that holds \
                                                                                 file records"))
                                   .arg(Arg::with_name("TEXTS_COLLECTION").long("texts-collection")
                                                                          .value_name("name")
                                                                          .takes_value(true)
                                                                          .default_value("texts")
                                                                          .help("Collection that holds \
                                                                                 text records"))
                                   .arg(Arg::with_name("STORAGE_PATH").long("storage-path")
                                                                      .value_name("DIR")
                                                                      .takes_value(true)
                                                                      .help("Stores records under a \
                                                                             local directory"))
                                   .arg(Arg::with_name("WEB_ADDR").long("web-addr")
                                                                  .value_name("addr")
                                                                  .takes_value(true)
                                                                  .default_value("0.0.0.0:8000")
                                                                  .help("Address to listen on"))
                                   .arg(Arg::with_name("URL_PREFIX").long("url-prefix")
                                                                    .value_name("URL")
                                                                    .takes_value(true)
                                                                    .help("Prefix for the record URLs \
                                                                           in upload replies"))
                                   .arg(Arg::with_name("VERBOSE").long("verbose")
                                                                 .short("v")
                                                                 .takes_value(false)
                                                                 .required(false)
                                                                 .multiple(true)
                                                                 .help("Verbosity level"))
}
