extern crate iron;
#[macro_use]
extern crate log;
extern crate mongo_driver;
#[macro_use]
extern crate quick_error;
extern crate sharebin;
extern crate simplelog;

mod cmdargs;

use cmdargs::Backend;
use iron::error::HttpError;
use sharebin::StoreInterface;
use sharebin::fs_impl::FileStore;
use sharebin::mem_impl::MemoryStore;
use sharebin::mongo_impl::MongoStore;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Args(err: cmdargs::Error) {
            cause(err)
            from()
        }
        Store(err: sharebin::Error) {
            cause(err)
            from()
        }
        Http(err: HttpError) {
            cause(err)
            from()
        }
        Log(err: log::SetLoggerError) {
            cause(err)
            from()
        }
    }
}

fn init_logs(verbose: usize) -> Result<(), Error> {
    // Set up the logging depending on how many times a '-v' option has been used.
    let verbosity = match verbose {
        1 => simplelog::LevelFilter::Warn,
        2 => simplelog::LevelFilter::Info,
        3 => simplelog::LevelFilter::Debug,
        4 => simplelog::LevelFilter::Trace,
        _ => simplelog::LevelFilter::Error,
    };
    simplelog::SimpleLogger::init(verbosity, Default::default())?;
    Ok(())
}

fn serve<Db>(db: Db, addr: &str, url_prefix: &str) -> Result<(), Error>
    where Db: StoreInterface + 'static
{
    sharebin::web::run_web(db, addr, url_prefix)?;
    unreachable!()
}

fn run() -> Result<(), Error> {
    let options = cmdargs::parse()?;
    init_logs(options.verbose)?;
    let cmdargs::Options { backend,
                           web_addr,
                           url_prefix,
                           .. } = options;
    match backend {
        Backend::Mongo(db_options) => serve(MongoStore::new(db_options), &web_addr, &url_prefix),
        Backend::Files(path) => serve(FileStore::new(path)?, &web_addr, &url_prefix),
        Backend::Memory => {
            warn!("No storage configured, records are kept in memory and lost on exit");
            serve(MemoryStore::new(), &web_addr, &url_prefix)
        }
    }
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => error!["Caught an error: {:?}", e],
    }
}
