use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::Result;
use clap::Parser as ClapParser;
use tryme::apachelog::Logs;
use tryme::document::DocumentOptions;
use tryme::handler::TryMe;
use tryme::rouille_runner::run_server;
use tryme::store::DirStore;
use tryme::util::{getenv, getenv_or, listen_host};
use tryme::warn::QUIET;


#[derive(clap::Parser, Debug)]
/// Serve a live preview editor for the HTML, CSS and Javascript
/// snippets of one project.
///
/// The snippets are kept as NAME.html, NAME.css and NAME.js, the
/// library configuration as NAME.toml, all in the directory given by
/// the TRYME_DIR env var (default: current directory). Access and
/// error logs go to stderr, or to files in TRYME_LOGDIR if set.
struct Args {
    /// The project name
    #[clap(required(true))]
    name: String,

    /// The address to listen on, `*` for all interfaces
    #[clap(default_value("*"))]
    address: String,

    /// The port to listen on
    #[clap(default_value("8001"))]
    port: u16,

    /// Number of rows of the text areas
    #[clap(long, default_value("20"))]
    rows: u32,

    /// Character encoding of the page, e.g. utf-8 or iso-8859-1
    #[clap(long, default_value("utf-8"))]
    charset: String,

    /// Don't print warnings
    #[clap(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    QUIET.store(args.quiet, Ordering::Relaxed);

    let basedir = getenv_or("TRYME_DIR", Some("."))?;
    let logs = Arc::new(
        if let Some(logbasedir) = getenv("TRYME_LOGDIR")? {
            eprintln!("Logging to dir {logbasedir:?}");
            Logs::open_in_basedir(&logbasedir)?
        } else {
            Logs::stderr()
        });

    let tryme = Arc::new(TryMe::new(
        args.name,
        Arc::new(DirStore::new(basedir)),
        DocumentOptions {
            charset: args.charset,
            textarea_rows: args.rows,
        })?);

    run_server(&format!("{}:{}", listen_host(&args.address), args.port),
               tryme,
               logs)
}
