use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flatdb::config::Config;
use flatdb::confirm::{AssumeYes, Confirm, Prompt};
use flatdb::format;
use flatdb::repl::Repl;
use flatdb::storage::JsonStorage;
use flatdb::Database;

/// A small table store driven by line commands.
#[derive(Parser, Debug)]
#[command(name = "flatdb", version, about)]
struct Args {
    /// Configuration file (defaults to ./flatdb.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog file
    #[arg(long, value_name = "FILE", env = "FLATDB_META_FILE")]
    meta_file: Option<PathBuf>,

    /// Directory holding table data
    #[arg(long, value_name = "DIR", env = "FLATDB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// REPL history file
    #[arg(long, value_name = "FILE")]
    history_file: Option<PathBuf>,

    /// Run a single command and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Do not ask before dropping tables or deleting rows
    #[arg(short = 'y', long)]
    yes: bool,

    /// Report how long each command took
    #[arg(long)]
    timing: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let storage = JsonStorage::new(&config.meta_file, &config.data_dir);
    let confirm: Box<dyn Confirm> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(Prompt)
    };
    let db = Database::new(storage, confirm);

    match &args.command {
        Some(line) => {
            let mut db = db;
            let reply = db.run_line(line);
            println!("{}", format::render_reply(&reply, config.timing));
            if reply.result.is_err() {
                anyhow::bail!("command did not complete");
            }
            Ok(())
        }
        None => Repl::new(db, config.timing).run(config.history_file.as_deref()),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("flatdb=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flatdb=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;

    // Override with command line arguments
    if let Some(meta_file) = &args.meta_file {
        config.meta_file = meta_file.clone();
    }
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(history) = &args.history_file {
        config.history_file = Some(history.clone());
    }
    config.assume_yes |= args.yes;
    config.timing |= args.timing;

    Ok(config)
}
