use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use engine_logging::LogDestination;
use gallery_app::{list_records, load_config, show_record, upload_file, Session};
use gallery_engine::{EngineConfig, EngineHandle};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "gallery", about = "Browse gallery records and upload videos")]
struct Cli {
    /// Settings file (RON). Defaults to ./gallery.ron when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write logs to this file.
    #[arg(long, env = "GALLERY_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Seconds to wait for any single operation.
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every record as a card.
    List,
    /// Show the detail view of one record.
    Show { id: String },
    /// Validate and upload a video, then queue it for processing.
    Upload { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let destination = match cli.log_file.clone() {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(destination, cli.log_level);

    let cwd = std::env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &cwd)?;
    let engine = EngineHandle::new(EngineConfig::from_env());
    let mut session = Session::new(engine, config.upload);
    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Command::List => {
            for line in list_records(&mut session, timeout)? {
                println!("{line}");
            }
        }
        Command::Show { id } => {
            for line in show_record(&mut session, &id, timeout)? {
                println!("{line}");
            }
        }
        Command::Upload { path } => {
            let mut last = String::new();
            let job_id = upload_file(&mut session, &path, timeout, |line| {
                if line != last {
                    println!("{line}");
                    last = line.to_string();
                }
            })?;
            println!("job_id: {job_id}");
        }
    }
    Ok(())
}
