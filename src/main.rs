use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod picker;
mod tmux;
mod workspace;

use config::{Config, Settings};
use error::{Error, Step};
use picker::Picker;
use tmux::{Materializer, TmuxClient};
use workspace::WorkspaceDescriptor;

/// Open a tmux workspace described by a .tmux file
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Directory to search instead of TP_DIRECTORY
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter .tmux file into the current directory
    Init {
        /// Session name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print every .tmux file that would be offered
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn setup_logging(debug: bool) {
    let default = if debug { "tp=debug" } else { "tp=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Init { name }) => {
            let dir = std::env::current_dir()?;
            let path = workspace::write_scaffold(&dir, name)?;
            println!("Created {}", path.display());
            Ok(())
        }
        Some(Command::List) => {
            let config = load_config(cli.root)?;
            let descriptors = workspace::locate(&config.root)?;
            if descriptors.is_empty() {
                return Err(Error::NothingToSelect(config.root).into());
            }
            for path in descriptors {
                println!("{}", path.display());
            }
            Ok(())
        }
        None => open(cli.root).await,
    }
}

/// Locate, pick, build and attach
async fn open(root: Option<PathBuf>) -> Result<()> {
    let config = load_config(root)?;

    let candidates = workspace::locate(&config.root)?;
    let selected = Picker::new().select(&config.root, &candidates).await?;

    let descriptor = WorkspaceDescriptor::parse(&selected)?;
    let base_path = base_dir(&selected)?;

    let client = TmuxClient::new();
    Materializer::new(&client)
        .materialize(&descriptor, &base_path)
        .await?;

    client
        .attach(&descriptor.session_name)
        .await
        .map_err(|e| Error::Multiplexer {
            step: Step::Attach {
                session: descriptor.session_name.clone(),
            },
            message: format!("{:#}", e),
        })?;

    Ok(())
}

fn load_config(root: Option<PathBuf>) -> Result<Config> {
    let settings = Settings::load()?;
    Ok(Config::resolve(root, &settings)?)
}

/// Absolute directory holding the descriptor; every window starts there
fn base_dir(descriptor: &Path) -> Result<PathBuf> {
    let parent = descriptor
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    if parent.is_absolute() {
        Ok(parent.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(parent))
    }
}
