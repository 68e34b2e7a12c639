use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use restlos::config::{
    ApiConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, bootstrap_subscriber, init_logging,
};
use restlos::core::auth::DictionaryProvider;
use restlos::server::ServerBuilder;
use restlos::storage::InMemoryObjectStore;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "restlos",
    about = "REST API for monitoring configuration objects",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Run the API server (default)
    Serve,
    /// Print an argon2 digest for the dictionary provider
    HashPassword {
        /// Password to hash, read from stdin when omitted
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cli.config).await,
        Command::HashPassword { password } => hash_password(password).await,
    }
}

async fn serve(path: &Path) -> Result<()> {
    let config = tracing::subscriber::with_default(bootstrap_subscriber(), || ApiConfig::load(path))?;
    init_logging(&config.logging)?;

    tracing::info!(config = %path.display(), "starting restlos");

    let store = InMemoryObjectStore::new().with_output_dir(config.output_dir.clone());
    ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .serve()
        .await
}

async fn hash_password(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("unable to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let digest =
        tokio::task::spawn_blocking(move || DictionaryProvider::hash_password(&password)).await??;
    println!("{}", digest);
    Ok(())
}
