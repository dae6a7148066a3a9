use clap::Parser;
use tracing_subscriber::EnvFilter;

use blobtour::cli;
use blobtour::error::Result;
use blobtour::storage::StorageClient;

use blobtour::cli::Args;
use blobtour::config::load_storage_config;

const CONFIG_HINT: &str =
    "Hint: set STORAGE_CONNECTION_STRING, or STORAGE_PROVIDER with its STORAGE_* variables";

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        if e.is_configuration() {
            eprintln!("{CONFIG_HINT}");
        }
        std::process::exit(1);
    }
}

// `log` records are bridged into tracing; RUST_LOG filters them, warn by default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

async fn run_app(args: Args) -> Result<()> {
    let config = load_storage_config()?;
    let client = StorageClient::new(config).await?;
    cli::run(args, client).await?;
    Ok(())
}
