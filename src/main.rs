use std::fs::File;
use std::path::PathBuf;

use biblia::Provider;
use biblia::core::config::{CliOverrides, load_config, resolve};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "biblia", about = "Terminal reader for the Portuguese Bible")]
struct Args {
    /// LLM provider to use (overrides config and BIBLIA_PROVIDER)
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name to request from the provider
    #[arg(short, long)]
    model: Option<String>,

    /// File where navigation and highlights are persisted
    #[arg(long)]
    state_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to biblia.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("biblia.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = load_config().map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = resolve(
        &file_config,
        CliOverrides {
            provider: args.provider.as_ref(),
            model: args.model.as_deref(),
            state_file: args.state_file.as_deref(),
        },
    );

    log::info!(
        "Biblia starting up with provider {:?}, model {}",
        config.provider,
        config.model_name
    );

    biblia::tui::run(config)
}
