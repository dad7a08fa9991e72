//! tap-asana - a Singer tap extracting tasks and stories from Asana.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tap_asana::asana::AsanaClient;
use tap_asana::singer::SingerWriter;
use tap_asana::{config, sync, State, TapError};

#[derive(Parser, Debug)]
#[command(name = "tap-asana")]
#[command(version)]
#[command(about = "Singer tap that extracts tasks and stories from the Asana API")]
struct Cli {
    /// Config file (JSON object with access_token and projects)
    #[arg(short, long)]
    config: PathBuf,

    /// State file (one JSON checkpoint per line; last line wins)
    #[arg(short, long)]
    state: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout is reserved for Singer messages.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match &e {
            TapError::MissingConfigKeys(keys) => {
                tracing::error!("Missing required configuration keys: {:?}", keys);
            }
            other => {
                tracing::error!("{}", other);
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> tap_asana::Result<()> {
    let config = config::load_config(&cli.config)?;
    let state = match &cli.state {
        Some(path) => config::load_state(path)?,
        None => State::new(),
    };

    let client = AsanaClient::new(config.access_token.clone());
    let stdout = std::io::stdout().lock();
    let mut writer = SingerWriter::new(stdout);

    sync::sync(&config, state, &client, &mut writer).await?;
    Ok(())
}
