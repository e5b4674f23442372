use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, warn};

use blueprint_bridge::api;
use blueprint_bridge::logging;
use blueprint_bridge::paths;
use blueprint_bridge::settings::{self, ServerSettings};
use blueprint_bridge::state::AppState;

#[derive(Parser)]
#[command(name = "bpbridge", about = "Blueprint graph command server", version)]
struct Cli {
    /// Config directory override (settings.json lives here)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Project file to serve; created on first save if missing
    #[arg(long)]
    project: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:55557
    #[arg(long)]
    bind: Option<String>,

    /// tracing filter directive (RUST_LOG still wins)
    #[arg(long)]
    log: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_dir = cli.config_dir.unwrap_or_else(paths::default_config_dir);
    let stored = settings::load_settings(&config_dir);
    let first_run = stored.is_none() && !paths::settings_path(&config_dir).exists();
    let mut settings = stored.unwrap_or_default();
    if let Some(bind) = cli.bind {
        settings.bind = bind;
    }
    if let Some(filter) = cli.log {
        settings.log_filter = filter;
    }

    logging::init(&settings.log_filter);
    logging::log_settings(&settings);

    // Seed the config dir with defaults so there is a file to edit.
    if first_run {
        if let Err(e) = settings::save_settings(&config_dir, &ServerSettings::default()) {
            warn!(error = %e, "could not write default settings");
        }
    }

    let state = match AppState::open(settings, cli.project) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!(error = %e, "failed to open project");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = api::serve(state).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
