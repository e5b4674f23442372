use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::settings::ServerSettings;

/// Install the global subscriber. `RUST_LOG` wins over `filter`; output goes
/// to stderr so stdout stays free for command results.
///
/// Returns false when a subscriber was already installed.
pub fn init(filter: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = Registry::default().with(env_filter).with(layer).try_init().is_ok();
    if installed {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "blueprint bridge starting");
    }
    installed
}

/// Log the effective configuration.
pub fn log_settings(settings: &ServerSettings) {
    tracing::info!(
        bind = %settings.bind,
        project = ?settings.project_file,
        autosave = settings.autosave,
        "configuration loaded"
    );
}
