use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install a global fmt subscriber filtered by `config.log_filter`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?} ({}), falling back to info", config.log_filter, e);
        EnvFilter::new("info")
    });

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
    {
        tracing::info!(max_range_cells = config.max_range_cells, "tracing initialized");
    }
}
