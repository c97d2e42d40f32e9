use std::env;

use gridot_codec::CodecOptions;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Largest number of operations one range in an edit may expand into
    pub max_range_cells: u64,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Config {
    /// Load configuration from the environment, reading a `.env` file first if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let max_range_cells = match lookup("GRIDOT_MAX_RANGE_CELLS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                anyhow::anyhow!("Invalid GRIDOT_MAX_RANGE_CELLS {:?}: {}", raw, e)
            })?,
            None => CodecOptions::DEFAULT_MAX_RANGE_CELLS,
        };

        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            max_range_cells,
            log_filter,
        })
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            max_range_cells: self.max_range_cells,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_range_cells: CodecOptions::DEFAULT_MAX_RANGE_CELLS,
            log_filter: "info".to_string(),
        }
    }
}
