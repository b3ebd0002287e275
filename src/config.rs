use crate::statics;
use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

/// Tunables for one session. Every field falls back to the `statics` default,
/// so a settings file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub search_settle_ms: u64,
    pub save_settle_ms: u64,
    pub id_prefix: String,
    pub export_prefix: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            search_settle_ms: statics::SEARCH_SETTLE_MS,
            save_settle_ms: statics::SAVE_SETTLE_MS,
            id_prefix: statics::SUPPLIER_ID_PREFIX.to_string(),
            export_prefix: statics::EXPORT_FILE_PREFIX.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn parse_json5(text: &str) -> anyhow::Result<Self> {
        let config: Self = json5::from_str(text).context("parsing sync settings")?;
        anyhow::ensure!(
            config.search_settle_ms > 0 && config.save_settle_ms > 0,
            "settle windows must be positive"
        );
        Ok(config)
    }

    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        Self::parse_json5(&text)
    }

    pub fn search_settle(&self) -> Duration {
        Duration::from_millis(self.search_settle_ms)
    }

    pub fn save_settle(&self) -> Duration {
        Duration::from_millis(self.save_settle_ms)
    }
}
