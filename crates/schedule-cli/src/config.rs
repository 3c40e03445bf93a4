//! Optional TOML configuration for the `schedule` CLI.
//!
//! ```toml
//! [expand]
//! max_iterations = 365
//! biweekly_cadence = "two_week"
//!
//! [grid]
//! start_hour = 8
//! end_hour = 21
//! block_minutes = 15
//! ```
//!
//! Missing tables fall back to the engine defaults. Without a `[grid]` table the
//! day layout uses the daily preset and the week layout the weekly preset.

use std::path::Path;

use anyhow::{Context, Result};
use schedule_engine::{ExpandOptions, GridConfig};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub expand: ExpandOptions,
    pub grid: Option<GridConfig>,
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        if let Some(grid) = &config.grid {
            grid.validate()
                .with_context(|| format!("Invalid [grid] in {}", path.display()))?;
        }
        Ok(config)
    }

    /// Grid for a view, honouring an explicit `[grid]` table.
    pub fn grid_for(&self, week: bool) -> GridConfig {
        match self.grid {
            Some(grid) => grid,
            None if week => GridConfig::weekly(),
            None => GridConfig::daily(),
        }
    }
}
