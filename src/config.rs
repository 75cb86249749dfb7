use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::view::DEFAULT_INDENT;
use crate::{hlog_debug, Error, Result};

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_RECONNECT_MS: u64 = 2000;
const MAX_INDENT: usize = 16;

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Planner feed endpoint as `host:port`.
    pub addr: Option<String>,
    pub reconnect_interval_ms: Option<u64>,
    /// Columns of indentation per tree level.
    pub indent_width: Option<usize>,
}

impl Config {
    pub fn htnview_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".htnview"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::htnview_dir()?.join("htnview.toml"))
    }

    pub fn effective_addr(&self) -> &str {
        self.addr.as_deref().unwrap_or(DEFAULT_ADDR)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms.unwrap_or(DEFAULT_RECONNECT_MS))
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width.unwrap_or(DEFAULT_INDENT)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        hlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            hlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        hlog_debug!(
            "Config loaded: addr={:?}, reconnect_interval_ms={:?}, indent_width={:?}",
            config.addr,
            config.reconnect_interval_ms,
            config.indent_width
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(addr) = &self.addr {
            if addr.rsplit_once(':').map_or(true, |(host, port)| {
                host.is_empty() || port.parse::<u16>().is_err()
            }) {
                return Err(Error::Validation(format!(
                    "addr must be host:port, got '{}'",
                    addr
                )));
            }
        }
        if self.reconnect_interval_ms == Some(0) {
            return Err(Error::Validation(
                "reconnect_interval_ms must be positive".to_string(),
            ));
        }
        if self.indent_width.is_some_and(|w| w > MAX_INDENT) {
            return Err(Error::Validation(format!(
                "indent_width must be at most {}",
                MAX_INDENT
            )));
        }
        Ok(())
    }
}
