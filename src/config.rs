use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::{rlog_debug, Error, Result};

/// Model used when none is configured or passed on the command line.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Render command used when none is configured.
pub const DEFAULT_RENDER_COMMAND: &str = "manim";

/// Seconds to wait between batch tasks when none is configured.
pub const DEFAULT_BATCH_COOLDOWN_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Root directory for per-reel output folders.
    pub output_dir: Option<String>,
    /// Model name; `gemini*` selects the Gemini backend, anything else OpenAI.
    pub model: Option<String>,
    /// Render engine command (resolved via PATH lookup).
    pub render_command: Option<String>,
    /// Cooldown between batch tasks, in seconds.
    pub batch_cooldown_secs: Option<u64>,
}

impl Config {
    pub fn mathreel_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".mathreel"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::mathreel_dir()?.join("mathreel.toml"))
    }

    /// Root under which each reel gets its own output directory.
    pub fn output_root(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(expand_tilde(dir)),
            None => Ok(Self::mathreel_dir()?.join("output")),
        }
    }

    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn effective_render_command(&self) -> &str {
        self.render_command.as_deref().unwrap_or(DEFAULT_RENDER_COMMAND)
    }

    pub fn batch_cooldown(&self) -> Duration {
        Duration::from_secs(
            self.batch_cooldown_secs
                .unwrap_or(DEFAULT_BATCH_COOLDOWN_SECS),
        )
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        rlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            rlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        rlog_debug!(
            "Config loaded: output_dir={:?}, model={:?}, render_command={:?}",
            config.output_dir,
            config.model,
            config.render_command
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::mathreel_dir()?;
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        rlog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        let dir = Self::mathreel_dir()?;
        let output_root = self.output_root()?;
        rlog_debug!(
            "Config::ensure_dirs dir={} output={}",
            dir.display(),
            output_root.display()
        );
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        if !output_root.exists() {
            fs::create_dir_all(&output_root)?;
        }
        Ok(())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
