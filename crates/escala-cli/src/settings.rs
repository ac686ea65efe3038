//! Binary settings, layered from defaults, an optional TOML file, `ESCALA_*`
//! environment variables and command-line flags, in that order.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "~/.local/share/escala/escala.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5280;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub store_path: PathBuf,
  pub host:       String,
  pub port:       u16,
}

/// Values given on the command line, which win over every other source.
#[derive(Debug, Default)]
pub struct Overrides {
  pub store_path: Option<PathBuf>,
  pub host:       Option<String>,
  pub port:       Option<u16>,
}

impl Settings {
  pub fn load(file: &Path, overrides: Overrides) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("ESCALA"))
      .set_override_option(
        "store_path",
        overrides.store_path.map(|p| p.to_string_lossy().into_owned()),
      )?
      .set_override_option("host", overrides.host)?
      .set_override_option("port", overrides.port.map(i64::from))?
      .build()
      .with_context(|| format!("failed to read settings from {}", file.display()))?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
