use anyhow::{Context, Result};
use std::path::PathBuf;

/// Filesystem locations the CLI falls back to when no path is given.
/// Constructed once at startup; never mutated after that.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub catalog_dir: PathBuf,
}

impl Ctx {
    /// Construct paths from environment variables.
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").context("$HOME is not set")?;

        let xdg = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{home}/.config"));

        Ok(Self {
            catalog_dir: PathBuf::from(xdg).join("tagtext").join("messages"),
        })
    }
}
