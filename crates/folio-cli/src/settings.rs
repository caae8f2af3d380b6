//! Command-line flags and the optional TOML config file.
//!
//! Flags override file values, which override defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Default)]
#[command(name = "folio", about = "Terminal admin panel for Folio portfolio content")]
pub struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Base URL of the folio server (default: http://localhost:8080).
  #[arg(long, env = "FOLIO_URL")]
  pub url: Option<String>,

  /// API username.
  #[arg(long, env = "FOLIO_USER")]
  pub user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "FOLIO_PASSWORD")]
  pub password: Option<String>,

  /// Edit the offline store in DIR instead of a server.
  #[arg(long, value_name = "DIR")]
  pub local: Option<PathBuf>,

  /// Offline store to use when the server cannot be reached.
  #[arg(long, value_name = "DIR", env = "FOLIO_FALLBACK_DIR")]
  pub fallback_dir: Option<PathBuf>,

  /// Append logs to FILE. Without it nothing is logged.
  #[arg(long, value_name = "FILE", env = "FOLIO_LOG_FILE")]
  pub log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ConfigFile {
  pub url:          Option<String>,
  pub username:     Option<String>,
  pub password:     Option<String>,
  pub local_dir:    Option<PathBuf>,
  pub fallback_dir: Option<PathBuf>,
  pub log_file:     Option<PathBuf>,
}

impl ConfigFile {
  pub fn read(path: &std::path::Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

// ─── Resolved settings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub url:          String,
  pub username:     String,
  pub password:     String,
  /// When set, the server is never contacted.
  pub local_dir:    Option<PathBuf>,
  pub fallback_dir: Option<PathBuf>,
  pub log_file:     Option<PathBuf>,
}

impl Settings {
  /// Read the config file named by `args`, if any, and merge.
  pub fn load(args: Args) -> Result<Self> {
    let file = match &args.config {
      Some(path) => ConfigFile::read(path)?,
      None => ConfigFile::default(),
    };
    Ok(Self::merge(args, file))
  }

  pub fn merge(args: Args, file: ConfigFile) -> Self {
    let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
    Self {
      url:          non_empty(args.url)
        .or_else(|| non_empty(file.url))
        .unwrap_or_else(|| DEFAULT_URL.to_string()),
      username:     non_empty(args.user).or(non_empty(file.username)).unwrap_or_default(),
      password:     non_empty(args.password).or(non_empty(file.password)).unwrap_or_default(),
      local_dir:    args.local.or(file.local_dir),
      fallback_dir: args.fallback_dir.or(file.fallback_dir),
      log_file:     args.log_file.or(file.log_file),
    }
  }
}
