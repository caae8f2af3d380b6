//! folio-server binary.
//!
//! Serves the JSON API under `/api` from a SQLite file. Settings come from
//! `folio.toml` (or `--config`) and `FOLIO_*` environment variables.
//!
//! Run with `--hash-password` to turn a password typed on stdin into the
//! argon2 string expected in `auth_password_hash`.

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
};

use anyhow::Context as _;
use clap::Parser;
use folio_server::{ServerConfig, app, expand_tilde, hash_password, load_config};
use folio_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Folio portfolio content server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "folio.toml")]
  config: PathBuf,

  /// Hash a password read from stdin, print it and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  if cli.hash_password {
    return print_hash();
  }

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cfg = load_config(&cli.config)
    .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
  serve(cfg).await
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
  let db = expand_tilde(&cfg.store_path);
  match db.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
      .with_context(|| format!("creating data directory {}", dir.display()))?,
    _ => {}
  }
  let store = SqliteStore::open(&db)
    .await
    .with_context(|| format!("opening store {}", db.display()))?;

  let auth = cfg.auth();
  if auth.is_none() {
    tracing::warn!("auth_username / auth_password_hash not set; writes are open");
  }

  let address = cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("binding {address}"))?;
  tracing::info!(store = %db.display(), "serving http://{address}/api");

  axum::serve(listener, app(store, auth)).await.context("server stopped")
}

fn print_hash() -> anyhow::Result<()> {
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line).context("reading password")?;
  let password = line.trim_end_matches(['\r', '\n']);
  let hash = hash_password(password).map_err(|e| anyhow::anyhow!("hashing password: {e}"))?;
  println!("{hash}");
  Ok(())
}
