//! `escala`: the ministry rotation schedule from the command line.
//!
//! # Usage
//!
//! ```
//! escala schedule --month 3
//! escala ministry add "Joias de Cristo"
//! escala exception set 2026-01-02 "Sábado Extra" --extra
//! escala serve --port 5280
//! ```

mod render;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use axum::Router;
use clap::{Parser, Subcommand, ValueEnum};
use escala_core::{
  calendar::{MonthGrid, month_events},
  config::{Direction, ScheduleConfig},
  date::{format_date, parse_date},
  document::{ScheduleDocument, export_file_name},
  event::{EventKind, ExceptionEvent},
  exceptions::{remove_exception, upsert_exception},
  generate, merge,
  store::{load_exceptions, load_or_init_config, save_config, save_exceptions},
  weekday::Weekday,
};
use escala_store_sqlite::SqliteStore;
use settings::{Overrides, Settings};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "escala", version, about = "Ministry rotation schedule")]
struct Cli {
  /// Path to the TOML settings file.
  #[arg(short, long, value_name = "FILE", default_value = "escala.toml")]
  config: PathBuf,

  /// Path to the SQLite store (overrides `store_path` in the settings).
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the merged schedule for the configured year.
  Schedule {
    /// Only this month (1-12).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    /// Print JSON instead of text.
    #[arg(long)]
    json:  bool,
  },
  /// Print one month as a calendar grid.
  Calendar {
    #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,
  },
  /// Show or edit the schedule configuration.
  #[command(subcommand)]
  Config(ConfigCommand),
  /// Edit the rotation's ministries.
  #[command(subcommand)]
  Ministry(MinistryCommand),
  /// Manage manual overrides.
  #[command(subcommand)]
  Exception(ExceptionCommand),
  /// Write config and exceptions as one JSON document.
  Export {
    /// Output file; defaults to `escala-missa-<year>.json`. Use `-` for
    /// stdout.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
  },
  /// Replace config and/or exceptions from an exported document.
  Import { file: PathBuf },
  /// Serve the JSON API over HTTP.
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
  Show,
  /// Set the schedule year.
  Year { year: i32 },
  /// Set the fifth-Sunday ministry; an empty name turns the rule off.
  FifthSunday { name: String },
  /// Toggle a weekday (DOM, SEG, TER, QUA, QUI, SEX, SAB).
  Weekday { code: String },
}

/// A ministry is addressed by id or by its 1-based position.
#[derive(Subcommand, Debug)]
enum MinistryCommand {
  Add { name: String },
  Rename { ministry: String, name: String },
  Move { ministry: String, direction: MoveArg },
  Remove { ministry: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MoveArg {
  Up,
  Down,
}

impl From<MoveArg> for Direction {
  fn from(arg: MoveArg) -> Self {
    match arg {
      MoveArg::Up => Direction::Up,
      MoveArg::Down => Direction::Down,
    }
  }
}

#[derive(Subcommand, Debug)]
enum ExceptionCommand {
  /// Set the ministry serving on `date` (YYYY-MM-DD).
  Set {
    date:     String,
    ministry: String,
    /// Mark as an extra occurrence rather than a regular one.
    #[arg(long)]
    extra:    bool,
    #[arg(long)]
    note:     Option<String>,
  },
  Remove { date: String },
  List,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let (host, port) = match &cli.command {
    Command::Serve { host, port } => (host.clone(), *port),
    _ => (None, None),
  };
  let settings = Settings::load(&cli.config, Overrides {
    store_path: cli.store.clone(),
    host,
    port,
  })?;

  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  match cli.command {
    Command::Schedule { month, json } => schedule(&store, month, json).await,
    Command::Calendar { month } => calendar(&store, month).await,
    Command::Config(cmd) => config_command(&store, cmd).await,
    Command::Ministry(cmd) => ministry_command(&store, cmd).await,
    Command::Exception(cmd) => exception_command(&store, cmd).await,
    Command::Export { out } => export(&store, out).await,
    Command::Import { file } => import(&store, file).await,
    Command::Serve { .. } => serve(store, &settings).await,
  }
}

// ─── Schedule ─────────────────────────────────────────────────────────────────

async fn schedule(store: &SqliteStore, month: Option<u32>, json: bool) -> anyhow::Result<()> {
  let config = load_or_init_config(store).await?;
  let exceptions = load_exceptions(store).await?;
  let mut events = merge(&generate(&config), &exceptions);
  if let Some(month) = month {
    events = month_events(&events, month);
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&events)?);
  } else {
    print!("{}", render::schedule(&events));
  }
  Ok(())
}

async fn calendar(store: &SqliteStore, month: u32) -> anyhow::Result<()> {
  let config = load_or_init_config(store).await?;
  let exceptions = load_exceptions(store).await?;
  let events = merge(&generate(&config), &exceptions);
  let grid = MonthGrid::build(config.year, month, &events)?;
  print!("{}", render::calendar(&grid));
  Ok(())
}

// ─── Config & ministries ──────────────────────────────────────────────────────

/// Load the config, apply `f`, save it and print the result.
async fn edit_config<T>(
  store: &SqliteStore,
  f: impl FnOnce(&mut ScheduleConfig) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
  let mut config = load_or_init_config(store).await?;
  let out = f(&mut config)?;
  save_config(store, &config).await?;
  print!("{}", render::config(&config));
  Ok(out)
}

async fn config_command(store: &SqliteStore, cmd: ConfigCommand) -> anyhow::Result<()> {
  match cmd {
    ConfigCommand::Show => {
      print!("{}", render::config(&load_or_init_config(store).await?));
    }
    ConfigCommand::Year { year } => {
      edit_config(store, |c| {
        c.set_year(year);
        Ok(())
      })
      .await?;
    }
    ConfigCommand::FifthSunday { name } => {
      edit_config(store, |c| {
        c.set_fifth_sunday_ministry(&name);
        Ok(())
      })
      .await?;
    }
    ConfigCommand::Weekday { code } => {
      let day: Weekday = code
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown weekday code: {code}"))?;
      let active = edit_config(store, |c| Ok(c.toggle_weekday(day))).await?;
      tracing::info!(weekday = %day, active, "weekday toggled");
    }
  }
  Ok(())
}

/// Resolve a ministry given as a UUID or a 1-based rotation position.
fn resolve_ministry(config: &ScheduleConfig, reference: &str) -> anyhow::Result<Uuid> {
  if let Ok(position) = reference.parse::<usize>() {
    return position
      .checked_sub(1)
      .and_then(|i| config.ministries.get(i))
      .map(|m| m.id)
      .with_context(|| format!("no ministry at position {position}"));
  }
  reference
    .parse::<Uuid>()
    .with_context(|| format!("not a ministry id or position: {reference}"))
}

async fn ministry_command(store: &SqliteStore, cmd: MinistryCommand) -> anyhow::Result<()> {
  match cmd {
    MinistryCommand::Add { name } => {
      let id = edit_config(store, |c| Ok(c.add_ministry(&name))).await?;
      tracing::info!(%id, "ministry added");
    }
    MinistryCommand::Rename { ministry, name } => {
      edit_config(store, |c| {
        let id = resolve_ministry(c, &ministry)?;
        Ok(c.rename_ministry(id, &name)?)
      })
      .await?;
    }
    MinistryCommand::Move { ministry, direction } => {
      edit_config(store, |c| {
        let id = resolve_ministry(c, &ministry)?;
        Ok(c.move_ministry(id, direction.into())?)
      })
      .await?;
    }
    MinistryCommand::Remove { ministry } => {
      let removed = edit_config(store, |c| {
        let id = resolve_ministry(c, &ministry)?;
        Ok(c.remove_ministry(id)?)
      })
      .await?;
      tracing::info!(id = %removed.id, name = %removed.name, "ministry removed");
    }
  }
  Ok(())
}

// ─── Exceptions ───────────────────────────────────────────────────────────────

fn canonical_date(raw: &str) -> anyhow::Result<String> {
  parse_date(raw)
    .map(format_date)
    .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

async fn exception_command(store: &SqliteStore, cmd: ExceptionCommand) -> anyhow::Result<()> {
  let mut exceptions = load_exceptions(store).await?;
  match cmd {
    ExceptionCommand::List => {
      print!("{}", render::exceptions(&exceptions));
      return Ok(());
    }
    ExceptionCommand::Set { date, ministry, extra, note } => {
      let date = canonical_date(&date)?;
      let ministry = ministry.trim();
      if ministry.is_empty() {
        bail!("ministry name must not be blank");
      }
      let kind = if extra { EventKind::Extra } else { EventKind::Regular };
      let mut exception = ExceptionEvent::new(date, ministry, kind);
      if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
        exception = exception.with_note(note);
      }
      upsert_exception(&mut exceptions, exception);
    }
    ExceptionCommand::Remove { date } => {
      let date = canonical_date(&date)?;
      if !remove_exception(&mut exceptions, &date) {
        bail!("no exception on {date}");
      }
    }
  }
  save_exceptions(store, &exceptions).await?;
  print!("{}", render::exceptions(&exceptions));
  Ok(())
}

// ─── Import / export ──────────────────────────────────────────────────────────

async fn export(store: &SqliteStore, out: Option<PathBuf>) -> anyhow::Result<()> {
  let config = load_or_init_config(store).await?;
  let exceptions = load_exceptions(store).await?;
  let out = out.unwrap_or_else(|| PathBuf::from(export_file_name(config.year)));
  let text = ScheduleDocument::new(config, exceptions).to_json_pretty()?;

  if out.as_os_str() == "-" {
    println!("{text}");
  } else {
    std::fs::write(&out, text).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(path = %out.display(), "schedule exported");
  }
  Ok(())
}

async fn import(store: &SqliteStore, file: PathBuf) -> anyhow::Result<()> {
  let text = std::fs::read_to_string(&file)
    .with_context(|| format!("reading {}", file.display()))?;
  let outcome = ScheduleDocument::import_str(&text)
    .with_context(|| format!("importing {}", file.display()))?;

  if let Some(config) = &outcome.config {
    save_config(store, config).await?;
  }
  if let Some(exceptions) = &outcome.exceptions {
    save_exceptions(store, exceptions).await?;
  }
  tracing::info!(
    config = outcome.config.is_some(),
    exceptions = outcome.exceptions.as_ref().map(Vec::len),
    "document imported"
  );
  Ok(())
}

// ─── Server ───────────────────────────────────────────────────────────────────

async fn serve(store: SqliteStore, settings: &Settings) -> anyhow::Result<()> {
  let app = Router::new()
    .nest("/api", escala_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http());
  let address = settings.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ministries_resolve_by_position_or_id() {
    let config = ScheduleConfig::default();
    assert_eq!(resolve_ministry(&config, "1").unwrap(), config.ministries[0].id);
    assert_eq!(resolve_ministry(&config, "3").unwrap(), config.ministries[2].id);
    let id = config.ministries[1].id;
    assert_eq!(resolve_ministry(&config, &id.to_string()).unwrap(), id);
    assert!(resolve_ministry(&config, "0").is_err());
    assert!(resolve_ministry(&config, "4").is_err());
    assert!(resolve_ministry(&config, "Arcanjos").is_err());
  }

  #[test]
  fn exception_dates_must_be_canonical() {
    assert_eq!(canonical_date("2026-01-02").unwrap(), "2026-01-02");
    assert!(canonical_date("2026-02-30").is_err());
    assert!(canonical_date("02/01/2026").is_err());
  }

  #[test]
  fn month_flag_is_range_checked() {
    assert!(Cli::try_parse_from(["escala", "schedule", "--month", "12"]).is_ok());
    assert!(Cli::try_parse_from(["escala", "schedule", "--month", "13"]).is_err());
    assert!(Cli::try_parse_from(["escala", "calendar", "0"]).is_err());
  }

  #[test]
  fn serve_flags_parse() {
    let cli = Cli::try_parse_from(["escala", "--store", "/tmp/e.db", "serve", "--port", "9000"]).unwrap();
    assert_eq!(cli.store, Some(PathBuf::from("/tmp/e.db")));
    assert!(matches!(cli.command, Command::Serve { host: None, port: Some(9000) }));
  }
}
