//! Technician ranking CLI.
//!
//! Keeps the roster under `.roster/` in the project root and prints ranked
//! views, summaries, and export paths to stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use roster::core::sample::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS, sample_trends};
use roster::error::{NotFoundError, RosterError};
use roster::exit_codes;
use roster::io::clock::SystemClock;
use roster::io::config::{RosterConfig, load_config};
use roster::io::init::{InitOptions, RosterPaths, init_roster};
use roster::io::storage::FileStorage;
use roster::io::transfer::{read_import_file, write_export};
use roster::logging;
use roster::store::{RosterStore, StartupSource};
use roster::technician::{NewTechnician, SortMetric, default_seed};

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Rank service technicians by performance metrics"
)]
struct Cli {
    /// Project root containing `.roster/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.roster/` with a default config.
    Init {
        /// Rewrite config even if `.roster/` exists. Stored data is kept.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the ranked roster.
    List {
        /// totalCalls, avgServiceTime, firstResponseTime or rating.
        #[arg(long)]
        sort: Option<SortMetric>,
        /// Keep only names containing this text (case-insensitive).
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        json: bool,
    },
    /// Print one technician as JSON.
    Show { id: String },
    /// Add a technician.
    Add(AddArgs),
    /// Change fields of an existing technician.
    Update(UpdateArgs),
    /// Remove a technician (no error if absent).
    Delete { id: String },
    /// Write an export file and print its path.
    Export {
        /// Output directory (defaults to config `export_dir` or `.roster/exports`).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the roster with the contents of an export file.
    Import { file: PathBuf },
    /// Remove every technician and the stored roster.
    Clear {
        /// Confirm the wipe.
        #[arg(long)]
        yes: bool,
    },
    /// Print per-metric averages and leaders.
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Print seeded sample trend series as JSON.
    Trend {
        /// Number of daily points, at most one year.
        #[arg(
            long,
            default_value_t = DEFAULT_TREND_DAYS,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TREND_DAYS))
        )]
        days: u32,
        #[arg(long)]
        seed: u64,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 0)]
    total_calls: u64,
    /// Minutes.
    #[arg(long, default_value_t = 0.0)]
    avg_service_time: f64,
    /// Minutes.
    #[arg(long, default_value_t = 0.0)]
    first_response_time: f64,
    #[arg(long, default_value_t = 0.0)]
    rating: f64,
}

#[derive(Args)]
struct UpdateArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    total_calls: Option<u64>,
    #[arg(long)]
    avg_service_time: Option<f64>,
    #[arg(long)]
    first_response_time: Option<f64>,
    #[arg(long)]
    rating: Option<f64>,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = cli.root.as_path();
    match cli.command {
        Command::Init { force } => cmd_init(root, force),
        Command::List { sort, search, json } => cmd_list(root, sort, search, json),
        Command::Show { id } => cmd_show(root, &id),
        Command::Add(args) => cmd_add(root, args),
        Command::Update(args) => cmd_update(root, args),
        Command::Delete { id } => cmd_delete(root, &id),
        Command::Export { out } => cmd_export(root, out),
        Command::Import { file } => cmd_import(root, &file),
        Command::Clear { yes } => cmd_clear(root, yes),
        Command::Summary { json } => cmd_summary(root, json),
        Command::Trend { days, seed } => cmd_trend(root, days, seed),
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<RosterError>() {
        Some(RosterError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(err) if err.is_import_rejection() => exit_codes::IMPORT_REJECTED,
        _ => exit_codes::INVALID,
    }
}

struct Session {
    paths: RosterPaths,
    config: RosterConfig,
    store: RosterStore,
}

/// Load config and open the file-backed store for `root`.
fn open_session(root: &Path) -> Result<Session> {
    let paths = RosterPaths::new(root);
    let config = load_config(&paths.config_path).context("load roster config")?;
    let storage = FileStorage::new(&paths.data_dir, &config.storage_key);
    let seed = if config.seed_when_empty {
        default_seed(Utc::now())
    } else {
        Vec::new()
    };
    let mut store = RosterStore::open(Box::new(storage), Box::new(SystemClock), seed)
        .context("open roster store")?;
    if let StartupSource::Recovered { reason } = store.startup() {
        eprintln!("warning: stored roster unreadable, using seed data: {reason}");
    }
    store.set_sort_by(config.default_sort);
    Ok(Session {
        paths,
        config,
        store,
    })
}

fn cmd_init(root: &Path, force: bool) -> Result<()> {
    let paths = init_roster(root, &InitOptions { force })?;
    println!("{}", paths.roster_dir.display());
    Ok(())
}

fn cmd_list(root: &Path, sort: Option<SortMetric>, search: String, json: bool) -> Result<()> {
    let mut session = open_session(root)?;
    if let Some(sort) = sort {
        session.store.set_sort_by(sort);
    }
    session.store.set_search_query(search);
    let entries = session.store.ranked_entries();

    if json {
        return print_json(&entries);
    }
    for entry in entries {
        let tech = entry.technician;
        println!(
            "#{:<3} {:<24} calls={:<5} service={:.0}min response={:.0}min rating={:.1} id={}",
            entry.position,
            tech.name,
            tech.total_calls,
            tech.avg_service_time,
            tech.first_response_time,
            tech.rating,
            tech.id
        );
    }
    Ok(())
}

fn cmd_show(root: &Path, id: &str) -> Result<()> {
    let session = open_session(root)?;
    let technician = session
        .store
        .get(id)
        .ok_or_else(|| RosterError::from(NotFoundError { id: id.to_string() }))?;
    print_json(&technician)
}

fn cmd_add(root: &Path, args: AddArgs) -> Result<()> {
    let mut session = open_session(root)?;
    let created = session.store.create(NewTechnician {
        name: args.name,
        total_calls: args.total_calls,
        avg_service_time: args.avg_service_time,
        first_response_time: args.first_response_time,
        rating: args.rating,
    })?;
    println!("{}", created.id);
    Ok(())
}

fn cmd_update(root: &Path, args: UpdateArgs) -> Result<()> {
    let mut session = open_session(root)?;
    let mut record = session
        .store
        .get(&args.id)
        .ok_or_else(|| RosterError::from(NotFoundError { id: args.id.clone() }))?;
    if let Some(name) = args.name {
        record.name = name;
    }
    if let Some(total_calls) = args.total_calls {
        record.total_calls = total_calls;
    }
    if let Some(avg_service_time) = args.avg_service_time {
        record.avg_service_time = avg_service_time;
    }
    if let Some(first_response_time) = args.first_response_time {
        record.first_response_time = first_response_time;
    }
    if let Some(rating) = args.rating {
        record.rating = rating;
    }
    let updated = session.store.update(record)?;
    print_json(&updated)
}

fn cmd_delete(root: &Path, id: &str) -> Result<()> {
    let mut session = open_session(root)?;
    if !session.store.delete(id)? {
        eprintln!("no technician with id {id}");
    }
    Ok(())
}

fn cmd_export(root: &Path, out: Option<PathBuf>) -> Result<()> {
    let session = open_session(root)?;
    let dir = out.unwrap_or_else(|| session.paths.export_dir(&session.config));
    let path = write_export(&dir, &session.store.export_document())?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_import(root: &Path, file: &Path) -> Result<()> {
    let text = read_import_file(file).map_err(RosterError::from)?;
    let mut session = open_session(root)?;
    let count = session.store.import_all(&text)?;
    println!("imported {count} technicians");
    Ok(())
}

fn cmd_clear(root: &Path, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to clear the roster without --yes");
    }
    let mut session = open_session(root)?;
    session.store.clear_all()?;
    println!("roster cleared");
    Ok(())
}

fn cmd_summary(root: &Path, json: bool) -> Result<()> {
    let session = open_session(root)?;
    let summary = session.store.summary();
    if json {
        return print_json(&summary);
    }
    println!("technicians: {}", summary.count);
    let averages = [
        ("avg totalCalls", summary.avg_total_calls),
        ("avg avgServiceTime", summary.avg_service_time),
        ("avg firstResponseTime", summary.avg_first_response_time),
        ("avg rating", summary.avg_rating),
    ];
    for (label, value) in averages {
        match value {
            Some(value) => println!("{label}: {value:.2}"),
            None => println!("{label}: -"),
        }
    }
    for leader in summary.leaders {
        println!(
            "best {}: {} ({}) = {}",
            leader.metric, leader.name, leader.id, leader.value
        );
    }
    Ok(())
}

fn cmd_trend(root: &Path, days: u32, seed: u64) -> Result<()> {
    let session = open_session(root)?;
    let trends = sample_trends(
        &session.store.summary(),
        Utc::now().date_naive(),
        days,
        seed,
    );
    print_json(&trends)
}

/// Print `value` as pretty JSON to stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_with_sort_and_search() {
        let cli = Cli::parse_from(["roster", "list", "--sort", "rating", "--search", "ana"]);
        match cli.command {
            Command::List { sort, search, json } => {
                assert_eq!(sort, Some(SortMetric::Rating));
                assert_eq!(search, "ana");
                assert!(!json);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn parse_rejects_unknown_sort_metric() {
        assert!(Cli::try_parse_from(["roster", "list", "--sort", "speed"]).is_err());
    }

    #[test]
    fn parse_add_defaults_metrics_to_zero() {
        let cli = Cli::parse_from(["roster", "add", "--name", "Ana"]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.name, "Ana");
                assert_eq!(args.total_calls, 0);
                assert_eq!(args.rating, 0.0);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn parse_global_root_after_subcommand() {
        let cli = Cli::parse_from(["roster", "delete", "abc", "--root", "/tmp/x"]);
        assert_eq!(cli.root, PathBuf::from("/tmp/x"));
        assert!(matches!(cli.command, Command::Delete { ref id } if id == "abc"));
    }

    #[test]
    fn parse_trend_days_is_bounded() {
        let cli = Cli::parse_from(["roster", "trend", "--seed", "1"]);
        assert!(matches!(
            cli.command,
            Command::Trend { days, seed: 1 } if days == DEFAULT_TREND_DAYS
        ));
        let cli = Cli::parse_from(["roster", "trend", "--seed", "1", "--days", "366"]);
        assert!(matches!(cli.command, Command::Trend { days: 366, .. }));

        for days in ["0", "367", "4000000000"] {
            assert!(
                Cli::try_parse_from(["roster", "trend", "--seed", "1", "--days", days]).is_err(),
                "days={days}"
            );
        }
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let not_found = anyhow::Error::from(RosterError::from(NotFoundError {
            id: "x".to_string(),
        }));
        assert_eq!(exit_code_for(&not_found), exit_codes::NOT_FOUND);

        let rejected = anyhow::Error::from(RosterError::from(
            roster::error::ImportError::from(roster::error::ImportFormatError::MissingTechnicians),
        ))
        .context("import");
        assert_eq!(exit_code_for(&rejected), exit_codes::IMPORT_REJECTED);

        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), exit_codes::INVALID);
    }
}
