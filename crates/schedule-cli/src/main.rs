//! `schedule` CLI — expand recurring tasks and lay out day/week grids from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Expand every task into occurrences for a date range (stdin → stdout)
//! cat tasks.json | schedule expand --from 2026-03-02 --to 2026-03-08
//!
//! # Only one child's occurrences, true two-week cadence for biweekly rules
//! schedule expand -i tasks.json --from 2026-03-01 --to 2026-03-31 --child subin --strict-biweekly
//!
//! # Day grid with geometry and columns
//! schedule layout -i tasks.json --date 2026-03-03
//!
//! # Week grid (Monday..Sunday containing the date), per-cluster columns
//! schedule layout -i tasks.json --date 2026-03-03 --week
//!
//! # Month cells with per-day counts
//! schedule month -i tasks.json --month 2026-03-01
//!
//! # Recover the stored task id from an occurrence id
//! schedule base-id k17abc_2026-03-03
//! ```

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use schedule_engine::calendar::{month_cells, occurrences_on, week_days};
use schedule_engine::time::{format_date, parse_date_strict};
use schedule_engine::{
    base_id, expand_with, layout_day, layout_days, BiweeklyCadence, ChildFilter, PackingPolicy,
    TaskTemplate, ViewMode,
};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Family schedule recurrence expansion and layout"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand task templates into dated occurrences
    Expand {
        /// Tasks JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Only occurrences of this child ("all" for everyone)
        #[arg(long, default_value = "all")]
        child: String,
        /// Biweekly rules with weekdays fire every other week instead of weekly
        #[arg(long)]
        strict_biweekly: bool,
    },
    /// Lay out a day (or its week) on the collapsed time grid
    Layout {
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
        /// Day to lay out (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Lay out the Monday-to-Sunday week containing the date
        #[arg(long)]
        week: bool,
        #[arg(long, default_value = "all")]
        child: String,
        /// Column packing; defaults to global for a day and clustered for a week
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },
    /// Month grid with per-day occurrence counts
    Month {
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
        /// Any day in the month (YYYY-MM-DD)
        #[arg(long)]
        month: String,
        #[arg(long, default_value = "all")]
        child: String,
    },
    /// Print the stored task id behind an occurrence id
    BaseId {
        /// Occurrence id, e.g. "abc_2026-03-03"
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Global,
    Clustered,
}

impl From<PolicyArg> for PackingPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Global => PackingPolicy::Global,
            PolicyArg::Clustered => PackingPolicy::Clustered,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("schedule=warn,schedule_engine=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Expand {
            input,
            output,
            from,
            to,
            child,
            strict_biweekly,
        } => {
            let tasks = read_tasks(input.as_deref())?;
            let from = parse_date_arg("--from", &from)?;
            let to = parse_date_arg("--to", &to)?;

            let mut options = config.expand;
            if strict_biweekly {
                options.biweekly_cadence = BiweeklyCadence::TwoWeek;
            }

            let filter = ChildFilter::from(child);
            let occurrences: Vec<_> = expand_with(&tasks, from, to, &options)
                .into_iter()
                .filter(|o| filter.matches(o))
                .collect();
            info!(tasks = tasks.len(), occurrences = occurrences.len(), "expanded");

            write_json(output.as_deref(), &occurrences)?;
        }
        Commands::Layout {
            input,
            output,
            date,
            week,
            child,
            policy,
        } => {
            let tasks = read_tasks(input.as_deref())?;
            let date = parse_date_arg("--date", &date)?;
            let view = if week { ViewMode::Weekly } else { ViewMode::Daily };
            let policy = policy.map_or_else(|| PackingPolicy::for_view(view), PackingPolicy::from);
            let (start, end) = view.range(date);
            let filter = ChildFilter::from(child);

            let occurrences = expand_with(&tasks, start, end, &config.expand);
            let grid_config = config.grid_for(week);
            debug!(?view, ?policy, %start, %end, "laying out");

            let value = if week {
                let days = week_days(start);
                let per_day: Vec<_> = days
                    .iter()
                    .map(|d| occurrences_on(&occurrences, *d, &filter))
                    .collect();
                let (grid, placed) = layout_days(grid_config, &per_day, policy)
                    .context("Failed to lay out week")?;
                let days_json: Vec<_> = days
                    .iter()
                    .zip(placed)
                    .map(|(d, placed)| json!({ "date": format_date(*d), "occurrences": placed }))
                    .collect();
                json!({ "grid": grid, "days": days_json })
            } else {
                let day = occurrences_on(&occurrences, date, &filter);
                let (grid, placed) =
                    layout_day(grid_config, &day, policy).context("Failed to lay out day")?;
                json!({ "grid": grid, "occurrences": placed })
            };

            write_json(output.as_deref(), &value)?;
        }
        Commands::Month {
            input,
            output,
            month,
            child,
        } => {
            let tasks = read_tasks(input.as_deref())?;
            let day = parse_date_arg("--month", &month)?;
            let (start, end) = ViewMode::Monthly.range(day);
            let occurrences = expand_with(&tasks, start, end, &config.expand);
            let cells = month_cells(day, &occurrences, &ChildFilter::from(child));
            write_json(output.as_deref(), &cells)?;
        }
        Commands::BaseId { id } => {
            println!("{}", base_id(&id));
        }
    }

    Ok(())
}

fn parse_date_arg(flag: &str, value: &str) -> Result<NaiveDate> {
    parse_date_strict(value).with_context(|| format!("Invalid {} value", flag))
}

fn read_tasks(path: Option<&str>) -> Result<Vec<TaskTemplate>> {
    let json = read_input(path)?;
    schedule_engine::parse_tasks_json(&json).context("Failed to parse tasks")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: serde::Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
