//! dxcli - interactive shell over a duodex catalog
//!
//! Usage:
//!   dxcli --order 3 --demo 100
//!   dxcli --config duodex.json --seed 7
//!
//! Then type `help` at the prompt.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use log::{debug, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::time::Duration;

use duodex::{Catalog, EngineConfig, Entry, Key, MemoryStore, WorkloadKind};

#[derive(Parser, Debug)]
#[command(name = "dxcli")]
#[command(about = "Interactive shell for the duodex adaptive dual-index engine")]
#[command(version)]
struct Args {
    /// JSON engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ordered index node capacity (overrides the config file)
    #[arg(short, long)]
    order: Option<usize>,

    /// Benchmark RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Preload N demo records with ids 1..=N
    #[arg(long, default_value_t = 0)]
    demo: i64,

    /// Print results as JSON instead of tables
    #[arg(long)]
    json: bool,
}

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a record: add <id> <title...>
    #[command(allow_negative_numbers = true)]
    Add {
        id: Key,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Change a title: update <id> <title...>
    #[command(allow_negative_numbers = true)]
    Update {
        id: Key,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Delete a record (rebuilds both indexes)
    #[command(allow_negative_numbers = true)]
    Delete { id: Key },
    /// Point lookup on both indexes
    #[command(allow_negative_numbers = true)]
    Find { id: Key },
    /// Inclusive range scan on both indexes
    #[command(allow_negative_numbers = true)]
    Range { start: Key, end: Key },
    /// Synthetic workload: bench <count> <equality|range|mixed>
    Bench {
        count: usize,
        #[arg(value_parser = parse_workload)]
        workload: WorkloadKind,
    },
    /// Show the currently preferred index
    Pref,
    /// Show query statistics
    Stats,
    /// List every record in key order
    List,
    /// Show commands
    Help,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

fn parse_workload(s: &str) -> std::result::Result<WorkloadKind, String> {
    s.parse().map_err(|e: duodex::DuodexError| e.to_string())
}

struct Shell {
    catalog: Catalog<MemoryStore>,
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(order) = args.order {
        config.order = order;
    }
    if let Some(seed) = args.seed {
        config.benchmark.seed = Some(seed);
    }
    debug!("effective config: {}", config.to_json());

    let store: MemoryStore = (1..=args.demo).map(|id| (id, format!("Game {id}"))).collect();
    let catalog = Catalog::open(store, config).context("opening catalog")?;
    info!("catalog opened with {} records", catalog.engine().len());

    let mut shell = Shell { catalog, json: args.json };
    shell.run()
}

impl Shell {
    fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        println!(
            "{} ({} records, order {}). Type {} for commands.",
            "duodex shell".bold(),
            self.catalog.engine().len(),
            self.catalog.engine().config().order,
            "help".cyan()
        );

        loop {
            match editor.readline("duodex> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line);
                    match self.dispatch(line) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => println!("{} {e:#}", "error:".red()),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Execute one line. Returns true when the shell should exit.
    fn dispatch(&mut self, raw: &str) -> Result<bool> {
        let words = shell_words::split(raw).context("unbalanced quotes")?;
        debug!("dispatch {:?}", words);
        let line = match Line::try_parse_from(words) {
            Ok(line) => line,
            Err(e) => {
                println!("{e}");
                return Ok(false);
            }
        };

        match line.command {
            Command::Add { id, title } => {
                let title = title.join(" ");
                report(self.catalog.add(id, &title), &format!("added {id}"), "id already exists");
            }
            Command::Update { id, title } => {
                let title = title.join(" ");
                report(self.catalog.update(id, &title), &format!("updated {id}"), "record not found or unchanged");
            }
            Command::Delete { id } => {
                report(self.catalog.delete(id), &format!("deleted {id}, indexes rebuilt"), "record not found");
            }
            Command::Find { id } => {
                let outcome = self.catalog.find(id);
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);
                    return Ok(false);
                }
                match &outcome.value {
                    Some(title) => println!("{} {id}: {title}", "found".green()),
                    None => println!("{} {id}", "not found".yellow()),
                }
                print_timings(outcome.ordered_elapsed, outcome.hash_elapsed, outcome.served_by.as_str());
            }
            Command::Range { start, end } => {
                let outcome = self.catalog.range(start, end);
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);
                    return Ok(false);
                }
                print_entries("ordered index", &outcome.ordered);
                print_entries("hash index", &outcome.hash);
                print_timings(outcome.ordered_elapsed, outcome.hash_elapsed, outcome.served_by.as_str());
            }
            Command::Bench { count, workload } => {
                let report = self.catalog.benchmark(count, workload)?;
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&report.to_json())?);
                    return Ok(false);
                }
                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_header(vec!["workload", "queries", "ordered", "hash", "chosen"]);
                table.add_row(vec![
                    Cell::new(report.workload),
                    Cell::new(report.query_count),
                    Cell::new(format_secs(report.ordered_total)),
                    Cell::new(format_secs(report.hash_total)),
                    Cell::new(report.chosen),
                ]);
                println!("{table}");
            }
            Command::Pref => println!("preferred index: {}", self.catalog.preference().as_str().bold()),
            Command::Stats => {
                let stats = self.catalog.stats();
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&stats.to_json())?);
                    return Ok(false);
                }
                let ratio = stats
                    .equality_ratio()
                    .map(|r| format!("{:.3}", r))
                    .unwrap_or_else(|| "-".to_string());
                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_header(vec!["equality", "range", "equality share", "preferred"]);
                table.add_row(vec![
                    Cell::new(stats.equality_count),
                    Cell::new(stats.range_count),
                    Cell::new(ratio),
                    Cell::new(stats.preferred),
                ]);
                println!("{table}");
            }
            Command::List => {
                let entries = self.catalog.engine().ordered().entries();
                print_entries("catalog", &entries);
            }
            Command::Help => print_help(),
            Command::Exit => return Ok(true),
        }
        Ok(false)
    }
}

fn report(ok: bool, success: &str, failure: &str) {
    if ok {
        println!("{}", success.green());
    } else {
        println!("{}", failure.red());
    }
}

fn format_secs(d: Duration) -> String {
    format!("{:.6} s", d.as_secs_f64())
}

fn print_timings(ordered: Duration, hash: Duration, served_by: &str) {
    println!(
        "  ordered {}  hash {}  served by {}",
        format_secs(ordered).dimmed(),
        format_secs(hash).dimmed(),
        served_by.bold()
    );
}

fn print_entries(label: &str, entries: &[Entry]) {
    if entries.is_empty() {
        println!("{}: {}", label, "no records".yellow());
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![format!("{label} id"), "title".to_string()]);
    for (id, title) in entries {
        table.add_row(vec![Cell::new(id), Cell::new(title)]);
    }
    println!("{table}");
}

fn print_help() {
    let rows = [
        ("add <id> <title>", "add a record (rejected if the id exists)"),
        ("update <id> <title>", "change a title"),
        ("delete <id>", "delete a record and rebuild the indexes"),
        ("find <id>", "point lookup on both indexes"),
        ("range <start> <end>", "inclusive range scan on both indexes"),
        ("bench <count> <kind>", "benchmark: equality, range or mixed"),
        ("pref", "currently preferred index"),
        ("stats", "query statistics"),
        ("list", "all records in key order"),
        ("exit", "leave the shell"),
    ];
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["command", "description"]);
    for (cmd, desc) in rows {
        table.add_row(vec![cmd, desc]);
    }
    println!("{table}");
}
