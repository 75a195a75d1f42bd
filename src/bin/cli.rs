//! Binary entry point for the listing index CLI.
#![forbid(unsafe_code)]

#[path = "cli/config.rs"]
mod config;
#[path = "cli/ui.rs"]
mod ui;

use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use listing_index::{
    cli::{
        import_export::{run_export, run_import, ImportConfig, ImportSummary},
        shell::Shell,
    },
    index::{TreeStats, VerifyReport},
    logging::init_logging,
    Criteria, Listing, ListingTree,
};
use serde::Serialize;
use tracing::debug;

use config::CliConfig;
use ui::{elapsed_label, Theme, Ui};

#[derive(Parser, Debug)]
#[command(
    name = "listing-index",
    version,
    about = "Query real-estate listings through a balanced price-per-surface index",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "LISTING_INDEX_CONFIG",
        help = "Path to cli.toml (defaults to the user config directory)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "CSV",
        help = "Listings dataset to load before running the command"
    )]
    data: Option<PathBuf>,

    #[arg(long, global = true, help = "Abort on the first row that cannot be indexed")]
    strict: bool,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(long, global = true, value_enum, help = "Color theme for text output")]
    theme: Option<ThemeArg>,

    #[arg(
        long,
        global = true,
        value_name = "FILTER",
        env = "RUST_LOG",
        help = "Tracing filter, e.g. `info` or `listing_index::index=debug`"
    )]
    log_level: Option<String>,

    #[arg(long, short, global = true, help = "Plain output without icons or spinners")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Interactive menu over the loaded tree")]
    Shell,

    #[command(about = "Print the tree as an indented outline")]
    Show,

    #[command(about = "Look up the listing stored under a metric")]
    Find {
        #[arg(long, allow_negative_numbers = true)]
        metric: f64,
    },

    #[command(about = "Filter listings by city, bedrooms, price and metric window")]
    Search(SearchCmd),

    #[command(about = "Structural relatives of the node stored under a metric")]
    Relation {
        #[arg(value_enum)]
        kind: RelationArg,

        #[arg(long, allow_negative_numbers = true)]
        metric: f64,
    },

    #[command(about = "Tree shape and load counters")]
    Stats,

    #[command(about = "Check height, balance and key order of every node")]
    Verify,

    #[command(about = "Write the tree in key order to CSV")]
    Export {
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SearchCmd {
    #[arg(long, help = "Exact city name")]
    city: Option<String>,

    #[arg(long, help = "Minimum bedroom count")]
    min_bedrooms: Option<u32>,

    #[arg(long, help = "Maximum price (inclusive)")]
    max_price: Option<f64>,

    #[arg(long, allow_negative_numbers = true, help = "Lower metric bound (inclusive)")]
    min_metric: Option<f64>,

    #[arg(long, allow_negative_numbers = true, help = "Upper metric bound (exclusive)")]
    max_metric: Option<f64>,
}

impl SearchCmd {
    fn criteria(&self) -> Criteria {
        let mut criteria = Criteria::default().metric_range(
            self.min_metric.unwrap_or(f64::NEG_INFINITY),
            self.max_metric.unwrap_or(f64::INFINITY),
        );
        if let Some(city) = &self.city {
            criteria = criteria.city(city.clone());
        }
        if let Some(bedrooms) = self.min_bedrooms {
            criteria = criteria.min_bedrooms(bedrooms);
        }
        if let Some(price) = self.max_price {
            criteria = criteria.max_price(price);
        }
        criteria
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ThemeArg {
    Auto,
    Light,
    Dark,
    Plain,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Plain => Theme::Plain,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum RelationArg {
    Level,
    Balance,
    Parent,
    Grandparent,
    Sibling,
    Uncle,
}

impl RelationArg {
    fn name(self) -> &'static str {
        match self {
            RelationArg::Level => "level",
            RelationArg::Balance => "balance",
            RelationArg::Parent => "parent",
            RelationArg::Grandparent => "grandparent",
            RelationArg::Sibling => "sibling",
            RelationArg::Uncle => "uncle",
        }
    }
}

#[derive(Serialize)]
struct Entry<'a> {
    metric: f64,
    listing: &'a Listing,
}

#[derive(Serialize)]
struct FindOutput<'a> {
    metric: f64,
    listing: Option<&'a Listing>,
}

#[derive(Serialize)]
struct RelationOutput<'a> {
    metric: f64,
    relation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance_factor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    listing: Option<&'a Listing>,
}

#[derive(Serialize)]
struct StatsOutput {
    dataset: Option<String>,
    import: Option<ImportSummary>,
    tree: TreeStats,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.clone())?;

    let level = cli
        .log_level
        .as_deref()
        .or(config.log_level())
        .unwrap_or("warn");
    init_logging(level)?;
    debug!(config = ?config.path(), "cli.config.loaded");

    let theme = cli.theme.or(config.theme()).unwrap_or(ThemeArg::Auto);
    let ui = Ui::new(theme.into(), cli.quiet);

    let mut tree = ListingTree::new();
    let dataset = cli.data.clone().or_else(|| config.default_dataset().cloned());
    let import = match &dataset {
        Some(path) => {
            let import_cfg = ImportConfig {
                path: path.clone(),
                columns: config.columns().clone(),
                skip_invalid: !cli.strict && config.skip_invalid().unwrap_or(true),
            };
            let spinner = ui.loading(format!("loading {}", path.display()));
            let summary = run_import(&mut tree, &import_cfg)?;
            let elapsed = spinner.finish();
            debug!(
                inserted = summary.inserted,
                elapsed = %elapsed_label(elapsed),
                "cli.dataset.loaded"
            );
            if summary.skipped > 0 && cli.format == OutputFormat::Text {
                ui.warn(&format!(
                    "skipped {} of {} rows that could not be indexed",
                    summary.skipped, summary.rows_read
                ));
            }
            Some(summary)
        }
        None => None,
    };

    match cli.command {
        Command::Shell => {
            let stdin = io::stdin();
            let mut shell = Shell::new(tree, stdin.lock(), io::stdout());
            shell.run()?;
        }
        Command::Show => {
            let projection = tree.project();
            emit(&cli.format, &projection, |_| ui.outline(projection.as_ref()))?;
        }
        Command::Find { metric } => {
            let output = FindOutput {
                metric,
                listing: tree.find_by_metric(metric),
            };
            emit(&cli.format, &output, |_| match output.listing {
                Some(listing) => ui.entries("Match", [(metric, listing)]),
                None => ui.warn(&format!("no listing with metric {metric}")),
            })?;
        }
        Command::Search(cmd) => {
            let hits: Vec<Entry<'_>> = tree
                .find_entries_by_criteria(&cmd.criteria())
                .into_iter()
                .map(|(metric, listing)| Entry { metric, listing })
                .collect();
            emit(&cli.format, &hits, |_| {
                if hits.is_empty() {
                    ui.info("no listings matched");
                } else {
                    ui.entries(
                        &format!("{} match(es)", hits.len()),
                        hits.iter().map(|hit| (hit.metric, hit.listing)),
                    );
                }
            })?;
        }
        Command::Relation { kind, metric } => {
            let output = relation(&tree, kind, metric);
            emit(&cli.format, &output, |_| print_relation_text(&ui, &output))?;
        }
        Command::Stats => {
            let output = StatsOutput {
                dataset: dataset.as_ref().map(|path| path.display().to_string()),
                import,
                tree: tree.stats(),
            };
            emit(&cli.format, &output, |_| print_stats_text(&ui, &output))?;
        }
        Command::Verify => {
            let report = tree.verify();
            emit(&cli.format, &report, |_| print_verify_text(&ui, &report))?;
            if !report.success {
                std::process::exit(2);
            }
        }
        Command::Export { out } => {
            let summary = run_export(&tree, &out)?;
            emit(&cli.format, &summary, |_| {
                ui.success(&format!(
                    "exported {} rows to {}",
                    summary.rows_written,
                    out.display()
                ))
            })?;
        }
    }

    Ok(())
}

fn relation(tree: &ListingTree, kind: RelationArg, metric: f64) -> RelationOutput<'_> {
    let mut output = RelationOutput {
        metric,
        relation: kind.name(),
        level: None,
        balance_factor: None,
        listing: None,
    };
    match kind {
        RelationArg::Level => output.level = tree.level_of(metric),
        RelationArg::Balance => output.balance_factor = tree.balance_factor_of(metric),
        RelationArg::Parent => output.listing = tree.parent_of(metric),
        RelationArg::Grandparent => output.listing = tree.grandparent_of(metric),
        RelationArg::Sibling => output.listing = tree.sibling_of(metric),
        RelationArg::Uncle => output.listing = tree.uncle_of(metric),
    }
    output
}

fn emit<T, F>(format: &OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: Serialize,
    F: Fn(OutputFormat),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(OutputFormat::Text),
    }
    Ok(())
}

fn print_relation_text(ui: &Ui, output: &RelationOutput<'_>) {
    let metric = output.metric;
    if let Some(level) = output.level {
        ui.info(&format!("{metric} is at level {level}"));
    } else if let Some(balance) = output.balance_factor {
        ui.info(&format!("{metric} has balance factor {balance}"));
    } else if let Some(listing) = output.listing {
        ui.entries(output.relation, [(metric, listing)]);
    } else {
        ui.warn(&format!("no {} for metric {metric}", output.relation));
    }
}

fn print_stats_text(ui: &Ui, output: &StatsOutput) {
    let tree = &output.tree;
    let key = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |k| k.to_string());
    ui.section(
        "Tree",
        [
            ("nodes", tree.nodes.to_string()),
            ("height", tree.height.to_string()),
            ("min_key", key(tree.min_key)),
            ("max_key", key(tree.max_key)),
            ("records_inserted", tree.records_inserted.to_string()),
            ("key_collisions", tree.key_collisions.to_string()),
        ],
    );
    if let Some(import) = &output.import {
        ui.section(
            "Import",
            [
                (
                    "dataset",
                    output.dataset.clone().unwrap_or_default(),
                ),
                ("rows_read", import.rows_read.to_string()),
                ("inserted", import.inserted.to_string()),
                ("skipped", import.skipped.to_string()),
            ],
        );
    }
}

fn print_verify_text(ui: &Ui, report: &VerifyReport) {
    let summary = format!(
        "nodes={} distinct_records={} height={}",
        report.counts.nodes, report.counts.distinct_records, report.counts.height
    );
    if report.success {
        ui.success(&format!("tree is consistent ({summary})"));
    } else {
        ui.warn(&format!("tree has {} problem(s) ({summary})", report.findings.len()));
        ui.list(
            "Findings",
            report
                .findings
                .iter()
                .map(|finding| format!("{:?} at {}: {}", finding.kind, finding.key, finding.message)),
        );
    }
}
