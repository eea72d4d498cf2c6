//! MTWB CLI binary.
//!
//! Evaluates a universe of stocks and ETFs against the MTWB investment
//! mandate and prints leaderboards, breakdowns and the active settings.

mod telemetry;

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mtwb::data::{
    CsvProvider, DEFAULT_CONCURRENCY, Listing, YahooProvider, collect_universe, write_snapshot_file,
};
use mtwb::output::{ExportFormat, Exporter, Leaderboard, ReportBuilder};
use mtwb::scoring::{InstrumentFilter, InstrumentKind, RankQuery, available_sub_scores};
use mtwb::{DefaultUniverse, Evaluation, Evaluator, EvaluatorConfig, ListedUniverse, Universe};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "mtwb")]
#[command(about = "MTWB: investment-fit scoring for stocks and ETFs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Configuration file (overrides $MTWB_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Weight preset (mtwb, growth)
    #[arg(long, global = true)]
    weights: Option<String>,

    /// Where market data comes from
    #[arg(long, global = true, value_enum, default_value_t = Source::Yahoo)]
    source: Source,

    /// Snapshot file read by `--source csv`
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Comma-separated tickers to evaluate instead of the default universe
    #[arg(long, global = true, value_delimiter = ',')]
    tickers: Vec<String>,

    /// Concurrent fetches
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write output to a file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the universe and print the leaderboard
    Rank {
        /// Instrument class
        #[arg(long, value_enum, default_value_t = Kind::Any)]
        kind: Kind,

        /// Category bucket, or "all"
        #[arg(long)]
        category: Option<String>,

        /// Rows to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Evaluate one ticker inside the universe and explain its score
    Analyze {
        /// Ticker symbol
        ticker: String,
    },

    /// List category buckets and their sectors
    Categories,

    /// Show the active weight table and sub-score registry
    Weights,

    /// Fetch raw metrics and save them for `--source csv`
    Snapshot {
        /// Destination CSV file
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Any,
    Stock,
    Etf,
}

impl From<Kind> for InstrumentFilter {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Any => Self::Any,
            Kind::Stock => Self::Stock,
            Kind::Etf => Self::Etf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Markdown,
    Json,
    Csv,
}

/// A concrete provider chosen on the command line.
enum DataSource {
    Yahoo(YahooProvider),
    Csv(CsvProvider),
}

impl DataSource {
    fn open(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        match global.source {
            Source::Yahoo => Ok(Self::Yahoo(YahooProvider::new()?)),
            Source::Csv => {
                let path = global
                    .csv
                    .as_deref()
                    .ok_or("--source csv needs --csv <path>")?;
                Ok(Self::Csv(CsvProvider::open(path)?))
            }
        }
    }

    /// Listings to evaluate: `--tickers`, else the snapshot contents or the
    /// default universe.
    fn listings(&self, tickers: &[String], reference: &DefaultUniverse) -> Vec<Listing> {
        if !tickers.is_empty() {
            return ListedUniverse::from_symbols(tickers, reference).listings();
        }
        match self {
            Self::Yahoo(_) => reference.listings(),
            Self::Csv(provider) => provider.listings(),
        }
    }

    async fn evaluate(
        &self,
        evaluator: &Evaluator,
        listings: &[Listing],
        concurrency: usize,
        progress: Option<&ProgressBar>,
    ) -> Evaluation {
        match self {
            Self::Yahoo(p) => evaluator.evaluate(p, listings, concurrency, progress).await,
            Self::Csv(p) => evaluator.evaluate(p, listings, concurrency, progress).await,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    telemetry::init(&cli.global.log_level).map_err(|e| e.to_string())?;

    let (mut config, path) = EvaluatorConfig::discover(cli.global.config.as_deref())?;
    if let Some(preset) = &cli.global.weights {
        config = config.with_preset(preset.clone());
    }
    debug!(config = ?path, "configuration resolved");
    let evaluator = Evaluator::new(&config)?;

    let rendered = match cli.command {
        Commands::Rank {
            kind,
            category,
            limit,
        } => {
            let mut query = RankQuery::top(limit).with_instrument(kind.into());
            if let Some(category) = category {
                query = query.with_category(category);
            }
            rank(&evaluator, &cli.global, &query).await?
        }
        Commands::Analyze { ticker } => analyze(&evaluator, &cli.global, &ticker).await?,
        Commands::Categories => list_categories(&evaluator, cli.global.format)?,
        Commands::Weights => list_weights(&evaluator, cli.global.format)?,
        Commands::Snapshot { path } => snapshot(&cli.global, &path).await?,
    };

    emit(&rendered, cli.global.output.as_deref())?;
    Ok(())
}

fn progress_bar(len: usize) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Fetching market data...");
    Ok(pb)
}

async fn collect(
    evaluator: &Evaluator,
    global: &GlobalArgs,
    listings: &[Listing],
    source: &DataSource,
) -> Result<Evaluation, Box<dyn std::error::Error>> {
    let pb = progress_bar(listings.len())?;
    let evaluation = source
        .evaluate(evaluator, listings, global.concurrency, Some(&pb))
        .await;
    pb.finish_with_message(format!(
        "Scored {} of {} securities",
        evaluation.len(),
        listings.len()
    ));

    if evaluation.is_empty() {
        return Err("no security could be fetched".into());
    }
    Ok(evaluation)
}

async fn rank(
    evaluator: &Evaluator,
    global: &GlobalArgs,
    query: &RankQuery,
) -> Result<String, Box<dyn std::error::Error>> {
    let reference = DefaultUniverse::new();
    let source = DataSource::open(global)?;
    let listings = source.listings(&global.tickers, &reference);
    let evaluation = collect(evaluator, global, &listings, &source).await?;

    let ranked = evaluator.rank(&evaluation, query);
    let board = Leaderboard::new(leaderboard_title(query), &ranked);
    let summary = evaluator.summary(&evaluation);
    info!(rows = board.len(), "leaderboard ready");

    let rendered = match global.format {
        Format::Text => {
            let mut text = board.to_ascii_table();
            text.push_str(&summary.to_ascii_table());
            if !evaluation.failures().is_empty() {
                text.push_str(&format!(
                    "\nSkipped {} ticker(s) with missing data\n",
                    evaluation.failures().len()
                ));
            }
            text
        }
        Format::Markdown => format!("{}\n{}", board.to_markdown(), summary.to_markdown()),
        Format::Json => ReportBuilder::new()
            .weights(*evaluator.weights())
            .universe_size(evaluation.len())
            .failed(evaluation.failures().iter().map(|f| f.listing.symbol.clone()))
            .leaderboard(board)
            .summary(summary)
            .build()?
            .to_json()?,
        Format::Csv => board.export_to_string(ExportFormat::Csv)?,
    };
    Ok(rendered)
}

fn leaderboard_title(query: &RankQuery) -> String {
    let class = match query.instrument {
        InstrumentFilter::Any => "Securities",
        InstrumentFilter::Stock => "Stocks",
        InstrumentFilter::Etf => "ETFs",
    };
    match query.category.as_deref() {
        Some(category) if !category.eq_ignore_ascii_case("all") => {
            format!("Top {} {category} {class}", query.limit)
        }
        _ => format!("Top {} {class}", query.limit),
    }
}

async fn analyze(
    evaluator: &Evaluator,
    global: &GlobalArgs,
    ticker: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let reference = DefaultUniverse::new();
    let source = DataSource::open(global)?;
    let mut universe = ListedUniverse::new(source.listings(&global.tickers, &reference));
    let ticker = ticker.trim().to_ascii_uppercase();
    if !universe.contains(&ticker) {
        // Scores are relative, so the ticker is scored alongside the universe.
        universe.push(Listing::new(
            &ticker,
            reference.kind_of(&ticker).unwrap_or(InstrumentKind::Stock),
        ));
    }

    let evaluation = collect(evaluator, global, &universe.listings(), &source).await?;
    let breakdown = evaluator.breakdown(&evaluation, &ticker)?;

    let rendered = match global.format {
        Format::Text => breakdown.to_ascii_table(),
        Format::Markdown => breakdown.to_markdown(),
        Format::Json => breakdown.export_to_string(ExportFormat::PrettyJson)?,
        Format::Csv => breakdown.export_to_string(ExportFormat::Csv)?,
    };
    Ok(rendered)
}

fn list_categories(
    evaluator: &Evaluator,
    format: Format,
) -> Result<String, Box<dyn std::error::Error>> {
    let categories = evaluator.ranker().categories();

    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(categories)?,
        Format::Csv => {
            let mut out = String::from("category,sector\n");
            for (label, sectors) in categories.buckets() {
                for sector in sectors {
                    out.push_str(&format!("{label},{sector}\n"));
                }
            }
            out
        }
        Format::Markdown => {
            let mut out = String::from("| Category | Sectors |\n|----------|---------|\n");
            for (label, sectors) in categories.buckets() {
                out.push_str(&format!("| {label} | {} |\n", sectors.join(", ")));
            }
            out.push_str(&format!(
                "| {} | any other sector |\n| {} | all ETFs |\n",
                categories.other_label(),
                categories.etf_label()
            ));
            out
        }
        Format::Text => {
            let mut out = String::from("Categories:\n===========\n\n");
            for (label, sectors) in categories.buckets() {
                out.push_str(&format!("  {label:<20} {}\n", sectors.join(", ")));
            }
            out.push_str(&format!("  {:<20} any other sector\n", categories.other_label()));
            out.push_str(&format!("  {:<20} all ETFs\n", categories.etf_label()));
            out
        }
    };
    Ok(rendered)
}

fn list_weights(evaluator: &Evaluator, format: Format) -> Result<String, Box<dyn std::error::Error>> {
    let weights = evaluator.weights();
    let registry = available_sub_scores();

    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(weights)?,
        Format::Csv => {
            let mut out = String::from("sub_score,weight,inverse,description\n");
            for info in &registry {
                out.push_str(&format!(
                    "{},{},{},\"{}\"\n",
                    info.sub_score.key(),
                    weights.get(info.sub_score),
                    info.inverse,
                    info.description
                ));
            }
            out
        }
        Format::Markdown => {
            let mut out =
                String::from("| Component | Weight | Rewards |\n|-----------|-------:|---------|\n");
            for info in &registry {
                out.push_str(&format!(
                    "| {} | {:.1}% | {} |\n",
                    info.label,
                    weights.get(info.sub_score) * 100.0,
                    info.description
                ));
            }
            out
        }
        Format::Text => {
            let mut out = String::from("Weight Table:\n=============\n\n");
            for info in &registry {
                out.push_str(&format!(
                    "  {:<15} {:>6.1}%   {}\n",
                    info.label,
                    weights.get(info.sub_score) * 100.0,
                    info.description
                ));
            }
            out.push_str(&format!("\n  {:<15} {:>6.1}%\n", "Total", weights.total() * 100.0));
            out
        }
    };
    Ok(rendered)
}

async fn snapshot(global: &GlobalArgs, path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let reference = DefaultUniverse::new();
    let source = DataSource::open(global)?;
    let listings = source.listings(&global.tickers, &reference);

    let pb = progress_bar(listings.len())?;
    let collection = match &source {
        DataSource::Yahoo(p) => collect_universe(p, &listings, global.concurrency, Some(&pb)).await,
        DataSource::Csv(p) => collect_universe(p, &listings, global.concurrency, Some(&pb)).await,
    };
    pb.finish_with_message(format!("Fetched {} securities", collection.records.len()));

    write_snapshot_file(path, &collection.records)?;
    Ok(format!(
        "Wrote {} records to {} ({} failed)\n",
        collection.records.len(),
        path.display(),
        collection.failures.len()
    ))
}

fn emit(text: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text),
        None => std::io::stdout().write_all(text.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank() {
        let cli = Cli::try_parse_from([
            "mtwb", "rank", "--kind", "etf", "--limit", "5", "--format", "csv", "--tickers",
            "SPY,QQQ",
        ])
        .unwrap();
        assert_eq!(cli.global.format, Format::Csv);
        assert_eq!(cli.global.tickers, ["SPY", "QQQ"]);
        assert!(matches!(
            cli.command,
            Commands::Rank {
                kind: Kind::Etf,
                limit: 5,
                ..
            }
        ));
    }

    #[rstest]
    #[case(RankQuery::top(10), "Top 10 Securities")]
    #[case(RankQuery::top(5).with_instrument(InstrumentFilter::Etf), "Top 5 ETFs")]
    #[case(RankQuery::top(3).with_category("Clinical").with_instrument(InstrumentFilter::Stock), "Top 3 Clinical Stocks")]
    #[case(RankQuery::top(3).with_category("all"), "Top 3 Securities")]
    fn test_leaderboard_title(#[case] query: RankQuery, #[case] expected: &str) {
        assert_eq!(leaderboard_title(&query), expected);
    }

    #[test]
    fn test_weights_listing_sums_to_one() {
        let evaluator = Evaluator::new(&EvaluatorConfig::default()).unwrap();
        let text = list_weights(&evaluator, Format::Text).unwrap();
        assert!(text.contains("100.0%"));
        let csv = list_weights(&evaluator, Format::Csv).unwrap();
        assert_eq!(csv.lines().count(), 8);
    }

    #[test]
    fn test_categories_listing() {
        let evaluator = Evaluator::new(&EvaluatorConfig::default()).unwrap();
        let text = list_categories(&evaluator, Format::Markdown).unwrap();
        assert!(text.contains("| Clinical | Healthcare"));
        assert!(text.contains("| ETF | all ETFs |"));
    }
}
