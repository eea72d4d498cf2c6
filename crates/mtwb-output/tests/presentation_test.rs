//! Integration tests for leaderboards, exports and reports.

use mtwb_output::{
    ExportFormat, Exporter, Leaderboard, LeaderboardRow, ReportBuilder, SecurityBreakdown,
    generate_summary,
};
use mtwb_scoring::{
    CategoryMap, CompositeScorer, EsgInputs, EsgScorer, InstrumentFilter, InstrumentKind, Metric,
    RankQuery, RawMetrics, ScoredSecurity, SecurityRanker, WeightTable,
};

fn universe() -> Vec<ScoredSecurity> {
    let esg = EsgScorer::default();
    let stock = |symbol: &str, sector: &str, pe: f64, dividend: f64, rating: &str| {
        (
            RawMetrics::new(symbol, InstrumentKind::Stock)
                .with_sector(sector)
                .with_metric(Metric::PriceToEarnings, pe)
                .with_metric(Metric::DividendYield, dividend)
                .with_current_price(100.0)
                .with_market_cap(2.5e11),
            esg.score_inputs(&EsgInputs::new(rating, 70, 70)),
        )
    };
    let batch = vec![
        stock("CAT", "Industrials", 16.0, 0.017, "A"),
        stock("KO", "Consumer Defensive", 24.0, 0.031, "AA"),
        stock("PG", "Consumer Defensive", 26.0, 0.024, "AA"),
        (
            RawMetrics::new("ICLN", InstrumentKind::Etf)
                .with_metric(Metric::DividendYield, 0.015),
            esg.score_for(InstrumentKind::Etf, &EsgInputs::default()),
        ),
    ];
    CompositeScorer::default().score_batch(batch)
}

#[test]
fn test_full_leaderboard_workflow() {
    let securities = universe();
    let ranker = SecurityRanker::default();
    let query = RankQuery::top(10)
        .with_category("Consumer Defensive")
        .with_instrument(InstrumentFilter::Stock);
    let board = Leaderboard::new("Consumer Defensive", &ranker.rank(&securities, &query));

    assert_eq!(board.len(), 2);
    assert!(board.rows.iter().all(|r| r.category == "Consumer Defensive"));
    assert!(board.rows[0].composite >= board.rows[1].composite);

    let csv = board.export_to_string(ExportFormat::Csv).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<LeaderboardRow> = reader.deserialize().map(Result::unwrap).collect();
    assert_eq!(rows, board.rows);

    let markdown = board.to_markdown();
    assert!(markdown.contains("| 1 |"));
    assert!(markdown.contains("$250.0B"));
}

#[test]
fn test_breakdown_and_report() {
    let securities = universe();
    let ranker = SecurityRanker::default();
    let weights = WeightTable::default();
    let ranked = ranker.rank(&securities, &RankQuery::top(securities.len()));

    let entry = ranked.iter().find(|e| e.security.symbol() == "KO").unwrap();
    let breakdown = SecurityBreakdown::new(entry.security, entry.category.as_str(), &weights, securities.len())
        .with_rank(entry.rank);
    let csv = breakdown.export_to_string(ExportFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 8);
    assert!(csv.starts_with("symbol,component,raw_value,score,weight,contribution"));
    assert!(csv.contains("KO,income,0.031,"));

    let summary = generate_summary(&securities, ranker.categories());
    assert_eq!(summary.etfs, 1);
    assert_eq!(summary.esg_leaders, 2);

    let report = ReportBuilder::new()
        .title("MTWB Evaluation")
        .leaderboard(Leaderboard::new("All", &ranked))
        .universe_size(securities.len())
        .summary(summary.clone())
        .build()
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.write_to(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let parsed: mtwb_output::Report = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.leaderboard.len(), 4);
    assert_eq!(parsed.summary.as_ref().map(|s| s.count), Some(summary.count));

    let summary_csv = parsed
        .summary
        .unwrap()
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    assert!(summary_csv.contains("category:ETF,1"));
}

#[test]
fn test_empty_category_renders() {
    let securities = universe();
    let ranker = SecurityRanker::default();
    let board = Leaderboard::new(
        "Clinical",
        &ranker.rank(&securities, &RankQuery::top(5).with_category("Clinical")),
    );
    assert!(board.is_empty());
    assert_eq!(
        board.export_to_string(ExportFormat::Csv).unwrap(),
        String::new()
    );
    let categories = CategoryMap::default();
    assert!(categories.labels().contains(&"Clinical"));
}
