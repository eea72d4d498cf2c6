//! End-to-end properties of the scoring engine.

use approx::assert_relative_eq;
use mtwb_scoring::{
    CategoryMap, CompositeScorer, ConfigError, EsgResult, EsgScorer, InstrumentFilter,
    InstrumentKind, Metric, RankQuery, RawMetrics, ScoredSecurity, SecurityRanker, SubScore,
    WeightTable, normalize,
};
use rstest::rstest;

fn stock(symbol: &str, sector: &str, pe: f64) -> RawMetrics {
    RawMetrics::new(symbol, InstrumentKind::Stock)
        .with_sector(sector)
        .with_metric(Metric::PriceToEarnings, pe)
        .with_metric(Metric::Beta, 1.0)
        .with_metric(Metric::DividendYield, 0.02)
        .with_metric(Metric::ProfitMargin, 0.12)
        .with_metric(Metric::ReturnOnEquity, 0.18)
        .with_metric(Metric::FiftyTwoWeekChange, 0.07)
}

fn valuation_only() -> WeightTable {
    WeightTable::new(SubScore::ALL.map(|s| (s, if s == SubScore::Valuation { 1.0 } else { 0.0 })))
        .unwrap()
}

fn score(batch: Vec<RawMetrics>, weights: WeightTable) -> Vec<ScoredSecurity> {
    let esg = EsgScorer::default();
    let pairs = batch
        .into_iter()
        .map(|raw| {
            let result = esg.score(Some("A"), Some(70), Some(70));
            (raw, result)
        })
        .collect();
    CompositeScorer::new(weights).score_batch(pairs)
}

#[test]
fn test_normalize_range_and_order() {
    let values: Vec<Option<f64>> = [3.5, -1.0, 12.0, 0.0, 7.25]
        .into_iter()
        .map(Some)
        .collect();

    for inverse in [false, true] {
        let scores = normalize(&values, inverse);
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));

        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                if a < b {
                    if inverse {
                        assert!(scores[i] >= scores[j]);
                    } else {
                        assert!(scores[i] <= scores[j]);
                    }
                }
            }
        }
    }

    let scores = normalize(&values, false);
    assert_relative_eq!(scores[1], 0.0);
    assert_relative_eq!(scores[2], 100.0);
}

#[test]
fn test_literal_esg_outputs() {
    let scorer = EsgScorer::default();
    assert_relative_eq!(
        scorer.score(Some("AAA"), Some(100), Some(100)).sub_score,
        100.0,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        scorer.score(Some("CCC"), Some(0), Some(0)).sub_score,
        12.0,
        epsilon = 1e-9
    );
}

#[rstest]
#[case::sums_to_point_nine(0.9)]
#[case::sums_to_one_point_one(1.1)]
fn test_bad_weight_sum_rejected(#[case] total: f64) {
    let share = total / 7.0;
    let result = WeightTable::new(SubScore::ALL.map(|s| (s, share)));
    assert!(matches!(result, Err(ConfigError::WeightSum(_))));
}

#[test]
fn test_three_security_valuation_scenario() {
    let scored = score(
        vec![
            stock("MID", "Technology", 20.0),
            stock("CHEAP", "Technology", 10.0),
            stock("RICH", "Technology", 30.0),
        ],
        valuation_only(),
    );

    let ranker = SecurityRanker::default();
    let ranked = ranker.rank(&scored, &RankQuery::top(10));
    assert_eq!(ranked.symbols(), vec!["CHEAP", "MID", "RICH"]);

    let first = ranked.entries()[0].security;
    assert_relative_eq!(first.composite(), 100.0);
    assert_relative_eq!(first.sub_scores().income, 50.0);
    assert_eq!(ranked.entries()[2].rank, 3);
}

#[test]
fn test_ties_keep_universe_order() {
    let batch = ["D", "B", "A", "C"]
        .into_iter()
        .map(|s| stock(s, "Energy", 15.0))
        .collect();
    let scored = score(batch, WeightTable::mtwb());
    assert!(scored.iter().all(|s| s.composite() == 50.0));

    let ranker = SecurityRanker::default();
    let query = RankQuery::top(10);
    let first = ranker.rank(&scored, &query).symbols();
    let second = ranker.rank(&scored, &query).symbols();
    assert_eq!(first, vec!["D", "B", "A", "C"]);
    assert_eq!(first, second);
}

#[test]
fn test_filters_are_conjunctive() {
    let mut batch = vec![
        stock("XOM", "Energy", 12.0),
        stock("PFE", "Healthcare", 9.0),
        stock("AAPL", "Technology", 30.0),
    ];
    batch.push(RawMetrics::new("SPY", InstrumentKind::Etf).with_metric(Metric::Beta, 1.0));
    let scored = score(batch, WeightTable::mtwb());
    let ranker = SecurityRanker::new(CategoryMap::default());

    let clinical = ranker.rank(&scored, &RankQuery::top(10).with_category("clinical"));
    assert_eq!(clinical.symbols(), vec!["PFE"]);
    assert_eq!(clinical.entries()[0].category, "Clinical");

    let etf_in_industrial = ranker.rank(
        &scored,
        &RankQuery::top(10)
            .with_category("Industrial")
            .with_instrument(InstrumentFilter::Etf),
    );
    assert!(etf_in_industrial.is_empty());

    let etfs = ranker.rank(
        &scored,
        &RankQuery::top(10).with_instrument(InstrumentFilter::Etf),
    );
    assert_eq!(etfs.symbols(), vec!["SPY"]);
    assert_eq!(etfs.entries()[0].category, "ETF");
}

#[test]
fn test_empty_category_and_limit() {
    let scored = score(
        vec![stock("A", "Energy", 10.0), stock("B", "Energy", 20.0)],
        WeightTable::mtwb(),
    );
    let ranker = SecurityRanker::default();

    assert!(ranker.rank(&scored, &RankQuery::top(10).with_category("Clinical")).is_empty());
    assert_eq!(ranker.rank(&scored, &RankQuery::top(1)).len(), 1);
    assert_eq!(ranker.rank(&scored, &RankQuery::top(99)).len(), 2);
    assert!(ranker.rank(&[], &RankQuery::top(5)).is_empty());
}

#[test]
fn test_etf_always_gets_neutral_esg() {
    let scorer = EsgScorer::default();
    let etf = RawMetrics::new("QQQ", InstrumentKind::Etf)
        .with_metric(Metric::Beta, 1.2)
        .with_metric(Metric::DividendYield, 0.006);

    let strong = mtwb_scoring::EsgInputs::new("AAA", 100, 100);
    let result = scorer.score_for(etf.kind, &strong);
    assert_eq!(result, EsgResult::etf_default());

    let scored = CompositeScorer::default().score_batch(vec![(etf, result)]);
    assert_relative_eq!(scored[0].esg_normalized(), 50.0);
    assert_eq!(scored[0].esg().rating, "N/A");
}

#[test]
fn test_missing_metrics_stay_in_ranking() {
    let sparse = RawMetrics::new("SPARSE", InstrumentKind::Stock).with_sector("Technology");
    let scored = score(
        vec![stock("A", "Energy", 10.0), sparse, stock("B", "Energy", 30.0)],
        WeightTable::mtwb(),
    );
    let ranked = SecurityRanker::default().rank(&scored, &RankQuery::top(10));
    assert_eq!(ranked.len(), 3);

    let sparse = scored.iter().find(|s| s.symbol() == "SPARSE").unwrap();
    assert_relative_eq!(sparse.sub_scores().valuation, 50.0);
}

#[test]
fn test_ranking_outlives_ranker() {
    let scored = score(
        vec![stock("XOM", "Energy", 12.0), stock("PFE", "Healthcare", 9.0)],
        WeightTable::mtwb(),
    );
    let ranked = {
        let ranker = SecurityRanker::new(CategoryMap::default());
        ranker.rank(&scored, &RankQuery::top(10))
    };
    assert_eq!(ranked.symbols(), vec!["PFE", "XOM"]);
    assert_eq!(ranked.entries()[0].category, "Clinical");
    assert_eq!(ranked.entries()[1].category, "Industrial");
}
