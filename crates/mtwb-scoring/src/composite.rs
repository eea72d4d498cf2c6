//! Composite investment-fit score.
//!
//! Scoring a universe runs in three ordered phases:
//!
//! 1. [`CompositeScorer::fit`] captures the min/max of every financial
//!    metric across the whole batch.
//! 2. [`CompositeScorer::score`] maps one security's metrics onto 0..=100,
//!    multiplies the ESG sub-score by [`ESG_SCALE_FACTOR`], clamps it to
//!    0..=100 and forms the weighted sum of all seven components.
//! 3. [`CompositeScorer::score_batch`] min-max normalizes the weighted sums
//!    across the batch to produce the displayed composite.
//!
//! The second normalization anchors the composite to the spread of the
//! universe actually evaluated, so composites are only comparable within
//! one pass.

use crate::esg::EsgResult;
use crate::normalize::{BatchScale, MissingPolicy};
use crate::security::{Metric, RawMetrics, ScoredSecurity, SubScore, SubScores};
use crate::weights::WeightTable;
use tracing::debug;

/// Multiplier taking the ESG sub-score onto the common 0..=100 scale.
///
/// Sub-scores above 25 saturate at 100 after the clamp.
pub const ESG_SCALE_FACTOR: f64 = 4.0;

/// Per-metric extremes of one batch (phase 1 output).
#[derive(Debug, Clone, PartialEq)]
pub struct BatchExtremes {
    scales: [BatchScale; 6],
    len: usize,
}

impl BatchExtremes {
    /// Scale fitted for `metric`.
    pub const fn scale(&self, metric: Metric) -> &BatchScale {
        &self.scales[metric.index()]
    }

    /// Number of securities the extremes were fitted on.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when fitted on an empty batch.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Per-security result of phase 2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorecard {
    /// Normalized financial sub-scores
    pub sub_scores: SubScores,
    /// ESG sub-score times [`ESG_SCALE_FACTOR`], clamped to 0..=100
    pub esg_normalized: f64,
    /// Weighted sum of all seven components
    pub weighted_sum: f64,
}

/// Combines sub-scores into the composite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeScorer {
    weights: WeightTable,
    missing: MissingPolicy,
}

impl CompositeScorer {
    /// Create a scorer. The table was validated when it was built.
    pub fn new(weights: WeightTable) -> Self {
        Self {
            weights,
            missing: MissingPolicy::default(),
        }
    }

    /// Set the placeholder policy for missing metrics.
    pub fn with_missing_policy(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Weight table in use.
    pub const fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Missing-value policy in use.
    pub const fn missing_policy(&self) -> MissingPolicy {
        self.missing
    }

    /// Phase 1: fit every metric's extremes over the batch.
    pub fn fit<'a, I>(&self, batch: I) -> BatchExtremes
    where
        I: IntoIterator<Item = &'a RawMetrics>,
    {
        let mut columns: [Vec<Option<f64>>; 6] = Default::default();
        let mut len = 0;
        for raw in batch {
            for metric in Metric::ALL {
                columns[metric.index()].push(raw.metric(metric));
            }
            len += 1;
        }

        let scales = Metric::ALL.map(|metric| BatchScale::fit(&columns[metric.index()], self.missing));
        for metric in Metric::ALL {
            let scale = &scales[metric.index()];
            debug!(
                metric = metric.name(),
                min = scale.min(),
                max = scale.max(),
                degenerate = scale.is_degenerate(),
                "fitted metric scale"
            );
        }

        BatchExtremes { scales, len }
    }

    /// Phase 2: score one security against fitted extremes.
    pub fn score(&self, raw: &RawMetrics, esg: &EsgResult, extremes: &BatchExtremes) -> Scorecard {
        let mut scores = [0.0; 6];
        for sub_score in SubScore::ALL {
            if let Some(metric) = sub_score.source_metric() {
                scores[metric.index()] =
                    extremes.scale(metric).score(raw.metric(metric), sub_score.is_inverse());
            }
        }
        let sub_scores = SubScores::from_array(scores);
        let esg_normalized = (esg.sub_score * ESG_SCALE_FACTOR).clamp(0.0, 100.0);

        let weighted_sum = self
            .weights
            .apply(|sub_score| sub_scores.get(sub_score).unwrap_or(esg_normalized));

        Scorecard {
            sub_scores,
            esg_normalized,
            weighted_sum,
        }
    }

    /// Run all three phases over a universe.
    ///
    /// Output order matches input order.
    pub fn score_batch(&self, batch: Vec<(RawMetrics, EsgResult)>) -> Vec<ScoredSecurity> {
        let extremes = self.fit(batch.iter().map(|(raw, _)| raw));
        let cards: Vec<Scorecard> = batch
            .iter()
            .map(|(raw, esg)| self.score(raw, esg, &extremes))
            .collect();

        let sums: Vec<Option<f64>> = cards.iter().map(|c| Some(c.weighted_sum)).collect();
        let composite_scale = BatchScale::fit(&sums, self.missing);
        debug!(
            securities = cards.len(),
            min = composite_scale.min(),
            max = composite_scale.max(),
            "renormalizing weighted sums"
        );

        batch
            .into_iter()
            .zip(cards)
            .map(|((raw, esg), card)| {
                let composite = composite_scale.score(Some(card.weighted_sum), false);
                ScoredSecurity::new(raw, esg, card, composite)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::esg::EsgScorer;
    use crate::security::InstrumentKind;
    use approx::assert_relative_eq;

    fn stock(symbol: &str, pe: f64, beta: f64) -> RawMetrics {
        RawMetrics::new(symbol, InstrumentKind::Stock)
            .with_metric(Metric::PriceToEarnings, pe)
            .with_metric(Metric::Beta, beta)
            .with_metric(Metric::DividendYield, 0.02)
            .with_metric(Metric::ProfitMargin, 0.1)
            .with_metric(Metric::ReturnOnEquity, 0.15)
            .with_metric(Metric::FiftyTwoWeekChange, 0.05)
    }

    fn neutral_esg() -> EsgResult {
        EsgScorer::default().score(None, None, None)
    }

    #[test]
    fn test_fit_captures_extremes() {
        let batch = [stock("A", 10.0, 0.8), stock("B", 30.0, 1.4)];
        let extremes = CompositeScorer::default().fit(&batch);
        assert_eq!(extremes.len(), 2);
        assert_relative_eq!(extremes.scale(Metric::PriceToEarnings).min(), 10.0);
        assert_relative_eq!(extremes.scale(Metric::PriceToEarnings).max(), 30.0);
        assert!(extremes.scale(Metric::DividendYield).is_degenerate());
    }

    #[test]
    fn test_score_inverse_and_flat_metrics() {
        let batch = [stock("A", 10.0, 0.8), stock("B", 30.0, 1.4)];
        let scorer = CompositeScorer::default();
        let extremes = scorer.fit(&batch);

        let card = scorer.score(&batch[0], &neutral_esg(), &extremes);
        assert_relative_eq!(card.sub_scores.valuation, 100.0);
        assert_relative_eq!(card.sub_scores.risk, 100.0);
        assert_relative_eq!(card.sub_scores.income, 50.0);
        assert_relative_eq!(card.esg_normalized, 100.0);
    }

    #[test]
    fn test_weighted_sum_uses_table() {
        let batch = [stock("A", 10.0, 0.8), stock("B", 30.0, 1.4)];
        let scorer = CompositeScorer::new(WeightTable::mtwb());
        let extremes = scorer.fit(&batch);
        let card = scorer.score(&batch[1], &neutral_esg(), &extremes);

        // valuation 0, risk 0, four flat metrics at 50, ESG clamped to 100
        let expected = 0.0 * 0.10 + 0.0 * 0.20 + 50.0 * (0.20 + 0.10 + 0.10 + 0.10) + 100.0 * 0.20;
        assert_relative_eq!(card.weighted_sum, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_esg_component_stays_on_common_scale() {
        let esg = EsgScorer::default();
        let etf = RawMetrics::new("SPY", InstrumentKind::Etf).with_metric(Metric::Beta, 1.0);
        let batch = vec![
            (stock("LEADER", 15.0, 1.0), esg.score(Some("AAA"), Some(100), Some(100))),
            (stock("LAGGARD", 15.0, 1.0), esg.score(Some("CCC"), Some(0), Some(0))),
            (etf, EsgResult::etf_default()),
        ];
        let scored = CompositeScorer::default().score_batch(batch);

        assert_relative_eq!(scored[0].esg().sub_score, 100.0, epsilon = 1e-9);
        assert_relative_eq!(scored[0].esg_normalized(), 100.0);
        assert_relative_eq!(scored[1].esg_normalized(), 48.0, epsilon = 1e-9);
        assert_relative_eq!(scored[2].esg_normalized(), 50.0);
        assert!(
            scored
                .iter()
                .all(|s| (0.0..=100.0).contains(&s.esg_normalized()))
        );
    }

    #[test]
    fn test_score_batch_renormalizes() {
        let batch = vec![
            (stock("A", 10.0, 0.8), neutral_esg()),
            (stock("B", 20.0, 1.1), neutral_esg()),
            (stock("C", 30.0, 1.4), neutral_esg()),
        ];
        let scored = CompositeScorer::default().score_batch(batch);
        assert_eq!(scored.len(), 3);
        assert_eq!(scored[0].symbol(), "A");
        assert_relative_eq!(scored[0].composite(), 100.0);
        assert_relative_eq!(scored[1].composite(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(scored[2].composite(), 0.0);
    }

    #[test]
    fn test_identical_batch_is_neutral() {
        let batch = vec![
            (stock("A", 15.0, 1.0), neutral_esg()),
            (stock("B", 15.0, 1.0), neutral_esg()),
        ];
        for security in CompositeScorer::default().score_batch(batch) {
            assert_eq!(security.composite(), 50.0);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(CompositeScorer::default().score_batch(Vec::new()).is_empty());
    }
}
