//! The two-phase evaluator.
//!
//! Phase one collects raw metrics for the whole universe. Phase two looks up
//! ESG inputs, normalizes every metric over the collected batch and forms
//! the composite. Scoring never starts before collection has finished,
//! because every score is relative to the batch extremes.

use crate::config::EvaluatorConfig;
use crate::error::{Error, Result};
use indicatif::ProgressBar;
use mtwb_data::{FetchFailure, Listing, MarketDataProvider, collect_universe};
use mtwb_output::{LeaderboardSummary, SecurityBreakdown, generate_summary};
use mtwb_scoring::{
    CompositeScorer, EsgDirectory, EsgScorer, RankQuery, RankedList, RatingScale, RawMetrics,
    ScoredSecurity, SecurityRanker, WeightTable,
};
use tracing::{debug, info};

/// Scored universe of one run, plus the listings that could not be fetched.
#[derive(Debug, Default)]
pub struct Evaluation {
    securities: Vec<ScoredSecurity>,
    failures: Vec<FetchFailure>,
}

impl Evaluation {
    /// Scored securities in universe order.
    pub fn securities(&self) -> &[ScoredSecurity] {
        &self.securities
    }

    /// Listings dropped during collection.
    pub fn failures(&self) -> &[FetchFailure] {
        &self.failures
    }

    /// Find a scored security by symbol, ignoring case.
    pub fn find(&self, symbol: &str) -> Option<&ScoredSecurity> {
        let symbol = symbol.trim();
        self.securities
            .iter()
            .find(|s| s.symbol().eq_ignore_ascii_case(symbol))
    }

    /// Number of scored securities.
    pub fn len(&self) -> usize {
        self.securities.len()
    }

    /// True when nothing was scored.
    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }
}

/// Scores and ranks a universe under one validated configuration.
#[derive(Debug, Clone)]
pub struct Evaluator {
    scorer: CompositeScorer,
    esg: EsgScorer,
    directory: EsgDirectory,
    ranker: SecurityRanker,
}

impl Evaluator {
    /// Validate `config` and build an evaluator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown preset, an invalid weight
    /// table, ESG weights not summing to 1.0 or an anchor outside 0..=100.
    pub fn new(config: &EvaluatorConfig) -> Result<Self> {
        let weights = config.weights.resolve()?;
        let scale = RatingScale::new(config.esg.scale.letters(), config.esg.scale.unknown_anchor())?;
        let esg = EsgScorer::new(scale, config.esg.weights)?;

        let mut directory = if config.esg.sample_directory {
            EsgDirectory::sample()
        } else {
            EsgDirectory::new()
        }
        .with_fallback(config.esg.fallback.clone());
        directory.extend(config.esg.entries.clone());

        debug!(?weights, missing = ?config.missing, esg_entries = directory.len(), "evaluator configured");

        Ok(Self {
            scorer: CompositeScorer::new(weights).with_missing_policy(config.missing),
            esg,
            directory,
            ranker: SecurityRanker::new(config.categories.clone()),
        })
    }

    /// Weight table in force.
    pub const fn weights(&self) -> &WeightTable {
        self.scorer.weights()
    }

    /// Ranker and its category taxonomy.
    pub const fn ranker(&self) -> &SecurityRanker {
        &self.ranker
    }

    /// ESG directory used for stocks.
    pub const fn directory(&self) -> &EsgDirectory {
        &self.directory
    }

    /// Score an already collected batch. Pure and synchronous.
    pub fn score(&self, records: Vec<RawMetrics>) -> Vec<ScoredSecurity> {
        let batch: Vec<_> = records
            .into_iter()
            .map(|raw| {
                let inputs = self.directory.lookup(&raw.symbol);
                let esg = self.esg.score_for(raw.kind, &inputs);
                (raw, esg)
            })
            .collect();
        self.scorer.score_batch(batch)
    }

    /// Collect `listings` from `provider`, then score the batch.
    ///
    /// Failed listings are dropped and reported in
    /// [`Evaluation::failures`]; they never abort the run.
    pub async fn evaluate<P>(
        &self,
        provider: &P,
        listings: &[Listing],
        concurrency: usize,
        progress: Option<&ProgressBar>,
    ) -> Evaluation
    where
        P: MarketDataProvider + Sync,
    {
        let collection = collect_universe(provider, listings, concurrency, progress).await;
        let securities = self.score(collection.records);
        info!(
            scored = securities.len(),
            failed = collection.failures.len(),
            "evaluation complete"
        );
        Evaluation {
            securities,
            failures: collection.failures,
        }
    }

    /// Rank an evaluation.
    pub fn rank<'a>(&self, evaluation: &'a Evaluation, query: &RankQuery) -> RankedList<'a> {
        self.ranker.rank(evaluation.securities(), query)
    }

    /// Explain one security of an evaluation, with its overall rank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEvaluated`] when the symbol was not scored.
    pub fn breakdown(&self, evaluation: &Evaluation, symbol: &str) -> Result<SecurityBreakdown> {
        let ranked = self.rank(evaluation, &RankQuery::top(evaluation.len()));
        let entry = ranked
            .iter()
            .find(|e| e.security.symbol().eq_ignore_ascii_case(symbol.trim()))
            .ok_or_else(|| Error::NotEvaluated {
                symbol: symbol.trim().to_ascii_uppercase(),
                reason: not_evaluated_reason(evaluation, symbol),
            })?;

        Ok(
            SecurityBreakdown::new(entry.security, entry.category.as_str(), self.weights(), evaluation.len())
                .with_rank(entry.rank),
        )
    }

    /// Market overview of an evaluation.
    pub fn summary(&self, evaluation: &Evaluation) -> LeaderboardSummary {
        generate_summary(evaluation.securities(), self.ranker.categories())
    }
}

fn not_evaluated_reason(evaluation: &Evaluation, symbol: &str) -> String {
    evaluation
        .failures()
        .iter()
        .find(|f| f.listing.symbol.eq_ignore_ascii_case(symbol.trim()))
        .map_or_else(|| "not in the universe".to_string(), |f| f.error.to_string())
}
