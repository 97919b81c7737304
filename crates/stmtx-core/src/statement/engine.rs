//! Profile arbitration.
//!
//! Every issuer profile parses the same text; the most complete result wins
//! unless the caller's preferred issuer is within tolerance of it.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::banks::BankProfile;
use super::detect::{BankDetector, Detection};
use super::Document;
use crate::error::Result;
use crate::models::{Bank, ParseOutcome, ParsedStatement, StmtxConfig};
use crate::source::TextSource;
use crate::text::NormalizedText;

/// Runs profiles, detection and arbitration with one configuration.
#[derive(Debug, Clone, Default)]
pub struct StatementEngine {
    config: StmtxConfig,
}

impl StatementEngine {
    pub fn new(config: StmtxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StmtxConfig {
        &self.config
    }

    /// Identity scores of `text`.
    pub fn detect(&self, text: &str) -> Detection {
        let text = NormalizedText::new(text);
        self.detector().detect(&text)
    }

    /// Parse with one issuer's profile; unknown or absent issuers use the
    /// generic baseline.
    pub fn parse_by_bank(&self, text: &str, bank: Option<&str>) -> ParsedStatement {
        let bank = bank.and_then(Bank::from_hint).unwrap_or(Bank::Generic);
        let text = NormalizedText::new(text);
        let doc = Document::new(&text, &self.config.extraction);
        BankProfile::for_bank(bank).parse(&doc)
    }

    /// Run every issuer profile and pick one result.
    pub fn parse(&self, text: &str, hint: Option<&str>) -> ParseOutcome {
        let text = NormalizedText::new(text);
        let doc = Document::new(&text, &self.config.extraction);
        let detection = self.detector().detect(doc.text());

        let mut results: BTreeMap<Bank, ParsedStatement> = BTreeMap::new();
        let mut parse_scores: BTreeMap<Bank, u32> = BTreeMap::new();
        let mut best: Option<(Bank, u32)> = None;
        for profile in BankProfile::issuers() {
            let parsed = profile.parse(&doc);
            let score = self.completeness(&parsed);
            debug!(bank = %profile.bank, score, "profile scored");
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((profile.bank, score));
            }
            parse_scores.insert(profile.bank, score);
            results.insert(profile.bank, parsed);
        }

        let (best_bank, best_score) = best.unwrap_or((Bank::ISSUERS[0], 0));
        let bank_used = self.preferred(hint, &parse_scores, best_score).unwrap_or(best_bank);
        let parsed = results.remove(&bank_used).unwrap_or_default();

        info!(
            detected = %detection.bank,
            used = %bank_used,
            score = parse_scores.get(&bank_used).copied().unwrap_or_default(),
            "statement parsed"
        );

        ParseOutcome {
            bank_detected: detection.bank,
            detection_score: detection.score,
            detection_scores: detection.scores,
            bank_used,
            parse_scores,
            parsed,
        }
    }

    /// Read text from `source` and [`parse`](Self::parse) it.
    ///
    /// Fails only when the source cannot produce any text.
    pub fn process(&self, source: &dyn TextSource, hint: Option<&str>) -> Result<ParseOutcome> {
        let text = source.text()?;
        Ok(self.parse(&text, hint))
    }

    /// Weighted count of populated fields.
    pub fn completeness(&self, parsed: &ParsedStatement) -> u32 {
        let mut score = 0;
        if parsed.card_ending.is_some() {
            score += 3;
        }
        if parsed.statement_period.from.is_some() {
            score += 2;
        }
        if parsed.statement_period.to.is_some() {
            score += 2;
        }
        if parsed.payment_due_date.is_some() {
            score += 2;
        }
        if parsed.total_amount_due.is_some() {
            score += 2;
        }
        let cap = self.config.arbitration.max_scored_transactions;
        score + u32::try_from(parsed.transactions.len()).unwrap_or(u32::MAX).min(cap)
    }

    /// The hinted issuer, when it scored close enough to the best.
    fn preferred(
        &self,
        hint: Option<&str>,
        scores: &BTreeMap<Bank, u32>,
        best_score: u32,
    ) -> Option<Bank> {
        let bank = hint.and_then(Bank::from_hint)?;
        let score = scores.get(&bank)?;
        let tolerance = self.config.arbitration.preference_tolerance;
        (best_score.saturating_sub(*score) <= tolerance).then_some(bank)
    }

    fn detector(&self) -> BankDetector {
        BankDetector::new(self.config.extraction.detection_scan_chars)
    }
}
