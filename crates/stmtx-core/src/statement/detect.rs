//! Issuer detection from identity keywords.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::banks::BankProfile;
use crate::models::Bank;
use crate::text::prefix;

/// Points for an identity pattern that matches at all.
const PRESENCE_POINTS: u32 = 2;

/// Occurrences beyond this add nothing.
const MAX_COUNTED_OCCURRENCES: usize = 3;

/// Detector verdict with every issuer's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Highest-scoring issuer; the first in canonical order on ties.
    pub bank: Bank,
    pub score: u32,
    pub scores: BTreeMap<Bank, u32>,
}

/// Scores the top of a document against each issuer's identity patterns.
#[derive(Debug, Clone)]
pub struct BankDetector {
    scan_chars: usize,
}

impl BankDetector {
    pub fn new(scan_chars: usize) -> Self {
        Self { scan_chars }
    }

    /// Identity score of one profile over already-truncated text.
    pub fn score(&self, profile: &BankProfile, head: &str) -> u32 {
        profile
            .identity
            .iter()
            .map(|pattern| {
                let count = pattern.find_iter(head).take(MAX_COUNTED_OCCURRENCES).count();
                let presence = if count > 0 { PRESENCE_POINTS } else { 0 };
                presence + count as u32
            })
            .sum()
    }

    pub fn detect(&self, text: &str) -> Detection {
        let head = prefix(text, self.scan_chars);

        let mut scores = BTreeMap::new();
        let mut best: Option<(Bank, u32)> = None;
        for profile in BankProfile::issuers() {
            let score = self.score(&profile, head);
            scores.insert(profile.bank, score);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((profile.bank, score));
            }
        }

        let (bank, score) = best.unwrap_or((Bank::ISSUERS[0], 0));
        debug!(%bank, score, "issuer detected");
        Detection {
            bank,
            score,
            scores,
        }
    }
}
