//! Title classification—scoring one raw title against a role lexicon.
//!
//! The classifier is the first gate: it either vetoes a title via the
//! sibling-role exclusion set, lands it in the most senior matching tier,
//! or declares it unmatched. There is no automatic fallback; a title that
//! matches nothing stays out of the pool.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::fold;
use crate::lexicon::RoleLexicon;

/// Bonus for a title that exactly equals a canonical phrase.
pub const EXACT_PHRASE_BONUS: i16 = 5;

/// Bonus per seniority qualifier word.
pub const SENIORITY_BONUS: i16 = 3;

/// Ceiling on accumulated seniority bonuses.
pub const SENIORITY_CAP: i16 = 6;

/// Penalty per subordinate qualifier word (negative).
pub const SUBORDINATE_PENALTY: i16 = -15;

/// Floor on accumulated subordinate penalties (negative).
pub const SUBORDINATE_CAP: i16 = -30;

const SENIORITY_QUALIFIERS: &[&str] = &["senior", "executive", "group"];
const SUBORDINATE_QUALIFIERS: &[&str] = &["assistant", "deputy", "junior", "interim"];

/// Why a score delta was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Title exactly equals a canonical phrase of the lexicon.
    ExactCanonicalPhrase,

    /// Title carries a seniority qualifier word.
    SeniorityQualifier {
        /// The qualifier found.
        word: String,
    },

    /// Title carries a subordinate qualifier word.
    SubordinateQualifier {
        /// The qualifier found.
        word: String,
    },
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactCanonicalPhrase => write!(f, "exact canonical title"),
            Self::SeniorityQualifier { word } => write!(f, "seniority qualifier '{word}'"),
            Self::SubordinateQualifier { word } => write!(f, "subordinate qualifier '{word}'"),
        }
    }
}

/// One bounded score delta with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    /// Why the delta was applied.
    pub kind: AdjustmentKind,

    /// Signed delta, already bounded by the caps above.
    pub delta: i16,
}

impl fmt::Display for ScoreAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:+}", self.kind, self.delta)
    }
}

/// Outcome of classifying one title against one lexicon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TitleClassification {
    /// The title landed in a tier.
    Eligible {
        /// Rank of the matched tier (1 = most senior).
        tier_rank: u8,
        /// Label of the matched tier.
        tier_label: String,
        /// Base score of the matched tier.
        base_score: u8,
        /// The pattern that admitted the title.
        matched_pattern: String,
        /// True if the title exactly equals a canonical phrase.
        exact_match: bool,
        /// Bounded score deltas.
        adjustments: Vec<ScoreAdjustment>,
    },

    /// The title matched the sibling-role exclusion set.
    Excluded {
        /// The exclusion pattern that fired.
        pattern: String,
    },

    /// The title matched no tier and no exclusion.
    Unmatched,
}

impl TitleClassification {
    /// True for the `Eligible` variant.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }

    /// Sum of all adjustment deltas (0 for non-eligible outcomes).
    #[must_use]
    pub fn adjustment_total(&self) -> i16 {
        match self {
            Self::Eligible { adjustments, .. } => adjustments.iter().map(|a| a.delta).sum(),
            Self::Excluded { .. } | Self::Unmatched => 0,
        }
    }
}

/// Lowercases a title, collapses whitespace, and strips punctuation so
/// "VP, Finance" and "vp finance" compare equal.
#[must_use]
pub fn normalize_title(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    fold(&cleaned)
}

/// Classifies one title against a role lexicon.
///
/// The exclusion set is tested first and rejects immediately; otherwise
/// tiers are scanned in ascending rank order and the first match wins.
#[must_use]
pub fn classify(title: &str, lexicon: &RoleLexicon) -> TitleClassification {
    let normalized = normalize_title(title);
    if normalized.is_empty() {
        return TitleClassification::Unmatched;
    }

    for pattern in lexicon.exclusions() {
        if pattern.matches(&normalized) {
            tracing::trace!(
                role = lexicon.role(),
                title,
                pattern = pattern.pattern_str(),
                "title excluded"
            );
            return TitleClassification::Excluded {
                pattern: pattern.pattern_str().to_string(),
            };
        }
    }

    for tier in lexicon.tiers() {
        if let Some(pattern) = tier.patterns().iter().find(|p| p.matches(&normalized)) {
            let exact_match = lexicon.is_canonical_title(&normalized);
            let adjustments = collect_adjustments(&normalized, exact_match);
            tracing::trace!(
                role = lexicon.role(),
                title,
                tier = tier.rank(),
                pattern = pattern.pattern_str(),
                "title matched tier"
            );
            return TitleClassification::Eligible {
                tier_rank: tier.rank(),
                tier_label: tier.label().to_string(),
                base_score: tier.base_score(),
                matched_pattern: pattern.pattern_str().to_string(),
                exact_match,
                adjustments,
            };
        }
    }

    TitleClassification::Unmatched
}

fn collect_adjustments(normalized: &str, exact_match: bool) -> Vec<ScoreAdjustment> {
    let mut adjustments = Vec::new();
    if exact_match {
        adjustments.push(ScoreAdjustment {
            kind: AdjustmentKind::ExactCanonicalPhrase,
            delta: EXACT_PHRASE_BONUS,
        });
    }

    let words: Vec<&str> = normalized.split_whitespace().collect();

    let mut seniority_total = 0;
    for qualifier in SENIORITY_QUALIFIERS {
        if words.contains(qualifier) && seniority_total < SENIORITY_CAP {
            let delta = SENIORITY_BONUS.min(SENIORITY_CAP - seniority_total);
            seniority_total += delta;
            adjustments.push(ScoreAdjustment {
                kind: AdjustmentKind::SeniorityQualifier {
                    word: (*qualifier).to_string(),
                },
                delta,
            });
        }
    }

    let mut subordinate_total = 0;
    for qualifier in SUBORDINATE_QUALIFIERS {
        if words.contains(qualifier) && subordinate_total > SUBORDINATE_CAP {
            let delta = SUBORDINATE_PENALTY.max(SUBORDINATE_CAP - subordinate_total);
            subordinate_total += delta;
            adjustments.push(ScoreAdjustment {
                kind: AdjustmentKind::SubordinateQualifier {
                    word: (*qualifier).to_string(),
                },
                delta,
            });
        }
    }

    adjustments
}
