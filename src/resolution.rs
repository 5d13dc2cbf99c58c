//! Resolution results—the structured answer for one role at one company.
//!
//! A resolution is never a bare candidate: it carries the assigned tier,
//! an immutable score breakdown summed once, the identity-validation
//! outcome, and the full ordered justification trail, so any consumer can
//! render a human-readable selection rationale.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::identity::IdentityReport;

/// Bound on the source-confidence signal's contribution (± points).
pub const SOURCE_SIGNAL_BOUND: i16 = 4;

/// Immutable score breakdown, summed once and clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Base score of the winning tier.
    pub tier_base: u8,

    /// Sum of bounded classifier adjustments.
    pub adjustment_total: i16,

    /// Capped identity-validation field bonus.
    pub validation_bonus: u8,

    /// Bounded contribution of the source-supplied confidence.
    pub source_signal: i16,
}

impl ScoreBreakdown {
    /// Sums the components and clamps to [0, 100].
    #[must_use]
    pub fn total(&self) -> u8 {
        let sum = i16::from(self.tier_base)
            + self.adjustment_total
            + i16::from(self.validation_bonus)
            + self.source_signal;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let clamped = sum.clamp(0, 100) as u8;
        clamped
    }
}

/// Converts an upstream source confidence in [0.0, 1.0] into a bounded
/// signed signal: neutral at 0.5, at most ±[`SOURCE_SIGNAL_BOUND`].
#[must_use]
pub fn source_signal(source_confidence: Option<f32>) -> i16 {
    source_confidence.map_or(0, |c| {
        #[allow(clippy::cast_possible_truncation)]
        let raw = ((f64::from(c) - 0.5) * 8.0).round() as i16;
        raw.clamp(-SOURCE_SIGNAL_BOUND, SOURCE_SIGNAL_BOUND)
    })
}

/// The executive a role resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedExecutive {
    /// The winning candidate, contact fields already corrected by
    /// identity validation (a rejected field never survives here).
    pub candidate: Candidate,

    /// Rank of the tier that admitted the title.
    pub tier_rank: u8,

    /// Label of that tier.
    pub tier_label: String,

    /// True if the title exactly equals a canonical phrase of the role's
    /// lexicon; conflict resolution prefers exact holders.
    pub exact_match: bool,
}

/// The full outcome of resolving one role for one company.
///
/// Constructed fresh per company per role and consumed immediately; the
/// engine never persists or caches these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleResolution {
    /// Stable role key the resolution answers for.
    pub role: String,

    /// The selected executive, if the role was filled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectedExecutive>,

    /// Winning tier rank, if filled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<u8>,

    /// Final confidence in [0, 100].
    pub confidence: u8,

    /// Ordered human-readable trail of every decision taken.
    pub justification: Vec<String>,

    /// Identity-validation outcome for the selected candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<IdentityReport>,

    /// Immutable score breakdown behind `confidence`.
    pub breakdown: ScoreBreakdown,

    /// Fingerprint of the lexicon revision that produced this decision.
    pub lexicon_fingerprint: String,
}

impl RoleResolution {
    /// An unfilled role: expected outcome, not a fault.
    #[must_use]
    pub fn unfilled(
        role: impl Into<String>,
        lexicon_fingerprint: impl Into<String>,
        justification: Vec<String>,
    ) -> Self {
        Self {
            role: role.into(),
            selected: None,
            tier: None,
            confidence: 0,
            justification,
            validation: None,
            breakdown: ScoreBreakdown::default(),
            lexicon_fingerprint: lexicon_fingerprint.into(),
        }
    }

    /// True if the role was filled.
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        self.selected.is_some()
    }

    /// Drops the assignment after losing a dual-candidacy arbitration,
    /// keeping the trail and appending the stated reason.
    #[must_use]
    pub fn withdraw(mut self, reason: String) -> Self {
        self.selected = None;
        self.tier = None;
        self.confidence = 0;
        self.validation = None;
        self.breakdown = ScoreBreakdown::default();
        self.justification.push(reason);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_total_clamps() {
        let high = ScoreBreakdown {
            tier_base: 90,
            adjustment_total: 11,
            validation_bonus: 6,
            source_signal: 4,
        };
        assert_eq!(high.total(), 100);

        let low = ScoreBreakdown {
            tier_base: 10,
            adjustment_total: -30,
            validation_bonus: 0,
            source_signal: -4,
        };
        assert_eq!(low.total(), 0);

        let mid = ScoreBreakdown {
            tier_base: 75,
            adjustment_total: 5,
            validation_bonus: 3,
            source_signal: 0,
        };
        assert_eq!(mid.total(), 83);
    }

    #[test]
    fn test_source_signal_bounds() {
        assert_eq!(source_signal(None), 0);
        assert_eq!(source_signal(Some(0.5)), 0);
        assert_eq!(source_signal(Some(1.0)), 4);
        assert_eq!(source_signal(Some(0.0)), -4);
        assert_eq!(source_signal(Some(0.75)), 2);
    }

    #[test]
    fn test_unfilled() {
        let r = RoleResolution::unfilled("finance_leader", "fp", vec!["No eligible candidates found".to_string()]);
        assert!(!r.is_filled());
        assert_eq!(r.confidence, 0);
        assert_eq!(r.justification, vec!["No eligible candidates found".to_string()]);
    }

    #[test]
    fn test_withdraw_clears_assignment() {
        let r = RoleResolution {
            role: "revenue_leader".to_string(),
            selected: None,
            tier: Some(2),
            confidence: 80,
            justification: vec!["selected".to_string()],
            validation: None,
            breakdown: ScoreBreakdown {
                tier_base: 75,
                adjustment_total: 5,
                validation_bonus: 0,
                source_signal: 0,
            },
            lexicon_fingerprint: String::new(),
        };
        let r = r.withdraw("dropped".to_string());
        assert!(r.tier.is_none());
        assert_eq!(r.confidence, 0);
        assert_eq!(r.breakdown, ScoreBreakdown::default());
        assert_eq!(r.justification.last().map(String::as_str), Some("dropped"));
    }

    #[test]
    fn test_serialization_skips_empty() {
        let r = RoleResolution::unfilled("finance_leader", "fp", Vec::new());
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("selected"));
        assert!(!json.contains("\"tier\""));
    }
}
