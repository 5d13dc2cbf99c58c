//! Waterfall selection—strict lowest-tier preference over a classified pool.
//!
//! Tier rank dominates everything: a tier-3 candidate never beats a tier-1
//! candidate, whatever their individual scores. Scores only order candidates
//! *within* the winning tier.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::classifier::{ScoreAdjustment, TitleClassification};
use crate::company::CompanyIdentity;
use crate::lexicon::RoleLexicon;

/// A candidate paired with its classification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCandidate {
    /// The candidate.
    pub candidate: Candidate,
    /// Its classification against the role lexicon.
    pub classification: TitleClassification,
}

impl ClassifiedCandidate {
    /// Pairs a candidate with its classification.
    #[must_use]
    pub const fn new(candidate: Candidate, classification: TitleClassification) -> Self {
        Self {
            candidate,
            classification,
        }
    }
}

/// An eligible candidate ranked inside the winning tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// The candidate.
    pub candidate: Candidate,
    /// Rank of the tier that admitted it.
    pub tier_rank: u8,
    /// Label of that tier.
    pub tier_label: String,
    /// Base score of that tier.
    pub base_score: u8,
    /// True if the title exactly equals a canonical phrase.
    pub exact_match: bool,
    /// Bounded classifier deltas.
    pub adjustments: Vec<ScoreAdjustment>,
}

impl RankedCandidate {
    /// Tier base score plus classifier adjustments.
    #[must_use]
    pub fn adjusted_score(&self) -> i16 {
        i16::from(self.base_score) + self.adjustments.iter().map(|a| a.delta).sum::<i16>()
    }
}

/// Picks the winning tier and orders its candidates.
///
/// The lowest-ranked non-empty tier pre-empts all others. A terminal
/// small-company-only tier is skipped unless the company is flagged small.
/// Within the winning tier: adjusted score descending, ties broken by
/// shorter raw title. Empty input yields an empty result; an unfilled role
/// is an expected outcome, not a fault.
#[must_use]
pub fn select(
    classified: &[ClassifiedCandidate],
    company: &CompanyIdentity,
    lexicon: &RoleLexicon,
) -> Vec<RankedCandidate> {
    for tier in lexicon.tiers() {
        if tier.is_small_company_only() && !company.is_small() {
            tracing::trace!(
                role = lexicon.role(),
                tier = tier.rank(),
                company = %company.company_name,
                "fallback tier skipped: company not flagged small"
            );
            continue;
        }

        let mut group: Vec<RankedCandidate> = classified
            .iter()
            .filter_map(|cc| match &cc.classification {
                TitleClassification::Eligible {
                    tier_rank,
                    tier_label,
                    base_score,
                    exact_match,
                    adjustments,
                    ..
                } if *tier_rank == tier.rank() => Some(RankedCandidate {
                    candidate: cc.candidate.clone(),
                    tier_rank: *tier_rank,
                    tier_label: tier_label.clone(),
                    base_score: *base_score,
                    exact_match: *exact_match,
                    adjustments: adjustments.clone(),
                }),
                _ => None,
            })
            .collect();

        if group.is_empty() {
            continue;
        }

        group.sort_by(|a, b| {
            b.adjusted_score()
                .cmp(&a.adjusted_score())
                .then_with(|| a.candidate.title.len().cmp(&b.candidate.title.len()))
        });
        tracing::debug!(
            role = lexicon.role(),
            tier = tier.rank(),
            candidates = group.len(),
            "winning tier selected"
        );
        return group;
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateSource;
    use crate::classifier::classify;
    use crate::company::SizeClass;
    use crate::lexicon::{TierSpec, TitlePattern};

    fn lexicon() -> RoleLexicon {
        RoleLexicon::builder("finance_leader", "Finance Leader")
            .tier(
                TierSpec::new(1, "chief finance", 90)
                    .pattern(TitlePattern::phrase("chief financial officer")),
            )
            .tier(
                TierSpec::new(2, "vp finance", 75)
                    .pattern(TitlePattern::phrase("vp finance")),
            )
            .tier(
                TierSpec::new(9, "top executive", 40)
                    .pattern(TitlePattern::regex(r"\bceo\b"))
                    .small_company_only(),
            )
            .exclusion(TitlePattern::substring("revenue"))
            .build()
            .unwrap()
    }

    fn company() -> CompanyIdentity {
        CompanyIdentity::new("Acme", "acme.com").unwrap()
    }

    fn classified(name: &str, title: &str) -> ClassifiedCandidate {
        let candidate = Candidate::builder()
            .name(name)
            .title(title)
            .source(CandidateSource::search_api("serp"))
            .build()
            .unwrap();
        let classification = classify(title, &lexicon());
        ClassifiedCandidate::new(candidate, classification)
    }

    #[test]
    fn test_lowest_tier_preempts_regardless_of_score() {
        // The tier-2 title carries an exact-match bonus; tier 1 still wins.
        let pool = vec![
            classified("Lo Tier", "VP Finance"),
            classified("Hi Tier", "Deputy Chief Financial Officer Operations"),
        ];
        let ranked = select(&pool, &company(), &lexicon());
        assert_eq!(ranked[0].candidate.name, "Hi Tier");
        assert_eq!(ranked[0].tier_rank, 1);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_within_tier_score_then_title_length() {
        let pool = vec![
            classified("Longer", "VP Finance and Administration Operations"),
            classified("Short", "VP Finance"),
            classified("Senior", "Senior VP Finance"),
        ];
        let ranked = select(&pool, &company(), &lexicon());
        // "VP Finance" is exact canonical (+5) = 80; "Senior VP Finance"
        // is 75+3 = 78; the long compound title is plain 75.
        assert_eq!(ranked[0].candidate.name, "Short");
        assert_eq!(ranked[1].candidate.name, "Senior");
        assert_eq!(ranked[2].candidate.name, "Longer");
    }

    #[test]
    fn test_fallback_gated_on_small_company() {
        let pool = vec![classified("Top Exec", "CEO")];

        let ranked = select(&pool, &company(), &lexicon());
        assert!(ranked.is_empty());

        let small = company().with_size_class(SizeClass::Small);
        let ranked = select(&pool, &small, &lexicon());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].tier_rank, 9);
    }

    #[test]
    fn test_fallback_not_used_when_earlier_tier_filled() {
        let small = company().with_size_class(SizeClass::Small);
        let pool = vec![
            classified("Top Exec", "CEO"),
            classified("Finance VP", "VP Finance"),
        ];
        let ranked = select(&pool, &small, &lexicon());
        assert_eq!(ranked[0].tier_rank, 2);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_excluded_never_selected() {
        let small = company().with_size_class(SizeClass::Small);
        let pool = vec![classified("Wrong Family", "Chief Revenue Officer and CEO")];
        assert!(select(&pool, &small, &lexicon()).is_empty());
    }

    #[test]
    fn test_empty_input_empty_result() {
        assert!(select(&[], &company(), &lexicon()).is_empty());
    }
}
