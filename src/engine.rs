//! The resolution engine—classify, select, validate, arbitrate, compose.
//!
//! A `ResolutionEngine` owns only read-only configuration (mislabel rules,
//! conflict policy). Every resolve call reads its own candidate list and
//! company identity, so callers can resolve many companies in parallel with
//! zero coordination.

use crate::candidate::Candidate;
use crate::classifier::{classify, TitleClassification};
use crate::company::CompanyIdentity;
use crate::conflict::{resolve_pair, ConflictOutcome, ConflictPolicy};
use crate::error::{SiftResult, ValidationError};
use crate::identity::{validate, CompiledMislabelRule, MislabelRule};
use crate::lexicon::{defaults, RoleLexicon};
use crate::resolution::{source_signal, RoleResolution, ScoreBreakdown, SelectedExecutive};
use crate::waterfall::{select, ClassifiedCandidate};

/// Justification line for a role no candidate could fill.
pub const NO_ELIGIBLE_CANDIDATES: &str = "No eligible candidates found";

/// The executive role resolution and validation engine.
///
/// # Examples
///
/// ```
/// use execsift::{Candidate, CandidateSource, CompanyIdentity, ResolutionEngine};
/// use execsift::lexicon::defaults;
///
/// let engine = ResolutionEngine::new();
/// let company = CompanyIdentity::new("Acme", "acme.com").unwrap();
/// let candidates = vec![Candidate::builder()
///     .name("Jordan Smith")
///     .title("Chief Financial Officer")
///     .source(CandidateSource::search_api("serp"))
///     .email("j.smith@acme.com")
///     .build()
///     .unwrap()];
///
/// let resolution = engine
///     .resolve_role(&defaults::finance_lexicon(), &candidates, &company)
///     .unwrap();
/// assert_eq!(resolution.tier, Some(1));
/// ```
#[derive(Debug)]
pub struct ResolutionEngine {
    mislabel_rules: Vec<CompiledMislabelRule>,
    conflict_policy: ConflictPolicy,
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionEngine {
    /// Creates an engine with no mislabel rules and the default conflict
    /// policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mislabel_rules: Vec::new(),
            conflict_policy: defaults::default_conflict_policy(),
        }
    }

    /// Replaces the conflict policy.
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Installs a mislabel rule table, compiling every rule.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for the first rule that fails to
    /// compile.
    pub fn with_mislabel_rules(mut self, rules: &[MislabelRule]) -> SiftResult<Self> {
        self.mislabel_rules = rules
            .iter()
            .map(MislabelRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self)
    }

    /// Resolves one role for one company.
    ///
    /// All data-quality findings come back as justification text on the
    /// resolution; the only error path is malformed input.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a candidate record missing a name
    /// or title, or carrying an out-of-range source confidence.
    pub fn resolve_role(
        &self,
        lexicon: &RoleLexicon,
        candidates: &[Candidate],
        company: &CompanyIdentity,
    ) -> SiftResult<RoleResolution> {
        validate_input(candidates)?;
        let fingerprint = lexicon.fingerprint();
        tracing::debug!(
            role = lexicon.role(),
            company = %company.company_name,
            candidates = candidates.len(),
            "resolving role"
        );

        if candidates.is_empty() {
            return Ok(RoleResolution::unfilled(
                lexicon.role(),
                fingerprint,
                vec![NO_ELIGIBLE_CANDIDATES.to_string()],
            ));
        }

        let mut trail = Vec::new();
        let classified: Vec<ClassifiedCandidate> = candidates
            .iter()
            .map(|candidate| {
                let classification = classify(&candidate.title, lexicon);
                match &classification {
                    TitleClassification::Excluded { pattern } => trail.push(format!(
                        "Excluded {} ('{}'): matches exclusion pattern '{pattern}'",
                        candidate.name, candidate.title
                    )),
                    TitleClassification::Unmatched => trail.push(format!(
                        "No tier match for {} ('{}')",
                        candidate.name, candidate.title
                    )),
                    TitleClassification::Eligible { .. } => {}
                }
                ClassifiedCandidate::new(candidate.clone(), classification)
            })
            .collect();

        let ranked = select(&classified, company, lexicon);
        let Some(winner) = ranked.first() else {
            trail.push(NO_ELIGIBLE_CANDIDATES.to_string());
            return Ok(RoleResolution::unfilled(lexicon.role(), fingerprint, trail));
        };

        trail.push(format!(
            "Selected {} ('{}') at tier {} ({})",
            winner.candidate.name, winner.candidate.title, winner.tier_rank, winner.tier_label
        ));
        if ranked.len() > 1 {
            trail.push(format!(
                "Preferred over {} other tier-{} candidate(s)",
                ranked.len() - 1,
                winner.tier_rank
            ));
        }
        for adjustment in &winner.adjustments {
            trail.push(format!("Score adjustment: {adjustment}"));
        }

        let report = validate(&winner.candidate, company, &self.mislabel_rules);
        for issue in &report.issues {
            trail.push(format!("Identity check: {issue}"));
        }
        if let (true, Some(email)) = (report.synthesized_email, report.email.as_deref()) {
            trail.push(format!(
                "Synthesized '{email}' from candidate name and company domain (lower trust)"
            ));
        }

        let signal = source_signal(winner.candidate.source_confidence);
        if signal != 0 {
            trail.push(format!("Source confidence signal: {signal:+}"));
        }

        let breakdown = ScoreBreakdown {
            tier_base: winner.base_score,
            adjustment_total: winner.adjustments.iter().map(|a| a.delta).sum(),
            validation_bonus: report.bonus,
            source_signal: signal,
        };
        let confidence = if report.is_valid {
            if report.bonus > 0 {
                trail.push(format!("Contact field bonus: +{}", report.bonus));
            }
            breakdown.total()
        } else {
            trail.push(
                "Identity validation failed; confidence set to 0 and contact field cleared"
                    .to_string(),
            );
            0
        };
        trail.push(format!(
            "Final confidence {confidence} (tier base {}, adjustments {:+}, validation bonus +{}, source signal {:+})",
            breakdown.tier_base, breakdown.adjustment_total, breakdown.validation_bonus, breakdown.source_signal
        ));

        // Validated fields replace the raw ones so a rejected contact never
        // leaks into the result.
        let mut selected = winner.candidate.clone();
        selected.email = report.email.clone();
        selected.phone = report.phone.clone();
        selected.profile_url = report.profile_url.clone();

        Ok(RoleResolution {
            role: lexicon.role().to_string(),
            selected: Some(SelectedExecutive {
                candidate: selected,
                tier_rank: winner.tier_rank,
                tier_label: winner.tier_label.clone(),
                exact_match: winner.exact_match,
            }),
            tier: Some(winner.tier_rank),
            confidence,
            justification: trail,
            validation: Some(report),
            breakdown,
            lexicon_fingerprint: fingerprint,
        })
    }

    /// Resolves two mutually exclusive roles and arbitrates any dual
    /// candidacy between them.
    ///
    /// # Errors
    ///
    /// Same input-validation errors as [`Self::resolve_role`].
    pub fn resolve_exclusive(
        &self,
        lexicon_a: &RoleLexicon,
        lexicon_b: &RoleLexicon,
        candidates_a: &[Candidate],
        candidates_b: &[Candidate],
        company: &CompanyIdentity,
    ) -> SiftResult<(RoleResolution, RoleResolution)> {
        let a = self.resolve_role(lexicon_a, candidates_a, company)?;
        let b = self.resolve_role(lexicon_b, candidates_b, company)?;
        let (a, b, outcome) = resolve_pair(a, b, &self.conflict_policy);
        if outcome != ConflictOutcome::NoConflict {
            tracing::debug!(
                role_a = lexicon_a.role(),
                role_b = lexicon_b.role(),
                outcome = %outcome,
                "dual candidacy arbitrated"
            );
        }
        Ok((a, b))
    }
}

fn validate_input(candidates: &[Candidate]) -> Result<(), ValidationError> {
    for candidate in candidates {
        if candidate.name.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        if candidate.title.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "title" });
        }
        if let Some(value) = candidate.source_confidence {
            if value.is_nan() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::ConfidenceOutOfRange { value });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateSource;
    use crate::error::SiftError;

    fn company() -> CompanyIdentity {
        CompanyIdentity::new("Acme", "acme.com").unwrap()
    }

    fn candidate(name: &str, title: &str, email: Option<&str>) -> Candidate {
        let mut b = Candidate::builder()
            .name(name)
            .title(title)
            .source(CandidateSource::search_api("serp"));
        if let Some(e) = email {
            b = b.email(e);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_no_candidates_is_unfilled_not_error() {
        let engine = ResolutionEngine::new();
        let r = engine
            .resolve_role(&defaults::finance_lexicon(), &[], &company())
            .unwrap();
        assert!(r.selected.is_none());
        assert_eq!(r.confidence, 0);
        assert_eq!(r.justification, vec![NO_ELIGIBLE_CANDIDATES.to_string()]);
    }

    #[test]
    fn test_malformed_candidate_is_input_error() {
        // Bypass the builder the way a deserialized record would.
        let mut bad = candidate("Jordan Smith", "CFO", None);
        bad.name = String::new();
        let engine = ResolutionEngine::new();
        let err = engine
            .resolve_role(&defaults::finance_lexicon(), &[bad], &company())
            .unwrap_err();
        assert!(matches!(err, SiftError::Validation(ValidationError::MissingField { field: "name" })));
    }

    #[test]
    fn test_resolution_carries_breakdown_and_fingerprint() {
        let engine = ResolutionEngine::new();
        let lexicon = defaults::finance_lexicon();
        let r = engine
            .resolve_role(
                &lexicon,
                &[candidate("Jordan Smith", "VP Finance", Some("j.smith@acme.com"))],
                &company(),
            )
            .unwrap();
        assert_eq!(r.tier, Some(2));
        assert_eq!(r.breakdown.tier_base, 75);
        assert_eq!(r.breakdown.validation_bonus, 3);
        assert_eq!(r.confidence, r.breakdown.total());
        assert_eq!(r.lexicon_fingerprint, lexicon.fingerprint());
    }

    #[test]
    fn test_mislabel_rule_installed_and_fires() {
        let rules = [MislabelRule::named("smith-at-acme")
            .name_pattern("^Jordan Smith$")
            .wrong_company_pattern("^Acme$")];
        let engine = ResolutionEngine::new().with_mislabel_rules(&rules).unwrap();
        let r = engine
            .resolve_role(
                &defaults::finance_lexicon(),
                &[candidate("Jordan Smith", "CFO", Some("j.smith@acme.com"))],
                &company(),
            )
            .unwrap();
        assert_eq!(r.confidence, 0);
        assert!(r.selected.as_ref().unwrap().candidate.email.is_none());
        assert!(r
            .justification
            .iter()
            .any(|l| l.contains("known mislabel pattern 'smith-at-acme'")));
    }

    #[test]
    fn test_bad_mislabel_rule_rejected_at_install() {
        let rules = [MislabelRule::named("broken").name_pattern("[unclosed")];
        assert!(ResolutionEngine::new().with_mislabel_rules(&rules).is_err());
    }

    #[test]
    fn test_source_confidence_moves_score() {
        let engine = ResolutionEngine::new();
        let lexicon = defaults::finance_lexicon();
        let mut high = candidate("Jordan Smith", "VP Finance", None);
        high.source_confidence = Some(1.0);
        let mut low = candidate("Jordan Smith", "VP Finance", None);
        low.source_confidence = Some(0.0);

        let r_high = engine.resolve_role(&lexicon, &[high], &company()).unwrap();
        let r_low = engine.resolve_role(&lexicon, &[low], &company()).unwrap();
        assert_eq!(r_high.breakdown.source_signal, 4);
        assert_eq!(r_low.breakdown.source_signal, -4);
        assert!(r_high.confidence > r_low.confidence);
    }
}
