//! Conflict resolution—one individual winning two mutually exclusive roles.
//!
//! Conflicts are arbitrated, never raised as errors. The three rules run in
//! order: an exact canonical title keeps its role; a combined top-executive
//! title keeps both; otherwise a fixed role priority decides. Because the
//! priority order is total, an unresolved conflict is unreachable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::normalize_title;
use crate::error::ValidationError;
use crate::lexicon::{CompiledPattern, TitlePattern};
use crate::resolution::RoleResolution;

/// Policy data for dual-candidacy arbitration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictPolicyData {
    /// Titles denoting a legitimate combined top-executive role.
    pub combined_role_patterns: Vec<TitlePattern>,
    /// Role key that wins an ambiguous dual candidacy.
    pub priority_role: String,
}

/// Compiled arbitration policy.
///
/// Which dual roles are legitimate is a policy question, not a hard rule:
/// the combined-role pattern list is configuration, overridable per tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ConflictPolicyData", into = "ConflictPolicyData")]
pub struct ConflictPolicy {
    combined: Vec<CompiledPattern>,
    priority_role: String,
}

impl ConflictPolicy {
    /// Builds a policy from pattern data.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if a pattern does not compile or the
    /// priority role is empty.
    pub fn new(
        combined_role_patterns: Vec<TitlePattern>,
        priority_role: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let priority_role = priority_role.into();
        if priority_role.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "priority_role",
            });
        }
        let combined = combined_role_patterns
            .iter()
            .map(TitlePattern::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            combined,
            priority_role,
        })
    }

    /// The role key that wins ambiguous dual candidacies.
    #[must_use]
    pub fn priority_role(&self) -> &str {
        &self.priority_role
    }

    /// True if the normalized title denotes a combined top-executive role.
    #[must_use]
    pub fn is_combined_role_title(&self, normalized_title: &str) -> bool {
        self.combined.iter().any(|p| p.matches(normalized_title))
    }
}

impl TryFrom<ConflictPolicyData> for ConflictPolicy {
    type Error = ValidationError;

    fn try_from(data: ConflictPolicyData) -> Result<Self, Self::Error> {
        Self::new(data.combined_role_patterns, data.priority_role)
    }
}

impl From<ConflictPolicy> for ConflictPolicyData {
    fn from(policy: ConflictPolicy) -> Self {
        Self {
            combined_role_patterns: policy
                .combined
                .into_iter()
                .map(|p| p.source().clone())
                .collect(),
            priority_role: policy.priority_role,
        }
    }
}

/// How a dual candidacy was (or was not) arbitrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConflictOutcome {
    /// Different individuals (or at least one role unfilled); nothing to do.
    NoConflict,

    /// Exactly one side held an exact canonical title for its own role.
    ExactTitleRetained {
        /// Role that kept the assignment.
        winner_role: String,
        /// Role that dropped it.
        loser_role: String,
    },

    /// The shared title denotes a combined top-executive role; both stand.
    CombinedRoleAllowed {
        /// The title that legitimized the dual assignment.
        title: String,
    },

    /// Neither rule applied; the fixed priority order decided.
    PriorityRetained {
        /// Role that kept the assignment.
        winner_role: String,
        /// Role that dropped it.
        loser_role: String,
    },
}

impl fmt::Display for ConflictOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConflict => write!(f, "no conflict"),
            Self::ExactTitleRetained { winner_role, .. } => {
                write!(f, "exact canonical title retained for {winner_role}")
            }
            Self::CombinedRoleAllowed { title } => {
                write!(f, "combined top-executive role '{title}' allowed")
            }
            Self::PriorityRetained { winner_role, .. } => {
                write!(f, "resolved by priority for {winner_role}")
            }
        }
    }
}

/// Arbitrates two resolutions for mutually exclusive roles.
///
/// Returns both resolutions (the loser withdrawn, trails annotated) plus
/// the outcome for audit.
#[must_use]
pub fn resolve_pair(
    a: RoleResolution,
    b: RoleResolution,
    policy: &ConflictPolicy,
) -> (RoleResolution, RoleResolution, ConflictOutcome) {
    let shared = match (a.selected.as_ref(), b.selected.as_ref()) {
        (Some(sel_a), Some(sel_b))
            if sel_a.candidate.normalized_name() == sel_b.candidate.normalized_name() =>
        {
            Some((
                sel_a.candidate.name.clone(),
                sel_a.candidate.title.clone(),
                sel_b.candidate.title.clone(),
                sel_a.exact_match,
                sel_b.exact_match,
            ))
        }
        _ => None,
    };
    let Some((name, title_a, title_b, a_exact, b_exact)) = shared else {
        return (a, b, ConflictOutcome::NoConflict);
    };

    // Rule 1: an exact canonical title outranks an inferred one.
    if a_exact != b_exact {
        let (winner_is_a, winner_title) = if a_exact {
            (true, &title_a)
        } else {
            (false, &title_b)
        };
        let (mut winner, loser) = if winner_is_a { (a, b) } else { (b, a) };
        let outcome = ConflictOutcome::ExactTitleRetained {
            winner_role: winner.role.clone(),
            loser_role: loser.role.clone(),
        };
        tracing::debug!(candidate = %name, winner = %winner.role, "dual candidacy: exact title retained");
        winner.justification.push(format!(
            "Dual candidacy for {name}: exact canonical title '{winner_title}' retained"
        ));
        let loser = loser.withdraw(format!(
            "Dual candidacy for {name} resolved in favor of {}: exact canonical title wins",
            winner.role
        ));
        return reorder(winner, loser, winner_is_a, outcome);
    }

    // Rule 2: a combined top-executive title legitimately spans both roles.
    let combined_title = [&title_a, &title_b]
        .into_iter()
        .find(|t| policy.is_combined_role_title(&normalize_title(t)));
    if let Some(title) = combined_title {
        let outcome = ConflictOutcome::CombinedRoleAllowed {
            title: title.clone(),
        };
        tracing::debug!(candidate = %name, title = %title, "dual candidacy: combined role allowed");
        let note = format!(
            "Combined top-executive role '{title}' legitimately spans both roles; dual assignment for {name} retained"
        );
        let mut a = a;
        let mut b = b;
        a.justification.push(note.clone());
        b.justification.push(note);
        return (a, b, outcome);
    }

    // Rule 3: fixed role priority. Falls back to the first role when the
    // policy names neither, so arbitration is always total.
    let a_wins = a.role == policy.priority_role() || b.role != policy.priority_role();
    let (mut winner, loser) = if a_wins { (a, b) } else { (b, a) };
    let outcome = ConflictOutcome::PriorityRetained {
        winner_role: winner.role.clone(),
        loser_role: loser.role.clone(),
    };
    tracing::debug!(candidate = %name, winner = %winner.role, "dual candidacy: resolved by priority");
    winner.justification.push(format!(
        "Ambiguous dual candidacy for {name} resolved by role priority; {} retained",
        winner.role
    ));
    let loser = loser.withdraw(format!(
        "Ambiguous dual candidacy for {name} resolved by role priority; dropped in favor of {}",
        winner.role
    ));
    reorder(winner, loser, a_wins, outcome)
}

fn reorder(
    winner: RoleResolution,
    loser: RoleResolution,
    winner_is_a: bool,
    outcome: ConflictOutcome,
) -> (RoleResolution, RoleResolution, ConflictOutcome) {
    if winner_is_a {
        (winner, loser, outcome)
    } else {
        (loser, winner, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Candidate, CandidateSource};
    use crate::resolution::{RoleResolution, ScoreBreakdown, SelectedExecutive};

    fn policy() -> ConflictPolicy {
        ConflictPolicy::new(
            vec![
                TitlePattern::phrase("chief executive officer"),
                TitlePattern::regex(r"\bceo\b"),
                TitlePattern::substring("founder"),
            ],
            "finance_leader",
        )
        .unwrap()
    }

    fn resolution(role: &str, name: &str, title: &str, exact: bool) -> RoleResolution {
        let candidate = Candidate::builder()
            .name(name)
            .title(title)
            .source(CandidateSource::search_api("serp"))
            .build()
            .unwrap();
        RoleResolution {
            role: role.to_string(),
            selected: Some(SelectedExecutive {
                candidate,
                tier_rank: 2,
                tier_label: "vp".to_string(),
                exact_match: exact,
            }),
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
        }
    }

    #[test]
    fn test_different_people_no_conflict() {
        let a = resolution("finance_leader", "Jordan Smith", "VP Finance", true);
        let b = resolution("revenue_leader", "Casey Wu", "VP Sales", true);
        let (a2, b2, outcome) = resolve_pair(a, b, &policy());
        assert_eq!(outcome, ConflictOutcome::NoConflict);
        assert!(a2.selected.is_some());
        assert!(b2.selected.is_some());
    }

    #[test]
    fn test_exact_title_wins() {
        let a = resolution("finance_leader", "Pat Lee", "VP Finance", true);
        let b = resolution("revenue_leader", "pat lee", "VP Finance", false);
        let (a2, b2, outcome) = resolve_pair(a, b, &policy());
        assert!(matches!(outcome, ConflictOutcome::ExactTitleRetained { .. }));
        assert!(a2.selected.is_some());
        assert!(b2.selected.is_none());
        assert_eq!(b2.confidence, 0);
    }

    #[test]
    fn test_exact_title_wins_when_second_argument() {
        let a = resolution("finance_leader", "Pat Lee", "VP Ops", false);
        let b = resolution("revenue_leader", "Pat Lee", "VP Sales", true);
        let (a2, b2, _) = resolve_pair(a, b, &policy());
        // Positional order is preserved: first result is still finance.
        assert_eq!(a2.role, "finance_leader");
        assert!(a2.selected.is_none());
        assert_eq!(b2.role, "revenue_leader");
        assert!(b2.selected.is_some());
    }

    #[test]
    fn test_combined_role_allows_both() {
        let a = resolution("finance_leader", "Sam Rivera", "CEO & Founder", false);
        let b = resolution("revenue_leader", "Sam Rivera", "CEO & Founder", false);
        let (a2, b2, outcome) = resolve_pair(a, b, &policy());
        assert!(matches!(outcome, ConflictOutcome::CombinedRoleAllowed { .. }));
        assert!(a2.selected.is_some());
        assert!(b2.selected.is_some());
    }

    #[test]
    fn test_priority_breaks_ambiguity() {
        let a = resolution("finance_leader", "Pat Lee", "VP Operations", false);
        let b = resolution("revenue_leader", "Pat Lee", "VP Operations", false);
        let (a2, b2, outcome) = resolve_pair(a, b, &policy());
        let ConflictOutcome::PriorityRetained { winner_role, .. } = &outcome else {
            panic!("expected priority outcome");
        };
        assert_eq!(winner_role, "finance_leader");
        assert!(a2.selected.is_some());
        assert!(b2.selected.is_none());
        assert!(b2
            .justification
            .iter()
            .any(|l| l.contains("resolved by role priority")));
    }

    #[test]
    fn test_both_exact_falls_through_to_priority() {
        let a = resolution("finance_leader", "Pat Lee", "VP Finance", true);
        let b = resolution("revenue_leader", "Pat Lee", "VP Sales", true);
        let (_, b2, outcome) = resolve_pair(a, b, &policy());
        assert!(matches!(outcome, ConflictOutcome::PriorityRetained { .. }));
        assert!(b2.selected.is_none());
    }

    #[test]
    fn test_policy_serde_round_trip() {
        let p = policy();
        let json = serde_json::to_string(&p).unwrap();
        let back: ConflictPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.priority_role(), "finance_leader");
        assert!(back.is_combined_role_title("chief executive officer"));
    }
}
