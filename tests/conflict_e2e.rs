use execsift::lexicon::defaults;
use execsift::{Candidate, CandidateSource, CompanyIdentity, ResolutionEngine, SizeClass};

fn acme() -> CompanyIdentity {
    CompanyIdentity::new("Acme", "acme.com").unwrap()
}

fn candidate(name: &str, title: &str) -> Candidate {
    Candidate::builder()
        .name(name)
        .title(title)
        .source(CandidateSource::search_api("serp"))
        .build()
        .unwrap()
}

#[test]
fn dual_vp_finance_keeps_finance_drops_revenue() {
    // "Pat Lee" titled "VP Finance" surfaces for both roles: an exact
    // canonical finance title, but only a permissive-tier revenue match.
    let engine = ResolutionEngine::new();
    let (finance, revenue) = engine
        .resolve_exclusive(
            &defaults::finance_lexicon(),
            &defaults::revenue_lexicon(),
            &[candidate("Pat Lee", "VP Finance")],
            &[candidate("Pat Lee", "VP Finance")],
            &acme(),
        )
        .unwrap();

    assert_eq!(finance.selected.unwrap().candidate.name, "Pat Lee");
    assert!(revenue.selected.is_none());
    assert_eq!(revenue.confidence, 0);
    assert!(revenue
        .justification
        .iter()
        .any(|line| line.contains("Dual candidacy")));
}

#[test]
fn name_match_is_case_insensitive() {
    let engine = ResolutionEngine::new();
    let (_, revenue) = engine
        .resolve_exclusive(
            &defaults::finance_lexicon(),
            &defaults::revenue_lexicon(),
            &[candidate("PAT LEE", "VP Finance")],
            &[candidate("pat lee", "VP Finance")],
            &acme(),
        )
        .unwrap();
    assert!(revenue.selected.is_none());
}

#[test]
fn combined_ceo_keeps_both_roles() {
    let engine = ResolutionEngine::new();
    let small = acme().with_size_class(SizeClass::Small);
    let pool = [candidate("Sam Rivera", "CEO & Founder")];
    let (finance, revenue) = engine
        .resolve_exclusive(
            &defaults::finance_lexicon(),
            &defaults::revenue_lexicon(),
            &pool,
            &pool,
            &small,
        )
        .unwrap();

    assert_eq!(finance.selected.unwrap().candidate.name, "Sam Rivera");
    assert_eq!(revenue.selected.unwrap().candidate.name, "Sam Rivera");
    assert!(finance
        .justification
        .iter()
        .any(|line| line.contains("Combined top-executive role")));
}

#[test]
fn ambiguous_dual_candidacy_resolved_by_priority() {
    // Identical generic-VP titles on both sides: rule 1 and rule 2 both
    // pass, so the fixed priority order must decide for finance.
    let engine = ResolutionEngine::new();
    let (finance, revenue) = engine
        .resolve_exclusive(
            &defaults::finance_lexicon(),
            &defaults::revenue_lexicon(),
            &[candidate("Pat Lee", "VP of Customer Operations")],
            &[candidate("Pat Lee", "VP of Customer Operations")],
            &acme(),
        )
        .unwrap();

    assert!(finance.selected.is_some());
    assert!(revenue.selected.is_none());
    assert!(revenue
        .justification
        .iter()
        .any(|line| line.contains("resolved by role priority")));
}

#[test]
fn different_individuals_keep_both_assignments() {
    let engine = ResolutionEngine::new();
    let (finance, revenue) = engine
        .resolve_exclusive(
            &defaults::finance_lexicon(),
            &defaults::revenue_lexicon(),
            &[candidate("Jordan Smith", "Chief Financial Officer")],
            &[candidate("Casey Wu", "Chief Revenue Officer")],
            &acme(),
        )
        .unwrap();

    assert_eq!(finance.selected.unwrap().candidate.name, "Jordan Smith");
    assert_eq!(revenue.selected.unwrap().candidate.name, "Casey Wu");
}

#[test]
fn at_most_one_role_keeps_non_top_executive_duals() {
    // Property: if both roles resolve to the same individual whose title is
    // not a combined top-executive one, at most one role keeps it.
    let engine = ResolutionEngine::new();
    let titles = ["VP Finance", "VP of Customer Operations", "Vice President"];
    for title in titles {
        let (finance, revenue) = engine
            .resolve_exclusive(
                &defaults::finance_lexicon(),
                &defaults::revenue_lexicon(),
                &[candidate("Pat Lee", title)],
                &[candidate("Pat Lee", title)],
                &acme(),
            )
            .unwrap();
        let kept = usize::from(finance.selected.is_some()) + usize::from(revenue.selected.is_some());
        assert!(kept <= 1, "title '{title}' kept {kept} assignments");
    }
}

#[test]
fn unfilled_side_never_conflicts() {
    let engine = ResolutionEngine::new();
    let (finance, revenue) = engine
        .resolve_exclusive(
            &defaults::finance_lexicon(),
            &defaults::revenue_lexicon(),
            &[candidate("Jordan Smith", "VP Finance")],
            &[],
            &acme(),
        )
        .unwrap();
    assert!(finance.selected.is_some());
    assert!(revenue.selected.is_none());
    assert_eq!(
        revenue.justification,
        vec!["No eligible candidates found".to_string()]
    );
}
