//! Shipped role lexicons and arbitration policy.
//!
//! These are the production waterfalls the engine ships with, expressed as
//! plain configuration data. Tenants override them by building (or
//! deserializing) their own [`RoleLexicon`] values; nothing in the engine
//! is tied to these defaults.

use crate::conflict::ConflictPolicy;
use crate::lexicon::{RoleLexicon, TierSpec, TitlePattern};

/// Role key for the finance leader (CFO-family) waterfall.
pub const FINANCE_ROLE: &str = "finance_leader";

/// Role key for the revenue leader (CRO-family) waterfall.
pub const REVENUE_ROLE: &str = "revenue_leader";

/// Matches "president" as a standalone role word ("President & CEO",
/// "Founder and President") without swallowing "vice president".
const PRESIDENT_PATTERN: &str = r"(?:^|\b(?:and|co)\s+)president\b";

fn top_executive_tier(rank: u8) -> TierSpec {
    TierSpec::new(rank, "top executive fallback", 40)
        .pattern(TitlePattern::phrase("chief executive officer"))
        .pattern(TitlePattern::regex(r"\bceo\b"))
        .pattern(TitlePattern::regex(PRESIDENT_PATTERN))
        .pattern(TitlePattern::substring("founder"))
        .small_company_only()
}

/// The finance-leader waterfall.
///
/// Exclusions veto the revenue/marketing chief family outright so a CRO
/// can never surface as a finance leader, even through the permissive VP
/// tier or the small-company fallback.
#[must_use]
pub fn finance_lexicon() -> RoleLexicon {
    RoleLexicon::builder(FINANCE_ROLE, "Finance Leader")
        .tier(
            TierSpec::new(1, "chief financial officer", 90)
                .pattern(TitlePattern::phrase("chief financial officer"))
                .pattern(TitlePattern::regex(r"\bcfo\b")),
        )
        .tier(
            TierSpec::new(2, "finance vice president", 75)
                .pattern(TitlePattern::phrase("vp finance"))
                .pattern(TitlePattern::phrase("vp of finance"))
                .pattern(TitlePattern::phrase("vice president of finance"))
                .pattern(TitlePattern::phrase("vice president finance"))
                .pattern(TitlePattern::phrase("head of finance")),
        )
        .tier(
            TierSpec::new(3, "finance director", 60)
                .pattern(TitlePattern::substring("finance director"))
                .pattern(TitlePattern::substring("director of finance"))
                .pattern(TitlePattern::phrase("controller"))
                .pattern(TitlePattern::phrase("treasurer")),
        )
        .tier(generic_vp_tier(4))
        .tier(top_executive_tier(9))
        .exclusion(TitlePattern::substring("chief revenue officer"))
        .exclusion(TitlePattern::regex(r"\bcro\b"))
        .exclusion(TitlePattern::substring("revenue"))
        .exclusion(TitlePattern::substring("sales"))
        .exclusion(TitlePattern::substring("chief marketing officer"))
        .exclusion(TitlePattern::regex(r"\bcmo\b"))
        .exclusion(TitlePattern::substring("marketing"))
        .build()
        .expect("default finance lexicon is valid")
}

/// The revenue-leader waterfall.
///
/// Exclusions target unambiguous finance-family markers only; a bare
/// "finance" is deliberately left out because small-company revenue
/// leaders often carry hybrid titles, and the conflict resolver arbitrates
/// those instead.
#[must_use]
pub fn revenue_lexicon() -> RoleLexicon {
    RoleLexicon::builder(REVENUE_ROLE, "Revenue Leader")
        .tier(
            TierSpec::new(1, "chief revenue officer", 90)
                .pattern(TitlePattern::phrase("chief revenue officer"))
                .pattern(TitlePattern::regex(r"\bcro\b"))
                .pattern(TitlePattern::phrase("chief sales officer")),
        )
        .tier(
            TierSpec::new(2, "revenue vice president", 75)
                .pattern(TitlePattern::phrase("vp sales"))
                .pattern(TitlePattern::phrase("vp of sales"))
                .pattern(TitlePattern::phrase("vice president of sales"))
                .pattern(TitlePattern::phrase("vp revenue"))
                .pattern(TitlePattern::phrase("vp of revenue"))
                .pattern(TitlePattern::phrase("head of sales"))
                .pattern(TitlePattern::phrase("head of revenue")),
        )
        .tier(
            TierSpec::new(3, "sales director", 60)
                .pattern(TitlePattern::substring("sales director"))
                .pattern(TitlePattern::substring("director of sales"))
                .pattern(TitlePattern::substring("director of revenue"))
                .pattern(TitlePattern::substring("head of business development")),
        )
        .tier(generic_vp_tier(4))
        .tier(top_executive_tier(9))
        .exclusion(TitlePattern::substring("chief financial officer"))
        .exclusion(TitlePattern::regex(r"\bcfo\b"))
        .exclusion(TitlePattern::substring("controller"))
        .exclusion(TitlePattern::substring("treasurer"))
        .exclusion(TitlePattern::substring("accounting"))
        .exclusion(TitlePattern::substring("bookkeep"))
        .build()
        .expect("default revenue lexicon is valid")
}

fn generic_vp_tier(rank: u8) -> TierSpec {
    TierSpec::new(rank, "generic vice president", 45)
        .pattern(TitlePattern::regex(r"\bvp\b"))
        .pattern(TitlePattern::substring("vice president"))
}

/// The shipped arbitration policy: combined CEO/President/Founder titles
/// may legitimately hold both roles; otherwise the finance leader wins an
/// ambiguous dual candidacy.
#[must_use]
pub fn default_conflict_policy() -> ConflictPolicy {
    ConflictPolicy::new(
        vec![
            TitlePattern::phrase("chief executive officer"),
            TitlePattern::regex(r"\bceo\b"),
            TitlePattern::regex(PRESIDENT_PATTERN),
            TitlePattern::substring("founder"),
        ],
        FINANCE_ROLE,
    )
    .expect("default conflict policy is valid")
}
