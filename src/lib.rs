//! # execsift - Executive Role Resolution & Validation Engine
//!
//! execsift decides which named executive, if any, fills a role (finance
//! leader, revenue leader) at a target company, given candidate records
//! pulled from several unreliable, mutually inconsistent sources. It is a
//! pure decision function: no fetching, no persistence, no wire surface.
//!
//! ## Core Concepts
//!
//! - **Candidate**: one person/title/contact tuple from an upstream source
//! - **RoleLexicon**: ordered tiers of title patterns plus a sibling-role
//!   exclusion set, all configuration data
//! - **Waterfall selection**: the lowest non-empty tier strictly pre-empts
//!   every higher-numbered tier, regardless of individual scores
//! - **Identity validation**: does this contact actually belong to this
//!   company? Domain matching is the main anti-corruption gate
//! - **RoleResolution**: selected executive (or none), tier, confidence
//!   0-100, and an ordered justification trail
//!
//! ## Usage
//!
//! ```rust
//! use execsift::{Candidate, CandidateSource, CompanyIdentity, ResolutionEngine};
//! use execsift::lexicon::defaults;
//!
//! let engine = ResolutionEngine::new();
//! let company = CompanyIdentity::new("Acme", "acme.com").unwrap();
//! let candidates = vec![Candidate::builder()
//!     .name("Jordan Smith")
//!     .title("Chief Financial Officer")
//!     .source(CandidateSource::leadership_page("https://acme.com/team"))
//!     .email("j.smith@acme.com")
//!     .build()
//!     .unwrap()];
//!
//! let resolution = engine
//!     .resolve_role(&defaults::finance_lexicon(), &candidates, &company)
//!     .unwrap();
//! assert!(resolution.confidence >= 90);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod candidate;
pub mod classifier;
pub mod company;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod identity;
pub mod lexicon;
pub mod resolution;
pub mod waterfall;

// Re-export primary types at crate root for convenience
pub use candidate::{Candidate, CandidateBuilder, CandidateId, CandidateSource};
pub use classifier::{AdjustmentKind, ScoreAdjustment, TitleClassification};
pub use company::{CompanyIdentity, SizeClass};
pub use conflict::{ConflictOutcome, ConflictPolicy};
pub use engine::{ResolutionEngine, NO_ELIGIBLE_CANDIDATES};
pub use error::{SiftError, SiftResult, ValidationError};
pub use identity::{ContactField, IdentityIssue, IdentityReport, MislabelRule};
pub use lexicon::{RoleLexicon, RoleLexiconBuilder, TierSpec, TitlePattern};
pub use resolution::{RoleResolution, ScoreBreakdown, SelectedExecutive};
pub use waterfall::{ClassifiedCandidate, RankedCandidate};
