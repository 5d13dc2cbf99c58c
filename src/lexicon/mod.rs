//! Role lexicons—tiered title patterns as configuration data.
//!
//! A lexicon is data, not code: ordered tiers of patterns with base scores,
//! plus one exclusion set shared across all tiers. Lexicons are validated
//! and their regexes compiled once at construction, then treated as
//! immutable; per-tenant overrides are just different lexicon values.

pub mod defaults;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single title-matching rule.
///
/// Patterns always run against a normalized title (lowercased, whitespace
/// collapsed, surrounding punctuation stripped).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TitlePattern {
    /// Matches anywhere in the title.
    Substring {
        /// Text to look for.
        pattern: String,
    },

    /// A canonical phrase. Matches as a substring for tier eligibility;
    /// exact equality with the whole title additionally counts as a
    /// canonical-title match.
    Phrase {
        /// The canonical phrase.
        pattern: String,
    },

    /// A regular expression, for patterns substring matching cannot express
    /// safely (short acronyms needing word boundaries, alternations).
    Regex {
        /// Regex source.
        pattern: String,
    },
}

impl TitlePattern {
    /// Creates a substring pattern.
    #[must_use]
    pub fn substring(pattern: impl Into<String>) -> Self {
        Self::Substring {
            pattern: pattern.into(),
        }
    }

    /// Creates a canonical-phrase pattern.
    #[must_use]
    pub fn phrase(pattern: impl Into<String>) -> Self {
        Self::Phrase {
            pattern: pattern.into(),
        }
    }

    /// Creates a regex pattern.
    #[must_use]
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
        }
    }

    /// The raw pattern text.
    #[must_use]
    pub fn pattern_str(&self) -> &str {
        match self {
            Self::Substring { pattern } | Self::Phrase { pattern } | Self::Regex { pattern } => {
                pattern
            }
        }
    }

    /// Compiles the pattern, lowercasing literal text and building the
    /// regex for `Regex` rules.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPattern` for an empty pattern or an
    /// uncompilable regex.
    pub fn compile(&self) -> Result<CompiledPattern, ValidationError> {
        if self.pattern_str().trim().is_empty() {
            return Err(ValidationError::InvalidPattern {
                pattern: String::new(),
                reason: "pattern is empty".to_string(),
            });
        }
        let matcher = match self {
            Self::Substring { pattern } => Matcher::Substring(pattern.to_lowercase()),
            Self::Phrase { pattern } => Matcher::Phrase(pattern.to_lowercase()),
            Self::Regex { pattern } => {
                let re = regex::RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ValidationError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })?;
                Matcher::Regex(re)
            }
        };
        Ok(CompiledPattern {
            source: self.clone(),
            matcher,
        })
    }
}

impl fmt::Display for TitlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern_str())
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Substring(String),
    Phrase(String),
    Regex(regex::Regex),
}

/// A [`TitlePattern`] with its matcher built.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: TitlePattern,
    matcher: Matcher,
}

impl CompiledPattern {
    /// The pattern this was compiled from.
    #[must_use]
    pub const fn source(&self) -> &TitlePattern {
        &self.source
    }

    /// The raw pattern text, for justification lines.
    #[must_use]
    pub fn pattern_str(&self) -> &str {
        self.source.pattern_str()
    }

    /// Tests the pattern against a normalized title.
    #[must_use]
    pub fn matches(&self, normalized_title: &str) -> bool {
        match &self.matcher {
            Matcher::Substring(s) | Matcher::Phrase(s) => normalized_title.contains(s),
            Matcher::Regex(re) => re.is_match(normalized_title),
        }
    }

    /// True if this is a canonical phrase equal to the whole title.
    #[must_use]
    pub fn is_canonical_for(&self, normalized_title: &str) -> bool {
        match &self.matcher {
            Matcher::Phrase(s) => normalized_title == s,
            Matcher::Substring(_) | Matcher::Regex(_) => false,
        }
    }
}

/// Configuration for one tier of a role lexicon (pure data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Tier rank; 1 is the most senior/specific.
    pub rank: u8,

    /// Short label used in justification lines.
    pub label: String,

    /// Base score contributed when a candidate lands in this tier.
    pub base_score: u8,

    /// Patterns admitting a title into this tier.
    pub patterns: Vec<TitlePattern>,

    /// Terminal fallback gate: only consulted for companies flagged small.
    #[serde(default)]
    pub small_company_only: bool,
}

impl TierSpec {
    /// Creates a tier spec.
    #[must_use]
    pub fn new(rank: u8, label: impl Into<String>, base_score: u8) -> Self {
        Self {
            rank,
            label: label.into(),
            base_score,
            patterns: Vec::new(),
            small_company_only: false,
        }
    }

    /// Adds a pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: TitlePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Marks the tier as small-company-only.
    #[must_use]
    pub const fn small_company_only(mut self) -> Self {
        self.small_company_only = true;
        self
    }
}

/// A compiled tier.
#[derive(Debug, Clone)]
pub struct Tier {
    spec: TierSpec,
    compiled: Vec<CompiledPattern>,
}

impl Tier {
    /// Tier rank (1 = most senior).
    #[must_use]
    pub const fn rank(&self) -> u8 {
        self.spec.rank
    }

    /// Tier label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.spec.label
    }

    /// Base score for the tier.
    #[must_use]
    pub const fn base_score(&self) -> u8 {
        self.spec.base_score
    }

    /// True if the tier only applies to small companies.
    #[must_use]
    pub const fn is_small_company_only(&self) -> bool {
        self.spec.small_company_only
    }

    /// Compiled patterns for the tier.
    #[must_use]
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.compiled
    }
}

/// Serialized representation of a role lexicon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleLexiconData {
    /// Stable role key, e.g. `finance_leader`.
    pub role: String,
    /// Human-readable role name.
    pub display_name: String,
    /// Ordered tiers.
    pub tiers: Vec<TierSpec>,
    /// Sibling-role exclusion patterns, shared across all tiers.
    pub exclusions: Vec<TitlePattern>,
}

/// An ordered, compiled set of title tiers for one role.
///
/// Invariants enforced at construction: at least one tier, ranks strictly
/// ascending, every tier has at least one pattern, all patterns compile,
/// and a small-company-only tier can only sit in terminal position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RoleLexiconData", into = "RoleLexiconData")]
pub struct RoleLexicon {
    role: String,
    display_name: String,
    tiers: Vec<Tier>,
    exclusions: Vec<CompiledPattern>,
}

impl RoleLexicon {
    /// Starts building a lexicon.
    #[must_use]
    pub fn builder(role: impl Into<String>, display_name: impl Into<String>) -> RoleLexiconBuilder {
        RoleLexiconBuilder {
            data: RoleLexiconData {
                role: role.into(),
                display_name: display_name.into(),
                tiers: Vec::new(),
                exclusions: Vec::new(),
            },
        }
    }

    /// Stable role key.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Human-readable role name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Tiers in ascending rank order.
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Compiled exclusion patterns.
    #[must_use]
    pub fn exclusions(&self) -> &[CompiledPattern] {
        &self.exclusions
    }

    /// True if the normalized title exactly equals one of the lexicon's
    /// canonical phrases.
    #[must_use]
    pub fn is_canonical_title(&self, normalized_title: &str) -> bool {
        self.tiers
            .iter()
            .flat_map(Tier::patterns)
            .any(|p| p.is_canonical_for(normalized_title))
    }

    /// Stable blake3 fingerprint of the lexicon's canonical JSON, recorded
    /// on every resolution so operators can tell which lexicon revision
    /// produced a decision.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let data = RoleLexiconData::from(self.clone());
        let bytes = serde_json::to_vec(&data).unwrap_or_default();
        blake3::hash(&bytes).to_hex().to_string()
    }
}

impl TryFrom<RoleLexiconData> for RoleLexicon {
    type Error = ValidationError;

    fn try_from(data: RoleLexiconData) -> Result<Self, Self::Error> {
        if data.role.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "role" });
        }
        if data.tiers.is_empty() {
            return Err(ValidationError::EmptyLexicon { role: data.role });
        }

        let mut previous: Option<u8> = None;
        let last_rank = data.tiers.last().map(|t| t.rank);
        let mut tiers = Vec::with_capacity(data.tiers.len());
        for spec in data.tiers {
            if let Some(prev) = previous {
                if spec.rank <= prev {
                    return Err(ValidationError::NonAscendingTiers {
                        role: data.role.clone(),
                        previous: prev,
                        rank: spec.rank,
                    });
                }
            }
            previous = Some(spec.rank);

            if spec.patterns.is_empty() {
                return Err(ValidationError::EmptyLexicon {
                    role: data.role.clone(),
                });
            }
            if spec.small_company_only && Some(spec.rank) != last_rank {
                return Err(ValidationError::InvalidPattern {
                    pattern: spec.label.clone(),
                    reason: "small-company fallback must be the terminal tier".to_string(),
                });
            }

            let compiled = spec
                .patterns
                .iter()
                .map(TitlePattern::compile)
                .collect::<Result<Vec<_>, _>>()?;
            tiers.push(Tier { spec, compiled });
        }

        let exclusions = data
            .exclusions
            .iter()
            .map(TitlePattern::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            role: data.role,
            display_name: data.display_name,
            tiers,
            exclusions,
        })
    }
}

impl From<RoleLexicon> for RoleLexiconData {
    fn from(lexicon: RoleLexicon) -> Self {
        Self {
            role: lexicon.role,
            display_name: lexicon.display_name,
            tiers: lexicon.tiers.into_iter().map(|t| t.spec).collect(),
            exclusions: lexicon
                .exclusions
                .into_iter()
                .map(|p| p.source)
                .collect(),
        }
    }
}

/// Builder for [`RoleLexicon`] with validation on `build()`.
#[derive(Debug)]
pub struct RoleLexiconBuilder {
    data: RoleLexiconData,
}

impl RoleLexiconBuilder {
    /// Appends a tier. Tiers must be added in ascending rank order.
    #[must_use]
    pub fn tier(mut self, tier: TierSpec) -> Self {
        self.data.tiers.push(tier);
        self
    }

    /// Adds an exclusion pattern.
    #[must_use]
    pub fn exclusion(mut self, pattern: TitlePattern) -> Self {
        self.data.exclusions.push(pattern);
        self
    }

    /// Validates and compiles the lexicon.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found in the configuration.
    pub fn build(self) -> Result<RoleLexicon, ValidationError> {
        RoleLexicon::try_from(self.data)
    }
}
