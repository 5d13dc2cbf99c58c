//! Candidate types—the raw material the engine decides over.
//!
//! A Candidate is one person/title/contact tuple reported by an upstream
//! source. Sources are unreliable and mutually inconsistent, so a candidate
//! carries provenance and an optional source-supplied confidence; nothing in
//! it is trusted until the classifier and validator have had their say.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Unique identifier for a candidate.
///
/// Derived deterministically (UUIDv5) from the source id, the normalized
/// name, and the normalized title, so the same upstream record always maps
/// to the same id and resolution output stays reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(Uuid);

impl CandidateId {
    /// Derives the id for a (source, name, title) triple.
    #[must_use]
    pub fn from_parts(source_id: &str, name: &str, title: &str) -> Self {
        let ns = Uuid::new_v5(&Uuid::NAMESPACE_DNS, b"execsift.dev");
        let material = format!(
            "{source_id}|{}|{}",
            fold(name),
            fold(title)
        );
        Self(Uuid::new_v5(&ns, material.as_bytes()))
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercases and collapses internal whitespace.
pub(crate) fn fold(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Where a candidate record came from.
///
/// Provenance drives nothing in scoring by itself, but it keeps the
/// justification trail auditable and lets operators discount a source
/// wholesale once it is caught contaminating records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CandidateSource {
    /// Scraped from a company leadership/about page.
    LeadershipPage {
        #[serde(skip_serializing_if = "Option::is_none")]
        page_url: Option<String>,
    },

    /// Returned by a third-party search or AI-answering API.
    SearchApi {
        provider: String,
    },

    /// Returned by a contact-enrichment API.
    EnrichmentApi {
        provider: String,
    },

    /// Anything else, identified by a caller-supplied id.
    Custom {
        id: String,
    },
}

impl CandidateSource {
    /// Creates a leadership-page source.
    #[must_use]
    pub fn leadership_page(page_url: impl Into<String>) -> Self {
        Self::LeadershipPage {
            page_url: Some(page_url.into()),
        }
    }

    /// Creates a search-API source.
    #[must_use]
    pub fn search_api(provider: impl Into<String>) -> Self {
        Self::SearchApi {
            provider: provider.into(),
        }
    }

    /// Creates an enrichment-API source.
    #[must_use]
    pub fn enrichment_api(provider: impl Into<String>) -> Self {
        Self::EnrichmentApi {
            provider: provider.into(),
        }
    }

    /// Creates a custom source.
    #[must_use]
    pub fn custom(id: impl Into<String>) -> Self {
        Self::Custom { id: id.into() }
    }

    /// Stable string id for the boundary contract (`sourceId`).
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::LeadershipPage { .. } => "leadership_page".to_string(),
            Self::SearchApi { provider } => format!("search:{provider}"),
            Self::EnrichmentApi { provider } => format!("enrichment:{provider}"),
            Self::Custom { id } => id.clone(),
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One person/title/contact tuple reported by an upstream source.
///
/// # Examples
///
/// ```
/// use execsift::{Candidate, CandidateSource};
///
/// let candidate = Candidate::builder()
///     .name("Jordan Smith")
///     .title("Chief Financial Officer")
///     .source(CandidateSource::search_api("serp"))
///     .email("j.smith@acme.com")
///     .build()
///     .unwrap();
///
/// assert_eq!(candidate.title, "Chief Financial Officer");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,

    /// Raw title string exactly as the source reported it.
    pub title: String,

    pub source: CandidateSource,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,

    /// Source-supplied confidence in [0.0, 1.0], when the source provides
    /// one. Treated as a weak signal, never as ground truth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_confidence: Option<f32>,
}

impl Candidate {
    /// Starts building a candidate.
    #[must_use]
    pub fn builder() -> CandidateBuilder {
        CandidateBuilder::default()
    }

    /// Name lowercased with whitespace collapsed, for identity comparison.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        fold(&self.name)
    }
}

/// Builder for [`Candidate`] with validation on `build()`.
#[derive(Debug, Default)]
pub struct CandidateBuilder {
    name: Option<String>,
    title: Option<String>,
    source: Option<CandidateSource>,
    email: Option<String>,
    phone: Option<String>,
    profile_url: Option<String>,
    source_confidence: Option<f32>,
}

impl CandidateBuilder {
    /// Sets the candidate name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the raw title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the source.
    #[must_use]
    pub fn source(mut self, source: CandidateSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the profile URL.
    #[must_use]
    pub fn profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = Some(url.into());
        self
    }

    /// Sets the source-supplied confidence.
    #[must_use]
    pub fn source_confidence(mut self, value: f32) -> Self {
        self.source_confidence = Some(value);
        self
    }

    /// Builds the candidate.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if name, title, or source is
    /// absent or empty, and `ValidationError::ConfidenceOutOfRange` if the
    /// source confidence falls outside [0.0, 1.0].
    pub fn build(self) -> Result<Candidate, ValidationError> {
        let name = match self.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => return Err(ValidationError::MissingField { field: "name" }),
        };
        let title = match self.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(ValidationError::MissingField { field: "title" }),
        };
        let source = self
            .source
            .ok_or(ValidationError::MissingField { field: "source" })?;

        if let Some(value) = self.source_confidence {
            if value.is_nan() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::ConfidenceOutOfRange { value });
            }
        }

        let id = CandidateId::from_parts(&source.id(), &name, &title);
        Ok(Candidate {
            id,
            name,
            title,
            source,
            email: self.email,
            phone: self.phone,
            profile_url: self.profile_url,
            source_confidence: self.source_confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> CandidateBuilder {
        Candidate::builder()
            .name("Jordan Smith")
            .title("CFO")
            .source(CandidateSource::search_api("serp"))
    }

    #[test]
    fn test_builder_minimal() {
        let c = minimal().build().unwrap();
        assert_eq!(c.name, "Jordan Smith");
        assert!(c.email.is_none());
    }

    #[test]
    fn test_builder_missing_name() {
        let err = Candidate::builder()
            .title("CFO")
            .source(CandidateSource::custom("x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { field: "name" }));
    }

    #[test]
    fn test_builder_blank_title() {
        let err = Candidate::builder()
            .name("Jordan Smith")
            .title("   ")
            .source(CandidateSource::custom("x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { field: "title" }));
    }

    #[test]
    fn test_builder_confidence_range() {
        assert!(minimal().source_confidence(0.7).build().is_ok());
        assert!(minimal().source_confidence(1.2).build().is_err());
        assert!(minimal().source_confidence(f32::NAN).build().is_err());
    }

    #[test]
    fn test_candidate_id_deterministic() {
        let a = minimal().build().unwrap();
        let b = minimal().build().unwrap();
        assert_eq!(a.id, b.id);

        let c = minimal().title("Chief Financial Officer").build().unwrap();
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_candidate_id_insensitive_to_case_and_spacing() {
        let a = CandidateId::from_parts("s", "Jordan  Smith", "CFO");
        let b = CandidateId::from_parts("s", "jordan smith", "cfo");
        assert_eq!(a, b);
    }

    #[test]
    fn test_source_ids() {
        assert_eq!(CandidateSource::leadership_page("https://acme.com/team").id(), "leadership_page");
        assert_eq!(CandidateSource::search_api("serp").id(), "search:serp");
        assert_eq!(CandidateSource::enrichment_api("clay").id(), "enrichment:clay");
        assert_eq!(CandidateSource::custom("manual").id(), "manual");
    }

    #[test]
    fn test_normalized_name() {
        let c = minimal().name("  Pat   LEE ").build().unwrap();
        assert_eq!(c.normalized_name(), "pat lee");
    }

    #[test]
    fn test_candidate_serialization() {
        let c = minimal().email("j.smith@acme.com").build().unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("j.smith@acme.com"));
        assert!(!json.contains("phone"));

        let back: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
