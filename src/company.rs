//! Company identity—the ground truth a candidate is validated against.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Rough company size bucket.
///
/// Only `Small` changes engine behavior: the terminal CEO/President/Founder
/// fallback tier is reserved for small companies, where the top executive
/// plausibly owns a functional role too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

/// The target company a role is being resolved for.
///
/// The canonical domain is normalized at construction so every downstream
/// comparison is a plain equality check.
///
/// # Examples
///
/// ```
/// use execsift::CompanyIdentity;
///
/// let company = CompanyIdentity::new("Acme", "https://www.acme.com/about").unwrap();
/// assert_eq!(company.canonical_domain, "acme.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    pub company_name: String,

    /// Normalized registrable domain: lowercased, scheme/`www.`/port/path
    /// stripped.
    pub canonical_domain: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_class: Option<SizeClass>,
}

impl CompanyIdentity {
    /// Creates a company identity, normalizing the domain.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` for an empty name and
    /// `ValidationError::EmptyDomain` if nothing remains after
    /// normalization.
    pub fn new(
        company_name: impl Into<String>,
        domain: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let company_name = company_name.into();
        if company_name.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "company_name",
            });
        }
        let canonical_domain = normalize_domain(domain.as_ref());
        if canonical_domain.is_empty() {
            return Err(ValidationError::EmptyDomain);
        }
        Ok(Self {
            company_name,
            canonical_domain,
            size_class: None,
        })
    }

    /// Sets the size class.
    #[must_use]
    pub const fn with_size_class(mut self, size_class: SizeClass) -> Self {
        self.size_class = Some(size_class);
        self
    }

    /// Returns true if the company is flagged small.
    #[must_use]
    pub fn is_small(&self) -> bool {
        matches!(self.size_class, Some(SizeClass::Small))
    }
}

/// Normalizes a domain or URL-ish string down to its bare host.
#[must_use]
pub fn normalize_domain(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = s.strip_prefix(scheme) {
            s = rest.to_string();
            break;
        }
    }
    if let Some(rest) = s.strip_prefix("www.") {
        s = rest.to_string();
    }
    if let Some(idx) = s.find(['/', '?', '#']) {
        s.truncate(idx);
    }
    if let Some(idx) = s.find(':') {
        s.truncate(idx);
    }
    s.trim_matches('.').to_string()
}
