//! Identity validation—does this contact actually belong to this company?
//!
//! Upstream sources frequently attach a real person's real contact details
//! to the wrong company, so the domain check here is the single most
//! important anti-corruption gate in the engine. Checks run in a fixed
//! order and the first failure short-circuits, clearing the offending field
//! instead of passing it through unexamined.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::company::{normalize_domain, CompanyIdentity};
use crate::error::ValidationError;

/// Bonus for a well-formed verified email.
pub const EMAIL_BONUS: u8 = 3;

/// Bonus for a synthesized (lower-trust) email.
pub const SYNTHESIZED_EMAIL_BONUS: u8 = 1;

/// Bonus for a well-formed phone number.
pub const PHONE_BONUS: u8 = 2;

/// Bonus for a well-formed profile URL.
pub const PROFILE_URL_BONUS: u8 = 2;

/// Ceiling on the combined field bonus.
pub const FIELD_BONUS_CAP: u8 = 6;

/// Shared-mailbox local parts that carry no individual-identity signal.
const GENERIC_LOCAL_PARTS: &[&str] = &[
    "info", "support", "contact", "admin", "pr", "hello", "sales", "office",
    "team", "hr", "careers", "press", "media", "marketing", "help",
    "enquiries", "inquiries", "noreply", "no-reply", "webmaster",
];

const MASKING_CHARS: &[char] = &['*', '#', '\u{2022}', 'x', 'X', '_', '?', '-'];

/// A contact field on a candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Email,
    Phone,
    ProfileUrl,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Phone => write!(f, "phone"),
            Self::ProfileUrl => write!(f, "profile URL"),
        }
    }
}

/// A problem found while validating a candidate's contact identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdentityIssue {
    /// Shared-mailbox address (info@, support@, ...).
    GenericMailbox {
        /// The offending local part.
        local_part: String,
    },

    /// Contact domain does not equal the company's canonical domain;
    /// likely cross-company contamination.
    DomainMismatch {
        /// The company's canonical domain.
        expected: String,
        /// The domain found on the contact.
        actual: String,
    },

    /// A maintained mislabel rule matched; this exact error has been
    /// observed before.
    KnownMislabel {
        /// Name of the rule that fired.
        rule: String,
    },

    /// The value is masked placeholder data, not a real contact.
    RedactedValue {
        /// Which field was redacted.
        field: ContactField,
    },
}

impl fmt::Display for IdentityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenericMailbox { local_part } => {
                write!(f, "generic shared mailbox '{local_part}@'; no individual-identity signal")
            }
            Self::DomainMismatch { expected, actual } => write!(
                f,
                "contact domain '{actual}' does not match company domain '{expected}'; possible cross-company contamination"
            ),
            Self::KnownMislabel { rule } => {
                write!(f, "matches known mislabel pattern '{rule}'")
            }
            Self::RedactedValue { field } => {
                write!(f, "{field} value is redacted/masked placeholder data")
            }
        }
    }
}

/// One previously observed recurring mislabel: a (name, wrong-domain,
/// wrong-company) triple of regexes. All patterns present on the rule must
/// match for it to fire; at least one must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MislabelRule {
    /// Rule name, used in issue text.
    pub name: String,

    /// Regex over the candidate name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,

    /// Regex over the contact email domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_domain_pattern: Option<String>,

    /// Regex over the target company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_company_pattern: Option<String>,

    /// When the recurring error was last observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl MislabelRule {
    /// Creates a rule with no patterns; add at least one before compiling.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_pattern: None,
            wrong_domain_pattern: None,
            wrong_company_pattern: None,
            observed_at: None,
        }
    }

    /// Sets the candidate-name regex.
    #[must_use]
    pub fn name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// Sets the wrong-domain regex.
    #[must_use]
    pub fn wrong_domain_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.wrong_domain_pattern = Some(pattern.into());
        self
    }

    /// Sets the wrong-company regex.
    #[must_use]
    pub fn wrong_company_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.wrong_company_pattern = Some(pattern.into());
        self
    }

    /// Stamps the rule with an observation time.
    #[must_use]
    pub const fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }

    /// Compiles the rule's regexes.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidMislabelRule` when no pattern is
    /// present or a regex does not compile.
    pub fn compile(&self) -> Result<CompiledMislabelRule, ValidationError> {
        if self.name_pattern.is_none()
            && self.wrong_domain_pattern.is_none()
            && self.wrong_company_pattern.is_none()
        {
            return Err(ValidationError::InvalidMislabelRule {
                rule: self.name.clone(),
                reason: "rule has no patterns".to_string(),
            });
        }
        let compile = |p: &Option<String>| -> Result<Option<Regex>, ValidationError> {
            p.as_deref()
                .map(|pattern| {
                    regex::RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| ValidationError::InvalidMislabelRule {
                            rule: self.name.clone(),
                            reason: e.to_string(),
                        })
                })
                .transpose()
        };
        Ok(CompiledMislabelRule {
            rule: self.clone(),
            name_re: compile(&self.name_pattern)?,
            domain_re: compile(&self.wrong_domain_pattern)?,
            company_re: compile(&self.wrong_company_pattern)?,
        })
    }
}

/// A [`MislabelRule`] with its regexes built.
#[derive(Debug, Clone)]
pub struct CompiledMislabelRule {
    rule: MislabelRule,
    name_re: Option<Regex>,
    domain_re: Option<Regex>,
    company_re: Option<Regex>,
}

impl CompiledMislabelRule {
    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.rule.name
    }

    /// The rule this was compiled from.
    #[must_use]
    pub const fn rule(&self) -> &MislabelRule {
        &self.rule
    }

    fn fires(&self, candidate: &Candidate, company: &CompanyIdentity) -> bool {
        if let Some(re) = &self.name_re {
            if !re.is_match(&candidate.name) {
                return false;
            }
        }
        if let Some(re) = &self.domain_re {
            match candidate.email.as_deref().and_then(email_domain) {
                Some(domain) if re.is_match(&domain) => {}
                _ => return false,
            }
        }
        if let Some(re) = &self.company_re {
            if !re.is_match(&company.company_name) {
                return false;
            }
        }
        true
    }
}

/// Outcome of validating one candidate against one company.
///
/// Surviving (possibly corrected) contact fields live here; the engine
/// copies them onto the selected candidate so a rejected field never leaks
/// into the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityReport {
    /// False if any check failed; the final confidence is zeroed then.
    pub is_valid: bool,

    /// Surviving email, possibly synthesized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Surviving phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Surviving profile URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,

    /// True if the email was synthesized from name + domain.
    pub synthesized_email: bool,

    /// Capped per-field bonus earned by passing all checks.
    pub bonus: u8,

    /// Everything found wrong, in check order.
    pub issues: Vec<IdentityIssue>,
}

impl IdentityReport {
    /// Short-circuit failure: the offending email is cleared; fields the
    /// checks never reached pass through unexamined and earn no bonus.
    fn failed(candidate: &Candidate, issue: IdentityIssue) -> Self {
        Self {
            is_valid: false,
            email: None,
            phone: candidate.phone.clone(),
            profile_url: candidate.profile_url.clone(),
            synthesized_email: false,
            bonus: 0,
            issues: vec![issue],
        }
    }
}

/// Validates a candidate's contact identity against the target company.
///
/// Check order: generic mailbox, domain match, known mislabel patterns,
/// redaction detection. The first three short-circuit on failure with the
/// offending field cleared; redaction is repaired (synthesized address)
/// rather than failed. Passing everything earns a capped per-field bonus.
#[must_use]
pub fn validate(
    candidate: &Candidate,
    company: &CompanyIdentity,
    rules: &[CompiledMislabelRule],
) -> IdentityReport {
    // (a) Generic shared mailboxes carry no identity signal.
    if let Some(email) = candidate.email.as_deref() {
        if let Some(local) = email.split('@').next() {
            let local = local.trim().to_lowercase();
            if GENERIC_LOCAL_PARTS.contains(&local.as_str()) {
                tracing::debug!(candidate = %candidate.name, email, "generic mailbox rejected");
                return IdentityReport::failed(
                    candidate,
                    IdentityIssue::GenericMailbox { local_part: local },
                );
            }
        }
    }

    // (b) The contact domain must equal the company's canonical domain.
    if let Some(email) = candidate.email.as_deref() {
        if !looks_redacted(email) {
            if let Some(domain) = email_domain(email) {
                if domain != company.canonical_domain {
                    tracing::debug!(
                        candidate = %candidate.name,
                        actual = %domain,
                        expected = %company.canonical_domain,
                        "contact domain mismatch"
                    );
                    return IdentityReport::failed(
                        candidate,
                        IdentityIssue::DomainMismatch {
                            expected: company.canonical_domain.clone(),
                            actual: domain,
                        },
                    );
                }
            }
        }
    }

    // (c) Known mislabel patterns force rejection even when (a)/(b) pass.
    if let Some(rule) = rules.iter().find(|r| r.fires(candidate, company)) {
        tracing::debug!(candidate = %candidate.name, rule = rule.name(), "known mislabel fired");
        return IdentityReport::failed(
            candidate,
            IdentityIssue::KnownMislabel {
                rule: rule.name().to_string(),
            },
        );
    }

    // (d) Redacted values are placeholders, not data. Email gets a
    // best-guess synthesis; other fields are just dropped.
    let mut issues = Vec::new();
    let mut synthesized_email = false;

    let email = match candidate.email.as_deref() {
        Some(value) if looks_redacted(value) => {
            issues.push(IdentityIssue::RedactedValue {
                field: ContactField::Email,
            });
            let guess = synthesize_email(&candidate.name, &company.canonical_domain);
            if let Some(g) = &guess {
                tracing::debug!(candidate = %candidate.name, synthesized = %g, "redacted email synthesized");
                synthesized_email = true;
            }
            guess
        }
        other => other.map(str::to_string),
    };
    let phone = match candidate.phone.as_deref() {
        Some(value) if looks_redacted(value) => {
            issues.push(IdentityIssue::RedactedValue {
                field: ContactField::Phone,
            });
            None
        }
        other => other.map(str::to_string),
    };
    let profile_url = match candidate.profile_url.as_deref() {
        Some(value) if looks_redacted(value) => {
            issues.push(IdentityIssue::RedactedValue {
                field: ContactField::ProfileUrl,
            });
            None
        }
        other => other.map(str::to_string),
    };

    let mut bonus = 0u8;
    if let Some(e) = email.as_deref() {
        if is_well_formed_email(e) {
            bonus += if synthesized_email {
                SYNTHESIZED_EMAIL_BONUS
            } else {
                EMAIL_BONUS
            };
        }
    }
    if phone.as_deref().is_some_and(is_well_formed_phone) {
        bonus += PHONE_BONUS;
    }
    if profile_url.as_deref().is_some_and(is_well_formed_url) {
        bonus += PROFILE_URL_BONUS;
    }
    bonus = bonus.min(FIELD_BONUS_CAP);

    IdentityReport {
        is_valid: true,
        email,
        phone,
        profile_url,
        synthesized_email,
        bonus,
        issues,
    }
}

/// Extracts and normalizes the domain of an email address.
fn email_domain(email: &str) -> Option<String> {
    let (_, domain) = email.rsplit_once('@')?;
    let normalized = normalize_domain(domain);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// True if the value looks like masked placeholder data: a run of three or
/// more identical masking symbols, or masking symbols making up 40% of it.
#[must_use]
pub fn looks_redacted(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }

    let mut run_char = ' ';
    let mut run_len = 0usize;
    for c in trimmed.chars() {
        if c == run_char {
            run_len += 1;
        } else {
            run_char = c;
            run_len = 1;
        }
        if run_len >= 3 && MASKING_CHARS.contains(&c) {
            return true;
        }
    }

    let masked = trimmed
        .chars()
        .filter(|c| MASKING_CHARS.contains(c) && *c != '-' && *c != 'x' && *c != 'X')
        .count();
    masked * 100 >= trimmed.chars().count() * 40
}

/// Builds a first.last@domain guess from a candidate name. Returns `None`
/// when the name does not yield at least one usable token.
#[must_use]
pub fn synthesize_email(name: &str, domain: &str) -> Option<String> {
    let tokens: Vec<String> = name
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect();

    let local = match tokens.as_slice() {
        [] => return None,
        [single] => single.clone(),
        [first, .., last] => format!("{first}.{last}"),
    };
    Some(format!("{local}@{domain}"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._%+'-]*@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email regex is valid")
    })
}

/// True for a plausibly deliverable address shape.
#[must_use]
pub fn is_well_formed_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

/// True if the value has at least seven digits.
#[must_use]
pub fn is_well_formed_phone(phone: &str) -> bool {
    phone.chars().filter(char::is_ascii_digit).count() >= 7
}

/// True for an absolute http(s) URL with a dotted host.
#[must_use]
pub fn is_well_formed_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    rest.is_some_and(|r| {
        let host = r.split('/').next().unwrap_or_default();
        host.contains('.') && !host.is_empty()
    })
}
