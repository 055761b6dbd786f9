//! Lookup modes and the local checks each one must pass before any request.

use url::Url;

use super::error::EnrichmentError;

/// LinkedIn product URLs with a different data contract than public profiles.
const REJECTED_PRODUCTS: [&str; 3] = ["sales-navigator", "talent", "recruiter"];

const ALLOWED_HOSTS: [&str; 2] = ["linkedin.com", "www.linkedin.com"];

/// A single enrichment lookup: exactly one of profile URL or email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentQuery {
    ByUrl(String),
    ByEmail(String),
}

impl EnrichmentQuery {
    /// Query-string parameter name and value for the enrich endpoint.
    pub fn param(&self) -> (&'static str, &str) {
        match self {
            Self::ByUrl(url) => ("profile", url),
            Self::ByEmail(email) => ("email", email),
        }
    }

    /// Short label used in log fields.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::ByUrl(_) => "url",
            Self::ByEmail(_) => "email",
        }
    }

    pub fn validate(&self) -> Result<(), EnrichmentError> {
        match self {
            Self::ByUrl(url) if !is_profile_url(url) => Err(EnrichmentError::invalid_url()),
            Self::ByEmail(email) if !is_plausible_email(email) => {
                Err(EnrichmentError::invalid_email())
            }
            _ => Ok(()),
        }
    }
}

/// Regular public profile URL on linkedin.com with an `/in/` path.
pub fn is_profile_url(candidate: &str) -> bool {
    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };

    // Authority is compared as written: no case folding, no default-port stripping.
    let host_ok = raw_authority(candidate)
        .is_some_and(|authority| ALLOWED_HOSTS.contains(&authority));

    let lowered = candidate.to_lowercase();
    host_ok
        && parsed.path().contains("/in/")
        && !REJECTED_PRODUCTS.iter().any(|product| lowered.contains(product))
}

/// Authority component exactly as it appears in `candidate`.
fn raw_authority(candidate: &str) -> Option<&str> {
    let (_, rest) = candidate.split_once("://")?;
    rest.split(['/', '?', '#']).next()
}

/// Deliberately loose: the provider accepts anything with `@` and `.`.
pub fn is_plausible_email(candidate: &str) -> bool {
    candidate.contains('@') && candidate.contains('.')
}
