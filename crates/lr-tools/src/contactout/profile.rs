//! Normalized profile shape and the mapping from the provider's response body.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::EnrichmentError;
use super::query::EnrichmentQuery;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BasicInfo {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub work_emails: Vec<String>,
    pub personal_emails: Vec<String>,
    pub phones: Vec<String>,
    pub github: Vec<String>,
    pub twitter: Vec<String>,
}

/// Enriched LinkedIn profile.
///
/// Company, experience and the other nested collections are passed through
/// from the provider without validating their shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkedInProfile {
    pub basic_info: BasicInfo,
    pub contact_info: ContactInfo,
    /// Always present; an object unless the provider sent something else.
    pub company: Value,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub skills: Vec<Value>,
    pub languages: Vec<Value>,
    pub certifications: Vec<Value>,
    pub publications: Vec<Value>,
    pub projects: Vec<Value>,
    /// Canonical profile URL as reported upstream; may differ from the input.
    pub linkedin_url: Option<String>,
    /// Set only for email lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_email: Option<String>,
}

impl LinkedInProfile {
    /// Success mapping returned to the agent.
    pub fn to_tool_value(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()));
        if let Value::Object(map) = &mut value {
            map.insert("success".to_string(), Value::Bool(true));
        }
        value
    }
}

/// `profile` object as the provider sends it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpstreamProfile {
    full_name: Option<String>,
    headline: Option<String>,
    industry: Option<String>,
    location: Option<String>,
    country: Option<String>,
    summary: Option<String>,
    #[serde(deserialize_with = "string_list")]
    email: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    work_email: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    personal_email: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    phone: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    github: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    twitter: Vec<String>,
    company: Value,
    #[serde(deserialize_with = "null_as_default")]
    experience: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    education: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    skills: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    languages: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    certifications: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    publications: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    projects: Vec<Value>,
    url: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// String list that skips `null` and other non-string entries.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Value> = null_as_default(deserializer)?;
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

impl From<UpstreamProfile> for LinkedInProfile {
    fn from(p: UpstreamProfile) -> Self {
        Self {
            basic_info: BasicInfo {
                full_name: p.full_name,
                headline: p.headline,
                industry: p.industry,
                location: p.location,
                country: p.country,
                summary: p.summary,
            },
            contact_info: ContactInfo {
                emails: p.email,
                work_emails: p.work_email,
                personal_emails: p.personal_email,
                phones: p.phone,
                github: p.github,
                twitter: p.twitter,
            },
            company: match p.company {
                Value::Null => Value::Object(Map::new()),
                company => company,
            },
            experience: p.experience,
            education: p.education,
            skills: p.skills,
            languages: p.languages,
            certifications: p.certifications,
            publications: p.publications,
            projects: p.projects,
            linkedin_url: p.url,
            search_email: None,
        }
    }
}

/// Map a 2xx response body onto a profile or a classified failure.
///
/// The provider echoes its own `status_code` inside the body; only `200`
/// together with a `profile` key counts as found.
pub fn normalize(query: &EnrichmentQuery, body: Value) -> Result<LinkedInProfile, EnrichmentError> {
    let status = body.get("status_code");
    let found = status.and_then(Value::as_f64) == Some(200.0);
    let profile = match (found, body.get("profile")) {
        (true, Some(profile)) => profile.clone(),
        _ => {
            let status_code = status
                .filter(|s| !s.is_null())
                .cloned()
                .unwrap_or_else(|| Value::from("unknown"));
            return Err(match query {
                EnrichmentQuery::ByEmail(email) => EnrichmentError::NotFound {
                    email: email.clone(),
                    status_code,
                    details: body,
                },
                EnrichmentQuery::ByUrl(_) => EnrichmentError::UpstreamStatus {
                    code: status_label(&status_code),
                    details: body,
                },
            });
        }
    };

    let upstream: UpstreamProfile = serde_json::from_value(profile)
        .map_err(|e| EnrichmentError::unexpected(format!("malformed profile in response: {}", e)))?;

    let mut normalized = LinkedInProfile::from(upstream);
    if let EnrichmentQuery::ByEmail(email) = query {
        normalized.search_email = Some(email.clone());
    }
    Ok(normalized)
}

fn status_label(status: &Value) -> String {
    match status {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => "unknown".to_string(),
    }
}
