//! ContactOut LinkedIn enrichment.
//!
//! A thin client over `GET /linkedin/enrich` plus the two agent tools that
//! expose it. Every failure is classified into [`EnrichmentError`]; the tools
//! turn both outcomes into plain JSON mappings for the model.

mod error;
mod profile;
mod query;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use lr_core::{Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

pub use error::EnrichmentError;
pub use profile::{BasicInfo, ContactInfo, LinkedInProfile};
pub use query::{is_plausible_email, is_profile_url, EnrichmentQuery};

pub const DEFAULT_BASE_URL: &str = "https://api.contactout.com/v1";

/// Environment variable holding the API secret.
pub const API_TOKEN_ENV: &str = "CONTACTOUT_API_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Configuration
// =============================================================================

#[derive(Clone)]
pub struct ContactOutConfig {
    /// API secret. Empty is treated the same as unset.
    pub api_token: Option<String>,
    /// API root, e.g. "https://api.contactout.com/v1"
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for ContactOutConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ContactOutConfig {
    pub fn new(api_token: Option<String>) -> Self {
        Self {
            api_token,
            ..Self::default()
        }
    }

    /// Token from `CONTACTOUT_API_TOKEN`, defaults for everything else.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_TOKEN_ENV).ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    fn token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.is_empty())
    }

    fn enrich_endpoint(&self) -> String {
        format!("{}/linkedin/enrich", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for ContactOutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactOutConfig")
            .field("api_token", &self.token().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct ContactOutClient {
    client: Client,
    config: ContactOutConfig,
}

impl ContactOutClient {
    pub fn new(config: ContactOutConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("lr-cli/", env!("CARGO_PKG_VERSION")))
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    pub fn config(&self) -> &ContactOutConfig {
        &self.config
    }

    /// Enrich a regular LinkedIn profile URL.
    pub async fn enrich_by_url(&self, linkedin_url: &str) -> Result<LinkedInProfile, EnrichmentError> {
        self.enrich(&EnrichmentQuery::ByUrl(linkedin_url.to_string()))
            .await
    }

    /// Find and enrich the profile behind an email address.
    pub async fn enrich_by_email(&self, email: &str) -> Result<LinkedInProfile, EnrichmentError> {
        self.enrich(&EnrichmentQuery::ByEmail(email.to_string()))
            .await
    }

    /// Run one lookup. Failures are logged here, once, before being returned.
    pub async fn enrich(&self, query: &EnrichmentQuery) -> Result<LinkedInProfile, EnrichmentError> {
        let result = self.request(query).await;
        if let Err(err) = &result {
            tracing::warn!(
                kind = err.kind(),
                mode = query.mode(),
                error = %err,
                "ContactOut enrichment failed"
            );
        }
        result
    }

    async fn request(&self, query: &EnrichmentQuery) -> Result<LinkedInProfile, EnrichmentError> {
        let token = self.config.token().ok_or(EnrichmentError::MissingCredential)?;
        query.validate()?;

        let (param, value) = query.param();
        tracing::debug!(mode = query.mode(), "Calling ContactOut enrich endpoint");

        let response = self
            .client
            .get(self.config.enrich_endpoint())
            .query(&[(param, value)])
            .header("authorization", "basic")
            .header("token", token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| EnrichmentError::transport(e.to_string()))?;

        match response.status() {
            StatusCode::FORBIDDEN => return Err(EnrichmentError::OutOfCredits),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string();
                return Err(EnrichmentError::RateLimited { retry_after });
            }
            status if !status.is_success() => {
                return Err(EnrichmentError::Http {
                    status_code: status.as_u16(),
                })
            }
            _ => {}
        }

        let text = response
            .text()
            .await
            .map_err(|e| EnrichmentError::transport(format!("failed to read response: {}", e)))?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| EnrichmentError::unexpected(format!("invalid JSON in response: {}", e)))?;

        profile::normalize(query, body)
    }
}

fn render(result: Result<LinkedInProfile, EnrichmentError>) -> ToolOutput {
    match result {
        Ok(profile) => ToolOutput::json(&profile.to_tool_value(), false),
        Err(err) => ToolOutput::json(&err.to_tool_value(), true),
    }
}

// =============================================================================
// Enrich By URL Tool
// =============================================================================

pub struct EnrichProfileByUrlTool {
    client: Arc<ContactOutClient>,
}

impl EnrichProfileByUrlTool {
    pub fn new(client: Arc<ContactOutClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct ByUrlArgs {
    linkedin_url: String,
}

#[async_trait]
impl Tool for EnrichProfileByUrlTool {
    fn name(&self) -> &str {
        "enrich_linkedin_profile_by_url"
    }

    fn description(&self) -> &str {
        "Extract profile information, including contact details, from a regular LinkedIn profile URL (not Sales Navigator, Talent, or Recruiter URLs)."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property(
                "linkedin_url",
                PropertySchema::string("LinkedIn profile URL, e.g. https://www.linkedin.com/in/janedoe")
                    .with_format("uri"),
                true,
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
        let args: ByUrlArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool(self.name(), format!("Invalid arguments: {}", e)))?;

        Ok(render(self.client.enrich_by_url(&args.linkedin_url).await))
    }
}

// =============================================================================
// Enrich By Email Tool
// =============================================================================

pub struct EnrichProfileByEmailTool {
    client: Arc<ContactOutClient>,
}

impl EnrichProfileByEmailTool {
    pub fn new(client: Arc<ContactOutClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct ByEmailArgs {
    email: String,
}

#[async_trait]
impl Tool for EnrichProfileByEmailTool {
    fn name(&self) -> &str {
        "enrich_linkedin_profile_by_email"
    }

    fn description(&self) -> &str {
        "Find and extract LinkedIn profile information for an email address."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property(
                "email",
                PropertySchema::string("Email address to find a LinkedIn profile for").with_format("email"),
                true,
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
        let args: ByEmailArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool(self.name(), format!("Invalid arguments: {}", e)))?;

        Ok(render(self.client.enrich_by_email(&args.email).await))
    }
}

// =============================================================================
// Factory functions
// =============================================================================

/// Create both ContactOut tools sharing one HTTP client.
pub fn create_contactout_tools(config: ContactOutConfig) -> Vec<Arc<dyn Tool>> {
    let client = Arc::new(ContactOutClient::new(config));
    vec![
        Arc::new(EnrichProfileByUrlTool::new(Arc::clone(&client))),
        Arc::new(EnrichProfileByEmailTool::new(client)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_URL: &str = "https://www.linkedin.com/in/janedoe";
    const TOKEN: &str = "test-token";

    fn client_for(server: &MockServer) -> ContactOutClient {
        ContactOutClient::new(
            ContactOutConfig::new(Some(TOKEN.to_string())).with_base_url(server.uri()),
        )
    }

    /// Fails the test on drop if any request reaches the server.
    async fn expect_no_requests(server: &MockServer) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }

    async fn respond_with(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/linkedin/enrich"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn jane_body() -> Value {
        json!({"status_code": 200, "profile": {"full_name": "Jane Doe", "email": ["jane@x.com"]}})
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let config = ContactOutConfig::new(Some("super-secret".to_string()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(config.has_token());
        assert!(!ContactOutConfig::new(Some(String::new())).has_token());
    }

    #[test]
    fn test_from_env_uses_provider_defaults() {
        let client = ContactOutClient::new(ContactOutConfig::from_env());
        assert_eq!(client.config().base_url, DEFAULT_BASE_URL);
        assert_eq!(client.config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let config = ContactOutConfig::default().with_base_url("http://localhost:9000/v1/");
        assert_eq!(config.enrich_endpoint(), "http://localhost:9000/v1/linkedin/enrich");
        assert_eq!(
            ContactOutConfig::default().enrich_endpoint(),
            "https://api.contactout.com/v1/linkedin/enrich"
        );
    }

    #[tokio::test]
    async fn test_invalid_url_issues_no_request() {
        let server = MockServer::start().await;
        expect_no_requests(&server).await;
        let client = client_for(&server);

        for url in [
            "https://example.com/in/janedoe",
            "https://www.linkedin.com/company/acme",
            "https://www.linkedin.com/sales-navigator/in/janedoe",
            "https://www.linkedin.com/in/janedoe?ref=TALENT",
        ] {
            let err = client.enrich_by_url(url).await.unwrap_err();
            assert_eq!(err, EnrichmentError::invalid_url(), "url: {}", url);
        }
    }

    #[tokio::test]
    async fn test_invalid_email_issues_no_request() {
        let server = MockServer::start().await;
        expect_no_requests(&server).await;
        let client = client_for(&server);

        for email in ["jane.doe", "jane@localhost", ""] {
            let err = client.enrich_by_email(email).await.unwrap_err();
            assert_eq!(err, EnrichmentError::invalid_email(), "email: {}", email);
        }
    }

    #[tokio::test]
    async fn test_missing_token_issues_no_request() {
        let server = MockServer::start().await;
        expect_no_requests(&server).await;

        for token in [None, Some(String::new())] {
            let client = ContactOutClient::new(ContactOutConfig::new(token).with_base_url(server.uri()));
            assert_eq!(
                client.enrich_by_url(PROFILE_URL).await.unwrap_err(),
                EnrichmentError::MissingCredential
            );
            // Credential check wins over input validation.
            assert_eq!(
                client.enrich_by_url("not a url").await.unwrap_err(),
                EnrichmentError::MissingCredential
            );
            assert_eq!(
                client.enrich_by_email("nope").await.unwrap_err(),
                EnrichmentError::MissingCredential
            );
        }
    }

    #[tokio::test]
    async fn test_request_shape_by_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/linkedin/enrich"))
            .and(query_param("profile", PROFILE_URL))
            .and(header("authorization", "basic"))
            .and(header("token", TOKEN))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jane_body()))
            .expect(1)
            .mount(&server)
            .await;

        let profile = client_for(&server).enrich_by_url(PROFILE_URL).await.unwrap();
        assert_eq!(profile.basic_info.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(profile.contact_info.emails, vec!["jane@x.com"]);
        assert!(profile.contact_info.work_emails.is_empty());
        assert!(profile.contact_info.personal_emails.is_empty());
        assert!(profile.contact_info.phones.is_empty());
        assert!(profile.contact_info.github.is_empty());
        assert!(profile.contact_info.twitter.is_empty());
        assert!(profile.experience.is_empty());
        assert!(profile.education.is_empty());
        assert!(profile.skills.is_empty());
        assert!(profile.languages.is_empty());
        assert!(profile.certifications.is_empty());
        assert!(profile.publications.is_empty());
        assert!(profile.projects.is_empty());
        assert_eq!(profile.search_email, None);
    }

    #[tokio::test]
    async fn test_request_shape_by_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/linkedin/enrich"))
            .and(query_param("email", "jane@x.com"))
            .and(header("token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(jane_body()))
            .expect(1)
            .mount(&server)
            .await;

        let profile = client_for(&server).enrich_by_email("jane@x.com").await.unwrap();
        assert_eq!(profile.basic_info.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(profile.search_email.as_deref(), Some("jane@x.com"));
    }

    #[tokio::test]
    async fn test_forbidden_is_out_of_credits() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(403)).await;
        let client = client_for(&server);

        assert_eq!(
            client.enrich_by_url(PROFILE_URL).await.unwrap_err(),
            EnrichmentError::OutOfCredits
        );
        assert_eq!(
            client.enrich_by_email("jane@x.com").await.unwrap_err(),
            EnrichmentError::OutOfCredits
        );
    }

    #[tokio::test]
    async fn test_rate_limited_with_retry_after() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(429).insert_header("retry-after", "60"),
        )
        .await;

        let err = client_for(&server).enrich_by_url(PROFILE_URL).await.unwrap_err();
        assert_eq!(
            err,
            EnrichmentError::RateLimited {
                retry_after: "60".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_rate_limited_without_retry_after() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(429)).await;

        let err = client_for(&server).enrich_by_email("jane@x.com").await.unwrap_err();
        assert_eq!(
            err,
            EnrichmentError::RateLimited {
                retry_after: "unknown".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_other_status_is_http_error() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(502)).await;

        let err = client_for(&server).enrich_by_url(PROFILE_URL).await.unwrap_err();
        assert_eq!(err, EnrichmentError::Http { status_code: 502 });
    }

    #[tokio::test]
    async fn test_email_without_profile_is_not_found() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"status_code": 404})),
        )
        .await;

        let err = client_for(&server).enrich_by_email("jane@x.com").await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn test_url_without_profile_is_upstream_status() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"status_code": 404})),
        )
        .await;

        let err = client_for(&server).enrich_by_url(PROFILE_URL).await.unwrap_err();
        assert_eq!(
            err,
            EnrichmentError::UpstreamStatus {
                code: "404".to_string(),
                details: json!({"status_code": 404})
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_unexpected() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

        let err = client_for(&server).enrich_by_url(PROFILE_URL).await.unwrap_err();
        assert_eq!(err.kind(), "unexpected_error");
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(jane_body())
                .set_delay(Duration::from_secs(5)),
        )
        .await;

        let client = ContactOutClient::new(
            ContactOutConfig::new(Some(TOKEN.to_string()))
                .with_base_url(server.uri())
                .with_timeout(Duration::from_millis(200)),
        );
        let err = client.enrich_by_url(PROFILE_URL).await.unwrap_err();
        assert_eq!(err.kind(), "transport_error");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Nothing listens on the discard port, so the connect is refused.
        let client = ContactOutClient::new(
            ContactOutConfig::new(Some(TOKEN.to_string()))
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(Duration::from_secs(2)),
        );
        let err = client.enrich_by_email("jane@x.com").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Transport { .. }));
        assert!(err.to_string().starts_with("Failed to call ContactOut API"));
    }

    #[tokio::test]
    async fn test_tools_return_mappings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("email", "jane@x.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jane_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("profile", PROFILE_URL))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status_code": 500})))
            .mount(&server)
            .await;

        let tools = create_contactout_tools(
            ContactOutConfig::new(Some(TOKEN.to_string())).with_base_url(server.uri()),
        );
        assert_eq!(tools.len(), 2);
        let by_url = &tools[0];
        let by_email = &tools[1];

        let output = by_email.execute(json!({"email": "jane@x.com"})).await.unwrap();
        assert!(!output.is_error);
        let value: Value = serde_json::from_str(&output.content).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["search_email"], "jane@x.com");
        assert_eq!(value["contact_info"]["emails"], json!(["jane@x.com"]));

        let output = by_url.execute(json!({"linkedin_url": PROFILE_URL})).await.unwrap();
        assert!(output.is_error);
        let value: Value = serde_json::from_str(&output.content).unwrap();
        assert_eq!(value["error"], "API returned status code 500");
        assert_eq!(value["details"]["status_code"], 500);
    }

    #[tokio::test]
    async fn test_tool_rejects_malformed_arguments() {
        let tools = create_contactout_tools(ContactOutConfig::default());
        let err = tools[0].execute(json!({"url": PROFILE_URL})).await.unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));
    }

    #[tokio::test]
    async fn test_tool_reports_missing_token_as_mapping() {
        let tools = create_contactout_tools(ContactOutConfig::default());
        let output = tools[1].execute(json!({"email": "jane@x.com"})).await.unwrap();
        assert!(output.is_error);
        let value: Value = serde_json::from_str(&output.content).unwrap();
        assert!(value["error"].as_str().unwrap().contains("CONTACTOUT_API_TOKEN"));
    }

    #[test]
    fn test_tool_definitions() {
        let tools = create_contactout_tools(ContactOutConfig::default());
        let names: Vec<_> = tools.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["enrich_linkedin_profile_by_url", "enrich_linkedin_profile_by_email"]
        );
        let def = tools[0].definition();
        assert_eq!(def.parameters.required, vec!["linkedin_url"]);
        let def = tools[1].definition();
        assert_eq!(def.parameters.required, vec!["email"]);
    }
}
