// # Prowl Notifier
//
// Push notifications through the Prowl public API.
//
// - `verify`: `GET {api_url}/verify?apikey=..`
// - `notify`: `POST {api_url}/add` with form fields `apikey`, `application`,
//   `event`, `description`
//
// Prowl answers with a small XML document, either
// `<success code="200" remaining=".." resetdate=".."/>` or
// `<error code="401">Invalid API key</error>`. Only those two elements are
// inspected, so a plain string scan is enough.
//
// The API key NEVER appears in logs or `Debug` output.

use async_trait::async_trait;
use dhdns_core::config::NotifierConfig;
use dhdns_core::traits::Notifier;
use dhdns_core::{Error, Result};
use std::time::Duration;

/// Interpret a Prowl response
///
/// Success needs both a 2xx status and a `<success` element. Otherwise the
/// `<error>` text is reported, falling back to the HTTP status.
pub fn parse_prowl_response(status: u16, body: &str) -> Result<()> {
    if (200..300).contains(&status) && body.contains("<success") {
        return Ok(());
    }

    match extract_error(body) {
        Some((Some(code), message)) => Err(Error::notification(format!(
            "Prowl error {code}: {message}"
        ))),
        Some((None, message)) => Err(Error::notification(format!("Prowl error: {message}"))),
        None => Err(Error::notification(format!("Prowl returned HTTP {status}"))),
    }
}

/// Pull `code` and the text out of `<error code="..">text</error>`
fn extract_error(body: &str) -> Option<(Option<&str>, &str)> {
    let start = body.find("<error")?;
    let element = &body[start..];
    let open_end = element.find('>')?;
    let open_tag = &element[..open_end];

    let code = open_tag.find("code=\"").and_then(|idx| {
        let rest = &open_tag[idx + 6..];
        rest.find('"').map(|end| &rest[..end])
    });

    let text = if open_tag.ends_with('/') {
        ""
    } else {
        let inner = &element[open_end + 1..];
        inner.find("</error>").map_or(inner, |end| &inner[..end]).trim()
    };

    Some((code, text))
}

/// Prowl push notifier
pub struct ProwlNotifier {
    /// ⚠️ NEVER log this value
    api_key: String,

    /// Application name shown on the device
    application: String,

    /// API base, without trailing slash
    api_url: String,

    client: reqwest::Client,
}

impl std::fmt::Debug for ProwlNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProwlNotifier")
            .field("api_key", &"<REDACTED>")
            .field("application", &self.application)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl ProwlNotifier {
    pub fn new(
        api_key: impl Into<String>,
        application: impl Into<String>,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("Prowl API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            application: application.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a notifier from validated configuration
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        config.validate()?;
        match config {
            NotifierConfig::Prowl {
                api_key,
                application,
                api_url,
                timeout_secs,
            } => Self::new(
                api_key.clone(),
                application.clone(),
                api_url.clone(),
                Duration::from_secs(*timeout_secs),
            ),
        }
    }

    async fn read_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::notification(format!("Failed to read Prowl response: {}", e)))?;
        parse_prowl_response(status, &body)
    }
}

#[async_trait]
impl Notifier for ProwlNotifier {
    async fn verify(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/verify", self.api_url))
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::notification(format!("Prowl verify failed: {}", e.without_url())))?;

        self.read_response(response).await
    }

    async fn notify(&self, event: &str, description: &str) -> Result<()> {
        let form = [
            ("apikey", self.api_key.as_str()),
            ("application", self.application.as_str()),
            ("event", event),
            ("description", description),
        ];

        let response = self
            .client
            .post(format!("{}/add", self.api_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::notification(format!("Prowl add failed: {}", e.without_url())))?;

        self.read_response(response).await?;
        tracing::debug!("Prowl accepted notification '{}'", event);
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "prowl"
    }
}
