//! `ContactClient` - EmailJS relay client.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::types::{ContactMessage, SendRequest};

/// Default EmailJS send endpoint.
const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Contact-form relay client.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ContactClient {
    /// HTTP client.
    http_client: Client,
    /// Send endpoint.
    endpoint: Url,
    /// EmailJS service ID.
    service_id: String,
    /// EmailJS template ID.
    template_id: String,
    /// EmailJS public key.
    public_key: String,
}

/// Builder for `ContactClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct ContactClientBuilder {
    endpoint: Option<Url>,
    service_id: Option<String>,
    template_id: Option<String>,
    public_key: Option<String>,
    user_agent: Option<String>,
}

impl ContactClientBuilder {
    /// Overrides the send endpoint (for wiremock in tests).
    #[must_use]
    pub fn endpoint(mut self, url: Url) -> Self {
        self.endpoint = Some(url);
        self
    }

    /// Sets the service ID (required).
    #[must_use]
    pub fn service_id(mut self, id: impl Into<String>) -> Self {
        self.service_id = Some(id.into());
        self
    }

    /// Sets the template ID (required).
    #[must_use]
    pub fn template_id(mut self, id: impl Into<String>) -> Self {
        self.template_id = Some(id.into());
        self
    }

    /// Sets the public key (required).
    #[must_use]
    pub fn public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the HTTP client
    /// fails to build.
    pub fn build(self) -> Result<ContactClient> {
        let service_id = self.service_id.context("contact service_id is required")?;
        let template_id = self
            .template_id
            .context("contact template_id is required")?;
        let public_key = self.public_key.context("contact public_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let endpoint = if let Some(url) = self.endpoint {
            url
        } else {
            Url::parse(DEFAULT_ENDPOINT).context("invalid default contact endpoint")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .build()
            .context("failed to build HTTP client")?;

        Ok(ContactClient {
            http_client,
            endpoint,
            service_id,
            template_id,
            public_key,
        })
    }
}

impl ContactClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ContactClientBuilder {
        ContactClientBuilder::default()
    }

    /// Sends the message through the relay.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the relay answers with a
    /// non-success status.
    #[instrument(skip_all)]
    pub async fn send(&self, message: &ContactMessage) -> Result<()> {
        let body = SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: message,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            service_id = %self.service_id,
            "contact relay request"
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .context("contact relay request failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            bail!("contact relay error (HTTP {status}): {text}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(mock_server: &MockServer) -> ContactClient {
        ContactClient::builder()
            .endpoint(
                format!("{}/api/v1.0/email/send", mock_server.uri())
                    .parse()
                    .unwrap(),
            )
            .service_id("service_test")
            .template_id("template_test")
            .public_key("pk_test")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_triple() {
        // Arrange & Act
        let result = ContactClient::builder()
            .service_id("s")
            .template_id("t")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("public_key is required")
        );
    }

    #[tokio::test]
    async fn test_send_posts_template_params() {
        // Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/email/send"))
            .and(body_partial_json(serde_json::json!({
                "service_id": "service_test",
                "template_id": "template_test",
                "user_id": "pk_test",
                "template_params": {
                    "user_name": "Ada",
                    "user_email": "ada@example.com",
                    "message": "Loved the catalog"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let message = ContactMessage::new("Ada", "ada@example.com", "Loved the catalog").unwrap();

        // Act
        let result = client.send(&message).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_reports_relay_error() {
        // Arrange
        let mock_server = MockServer::start().await;
        let error_body = "The Public Key is invalid";
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let message = ContactMessage::new("Ada", "ada@example.com", "Hi").unwrap();

        // Act
        let err = client.send(&message).await.unwrap_err().to_string();

        // Assert
        assert!(err.contains("HTTP 400"));
        assert!(err.contains("Public Key is invalid"));
    }
}
