//! HttpSubscriptionClient -- reqwest implementation of [`SubscriptionApi`].
//!
//! Talks to the automation service's n8n integration endpoints
//! (`services/n8n/webhook_subscriptions`) with JSON bodies and an
//! authentication header resolved through the scheme registry.
//!
//! The base URL and credentials are read from [`NodeParameters`] on every
//! request, never cached, so configuration edits take effect immediately.

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::{Method, header};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hooksync_core::api::SubscriptionApi;
use hooksync_core::auth::AuthSchemeRegistry;
use hooksync_core::params::NodeParameters;
use hooksync_types::credentials::AuthMaterial;
use hooksync_types::error::SubscriptionError;
use hooksync_types::subscription::{RemoteSubscription, SubscriptionId};

/// Header carrying the resolved API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Longest slice of a remote error body quoted in error messages.
const ERROR_SNIPPET_CHARS: usize = 200;

/// HTTP client for the remote webhook subscription API.
///
/// # Credential Security
///
/// Credential values stay wrapped in [`secrecy::SecretString`] until the
/// moment a request header is built. They never appear in Debug output or
/// tracing logs.
pub struct HttpSubscriptionClient<P> {
    http: reqwest::Client,
    params: P,
    schemes: AuthSchemeRegistry,
}

impl<P: NodeParameters> HttpSubscriptionClient<P> {
    /// Collection path of the subscription resource, relative to the
    /// configured API endpoint.
    const SUBSCRIPTIONS_PATH: &'static str = "services/n8n/webhook_subscriptions";

    pub fn new(params: P) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            http,
            params,
            schemes: AuthSchemeRegistry::builtin().clone(),
        }
    }

    /// Replace the authentication scheme table, for hosts that register
    /// schemes beyond the built-in ones.
    pub fn with_schemes(mut self, schemes: AuthSchemeRegistry) -> Self {
        self.schemes = schemes;
        self
    }

    /// URL of the subscription collection, built from the endpoint the
    /// parameters report right now.
    async fn collection_url(&self) -> Result<String, SubscriptionError> {
        let endpoint = self.params.api_endpoint().await?;
        Ok(join_url(&endpoint, Self::SUBSCRIPTIONS_PATH))
    }

    /// Start a request with the `Accept` header and resolved credential
    /// material attached.
    async fn authed(
        &self,
        method: Method,
        url: &str,
    ) -> Result<reqwest::RequestBuilder, SubscriptionError> {
        let credentials = self.params.credentials().await?;
        let material = self.schemes.material_for(&credentials).await?;

        let builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        Ok(match material {
            AuthMaterial::ApiKey(key) => builder.header(API_KEY_HEADER, key.expose_secret()),
        })
    }

    /// Reject non-2xx responses, quoting a snippet of the error body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SubscriptionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SubscriptionError::Remote(format!(
            "HTTP {status}: {}",
            snippet(&body)
        )))
    }
}

impl<P: NodeParameters> SubscriptionApi for HttpSubscriptionClient<P> {
    async fn list(&self) -> Result<Vec<RemoteSubscription>, SubscriptionError> {
        let url = self.collection_url().await?;
        debug!(url = %url, "listing webhook subscriptions");

        let response = self
            .authed(Method::GET, &url)
            .await?
            .send()
            .await
            .map_err(|e| SubscriptionError::Remote(format!("HTTP request failed: {e}")))?;
        let response = Self::ensure_success(response).await?;

        let list: ListResponse = response
            .json()
            .await
            .map_err(|e| SubscriptionError::Decode(format!("failed to parse subscription list: {e}")))?;
        Ok(list.webhooks)
    }

    async fn create(
        &self,
        events: &BTreeSet<String>,
        url: &str,
    ) -> Result<RemoteSubscription, SubscriptionError> {
        let collection = self.collection_url().await?;
        let body = CreateRequest {
            webhook_subscription: CreatePayload { events, url },
        };
        debug!(url = %collection, callback = %url, "creating webhook subscription");

        let response = self
            .authed(Method::POST, &collection)
            .await?
            .json(&body)
            .send()
            .await
            .map_err(|e| SubscriptionError::Remote(format!("HTTP request failed: {e}")))?;
        let response = Self::ensure_success(response).await?;

        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| SubscriptionError::Decode(format!("failed to parse create response: {e}")))?;
        let Some(id) = created.id else {
            // A success status without an id is still a failed registration.
            return Err(SubscriptionError::Remote(
                "create response contained no subscription id".into(),
            ));
        };

        Ok(RemoteSubscription {
            id,
            url: url.to_owned(),
            events: events.clone(),
            subscription_type: None,
            description: None,
            created_at: None,
            modified_at: None,
        })
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<(), SubscriptionError> {
        let url = format!("{}/{id}", self.collection_url().await?);
        debug!(url = %url, "deleting webhook subscription");

        let response = self
            .authed(Method::DELETE, &url)
            .await?
            .send()
            .await
            .map_err(|e| SubscriptionError::Remote(format!("HTTP request failed: {e}")))?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Join an endpoint and a relative path with exactly one slash between.
fn join_url(endpoint: &str, path: &str) -> String {
    format!("{}/{path}", endpoint.trim_end_matches('/'))
}

/// Trimmed prefix of a response body, short enough to quote in an error.
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_SNIPPET_CHARS {
        return trimmed.to_owned();
    }
    let mut cut: String = trimmed.chars().take(ERROR_SNIPPET_CHARS).collect();
    cut.push_str("...");
    cut
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    webhook_subscription: CreatePayload<'a>,
}

#[derive(Serialize)]
struct CreatePayload<'a> {
    events: &'a BTreeSet<String>,
    url: &'a str,
}

#[derive(Deserialize)]
struct ListResponse {
    webhooks: Vec<RemoteSubscription>,
}

#[derive(Deserialize)]
struct CreateResponse {
    id: Option<SubscriptionId>,
}

#[cfg(test)]
mod tests {
    use hooksync_types::credentials::CredentialSet;

    use crate::params::StaticParameters;

    use super::*;

    fn make_client() -> HttpSubscriptionClient<StaticParameters> {
        HttpSubscriptionClient::new(StaticParameters::new(
            "http://localhost:3000/automation/api",
            CredentialSet::new("apiKey").with_field("sharedSecret", "test-key-not-real"),
        ))
    }

    #[test]
    fn test_join_url_inserts_exactly_one_slash() {
        assert_eq!(
            join_url("http://localhost:3000/automation/api", "services/n8n/webhook_subscriptions"),
            "http://localhost:3000/automation/api/services/n8n/webhook_subscriptions"
        );
        assert_eq!(
            join_url("http://localhost:3000/automation/api/", "services/n8n/webhook_subscriptions"),
            "http://localhost:3000/automation/api/services/n8n/webhook_subscriptions"
        );
    }

    #[tokio::test]
    async fn test_requests_carry_accept_and_api_key_headers() {
        let client = make_client();
        let url = client.collection_url().await.unwrap();
        let request = client
            .authed(Method::GET, &url)
            .await
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:3000/automation/api/services/n8n/webhook_subscriptions"
        );
        assert_eq!(request.headers()[header::ACCEPT], "application/json");
        assert_eq!(request.headers()["x-api-key"], "test-key-not-real");
    }

    #[tokio::test]
    async fn test_unknown_scheme_fails_before_any_request() {
        let client = HttpSubscriptionClient::new(StaticParameters::new(
            "http://localhost:3000/automation/api",
            CredentialSet::new("oauth2"),
        ));

        let err = client
            .authed(Method::GET, "http://localhost:3000")
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_maps_to_a_remote_error() {
        // Port 1 is never listening; the connect error must surface as
        // Remote, not as a panic or a decode error.
        let client = HttpSubscriptionClient::new(StaticParameters::new(
            "http://127.0.0.1:1/automation/api",
            CredentialSet::new("apiKey").with_field("sharedSecret", "k"),
        ));

        let err = client.list().await.unwrap_err();
        assert!(matches!(err, SubscriptionError::Remote(_)));
    }

    #[test]
    fn test_create_body_nests_under_webhook_subscription() {
        let events: BTreeSet<String> =
            ["user.created".to_owned(), "user.deleted".to_owned()].into();
        let body = CreateRequest {
            webhook_subscription: CreatePayload {
                events: &events,
                url: "https://n8n.example/webhook/1",
            },
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "webhook_subscription": {
                    "events": ["user.created", "user.deleted"],
                    "url": "https://n8n.example/webhook/1",
                }
            })
        );
    }

    #[test]
    fn test_list_response_accepts_numeric_ids() {
        let raw = r#"{"webhooks":[{"id":7,"url":"https://n8n.example/webhook/1","events":["user.created"],"type":"webhook"}]}"#;
        let list: ListResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(list.webhooks.len(), 1);
        assert_eq!(list.webhooks[0].id.as_str(), "7");
        assert_eq!(
            list.webhooks[0].subscription_type.as_deref(),
            Some("webhook")
        );
    }

    #[test]
    fn test_create_response_tolerates_a_missing_id() {
        let ok: CreateResponse = serde_json::from_str(r#"{"id":"abc-123"}"#).unwrap();
        assert_eq!(ok.id.unwrap().as_str(), "abc-123");

        let missing: CreateResponse = serde_json::from_str(r#"{"status":"created"}"#).unwrap();
        assert!(missing.id.is_none());
    }

    #[test]
    fn test_snippet_truncates_long_bodies() {
        assert_eq!(snippet("  short body  "), "short body");

        let cut = snippet(&"x".repeat(500));
        assert_eq!(cut.chars().count(), ERROR_SNIPPET_CHARS + 3);
        assert!(cut.ends_with("..."));
    }
}
