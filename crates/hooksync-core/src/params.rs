//! Host configuration port.

use hooksync_types::credentials::CredentialSet;
use hooksync_types::error::SubscriptionError;

/// Endpoint used when the host has not configured one.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:3000/automation/api";

/// Node-level configuration supplied by the host.
///
/// Implementations must answer from the current configuration on every
/// call rather than from a cached snapshot, so an endpoint edited between
/// two lifecycle operations takes effect on the very next request.
pub trait NodeParameters: Send + Sync {
    /// Base URL of the automation API, without a trailing slash.
    fn api_endpoint(
        &self,
    ) -> impl std::future::Future<Output = Result<String, SubscriptionError>> + Send;

    /// The credential set selected for this node.
    fn credentials(
        &self,
    ) -> impl std::future::Future<Output = Result<CredentialSet, SubscriptionError>> + Send;
}
