//! Remote subscription API port.
//!
//! The lifecycle controller talks to the automation service exclusively
//! through this trait; the reqwest-backed implementation lives in
//! `hooksync-infra`.

use std::collections::BTreeSet;

use hooksync_types::error::SubscriptionError;
use hooksync_types::subscription::{RemoteSubscription, SubscriptionId};

/// The three remote operations the subscription lifecycle needs.
pub trait SubscriptionApi: Send + Sync {
    /// Fetch every webhook subscription the remote service currently holds.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RemoteSubscription>, SubscriptionError>> + Send;

    /// Register a subscription for the given events and callback URL.
    ///
    /// Not idempotent: calling this twice registers two subscriptions.
    /// A success response that carries no identifier is reported as
    /// [`SubscriptionError::Remote`], never as a created subscription.
    fn create(
        &self,
        events: &BTreeSet<String>,
        url: &str,
    ) -> impl std::future::Future<Output = Result<RemoteSubscription, SubscriptionError>> + Send;

    /// Delete the subscription with the given identifier.
    fn delete(
        &self,
        id: &SubscriptionId,
    ) -> impl std::future::Future<Output = Result<(), SubscriptionError>> + Send;
}
