//! Subscription domain types.
//!
//! `RemoteSubscription` mirrors one record of the remote service's webhook
//! subscription resource as the service serializes it (camelCase field
//! names, `type` for the subscription kind). `DesiredRegistration` is the
//! local side of the reconciliation: the callback URL this instance
//! publishes and the event names the user subscribed to.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote-assigned subscription identifier, immutable once created.
///
/// The remote service is loose about the JSON type: list payloads carry
/// numeric ids while create responses return strings. Both forms are
/// accepted and normalized to the string form, which is also what the
/// delete path interpolates into the request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for SubscriptionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(SubscriptionId(s)),
            Raw::Number(n) => Ok(SubscriptionId(n.to_string())),
        }
    }
}

/// One subscription record held by the remote service.
///
/// `id`, `url` and `events` drive reconciliation; the remaining fields are
/// descriptive metadata the service includes in list responses and are never
/// consulted. `id` is unique among all subscriptions returned by a list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSubscription {
    /// Remote-assigned identifier.
    pub id: SubscriptionId,
    /// Callback URL the remote service will invoke on matching events.
    #[serde(default)]
    pub url: String,
    /// Event names this subscription is registered for.
    #[serde(default)]
    pub events: BTreeSet<String>,
    /// Subscription kind as reported by the service.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub subscription_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp, kept as the opaque string the service sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

/// The registration the local side wants to exist remotely.
///
/// Both fields come from host configuration before any lifecycle call runs;
/// an empty event selection is the host's to forbid, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRegistration {
    /// Externally-addressable callback URL this hosted instance publishes.
    pub url: String,
    /// Event names the user configured as subscribed.
    pub events: BTreeSet<String>,
}

impl DesiredRegistration {
    pub fn new<I, S>(url: impl Into<String>, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            events: events.into_iter().map(Into::into).collect(),
        }
    }
}

/// How a remote subscription's event set is compared against the desired set
/// during an existence check.
///
/// The default tolerates remote-side supersets, which is the behavior the
/// remote service has always been reconciled with. `Exact` is for hosts that
/// want an unambiguous one-to-one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventMatch {
    /// The remote event set must cover every desired event.
    #[default]
    Superset,
    /// The remote and desired event sets must be identical.
    Exact,
}

impl EventMatch {
    /// Whether a remote event set satisfies the desired set under this mode.
    pub fn covers(self, remote: &BTreeSet<String>, desired: &BTreeSet<String>) -> bool {
        match self {
            EventMatch::Superset => remote.is_superset(desired),
            EventMatch::Exact => remote == desired,
        }
    }
}
