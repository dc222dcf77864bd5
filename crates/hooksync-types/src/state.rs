//! Persisted per-instance state.
//!
//! `NodeState` is the durable record linking one hosted node instance to the
//! remote subscription it owns. The host provides the storage medium; the
//! record layout is owned here and opaque to the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::subscription::SubscriptionId;

/// Durable record scoped to one hosted node instance.
///
/// Serializes to `{ "webhookId": ... }` plus whatever transient fields the
/// host has colocated in the same record. An absent `webhookId` means "no
/// known registration". The remote service has no concept of node instances,
/// only subscription records, so this is the single source of truth linking
/// the two across restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    /// Remote identifier of the subscription this instance believes it owns.
    #[serde(rename = "webhookId", default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<SubscriptionId>,
    /// Host-colocated transient fields, preserved across load/save and wiped
    /// together with the registration on teardown.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NodeState {
    /// True when no registration is known locally.
    pub fn is_unregistered(&self) -> bool {
        self.webhook_id.is_none()
    }

    /// Record ownership of a remote subscription.
    pub fn record(&mut self, id: SubscriptionId) {
        self.webhook_id = Some(id);
    }

    /// Wipe the registration and every colocated transient field, making it
    /// clear that no webhook is registered anymore.
    pub fn clear(&mut self) {
        self.webhook_id = None;
        self.extra.clear();
    }
}
