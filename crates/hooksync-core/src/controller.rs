//! Webhook lifecycle reconciliation.
//!
//! `LifecycleController` compares the host's persisted record with what the
//! remote service reports and drives the three lifecycle transitions:
//! existence probing, registration, and teardown. Each transition performs
//! at most one remote write and persists its outcome before reporting
//! success.

use tracing::{debug, error, info, warn};

use hooksync_types::subscription::{DesiredRegistration, EventMatch, RemoteSubscription};

use crate::api::SubscriptionApi;
use crate::state::StateStore;

/// Drives one node instance's webhook registration on the remote service.
///
/// The controller never throws past a lifecycle boundary: each operation
/// reports a plain `bool` and logs what went wrong, because the host uses
/// the answer to pick the next transition rather than to surface an error.
pub struct LifecycleController<A, S> {
    api: A,
    store: S,
    event_match: EventMatch,
}

impl<A: SubscriptionApi, S: StateStore> LifecycleController<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            event_match: EventMatch::default(),
        }
    }

    /// Change how a remote event set is compared against the desired one.
    ///
    /// The default is [`EventMatch::Superset`]: a remote subscription
    /// listening for more events than requested still counts as a match.
    pub fn with_event_match(mut self, event_match: EventMatch) -> Self {
        self.event_match = event_match;
        self
    }

    /// Whether the desired registration is already present remotely.
    ///
    /// Scans the remote list in order and takes the first subscription
    /// whose URL matches and whose event set covers the desired one; its
    /// id is persisted so a later teardown can find it. Every failure on
    /// this path, remote or storage, is reported as `false` so activation
    /// falls through to a fresh create instead of getting stuck.
    pub async fn exists_check(&self, desired: &DesiredRegistration) -> bool {
        let subscriptions = match self.api.list().await {
            Ok(subscriptions) => subscriptions,
            Err(err) => {
                warn!(error = %err, "subscription list failed; treating registration as absent");
                return false;
            }
        };

        let Some(matched) = subscriptions.iter().find(|s| self.matches(s, desired)) else {
            debug!(url = %desired.url, "no remote subscription covers the desired registration");
            return false;
        };

        let mut state = match self.store.load().await {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    error = %err,
                    id = %matched.id,
                    "matched a remote subscription but could not load the state record"
                );
                return false;
            }
        };
        state.record(matched.id.clone());
        if let Err(err) = self.store.save(&state).await {
            warn!(
                error = %err,
                id = %matched.id,
                "matched a remote subscription but could not persist its id"
            );
            return false;
        }

        info!(id = %matched.id, "remote subscription already covers the desired registration");
        true
    }

    /// Register the desired subscription remotely and persist its id.
    ///
    /// No existence probe happens here; hosts call [`exists_check`] first
    /// and skip the create when it reports `true`. Returns `false` on any
    /// remote or storage failure. If the create succeeded but the id could
    /// not be persisted, the remote side now holds an orphaned
    /// registration; the id is logged so an operator can remove it.
    ///
    /// [`exists_check`]: LifecycleController::exists_check
    pub async fn create_registration(&self, desired: &DesiredRegistration) -> bool {
        let created = match self.api.create(&desired.events, &desired.url).await {
            Ok(created) => created,
            Err(err) => {
                warn!(error = %err, url = %desired.url, "subscription create failed");
                return false;
            }
        };

        let mut state = match self.store.load().await {
            Ok(state) => state,
            Err(err) => {
                error!(
                    error = %err,
                    id = %created.id,
                    "subscription created but the state record could not be loaded; \
                     the remote registration is orphaned"
                );
                return false;
            }
        };
        state.record(created.id.clone());
        if let Err(err) = self.store.save(&state).await {
            error!(
                error = %err,
                id = %created.id,
                "subscription created but its id could not be persisted; \
                 the remote registration is orphaned"
            );
            return false;
        }

        info!(id = %created.id, url = %desired.url, "registered webhook subscription");
        true
    }

    /// Tear down whatever registration the state record points at.
    ///
    /// With no recorded id there is nothing to do and the teardown reports
    /// success without a remote call. A remote failure leaves the record
    /// untouched so a later teardown can retry; only after the remote
    /// confirms deletion is the record cleared, including any colocated
    /// fields written next to the id.
    pub async fn delete_registration(&self) -> bool {
        let mut state = match self.store.load().await {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "could not load the state record for teardown");
                return false;
            }
        };

        let Some(id) = state.webhook_id.clone() else {
            debug!("no subscription recorded; nothing to tear down");
            return true;
        };

        if let Err(err) = self.api.delete(&id).await {
            warn!(error = %err, id = %id, "subscription delete failed; keeping the recorded id");
            return false;
        }

        state.clear();
        if let Err(err) = self.store.save(&state).await {
            warn!(
                error = %err,
                id = %id,
                "subscription deleted remotely but the state record could not be cleared"
            );
            return false;
        }

        info!(id = %id, "deregistered webhook subscription");
        true
    }

    fn matches(&self, remote: &RemoteSubscription, desired: &DesiredRegistration) -> bool {
        remote.url == desired.url && self.event_match.covers(&remote.events, &desired.events)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use hooksync_types::error::{StateError, SubscriptionError};
    use hooksync_types::state::NodeState;
    use hooksync_types::subscription::SubscriptionId;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeApi {
        subscriptions: Arc<Mutex<Vec<RemoteSubscription>>>,
        deleted: Arc<Mutex<Vec<SubscriptionId>>>,
        create_calls: Arc<AtomicUsize>,
        delete_calls: Arc<AtomicUsize>,
        fail_list: bool,
        fail_create: bool,
        fail_delete: bool,
    }

    impl FakeApi {
        fn with_remote(subscriptions: Vec<RemoteSubscription>) -> Self {
            Self {
                subscriptions: Arc::new(Mutex::new(subscriptions)),
                ..Self::default()
            }
        }
    }

    impl SubscriptionApi for FakeApi {
        async fn list(&self) -> Result<Vec<RemoteSubscription>, SubscriptionError> {
            if self.fail_list {
                return Err(SubscriptionError::Remote("HTTP 502: bad gateway".into()));
            }
            Ok(self.subscriptions.lock().unwrap().clone())
        }

        async fn create(
            &self,
            events: &BTreeSet<String>,
            url: &str,
        ) -> Result<RemoteSubscription, SubscriptionError> {
            let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err(SubscriptionError::Remote(
                    "create response contained no subscription id".into(),
                ));
            }
            let created = RemoteSubscription {
                id: SubscriptionId::new(format!("sub-{}", call + 1)),
                url: url.to_owned(),
                events: events.clone(),
                subscription_type: None,
                description: None,
                created_at: None,
                modified_at: None,
            };
            self.subscriptions.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn delete(&self, id: &SubscriptionId) -> Result<(), SubscriptionError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete {
                return Err(SubscriptionError::Remote("HTTP 500: internal error".into()));
            }
            self.deleted.lock().unwrap().push(id.clone());
            self.subscriptions.lock().unwrap().retain(|s| &s.id != id);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct FakeStore {
        state: Arc<Mutex<NodeState>>,
        fail_load: bool,
        fail_save: bool,
    }

    impl FakeStore {
        fn with_state(state: NodeState) -> Self {
            Self {
                state: Arc::new(Mutex::new(state)),
                ..Self::default()
            }
        }

        fn snapshot(&self) -> NodeState {
            self.state.lock().unwrap().clone()
        }
    }

    impl StateStore for FakeStore {
        async fn load(&self) -> Result<NodeState, StateError> {
            if self.fail_load {
                return Err(StateError::Storage("load refused".into()));
            }
            Ok(self.state.lock().unwrap().clone())
        }

        async fn save(&self, state: &NodeState) -> Result<(), StateError> {
            if self.fail_save {
                return Err(StateError::Storage("save refused".into()));
            }
            *self.state.lock().unwrap() = state.clone();
            Ok(())
        }
    }

    fn remote(id: &str, url: &str, events: &[&str]) -> RemoteSubscription {
        RemoteSubscription {
            id: SubscriptionId::new(id),
            url: url.to_owned(),
            events: events.iter().map(|e| (*e).to_owned()).collect(),
            subscription_type: Some("webhook".to_owned()),
            description: None,
            created_at: None,
            modified_at: None,
        }
    }

    fn desired(url: &str, events: &[&str]) -> DesiredRegistration {
        DesiredRegistration::new(url, events.iter().copied())
    }

    #[tokio::test]
    async fn exists_check_accepts_a_superset_of_events() {
        let api = FakeApi::with_remote(vec![remote(
            "41",
            "https://n8n.example/webhook/1",
            &["user.created", "user.deleted"],
        )]);
        let store = FakeStore::default();
        let controller = LifecycleController::new(api, store.clone());

        let found = controller
            .exists_check(&desired("https://n8n.example/webhook/1", &["user.created"]))
            .await;

        assert!(found);
        assert_eq!(store.snapshot().webhook_id, Some(SubscriptionId::new("41")));
    }

    #[tokio::test]
    async fn exists_check_requires_the_urls_to_match() {
        let api = FakeApi::with_remote(vec![remote(
            "41",
            "https://other.example/webhook/1",
            &["user.created"],
        )]);
        let store = FakeStore::default();
        let controller = LifecycleController::new(api, store.clone());

        let found = controller
            .exists_check(&desired("https://n8n.example/webhook/1", &["user.created"]))
            .await;

        assert!(!found);
        assert!(store.snapshot().is_unregistered());
    }

    #[tokio::test]
    async fn exists_check_rejects_a_partial_event_overlap() {
        let api = FakeApi::with_remote(vec![remote(
            "41",
            "https://n8n.example/webhook/1",
            &["user.created"],
        )]);
        let store = FakeStore::default();
        let controller = LifecycleController::new(api, store.clone());

        let found = controller
            .exists_check(&desired(
                "https://n8n.example/webhook/1",
                &["user.created", "user.deleted"],
            ))
            .await;

        assert!(!found);
        assert!(store.snapshot().is_unregistered());
    }

    #[tokio::test]
    async fn exists_check_takes_the_first_match_in_list_order() {
        let api = FakeApi::with_remote(vec![
            remote("first", "https://n8n.example/webhook/1", &["user.created"]),
            remote("second", "https://n8n.example/webhook/1", &["user.created"]),
        ]);
        let store = FakeStore::default();
        let controller = LifecycleController::new(api, store.clone());

        assert!(
            controller
                .exists_check(&desired("https://n8n.example/webhook/1", &["user.created"]))
                .await
        );
        assert_eq!(
            store.snapshot().webhook_id,
            Some(SubscriptionId::new("first"))
        );
    }

    #[tokio::test]
    async fn exists_check_swallows_remote_failures() {
        let api = FakeApi {
            fail_list: true,
            ..FakeApi::default()
        };
        let store = FakeStore::default();
        let controller = LifecycleController::new(api, store.clone());

        let found = controller
            .exists_check(&desired("https://n8n.example/webhook/1", &["user.created"]))
            .await;

        assert!(!found);
        assert!(store.snapshot().is_unregistered());
    }

    #[tokio::test]
    async fn exists_check_reports_absent_when_the_record_cannot_be_saved() {
        let api = FakeApi::with_remote(vec![remote(
            "41",
            "https://n8n.example/webhook/1",
            &["user.created"],
        )]);
        let store = FakeStore {
            fail_save: true,
            ..FakeStore::default()
        };
        let controller = LifecycleController::new(api, store.clone());

        let found = controller
            .exists_check(&desired("https://n8n.example/webhook/1", &["user.created"]))
            .await;

        assert!(!found);
        assert!(store.snapshot().is_unregistered());
    }

    #[tokio::test]
    async fn exists_check_keeps_colocated_state_fields() {
        let mut preloaded = NodeState::default();
        preloaded
            .extra
            .insert("hookSecret".to_owned(), serde_json::json!("shhh"));
        let api = FakeApi::with_remote(vec![remote(
            "41",
            "https://n8n.example/webhook/1",
            &["user.created"],
        )]);
        let store = FakeStore::with_state(preloaded);
        let controller = LifecycleController::new(api, store.clone());

        assert!(
            controller
                .exists_check(&desired("https://n8n.example/webhook/1", &["user.created"]))
                .await
        );
        let state = store.snapshot();
        assert_eq!(state.webhook_id, Some(SubscriptionId::new("41")));
        assert_eq!(state.extra["hookSecret"], serde_json::json!("shhh"));
    }

    #[tokio::test]
    async fn exact_matching_rejects_a_superset_of_events() {
        let api = FakeApi::with_remote(vec![remote(
            "41",
            "https://n8n.example/webhook/1",
            &["user.created", "user.deleted"],
        )]);
        let store = FakeStore::default();
        let controller =
            LifecycleController::new(api, store.clone()).with_event_match(EventMatch::Exact);

        assert!(
            !controller
                .exists_check(&desired("https://n8n.example/webhook/1", &["user.created"]))
                .await
        );
        assert!(
            controller
                .exists_check(&desired(
                    "https://n8n.example/webhook/1",
                    &["user.created", "user.deleted"],
                ))
                .await
        );
    }

    #[tokio::test]
    async fn create_registration_persists_the_returned_id() {
        let api = FakeApi::default();
        let store = FakeStore::default();
        let controller = LifecycleController::new(api.clone(), store.clone());

        let created = controller
            .create_registration(&desired("https://n8n.example/webhook/1", &["user.created"]))
            .await;

        assert!(created);
        assert_eq!(
            store.snapshot().webhook_id,
            Some(SubscriptionId::new("sub-1"))
        );
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_registration_leaves_state_untouched_on_failure() {
        let api = FakeApi {
            fail_create: true,
            ..FakeApi::default()
        };
        let store = FakeStore::default();
        let controller = LifecycleController::new(api, store.clone());

        let created = controller
            .create_registration(&desired("https://n8n.example/webhook/1", &["user.created"]))
            .await;

        assert!(!created);
        assert!(store.snapshot().is_unregistered());
    }

    #[tokio::test]
    async fn create_registration_reports_failure_when_the_id_cannot_be_persisted() {
        let api = FakeApi::default();
        let store = FakeStore {
            fail_save: true,
            ..FakeStore::default()
        };
        let controller = LifecycleController::new(api.clone(), store.clone());

        let created = controller
            .create_registration(&desired("https://n8n.example/webhook/1", &["user.created"]))
            .await;

        assert!(!created);
        // The remote side was still written; only the local record is stale.
        assert_eq!(api.subscriptions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn a_created_registration_satisfies_the_next_exists_check() {
        let api = FakeApi::default();
        let store = FakeStore::default();
        let controller = LifecycleController::new(api, store.clone());
        let want = desired("https://n8n.example/webhook/1", &["user.created"]);

        assert!(!controller.exists_check(&want).await);
        assert!(controller.create_registration(&want).await);
        assert!(controller.exists_check(&want).await);
    }

    #[tokio::test]
    async fn delete_registration_without_an_id_is_a_no_op_success() {
        let api = FakeApi::default();
        let store = FakeStore::default();
        let controller = LifecycleController::new(api.clone(), store);

        assert!(controller.delete_registration().await);
        assert_eq!(api.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn delete_registration_clears_the_whole_record() {
        let mut preloaded = NodeState::default();
        preloaded.record(SubscriptionId::new("41"));
        preloaded
            .extra
            .insert("hookSecret".to_owned(), serde_json::json!("shhh"));
        let api = FakeApi::with_remote(vec![remote(
            "41",
            "https://n8n.example/webhook/1",
            &["user.created"],
        )]);
        let store = FakeStore::with_state(preloaded);
        let controller = LifecycleController::new(api.clone(), store.clone());

        assert!(controller.delete_registration().await);
        assert_eq!(store.snapshot(), NodeState::default());
        assert_eq!(
            api.deleted.lock().unwrap().as_slice(),
            &[SubscriptionId::new("41")]
        );
    }

    #[tokio::test]
    async fn delete_registration_keeps_the_id_when_the_remote_refuses() {
        let mut preloaded = NodeState::default();
        preloaded.record(SubscriptionId::new("41"));
        let api = FakeApi {
            fail_delete: true,
            ..FakeApi::default()
        };
        let store = FakeStore::with_state(preloaded);
        let controller = LifecycleController::new(api, store.clone());

        assert!(!controller.delete_registration().await);
        assert_eq!(store.snapshot().webhook_id, Some(SubscriptionId::new("41")));
    }

    #[tokio::test]
    async fn delete_registration_reports_failure_when_the_clear_cannot_be_saved() {
        let mut preloaded = NodeState::default();
        preloaded.record(SubscriptionId::new("41"));
        let api = FakeApi::default();
        let store = FakeStore {
            state: Arc::new(Mutex::new(preloaded)),
            fail_save: true,
            ..FakeStore::default()
        };
        let controller = LifecycleController::new(api.clone(), store.clone());

        assert!(!controller.delete_registration().await);
        // The remote delete went through; the stale local id is the damage.
        assert_eq!(api.delete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.snapshot().webhook_id, Some(SubscriptionId::new("41")));
    }
}
