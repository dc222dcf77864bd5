//! Persisted node-state port.

use hooksync_types::error::StateError;
use hooksync_types::state::NodeState;

/// Durable storage for a single node instance's state record.
///
/// The host serializes lifecycle calls for a given instance, so
/// implementations do not need transactions; a load/modify/save sequence
/// inside one lifecycle operation never races another.
pub trait StateStore: Send + Sync {
    /// Load the current record. A record that was never written loads as
    /// the empty default, not as an error.
    fn load(&self) -> impl std::future::Future<Output = Result<NodeState, StateError>> + Send;

    /// Replace the stored record.
    fn save(
        &self,
        state: &NodeState,
    ) -> impl std::future::Future<Output = Result<(), StateError>> + Send;
}
