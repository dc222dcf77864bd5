//! Shared domain types for hooksync.
//!
//! This crate contains the types exchanged between the lifecycle controller,
//! the subscription client, and the host: remote subscription records, the
//! desired registration, the persisted per-instance state record, credential
//! material, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, secrecy, thiserror.

pub mod credentials;
pub mod error;
pub mod state;
pub mod subscription;
