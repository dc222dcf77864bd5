//! Reconciliation logic and port trait definitions for hooksync.
//!
//! This crate defines the "ports" the infrastructure layer implements
//! (`SubscriptionApi`, `StateStore`, `NodeParameters`) along with the
//! `LifecycleController` that drives webhook registration. It depends only
//! on `hooksync-types` -- never on `hooksync-infra` or any HTTP/IO crate.

pub mod api;
pub mod auth;
pub mod controller;
pub mod params;
pub mod state;
