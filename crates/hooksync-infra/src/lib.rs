//! Infrastructure implementations for hooksync.
//!
//! Everything that touches the outside world lives here: the reqwest
//! subscription client, parameter sources backed by TOML files, and the
//! JSON state file. `hooksync-core` defines the ports; this crate plugs
//! them in.

pub mod client;
pub mod params;
pub mod state;
