//! CLI command definitions and dispatch for the `hooksync` binary.
//!
//! Uses clap derive macros for argument parsing. Connection settings are
//! global flags so they sit in front of any subcommand.

pub mod lifecycle;
pub mod state;
pub mod subscriptions;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use hooksync_types::subscription::{DesiredRegistration, EventMatch};

/// Manage webhook subscriptions on an automation service.
#[derive(Parser)]
#[command(name = "hooksync", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Base URL of the automation API.
    #[arg(long, env = "HOOKSYNC_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Authentication scheme for outgoing requests.
    #[arg(long, env = "HOOKSYNC_AUTH_SCHEME", default_value = "apiKey", global = true)]
    pub scheme: String,

    /// Shared secret for the apiKey authentication scheme.
    #[arg(long, env = "HOOKSYNC_SHARED_SECRET", hide_env_values = true, global = true)]
    pub shared_secret: Option<String>,

    /// TOML parameter file; takes precedence over --endpoint and
    /// --shared-secret.
    #[arg(long, env = "HOOKSYNC_PARAMS", global = true)]
    pub params: Option<PathBuf>,

    /// Where the node state record is kept.
    #[arg(
        long,
        env = "HOOKSYNC_STATE_FILE",
        default_value = "hooksync-state.json",
        global = true
    )]
    pub state_file: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report whether the desired registration already exists remotely.
    Check {
        #[command(flatten)]
        registration: RegistrationArgs,
    },

    /// Ensure the registration exists: probe first, create only when absent.
    Register {
        #[command(flatten)]
        registration: RegistrationArgs,
    },

    /// Tear down the registration recorded in the state file.
    Deregister,

    /// List every webhook subscription on the remote service.
    #[command(alias = "subs")]
    Subscriptions,

    /// Show the local state record.
    State,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Flags describing the registration a node wants.
#[derive(Args)]
pub struct RegistrationArgs {
    /// Callback URL the remote service should deliver events to.
    #[arg(long)]
    pub url: String,

    /// Event name to subscribe to (repeatable).
    #[arg(long = "event", required = true)]
    pub events: Vec<String>,

    /// Require the remote event set to equal the desired set exactly,
    /// instead of accepting any superset.
    #[arg(long)]
    pub exact: bool,
}

impl RegistrationArgs {
    /// The registration these flags describe.
    pub fn desired(&self) -> DesiredRegistration {
        DesiredRegistration::new(self.url.as_str(), self.events.iter().map(String::as_str))
    }

    pub fn event_match(&self) -> EventMatch {
        if self.exact {
            EventMatch::Exact
        } else {
            EventMatch::Superset
        }
    }
}
