//! Wires CLI flags into the client, store, and controller.

use std::path::PathBuf;

use hooksync_core::controller::LifecycleController;
use hooksync_core::params::{DEFAULT_API_ENDPOINT, NodeParameters};
use hooksync_infra::client::HttpSubscriptionClient;
use hooksync_infra::params::{FileParameters, StaticParameters};
use hooksync_infra::state::FileStateStore;
use hooksync_types::credentials::CredentialSet;
use hooksync_types::error::SubscriptionError;
use hooksync_types::subscription::EventMatch;

use crate::cli::Cli;

/// Parameter source picked from the command line.
#[derive(Clone)]
pub enum ParamSource {
    File(FileParameters),
    Fixed(StaticParameters),
}

impl NodeParameters for ParamSource {
    async fn api_endpoint(&self) -> Result<String, SubscriptionError> {
        match self {
            ParamSource::File(params) => params.api_endpoint().await,
            ParamSource::Fixed(params) => params.api_endpoint().await,
        }
    }

    async fn credentials(&self) -> Result<CredentialSet, SubscriptionError> {
        match self {
            ParamSource::File(params) => params.credentials().await,
            ParamSource::Fixed(params) => params.credentials().await,
        }
    }
}

/// Everything a command handler needs, resolved from global flags.
pub struct App {
    params: ParamSource,
    state_path: PathBuf,
}

impl App {
    /// Build from global CLI flags. A parameter file takes precedence over
    /// the direct --endpoint / --shared-secret flags.
    pub fn from_cli(cli: &Cli) -> Self {
        let params = match &cli.params {
            Some(path) => ParamSource::File(FileParameters::new(path)),
            None => {
                let endpoint = cli
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_owned());
                let mut credentials = CredentialSet::new(cli.scheme.as_str());
                if let Some(secret) = &cli.shared_secret {
                    credentials = credentials.with_field("sharedSecret", secret.as_str());
                }
                ParamSource::Fixed(StaticParameters::new(endpoint, credentials))
            }
        };

        Self {
            params,
            state_path: cli.state_file.clone(),
        }
    }

    pub fn client(&self) -> HttpSubscriptionClient<ParamSource> {
        HttpSubscriptionClient::new(self.params.clone())
    }

    pub fn store(&self) -> FileStateStore {
        FileStateStore::new(&self.state_path)
    }

    pub fn controller(
        &self,
        event_match: EventMatch,
    ) -> LifecycleController<HttpSubscriptionClient<ParamSource>, FileStateStore> {
        LifecycleController::new(self.client(), self.store()).with_event_match(event_match)
    }
}
