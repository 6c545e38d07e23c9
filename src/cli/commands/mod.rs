//! CLI command implementations.

mod list;
mod register;
mod status;
mod watch;

pub use list::run_list;
pub use register::run_registration_command;
pub use status::run_status;
pub use watch::run_watch;

use crate::client::{ContestApiClient, EnvIdentity, Identity};
use crate::config::Config;
use crate::contest::{Contest, ContestView};
use crate::telemetry::{self, LogHandle};
use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use std::path::Path;

/// Loaded config, logging and a backend client for one command invocation.
pub(crate) struct Session {
    pub config: Config,
    pub api: ContestApiClient<EnvIdentity>,
    _log: LogHandle,
}

impl Session {
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            // Config::load_from_env picks this up.
            env::set_var("ARENA_CONFIG", path.display().to_string());
        }
        let config = Config::load_from_env()?;
        let log = telemetry::init_tracing(config.telemetry.log_level.as_deref())?;
        let identity = EnvIdentity::new(config.auth.user.clone(), config.auth.token_env.clone());
        let api = ContestApiClient::from_config(&config.api, identity)?;
        tracing::debug!(base_url = %api.base_url(), "session opened");
        Ok(Self {
            config,
            api,
            _log: log,
        })
    }

    pub async fn fetch(&self, contest_id: &str) -> Result<Contest> {
        self.api
            .get_contest(contest_id)
            .await
            .with_context(|| format!("failed to load contest {contest_id}"))
    }

    pub fn view(&self, contest: &Contest) -> Result<ContestView> {
        ContestView::new(contest, self.api.identity().is_authenticated())
            .with_context(|| format!("contest {} has an invalid schedule", contest.id))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("encode JSON output")?;
    println!("{rendered}");
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
