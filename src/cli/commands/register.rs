//! Register / unregister commands - one gate invocation each.

use super::{print_json, Session};
use crate::cli::args::RegistrationArgs;
use crate::client::Identity;
use crate::contest::{run_registration, GateError, GateOutcome, RegistrationAction};
use crate::time::{Clock, SystemClock};
use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

pub async fn run_registration_command(
    config: Option<PathBuf>,
    args: RegistrationArgs,
    action: RegistrationAction,
) -> Result<()> {
    let session = Session::open(config.as_deref())?;
    let contest = session.fetch(&args.contest).await?;
    let view = session.view(&contest)?.shared();
    let outcome = run_registration(&view, &session.api, action, SystemClock.now_ms())
        .await
        .ok_or_else(|| anyhow!("contest view closed before the request finished"))?;
    match outcome {
        Ok(outcome) if args.json => print_json(&outcome),
        Ok(outcome) => {
            print_outcome(&contest.name, &outcome);
            Ok(())
        }
        Err(GateError::NotPermitted(_)) => {
            let access = view.lock().derive_at(SystemClock.now_ms());
            bail!(
                "cannot {} now: registration is {}{}",
                action.as_str(),
                access.registration_phase,
                if session.api.identity().is_authenticated() {
                    ""
                } else {
                    " and no user is signed in"
                }
            )
        }
        Err(GateError::Rejected(kind)) => {
            tracing::debug!(kind = kind.as_str(), retryable = kind.is_retryable(), "gate rejected");
            bail!("{}", kind.user_message())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_outcome(name: &str, outcome: &GateOutcome) {
    if let Some(notice) = outcome.notice {
        println!("{}", notice.message());
    }
    match outcome.action {
        RegistrationAction::Register => println!("registered for {name}"),
        RegistrationAction::Unregister => println!("unregistered from {name}"),
    }
}
