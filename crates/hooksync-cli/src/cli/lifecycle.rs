//! Lifecycle commands: check, register, deregister.
//!
//! `register` follows the host activation contract: an existence probe
//! first, a create only when the probe reports absent.

use anyhow::{Result, bail};
use console::style;

use hooksync_core::state::StateStore;
use hooksync_types::subscription::EventMatch;

use crate::app::App;
use crate::cli::RegistrationArgs;

/// Report whether the desired registration already exists remotely.
pub async fn check(app: &App, registration: &RegistrationArgs, json: bool) -> Result<()> {
    let desired = registration.desired();
    let controller = app.controller(registration.event_match());
    let exists = controller.exists_check(&desired).await;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "exists": exists,
                "url": desired.url,
                "events": desired.events,
            })
        );
    } else if exists {
        println!(
            "  {} Registration already present remotely",
            style("✓").green().bold()
        );
    } else {
        println!(
            "  {} No matching subscription on the remote service",
            style("✗").red()
        );
    }

    Ok(())
}

/// Ensure the desired registration exists, creating it when absent.
pub async fn register(app: &App, registration: &RegistrationArgs, json: bool) -> Result<()> {
    let desired = registration.desired();
    let controller = app.controller(registration.event_match());

    if controller.exists_check(&desired).await {
        let state = app.store().load().await?;
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "registered": true,
                    "created": false,
                    "id": state.webhook_id,
                })
            );
        } else {
            println!(
                "  {} Already registered{}",
                style("✓").green().bold(),
                match &state.webhook_id {
                    Some(id) => format!(" as {}", style(id).cyan()),
                    None => String::new(),
                }
            );
        }
        return Ok(());
    }

    if !controller.create_registration(&desired).await {
        bail!("failed to register the webhook subscription (rerun with -v for details)");
    }

    let state = app.store().load().await?;
    if json {
        println!(
            "{}",
            serde_json::json!({
                "registered": true,
                "created": true,
                "id": state.webhook_id,
            })
        );
    } else {
        println!(
            "  {} Registered webhook subscription{}",
            style("✓").green().bold(),
            match &state.webhook_id {
                Some(id) => format!(" {}", style(id).cyan()),
                None => String::new(),
            }
        );
    }

    Ok(())
}

/// Tear down the registration recorded in the state file.
pub async fn deregister(app: &App, json: bool) -> Result<()> {
    let controller = app.controller(EventMatch::default());
    let recorded = app.store().load().await?.webhook_id;

    if !controller.delete_registration().await {
        bail!("failed to deregister the webhook subscription (rerun with -v for details)");
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "deregistered": true,
                "id": recorded,
            })
        );
    } else {
        match recorded {
            Some(id) => println!(
                "  {} Deregistered subscription {}",
                style("✓").green().bold(),
                style(id).cyan()
            ),
            None => println!(
                "  {} No subscription was recorded; nothing to remove",
                style("i").blue().bold()
            ),
        }
    }

    Ok(())
}
