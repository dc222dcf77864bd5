//! Local state record inspection command.

use anyhow::Result;
use console::style;

use hooksync_core::state::StateStore;

use crate::app::App;

/// Print the node state record as it is on disk.
pub async fn show(app: &App, json: bool) -> Result<()> {
    let state = app.store().load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!();
    match &state.webhook_id {
        Some(id) => println!(
            "  {} Registered subscription: {}",
            style("●").green(),
            style(id).cyan()
        ),
        None => println!("  {} No subscription registered", style("○").dim()),
    }
    for (key, value) in &state.extra {
        println!("  {} {} = {}", style("·").dim(), key, style(value).dim());
    }
    println!();

    Ok(())
}
