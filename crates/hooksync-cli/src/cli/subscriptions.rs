//! Remote subscription listing command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use hooksync_core::api::SubscriptionApi;

use crate::app::App;

/// List every webhook subscription the remote service holds.
pub async fn list(app: &App, json: bool) -> Result<()> {
    let subscriptions = app.client().list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&subscriptions)?);
        return Ok(());
    }

    if subscriptions.is_empty() {
        println!();
        println!(
            "  {} No webhook subscriptions on the remote service",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("URL").fg(Color::White),
        Cell::new("Events").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for subscription in &subscriptions {
        let events = subscription
            .events
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(subscription.id.as_str()).fg(Color::Cyan),
            Cell::new(&subscription.url),
            Cell::new(events),
            Cell::new(subscription.created_at.as_deref().unwrap_or("-")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} subscription{}",
        style(subscriptions.len()).bold(),
        if subscriptions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
