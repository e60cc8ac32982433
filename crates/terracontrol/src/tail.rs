//! Plain terminal view of the live log.

use crate::signals::wait_for_shutdown;
use owo_colors::OwoColorize;
use panel_core::log::{BadgeStyle, RowStyle};
use panel_core::{LiveLogClient, LogItem, PanelConfig};
use tokio::sync::mpsc;
use tracing::info;

/// Streams the server log to stdout until the feed closes or a shutdown
/// signal arrives.
pub async fn run_tail(config: &PanelConfig) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<LogItem>();
    let client = LiveLogClient::new(config.base_url.clone());
    let feed = tokio::spawn(async move { client.run(&tx).await });

    let printer = async {
        while let Some(item) = rx.recv().await {
            println!("{}", render_item(&item));
        }
    };

    tokio::select! {
        _ = printer => {}
        result = wait_for_shutdown() => {
            result?;
            info!("🛑 Stopping log tail");
        }
    }

    feed.abort();
    if let Ok(lines) = feed.await {
        info!("📊 {} log lines received", lines);
    }
    Ok(())
}

/// Formats one log item with a coloured badge.
pub fn render_item(item: &LogItem) -> String {
    match item {
        LogItem::Notice(text) => text.bold().to_string(),
        LogItem::Entry(entry) => {
            let badge = format!("[{}]", entry.badge.label);
            let badge = match entry.badge.style {
                BadgeStyle::Brand => badge.blue().bold().to_string(),
                BadgeStyle::Info => badge.cyan().bold().to_string(),
                BadgeStyle::Success => badge.green().bold().to_string(),
                BadgeStyle::Warning => badge.yellow().bold().to_string(),
                BadgeStyle::Error => badge.red().bold().to_string(),
            };
            let text = match entry.row {
                Some(RowStyle::Warn) => entry.text.yellow().to_string(),
                Some(RowStyle::Error) => entry.text.red().to_string(),
                Some(RowStyle::Info) | None => entry.text.clone(),
            };
            format!("{badge} {text}")
        }
    }
}
