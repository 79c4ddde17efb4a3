//! The `bloomquiz leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;

use bloomquiz_core::leaderboard::LeaderboardEntry;
use bloomquiz_core::service::LeaderboardService;
use bloomquiz_store::config::{create_store, load_config_from};

pub async fn execute(limit: Option<usize>, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = create_store(&config.store)?;
    let service =
        LeaderboardService::new(store).with_display_cap(limit.unwrap_or(config.display_cap));

    let entries = service.top().await;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        "text" => print_table(&entries),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_table(entries: &[LeaderboardEntry]) {
    use comfy_table::{Cell, Table};

    if entries.is_empty() {
        println!("No scores yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Name", "Score", "Accuracy", "Date"]);

    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.name),
            Cell::new(entry.score),
            Cell::new(format!("{:.0}%", entry.percent)),
            Cell::new(entry.date.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
}
