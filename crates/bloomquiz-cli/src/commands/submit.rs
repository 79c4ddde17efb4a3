//! The `bloomquiz submit` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use bloomquiz_core::leaderboard::Submission;
use bloomquiz_core::service::LeaderboardService;
use bloomquiz_store::config::{create_store, load_config_from};

pub async fn execute(
    name: String,
    score: f64,
    percent: f64,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = create_store(&config.store)?;
    let service = LeaderboardService::new(store).with_display_cap(config.display_cap);

    let entry = service
        .submit(&Submission::new(name, score, percent), Utc::now())
        .await
        .context("failed to submit score")?;

    println!(
        "Saved {} with {} points ({:.0}%) to the {} leaderboard.",
        entry.name,
        entry.score,
        entry.percent,
        service.store_name()
    );

    Ok(())
}
