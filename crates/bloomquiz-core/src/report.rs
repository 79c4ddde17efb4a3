//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{GameState, Phase};
use crate::model::QuestionBank;

/// Record of one finished (or abandoned) quiz session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Bank the questions came from.
    pub bank: BankSummary,
    /// Name the player entered, if any.
    #[serde(default)]
    pub player: Option<String>,
    /// How the session ended.
    pub outcome: Phase,
    /// Score as shown to the player.
    pub score: u32,
    pub accuracy_percent: f64,
    pub average_response_secs: f64,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Engine state at the end of the session, answer log included.
    pub final_state: GameState,
}

/// Summary of a question bank (without the questions themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl From<&QuestionBank> for BankSummary {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id.clone(),
            name: bank.name.clone(),
            question_count: bank.questions.len(),
        }
    }
}

impl SessionReport {
    /// Build a report from the state a session ended in.
    pub fn new(
        bank: &QuestionBank,
        player: Option<String>,
        state: &GameState,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let duration_ms = state
            .start_time()
            .and_then(|start| (finished_at - start).to_std().ok())
            .map_or(0, |d| d.as_millis() as u64);

        Self {
            id: Uuid::new_v4(),
            created_at: finished_at,
            bank: bank.into(),
            player,
            outcome: state.phase(),
            score: state.score(),
            accuracy_percent: state.accuracy_percent(),
            average_response_secs: state.average_response_secs(),
            duration_ms,
            final_state: state.clone(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Plain-text summary for the end-of-game screen.
    pub fn summary(&self) -> String {
        let headline = match self.outcome {
            Phase::Completed => "Quiz completed!".to_string(),
            Phase::GameOver => format!("Game over at level {}.", self.final_state.current_level()),
            other => format!("Session {other}."),
        };
        format!(
            "{headline}\nScore: {}\nCorrect answers: {}/{} ({:.0}%)\nTotal time: {:.1}s\nAverage time per question: {:.1}s",
            self.score,
            self.final_state.correct_answers(),
            self.final_state.questions_answered(),
            self.accuracy_percent,
            self.final_state.total_response_secs(),
            self.average_response_secs,
        )
    }
}
