//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::engine::CORRECT_TO_ADVANCE;
use crate::model::{OptionKey, Question, QuestionBank, LEVEL_COUNT};

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    level: u8,
    #[serde(default)]
    category: String,
    prompt: String,
    options: Vec<String>,
    answer: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    reference: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| -> Result<Question> {
            let number = i + 1;
            anyhow::ensure!(
                (1..=LEVEL_COUNT).contains(&q.level),
                "question {number}: level must be between 1 and {LEVEL_COUNT}, got {}",
                q.level
            );

            let answer: OptionKey = q
                .answer
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {number}: {e}"))?;

            let options: [String; 4] = q.options.try_into().map_err(|opts: Vec<String>| {
                anyhow::anyhow!(
                    "question {number}: expected exactly 4 options, got {}",
                    opts.len()
                )
            })?;

            Ok(Question {
                level: q.level,
                category: q.category,
                prompt: q.prompt,
                options,
                answer,
                explanation: q.explanation,
                reference: q.reference,
            })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid question bank: {}", source_path.display()))?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question banks from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load one bank file, or every bank under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_question_bank(path)?])
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// 1-based position of the question in the file (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for issues that would spoil a game.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Levels that cannot be cleared without repeating questions
    for (i, count) in bank.level_counts().iter().enumerate() {
        let level = i + 1;
        if *count == 0 {
            warnings.push(ValidationWarning {
                question: None,
                message: format!("level {level} has no questions; the game cannot be completed"),
            });
        } else if *count < CORRECT_TO_ADVANCE as usize {
            warnings.push(ValidationWarning {
                question: None,
                message: format!(
                    "level {level} has only {count} question(s); questions will repeat"
                ),
            });
        }
    }

    for (i, q) in bank.questions.iter().enumerate() {
        let number = Some(i + 1);

        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: number,
                message: "prompt is empty".into(),
            });
        }

        if q.options.iter().any(|o| o.trim().is_empty()) {
            warnings.push(ValidationWarning {
                question: number,
                message: "an option is empty".into(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        if !q.options.iter().all(|o| seen.insert(o.trim())) {
            warnings.push(ValidationWarning {
                question: number,
                message: "two options have the same text".into(),
            });
        }

        if q.explanation.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: number,
                message: "no explanation given".into(),
            });
        }
    }

    // Duplicate prompts within a level
    let mut seen_prompts = std::collections::HashSet::new();
    for (i, q) in bank.questions.iter().enumerate() {
        if !q.prompt.trim().is_empty() && !seen_prompts.insert((q.level, q.prompt.trim())) {
            warnings.push(ValidationWarning {
                question: Some(i + 1),
                message: format!("duplicate prompt in level {}", q.level),
            });
        }
    }

    warnings
}
