//! The `bloomquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use bloomquiz_core::parser;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = parser::load_banks(&bank_path)?;
    anyhow::ensure!(
        !banks.is_empty(),
        "no question banks found in {}",
        bank_path.display()
    );

    let mut total_warnings = 0;

    for bank in &banks {
        let [l1, l2, l3, l4] = bank.level_counts();
        println!(
            "Question bank: {} ({} questions; per level {l1}/{l2}/{l3}/{l4})",
            bank.name,
            bank.questions.len()
        );

        let warnings = parser::validate_question_bank(bank);
        for w in &warnings {
            let prefix = w
                .question
                .map(|n| format!("  [question {n}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
