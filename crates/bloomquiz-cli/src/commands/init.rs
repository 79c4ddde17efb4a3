//! The `bloomquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create bloomquiz.toml
    if std::path::Path::new("bloomquiz.toml").exists() {
        println!("bloomquiz.toml already exists, skipping.");
    } else {
        std::fs::write("bloomquiz.toml", SAMPLE_CONFIG)?;
        println!("Created bloomquiz.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("question-banks")?;
    let example_path = std::path::Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to question-banks/example.toml");
    println!("  2. Run: bloomquiz validate --bank question-banks/example.toml");
    println!("  3. Run: bloomquiz play --bank question-banks/example.toml --name <you>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# bloomquiz configuration

question_bank = "question-banks/example.toml"
display_cap = 10

[store]
type = "file"
path = "bloomquiz-leaderboard.json"

# Shared leaderboard instead:
# [store]
# type = "remote"
# base_url = "https://quiz.example.org"
# api_key = "${BLOOMQUIZ_API_KEY}"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A tiny bank to get started; every level needs at least one question"

[[questions]]
level = 1
category = "Definition"
prompt = "Above which office reading is hypertension diagnosed in adults?"
options = ["120/80 mmHg", "130/80 mmHg", "140/90 mmHg", "160/100 mmHg"]
answer = "C"
explanation = "Office blood pressure of 140/90 mmHg or more, confirmed on repeated visits."
reference = "ESH 2023"

[[questions]]
level = 2
category = "Diagnosis"
prompt = "Which measurement confirms the diagnosis outside the office?"
options = ["Home or ambulatory monitoring", "Resting ECG", "Fundoscopy", "Serum potassium"]
answer = "A"
explanation = "Out-of-office measurement rules out white-coat hypertension."

[[questions]]
level = 3
category = "Treatment"
prompt = "Which combination is a preferred first-line dual therapy?"
options = ["Beta-blocker + alpha-blocker", "ACE inhibitor + ARB", "ACE inhibitor + calcium channel blocker", "Loop diuretic + spironolactone"]
answer = "C"
explanation = "A RAS blocker with a calcium channel blocker or thiazide-like diuretic."

[[questions]]
level = 4
category = "Complications"
prompt = "Which finding defines a hypertensive emergency?"
options = ["Pressure above 180/110 mmHg alone", "Acute target-organ damage", "Headache", "Epistaxis"]
answer = "B"
explanation = "It is the acute organ damage, not the number, that defines the emergency."
"#;
