//! The `bloomquiz play` command.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;

use bloomquiz_core::deck::Deck;
use bloomquiz_core::engine::{GameState, Transition};
use bloomquiz_core::leaderboard::Submission;
use bloomquiz_core::model::{OptionKey, QuestionBank, LEVEL_COUNT};
use bloomquiz_core::parser;
use bloomquiz_core::report::SessionReport;
use bloomquiz_core::service::LeaderboardService;
use bloomquiz_store::config::{create_store, load_config_from, QuizConfig};

pub async fn execute(
    bank_path: Option<PathBuf>,
    name: Option<String>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank_path = bank_path.unwrap_or_else(|| config.question_bank.clone());
    let bank = load_bank(&bank_path)?;

    let seed = seed.unwrap_or_else(rand::random);
    let deck = Deck::seeded(&bank, seed);
    let empty = deck.empty_levels();
    anyhow::ensure!(
        empty.is_empty(),
        "question bank '{}' has no questions for level(s) {:?}",
        bank.id,
        empty
    );
    tracing::info!(bank = %bank.id, seed, "starting game");

    println!("{} ({} questions)", bank.name, bank.questions.len());
    println!("Answer with A, B, C or D. Two wrong answers in a row, or three in total, end the game.");

    let state = {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        play_session(&deck, &mut stdin.lock(), &mut stdout.lock())?
    };

    let report = SessionReport::new(&bank, name.clone(), &state, Utc::now());
    println!("\n{}", report.summary());

    if let Some(path) = output {
        report.save_json(&path)?;
        println!("Report saved to {}", path.display());
    }

    match name {
        Some(name) if state.is_terminal() => submit_score(&config, &name, &state).await?,
        Some(_) => println!("Game not finished; score not submitted."),
        None => {}
    }

    Ok(())
}

/// Load one bank, or merge every bank found under a directory.
fn load_bank(path: &Path) -> Result<QuestionBank> {
    let mut banks = parser::load_banks(path)?;
    match banks.len() {
        0 => anyhow::bail!("no question banks found in {}", path.display()),
        1 => Ok(banks.remove(0)),
        _ => Ok(QuestionBank {
            id: banks.iter().map(|b| b.id.as_str()).collect::<Vec<_>>().join("+"),
            name: banks.iter().map(|b| b.name.as_str()).collect::<Vec<_>>().join(", "),
            description: String::new(),
            questions: banks.into_iter().flat_map(|b| b.questions).collect(),
        }),
    }
}

/// Run one game over line-based input until it ends or input runs out.
fn play_session<R: BufRead, W: Write>(
    deck: &Deck,
    input: &mut R,
    out: &mut W,
) -> Result<GameState> {
    let mut state = GameState::new();
    state.start(Utc::now());

    while state.is_playing() {
        let question = deck
            .question(state.current_level(), state.current_question_index())
            .with_context(|| format!("no question available for level {}", state.current_level()))?;

        writeln!(
            out,
            "\nLevel {}/{LEVEL_COUNT} | score {} | {:.0}% done",
            state.current_level(),
            state.score(),
            state.progress_percent()
        )?;
        if question.category.is_empty() {
            writeln!(out, "{}", question.prompt)?;
        } else {
            writeln!(out, "[{}] {}", question.category, question.prompt)?;
        }
        for key in OptionKey::ALL {
            writeln!(out, "  {key}) {}", question.option(key))?;
        }

        let asked = Instant::now();
        let Some(selected) = read_choice(input, out)? else {
            writeln!(out, "\nNo more input; leaving the game.")?;
            break;
        };
        let response_secs = asked.elapsed().as_secs_f64();

        let correct = question.is_correct(selected);
        let outcome = state.answer(selected, response_secs, correct)?;
        if correct {
            writeln!(out, "Correct! +{} points", outcome.points)?;
        } else {
            writeln!(
                out,
                "Wrong. The answer was {}) {}",
                question.answer,
                question.option(question.answer)
            )?;
        }
        if !question.explanation.is_empty() {
            writeln!(out, "  {}", question.explanation)?;
        }
        if !question.reference.is_empty() {
            writeln!(out, "  Source: {}", question.reference)?;
        }

        if outcome.transition == Transition::GameOver {
            break;
        }
        if let Transition::LevelUp { level } = state.next_question()? {
            writeln!(out, "\nLevel {} cleared! On to level {level}.", level - 1)?;
        }
    }

    Ok(state)
}

/// Prompt until a valid option is read. `None` on end of input.
fn read_choice<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<OptionKey>> {
    loop {
        write!(out, "Your answer: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.parse::<OptionKey>() {
            Ok(key) => return Ok(Some(key)),
            Err(e) => writeln!(out, "{e}; please answer A, B, C or D.")?,
        }
    }
}

async fn submit_score(config: &QuizConfig, name: &str, state: &GameState) -> Result<()> {
    let store = create_store(&config.store)?;
    let service = LeaderboardService::new(store).with_display_cap(config.display_cap);

    let Some(rank) = service.rank_of(u64::from(state.score())).await else {
        println!(
            "A score of {} does not make the top {}; not submitted.",
            state.score(),
            service.display_cap()
        );
        return Ok(());
    };

    let submission = Submission::new(name, f64::from(state.score()), state.accuracy_percent());
    match service.submit(&submission, Utc::now()).await {
        Ok(entry) => {
            println!("Saved to the leaderboard as {} (#{rank}).", entry.name);
            Ok(())
        }
        Err(e) if e.is_retryable() => {
            eprintln!("Could not save your score: {e}");
            eprintln!(
                "Try again later with: bloomquiz submit --name \"{name}\" --score {} --percent {:.1}",
                state.score(),
                state.accuracy_percent()
            );
            Ok(())
        }
        Err(e) => Err(e).context("leaderboard refused the score"),
    }
}
