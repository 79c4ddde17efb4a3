//! Game progression state machine.
//!
//! A [`GameState`] is owned by exactly one session. Answer events go through
//! [`GameState::answer`], question advancement through
//! [`GameState::next_question`]; both are rejected once the game has ended.
//!
//! ```text
//! Idle --start--> Playing --answer--> GameOver
//!                    |
//!                    +--next_question--> (level up, stays Playing) | Completed
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{OptionKey, LEVEL_COUNT};
use crate::scoring::{self, accuracy_percent};

/// Correct answers needed in a level to clear it.
pub const CORRECT_TO_ADVANCE: u32 = 5;

/// Total wrong answers that end the game.
pub const MAX_TOTAL_ERRORS: u32 = 3;

/// Wrong answers in a row that end the game.
pub const MAX_CONSECUTIVE_ERRORS: u32 = 2;

/// Lifecycle phase of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    GameOver,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "not started"),
            Phase::Playing => write!(f, "in progress"),
            Phase::GameOver => write!(f, "over"),
            Phase::Completed => write!(f, "completed"),
        }
    }
}

/// What a transition did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Transition {
    /// The answer was recorded and play continues on the same question.
    Continue,
    /// Moved to the next question of the same level.
    NextQuestion,
    /// Cleared a level; play continues at `level`.
    LevelUp { level: u8 },
    /// Too many errors.
    GameOver,
    /// Cleared the last level.
    Completed,
}

impl Transition {
    pub fn is_terminal(self) -> bool {
        matches!(self, Transition::GameOver | Transition::Completed)
    }
}

/// One recorded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub level: u8,
    pub question_index: usize,
    pub selected: OptionKey,
    pub correct: bool,
    pub response_secs: f64,
    pub points: u32,
}

/// Result of [`GameState::answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Points added to the score by this answer.
    pub points: u32,
    /// Either [`Transition::Continue`] or [`Transition::GameOver`].
    pub transition: Transition,
}

/// Authoritative state of one quiz session.
///
/// Fields are read through accessors; only the transition methods change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current level, 1..=4.
    current_level: u8,
    /// Index of the current question within the level's sequence.
    current_question_index: usize,
    score: u32,
    total_errors: u32,
    /// Wrong answers since the last correct one.
    consecutive_errors: u32,
    correct_answers: u32,
    questions_answered: u32,
    correct_answers_in_current_level: u32,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
    phase: Phase,
    /// Every answer given this session, oldest first.
    #[serde(default)]
    answers: Vec<AnswerRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_level: 1,
            current_question_index: 0,
            score: 0,
            total_errors: 0,
            consecutive_errors: 0,
            correct_answers: 0,
            questions_answered: 0,
            correct_answers_in_current_level: 0,
            start_time: None,
            phase: Phase::Idle,
            answers: Vec::new(),
        }
    }
}

impl GameState {
    /// A fresh, not yet started game.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new game at level 1, discarding any previous progress.
    pub fn start(&mut self, now: DateTime<Utc>) {
        *self = Self {
            phase: Phase::Playing,
            start_time: Some(now),
            ..Self::default()
        };
        tracing::debug!("game started");
    }

    /// Return to the idle state with every counter zeroed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record an answer to the current question.
    ///
    /// Game over is decided here, before any level advancement: a session
    /// that loses on the answer that would have cleared a level is over.
    pub fn answer(
        &mut self,
        selected: OptionKey,
        response_secs: f64,
        is_correct: bool,
    ) -> Result<AnswerOutcome, EngineError> {
        self.ensure_playing("answer")?;

        let points = scoring::score(is_correct, response_secs);
        self.score += points;
        self.questions_answered += 1;
        if is_correct {
            self.correct_answers += 1;
            self.correct_answers_in_current_level += 1;
            self.consecutive_errors = 0;
        } else {
            self.total_errors += 1;
            self.consecutive_errors += 1;
        }
        self.answers.push(AnswerRecord {
            level: self.current_level,
            question_index: self.current_question_index,
            selected,
            correct: is_correct,
            response_secs,
            points,
        });

        let transition = if self.game_over_reached() {
            self.phase = Phase::GameOver;
            tracing::debug!(
                total_errors = self.total_errors,
                consecutive_errors = self.consecutive_errors,
                score = self.score,
                "game over"
            );
            Transition::GameOver
        } else {
            Transition::Continue
        };

        Ok(AnswerOutcome { points, transition })
    }

    /// Move past the current question, clearing the level when enough
    /// correct answers have been given.
    pub fn next_question(&mut self) -> Result<Transition, EngineError> {
        self.ensure_playing("advance")?;

        if self.correct_answers_in_current_level < CORRECT_TO_ADVANCE {
            self.current_question_index += 1;
            return Ok(Transition::NextQuestion);
        }

        if self.current_level >= LEVEL_COUNT {
            self.phase = Phase::Completed;
            tracing::debug!(score = self.score, "game completed");
            return Ok(Transition::Completed);
        }

        self.current_level += 1;
        self.current_question_index = 0;
        self.correct_answers_in_current_level = 0;
        tracing::debug!(level = self.current_level, "level up");
        Ok(Transition::LevelUp {
            level: self.current_level,
        })
    }

    fn ensure_playing(&self, action: &'static str) -> Result<(), EngineError> {
        if self.phase == Phase::Playing {
            Ok(())
        } else {
            Err(EngineError::NotPlaying {
                action,
                phase: self.phase,
            })
        }
    }

    fn game_over_reached(&self) -> bool {
        self.total_errors >= MAX_TOTAL_ERRORS || self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS
    }

    pub fn current_level(&self) -> u8 {
        self.current_level
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_errors(&self) -> u32 {
        self.total_errors
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    pub fn correct_answers_in_current_level(&self) -> u32 {
        self.correct_answers_in_current_level
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Every answer given this session, oldest first.
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// `true` once the game has ended either way.
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::GameOver | Phase::Completed)
    }

    /// Share of answers that were correct, in percent.
    pub fn accuracy_percent(&self) -> f64 {
        accuracy_percent(self.correct_answers, self.questions_answered)
    }

    /// Position in the nominal 20-question path, in percent.
    pub fn progress_percent(&self) -> f64 {
        if self.is_completed() {
            return 100.0;
        }
        let per_level = CORRECT_TO_ADVANCE as usize;
        let total = per_level * LEVEL_COUNT as usize;
        let levels_done = (self.current_level as usize).saturating_sub(1);
        let done = levels_done * per_level + self.current_question_index;
        (done as f64 * 100.0 / total as f64).min(100.0)
    }

    pub fn total_response_secs(&self) -> f64 {
        self.answers.iter().map(|a| a.response_secs.max(0.0)).sum()
    }

    pub fn average_response_secs(&self) -> f64 {
        if self.answers.is_empty() {
            return 0.0;
        }
        self.total_response_secs() / self.answers.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> GameState {
        let mut state = GameState::new();
        state.start(Utc::now());
        state
    }

    fn right(state: &mut GameState) -> AnswerOutcome {
        state.answer(OptionKey::A, 5.0, true).unwrap()
    }

    fn wrong(state: &mut GameState) -> AnswerOutcome {
        state.answer(OptionKey::B, 5.0, false).unwrap()
    }

    /// Answer five questions correctly, advancing after each one.
    fn clear_level(state: &mut GameState) -> Transition {
        let mut last = Transition::Continue;
        for _ in 0..CORRECT_TO_ADVANCE {
            right(state);
            last = state.next_question().unwrap();
        }
        last
    }

    #[test]
    fn start_resets_everything() {
        let mut state = playing();
        wrong(&mut state);
        right(&mut state);
        state.next_question().unwrap();

        let now = Utc::now();
        state.start(now);
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.current_level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.total_errors, 0);
        assert_eq!(state.questions_answered, 0);
        assert_eq!(state.current_question_index, 0);
        assert!(state.answers.is_empty());
        assert_eq!(state.start_time, Some(now));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut state = playing();
        right(&mut state);
        state.reset();
        assert_eq!(state, GameState::new());
        assert!(!state.is_playing());
        assert!(!state.is_terminal());
    }

    #[test]
    fn three_separated_errors_end_the_game() {
        let mut state = playing();
        wrong(&mut state);
        right(&mut state);
        wrong(&mut state);
        right(&mut state);
        let outcome = wrong(&mut state);
        assert_eq!(outcome.transition, Transition::GameOver);
        assert!(state.is_game_over());
        assert_eq!(state.total_errors, 3);
        assert_eq!(state.consecutive_errors, 1);
    }

    #[test]
    fn two_consecutive_errors_end_the_game() {
        let mut state = playing();
        assert_eq!(wrong(&mut state).transition, Transition::Continue);
        assert_eq!(wrong(&mut state).transition, Transition::GameOver);
        assert!(state.is_game_over());
        assert!(!state.is_playing());
        assert_eq!(state.total_errors, 2);
    }

    #[test]
    fn answers_after_game_over_are_rejected() {
        let mut state = playing();
        wrong(&mut state);
        wrong(&mut state);
        let before = state.clone();

        let err = state.answer(OptionKey::C, 1.0, false).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotPlaying {
                action: "answer",
                phase: Phase::GameOver
            }
        );
        assert!(state.next_question().is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn answers_before_start_are_rejected() {
        let mut state = GameState::new();
        assert!(state.answer(OptionKey::A, 1.0, true).is_err());
        assert!(state.next_question().is_err());
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn correct_answer_resets_the_streak() {
        let mut state = playing();
        wrong(&mut state);
        right(&mut state);
        wrong(&mut state);
        assert_eq!(state.consecutive_errors, 1);
        assert_eq!(state.total_errors, 2);
        assert!(!state.is_game_over());
        assert!(state.consecutive_errors <= state.total_errors);
        assert!(state.correct_answers <= state.questions_answered);
    }

    #[test]
    fn score_accumulates_points() {
        let mut state = playing();
        let first = state.answer(OptionKey::A, 0.0, true).unwrap();
        let second = state.answer(OptionKey::A, 30.0, true).unwrap();
        let third = state.answer(OptionKey::B, 1.0, false).unwrap();
        assert_eq!((first.points, second.points, third.points), (150, 100, 0));
        assert_eq!(state.score, 250);
        assert_eq!(state.answers.len(), 3);
        assert!(!state.answers[2].correct);
    }

    #[test]
    fn next_question_within_level() {
        let mut state = playing();
        right(&mut state);
        assert_eq!(state.next_question().unwrap(), Transition::NextQuestion);
        assert_eq!(state.current_question_index, 1);
        assert_eq!(state.current_level, 1);
    }

    #[test]
    fn five_correct_answers_clear_level_one() {
        let mut state = playing();
        for _ in 0..CORRECT_TO_ADVANCE {
            right(&mut state);
        }
        assert_eq!(
            state.next_question().unwrap(),
            Transition::LevelUp { level: 2 }
        );
        assert_eq!(state.current_level, 2);
        assert_eq!(state.correct_answers_in_current_level, 0);
        assert_eq!(state.current_question_index, 0);
    }

    #[test]
    fn one_error_per_level_still_advances() {
        let mut state = playing();
        wrong(&mut state);
        state.next_question().unwrap();
        assert_eq!(clear_level(&mut state), Transition::LevelUp { level: 2 });
        assert_eq!(state.total_errors, 1);
    }

    #[test]
    fn clearing_level_four_completes_the_game() {
        let mut state = playing();
        for level in 2..=LEVEL_COUNT {
            assert_eq!(clear_level(&mut state), Transition::LevelUp { level });
        }
        assert_eq!(state.current_level, 4);
        assert_eq!(clear_level(&mut state), Transition::Completed);
        assert!(state.is_completed());
        assert!(!state.is_playing());
        assert_eq!(state.correct_answers, 20);
        assert_eq!(state.progress_percent(), 100.0);
        assert!(state.answer(OptionKey::A, 1.0, true).is_err());
    }

    #[test]
    fn game_over_preempts_level_advance() {
        let mut state = playing();
        for _ in 0..CORRECT_TO_ADVANCE {
            right(&mut state);
        }
        wrong(&mut state);
        wrong(&mut state);
        assert!(state.is_game_over());
        assert_eq!(state.correct_answers_in_current_level, CORRECT_TO_ADVANCE);
        assert!(state.next_question().is_err());
        assert_eq!(state.current_level, 1);
    }

    #[test]
    fn derived_metrics() {
        let mut state = playing();
        assert_eq!(state.accuracy_percent(), 0.0);
        assert_eq!(state.average_response_secs(), 0.0);

        state.answer(OptionKey::A, 2.0, true).unwrap();
        state.next_question().unwrap();
        state.answer(OptionKey::A, 4.0, true).unwrap();
        state.next_question().unwrap();
        state.answer(OptionKey::B, 6.0, false).unwrap();
        state.next_question().unwrap();
        state.answer(OptionKey::A, 8.0, true).unwrap();

        assert_eq!(state.accuracy_percent(), 75.0);
        assert_eq!(state.total_response_secs(), 20.0);
        assert_eq!(state.average_response_secs(), 5.0);
        assert_eq!(state.progress_percent(), 15.0);
    }

    #[test]
    fn state_serde_roundtrip() {
        let mut state = playing();
        right(&mut state);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"phase\":\"playing\""));
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn progress_tolerates_a_loaded_level_zero() {
        let mut json = serde_json::to_value(playing()).unwrap();
        json["current_level"] = serde_json::json!(0);
        let loaded: GameState = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.current_level(), 0);
        assert_eq!(loaded.progress_percent(), 0.0);
    }
}
