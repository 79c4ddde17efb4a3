//! Per-answer scoring.
//!
//! A correct answer is worth a flat base plus a speed bonus that decays
//! linearly to zero over the response window. Incorrect answers score nothing.

/// Points for any correct answer.
pub const BASE_POINTS: u32 = 100;

/// Largest possible speed bonus, awarded for an instant answer.
pub const MAX_SPEED_BONUS: f64 = 50.0;

/// Response time in seconds at which the speed bonus reaches zero.
pub const SPEED_WINDOW_SECS: f64 = 30.0;

/// Speed bonus for a correct answer given in `response_secs`.
///
/// Negative and NaN times count as instant.
pub fn speed_bonus(response_secs: f64) -> u32 {
    let t = response_secs.max(0.0);
    let bonus = (MAX_SPEED_BONUS * (1.0 - t / SPEED_WINDOW_SECS)).max(0.0);
    bonus.round() as u32
}

/// Points awarded for one answer.
pub fn score(is_correct: bool, response_secs: f64) -> u32 {
    if !is_correct {
        return 0;
    }
    BASE_POINTS + speed_bonus(response_secs)
}

/// Percentage of correct answers, 0 when nothing was answered.
pub fn accuracy_percent(correct: u32, answered: u32) -> f64 {
    if answered == 0 {
        return 0.0;
    }
    (correct as f64 * 100.0 / answered as f64).min(100.0)
}
