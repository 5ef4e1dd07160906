//! Frecency scoring for prompt usage
//!
//! Combines frequency (how often) and recency (how recently) a prompt was
//! inserted. Scores decay exponentially with a configurable half-life and
//! each use adds 1 to the decayed score:
//!
//! `score = score * 2^(-days_since_last_use / half_life_days) + 1`
//!
//! With the default 7-day half-life a prompt used once a week ago scores
//! 0.5, and one used twice today scores about 2.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::DEFAULT_HALF_LIFE_DAYS;
use crate::prompts::Prompt;

/// Seconds in a day for timestamp calculations
const SECONDS_PER_DAY: f64 = 86400.0;

/// Frecency calculator bound to a half-life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frecency {
    half_life_days: f64,
}

impl Default for Frecency {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_LIFE_DAYS)
    }
}

impl Frecency {
    pub fn new(half_life_days: f64) -> Self {
        // Guard against nonsense config (zero or negative half-life)
        let half_life_days = if half_life_days.is_finite() {
            half_life_days.max(0.001)
        } else {
            DEFAULT_HALF_LIFE_DAYS
        };
        Self { half_life_days }
    }

    pub fn half_life_days(&self) -> f64 {
        self.half_life_days
    }

    /// Decay multiplier for time elapsed between `since` and `now`.
    ///
    /// Clock skew (a `since` in the future) is treated as no elapsed time.
    pub fn decay_factor(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let seconds = (now - since).num_seconds().max(0);
        let days = seconds as f64 / SECONDS_PER_DAY;
        // True half-life decay: 2^(-days/hl) == e^(-ln(2) * days/hl)
        (-std::f64::consts::LN_2 * days / self.half_life_days).exp()
    }

    /// Stored score decayed to `now` without recording a use.
    pub fn live_score(&self, prompt: &Prompt, now: DateTime<Utc>) -> f64 {
        match prompt.last_used {
            Some(last) => prompt.frecency_score * self.decay_factor(last, now),
            None => 0.0,
        }
    }

    /// Record an insertion of `prompt` at `now`.
    ///
    /// Bumps the usage count, moves `last_used` forward and recomputes the score.
    pub fn record_use(&self, prompt: &mut Prompt, now: DateTime<Utc>) {
        let decayed = self.live_score(prompt, now);
        prompt.frecency_score = decayed + 1.0;
        prompt.usage_count = prompt.usage_count.saturating_add(1);
        prompt.last_used = Some(now);
        prompt.updated_at = now;
        debug!(
            prompt_id = %prompt.id,
            count = prompt.usage_count,
            score = prompt.frecency_score,
            half_life_days = self.half_life_days,
            "Recorded prompt use"
        );
    }
}
