use std::collections::HashSet;
use std::fmt;

use megasena_db::models::{Draw, DRAW_SIZE, NUM_MAX, NUM_MIN};

/// Slack on the odd-ratio bounds so exact boundary fractions stay inclusive.
const RATIO_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    WrongSize,
    OddRatio,
    ConsecutiveRun,
    HistoricalMatch,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::WrongSize => write!(f, "wrong size"),
            Rejection::OddRatio => write!(f, "odd ratio outside window"),
            Rejection::ConsecutiveRun => write!(f, "consecutive run too long"),
            Rejection::HistoricalMatch => write!(f, "matches a past draw"),
        }
    }
}

/// Inclusive window for the fraction of odd numbers in a combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddWindow {
    pub low: f64,
    pub high: f64,
}

impl OddWindow {
    /// `[ratio * (1 - tolerance), ratio * (1 + tolerance)]`; collapses to `[0, 0]` when ratio is 0.
    pub fn around(ratio: f64, tolerance: f64) -> Self {
        Self {
            low: ratio * (1.0 - tolerance),
            high: ratio * (1.0 + tolerance),
        }
    }

    pub fn contains(&self, fraction: f64) -> bool {
        fraction >= self.low - RATIO_EPSILON && fraction <= self.high + RATIO_EPSILON
    }
}

pub fn odd_fraction(combo: &[u8]) -> f64 {
    if combo.is_empty() {
        return 0.0;
    }
    let odd = combo.iter().filter(|&&n| n % 2 == 1).count();
    odd as f64 / combo.len() as f64
}

/// Length of the longest run of consecutive integers in an ascending slice.
pub fn longest_run(sorted: &[u8]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    let mut longest = 1;
    let mut current = 1;
    for pair in sorted.windows(2) {
        if pair[1] == pair[0] + 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}

fn has_distinct_in_range(sorted: &[u8]) -> bool {
    sorted.iter().all(|n| (NUM_MIN..=NUM_MAX).contains(n)) && sorted.windows(2).all(|w| w[0] < w[1])
}

pub struct CombinationValidator {
    count: usize,
    odd_window: OddWindow,
    max_consecutive: usize,
    history: HashSet<[u8; DRAW_SIZE]>,
}

impl CombinationValidator {
    pub fn new(
        draws: &[Draw],
        count: usize,
        odd_ratio: f64,
        odd_tolerance: f64,
        max_consecutive: usize,
    ) -> Self {
        Self {
            count,
            odd_window: OddWindow::around(odd_ratio, odd_tolerance),
            max_consecutive,
            history: draws.iter().map(|d| d.sorted_numbers()).collect(),
        }
    }

    pub fn odd_window(&self) -> OddWindow {
        self.odd_window
    }

    /// A combination equal to a past draw's set. Only a six-number combination
    /// can match; larger ones never do.
    pub fn matches_history(&self, sorted: &[u8]) -> bool {
        <[u8; DRAW_SIZE]>::try_from(sorted)
            .map(|key| self.history.contains(&key))
            .unwrap_or(false)
    }

    /// Runs every check on an ascending combination, reporting the first failure.
    pub fn check(&self, sorted: &[u8]) -> Result<(), Rejection> {
        if sorted.len() != self.count || !has_distinct_in_range(sorted) {
            return Err(Rejection::WrongSize);
        }
        if !self.odd_window.contains(odd_fraction(sorted)) {
            return Err(Rejection::OddRatio);
        }
        if longest_run(sorted) > self.max_consecutive {
            return Err(Rejection::ConsecutiveRun);
        }
        if self.matches_history(sorted) {
            return Err(Rejection::HistoricalMatch);
        }
        Ok(())
    }
}
