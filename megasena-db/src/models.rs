use chrono::{Datelike, NaiveDate};
use thiserror::Error;

pub const NUM_MIN: u8 = 1;
pub const NUM_MAX: u8 = 60;
pub const POOL_SIZE: usize = NUM_MAX as usize;
pub const DRAW_SIZE: usize = 6;

/// First year the year-end special draw was held on 31 December.
pub const VIRADA_FIRST_YEAR: i32 = 2008;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub contest: u32,
    pub date: NaiveDate,
    pub numbers: [u8; DRAW_SIZE],
    pub winners: u32,
}

impl Draw {
    pub fn sorted_numbers(&self) -> [u8; DRAW_SIZE] {
        let mut sorted = self.numbers;
        sorted.sort_unstable();
        sorted
    }

    /// Mega da Virada: the 31 December draw, held since 2008.
    pub fn is_virada(&self) -> bool {
        self.date.month() == 12 && self.date.day() == 31 && self.date.year() >= VIRADA_FIRST_YEAR
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("expected {expected} numbers, found {found}")]
    WrongCount { expected: usize, found: usize },
    #[error("number {0} out of range (1-60)")]
    OutOfRange(u8),
    #[error("duplicate number: {0}")]
    Duplicate(u8),
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub staleness: u32,
}

/// Checks the draw invariant: exactly six distinct numbers in 1..=60.
pub fn validate_numbers(numbers: &[u8]) -> Result<[u8; DRAW_SIZE], DrawError> {
    if numbers.len() != DRAW_SIZE {
        return Err(DrawError::WrongCount {
            expected: DRAW_SIZE,
            found: numbers.len(),
        });
    }
    let mut seen = [false; POOL_SIZE + 1];
    for &n in numbers {
        if !(NUM_MIN..=NUM_MAX).contains(&n) {
            return Err(DrawError::OutOfRange(n));
        }
        if seen[n as usize] {
            return Err(DrawError::Duplicate(n));
        }
        seen[n as usize] = true;
    }
    let mut out = [0u8; DRAW_SIZE];
    out.copy_from_slice(numbers);
    Ok(out)
}

pub fn validate_draw(draw: &Draw) -> Result<(), DrawError> {
    validate_numbers(&draw.numbers).map(|_| ())
}

/// Keeps only the year-end special draws, preserving order.
pub fn filter_virada(draws: &[Draw]) -> Vec<Draw> {
    draws.iter().filter(|d| d.is_virada()).cloned().collect()
}
