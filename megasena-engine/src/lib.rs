pub mod config;
pub mod error;
pub mod generator;
pub mod selector;
pub mod stats;
pub mod validator;

pub use config::{FocusMode, GeneratorConfig};
pub use error::EngineError;
pub use generator::{generate, validate_history, Combination, ComboGenerator, GenerationRequest};
pub use stats::HistoryStats;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, NaiveDate};
    use megasena_db::models::Draw;
    use rand::rngs::StdRng;
    use rand::seq::IndexedRandom;
    use rand::SeedableRng;

    pub fn draw(contest: u32, numbers: [u8; 6]) -> Draw {
        let first = NaiveDate::from_ymd_opt(1996, 3, 11).unwrap();
        Draw {
            contest,
            date: first + Duration::days(7 * contest as i64),
            numbers,
            winners: 0,
        }
    }

    /// `n` pseudo-random draws with contests 1..=n.
    pub fn sample_history(n: usize) -> Vec<Draw> {
        let mut rng = StdRng::seed_from_u64(7);
        let range: Vec<u8> = (1..=60).collect();
        (1..=n as u32)
            .map(|contest| {
                let mut numbers = [0u8; 6];
                for (slot, &num) in numbers.iter_mut().zip(range.choose_multiple(&mut rng, 6)) {
                    *slot = num;
                }
                draw(contest, numbers)
            })
            .collect()
    }
}
