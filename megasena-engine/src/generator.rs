use std::collections::HashMap;
use std::fmt;

use rand::Rng;

use megasena_db::models::{validate_draw, Draw};

use crate::config::{FocusMode, GeneratorConfig};
use crate::error::EngineError;
use crate::selector::{select, RankedPools};
use crate::stats::HistoryStats;
use crate::validator::{CombinationValidator, Rejection};

/// An accepted bet: ascending, distinct numbers in 1..=60.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination(Vec<u8>);

impl Combination {
    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn odd_count(&self) -> usize {
        self.0.iter().filter(|&&n| n % 2 == 1).count()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:02}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub count: usize,
    pub focus: FocusMode,
    pub attempt_cap: u32,
}

/// Rejects the whole history on the first malformed or out-of-order draw.
pub fn validate_history(draws: &[Draw]) -> Result<(), EngineError> {
    let mut previous: Option<u32> = None;
    for draw in draws {
        validate_draw(draw).map_err(|source| EngineError::InvalidDrawData {
            contest: draw.contest,
            source,
        })?;
        if let Some(prev) = previous {
            if draw.contest <= prev {
                return Err(EngineError::UnorderedHistory {
                    previous: prev,
                    contest: draw.contest,
                });
            }
        }
        previous = Some(draw.contest);
    }
    Ok(())
}

/// Rejection-sampling loop over a fixed history.
pub struct ComboGenerator {
    config: GeneratorConfig,
    pools: RankedPools,
    validator: CombinationValidator,
}

impl ComboGenerator {
    pub fn new(draws: &[Draw], config: GeneratorConfig) -> Result<Self, EngineError> {
        config.validate()?;
        validate_history(draws)?;

        let stats = HistoryStats::compute(draws);
        Ok(Self::from_stats(draws, &stats, config))
    }

    /// Builds the generator from precomputed statistics. `config` must already be valid.
    pub fn from_stats(draws: &[Draw], stats: &HistoryStats, config: GeneratorConfig) -> Self {
        let pools = RankedPools {
            top_frequent: stats.frequency.top_numbers(config.pool_depth),
            top_stale: stats.staleness.top_numbers(config.pool_depth),
        };
        let validator = CombinationValidator::new(
            draws,
            config.count,
            stats.odd_ratio,
            config.odd_tolerance,
            config.max_consecutive,
        );
        Self { config, pools, validator }
    }

    pub fn pools(&self) -> &RankedPools {
        &self.pools
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Combination, EngineError> {
        self.generate_excluding(&[], rng)
    }

    /// Like [`generate`](Self::generate), also rejecting any combination in `taken`.
    fn generate_excluding<R: Rng + ?Sized>(
        &self,
        taken: &[Combination],
        rng: &mut R,
    ) -> Result<Combination, EngineError> {
        let mut rejections: HashMap<Rejection, u32> = HashMap::new();

        for attempt in 1..=self.config.attempt_cap {
            let mut combo = select(self.config.count, self.config.focus, &self.pools, rng);
            combo.sort_unstable();

            if let Err(reason) = self.validator.check(&combo) {
                *rejections.entry(reason).or_insert(0) += 1;
                continue;
            }
            if taken.iter().any(|c| c.numbers() == combo.as_slice()) {
                log::debug!("attempt {attempt}: duplicate of an earlier bet");
                continue;
            }

            log::info!("combination accepted after {attempt} attempt(s)");
            if !rejections.is_empty() {
                log::debug!("rejections: {:?}", rejections);
            }
            return Ok(Combination(combo));
        }

        log::warn!(
            "no valid combination after {} attempts (rejections: {:?})",
            self.config.attempt_cap,
            rejections
        );
        Err(EngineError::GenerationExhausted {
            attempts: self.config.attempt_cap,
        })
    }

    /// `bets` distinct combinations; the attempt cap applies to each one.
    pub fn generate_batch<R: Rng + ?Sized>(
        &self,
        bets: usize,
        rng: &mut R,
    ) -> Result<Vec<Combination>, EngineError> {
        let mut accepted = Vec::with_capacity(bets);
        for _ in 0..bets {
            let combo = self.generate_excluding(&accepted, rng)?;
            accepted.push(combo);
        }
        Ok(accepted)
    }
}

/// One-shot entry point: validates inputs, computes statistics, runs the loop.
pub fn generate<R: Rng + ?Sized>(
    draws: &[Draw],
    request: &GenerationRequest,
    rng: &mut R,
) -> Result<Combination, EngineError> {
    let config = GeneratorConfig {
        count: request.count,
        focus: request.focus,
        attempt_cap: request.attempt_cap,
        ..GeneratorConfig::default()
    };
    ComboGenerator::new(draws, config)?.generate(rng)
}
