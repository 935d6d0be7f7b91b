use megasena_db::models::{Draw, NumberStats, NUM_MAX, NUM_MIN, POOL_SIZE};

/// Per-number counter for 1..=60, stored in a fixed array (index = number - 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberTable {
    values: [u32; POOL_SIZE],
}

pub type FrequencyTable = NumberTable;
pub type StalenessTable = NumberTable;

impl NumberTable {
    pub fn zeroed() -> Self {
        Self { values: [0; POOL_SIZE] }
    }

    pub fn get(&self, number: u8) -> u32 {
        self.values[(number - NUM_MIN) as usize]
    }

    pub fn total(&self) -> u64 {
        self.values.iter().map(|&v| v as u64).sum()
    }

    /// (number, value) pairs in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as u8 + NUM_MIN, v))
    }

    /// Numbers ranked by descending value, ties by ascending number.
    pub fn top_numbers(&self, limit: usize) -> Vec<u8> {
        let mut numbers: Vec<u8> = (NUM_MIN..=NUM_MAX).collect();
        // stable sort keeps ascending numbers within ties
        numbers.sort_by(|&a, &b| self.get(b).cmp(&self.get(a)));
        numbers.truncate(limit);
        numbers
    }

    fn slot(&mut self, number: u8) -> &mut u32 {
        &mut self.values[(number - NUM_MIN) as usize]
    }
}

pub fn compute_frequency(draws: &[Draw]) -> FrequencyTable {
    let mut table = NumberTable::zeroed();
    for draw in draws {
        for &n in &draw.numbers {
            *table.slot(n) += 1;
        }
    }
    table
}

/// Draws must be sorted by ascending contest.
pub fn compute_staleness(draws: &[Draw]) -> StalenessTable {
    let last_contest = draws.iter().map(|d| d.contest).max().unwrap_or(0);

    let mut last_seen: [Option<u32>; POOL_SIZE] = [None; POOL_SIZE];
    for draw in draws {
        for &n in &draw.numbers {
            last_seen[(n - NUM_MIN) as usize] = Some(draw.contest);
        }
    }

    let mut table = NumberTable::zeroed();
    for (i, seen) in last_seen.iter().enumerate() {
        table.values[i] = match seen {
            Some(contest) => last_contest - contest,
            None => last_contest,
        };
    }
    table
}

pub fn compute_odd_ratio(draws: &[Draw]) -> f64 {
    let total = draws.len() * megasena_db::models::DRAW_SIZE;
    if total == 0 {
        return 0.0;
    }
    let odd = draws
        .iter()
        .flat_map(|d| d.numbers.iter())
        .filter(|&&n| n % 2 == 1)
        .count();
    odd as f64 / total as f64
}

#[derive(Debug, Clone)]
pub struct HistoryStats {
    pub frequency: FrequencyTable,
    pub staleness: StalenessTable,
    pub odd_ratio: f64,
    pub draw_count: usize,
    pub last_contest: Option<u32>,
}

impl HistoryStats {
    pub fn compute(draws: &[Draw]) -> Self {
        Self {
            frequency: compute_frequency(draws),
            staleness: compute_staleness(draws),
            odd_ratio: compute_odd_ratio(draws),
            draw_count: draws.len(),
            last_contest: draws.iter().map(|d| d.contest).max(),
        }
    }

    pub fn number_stats(&self) -> Vec<NumberStats> {
        self.frequency
            .iter()
            .zip(self.staleness.iter())
            .map(|((number, frequency), (_, staleness))| NumberStats {
                number,
                frequency,
                staleness,
            })
            .collect()
    }
}
