use anyhow::{Context, Result};
use std::path::Path;

use megasena_engine::Combination;

pub const DEFAULT_EXPORT_FILE: &str = "apostas_geradas.csv";

/// One bet per line, numbers comma-separated, no header.
pub fn write_bets(path: &Path, bets: &[Combination]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot create {:?}", path))?;

    for bet in bets {
        writer
            .write_record(bet.numbers().iter().map(|n| n.to_string()))
            .context("Write failed")?;
    }
    writer.flush().context("Flush failed")?;
    log::info!("{} bet(s) written to {}", bets.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena_db::models::Draw;
    use megasena_engine::{ComboGenerator, GeneratorConfig};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_write_bets_one_line_per_bet() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let draws: Vec<Draw> = [[4, 15, 23, 38, 42, 59], [1, 8, 17, 26, 33, 50], [7, 12, 29, 36, 44, 51]]
            .into_iter()
            .zip(1u32..)
            .map(|(numbers, contest)| Draw { contest, date, numbers, winners: 0 })
            .collect();
        let config = GeneratorConfig { count: 8, ..Default::default() };
        let generator = ComboGenerator::new(&draws, config).unwrap();
        let bets = generator.generate_batch(3, &mut StdRng::seed_from_u64(1)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        write_bets(&path, &bets).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, bet) in lines.iter().zip(&bets) {
            let parsed: Vec<u8> = line.split(',').map(|s| s.parse().unwrap()).collect();
            assert_eq!(parsed, bet.numbers());
        }
    }
}
