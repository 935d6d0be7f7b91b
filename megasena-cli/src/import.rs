use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use megasena_db::rusqlite::Connection;
use std::path::Path;

use megasena_db::db::insert_draw;
use megasena_db::models::{Draw, validate_numbers};

const BALL_COLUMNS: [&str; 6] = ["BOLA1", "BOLA2", "BOLA3", "BOLA4", "BOLA5", "BOLA6"];

/// Column positions resolved from the CSV header.
struct Columns {
    contest: usize,
    date: usize,
    balls: [usize; 6],
    winners: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let require = |name: &str| find(name).with_context(|| format!("Missing column {name}"));

        let mut balls = [0usize; 6];
        for (slot, name) in balls.iter_mut().zip(BALL_COLUMNS) {
            *slot = require(name)?;
        }
        Ok(Self {
            contest: require("CONCURSO")?,
            date: require("DATA_DO_SORTEIO")?,
            balls,
            winners: find("GANHADORES_6_ACERTOS"),
        })
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .with_context(|| format!("Invalid date format: '{}'", raw))
}

fn parse_record(record: &csv::StringRecord, columns: &Columns) -> Result<Draw> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Missing field at index {}", idx))
    };

    let contest = get(columns.contest)?;
    let contest: u32 = contest
        .parse()
        .with_context(|| format!("Cannot parse contest '{}'", contest))?;
    let date = parse_date(get(columns.date)?)?;

    let mut raw = Vec::with_capacity(6);
    for &idx in &columns.balls {
        let s = get(idx)?;
        let n: u8 = s
            .parse()
            .with_context(|| format!("Cannot parse number '{}' (index {})", s, idx))?;
        raw.push(n);
    }
    let numbers = validate_numbers(&raw)
        .with_context(|| format!("Invalid numbers in contest {}", contest))?;

    let winners = match columns.winners.and_then(|idx| record.get(idx)) {
        Some(s) if !s.trim().is_empty() => s.trim().parse().unwrap_or(0),
        _ => 0,
    };

    Ok(Draw {
        contest,
        date,
        numbers,
        winners,
    })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Reads every valid row of `path`. Invalid rows are excluded and counted.
pub fn read_draws(path: &Path) -> Result<(Vec<Draw>, u32)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open {:?}", path))?;

    let headers = reader.headers().context("Cannot read CSV header")?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut draws = Vec::new();
    let mut errors = 0;
    for (line, record_result) in reader.records().enumerate() {
        let parsed = record_result
            .context("Unreadable row")
            .and_then(|record| parse_record(&record, &columns));
        match parsed {
            Ok(draw) => draws.push(draw),
            Err(e) => {
                log::warn!("Skipping row {}: {:#}", line + 1, e);
                errors += 1;
            }
        }
    }
    if draws.is_empty() && errors > 0 {
        bail!("No valid draw in {:?} ({} invalid rows)", path, errors);
    }
    Ok((draws, errors))
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let (draws, errors) = read_draws(path)?;

    let tx = conn.unchecked_transaction()
        .context("Cannot start transaction")?;

    let mut result = ImportResult {
        total_records: draws.len() as u32 + errors,
        inserted: 0,
        skipped: 0,
        errors,
    };

    for draw in &draws {
        match insert_draw(&tx, draw) {
            Ok(true) => result.inserted += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                log::warn!("Insert failed for contest {}: {}", draw.contest, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Commit failed")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena_db::db::{count_draws, migrate};
    use std::io::Write;

    const HEADER: &str = "CONCURSO,DATA_DO_SORTEIO,BOLA1,BOLA2,BOLA3,BOLA4,BOLA5,BOLA6,GANHADORES_6_ACERTOS";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("11/03/1996").unwrap(), NaiveDate::from_ymd_opt(1996, 3, 11).unwrap());
        assert_eq!(parse_date(" 31/12/2023 ").unwrap(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert!(parse_date("2023-12-31").is_err());
    }

    #[test]
    fn test_read_draws_excludes_invalid_rows() {
        let file = write_csv(&[
            "1,11/03/1996,4,5,30,33,41,52,0",
            "2,18/03/1996,9,37,39,41,43,49,1",
            "3,25/03/1996,10,11,29,30,36,36,0",
            "4,01/04/1996,1,5,6,27,42,61,0",
            "5,99/04/1996,1,5,6,27,42,59,0",
            "6,15/04/1996,1,2,6,16,19,46,",
        ]);
        let (draws, errors) = read_draws(file.path()).unwrap();
        assert_eq!(draws.iter().map(|d| d.contest).collect::<Vec<_>>(), vec![1, 2, 6]);
        assert_eq!(errors, 3);
        assert_eq!(draws[1].winners, 1);
        assert_eq!(draws[2].winners, 0);
        assert_eq!(draws[0].numbers, [4, 5, 30, 33, 41, 52]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CONCURSO,DATA_DO_SORTEIO,BOLA1").unwrap();
        writeln!(file, "1,11/03/1996,4").unwrap();
        assert!(read_draws(file.path()).is_err());
    }

    #[test]
    fn test_import_ignores_duplicates() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let file = write_csv(&[
            "1,11/03/1996,4,5,30,33,41,52,0",
            "2,18/03/1996,9,37,39,41,43,49,1",
        ]);

        let first = import_csv(&conn, file.path()).unwrap();
        assert_eq!(first.inserted, 2);
        let second = import_csv(&conn, file.path()).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(count_draws(&conn).unwrap(), 2);
    }
}
