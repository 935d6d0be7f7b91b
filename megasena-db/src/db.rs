use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;

use crate::models::Draw;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    contest   INTEGER PRIMARY KEY,
    date      TEXT NOT NULL,
    ball_1    INTEGER NOT NULL,
    ball_2    INTEGER NOT NULL,
    ball_3    INTEGER NOT NULL,
    ball_4    INTEGER NOT NULL,
    ball_5    INTEGER NOT NULL,
    ball_6    INTEGER NOT NULL,
    winners   INTEGER NOT NULL DEFAULT 0
);
";

const SELECT_COLUMNS: &str =
    "SELECT contest, date, ball_1, ball_2, ball_3, ball_4, ball_5, ball_6, winners FROM draws";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("megasena.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Cannot open database {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Migration failed")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (contest, date, ball_1, ball_2, ball_3, ball_4, ball_5, ball_6, winners)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.contest,
            draw.date.format(DATE_FORMAT).to_string(),
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.winners,
        ],
    ).context("Insert failed")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    let raw_date: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Draw {
        contest: row.get(0)?,
        date,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        winners: row.get(8)?,
    })
}

/// Full history, oldest contest first.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY contest ASC"))?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Most recent draws, newest first.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY contest DESC LIMIT ?1"))?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(contest: u32, date: &str) -> Draw {
        Draw {
            contest,
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            numbers: [10, 20, 30, 40, 50, 60],
            winners: 0,
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1, "1996-03-11")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw(1, "1996-03-11")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(1, "1996-03-11")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw(3, "1996-03-25")).unwrap();
        insert_draw(&conn, &test_draw(1, "1996-03-11")).unwrap();
        insert_draw(&conn, &test_draw(2, "1996-03-18")).unwrap();

        let all = fetch_all_draws(&conn).unwrap();
        assert_eq!(all.iter().map(|d| d.contest).collect::<Vec<_>>(), vec![1, 2, 3]);

        let last = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].contest, 3);
        assert_eq!(last[1].contest, 2);
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let mut draw = test_draw(2700, "2023-12-31");
        draw.numbers = [21, 24, 33, 41, 48, 56];
        draw.winners = 5;
        insert_draw(&conn, &draw).unwrap();

        let fetched = fetch_all_draws(&conn).unwrap();
        assert_eq!(fetched, vec![draw]);
    }
}
