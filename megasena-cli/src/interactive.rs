use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use megasena_db::models::{Draw, filter_virada};
use megasena_engine::{ComboGenerator, FocusMode, GeneratorConfig, HistoryStats};
use megasena_engine::config::{MAX_COUNT, MIN_COUNT};
use rand::Rng;

use crate::display::{display_bets, display_charts};
use crate::export::{DEFAULT_EXPORT_FILE, write_bets};

pub fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Read error")?;
    Ok(input.trim().to_string())
}

fn confirm(msg: &str) -> Result<bool> {
    let answer = prompt(msg)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "sim"))
}

fn parse_count(input: &str) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (MIN_COUNT..=MAX_COUNT).contains(n))
}

/// Menu answer to focus; anything unrecognised falls back to balanced.
fn parse_focus(input: &str) -> FocusMode {
    match input.trim() {
        "1" => FocusMode::Frequent,
        "2" => FocusMode::Stale,
        other => other.parse().unwrap_or(FocusMode::Balanced),
    }
}

fn prompt_count() -> Result<usize> {
    loop {
        let input = prompt(&format!("How many numbers per bet? ({MIN_COUNT}-{MAX_COUNT}): "))?;
        match parse_count(&input) {
            Some(n) => return Ok(n),
            None => println!("Please enter a value between {MIN_COUNT} and {MAX_COUNT}."),
        }
    }
}

fn prompt_focus() -> Result<FocusMode> {
    let input = prompt("Focus on (1) Frequent, (2) Stale or (3) Balanced numbers? [1/2/3]: ")?;
    Ok(parse_focus(&input))
}

/// Guided flow: history scope, bet size, optional charts, focus, generation, export.
pub fn run<R: Rng>(all_draws: &[Draw], base: GeneratorConfig, rng: &mut R) -> Result<()> {
    let scope = prompt("Generate from (1) Mega da Virada or (2) all Mega-Sena draws? [1/2]: ")?;
    let draws = if scope == "1" {
        let virada = filter_virada(all_draws);
        if virada.is_empty() {
            println!("No Mega da Virada draw found in the database.");
            return Ok(());
        }
        virada
    } else {
        all_draws.to_vec()
    };

    let count = prompt_count()?;

    let stats = HistoryStats::compute(&draws);
    if confirm("Show frequency and staleness charts? (y/n): ")? {
        display_charts(&stats);
    }

    let mut focus = prompt_focus()?;
    let bet = loop {
        let config = GeneratorConfig { count, focus, ..base.clone() };
        let generator = ComboGenerator::new(&draws, config)?;
        match generator.generate(rng) {
            Ok(bet) => break bet,
            Err(e) if e.is_exhausted() => {
                println!("{e}. Try another focus.");
                focus = prompt_focus()?;
            }
            Err(e) => return Err(e.into()),
        }
    };

    display_bets(std::slice::from_ref(&bet), &GeneratorConfig { count, focus, ..base });

    if confirm("Save the bet to a CSV file? (y/n): ")? {
        write_bets(Path::new(DEFAULT_EXPORT_FILE), std::slice::from_ref(&bet))?;
        println!("Bet saved to {DEFAULT_EXPORT_FILE}");
    }

    println!("Done!");
    Ok(())
}
