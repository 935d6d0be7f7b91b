use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};
use textplots::Plot;

use crate::import::ImportResult;
use megasena_db::models::{Draw, NUM_MAX, NUM_MIN};
use megasena_engine::stats::{HistoryStats, NumberTable};
use megasena_engine::{Combination, GeneratorConfig};

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("No draw to display.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Contest", "Date", "Numbers", "Winners"]);

    for draw in draws {
        let numbers_str = draw
            .sorted_numbers()
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        let winners = if draw.winners > 0 {
            draw.winners.to_string()
        } else {
            "—".to_string()
        };

        table.add_row(vec![
            &draw.contest.to_string(),
            &draw.date.format("%d/%m/%Y").to_string(),
            &numbers_str,
            &winners,
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import finished:");
    println!("  Rows read          : {}", result.total_records);
    println!("  Inserted           : {}", result.inserted);
    println!("  Duplicates ignored : {}", result.skipped);
    if result.errors > 0 {
        println!("  Invalid rows       : {}", result.errors);
    }
}

pub fn display_stats(stats: &HistoryStats, label: &str) {
    println!("\n📊 Statistics over {} draws ({label})\n", stats.draw_count);
    if let Some(last) = stats.last_contest {
        println!("Last contest: {last}");
    }
    println!("Historical odd ratio: {:.2}%\n", stats.odd_ratio * 100.0);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Number", "Frequency", "Staleness"]);

    let mut sorted = stats.number_stats();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        table.add_row(vec![
            &format!("{:02}", stat.number),
            &stat.frequency.to_string(),
            &stat.staleness.to_string(),
        ]);
    }
    println!("{table}");
}

fn bar_chart(title: &str, values: &NumberTable) {
    println!("\n── {title} ──");
    let points: Vec<(f32, f32)> = values.iter().map(|(n, v)| (n as f32, v as f32)).collect();
    let y_max = points.iter().map(|&(_, y)| y).fold(1.0f32, f32::max);
    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(
        180,
        60,
        NUM_MIN as f32,
        NUM_MAX as f32 + 1.0,
        0.0,
        y_max,
    );
    println!("{}", chart.lineplot(&shape));
}

pub fn display_charts(stats: &HistoryStats) {
    bar_chart("Frequency per number", &stats.frequency);
    bar_chart("Staleness per number (contests since last seen)", &stats.staleness);
}

pub fn display_bets(bets: &[Combination], config: &GeneratorConfig) {
    println!(
        "\n🎲 Generated bets ({} numbers, focus: {})\n",
        config.count, config.focus
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numbers", "Odd", "Even"]);

    for (i, bet) in bets.iter().enumerate() {
        let odd = bet.odd_count();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(bet.to_string()).fg(Color::Green),
            Cell::new(odd),
            Cell::new(bet.len() - odd),
        ]);
    }
    println!("{table}");
}
