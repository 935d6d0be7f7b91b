mod display;
mod export;
mod import;
mod interactive;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use megasena_db::db::{count_draws, db_path, fetch_all_draws, fetch_last_draws, insert_draw, migrate, open_db};
use megasena_db::models::{Draw, filter_virada, validate_numbers};
use megasena_db::rusqlite::Connection;
use megasena_engine::{ComboGenerator, FocusMode, GeneratorConfig, HistoryStats};
use crate::display::{
    display_bets, display_charts, display_draws, display_import_summary, display_stats,
};
use crate::export::DEFAULT_EXPORT_FILE;
use crate::interactive::prompt;

#[derive(Parser)]
#[command(name = "megasena", about = "Mega-Sena history analyzer and bet generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import draws from a CSV file
    Import {
        /// Path to the CSV file
        #[arg(short, long, default_value = "assets/mega_sena.csv")]
        file: PathBuf,
    },

    /// Print the database path
    DbPath,

    /// List the latest draws
    List {
        /// Number of draws to show
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Show frequency and staleness statistics
    Stats {
        /// Only Mega da Virada draws (31 December, 2008 onwards)
        #[arg(long)]
        virada: bool,

        /// Also draw terminal bar charts
        #[arg(long)]
        chart: bool,
    },

    /// Generate bets
    Generate {
        /// Numbers per bet (6-15)
        #[arg(short, long)]
        count: Option<usize>,

        /// Frequent/stale quota split
        #[arg(short, long)]
        focus: Option<FocusMode>,

        /// Number of distinct bets
        #[arg(short, long, default_value = "1")]
        bets: usize,

        /// Attempts per bet before giving up
        #[arg(short, long)]
        attempts: Option<u32>,

        /// Seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Only Mega da Virada draws
        #[arg(long)]
        virada: bool,

        /// JSON generator configuration; flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the bets to a CSV file
        #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
        export: Option<PathBuf>,
    },

    /// Add a draw manually
    Add,

    /// Guided prompt flow
    Interactive {
        /// Seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { virada, chart } => cmd_stats(&conn, virada, chart),
        Command::Generate {
            count,
            focus,
            bets,
            attempts,
            seed,
            virada,
            config,
            export,
        } => {
            let mut generator_config = match config {
                Some(p) => GeneratorConfig::load(&p)?,
                None => GeneratorConfig::default(),
            };
            if let Some(c) = count {
                generator_config.count = c;
            }
            if let Some(f) = focus {
                generator_config.focus = f;
            }
            if let Some(a) = attempts {
                generator_config.attempt_cap = a;
            }
            if seed.is_some() {
                generator_config.seed = seed;
            }
            cmd_generate(&conn, generator_config, bets, virada, export)
        }
        Command::Add => cmd_add(&conn),
        Command::Interactive { seed } => {
            let draws = load_history(&conn, false)?;
            if draws.is_empty() {
                return Ok(());
            }
            let mut rng = make_rng(seed);
            interactive::run(&draws, GeneratorConfig::default(), &mut rng)
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Full history (oldest first), optionally restricted to Mega da Virada.
/// Prints a hint and returns an empty list when nothing is available.
fn load_history(conn: &Connection, virada: bool) -> Result<Vec<Draw>> {
    if count_draws(conn)? == 0 {
        println!("Empty database. Run first: megasena import");
        return Ok(Vec::new());
    }
    let draws = fetch_all_draws(conn)?;
    if virada {
        let filtered = filter_virada(&draws);
        if filtered.is_empty() {
            println!("No Mega da Virada draw found in the database.");
        }
        return Ok(filtered);
    }
    Ok(draws)
}

fn cmd_import(conn: &Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Empty database. Run first: megasena import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, virada: bool, chart: bool) -> Result<()> {
    let draws = load_history(conn, virada)?;
    if draws.is_empty() {
        return Ok(());
    }
    let stats = HistoryStats::compute(&draws);
    let label = if virada { "Mega da Virada" } else { "all draws" };
    display_stats(&stats, label);
    if chart {
        display_charts(&stats);
    }
    Ok(())
}

fn cmd_generate(
    conn: &Connection,
    config: GeneratorConfig,
    bets: usize,
    virada: bool,
    export: Option<PathBuf>,
) -> Result<()> {
    if bets == 0 {
        bail!("At least one bet is required");
    }
    let draws = load_history(conn, virada)?;
    if draws.is_empty() {
        return Ok(());
    }

    let mut rng = make_rng(config.seed);
    let generator = ComboGenerator::new(&draws, config)?;

    let generated = match generator.generate_batch(bets, &mut rng) {
        Ok(generated) => generated,
        Err(e) if e.is_exhausted() => {
            eprintln!("Hint: try another --focus or a higher --attempts value.");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    display_bets(&generated, generator.config());

    if let Some(path) = export {
        export::write_bets(&path, &generated)?;
        println!("\nBets saved to {}", path.display());
    }
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Add a draw manually\n");

    let contest: u32 = prompt("Contest number (e.g. 2701): ")?
        .parse()
        .context("Invalid contest number")?;
    let date = import::parse_date(&prompt("Date (DD/MM/YYYY): ")?)?;
    let numbers = prompt_numbers()?;
    let winners: u32 = match prompt("Jackpot winners [0]: ")? {
        s if s.is_empty() => 0,
        s => s.parse().context("Invalid winner count")?,
    };

    let draw = Draw {
        contest,
        date,
        numbers,
        winners,
    };

    println!("\nDraw to insert:");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirm insertion? (y/n): ")?;
    if confirm.trim().to_lowercase() == "y" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Draw inserted.");
        } else {
            println!("This contest already exists (duplicate ignored).");
        }
    } else {
        println!("Insertion cancelled.");
    }

    Ok(())
}

fn prompt_numbers() -> Result<[u8; 6]> {
    loop {
        let input = prompt("6 numbers (space-separated, 1-60): ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) => match validate_numbers(&v) {
                Ok(numbers) => return Ok(numbers),
                Err(e) => println!("Invalid numbers: {e}. Try again."),
            },
            Err(_) => println!("Enter exactly 6 whole numbers. Try again."),
        }
    }
}
