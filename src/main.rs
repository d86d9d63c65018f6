//! Sena Forge - Mega-Sena draw analysis and combination generator
//!
//! Fetches recent draws, shows number frequencies, generates constrained
//! combinations and checks combinations against past results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use sena_forge::{
    analysis,
    draws::{DrawRepository, FetchOutcome},
    generator::CombinationGenerator,
    import,
    input::parse_number_list,
    types::{Combination, Constraints, FetchConfig, GenerationConfig, MatchTally, DEFAULT_DRAW_COUNT},
    SenaForgeError,
};
use serde_json::json;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sena-forge", version, about = "Mega-Sena draw analysis and combination generator")]
struct Cli {
    /// Number of recent draws to analyze
    #[arg(short, long, global = true, default_value_t = DEFAULT_DRAW_COUNT as u64,
          value_parser = clap::value_parser!(u64).range(1..=100))]
    count: u64,

    /// Read draws from a saved results JSON file instead of the API
    #[arg(long, global = true)]
    draws_file: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show how often each number was drawn
    Frequency {
        /// Also list the N most frequent numbers
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Generate a combination under constraints and score it
    Generate {
        /// Numbers that must appear, e.g. "4,8,15"
        #[arg(short, long, default_value = "")]
        include: String,

        /// Numbers that must not appear
        #[arg(short, long, default_value = "")]
        exclude: String,

        /// Minimum sum of the six numbers
        #[arg(long, default_value_t = 140)]
        sum_min: u32,

        /// Maximum sum of the six numbers
        #[arg(long, default_value_t = 210)]
        sum_max: u32,

        /// Exact count of even numbers
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(0..=6))]
        evens: u64,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Sampling attempts before giving up
        #[arg(long, default_value_t = sena_forge::types::DEFAULT_MAX_ATTEMPTS)]
        attempts: usize,
    },

    /// Build a combination from the most frequent numbers and score it
    Frequent,

    /// Score every combination in a CSV file against past draws
    Check {
        /// CSV file, one combination per row after a header
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env first, it may set RUST_LOG
    if let Err(e) = sena_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<SenaForgeError>() {
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let repository = match &cli.draws_file {
        Some(path) => DrawRepository::from_file(path),
        None => DrawRepository::http(FetchConfig::from_env()?)?,
    };

    let count = cli.count as usize;

    match cli.command {
        Command::Frequency { top } => {
            let outcome = load_draws(&repository, count, cli.json).await;
            show_frequency(&outcome, top, cli.json)
        }
        Command::Generate {
            include,
            exclude,
            sum_min,
            sum_max,
            evens,
            seed,
            attempts,
        } => {
            let constraints = Constraints {
                required: parse_number_list(&include).context("invalid --include list")?,
                excluded: parse_number_list(&exclude).context("invalid --exclude list")?,
                sum_min,
                sum_max,
                even_count: evens as usize,
            };
            let mut generator = CombinationGenerator::with_config(GenerationConfig {
                max_attempts: attempts,
                seed,
            });

            let outcome = load_draws(&repository, count, cli.json).await;
            let combination = generator.generate(&constraints);
            show_generated(combination, &constraints, &outcome, cli.json)
        }
        Command::Frequent => {
            let outcome = load_draws(&repository, count, cli.json).await;
            let table = analysis::compute(outcome.draws());
            let combination = analysis::most_frequent_combination(&table);
            show_frequent(combination, &outcome, cli.json)
        }
        Command::Check { file } => {
            let report = import::import_file(&file)
                .with_context(|| format!("could not import combinations from {}", file.display()))?;
            let outcome = load_draws(&repository, count, cli.json).await;
            show_check(&report, &outcome, cli.json)
        }
    }
}

/// Fetch draws behind a spinner; failures degrade to an empty list
async fn load_draws(repository: &DrawRepository, count: usize, quiet: bool) -> FetchOutcome {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching the last {} draws...", count));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let outcome = repository.fetch(count).await;
    spinner.finish_and_clear();

    if let Some(err) = &outcome.error {
        eprintln!("{}", err.user_message());
        eprintln!("⚠️  Continuing without historical draws");
    }

    outcome
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fetch_error(outcome: &FetchOutcome) -> Option<String> {
    outcome.error.as_ref().map(|e| e.to_string())
}

fn show_frequency(outcome: &FetchOutcome, top: Option<usize>, as_json: bool) -> Result<()> {
    let table = analysis::compute(outcome.draws());
    let top_numbers = top.map(|k| analysis::top_k(&table, k));

    if as_json {
        return print_json(&json!({
            "draws": outcome.draws().len(),
            "frequency": table,
            "top": top_numbers,
            "fetch_error": fetch_error(outcome),
        }));
    }

    println!("📊 Number frequency over {} draws", outcome.draws().len());
    println!("═══════════════════════════════════");

    if table.is_empty() {
        println!("No draws to analyze.");
        return Ok(());
    }

    let max = table.iter().map(|(_, c)| c).max().unwrap_or(1).max(1);
    for (number, count) in table.iter() {
        let width = (count as usize * 30) / max as usize;
        println!("{:02} │ {:<30} {}", number, "█".repeat(width.max(1)), count);
    }

    if let Some(numbers) = top_numbers {
        println!();
        println!("🔝 Most frequent: {}", format_numbers(&numbers));
    }

    Ok(())
}

fn show_generated(
    combination: Option<Combination>,
    constraints: &Constraints,
    outcome: &FetchOutcome,
    as_json: bool,
) -> Result<()> {
    let tally = combination.map(|c| analysis::score(&c, outcome.draws()));

    if as_json {
        return print_json(&json!({
            "constraints": constraints,
            "combination": combination,
            "tally": tally,
            "draws": outcome.draws().len(),
            "fetch_error": fetch_error(outcome),
        }));
    }

    match (combination, tally) {
        (Some(combination), Some(tally)) => {
            println!("🎉 Suggested combination: {}", combination);
            println!(
                "   sum {} · {} even",
                combination.sum(),
                combination.even_count()
            );
            print_tally(&tally, outcome.draws().len());
        }
        _ => {
            println!("⚠️  No combination found for these constraints.");
            println!("💡 Relax the sum range, the even count or the excluded numbers");
        }
    }

    Ok(())
}

fn show_frequent(combination: Option<Combination>, outcome: &FetchOutcome, as_json: bool) -> Result<()> {
    let tally = combination.map(|c| analysis::score(&c, outcome.draws()));

    if as_json {
        return print_json(&json!({
            "combination": combination,
            "tally": tally,
            "draws": outcome.draws().len(),
            "fetch_error": fetch_error(outcome),
        }));
    }

    match (combination, tally) {
        (Some(combination), Some(tally)) => {
            println!("🔝 Most frequent combination: {}", combination);
            print_tally(&tally, outcome.draws().len());
        }
        _ => {
            println!("⚠️  Not enough distinct numbers drawn to build a combination.");
        }
    }

    Ok(())
}

fn show_check(report: &import::ImportReport, outcome: &FetchOutcome, as_json: bool) -> Result<()> {
    let results = analysis::score_all(&report.combinations(), outcome.draws());

    if as_json {
        let scored: Vec<_> = report
            .accepted
            .iter()
            .zip(results.iter())
            .map(|(row, (_, tally))| json!({ "row": row.row, "combination": row.combination, "tally": tally }))
            .collect();
        return print_json(&json!({
            "draws": outcome.draws().len(),
            "scored": scored,
            "rejected": report.rejected,
            "fetch_error": fetch_error(outcome),
        }));
    }

    println!("📥 Checking {} combination(s) against {} draws", results.len(), outcome.draws().len());
    println!("═══════════════════════════════════");

    for (row, (combination, tally)) in report.accepted.iter().zip(results.iter()) {
        println!("Game {:>3}: {} — {}", row.row, combination, tally);
    }

    for rejected in &report.rejected {
        println!("⚠️  Row {:>3} skipped: {}", rejected.row, rejected.reason);
    }

    Ok(())
}

fn print_tally(tally: &MatchTally, draws: usize) {
    println!("📈 Past hits over {} draws: {}", draws, tally);
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ")
}
