use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use deck_consistency::condition::Condition;
use deck_consistency::input::{manager_for_path, DataFileManager, JsonManager, SimulationInput, YamlManager};
use deck_consistency::simulation::{generate_report, run_trial, Simulation, SimulationReport};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "deck-consistency")]
#[command(about = "Monte Carlo deck consistency simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Simulation input file (YAML or JSON)
    #[arg(short, long, default_value = "input.yaml")]
    input: String,

    /// Seed for random number generator (for reproducibility)
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate opening hands and report how often each condition holds (default)
    Run {
        /// Simulation input file (YAML or JSON)
        #[arg(short, long, default_value = "input.yaml")]
        input: String,

        /// Number of hands to simulate
        #[arg(short, long, default_value = "10000")]
        trials: usize,

        /// Cards drawn for the opening hand
        #[arg(long, default_value = "5")]
        hand_size: usize,

        /// Deck is padded with blank cards up to this size
        #[arg(long, default_value = "40")]
        deck_size: usize,

        /// Seed for reproducibility (runs trials sequentially)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the full JSON report, optionally to a given path
        /// (defaults to a timestamped name)
        #[arg(short, long, num_args = 0..=1)]
        report: Option<Option<String>>,
    },

    /// Parse the input file and report any problems
    Validate {
        /// Simulation input file (YAML or JSON)
        #[arg(short, long, default_value = "input.yaml")]
        input: String,
    },

    /// Re-serialize the input in another format
    Export {
        /// Simulation input file (YAML or JSON)
        #[arg(short, long, default_value = "input.yaml")]
        input: String,

        /// Target format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn load_input(path: &str) -> Result<SimulationInput, String> {
    let manager = manager_for_path(Path::new(path)).map_err(|e| e.to_string())?;
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path, e))?;
    manager.import_from_string(&data).map_err(|e| e.to_string())
}

fn run_simulations(
    input: &SimulationInput,
    conditions: &[Condition],
    trials: usize,
    hand_size: usize,
    deck_size: usize,
    seed: Option<u64>,
) -> Vec<Simulation> {
    let deck = input.build_deck(deck_size);

    let bar = ProgressBar::new(trials as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} hands ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let simulations: Vec<Simulation> = if let Some(seed) = seed {
        // Sequential so trial i always sees the same shuffle.
        (0..trials)
            .map(|i| {
                bar.inc(1);
                run_trial(&deck, conditions, hand_size, Some(seed.wrapping_add(i as u64)))
            })
            .collect()
    } else {
        (0..trials)
            .into_par_iter()
            .map(|_| {
                bar.inc(1);
                run_trial(&deck, conditions, hand_size, None)
            })
            .collect()
    };
    bar.finish_and_clear();

    simulations
}

fn print_report(report: &SimulationReport, conditions: &[Condition]) {
    println!("=== Results ===\n");
    println!(
        "Overall: {:.1}% ({}/{})",
        report.success_rate() * 100.0,
        report.successful_simulations,
        report.iterations
    );
    println!();

    println!("Per condition:");
    for condition in conditions {
        let rendering = condition.to_string();
        let pct = report.condition_rate(&rendering) * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("  {:5.1}% {} {}", pct, bar, rendering);
    }
}

/// Resolve the `--report` flag: `None` writes nothing, a bare flag
/// gets a timestamped name, an explicit path is used as given.
fn report_output_path(report_path: Option<Option<String>>) -> Option<String> {
    report_path.map(|path| {
        path.unwrap_or_else(|| format!("report-{}.json", Local::now().format("%Y%m%d-%H%M%S")))
    })
}

fn command_run(
    input_path: &str,
    trials: usize,
    hand_size: usize,
    deck_size: usize,
    seed: Option<u64>,
    report_path: Option<Option<String>>,
) -> Result<(), String> {
    let input = load_input(input_path)?;
    let conditions = input.parse_conditions().map_err(|e| e.to_string())?;
    if conditions.is_empty() {
        return Err("input file declares no conditions".to_string());
    }

    if let Some(seed) = seed {
        println!("Seed: {}", seed);
    }

    let start = std::time::Instant::now();
    let simulations = run_simulations(&input, &conditions, trials, hand_size, deck_size, seed);
    let elapsed = start.elapsed();

    let report = generate_report(&simulations, &conditions);
    print_report(&report, &conditions);

    println!();
    println!(
        "Simulated {} hands in {:.2}s",
        trials,
        elapsed.as_secs_f64()
    );

    if let Some(path) = report_output_path(report_path) {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to serialize report: {}", e))?;
        std::fs::write(&path, json).map_err(|e| format!("failed to write {}: {}", path, e))?;
        println!("Report written to {}", path);
    }

    Ok(())
}

fn command_validate(input_path: &str) -> Result<(), String> {
    let input = load_input(input_path)?;
    let conditions = input.parse_conditions().map_err(|e| e.to_string())?;

    let copies: usize = input.deck.values().map(|d| d.qty).sum();
    println!("✓ {} ({} cards, {} copies)", input_path, input.deck.len(), copies);
    for condition in conditions {
        println!("  {}", condition);
    }

    Ok(())
}

fn command_export(
    input_path: &str,
    format: ExportFormat,
    output: Option<String>,
) -> Result<(), String> {
    let input = load_input(input_path)?;

    let manager: Box<dyn DataFileManager> = match format {
        ExportFormat::Yaml => Box::new(YamlManager),
        ExportFormat::Json => Box::new(JsonManager),
    };
    let serialized = manager
        .export_simulation_to_string(&input)
        .map_err(|e| e.to_string())?;

    match output {
        Some(path) => {
            std::fs::write(&path, serialized)
                .map_err(|e| format!("failed to write {}: {}", path, e))?;
            println!("Exported to {}", path);
        }
        None => print!("{}", serialized),
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run {
            input,
            trials,
            hand_size,
            deck_size,
            seed,
            report,
        }) => command_run(&input, trials, hand_size, deck_size, seed, report),
        Some(Commands::Validate { input }) => command_validate(&input),
        Some(Commands::Export { input, format, output }) => {
            command_export(&input, format, output)
        }
        None => command_run(&cli.input, 10000, 5, 40, cli.seed, None),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("✗ {}", message);
            ExitCode::FAILURE
        }
    }
}
