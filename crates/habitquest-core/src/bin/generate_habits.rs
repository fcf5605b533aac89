use anyhow::Context;
use clap::Parser;
use habitquest_core::synthetic::HabitGenerator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;

/// Generate a synthetic habit dataset as a JSON array.
#[derive(Parser)]
#[command(
    name = "generate_habits",
    about = "Write a synthetic habit dataset for seeding HabitQuest stores"
)]
struct Args {
    /// Number of habit documents to generate (titles may repeat)
    #[arg(short, long, default_value_t = 10_000)]
    count: usize,

    /// Output file
    #[arg(short, long, default_value = "habit_dataset_enhanced_10000.json")]
    output: PathBuf,

    /// Seed for byte-identical output across runs
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dataset = HabitGenerator::new(rng).generate_dataset(args.count);

    let json = serde_json::to_string_pretty(&dataset)?;
    fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Saved {} habit entries to '{}'",
        dataset.len(),
        args.output.display()
    );
    Ok(())
}
