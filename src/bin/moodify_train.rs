//! Offline trainer for the moodify classification pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Train on a CSV with `text` and `label` columns, writing into ./model
//! cargo run --bin moodify-train -- --dataset data/moods.csv
//!
//! # Different split and output directory
//! cargo run --bin moodify-train -- --dataset data/moods.csv \
//!     --output-dir artifacts --seed 7 --test-fraction 0.1
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use moodify::core::TrainingConfig;
use moodify::loaders::ArtifactPaths;
use moodify::pipelines::training::{Dataset, Trainer};

/// Train the TF-IDF + logistic regression mood classifier
#[derive(Parser, Debug)]
#[command(name = "moodify-train")]
#[command(about = "Fit the mood classification pipeline and write its artifacts")]
struct Args {
    /// CSV file with `text` and `label` columns
    #[arg(short, long)]
    dataset: PathBuf,

    /// Directory receiving moodify_pipeline.json and moodify_labels.json
    #[arg(short, long, default_value = "model")]
    output_dir: PathBuf,

    /// JSON file with training parameters; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the train/evaluation split
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fraction of records held out for evaluation
    #[arg(long)]
    test_fraction: Option<f64>,

    /// Optimizer iterations
    #[arg(long)]
    epochs: Option<usize>,

    /// Optimizer learning rate
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn training_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading training config {:?}", path))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("parsing training config {:?}", path))?
            }
            None => TrainingConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(fraction) = self.test_fraction {
            config.test_fraction = fraction;
        }
        if let Some(epochs) = self.epochs {
            config.max_iter = epochs;
        }
        if let Some(lr) = self.learning_rate {
            config.learning_rate = lr;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = args.training_config()?;
    let dataset = Dataset::from_csv_path(&args.dataset)?;
    let paths = ArtifactPaths::in_dir(&args.output_dir);

    let model = Trainer::new(config).train_and_save(&dataset, &paths)?;
    let report = &model.report;

    println!("training run:  {}", model.training_run);
    println!(
        "records:       {} ({} dropped, {} train, {} eval)",
        report.total_records, report.dropped_records, report.train_records, report.eval_records
    );
    for (label, count) in &report.label_support {
        println!("  {:<16} {}", label.as_str(), count);
    }
    println!("features:      {}", report.num_features);
    println!("final loss:    {:.4}", report.final_loss);
    match report.eval_accuracy {
        Some(accuracy) => println!("eval accuracy: {:.3}", accuracy),
        None => println!("eval accuracy: n/a (no held-out records)"),
    }
    println!("pipeline:      {}", paths.pipeline.display());
    println!("labels:        {}", paths.labels.display());
    Ok(())
}
