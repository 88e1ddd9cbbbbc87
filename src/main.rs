use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use coresensing_csv::cli::{Args, input_discovery};
use coresensing_csv::{read_many, read_sensor_csv, write_parquet};
use std::process;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    if let Err(error) = run(&args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Set up structured logging to stderr
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("coresensing_csv={}", args.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(args: &Args) -> Result<()> {
    let files = input_discovery::resolve_inputs(&args.input, args.all)?;
    let options = args.read_options();

    let mut df = if args.all {
        println!(
            "{} {} CSV files from {}",
            "Reading".bright_cyan(),
            files.len().to_string().bright_white().bold(),
            args.input.display()
        );
        read_many(&files, &options).context("Failed to read input files")?
    } else {
        let file = &files[0];
        println!("{} {}", "Reading".bright_cyan(), file.display());
        read_sensor_csv(file, &options)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    println!(
        "  {} {} rows x {} columns",
        "Shape:".bright_cyan(),
        df.height().to_string().bright_white().bold(),
        df.width().to_string().bright_white().bold()
    );
    println!("{}", df.head(Some(args.rows)));

    if let Some(output) = &args.output {
        write_parquet(&mut df, output, args.compression)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("  {} {}", "Written:".bright_green(), output.display());
    }

    Ok(())
}
