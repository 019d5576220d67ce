//! Runs the Metropolis walk and prints the binning analysis of both streams.

use binning_analysis::distributions::DEFAULT_SEED;
use binning_analysis::simulation::{RunConfig, Simulation, DEFAULT_STEPS};
use binning_analysis::stats::DEFAULT_BLOCK_SHIFT;
use clap::Parser;
use std::error::Error;
#[cfg(feature = "csv")]
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "binning", about = "Binning error analysis of a Metropolis random walk")]
struct Cli {
    /// Number of Metropolis steps.
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    steps: Option<u64>,
    /// Seed of the uniform random source.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Block size is 2^(floor(log2(N)) - shift).
    #[arg(long, default_value_t = DEFAULT_BLOCK_SHIFT)]
    block_shift: u32,
    /// Show a progress bar while sampling.
    #[arg(long)]
    progress: bool,
    /// Also print blocked error and tau for every usable block size.
    #[arg(long)]
    scan: bool,
    /// Write both streams to a CSV file.
    #[cfg(feature = "csv")]
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let steps = match cli.steps {
        Some(steps) => usize::try_from(steps)?,
        None => {
            eprintln!("usage: binning [N], N = {DEFAULT_STEPS} (default)");
            DEFAULT_STEPS
        }
    };

    let config = RunConfig::default()
        .set_steps(steps)
        .set_seed(cli.seed)
        .set_block_shift(cli.block_shift)
        .set_progress(cli.progress);
    let simulation = Simulation::new(config);
    let run = simulation.sample()?;
    let report = run.analyze(&simulation.analyzer())?;
    println!("{report}");

    if cli.scan {
        let scan = simulation
            .analyzer()
            .scan(&run.streams.position, 0..=usize::BITS)?;
        for level in &scan.levels {
            println!(
                "block size {:>8} ({:>6} blocks): error {}, tau {}",
                level.block_size, level.block_count, level.blocked_std_error, level.tau
            );
        }
        println!(
            "converged: {}",
            scan.converged(simulation.analyzer().tolerance)
        );
    }

    #[cfg(feature = "csv")]
    {
        if let Some(path) = cli.csv {
            let streams = [&run.streams.position, &run.streams.control];
            binning_analysis::io::csv::save_csv(&streams, path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_carries_its_message() {
        let cli = Cli::parse_from(["binning", "200"]);
        let err = run(cli).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("block shift 7 is too large for 200 samples"),
            "{err}"
        );
    }

    #[test]
    fn zero_steps_are_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["binning", "0"]).is_err());
    }
}
