/*!
End-to-end run: sample the quadratic well, freeze both streams and analyze them.

# Examples

```rust
use binning_analysis::simulation::{RunConfig, Simulation};

let config = RunConfig::default().set_steps(1024).set_seed(7);
let report = Simulation::new(config).run().unwrap();
assert_eq!(report.position.sample_count, 1024);
assert_eq!(report.position.block_size, 8);
println!("{report}");
```
*/

use log::info;
use std::fmt;

use crate::core::{progress_bar, run_chain, run_chain_with_progress, FrozenStreams};
use crate::distributions::{QuadraticWell, UniformSource, DEFAULT_SEED};
use crate::error::BinningError;
use crate::metropolis::MetropolisWalk;
use crate::stats::{block_size, BinningAnalyzer, BinningStats, DEFAULT_BLOCK_SHIFT};

/// Number of Metropolis steps when none is given.
pub const DEFAULT_STEPS: usize = 500;

/// Parameters of a single run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub steps: usize,
    pub seed: u64,
    pub block_shift: u32,
    pub stiffness: f64,
    pub progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            seed: DEFAULT_SEED,
            block_shift: DEFAULT_BLOCK_SHIFT,
            stiffness: QuadraticWell::default().stiffness,
            progress: false,
        }
    }
}

impl RunConfig {
    pub fn set_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn set_block_shift(mut self, block_shift: u32) -> Self {
        self.block_shift = block_shift;
        self
    }

    pub fn set_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn set_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Checks that the analysis will be possible before any sampling is done.
    pub fn validate(&self) -> Result<usize, BinningError> {
        if self.steps < 2 {
            return Err(BinningError::InsufficientData {
                samples: self.steps,
                blocks: 0,
            });
        }
        block_size(self.steps, self.block_shift)
    }
}

/// Statistics of both streams plus the acceptance rate of the walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub position: BinningStats,
    pub control: BinningStats,
    pub acceptance_rate: f64,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "log {:.20}", self.position.mean)?;
        writeln!(f, "ran {:.20}", self.control.mean)?;
        writeln!(
            f,
            "log error: {}, log tau: {:.20}",
            self.position.blocked_std_error, self.position.tau
        )?;
        writeln!(f, "ran error: {}", self.control.blocked_std_error)?;
        write!(f, "naive_error: {}", self.position.naive_std_error)
    }
}

/// Frozen streams of a finished walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub streams: FrozenStreams,
    pub acceptance_rate: f64,
}

impl Run {
    /// Analyzes both streams with the same analyzer.
    pub fn analyze(&self, analyzer: &BinningAnalyzer) -> Result<Report, BinningError> {
        Ok(Report {
            position: analyzer.analyze(&self.streams.position)?,
            control: analyzer.analyze(&self.streams.control)?,
            acceptance_rate: self.acceptance_rate,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulation {
    pub config: RunConfig,
}

impl Simulation {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Runs the walk for the configured number of steps.
    ///
    /// The block size is validated and the stream storage reserved first, so
    /// a bad configuration fails before any sampling is done.
    pub fn sample(&self) -> Result<Run, BinningError> {
        let block = self.config.validate()?;
        let target = QuadraticWell::new(self.config.stiffness);
        let source = UniformSource::new().set_seed(self.config.seed);
        let mut walk = MetropolisWalk::new(target, source);

        let streams = if self.config.progress {
            let pb = progress_bar(self.config.steps);
            let streams = run_chain_with_progress(&mut walk, self.config.steps, &pb)?;
            pb.finish_with_message("Done!");
            streams
        } else {
            run_chain(&mut walk, self.config.steps)?
        };

        info!(
            "sampled {} steps (seed {}), acceptance rate {:.4}, block size {}",
            walk.steps(),
            self.config.seed,
            walk.acceptance_rate(),
            block
        );
        Ok(Run {
            streams: streams.freeze(),
            acceptance_rate: walk.acceptance_rate(),
        })
    }

    /// The analyzer matching this configuration.
    pub fn analyzer(&self) -> BinningAnalyzer {
        BinningAnalyzer::new().set_block_shift(self.config.block_shift)
    }

    /// Samples and analyzes both streams at the configured block shift.
    pub fn run(&self) -> Result<Report, BinningError> {
        self.sample()?.analyze(&self.analyzer())
    }
}
