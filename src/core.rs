use indicatif::{ProgressBar, ProgressStyle};

use crate::error::BinningError;
use crate::metropolis::Emission;
use crate::series::{FrozenSeries, SampleSeries};

/// Name of the position stream.
pub const POSITION_STREAM: &str = "log";
/// Name of the control stream.
pub const CONTROL_STREAM: &str = "ran";

pub trait MarkovChain {
    /// Does one iteration of the chain, returning the samples it emitted.
    fn step(&mut self) -> Emission;

    /// Current position without stepping.
    fn current_state(&self) -> f64;
}

/// The two streams recorded during a run. Both always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Streams {
    pub position: SampleSeries,
    pub control: SampleSeries,
}

impl Streams {
    pub fn with_capacity(n_steps: usize) -> Result<Self, BinningError> {
        Ok(Self {
            position: SampleSeries::with_capacity(POSITION_STREAM, n_steps)?,
            control: SampleSeries::with_capacity(CONTROL_STREAM, n_steps)?,
        })
    }

    pub fn record(&mut self, emission: Emission) {
        self.position.push(emission.position);
        self.control.push(emission.control);
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Ends the simulation phase.
    pub fn freeze(self) -> FrozenStreams {
        FrozenStreams {
            position: self.position.freeze(),
            control: self.control.freeze(),
        }
    }
}

/// Read-only streams handed to the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenStreams {
    pub position: FrozenSeries,
    pub control: FrozenSeries,
}

/// Steps the chain `n_steps` times. Storage for both streams is reserved
/// before the first step, so an impossible run fails without sampling.
pub fn run_chain<M>(chain: &mut M, n_steps: usize) -> Result<Streams, BinningError>
where
    M: MarkovChain,
{
    let mut out = Streams::with_capacity(n_steps)?;
    for _ in 0..n_steps {
        out.record(chain.step());
    }
    Ok(out)
}

pub fn run_chain_with_progress<M>(
    chain: &mut M,
    n_steps: usize,
    pb: &ProgressBar,
) -> Result<Streams, BinningError>
where
    M: MarkovChain,
{
    let mut out = Streams::with_capacity(n_steps)?;

    pb.set_length(n_steps as u64);

    for _ in 0..n_steps {
        out.record(chain.step());

        // Update progress bar
        pb.inc(1);
    }

    Ok(out)
}

/// Progress bar styled the same way for every run.
pub fn progress_bar(n_steps: usize) -> ProgressBar {
    let pb = ProgressBar::new(n_steps as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}
