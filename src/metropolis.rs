/*!
# Metropolis Random Walk

A single-chain, one-dimensional Metropolis walk. Each step proposes
`next = x + u1 - 0.5` with `u1` uniform in `[0, 1)`. Moves that do not lower
the target density are always accepted; moves that do are accepted with
probability `p(next) / p(x)`, tested against a second uniform draw `u2` which
is only taken in that case.

Alongside every position the walk emits one more independent uniform draw.
That "control" stream never depends on the position and serves as an
uncorrelated baseline for the error estimator.

## Example Usage

```rust
use binning_analysis::core::MarkovChain;
use binning_analysis::distributions::{QuadraticWell, UniformSource};
use binning_analysis::metropolis::MetropolisWalk;

let mut walk = MetropolisWalk::new(QuadraticWell::default(), UniformSource::new().set_seed(1));
let emission = walk.step();
assert_eq!(emission.position, walk.current_state());
assert!((0.0..1.0).contains(&emission.control));
```
*/

use crate::core::MarkovChain;
use crate::distributions::{RandomSource, Target};

/// Metropolis criterion for a move from `x` to `next`.
fn accepts<D, F>(target: &D, x: f64, next: f64, u2: F) -> bool
where
    D: Target,
    F: FnOnce() -> f64,
{
    let log_ratio = target.unnorm_log_prob(next) - target.unnorm_log_prob(x);
    log_ratio >= 0.0 || log_ratio.exp() > u2()
}

/// The pair of samples emitted by one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    /// Position of the walker after the step.
    pub position: f64,
    /// Independent uniform draw, uncorrelated with `position`.
    pub control: f64,
}

/// A Metropolis walker over the real line, starting at the origin.
#[derive(Debug, Clone)]
pub struct MetropolisWalk<D, R> {
    /// The target density.
    pub target: D,
    /// Source of the uniform draws.
    pub source: R,
    position: f64,
    steps: u64,
    accepted: u64,
}

impl<D, R> MetropolisWalk<D, R>
where
    D: Target,
    R: RandomSource,
{
    pub fn new(target: D, source: R) -> Self {
        Self {
            target,
            source,
            position: 0.0,
            steps: 0,
            accepted: 0,
        }
    }

    /// Applies the acceptance rule to a move proposed from `u1`.
    ///
    /// `u2` is only invoked when the proposal lowers the target density.
    /// Returns whether the move was accepted.
    pub fn advance<F>(&mut self, u1: f64, u2: F) -> bool
    where
        F: FnOnce() -> f64,
    {
        let next = self.position + u1 - 0.5;
        let accept = accepts(&self.target, self.position, next, u2);
        self.record(next, accept);
        accept
    }

    fn record(&mut self, next: f64, accept: bool) {
        self.steps += 1;
        if accept {
            self.position = next;
            self.accepted += 1;
        }
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of accepted proposals so far.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Fraction of accepted proposals, zero before the first step.
    pub fn acceptance_rate(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.accepted as f64 / self.steps as f64
        }
    }
}

impl<D, R> MarkovChain for MetropolisWalk<D, R>
where
    D: Target,
    R: RandomSource,
{
    fn step(&mut self) -> Emission {
        let u1 = self.source.uniform();
        let next = self.position + u1 - 0.5;
        let accept = accepts(&self.target, self.position, next, || self.source.uniform());
        self.record(next, accept);

        Emission {
            position: self.position,
            control: self.source.uniform(),
        }
    }

    fn current_state(&self) -> f64 {
        self.position
    }
}
