/*!
Random sources and target densities for the one-dimensional Metropolis walk.

The walk only ever needs two things from the outside world: a stream of
independent uniform floats in `[0, 1)` and an (unnormalized) log-density that
scores a position. Both are traits so that tests can script the uniform draws
and callers can swap the quadratic toy potential for something else.

# Examples

```rust
use binning_analysis::distributions::{QuadraticWell, RandomSource, Target, UniformSource};

let mut source = UniformSource::new().set_seed(42);
let u = source.uniform();
assert!((0.0..1.0).contains(&u));

let well = QuadraticWell::default();
assert_eq!(well.unnorm_log_prob(0.0), 0.0);
assert!(well.unnorm_log_prob(2.0) < well.unnorm_log_prob(1.0));
```
*/

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

/// Seed of the reference run, so that default output is reproducible.
pub const DEFAULT_SEED: u64 = 49135;

/// A supplier of independent uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Returns the next uniform float in `[0, 1)`.
    fn uniform(&mut self) -> f64;
}

/// A target density the walk samples from.
pub trait Target {
    /// Returns the log of the unnormalized density at position `x`.
    fn unnorm_log_prob(&self, x: f64) -> f64;
}

/**
Seeded uniform generator backed by [`SmallRng`].

# Examples

```rust
use binning_analysis::distributions::{RandomSource, UniformSource};

let mut a = UniformSource::new().set_seed(7);
let mut b = UniformSource::new().set_seed(7);
assert_eq!(a.uniform(), b.uniform());
```
*/
#[derive(Debug, Clone)]
pub struct UniformSource {
    /// The seed the generator was last initialized with.
    pub seed: u64,
    rng: SmallRng,
    dist: Uniform<f64>,
}

impl UniformSource {
    /// Creates a source seeded with [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Self {
            seed: DEFAULT_SEED,
            rng: SmallRng::seed_from_u64(DEFAULT_SEED),
            dist: Uniform::new(0.0, 1.0),
        }
    }

    /// Returns this source reseeded with `seed`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

impl Default for UniformSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for UniformSource {
    fn uniform(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }
}

/**
The quadratic toy potential `log p(x) = -stiffness * x^2`.

With the default stiffness of `0.125` the acceptance ratio for a move from `x`
to `next` is `exp((x^2 - next^2) / 8)`.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticWell {
    pub stiffness: f64,
}

impl QuadraticWell {
    pub fn new(stiffness: f64) -> Self {
        Self { stiffness }
    }
}

impl Default for QuadraticWell {
    fn default() -> Self {
        Self::new(0.125)
    }
}

impl Target for QuadraticWell {
    fn unnorm_log_prob(&self, x: f64) -> f64 {
        -self.stiffness * x * x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn uniform_source_stays_in_unit_interval() {
        let mut source = UniformSource::new().set_seed(3);
        for _ in 0..10_000 {
            let u = source.uniform();
            assert!((0.0..1.0).contains(&u), "draw {u} left [0, 1)");
        }
    }

    #[test]
    fn uniform_source_is_reproducible() {
        let mut a = UniformSource::new().set_seed(11);
        let mut b = UniformSource::new().set_seed(11);
        let mut c = UniformSource::new().set_seed(12);
        let xs: Vec<f64> = (0..16).map(|_| a.uniform()).collect();
        let ys: Vec<f64> = (0..16).map(|_| b.uniform()).collect();
        let zs: Vec<f64> = (0..16).map(|_| c.uniform()).collect();
        assert_eq!(xs, ys);
        assert_ne!(xs, zs);
        assert_eq!(a.seed, 11);
    }

    #[test]
    fn uniform_source_mean_is_one_half() {
        let mut source = UniformSource::default();
        let n = 100_000;
        let mean = (0..n).map(|_| source.uniform()).sum::<f64>() / n as f64;
        assert_abs_diff_eq!(mean, 0.5, epsilon = 0.01);
    }

    #[test]
    fn quadratic_well_ratio_matches_reference_factor() {
        let well = QuadraticWell::default();
        let (x, next) = (1.0_f64, 1.4_f64);
        let ratio = (well.unnorm_log_prob(next) - well.unnorm_log_prob(x)).exp();
        assert_abs_diff_eq!(ratio, ((x * x - next * next) / 8.0).exp(), epsilon = 1e-15);
    }

    #[test]
    fn quadratic_well_is_symmetric() {
        let well = QuadraticWell::new(0.5);
        assert_eq!(well.unnorm_log_prob(-1.5), well.unnorm_log_prob(1.5));
    }
}
