//! Binning (blocking) analysis of correlated time series.
//!
//! Averaging `N` correlated samples and quoting `sqrt(var / N)` as the error of
//! the mean underestimates the true error. Grouping consecutive samples into
//! blocks of size `B` and treating the block means as independent gives a
//! corrected error, and comparing the two variances gives an estimate of the
//! integrated autocorrelation time:
//!
//! ```text
//! tau = 0.5 * (blocked_variance / naive_variance - 1)
//! ```
//!
//! The block size is `B = 2^(floor(log2(N)) - block_shift)`, so the number of
//! blocks is roughly `2^block_shift` regardless of `N`. Samples that do not fill
//! a whole trailing block are dropped from the block means but still count
//! towards the global mean.
//!
//! # Examples
//!
//! ```rust
//! use binning_analysis::series::FrozenSeries;
//! use binning_analysis::stats::analyze;
//!
//! let series = FrozenSeries::from(vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
//! let stats = analyze(&series, 2).unwrap();
//! assert_eq!(stats.block_size, 2);
//! assert_eq!(stats.block_count, 4);
//! assert!((stats.mean - 1.5).abs() < 1e-12);
//! assert!((stats.tau - 2.0 / 3.0).abs() < 1e-12);
//! ```

use log::{debug, warn};
use ndarray::{Array1, ArrayView1};
use ndarray_stats::QuantileExt;
use std::ops::RangeInclusive;

use crate::error::BinningError;
use crate::estimate::Estimate;
use crate::series::FrozenSeries;

/// Block shift of the reference analysis, giving about 128 blocks.
pub const DEFAULT_BLOCK_SHIFT: u32 = 7;

/// Relative agreement required between neighbouring block sizes.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Result of a single binning analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinningStats {
    pub mean: f64,
    /// Error of the mean assuming independent samples.
    pub naive_std_error: f64,
    /// Error of the mean from the spread of the block means.
    pub blocked_std_error: f64,
    /// Integrated autocorrelation time estimate.
    pub tau: f64,
    pub naive_variance: f64,
    pub blocked_variance: f64,
    pub sample_count: usize,
    pub block_size: usize,
    pub block_count: usize,
}

impl BinningStats {
    /// Factor `sqrt(1 + 2 tau)` by which the naive error is too small.
    pub fn error_ratio(&self) -> f64 {
        (1.0 + 2.0 * self.tau).sqrt()
    }
}

/// One block size in a [`BinningScan`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinningLevel {
    pub block_shift: u32,
    pub block_size: usize,
    pub block_count: usize,
    pub blocked_std_error: f64,
    pub tau: f64,
}

/// Binning results over a range of block sizes, smallest blocks first.
#[derive(Debug, Clone, PartialEq)]
pub struct BinningScan {
    pub mean: f64,
    pub naive_std_error: f64,
    pub levels: Vec<BinningLevel>,
}

impl BinningScan {
    /// Largest tau over all levels, `None` if any tau is NaN.
    pub fn max_tau(&self) -> Option<f64> {
        let taus: Array1<f64> = self.levels.iter().map(|level| level.tau).collect();
        taus.max().ok().copied()
    }

    /// Whether the blocked error has reached a plateau.
    ///
    /// Compares the two largest block sizes and requires their errors to agree
    /// within `tolerance`, relative to the larger of the two.
    ///
    /// The check is symmetric: a coarse error well above the fine one is also
    /// reported as not converged. A one-sided `fine > coarse * (1 + tolerance)`
    /// test would accept that case even though the error is still growing.
    pub fn converged(&self, tolerance: f64) -> bool {
        match self.levels.as_slice() {
            [.., fine, coarse] => {
                plateau(fine.blocked_std_error, coarse.blocked_std_error, tolerance)
            }
            _ => false,
        }
    }
}

fn plateau(fine: f64, coarse: f64, tolerance: f64) -> bool {
    (coarse - fine).abs() <= tolerance * fine.max(coarse)
}

/// Returns `2^(floor(log2(samples)) - block_shift)`.
///
/// Fails with [`BinningError::Configuration`] unless the exponent is at least 1.
pub fn block_size(samples: usize, block_shift: u32) -> Result<usize, BinningError> {
    if samples == 0 {
        return Err(BinningError::InsufficientData {
            samples,
            blocks: 0,
        });
    }
    let exponent = i64::from(samples.ilog2()) - i64::from(block_shift);
    if exponent < 1 {
        return Err(BinningError::Configuration {
            samples,
            block_shift,
            exponent,
        });
    }
    Ok(1usize << exponent)
}

/// Runs a binning analysis with the given block shift.
pub fn analyze(series: &FrozenSeries, block_shift: u32) -> Result<BinningStats, BinningError> {
    BinningAnalyzer::new().set_block_shift(block_shift).analyze(series)
}

/// Mean and naive variance of the mean, shared by all levels.
struct Moments {
    n: usize,
    mean: f64,
    naive_variance: f64,
}

impl Moments {
    fn of(data: &ArrayView1<'_, f64>) -> Result<Self, BinningError> {
        let n = data.len();
        if n < 2 {
            return Err(BinningError::InsufficientData {
                samples: n,
                blocks: 0,
            });
        }
        let mean = data.sum() / n as f64;
        let sum_sq = data.fold(0.0, |acc, &x| acc + (x - mean) * (x - mean));
        let naive_variance = sum_sq / (n as f64 * (n - 1) as f64);
        Ok(Self {
            n,
            mean,
            naive_variance,
        })
    }

    fn tau(&self, blocked_variance: f64) -> f64 {
        if self.naive_variance > 0.0 {
            0.5 * (blocked_variance / self.naive_variance - 1.0)
        } else {
            0.0
        }
    }
}

/// Variance of the block means around the global mean, divided by the block count.
fn blocked_variance(
    data: &ArrayView1<'_, f64>,
    mean: f64,
    block_size: usize,
) -> Result<f64, BinningError> {
    let blocks = data.len() / block_size;
    if blocks < 2 {
        return Err(BinningError::InsufficientData {
            samples: data.len(),
            blocks,
        });
    }
    let sum_sq = data
        .exact_chunks(block_size)
        .into_iter()
        .map(|chunk| chunk.sum() / block_size as f64)
        .fold(0.0, |acc, block_mean| {
            acc + (block_mean - mean) * (block_mean - mean)
        });
    Ok(sum_sq / (blocks as f64 * (blocks - 1) as f64))
}

/// Configurable binning analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinningAnalyzer {
    pub block_shift: u32,
    pub tolerance: f64,
}

impl Default for BinningAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BinningAnalyzer {
    pub fn new() -> Self {
        Self {
            block_shift: DEFAULT_BLOCK_SHIFT,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn set_block_shift(mut self, block_shift: u32) -> Self {
        self.block_shift = block_shift;
        self
    }

    pub fn set_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Mean, naive error, blocked error and tau at the configured block shift.
    pub fn analyze(&self, series: &FrozenSeries) -> Result<BinningStats, BinningError> {
        let data = series.view();
        let moments = Moments::of(&data)?;
        let block_size = block_size(moments.n, self.block_shift)?;
        let block_count = moments.n / block_size;
        let blocked_variance = blocked_variance(&data, moments.mean, block_size)?;

        debug!(
            "binning '{}': N = {}, block size = {}, blocks = {}, dropped = {}",
            series.name(),
            moments.n,
            block_size,
            block_count,
            moments.n - block_count * block_size
        );

        Ok(BinningStats {
            mean: moments.mean,
            naive_std_error: moments.naive_variance.sqrt(),
            blocked_std_error: blocked_variance.sqrt(),
            tau: moments.tau(blocked_variance),
            naive_variance: moments.naive_variance,
            blocked_variance,
            sample_count: moments.n,
            block_size,
            block_count,
        })
    }

    /// Evaluates every usable block shift in `shifts`.
    ///
    /// Shifts whose block size is invalid or leaves fewer than two blocks are
    /// skipped. Levels are ordered from the smallest block size to the largest.
    pub fn scan(
        &self,
        series: &FrozenSeries,
        shifts: RangeInclusive<u32>,
    ) -> Result<BinningScan, BinningError> {
        let data = series.view();
        let moments = Moments::of(&data)?;

        let mut levels = Vec::new();
        for block_shift in shifts.rev() {
            let Ok(block_size) = block_size(moments.n, block_shift) else {
                continue;
            };
            let Ok(variance) = blocked_variance(&data, moments.mean, block_size) else {
                continue;
            };
            levels.push(BinningLevel {
                block_shift,
                block_size,
                block_count: moments.n / block_size,
                blocked_std_error: variance.sqrt(),
                tau: moments.tau(variance),
            });
        }

        if levels.is_empty() {
            return Err(BinningError::EmptyScan { samples: moments.n });
        }

        let scan = BinningScan {
            mean: moments.mean,
            naive_std_error: moments.naive_variance.sqrt(),
            levels,
        };
        if !scan.converged(self.tolerance) {
            warn!(
                "binning '{}' has not reached a plateau over {} levels",
                series.name(),
                scan.levels.len()
            );
        }
        Ok(scan)
    }

    /// Summarizes the series as an [`Estimate`].
    ///
    /// Convergence compares the configured block size with blocks twice as
    /// large; it is `false` when the larger blocks are not available.
    pub fn estimate(&self, series: &FrozenSeries) -> Result<Estimate, BinningError> {
        let stats = self.analyze(series)?;
        let converged = blocked_variance(&series.view(), stats.mean, stats.block_size * 2)
            .map(|variance| plateau(stats.blocked_std_error, variance.sqrt(), self.tolerance))
            .unwrap_or(false);
        Ok(Estimate {
            mean: stats.mean,
            error: stats.blocked_std_error,
            tau: stats.tau,
            sample_count: stats.sample_count,
            converged,
        })
    }
}
