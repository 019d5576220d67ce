//! Error type shared by the analyzer, the runner and the CSV exporter.

use thiserror::Error;

/// Everything that can go wrong between sampling and the final statistics.
#[derive(Debug, Error)]
pub enum BinningError {
    /// The block size `2^exponent` would hold fewer than two samples.
    #[error(
        "block shift {block_shift} is too large for {samples} samples \
         (floor(log2(N)) - shift = {exponent}, need at least 1)"
    )]
    Configuration {
        samples: usize,
        block_shift: u32,
        exponent: i64,
    },

    /// Variance needs at least two samples and at least two full blocks.
    #[error(
        "insufficient data: {samples} samples in {blocks} full blocks, \
         need at least 2 of each"
    )]
    InsufficientData { samples: usize, blocks: usize },

    /// None of the requested block shifts produced a usable level.
    #[error("no block shift in the requested range is valid for {samples} samples")]
    EmptyScan { samples: usize },

    /// Storage for the requested number of samples could not be reserved.
    #[error("cannot allocate storage for {samples} samples")]
    Allocation { samples: usize },

    #[cfg(feature = "csv")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let err = BinningError::Configuration {
            samples: 200,
            block_shift: 7,
            exponent: 0,
        };
        assert_eq!(
            err.to_string(),
            "block shift 7 is too large for 200 samples \
             (floor(log2(N)) - shift = 0, need at least 1)"
        );

        let err = BinningError::InsufficientData {
            samples: 1,
            blocks: 0,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: 1 samples in 0 full blocks, need at least 2 of each"
        );

        let err = BinningError::Allocation { samples: 5 };
        assert_eq!(err.to_string(), "cannot allocate storage for 5 samples");
    }
}
