//! Tests running the Metropolis walk and analyzing its streams.

use binning_analysis::core::{run_chain, MarkovChain};
use binning_analysis::distributions::{QuadraticWell, UniformSource};
use binning_analysis::metropolis::MetropolisWalk;
use binning_analysis::stats::BinningAnalyzer;

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SIZE: usize = 1 << 17;
    const SEED: u64 = 42;

    #[test]
    fn test_position_stream_is_correlated_and_centered() {
        let source = UniformSource::new().set_seed(SEED);
        let mut walk = MetropolisWalk::new(QuadraticWell::default(), source);
        let streams = run_chain(&mut walk, SAMPLE_SIZE).unwrap().freeze();
        assert_eq!(walk.current_state(), streams.position[SAMPLE_SIZE - 1]);

        let analyzer = BinningAnalyzer::new();
        let position = analyzer.analyze(&streams.position).unwrap();
        let control = analyzer.analyze(&streams.control).unwrap();

        // Target is a Gaussian with mean 0 and standard deviation 2.
        assert!(
            position.mean.abs() < 5.0 * position.blocked_std_error,
            "mean {} with error {}",
            position.mean,
            position.blocked_std_error
        );
        assert!(position.tau > 5.0, "position tau {}", position.tau);
        assert!(position.error_ratio() > 3.0);

        assert!((control.mean - 0.5).abs() < 0.01);
        assert!(control.tau.abs() < 0.5, "control tau {}", control.tau);
    }

    #[test]
    fn test_tau_grows_then_levels_off_with_block_size() {
        let source = UniformSource::new().set_seed(SEED);
        let mut walk = MetropolisWalk::new(QuadraticWell::default(), source);
        let streams = run_chain(&mut walk, SAMPLE_SIZE).unwrap().freeze();
        let scan = BinningAnalyzer::new().scan(&streams.position, 7..=16).unwrap();

        let first = scan.levels.first().unwrap();
        let last = scan.levels.last().unwrap();
        assert!(first.block_size < last.block_size);
        // Neighbouring two-sample blocks are still strongly correlated.
        assert!(first.tau < last.tau);
        assert!(scan.max_tau().unwrap() >= last.tau);
    }
}
