//! Time-ordered sample containers.
//!
//! A [`SampleSeries`] is filled during the simulation phase and turned into a
//! [`FrozenSeries`] once sampling is done. Only the frozen form can be analyzed,
//! which keeps the two phases from overlapping.

use ndarray::ArrayView1;
use std::ops::Index;

use crate::error::BinningError;

/// Append-only series of samples for one named stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSeries {
    name: String,
    values: Vec<f64>,
}

impl SampleSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Reserves room for `capacity` samples up front.
    ///
    /// Fails instead of aborting when the storage cannot be allocated.
    pub fn with_capacity(
        name: impl Into<String>,
        capacity: usize,
    ) -> Result<Self, BinningError> {
        let mut values = Vec::new();
        values
            .try_reserve_exact(capacity)
            .map_err(|_| BinningError::Allocation { samples: capacity })?;
        Ok(Self {
            name: name.into(),
            values,
        })
    }

    /// Appends a sample at the end of the series.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Ends the append phase.
    pub fn freeze(self) -> FrozenSeries {
        FrozenSeries {
            name: self.name,
            values: self.values.into_boxed_slice(),
        }
    }
}

impl Index<usize> for SampleSeries {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.values[idx]
    }
}

impl Extend<f64> for SampleSeries {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

/// Read-only snapshot of a finished series.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenSeries {
    name: String,
    values: Box<[f64]>,
}

impl FrozenSeries {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Borrows the samples as an ndarray view.
    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.values[..])
    }
}

impl Index<usize> for FrozenSeries {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.values[idx]
    }
}

impl From<Vec<f64>> for FrozenSeries {
    fn from(values: Vec<f64>) -> Self {
        Self {
            name: String::new(),
            values: values.into_boxed_slice(),
        }
    }
}

impl From<&[f64]> for FrozenSeries {
    fn from(values: &[f64]) -> Self {
        Self::from(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_order() {
        let mut series = SampleSeries::new("log");
        series.push(1.0);
        series.push(2.0);
        series.extend([3.0, 4.0]);

        assert_eq!(series.len(), 4);
        assert_eq!(series.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(series[2], 3.0);
        assert_eq!(series.get(4), None);
    }

    #[test]
    fn freeze_keeps_name_and_values() {
        let mut series = SampleSeries::with_capacity("ran", 2).unwrap();
        assert!(series.is_empty());
        series.push(0.5);
        series.push(0.25);

        let frozen = series.freeze();
        assert_eq!(frozen.name(), "ran");
        assert_eq!(frozen.len(), 2);
        assert_eq!(frozen[1], 0.25);
        assert_eq!(frozen.get(0), Some(0.5));
        assert_eq!(frozen.view().len(), 2);
        assert_eq!(frozen.view()[0], 0.5);
    }

    #[test]
    fn frozen_from_vec_is_unnamed() {
        let frozen = FrozenSeries::from(vec![1.0, 2.0]);
        assert_eq!(frozen.name(), "");
        assert_eq!(frozen.as_slice(), &[1.0, 2.0]);
        assert!(!frozen.is_empty());
    }

    #[test]
    fn oversized_reservation_is_an_error() {
        let samples = usize::MAX / 4;
        assert!(matches!(
            SampleSeries::with_capacity("log", samples),
            Err(BinningError::Allocation { samples: n }) if n == samples
        ));
    }
}
