//! Train/test splitting for the experiment data.
//!
//! The split shuffles with an explicit seed and stratifies on the group
//! label so both halves keep the control/experiment balance of the full
//! dataset. Strata are visited in the fixed [`Group::ALL`] order, so the
//! partition is bit-identical for a fixed seed and input.

use crate::dataset::{Group, LabeledRecord};
use crate::error::{EnsayoError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Parameters for the shuffle/split step.
///
/// The seed is an explicit value threaded through the call rather than
/// implicit global RNG state, so the same configuration always yields the
/// same partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    /// Fraction of each stratum that goes to the training set, in (0, 1).
    pub train_fraction: f32,
    /// Seed for the pseudorandom shuffle.
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.8,
            seed: 42,
        }
    }
}

/// A disjoint train/test partition of labeled records.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training subset.
    pub train: Vec<LabeledRecord>,
    /// Testing subset.
    pub test: Vec<LabeledRecord>,
}

/// Splits records into train and test subsets, stratified on group label.
///
/// Each stratum is shuffled with a [`StdRng`] seeded from `config.seed` and
/// cut at `round(len * train_fraction)`; strata with at least two rows keep
/// at least one row on each side. The union of the two subsets (as row id
/// sets) equals the input and the intersection is empty.
///
/// # Errors
///
/// Returns [`EnsayoError::InvalidHyperparameter`] if `train_fraction` is
/// outside (0, 1), and an error for an empty input.
///
/// # Examples
///
/// ```
/// use ensayo::dataset::{Group, LabeledRecord, Weekday};
/// use ensayo::model_selection::{stratified_split, SplitConfig};
///
/// let records: Vec<LabeledRecord> = (0..10)
///     .map(|i| LabeledRecord {
///         row_id: i,
///         group: if i < 5 { Group::Control } else { Group::Experiment },
///         weekday: Weekday::Mon,
///         pageviews: 100.0,
///         clicks: 10.0,
///         enrollments: Some(5.0),
///     })
///     .collect();
///
/// let split = stratified_split(&records, &SplitConfig::default()).unwrap();
/// assert_eq!(split.train.len() + split.test.len(), 10);
/// ```
pub fn stratified_split(
    records: &[LabeledRecord],
    config: &SplitConfig,
) -> Result<TrainTestSplit> {
    if !(config.train_fraction > 0.0 && config.train_fraction < 1.0) {
        return Err(EnsayoError::InvalidHyperparameter {
            param: "train_fraction".to_string(),
            value: format!("{}", config.train_fraction),
            constraint: "0 < train_fraction < 1".to_string(),
        });
    }
    if records.is_empty() {
        return Err(EnsayoError::empty_input("cannot split zero records"));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for group in Group::ALL {
        let mut indices: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.group == group)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            continue;
        }

        indices.shuffle(&mut rng);

        let n = indices.len();
        let mut n_train = (n as f32 * config.train_fraction).round() as usize;
        if n >= 2 {
            // Rounding must not empty either side of a splittable stratum.
            n_train = n_train.clamp(1, n - 1);
        }

        train.extend(indices[..n_train].iter().map(|&i| records[i].clone()));
        test.extend(indices[n_train..].iter().map(|&i| records[i].clone()));
    }

    Ok(TrainTestSplit { train, test })
}
