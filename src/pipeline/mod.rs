//! Data preparation pipeline: merge, label, clean, encode.
//!
//! The steps run strictly in sequence, each consuming the full output of
//! the previous one: load (see [`crate::dataset::load_records`]), merge and
//! label, drop rows with missing outcome, split (see
//! [`crate::model_selection::stratified_split`]), then encode each half
//! into a design matrix.

use crate::dataset::{DailyRecord, Group, LabeledRecord, Weekday};
use crate::error::{EnsayoError, Result};
use crate::primitives::{Matrix, Vector};

/// Number of feature columns in the design matrix: pageviews, clicks,
/// group code, and seven weekday indicator columns.
pub const N_FEATURES: usize = 3 + Weekday::ALL.len();

/// Merges the two cohorts into one labeled dataset.
///
/// Control rows come first, experiment rows second, each cohort keeping its
/// original order. Every row gets the group label, a weekday derived from
/// the first three characters of its date, and a row id counting 0..n
/// across the concatenation. The date and payments columns are dropped
/// here: the weekday replaces the date, and payments are causally
/// downstream of the outcome.
///
/// # Errors
///
/// Returns [`EnsayoError::UnknownDayAbbreviation`] if any date does not
/// start with a known day abbreviation.
pub fn merge_and_label(
    control: &[DailyRecord],
    experiment: &[DailyRecord],
) -> Result<Vec<LabeledRecord>> {
    let mut records = Vec::with_capacity(control.len() + experiment.len());

    for (group, cohort) in [(Group::Control, control), (Group::Experiment, experiment)] {
        for raw in cohort {
            records.push(LabeledRecord {
                row_id: records.len(),
                group,
                weekday: Weekday::from_date(&raw.date)?,
                pageviews: raw.pageviews,
                clicks: raw.clicks,
                enrollments: raw.enrollments,
            });
        }
    }

    Ok(records)
}

/// Removes rows whose enrollment outcome is missing.
///
/// Returns the surviving rows (order preserved) and the number dropped.
/// A missing outcome is informational, not fatal: rows without an observed
/// outcome simply cannot be used for training or evaluation.
#[must_use]
pub fn drop_missing_outcome(records: Vec<LabeledRecord>) -> (Vec<LabeledRecord>, usize) {
    let before = records.len();
    let kept: Vec<LabeledRecord> = records
        .into_iter()
        .filter(|r| r.enrollments.is_some())
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// A model-ready half of the split: features, targets, and the row ids kept
/// alongside for traceability.
///
/// The feature columns are pageviews, clicks, the numeric group code, and a
/// one-hot encoding of the weekday (Sun..Sat). The row id is deliberately
/// not a feature.
#[derive(Debug, Clone)]
pub struct DesignSet {
    /// Feature matrix, one row per observation.
    pub x: Matrix<f32>,
    /// Enrollment targets, parallel to `x`.
    pub y: Vector<f32>,
    /// Row ids parallel to `x`, for traceability only.
    pub row_ids: Vec<usize>,
}

/// Encodes cleaned records into a [`DesignSet`].
///
/// # Errors
///
/// Returns an error if the input is empty or any record still has a
/// missing outcome (the cleaner must run first).
pub fn to_design_set(records: &[LabeledRecord]) -> Result<DesignSet> {
    if records.is_empty() {
        return Err(EnsayoError::empty_input("cannot encode zero records"));
    }

    let mut data = Vec::with_capacity(records.len() * N_FEATURES);
    let mut targets = Vec::with_capacity(records.len());
    let mut row_ids = Vec::with_capacity(records.len());

    for record in records {
        let outcome = record.enrollments.ok_or_else(|| {
            EnsayoError::Other(format!(
                "row {} has a missing outcome; drop_missing_outcome must run before encoding",
                record.row_id
            ))
        })?;

        data.push(record.pageviews);
        data.push(record.clicks);
        data.push(record.group.code());
        for day in Weekday::ALL {
            data.push(if record.weekday == day { 1.0 } else { 0.0 });
        }

        targets.push(outcome);
        row_ids.push(record.row_id);
    }

    Ok(DesignSet {
        x: Matrix::from_vec(records.len(), N_FEATURES, data)?,
        y: Vector::from_vec(targets),
        row_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, pageviews: f32, clicks: f32, enrollments: Option<f32>) -> DailyRecord {
        DailyRecord {
            date: date.to_string(),
            pageviews,
            clicks,
            enrollments,
            payments: Some(0.0),
        }
    }

    #[test]
    fn test_merge_row_count_is_sum() {
        let control = vec![raw("Sat, Oct 11", 7723.0, 687.0, Some(134.0)); 5];
        let experiment = vec![raw("Sun, Oct 12", 9102.0, 779.0, Some(147.0)); 3];

        let merged = merge_and_label(&control, &experiment).unwrap();
        assert_eq!(merged.len(), 8);
    }

    #[test]
    fn test_merge_control_precedes_experiment() {
        let control = vec![raw("Mon, Oct 13", 100.0, 10.0, Some(5.0)); 2];
        let experiment = vec![raw("Tue, Oct 14", 200.0, 20.0, Some(7.0)); 2];

        let merged = merge_and_label(&control, &experiment).unwrap();
        assert_eq!(merged[0].group, Group::Control);
        assert_eq!(merged[1].group, Group::Control);
        assert_eq!(merged[2].group, Group::Experiment);
        assert_eq!(merged[3].group, Group::Experiment);
    }

    #[test]
    fn test_merge_assigns_monotonic_row_ids() {
        let control = vec![raw("Wed, Oct 15", 1.0, 1.0, Some(1.0)); 3];
        let experiment = vec![raw("Thu, Oct 16", 2.0, 2.0, Some(2.0)); 2];

        let merged = merge_and_label(&control, &experiment).unwrap();
        let ids: Vec<usize> = merged.iter().map(|r| r.row_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_merge_derives_weekday() {
        let control = vec![raw("Fri, Oct 17", 1.0, 1.0, Some(1.0))];
        let merged = merge_and_label(&control, &[]).unwrap();
        assert_eq!(merged[0].weekday, Weekday::Fri);
    }

    #[test]
    fn test_merge_bad_date_is_fatal() {
        let control = vec![raw("??? Oct 17", 1.0, 1.0, Some(1.0))];
        let err = merge_and_label(&control, &[]).unwrap_err();
        assert!(matches!(err, EnsayoError::UnknownDayAbbreviation { .. }));
    }

    #[test]
    fn test_drop_missing_outcome_counts_and_preserves() {
        let control = vec![
            raw("Sat, Oct 11", 1.0, 1.0, Some(10.0)),
            raw("Sun, Oct 12", 2.0, 2.0, None),
            raw("Mon, Oct 13", 3.0, 3.0, Some(30.0)),
            raw("Tue, Oct 14", 4.0, 4.0, None),
        ];
        let merged = merge_and_label(&control, &[]).unwrap();

        let (kept, dropped) = drop_missing_outcome(merged);
        assert_eq!(dropped, 2);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.enrollments.is_some()));
        // Order preserved, ids stable.
        assert_eq!(kept[0].row_id, 0);
        assert_eq!(kept[1].row_id, 2);
    }

    #[test]
    fn test_drop_missing_outcome_no_missing() {
        let control = vec![raw("Sat, Oct 11", 1.0, 1.0, Some(10.0)); 4];
        let merged = merge_and_label(&control, &[]).unwrap();
        let (kept, dropped) = drop_missing_outcome(merged);
        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn test_to_design_set_shape_and_encoding() {
        let control = vec![raw("Sat, Oct 11", 7723.0, 687.0, Some(134.0))];
        let experiment = vec![raw("Sun, Oct 12", 9102.0, 779.0, Some(147.0))];
        let merged = merge_and_label(&control, &experiment).unwrap();

        let design = to_design_set(&merged).unwrap();
        assert_eq!(design.x.shape(), (2, N_FEATURES));
        assert_eq!(design.y.len(), 2);
        assert_eq!(design.row_ids, vec![0, 1]);

        // Control row: pageviews, clicks, group 0, Sat one-hot last.
        assert_eq!(design.x.get(0, 0), 7723.0);
        assert_eq!(design.x.get(0, 1), 687.0);
        assert_eq!(design.x.get(0, 2), 0.0);
        assert_eq!(design.x.get(0, 3 + Weekday::Sat.index()), 1.0);
        assert_eq!(design.x.get(0, 3 + Weekday::Sun.index()), 0.0);

        // Experiment row: group 1, Sun one-hot.
        assert_eq!(design.x.get(1, 2), 1.0);
        assert_eq!(design.x.get(1, 3 + Weekday::Sun.index()), 1.0);
    }

    #[test]
    fn test_to_design_set_one_hot_sums_to_one() {
        let control = vec![
            raw("Sat, Oct 11", 1.0, 1.0, Some(1.0)),
            raw("Wed, Oct 15", 2.0, 2.0, Some(2.0)),
        ];
        let merged = merge_and_label(&control, &[]).unwrap();
        let design = to_design_set(&merged).unwrap();

        for row in 0..design.x.n_rows() {
            let sum: f32 = (0..Weekday::ALL.len())
                .map(|d| design.x.get(row, 3 + d))
                .sum();
            assert_eq!(sum, 1.0);
        }
    }

    #[test]
    fn test_to_design_set_rejects_missing_outcome() {
        let control = vec![raw("Sat, Oct 11", 1.0, 1.0, None)];
        let merged = merge_and_label(&control, &[]).unwrap();
        assert!(to_design_set(&merged).is_err());
    }

    #[test]
    fn test_to_design_set_rejects_empty() {
        assert!(to_design_set(&[]).is_err());
    }
}
