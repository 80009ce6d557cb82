//! End-to-end experiment evaluation.
//!
//! Loads the control and experiment cohorts, runs the cleaning and split
//! pipeline, then fits and scores each candidate model on the held-out
//! test set.

use std::path::Path;

use crate::dataset::load_records;
use crate::error::Result;
use crate::linear_model::LinearRegression;
use crate::metrics::{mae, r_squared, rmse};
use crate::model_selection::{stratified_split, SplitConfig};
use crate::pipeline::{drop_missing_outcome, merge_and_label, to_design_set, DesignSet};
use crate::traits::Estimator;
use crate::tree::{DecisionTreeRegressor, GradientBoostingRegressor};

/// Test-set metrics for one fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    /// Human-readable model name
    pub model: String,
    /// Mean absolute error on the test set
    pub mae: f32,
    /// Root mean squared error on the test set
    pub rmse: f32,
    /// Coefficient of determination on the test set
    pub r_squared: f32,
}

/// Summary of a full experiment run.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    /// Rows loaded from the control cohort
    pub control_rows: usize,
    /// Rows loaded from the experiment cohort
    pub experiment_rows: usize,
    /// Rows dropped for missing outcome values
    pub dropped_missing_outcome: usize,
    /// Rows in the training partition
    pub train_rows: usize,
    /// Rows in the test partition
    pub test_rows: usize,
    /// Per-model test-set metrics
    pub models: Vec<ModelReport>,
}

/// Fits `model` on the training design set and scores it on the test set.
///
/// # Errors
///
/// Returns an error if fitting fails.
pub fn evaluate_model<E: Estimator>(
    model: &mut E,
    name: &str,
    train: &DesignSet,
    test: &DesignSet,
) -> Result<ModelReport> {
    model.fit(&train.x, &train.y)?;
    let predictions = model.predict(&test.x);

    Ok(ModelReport {
        model: name.to_string(),
        mae: mae(&predictions, &test.y),
        rmse: rmse(&predictions, &test.y),
        r_squared: r_squared(&predictions, &test.y),
    })
}

/// Runs the full conversion analysis: load both cohorts, merge and label,
/// drop rows without an outcome, split into train/test strata, then fit
/// and score the three candidate regressors.
///
/// # Errors
///
/// Returns an error if either file is missing or malformed, if every row
/// lacks an outcome, or if a model fails to fit.
pub fn run_experiment(
    control_path: &Path,
    experiment_path: &Path,
    config: &SplitConfig,
) -> Result<ExperimentReport> {
    let control = load_records(control_path)?;
    let experiment = load_records(experiment_path)?;
    let control_rows = control.len();
    let experiment_rows = experiment.len();

    let labeled = merge_and_label(&control, &experiment)?;
    let (kept, dropped_missing_outcome) = drop_missing_outcome(labeled);

    let split = stratified_split(&kept, config)?;
    let train = to_design_set(&split.train)?;
    let test = to_design_set(&split.test)?;

    // The weekday one-hot block spans the constant column, so fitting a
    // separate intercept would make the normal equations singular.
    let mut models = Vec::with_capacity(3);
    models.push(evaluate_model(
        &mut LinearRegression::new().with_intercept(false),
        "linear_regression",
        &train,
        &test,
    )?);
    models.push(evaluate_model(
        &mut DecisionTreeRegressor::new().with_max_depth(5),
        "decision_tree",
        &train,
        &test,
    )?);
    models.push(evaluate_model(
        &mut GradientBoostingRegressor::new(),
        "gradient_boosting",
        &train,
        &test,
    )?);

    Ok(ExperimentReport {
        control_rows,
        experiment_rows,
        dropped_missing_outcome,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        models,
    })
}
