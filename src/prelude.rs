//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use ensayo::prelude::*;
//! ```

pub use crate::dataset::{load_records, DailyRecord, Group, LabeledRecord, Weekday};
pub use crate::evaluate::{run_experiment, ExperimentReport, ModelReport};
pub use crate::linear_model::LinearRegression;
pub use crate::metrics::{mae, mse, r_squared, rmse};
pub use crate::model_selection::{stratified_split, SplitConfig, TrainTestSplit};
pub use crate::pipeline::{drop_missing_outcome, merge_and_label, to_design_set, DesignSet};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::Estimator;
pub use crate::tree::{DecisionTreeRegressor, GradientBoostingRegressor};
