//! Delimited-file loading for cohort data.

use super::DailyRecord;
use crate::error::{EnsayoError, Result};
use std::path::Path;

/// Loads one cohort's daily records from a headed CSV file.
///
/// The file must carry the column set
/// `Date,Pageviews,Clicks,Enrollments,Payments`. Empty `Enrollments` and
/// `Payments` fields deserialize to `None`.
///
/// # Errors
///
/// Returns [`EnsayoError::MissingFile`] if the path does not exist and
/// [`EnsayoError::Parse`] (with file and line context) for a malformed
/// header or row. Errors are fatal; there is no partial result.
pub fn load_records(path: &Path) -> Result<Vec<DailyRecord>> {
    if !path.exists() {
        return Err(EnsayoError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| parse_error(path, 1, &e))?;

    let mut records = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        // Header occupies line 1, first data row is line 2.
        let record: DailyRecord = row.map_err(|e| parse_error(path, i + 2, &e))?;
        records.push(record);
    }

    Ok(records)
}

fn parse_error(path: &Path, line: usize, err: &csv::Error) -> EnsayoError {
    EnsayoError::Parse {
        path: path.display().to_string(),
        line,
        message: err.to_string(),
    }
}
