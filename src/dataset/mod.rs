//! Record types for the A/B experiment data.
//!
//! A raw [`DailyRecord`] is one day of traffic for one cohort as read from
//! disk. Merging tags each row with its [`Group`] and derived [`Weekday`],
//! producing an immutable [`LabeledRecord`] that carries a stable row id
//! through shuffling and splitting.

mod loader;

pub use loader::load_records;

use crate::error::{EnsayoError, Result};
use serde::{Deserialize, Serialize};

/// One day of traffic for one cohort, as stored on disk.
///
/// The date string has the form `"Sat, Oct 11"`; only its first three
/// characters (the day-of-week abbreviation) are consumed downstream.
/// Enrollments may be missing for trailing days where the outcome was not
/// yet observed. Payments are recorded but never modeled: they sit causally
/// downstream of enrollments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyRecord {
    /// Calendar date, format "Day, Mon DD".
    #[serde(rename = "Date")]
    pub date: String,
    /// Number of page views that day.
    #[serde(rename = "Pageviews")]
    pub pageviews: f32,
    /// Number of clicks that day.
    #[serde(rename = "Clicks")]
    pub clicks: f32,
    /// Number of enrollments that day, if observed.
    #[serde(rename = "Enrollments")]
    pub enrollments: Option<f32>,
    /// Number of payments that day, if observed.
    #[serde(rename = "Payments")]
    pub payments: Option<f32>,
}

/// Experiment cohort assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// Cohort that did not receive the treatment.
    Control,
    /// Cohort exposed to the change under test.
    Experiment,
}

impl Group {
    /// Both groups in stratification order (control first).
    pub const ALL: [Group; 2] = [Group::Control, Group::Experiment];

    /// Numeric encoding used in the design matrix (control 0, experiment 1).
    #[must_use]
    pub fn code(self) -> f32 {
        match self {
            Group::Control => 0.0,
            Group::Experiment => 1.0,
        }
    }

    /// Human-readable group name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Group::Control => "control",
            Group::Experiment => "experiment",
        }
    }
}

/// Day of the week, the categorical feature derived from the date column.
///
/// The domain is fixed and ordered Sunday through Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// All seven days in domain order (Sun..Sat).
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Derives the weekday from a date string's first three characters.
    ///
    /// # Errors
    ///
    /// Returns [`EnsayoError::UnknownDayAbbreviation`] if the prefix is not
    /// one of the seven known abbreviations (including dates shorter than
    /// three characters).
    ///
    /// # Examples
    ///
    /// ```
    /// use ensayo::dataset::Weekday;
    ///
    /// assert_eq!(Weekday::from_date("Sat, Oct 11").unwrap(), Weekday::Sat);
    /// assert!(Weekday::from_date("Xyz, Oct 11").is_err());
    /// ```
    pub fn from_date(date: &str) -> Result<Self> {
        let prefix = date.get(..3).unwrap_or(date);
        match prefix {
            "Sun" => Ok(Weekday::Sun),
            "Mon" => Ok(Weekday::Mon),
            "Tue" => Ok(Weekday::Tue),
            "Wed" => Ok(Weekday::Wed),
            "Thu" => Ok(Weekday::Thu),
            "Fri" => Ok(Weekday::Fri),
            "Sat" => Ok(Weekday::Sat),
            _ => Err(EnsayoError::UnknownDayAbbreviation {
                prefix: prefix.to_string(),
            }),
        }
    }

    /// Position of this day in the Sun..Sat domain (0..=6).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Weekday::Sun => 0,
            Weekday::Mon => 1,
            Weekday::Tue => 2,
            Weekday::Wed => 3,
            Weekday::Thu => 4,
            Weekday::Fri => 5,
            Weekday::Sat => 6,
        }
    }

    /// Three-letter abbreviation (matches the accepted date prefixes).
    #[must_use]
    pub fn abbrev(self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

/// One merged observation: a [`DailyRecord`] tagged with its group, derived
/// weekday, and a synthetic row id.
///
/// The row id is assigned once when the two cohorts are merged, is unique
/// across the merged dataset, and exists only for traceability through the
/// shuffle/split. It is never fed to a model. The date and payments columns
/// do not survive the merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    /// Stable synthetic identifier, unique within the merged dataset.
    pub row_id: usize,
    /// Cohort this row came from.
    pub group: Group,
    /// Day-of-week category derived from the date column.
    pub weekday: Weekday,
    /// Number of page views that day.
    pub pageviews: f32,
    /// Number of clicks that day.
    pub clicks: f32,
    /// Enrollment outcome, if observed.
    pub enrollments: Option<f32>,
}
