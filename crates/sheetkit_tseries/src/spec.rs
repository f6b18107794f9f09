//! Time-series value models and error types.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::PolarsError;

////////////////////////////////////////////////////////////////////////////////
// #region ExcelDateSpecification

/// Input accepted by [`crate::date::convert_excel_date`].
#[derive(Debug, Clone, PartialEq)]
pub enum EnumExcelDateValue {
    /// Date text, parsed with the accepted text formats.
    Text(String),
    /// Calendar timestamp.
    DateTime(NaiveDateTime),
    /// Calendar date (midnight).
    Date(NaiveDate),
    /// Whole serial day number.
    Integer(i64),
    /// Fractional serial day number.
    Float(f64),
}

/// Loosely typed scalar from a dynamic source (dataframe cell, Python object).
///
/// Classified into an [`EnumExcelDateValue`] by
/// [`crate::date::derive_excel_date_value_from_scalar`].
#[derive(Debug, Clone, PartialEq)]
pub enum EnumExcelDateScalar {
    /// Null / `None`.
    Missing,
    /// Boolean; never a serial even where the source treats it as an integer.
    Boolean(bool),
    /// Text.
    Text(String),
    /// Integer or integer-like (`__index__`) value.
    Integer(i64),
    /// Float or float-like (`__float__`) value.
    Float(f64),
    /// Calendar timestamp.
    DateTime(NaiveDateTime),
    /// Calendar date.
    Date(NaiveDate),
    /// Anything else (lists, mappings, ...).
    Other {
        /// Name of the received type.
        type_name: String,
    },
}

/// Result of [`crate::date::convert_excel_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExcelDateConverted {
    /// Serial day number (date-like input).
    Serial(i64),
    /// Calendar timestamp (number-like input).
    DateTime(NaiveDateTime),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SeriesSpecification

/// One `(timestamp, value)` sample; `None` or NaN marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecTimeSample {
    /// Sample timestamp.
    pub timestamp: NaiveDateTime,
    /// Sample value.
    pub value: Option<f64>,
}

impl SpecTimeSample {
    pub fn new(timestamp: NaiveDateTime, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    /// Value when present and not NaN.
    pub fn value_valid(&self) -> Option<f64> {
        self.value.filter(|v| !v.is_nan())
    }
}

/// Occurrence count of one consecutive-timestamp gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecTimeseriesGapCount {
    /// Gap between two consecutive timestamps.
    pub gap: TimeDelta,
    /// Number of times the gap occurs.
    pub count: usize,
}

/// Time series span and sampling interval summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTimeseriesInfo {
    /// Earliest timestamp.
    pub start: NaiveDateTime,
    /// Latest timestamp.
    pub end: NaiveDateTime,
    /// Gap counts, most frequent first.
    pub freq: Vec<SpecTimeseriesGapCount>,
}

impl SpecTimeseriesInfo {
    /// Most frequent gap, if any.
    pub fn gap_dominant(&self) -> Option<TimeDelta> {
        self.freq.first().map(|item| item.gap)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Errors raised by time-series helpers.
#[derive(Debug, thiserror::Error)]
pub enum TseriesError {
    /// Value is neither date-like nor number-like, or a column has the wrong dtype.
    #[error("Unsupported input type: expected str, date, datetime, int or float, got {type_name}")]
    UnsupportedType {
        /// Name of the received type.
        type_name: String,
    },
    /// Date text did not match any accepted format.
    #[error("Cannot parse date text: {text:?}")]
    ParseFailure {
        /// Rejected text.
        text: String,
    },
    /// Serial day number cannot be represented as a calendar timestamp.
    #[error("Serial day number out of range: {serial}")]
    SerialOutOfRange {
        /// Rejected serial.
        serial: f64,
    },
    /// Derivative time unit must be non-zero.
    #[error("Time unit must be non-zero, got {0:?}")]
    InvalidTimeUnit(TimeDelta),
    /// Paired sequences differ in length.
    #[error("Length mismatch: {left} flags vs {right} labels")]
    LengthMismatch {
        /// Length of the first sequence.
        left: usize,
        /// Length of the second sequence.
        right: usize,
    },
    /// Underlying dataframe error.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl TseriesError {
    /// Whether the error rejects the input's type rather than its value.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. })
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
