//! Shared XLSX reader models, options and errors.

use chrono::{NaiveDateTime, TimeDelta};
use polars::prelude::{DataFrame, PolarsError};

use crate::conf::C_COL_SHEET_NAME_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region CellSpecification

/// Normalized cell value between workbook parsing and column building.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Date or date-time value.
    DateTime(NaiveDateTime),
    /// Elapsed-time value (`[h]:mm:ss` and similar formats).
    Duration(TimeDelta),
    /// Spreadsheet error value (`#N/A`, `#DIV/0!`, ...).
    Error(String),
}

impl EnumCellValue {
    /// Whether the value carries no data for dtype inference.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::None | Self::Error(_))
    }

    /// Display text; `None` for blank and error cells.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::String(val) => Some(val.clone()),
            Self::Integer(val) => Some(val.to_string()),
            Self::Number(val) => Some(val.to_string()),
            Self::Boolean(val) => Some(if *val { "True" } else { "False" }.to_string()),
            Self::DateTime(val) => Some(val.to_string()),
            Self::Duration(val) => Some(val.to_string()),
            Self::Error(_) => None,
        }
    }
}

/// Inferred dtype of one sheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumColumnKind {
    /// Every value is an integer (or an integral float).
    Integer,
    /// Every value is numeric.
    Float,
    /// Every value is boolean.
    Boolean,
    /// Every value is a date or date-time.
    DateTime,
    /// Every value is an elapsed time.
    Duration,
    /// Mixed or textual values.
    String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReadOptions

/// Options for reading every sheet of a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetReadOptions {
    /// Append a column holding the sheet name on every row.
    pub if_add_sheet_name: bool,
    /// Name of the appended sheet-name column.
    pub col_sheet_name: String,
    /// Use the first row of each sheet as column names.
    pub if_header_row: bool,
}

impl Default for SpecSheetReadOptions {
    fn default() -> Self {
        Self {
            if_add_sheet_name: true,
            col_sheet_name: C_COL_SHEET_NAME_DEFAULT.to_string(),
            if_header_row: true,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Tables

/// One parsed sheet.
#[derive(Debug, Clone)]
pub struct SpecSheetTable {
    /// Sheet name as stored in the workbook.
    pub sheet_name: String,
    /// Parsed sheet body.
    pub df: DataFrame,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Errors raised while reading a workbook.
#[derive(Debug, thiserror::Error)]
pub enum XlsxReadError {
    /// Workbook could not be opened or a sheet could not be parsed.
    #[error(transparent)]
    Workbook(#[from] calamine::Error),
    /// Parsed cells could not be assembled into a dataframe.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
