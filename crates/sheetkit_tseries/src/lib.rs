//! `sheetkit_tseries` v1:
//! Stateless helpers for spreadsheet-oriented, time-indexed data.
//!
//! Modules:
//! - `conf`  : constants and default presets
//! - `spec`  : value models and errors
//! - `date`  : spreadsheet serial day number codec
//! - `text`  : numeric-string check and month-name normalization
//! - `util`  : pure series kernels (derivative, summary, bool report)
//! - `frame` : polars column/frame adapters
pub mod conf;
pub mod date;
pub mod frame;
pub mod spec;
pub mod text;
pub mod util;

pub use conf::{N_EXCEL_SERIAL_REF, TUP_CYRILLIC_MONTH_RULES, derive_default_time_unit};
pub use date::{
    convert_excel_date, convert_excel_date_any_value, derive_datetime_from_excel_serial,
    derive_datetime_from_excel_serial_int, derive_excel_date_scalar_from_any_value,
    derive_excel_date_value_from_any_value, derive_excel_date_value_from_scalar,
    derive_excel_serial_from_date, derive_excel_serial_from_datetime,
    derive_excel_serial_from_text, parse_datetime_text,
};
pub use frame::{
    convert_cyrillic_month_column, convert_datetime_to_timestamp, convert_timestamp_to_datetime,
    derive_bool_report_column, derive_time_derivative_frame, derive_timeseries_info_column,
};
pub use spec::{
    EnumExcelDateConverted, EnumExcelDateScalar, EnumExcelDateValue, SpecTimeSample, SpecTimeseriesGapCount,
    SpecTimeseriesInfo, TseriesError,
};
pub use text::{convert_cyrillic_month, convert_cyrillic_months, is_number, is_number_any_value};
pub use util::{
    derive_bool_report, derive_bool_report_by_position, derive_time_derivative,
    derive_timeseries_info,
};
