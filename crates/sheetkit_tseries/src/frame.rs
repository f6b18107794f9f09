//! Polars adapters for the time-series kernels.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use log::debug;
use polars::prelude::{AnyValue, Column, DataFrame, DataType, NamedFrom, Series, TimeUnit};

use crate::conf::N_SECS_PER_DAY;
use crate::spec::{SpecTimeSample, SpecTimeseriesInfo, TseriesError};
use crate::text::convert_cyrillic_months;
use crate::util::{derive_bool_report_by_position, derive_time_derivative, derive_timeseries_info};

////////////////////////////////////////////////////////////////////////////////
// #region TimestampConversion

fn derive_nanos_per_unit(time_unit: TimeUnit) -> i64 {
    match time_unit {
        TimeUnit::Nanoseconds => 1,
        TimeUnit::Microseconds => 1_000,
        TimeUnit::Milliseconds => 1_000_000,
    }
}

/// Convert a physical `Datetime` value to a naive timestamp.
pub fn convert_timestamp_to_datetime(value: i64, time_unit: TimeUnit) -> Option<NaiveDateTime> {
    let n_units_per_sec = 1_000_000_000 / derive_nanos_per_unit(time_unit);
    let n_secs = value.div_euclid(n_units_per_sec);
    let n_nanos = value.rem_euclid(n_units_per_sec) * derive_nanos_per_unit(time_unit);
    DateTime::from_timestamp(n_secs, n_nanos as u32).map(|dt| dt.naive_utc())
}

/// Convert a naive timestamp to a physical `Datetime` value.
pub fn convert_datetime_to_timestamp(dt: NaiveDateTime, time_unit: TimeUnit) -> Option<i64> {
    let dt_utc = dt.and_utc();
    match time_unit {
        TimeUnit::Nanoseconds => dt_utc.timestamp_nanos_opt(),
        TimeUnit::Microseconds => Some(dt_utc.timestamp_micros()),
        TimeUnit::Milliseconds => Some(dt_utc.timestamp_millis()),
    }
}

/// Timestamp of a `Date`/`Datetime` cell; `None` for nulls and unrepresentable values.
pub fn derive_datetime_from_any_value(
    value: AnyValue<'_>,
) -> Result<Option<NaiveDateTime>, TseriesError> {
    match value {
        AnyValue::Null => Ok(None),
        AnyValue::Date(n_days) => {
            Ok(DateTime::from_timestamp(n_days as i64 * N_SECS_PER_DAY, 0).map(|dt| dt.naive_utc()))
        }
        AnyValue::Datetime(n_value, time_unit, _) => {
            Ok(convert_timestamp_to_datetime(n_value, time_unit))
        }
        _ => Err(TseriesError::UnsupportedType {
            type_name: value.dtype().to_string(),
        }),
    }
}

fn derive_f64_from_any_value(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::UInt8(val) => Some(val as f64),
        AnyValue::UInt16(val) => Some(val as f64),
        AnyValue::UInt32(val) => Some(val as f64),
        AnyValue::UInt64(val) => Some(val as f64),
        AnyValue::Int8(val) => Some(val as f64),
        AnyValue::Int16(val) => Some(val as f64),
        AnyValue::Int32(val) => Some(val as f64),
        AnyValue::Int64(val) => Some(val as f64),
        AnyValue::Float32(val) => Some(val as f64),
        AnyValue::Float64(val) => Some(val),
        _ => None,
    }
}

fn validate_datetime_column(col: &Column) -> Result<TimeUnit, TseriesError> {
    match col.dtype() {
        DataType::Datetime(time_unit, _) => Ok(*time_unit),
        dtype => Err(TseriesError::UnsupportedType {
            type_name: dtype.to_string(),
        }),
    }
}

/// Non-null timestamps of a `Datetime` column, in row order.
pub fn derive_datetimes_from_column(col: &Column) -> Result<Vec<NaiveDateTime>, TseriesError> {
    validate_datetime_column(col)?;
    let mut l_datetimes = Vec::with_capacity(col.len());
    for n_idx in 0..col.len() {
        if let Some(dt) = derive_datetime_from_any_value(col.get(n_idx)?)? {
            l_datetimes.push(dt);
        }
    }
    Ok(l_datetimes)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FrameHelpers

/// Time derivative of `col_value` against the `Datetime` column `col_time`.
///
/// Returns a new frame with the same two column names; the time column keeps
/// the input dtype (time unit and time zone). Rows with a null timestamp are dropped together with
/// missing values. See [`derive_time_derivative`].
pub fn derive_time_derivative_frame(
    df: &DataFrame,
    col_time: &str,
    col_value: &str,
    time_unit: TimeDelta,
) -> Result<DataFrame, TseriesError> {
    let col_t = df.column(col_time)?;
    let time_unit_col = validate_datetime_column(col_t)?;
    let col_v = df.column(col_value)?;
    if !col_v.dtype().is_numeric() {
        return Err(TseriesError::UnsupportedType {
            type_name: col_v.dtype().to_string(),
        });
    }

    let mut l_samples = Vec::with_capacity(df.height());
    for n_idx in 0..df.height() {
        let Some(timestamp) = derive_datetime_from_any_value(col_t.get(n_idx)?)? else {
            continue;
        };
        let value = derive_f64_from_any_value(col_v.get(n_idx)?);
        l_samples.push(SpecTimeSample::new(timestamp, value));
    }

    let l_rates = derive_time_derivative(&l_samples, time_unit)?;
    debug!(
        "time derivative {col_value:?}: kept {} of {} rows",
        l_rates.len(),
        df.height()
    );

    let l_timestamps: Vec<Option<i64>> = l_rates
        .iter()
        .map(|sample| convert_datetime_to_timestamp(sample.timestamp, time_unit_col))
        .collect();
    let l_values: Vec<Option<f64>> = l_rates.iter().map(|sample| sample.value).collect();

    let s_time = Series::new(col_time.into(), l_timestamps).cast(col_t.dtype())?;
    let s_value = Series::new(col_value.into(), l_values);

    Ok(DataFrame::new(vec![
        Column::from(s_time),
        Column::from(s_value),
    ])?)
}

/// Span and gap frequency of a `Datetime` column; `None` when it has no timestamps.
pub fn derive_timeseries_info_column(
    col: &Column,
) -> Result<Option<SpecTimeseriesInfo>, TseriesError> {
    Ok(derive_timeseries_info(&derive_datetimes_from_column(col)?))
}

/// Row positions grouped by the value of a `Boolean` column.
pub fn derive_bool_report_column(
    col: &Column,
) -> Result<BTreeMap<bool, BTreeSet<usize>>, TseriesError> {
    if col.dtype() != &DataType::Boolean {
        return Err(TseriesError::UnsupportedType {
            type_name: col.dtype().to_string(),
        });
    }

    let mut l_flags = Vec::with_capacity(col.len());
    for n_idx in 0..col.len() {
        l_flags.push(match col.get(n_idx)? {
            AnyValue::Boolean(val) => Some(val),
            _ => None,
        });
    }
    Ok(derive_bool_report_by_position(&l_flags))
}

/// Cyrillic month normalization over a `String` column.
pub fn convert_cyrillic_month_column(col: &Column) -> Result<Column, TseriesError> {
    if col.dtype() != &DataType::String {
        return Err(TseriesError::UnsupportedType {
            type_name: col.dtype().to_string(),
        });
    }

    let mut l_values: Vec<Option<String>> = Vec::with_capacity(col.len());
    for n_idx in 0..col.len() {
        l_values.push(match col.get(n_idx)? {
            AnyValue::String(val) => Some(val.to_string()),
            AnyValue::StringOwned(val) => Some(val.to_string()),
            _ => None,
        });
    }

    let s_converted = Series::new(col.name().clone(), convert_cyrillic_months(&l_values));
    Ok(Column::from(s_converted))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
