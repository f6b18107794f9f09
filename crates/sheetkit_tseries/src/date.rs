//! Spreadsheet serial day number <-> calendar date codec (1900 date system).
//!
//! The 1900 system counts a nonexistent 1900-02-29, so serials are anchored at
//! 1900-03-01 (serial 61). Results are exact from that date onward; earlier
//! dates are off by one day and are not corrected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use polars::prelude::AnyValue;

use crate::conf::{
    N_EXCEL_SERIAL_REF, N_MILLIS_PER_DAY, TUP_DATE_TEXT_FORMATS, TUP_DATETIME_OFFSET_TEXT_FORMATS,
    TUP_DATETIME_TEXT_FORMATS, TUP_EXCEL_DATE_REF_YMD,
};
use crate::frame::derive_datetime_from_any_value;
use crate::spec::{
    EnumExcelDateConverted, EnumExcelDateScalar, EnumExcelDateValue, TseriesError,
};

////////////////////////////////////////////////////////////////////////////////
// #region Reference

fn derive_date_ref() -> NaiveDate {
    let (n_year, n_month, n_day) = TUP_EXCEL_DATE_REF_YMD;
    NaiveDate::from_ymd_opt(n_year, n_month, n_day).unwrap_or_default()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DateToSerial

/// Serial day number of `dt`; time-of-day is dropped.
pub fn derive_excel_serial_from_datetime(dt: NaiveDateTime) -> i64 {
    derive_excel_serial_from_date(dt.date())
}

/// Serial day number of `date`.
pub fn derive_excel_serial_from_date(date: NaiveDate) -> i64 {
    (date - derive_date_ref()).num_days() + N_EXCEL_SERIAL_REF
}

/// Parse date text and return its serial day number.
pub fn derive_excel_serial_from_text(text: &str) -> Result<i64, TseriesError> {
    Ok(derive_excel_serial_from_datetime(parse_datetime_text(text)?))
}

/// Parse date text.
///
/// RFC 3339 and other offset-carrying forms are tried first and keep their
/// local wall-clock time (`2020-01-01T01:00:00+03:00` is 01:00 on 2020-01-01).
/// Naive date-time formats come next, then date-only formats.
pub fn parse_datetime_text(text: &str) -> Result<NaiveDateTime, TseriesError> {
    let c_text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(c_text) {
        return Ok(dt.naive_local());
    }
    for c_fmt in TUP_DATETIME_OFFSET_TEXT_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(c_text, c_fmt) {
            return Ok(dt.naive_local());
        }
    }
    for c_fmt in TUP_DATETIME_TEXT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(c_text, c_fmt) {
            return Ok(dt);
        }
    }
    for c_fmt in TUP_DATE_TEXT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(c_text, c_fmt) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(TseriesError::ParseFailure {
        text: text.to_string(),
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SerialToDate

/// Calendar timestamp of a fractional serial; time-of-day is rounded to the millisecond.
pub fn derive_datetime_from_excel_serial(serial: f64) -> Result<NaiveDateTime, TseriesError> {
    let err_range = || TseriesError::SerialOutOfRange { serial };
    if !serial.is_finite() {
        return Err(err_range());
    }

    let n_days_whole = serial.floor();
    let n_millis_frac = ((serial - n_days_whole) * N_MILLIS_PER_DAY as f64).round() as i64;
    if n_days_whole.abs() > i32::MAX as f64 {
        return Err(err_range());
    }

    let delta_days = TimeDelta::try_days(n_days_whole as i64 - N_EXCEL_SERIAL_REF)
        .ok_or_else(err_range)?;
    let delta_frac = TimeDelta::try_milliseconds(n_millis_frac).ok_or_else(err_range)?;

    derive_date_ref()
        .and_time(NaiveTime::MIN)
        .checked_add_signed(delta_days)
        .and_then(|dt| dt.checked_add_signed(delta_frac))
        .ok_or_else(err_range)
}

/// Calendar timestamp of a whole serial.
pub fn derive_datetime_from_excel_serial_int(serial: i64) -> Result<NaiveDateTime, TseriesError> {
    let err_range = || TseriesError::SerialOutOfRange {
        serial: serial as f64,
    };
    let delta_days = serial
        .checked_sub(N_EXCEL_SERIAL_REF)
        .and_then(TimeDelta::try_days)
        .ok_or_else(err_range)?;
    derive_date_ref()
        .and_time(NaiveTime::MIN)
        .checked_add_signed(delta_days)
        .ok_or_else(err_range)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Dispatch

/// Convert date-like input to a serial, or number-like input to a timestamp.
pub fn convert_excel_date(
    value: &EnumExcelDateValue,
) -> Result<EnumExcelDateConverted, TseriesError> {
    match value {
        EnumExcelDateValue::Text(text) => {
            derive_excel_serial_from_text(text).map(EnumExcelDateConverted::Serial)
        }
        EnumExcelDateValue::DateTime(dt) => Ok(EnumExcelDateConverted::Serial(
            derive_excel_serial_from_datetime(*dt),
        )),
        EnumExcelDateValue::Date(date) => Ok(EnumExcelDateConverted::Serial(
            derive_excel_serial_from_date(*date),
        )),
        EnumExcelDateValue::Integer(serial) => {
            derive_datetime_from_excel_serial_int(*serial).map(EnumExcelDateConverted::DateTime)
        }
        EnumExcelDateValue::Float(serial) => {
            derive_datetime_from_excel_serial(*serial).map(EnumExcelDateConverted::DateTime)
        }
    }
}

/// Classify a loosely typed scalar as date-like or number-like input.
///
/// Missing, boolean and other values are rejected with
/// [`TseriesError::UnsupportedType`].
pub fn derive_excel_date_value_from_scalar(
    scalar: EnumExcelDateScalar,
) -> Result<EnumExcelDateValue, TseriesError> {
    let value_date = match scalar {
        EnumExcelDateScalar::Text(text) => EnumExcelDateValue::Text(text),
        EnumExcelDateScalar::Integer(val) => EnumExcelDateValue::Integer(val),
        EnumExcelDateScalar::Float(val) => EnumExcelDateValue::Float(val),
        EnumExcelDateScalar::DateTime(dt) => EnumExcelDateValue::DateTime(dt),
        EnumExcelDateScalar::Date(date) => EnumExcelDateValue::Date(date),
        EnumExcelDateScalar::Missing => {
            return Err(TseriesError::UnsupportedType {
                type_name: "null".to_string(),
            });
        }
        EnumExcelDateScalar::Boolean(_) => {
            return Err(TseriesError::UnsupportedType {
                type_name: "bool".to_string(),
            });
        }
        EnumExcelDateScalar::Other { type_name } => {
            return Err(TseriesError::UnsupportedType { type_name });
        }
    };
    Ok(value_date)
}

/// Loosely typed scalar of a dataframe cell.
pub fn derive_excel_date_scalar_from_any_value(
    value: AnyValue<'_>,
) -> Result<EnumExcelDateScalar, TseriesError> {
    let scalar = match value {
        AnyValue::Null => EnumExcelDateScalar::Missing,
        AnyValue::Boolean(val) => EnumExcelDateScalar::Boolean(val),
        AnyValue::String(val) => EnumExcelDateScalar::Text(val.to_string()),
        AnyValue::StringOwned(val) => EnumExcelDateScalar::Text(val.to_string()),
        AnyValue::UInt8(val) => EnumExcelDateScalar::Integer(val as i64),
        AnyValue::UInt16(val) => EnumExcelDateScalar::Integer(val as i64),
        AnyValue::UInt32(val) => EnumExcelDateScalar::Integer(val as i64),
        AnyValue::Int8(val) => EnumExcelDateScalar::Integer(val as i64),
        AnyValue::Int16(val) => EnumExcelDateScalar::Integer(val as i64),
        AnyValue::Int32(val) => EnumExcelDateScalar::Integer(val as i64),
        AnyValue::Int64(val) => EnumExcelDateScalar::Integer(val),
        AnyValue::UInt64(val) => EnumExcelDateScalar::Float(val as f64),
        AnyValue::Float32(val) => EnumExcelDateScalar::Float(val as f64),
        AnyValue::Float64(val) => EnumExcelDateScalar::Float(val),
        AnyValue::Date(_) | AnyValue::Datetime(..) => {
            let type_name = value.dtype().to_string();
            match derive_datetime_from_any_value(value)? {
                Some(dt) => EnumExcelDateScalar::DateTime(dt),
                None => EnumExcelDateScalar::Other { type_name },
            }
        }
        _ => EnumExcelDateScalar::Other {
            type_name: value.dtype().to_string(),
        },
    };
    Ok(scalar)
}

/// Classify a dataframe cell as date-like or number-like input.
pub fn derive_excel_date_value_from_any_value(
    value: AnyValue<'_>,
) -> Result<EnumExcelDateValue, TseriesError> {
    derive_excel_date_value_from_scalar(derive_excel_date_scalar_from_any_value(value)?)
}

/// [`convert_excel_date`] over a dataframe cell.
///
/// `Null`, `Boolean` and nested (list) values are rejected with
/// [`TseriesError::UnsupportedType`].
pub fn convert_excel_date_any_value(
    value: AnyValue<'_>,
) -> Result<EnumExcelDateConverted, TseriesError> {
    convert_excel_date(&derive_excel_date_value_from_any_value(value)?)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use polars::prelude::{NamedFrom, Series};

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_serial_known_fixed_points() {
        assert_eq!(derive_excel_serial_from_datetime(ymd(1900, 3, 1)), 61);
        assert_eq!(derive_excel_serial_from_datetime(ymd(2020, 1, 1)), 43831);
        assert_eq!(derive_excel_serial_from_datetime(ymd(1970, 1, 1)), 25569);
    }

    #[test]
    fn test_serial_ignores_time_of_day() {
        let dt = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(derive_excel_serial_from_datetime(dt), 43831);
    }

    #[test]
    fn test_round_trip_from_boundary_onward() {
        let mut dt = ymd(1900, 3, 1);
        for _ in 0..2_000 {
            let n_serial = derive_excel_serial_from_datetime(dt);
            assert_eq!(derive_datetime_from_excel_serial_int(n_serial).unwrap(), dt);
            assert_eq!(
                derive_datetime_from_excel_serial(n_serial as f64).unwrap(),
                dt
            );
            dt += TimeDelta::days(53);
        }

        for n_serial in [61_i64, 100, 25569, 43831, 2_958_465] {
            let dt = derive_datetime_from_excel_serial_int(n_serial).unwrap();
            assert_eq!(derive_excel_serial_from_datetime(dt), n_serial);
        }
    }

    #[test]
    fn test_fractional_serial_keeps_time_of_day() {
        let dt = derive_datetime_from_excel_serial(43831.5).unwrap();
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_before_boundary_is_not_corrected() {
        // Serial 60 is the fictitious 1900-02-29; the codec yields 1900-02-28.
        assert_eq!(
            derive_datetime_from_excel_serial_int(60).unwrap(),
            ymd(1900, 2, 28)
        );
        assert_eq!(derive_excel_serial_from_datetime(ymd(1900, 1, 1)), 2);
    }

    #[test]
    fn test_serial_out_of_range() {
        assert!(matches!(
            derive_datetime_from_excel_serial(f64::NAN),
            Err(TseriesError::SerialOutOfRange { .. })
        ));
        assert!(matches!(
            derive_datetime_from_excel_serial_int(i64::MAX),
            Err(TseriesError::SerialOutOfRange { .. })
        ));
    }

    #[test]
    fn test_convert_excel_date_dispatch() {
        assert_eq!(
            convert_excel_date(&EnumExcelDateValue::Text("2020-01-01".to_string())).unwrap(),
            EnumExcelDateConverted::Serial(43831)
        );
        assert_eq!(
            convert_excel_date(&EnumExcelDateValue::Text("01.01.2020 10:30".to_string()))
                .unwrap(),
            EnumExcelDateConverted::Serial(43831)
        );
        assert_eq!(
            convert_excel_date(&EnumExcelDateValue::Integer(43831)).unwrap(),
            EnumExcelDateConverted::DateTime(ymd(2020, 1, 1))
        );
        assert_eq!(
            convert_excel_date(&EnumExcelDateValue::Date(
                NaiveDate::from_ymd_opt(1900, 3, 1).unwrap()
            ))
            .unwrap(),
            EnumExcelDateConverted::Serial(61)
        );
        assert!(matches!(
            convert_excel_date(&EnumExcelDateValue::Text("not a date".to_string())),
            Err(TseriesError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_parse_datetime_text_with_offset_keeps_local_time() {
        assert_eq!(
            derive_excel_serial_from_text("2020-01-01T00:00:00Z").unwrap(),
            43831
        );
        assert_eq!(
            parse_datetime_text("2020-01-01T01:30:00+03:00").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(1, 30, 0)
                .unwrap()
        );
        assert_eq!(
            derive_excel_serial_from_text("2020-01-01 23:00:00-05:00").unwrap(),
            43831
        );
        assert_eq!(
            derive_excel_serial_from_text("2020-01-01 10:00:00+0300").unwrap(),
            43831
        );
        assert_eq!(
            derive_excel_serial_from_text("2020-01-01T10:00+03:00").unwrap(),
            43831
        );
    }

    #[test]
    fn test_parse_datetime_text_minute_precision() {
        let dt_expected = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        for c_text in [
            "2020-01-01 10:30",
            "2020-01-01T10:30",
            "2020/01/01 10:30",
            "2020/01/01 10:30:00",
            "01.01.2020 10:30",
            "01 01 2020 10:30",
            "01/01/2020 10:30",
            "01/01/2020 10:30:00",
        ] {
            assert_eq!(parse_datetime_text(c_text).unwrap(), dt_expected, "{c_text}");
        }
    }

    #[test]
    fn test_convert_excel_date_any_value_rejects_unsupported_types() {
        for value in [AnyValue::Null, AnyValue::Boolean(true)] {
            let err = convert_excel_date_any_value(value).unwrap_err();
            assert!(matches!(err, TseriesError::UnsupportedType { .. }));
        }

        let s_list = Series::new("item".into(), &["not a date"]);
        let err = convert_excel_date_any_value(AnyValue::List(s_list)).unwrap_err();
        assert!(err.is_type_error());
        assert!(err.to_string().contains("list"));

        assert_eq!(
            convert_excel_date_any_value(AnyValue::String("2020-01-01")).unwrap(),
            EnumExcelDateConverted::Serial(43831)
        );
        assert_eq!(
            convert_excel_date_any_value(AnyValue::Float64(61.0)).unwrap(),
            EnumExcelDateConverted::DateTime(ymd(1900, 3, 1))
        );
    }

    #[test]
    fn test_scalar_classification() {
        let err = derive_excel_date_value_from_scalar(EnumExcelDateScalar::Boolean(true))
            .unwrap_err();
        assert!(err.is_type_error());
        assert!(err.to_string().contains("bool"));

        let err = derive_excel_date_value_from_scalar(EnumExcelDateScalar::Other {
            type_name: "list".to_string(),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            TseriesError::UnsupportedType { ref type_name } if type_name == "list"
        ));
        assert!(derive_excel_date_value_from_scalar(EnumExcelDateScalar::Missing).is_err());

        assert_eq!(
            derive_excel_date_value_from_scalar(EnumExcelDateScalar::Integer(43831)).unwrap(),
            EnumExcelDateValue::Integer(43831)
        );
        assert_eq!(
            derive_excel_date_value_from_scalar(EnumExcelDateScalar::Float(61.5)).unwrap(),
            EnumExcelDateValue::Float(61.5)
        );
        assert_eq!(
            derive_excel_date_scalar_from_any_value(AnyValue::Boolean(false)).unwrap(),
            EnumExcelDateScalar::Boolean(false)
        );
        assert!(
            !TseriesError::ParseFailure {
                text: "x".to_string()
            }
            .is_type_error()
        );
    }
}
