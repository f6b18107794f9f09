//! Time-series helper constants and default presets.

use chrono::TimeDelta;

/// Serial day number of [`TUP_EXCEL_DATE_REF_YMD`] in the 1900 date system.
///
/// Serial 60 is the fictitious 1900-02-29, so serials and calendar dates only
/// line up from this point onward.
pub const N_EXCEL_SERIAL_REF: i64 = 61;
/// Reference calendar date `(year, month, day)`.
pub const TUP_EXCEL_DATE_REF_YMD: (i32, u32, u32) = (1900, 3, 1);

/// Seconds per day.
pub const N_SECS_PER_DAY: i64 = 86_400;
/// Milliseconds per day.
pub const N_MILLIS_PER_DAY: i64 = 86_400_000;

/// Accepted date-time text formats, tried in order.
pub const TUP_DATETIME_TEXT_FORMATS: [&str; 12] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%d %m %Y %H:%M:%S",
    "%d %m %Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Accepted date-time text formats carrying a UTC offset, tried after RFC 3339.
pub const TUP_DATETIME_OFFSET_TEXT_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%:z",
];

/// Accepted date-only text formats, tried in order after date-time formats.
pub const TUP_DATE_TEXT_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%d.%m.%Y", "%d %m %Y", "%m/%d/%Y", "%d %B %Y",
];

/// Cyrillic month substitution table: `(pattern, month number)`, applied in order.
pub const TUP_CYRILLIC_MONTH_RULES: [(&str, &str); 12] = [
    (r"янв\w*", "01"),
    (r"фев\w*", "02"),
    (r"мар\w*", "03"),
    (r"апр\w*", "04"),
    (r"май\w*", "05"),
    (r"июн\w*", "06"),
    (r"июл\w*", "07"),
    (r"авг\w*", "08"),
    (r"сен\w*", "09"),
    (r"окт\w*", "10"),
    (r"ноя\w*", "11"),
    (r"дек\w*", "12"),
];

/// Default derivative time unit (one second).
pub fn derive_default_time_unit() -> TimeDelta {
    TimeDelta::seconds(1)
}
