//! Stateless helper utilities used by the XLSX reader.

use std::collections::BTreeSet;

use calamine::Data;
use polars::prelude::{Column, DataType, NamedFrom, PolarsResult, Series, TimeUnit};
use sheetkit_tseries::{
    convert_datetime_to_timestamp, derive_datetime_from_excel_serial, parse_datetime_text,
};

use crate::conf::{C_COL_DUPLICATE_SEP, C_COL_UNNAMED_PREFIX, N_INT_EXACT_F64_MAX};
use crate::spec::{EnumCellValue, EnumColumnKind};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Normalize a workbook cell.
///
/// Elapsed-time cells become durations. Date cells are resolved against the
/// workbook's date system (1900 or 1904), falling back to the 1900 serial
/// codec; a serial that cannot be represented stays numeric.
pub fn convert_data_to_cell_value(data: &Data) -> EnumCellValue {
    match data {
        Data::Empty => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Int(val) => EnumCellValue::Integer(*val),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Bool(val) => EnumCellValue::Boolean(*val),
        Data::DateTime(val) if val.is_duration() => match val.as_duration() {
            Some(delta) => EnumCellValue::Duration(delta),
            None => EnumCellValue::Number(val.as_f64()),
        },
        Data::DateTime(val) => {
            let n_serial = val.as_f64();
            match val
                .as_datetime()
                .or_else(|| derive_datetime_from_excel_serial(n_serial).ok())
            {
                Some(dt) => EnumCellValue::DateTime(dt),
                None => EnumCellValue::Number(n_serial),
            }
        }
        Data::DateTimeIso(val) => match parse_datetime_text(val) {
            Ok(dt) => EnumCellValue::DateTime(dt),
            Err(_) => EnumCellValue::String(val.clone()),
        },
        Data::DurationIso(val) => EnumCellValue::String(val.clone()),
        Data::Error(err) => EnumCellValue::Error(err.to_string()),
    }
}

fn is_integral_number(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() <= N_INT_EXACT_F64_MAX
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnBuilding

/// Infer a column dtype from its cells; blank and error cells are ignored.
///
/// A column with no data at all is `Float`.
pub fn derive_column_kind(cells: &[EnumCellValue]) -> EnumColumnKind {
    let l_present: Vec<&EnumCellValue> =
        cells.iter().filter(|cell| !cell.is_missing()).collect();
    if l_present.is_empty() {
        return EnumColumnKind::Float;
    }

    let if_all = |pred: fn(&EnumCellValue) -> bool| l_present.iter().all(|cell| pred(cell));
    if if_all(|cell| match cell {
        EnumCellValue::Integer(_) => true,
        EnumCellValue::Number(val) => is_integral_number(*val),
        _ => false,
    }) {
        EnumColumnKind::Integer
    } else if if_all(|cell| {
        matches!(cell, EnumCellValue::Integer(_) | EnumCellValue::Number(_))
    }) {
        EnumColumnKind::Float
    } else if if_all(|cell| matches!(cell, EnumCellValue::Boolean(_))) {
        EnumColumnKind::Boolean
    } else if if_all(|cell| matches!(cell, EnumCellValue::DateTime(_))) {
        EnumColumnKind::DateTime
    } else if if_all(|cell| matches!(cell, EnumCellValue::Duration(_))) {
        EnumColumnKind::Duration
    } else {
        EnumColumnKind::String
    }
}

/// Build one polars column of `kind` from `cells`.
pub fn build_column(
    name: &str,
    cells: &[EnumCellValue],
    kind: EnumColumnKind,
) -> PolarsResult<Column> {
    let series = match kind {
        EnumColumnKind::Integer => {
            let l_values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::Integer(val) => Some(*val),
                    EnumCellValue::Number(val) => Some(*val as i64),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), l_values)
        }
        EnumColumnKind::Float => {
            let l_values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::Integer(val) => Some(*val as f64),
                    EnumCellValue::Number(val) => Some(*val),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), l_values)
        }
        EnumColumnKind::Boolean => {
            let l_values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::Boolean(val) => Some(*val),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), l_values)
        }
        EnumColumnKind::DateTime => {
            let l_values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::DateTime(val) => {
                        convert_datetime_to_timestamp(*val, TimeUnit::Milliseconds)
                    }
                    _ => None,
                })
                .collect();
            Series::new(name.into(), l_values)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        }
        EnumColumnKind::Duration => {
            let l_values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    EnumCellValue::Duration(val) => Some(val.num_milliseconds()),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), l_values)
                .cast(&DataType::Duration(TimeUnit::Milliseconds))?
        }
        EnumColumnKind::String => {
            let l_values: Vec<Option<String>> =
                cells.iter().map(EnumCellValue::to_text).collect();
            Series::new(name.into(), l_values)
        }
    };
    Ok(Column::from(series))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Make header names usable as column names.
///
/// Blank names become `Unnamed: {idx}`; repeated names get `.1`, `.2`, ...
/// suffixes, skipping suffixed names that already exist.
pub fn derive_unique_column_names(names: &[String]) -> Vec<String> {
    let l_names_base: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(n_idx, c_name)| {
            if c_name.trim().is_empty() {
                format!("{C_COL_UNNAMED_PREFIX}{n_idx}")
            } else {
                c_name.clone()
            }
        })
        .collect();

    let set_names_original: BTreeSet<&str> = l_names_base.iter().map(String::as_str).collect();
    let mut set_names_used: BTreeSet<String> = BTreeSet::new();
    let mut l_names_unique = Vec::with_capacity(l_names_base.len());

    for c_name in &l_names_base {
        if !set_names_used.contains(c_name) {
            set_names_used.insert(c_name.clone());
            l_names_unique.push(c_name.clone());
            continue;
        }

        let mut n_counter = 1usize;
        let c_name_unique = loop {
            let c_candidate = format!("{c_name}{C_COL_DUPLICATE_SEP}{n_counter}");
            if !set_names_used.contains(&c_candidate)
                && !set_names_original.contains(c_candidate.as_str())
            {
                break c_candidate;
            }
            n_counter += 1;
        };
        set_names_used.insert(c_name_unique.clone());
        l_names_unique.push(c_name_unique);
    }

    l_names_unique
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
