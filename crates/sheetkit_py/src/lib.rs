use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::{IpcWriter, SerWriter};
use pyo3::exceptions::{PyOSError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyBytes, PyFloat, PyInt, PyString};
use sheetkit_io_xlsx::{SpecSheetReadOptions, XlsxReadError, read_all_sheets};
use sheetkit_tseries::{
    EnumExcelDateConverted, EnumExcelDateScalar, SpecTimeSample, TseriesError, convert_excel_date,
    convert_cyrillic_months, derive_bool_report_by_position, derive_default_time_unit,
    derive_excel_date_value_from_scalar, derive_time_derivative, derive_timeseries_info, is_number,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "sheetkit.tseries.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native+polars_ipc";

////////////////////////////////////////////////////////////////////////////////
// #region ErrorMapping

fn map_tseries_error(err: TseriesError) -> PyErr {
    if err.is_type_error() {
        PyTypeError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}

fn map_xlsx_read_error(err: XlsxReadError) -> PyErr {
    match err {
        XlsxReadError::Workbook(_) => PyOSError::new_err(err.to_string()),
        XlsxReadError::Polars(_) => PyValueError::new_err(err.to_string()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExcelDate

/// Probe a Python object; `bool` is checked before `int` since it subclasses it.
fn derive_excel_date_scalar(value: &Bound<'_, PyAny>) -> PyResult<EnumExcelDateScalar> {
    if value.is_none() {
        return Ok(EnumExcelDateScalar::Missing);
    }
    if value.is_instance_of::<PyBool>() {
        return Ok(EnumExcelDateScalar::Boolean(value.extract::<bool>()?));
    }
    if value.is_instance_of::<PyString>() {
        return Ok(EnumExcelDateScalar::Text(value.extract::<String>()?));
    }
    if value.is_instance_of::<PyInt>() {
        return Ok(EnumExcelDateScalar::Integer(value.extract::<i64>()?));
    }
    if value.is_instance_of::<PyFloat>() {
        return Ok(EnumExcelDateScalar::Float(value.extract::<f64>()?));
    }
    if let Ok(dt) = value.extract::<NaiveDateTime>() {
        return Ok(EnumExcelDateScalar::DateTime(dt));
    }
    if let Ok(date) = value.extract::<NaiveDate>() {
        return Ok(EnumExcelDateScalar::Date(date));
    }
    // numpy scalars and other number-likes
    if value.hasattr("__index__")? {
        return Ok(EnumExcelDateScalar::Integer(value.extract::<i64>()?));
    }
    if value.hasattr("__float__")? {
        return Ok(EnumExcelDateScalar::Float(value.extract::<f64>()?));
    }
    let c_type_name = value
        .get_type()
        .name()
        .map(|name| name.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    Ok(EnumExcelDateScalar::Other {
        type_name: c_type_name,
    })
}

/// Convert a date (str/datetime/date) to a serial day number, or a serial
/// (int/float) to a datetime.
#[pyfunction]
fn excel_date(py: Python<'_>, date: &Bound<'_, PyAny>) -> PyResult<Py<PyAny>> {
    let value = derive_excel_date_value_from_scalar(derive_excel_date_scalar(date)?)
        .map_err(map_tseries_error)?;
    match convert_excel_date(&value).map_err(map_tseries_error)? {
        EnumExcelDateConverted::Serial(n_serial) => {
            Ok(n_serial.into_pyobject(py)?.into_any().unbind())
        }
        EnumExcelDateConverted::DateTime(dt) => Ok(dt.into_pyobject(py)?.into_any().unbind()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SeriesHelpers

/// Time derivative from the right; returns `(index, values)` of valid samples.
#[pyfunction]
#[pyo3(signature = (index, values, time_unit = None))]
fn time_derivative(
    index: Vec<NaiveDateTime>,
    values: Vec<Option<f64>>,
    time_unit: Option<TimeDelta>,
) -> PyResult<(Vec<NaiveDateTime>, Vec<Option<f64>>)> {
    if index.len() != values.len() {
        return Err(map_tseries_error(TseriesError::LengthMismatch {
            left: index.len(),
            right: values.len(),
        }));
    }

    let l_samples: Vec<SpecTimeSample> = index
        .into_iter()
        .zip(values)
        .map(|(timestamp, value)| SpecTimeSample::new(timestamp, value))
        .collect();
    let l_rates = derive_time_derivative(
        &l_samples,
        time_unit.unwrap_or_else(derive_default_time_unit),
    )
    .map_err(map_tseries_error)?;

    Ok(l_rates
        .into_iter()
        .map(|sample| (sample.timestamp, sample.value))
        .unzip())
}

/// `(start, end, [(gap, count), ...])` of a timestamp index.
#[pyfunction]
fn timeseries_info(
    index: Vec<NaiveDateTime>,
) -> PyResult<(NaiveDateTime, NaiveDateTime, Vec<(TimeDelta, usize)>)> {
    let info = derive_timeseries_info(&index)
        .ok_or_else(|| PyValueError::new_err("timeseries_info requires a non-empty index."))?;
    let l_freq = info
        .freq
        .iter()
        .map(|item| (item.gap, item.count))
        .collect();
    Ok((info.start, info.end, l_freq))
}

/// Positions grouped by flag value.
#[pyfunction]
fn bool_report(values: Vec<Option<bool>>) -> BTreeMap<bool, BTreeSet<usize>> {
    derive_bool_report_by_position(&values)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TextHelpers

/// Whether `a` converts to float.
#[pyfunction]
fn isnumber(a: &Bound<'_, PyAny>) -> bool {
    if let Ok(c_text) = a.extract::<String>() {
        return is_number(&c_text);
    }
    a.extract::<f64>().is_ok()
}

/// Cyrillic month names to month numbers.
#[pyfunction]
fn convert_cyr_month(series: Vec<Option<String>>) -> Vec<Option<String>> {
    convert_cyrillic_months(&series)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Workbook

/// Read every sheet; returns `[(sheet_name, ipc_bytes), ...]` in workbook order.
#[pyfunction]
#[pyo3(
    name = "read_all_sheets",
    signature = (io, add_sheet_name = true, header = true, col_sheet_name = None)
)]
fn read_all_sheets_py(
    py: Python<'_>,
    io: String,
    add_sheet_name: bool,
    header: bool,
    col_sheet_name: Option<String>,
) -> PyResult<Vec<(String, Py<PyBytes>)>> {
    let mut cfg_options = SpecSheetReadOptions {
        if_add_sheet_name: add_sheet_name,
        if_header_row: header,
        ..Default::default()
    };
    if let Some(c_col) = col_sheet_name {
        cfg_options.col_sheet_name = c_col;
    }

    let l_tables = py
        .allow_threads(|| read_all_sheets(&io, &cfg_options))
        .map_err(map_xlsx_read_error)?;

    let mut l_out = Vec::with_capacity(l_tables.len());
    for mut table in l_tables {
        let mut v_ipc = Vec::new();
        IpcWriter::new(&mut v_ipc)
            .finish(&mut table.df)
            .map_err(|err| PyValueError::new_err(format!("Failed to write IPC bytes: {err}")))?;
        l_out.push((table.sheet_name, PyBytes::new(py, &v_ipc).unbind()));
    }
    Ok(l_out)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[pymodule]
fn _sheetkit_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(excel_date, module)?)?;
    module.add_function(wrap_pyfunction!(time_derivative, module)?)?;
    module.add_function(wrap_pyfunction!(timeseries_info, module)?)?;
    module.add_function(wrap_pyfunction!(bool_report, module)?)?;
    module.add_function(wrap_pyfunction!(isnumber, module)?)?;
    module.add_function(wrap_pyfunction!(convert_cyr_month, module)?)?;
    module.add_function(wrap_pyfunction!(read_all_sheets_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
