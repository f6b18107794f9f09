//! Workbook reader that loads every sheet into a polars `DataFrame`.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use log::{debug, warn};
use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::spec::{EnumCellValue, SpecSheetReadOptions, SpecSheetTable, XlsxReadError};
use crate::util::{
    build_column, convert_data_to_cell_value, derive_column_kind, derive_unique_column_names,
};

/// Read every sheet of the workbook at `path`, in workbook order.
///
/// The format is picked from the file extension (xlsx, xlsm, xlsb, xls, ods).
/// Loader errors are returned unchanged; no partial result is produced.
pub fn read_all_sheets<P: AsRef<Path>>(
    path: P,
    options: &SpecSheetReadOptions,
) -> Result<Vec<SpecSheetTable>, XlsxReadError> {
    let mut workbook = open_workbook_auto(path)?;
    read_sheets(&mut workbook, options)
}

/// Read every sheet of an in-memory workbook, in workbook order.
pub fn read_all_sheets_from_bytes(
    v_workbook: &[u8],
    options: &SpecSheetReadOptions,
) -> Result<Vec<SpecSheetTable>, XlsxReadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(v_workbook.to_vec()))?;
    read_sheets(&mut workbook, options)
}

fn read_sheets<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    options: &SpecSheetReadOptions,
) -> Result<Vec<SpecSheetTable>, XlsxReadError> {
    let l_sheet_names = workbook.sheet_names();
    let mut l_tables = Vec::with_capacity(l_sheet_names.len());

    for sheet_name in l_sheet_names {
        let range = workbook.worksheet_range(&sheet_name)?;
        let df = derive_dataframe_from_range(&range, &sheet_name, options)?;
        debug!(
            "sheet {sheet_name:?}: height={} width={}",
            df.height(),
            df.width()
        );
        l_tables.push(SpecSheetTable { sheet_name, df });
    }

    Ok(l_tables)
}

/// Convert one sheet range into a dataframe.
pub fn derive_dataframe_from_range(
    range: &Range<Data>,
    sheet_name: &str,
    options: &SpecSheetReadOptions,
) -> Result<DataFrame, XlsxReadError> {
    let mut rows = range.rows();

    let l_names_raw: Vec<String> = if options.if_header_row {
        match rows.next() {
            Some(row) => row
                .iter()
                .map(|data| convert_data_to_cell_value(data).to_text().unwrap_or_default())
                .collect(),
            None => vec![],
        }
    } else {
        (0..range.width()).map(|n_idx| n_idx.to_string()).collect()
    };
    let l_names = derive_unique_column_names(&l_names_raw);
    if l_names != l_names_raw {
        warn!("sheet {sheet_name:?}: header renamed from {l_names_raw:?} to {l_names:?}");
    }

    let l_rows_body: Vec<&[Data]> = rows.collect();
    let mut l_cols = Vec::with_capacity(l_names.len());
    for (n_idx_col, c_name) in l_names.iter().enumerate() {
        let l_cells: Vec<EnumCellValue> = l_rows_body
            .iter()
            .map(|row| {
                row.get(n_idx_col)
                    .map(convert_data_to_cell_value)
                    .unwrap_or(EnumCellValue::None)
            })
            .collect();
        let kind = derive_column_kind(&l_cells);
        debug!("sheet {sheet_name:?}: column {c_name:?} inferred as {kind:?}");
        l_cols.push(build_column(c_name, &l_cells, kind)?);
    }

    let mut df = DataFrame::new(l_cols)?;
    if options.if_add_sheet_name {
        let s_sheet_name = Series::new(
            options.col_sheet_name.as_str().into(),
            vec![sheet_name; df.height()],
        );
        df.with_column(s_sheet_name)?;
    }

    Ok(df)
}
