//! `sheetkit_io_xlsx` v1:
//! Rust-side workbook reader kernel.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : options/models/errors
//! - `util`   : pure cell/column helpers
//! - `reader` : every sheet of a workbook into polars dataframes
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;

pub use conf::{C_COL_SHEET_NAME_DEFAULT, derive_default_sheet_read_options};
pub use reader::{derive_dataframe_from_range, read_all_sheets, read_all_sheets_from_bytes};
pub use spec::{
    EnumCellValue, EnumColumnKind, SpecSheetReadOptions, SpecSheetTable, XlsxReadError,
};
pub use util::{
    build_column, convert_data_to_cell_value, derive_column_kind, derive_unique_column_names,
};
