//! XLSX reader constants and default preset factories.

use crate::spec::SpecSheetReadOptions;

/// Default name of the appended sheet-name column.
pub const C_COL_SHEET_NAME_DEFAULT: &str = "sheet_name";
/// Prefix for header cells left empty (`Unnamed: 3`).
pub const C_COL_UNNAMED_PREFIX: &str = "Unnamed: ";
/// Separator between a duplicated header name and its counter (`value.1`).
pub const C_COL_DUPLICATE_SEP: &str = ".";
/// Largest magnitude an integral float may have to be read back as `Int64`.
pub const N_INT_EXACT_F64_MAX: f64 = 9_007_199_254_740_992.0;

/// Build default read options.
pub fn derive_default_sheet_read_options() -> SpecSheetReadOptions {
    SpecSheetReadOptions::default()
}
