//! Workbook access layer over calamine.

mod workbook;

pub use workbook::{SheetGrid, Workbook};
