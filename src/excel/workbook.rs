//! Workbook reader - opens an .xlsx file and exposes its sheets as grids.
//!
//! Rows and columns are 1-based throughout, matching the source convention:
//! row 1 carries field names, row 2 type tokens, row 3 is reserved for
//! comments, and data starts at row 4.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};

use crate::error::{SheetError, SheetResult};
use crate::types::SheetHandle;

/// An open .xlsx workbook.
pub struct Workbook {
    path: PathBuf,
    inner: Xlsx<BufReader<File>>,
}

impl Workbook {
    pub fn open<P: AsRef<Path>>(path: P) -> SheetResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner: Xlsx<_> = open_workbook(&path).map_err(|e| {
            SheetError::Workbook(format!(
                "failed to open workbook '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Workbook file name without extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names().to_vec()
    }

    /// One handle per sheet, all enabled by default.
    pub fn sheet_handles(&self) -> Vec<SheetHandle> {
        self.sheet_names()
            .into_iter()
            .map(|name| SheetHandle::new(&self.path, name))
            .collect()
    }

    pub fn grid(&mut self, sheet_name: &str) -> SheetResult<SheetGrid> {
        let range = self.inner.worksheet_range(sheet_name).map_err(|e| {
            SheetError::Workbook(format!("failed to read sheet '{sheet_name}': {e}"))
        })?;
        Ok(SheetGrid::new(range))
    }
}

/// A 2-D grid of cell values for one sheet.
pub struct SheetGrid {
    range: Range<Data>,
}

impl SheetGrid {
    pub fn new(range: Range<Data>) -> Self {
        Self { range }
    }

    /// (rows, cols). Zero in either dimension means no data region.
    pub fn dimensions(&self) -> (usize, usize) {
        self.range.get_size()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Raw cell value at 1-based (row, col). `None` for out-of-range or
    /// never-written cells.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Data> {
        if row == 0 || col == 0 {
            return None;
        }
        self.range.get((row - 1, col - 1))
    }

    /// Cell rendered as text; missing and empty cells render as "".
    pub fn cell_text(&self, row: usize, col: usize) -> String {
        match self.cell(row, col) {
            Some(Data::String(s)) => s.clone(),
            Some(Data::Empty) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
