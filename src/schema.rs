//! Schema extraction.
//!
//! A sheet's first two rows are its schema: row 1 names the fields, row 2
//! declares their types. The alternative entry point reads the declared
//! fields of an already-registered record type instead. Both paths resolve
//! type tokens through the same [`TypeResolver`] and produce a
//! [`FieldSchema`] whose length equals the source's column/field count -
//! that equality is the binding contract the row compiler relies on.

use std::collections::HashSet;

use crate::error::{SheetError, SheetResult};
use crate::excel::SheetGrid;
use crate::registry::RecordTypeRegistry;
use crate::resolver::TypeResolver;
use crate::types::{FieldSchema, FieldSpec, SheetHandle};

/// Extract the schema from a sheet's two header rows.
pub fn from_sheet_headers(
    grid: &SheetGrid,
    handle: &SheetHandle,
    resolver: &TypeResolver,
) -> SheetResult<FieldSchema> {
    let (rows, cols) = grid.dimensions();
    if grid.is_empty() || rows < 2 || cols == 0 {
        return Err(SheetError::EmptySheet {
            workbook: handle.workbook_stem(),
            sheet: handle.sheet_name.clone(),
        });
    }

    let mut fields = Vec::with_capacity(cols);
    let mut seen = HashSet::new();
    for col in 1..=cols {
        let name = grid.cell_text(1, col);
        if name.is_empty() {
            return Err(SheetError::InvalidHeader {
                sheet: handle.sheet_name.clone(),
                column: col,
                reason: "missing field name".to_string(),
            });
        }
        if !seen.insert(name.clone()) {
            return Err(SheetError::InvalidHeader {
                sheet: handle.sheet_name.clone(),
                column: col,
                reason: format!("duplicate field name '{name}'"),
            });
        }

        let token = grid.cell_text(2, col);
        let ty = resolver
            .resolve(&token)
            .ok_or(SheetError::UnknownType { token, column: col })?;
        fields.push(FieldSpec::new(name, ty.clone()));
    }

    tracing::debug!(
        sheet = %handle.sheet_name,
        fields = fields.len(),
        "extracted schema from headers"
    );
    Ok(FieldSchema::new(fields))
}

/// Extract the schema from a registered record type's declared fields.
pub fn from_record_type(
    type_name: &str,
    registry: &RecordTypeRegistry,
    resolver: &TypeResolver,
) -> SheetResult<FieldSchema> {
    let spec = registry
        .get(type_name)
        .ok_or_else(|| SheetError::TypeNotFound(type_name.to_string()))?;

    let mut fields = Vec::with_capacity(spec.fields.len());
    for (index, (name, token)) in spec.fields.iter().enumerate() {
        let ty = resolver.resolve(token).ok_or(SheetError::UnknownType {
            token: token.clone(),
            column: index + 1,
        })?;
        fields.push(FieldSpec::new(name.clone(), ty.clone()));
    }

    Ok(FieldSchema::new(fields))
}
