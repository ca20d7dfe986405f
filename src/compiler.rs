//! Row compilation.
//!
//! Walks a sheet's data rows, coerces every cell into its schema-declared
//! type and assembles typed record instances. Compilation is fail-fast: the
//! first coercion failure (in row-then-column order) aborts the whole sheet
//! and no partial collection is returned. Rows are processed strictly in
//! ascending order, so the collection index of a record is `row - 4`.

use calamine::Data;

use crate::error::{SheetError, SheetResult};
use crate::excel::SheetGrid;
use crate::registry::RecordSpec;
use crate::resolver::TypeResolver;
use crate::types::{
    FieldSchema, FieldValue, PrimitiveKind, RecordCollection, RecordInstance, SheetHandle,
    TypeDescriptor, Value,
};

/// First data row; rows 1-2 are the schema, row 3 is reserved for comments.
pub const FIRST_DATA_ROW: usize = 4;

/// Cell position for error reporting.
struct CellCtx<'a> {
    sheet: &'a str,
    row: usize,
    col: usize,
}

impl CellCtx<'_> {
    fn coercion_error(&self, value: impl Into<String>, kind: &PrimitiveKind) -> SheetError {
        SheetError::TypeCoercion {
            sheet: self.sheet.to_string(),
            value: value.into(),
            target: kind.canonical().to_string(),
            row: self.row,
            col: self.col,
        }
    }

    fn enum_error(&self, value: impl Into<String>, enum_name: &str) -> SheetError {
        SheetError::InvalidEnumValue {
            sheet: self.sheet.to_string(),
            value: value.into(),
            enum_name: enum_name.to_string(),
            row: self.row,
            col: self.col,
        }
    }
}

/// Compile every data row of a sheet into a record collection.
pub fn compile_sheet(
    grid: &SheetGrid,
    handle: &SheetHandle,
    schema: &FieldSchema,
    spec: &RecordSpec,
    resolver: &TypeResolver,
) -> SheetResult<RecordCollection> {
    let (rows, cols) = grid.dimensions();
    if schema.len() != cols {
        return Err(SheetError::SchemaMismatch {
            sheet: handle.sheet_name.clone(),
            expected: schema.len(),
            actual: cols,
        });
    }

    let mut collection = RecordCollection::new(handle.sheet_name.clone(), spec.type_name.clone());
    collection
        .records
        .reserve(rows.saturating_sub(FIRST_DATA_ROW - 1));
    for row in FIRST_DATA_ROW..=rows {
        let record = compile_row(grid, row, handle, schema, spec, resolver)?;
        collection.records.push(record);
    }

    tracing::info!(
        sheet = %handle.sheet_name,
        records = collection.len(),
        "compiled sheet"
    );
    Ok(collection)
}

/// Compile a single data row into a record instance.
pub fn compile_row(
    grid: &SheetGrid,
    row: usize,
    handle: &SheetHandle,
    schema: &FieldSchema,
    spec: &RecordSpec,
    resolver: &TypeResolver,
) -> SheetResult<RecordInstance> {
    let mut instance = spec.instantiate();

    for (index, field) in schema.iter().enumerate() {
        let ctx = CellCtx {
            sheet: &handle.sheet_name,
            row,
            col: index + 1,
        };

        let value = match &field.ty {
            TypeDescriptor::Scalar(kind) => {
                FieldValue::Scalar(coerce_scalar(kind, grid.cell(row, ctx.col), resolver, &ctx)?)
            }
            TypeDescriptor::Array(kind) => {
                // Plain space split, no escaping or quoting. An empty cell
                // yields one empty token, which must still coerce or fail.
                let text = grid.cell_text(row, ctx.col);
                let mut items = Vec::new();
                for token in text.split(' ') {
                    items.push(coerce_token(kind, token, resolver, &ctx)?);
                }
                FieldValue::Array(items)
            }
        };

        instance.set_field(&field.name, value)?;
    }

    Ok(instance)
}

/// Coerce a raw cell to a scalar of `kind`. Numeric and boolean cells take
/// the direct conversion path; everything else goes through the textual
/// token path shared with array elements.
fn coerce_scalar(
    kind: &PrimitiveKind,
    cell: Option<&Data>,
    resolver: &TypeResolver,
    ctx: &CellCtx<'_>,
) -> SheetResult<Value> {
    match cell {
        Some(Data::String(s)) => coerce_token(kind, s, resolver, ctx),
        Some(Data::Int(i)) => coerce_int(kind, *i, resolver, ctx),
        Some(Data::Float(f)) => coerce_float(kind, *f, resolver, ctx),
        Some(Data::Bool(b)) => match kind {
            PrimitiveKind::Bool => Ok(Value::Bool(*b)),
            PrimitiveKind::Str => Ok(Value::Str(b.to_string())),
            _ => Err(ctx.coercion_error(b.to_string(), kind)),
        },
        None | Some(Data::Empty) => coerce_token(kind, "", resolver, ctx),
        Some(other) => coerce_token(kind, &other.to_string(), resolver, ctx),
    }
}

fn coerce_int(
    kind: &PrimitiveKind,
    raw: i64,
    resolver: &TypeResolver,
    ctx: &CellCtx<'_>,
) -> SheetResult<Value> {
    match kind {
        PrimitiveKind::I8 => i8::try_from(raw)
            .map(Value::I8)
            .map_err(|_| ctx.coercion_error(raw.to_string(), kind)),
        PrimitiveKind::I16 => i16::try_from(raw)
            .map(Value::I16)
            .map_err(|_| ctx.coercion_error(raw.to_string(), kind)),
        PrimitiveKind::U16 => u16::try_from(raw)
            .map(Value::U16)
            .map_err(|_| ctx.coercion_error(raw.to_string(), kind)),
        PrimitiveKind::I32 => i32::try_from(raw)
            .map(Value::I32)
            .map_err(|_| ctx.coercion_error(raw.to_string(), kind)),
        PrimitiveKind::U32 => u32::try_from(raw)
            .map(Value::U32)
            .map_err(|_| ctx.coercion_error(raw.to_string(), kind)),
        PrimitiveKind::I64 => Ok(Value::I64(raw)),
        PrimitiveKind::U64 => u64::try_from(raw)
            .map(Value::U64)
            .map_err(|_| ctx.coercion_error(raw.to_string(), kind)),
        PrimitiveKind::F32 => Ok(Value::F32(raw as f32)),
        PrimitiveKind::F64 => Ok(Value::F64(raw as f64)),
        PrimitiveKind::Str => Ok(Value::Str(raw.to_string())),
        PrimitiveKind::Bool => Err(ctx.coercion_error(raw.to_string(), kind)),
        PrimitiveKind::Enum(_) => coerce_token(kind, &raw.to_string(), resolver, ctx),
    }
}

fn coerce_float(
    kind: &PrimitiveKind,
    raw: f64,
    resolver: &TypeResolver,
    ctx: &CellCtx<'_>,
) -> SheetResult<Value> {
    match kind {
        PrimitiveKind::F32 => Ok(Value::F32(raw as f32)),
        PrimitiveKind::F64 => Ok(Value::F64(raw)),
        PrimitiveKind::Str => Ok(Value::Str(raw.to_string())),
        PrimitiveKind::Bool => Err(ctx.coercion_error(raw.to_string(), kind)),
        PrimitiveKind::Enum(_) => coerce_token(kind, &raw.to_string(), resolver, ctx),
        // Integer kinds accept whole-number floats only; spreadsheet cells
        // often surface integers as floats.
        _ => {
            if raw.fract() == 0.0 && raw >= i64::MIN as f64 && raw <= i64::MAX as f64 {
                coerce_int(kind, raw as i64, resolver, ctx)
            } else {
                Err(ctx.coercion_error(raw.to_string(), kind))
            }
        }
    }
}

/// Coerce one textual token to a scalar of `kind`. Shared by string cells
/// and space-split array elements.
fn coerce_token(
    kind: &PrimitiveKind,
    token: &str,
    resolver: &TypeResolver,
    ctx: &CellCtx<'_>,
) -> SheetResult<Value> {
    let trimmed = token.trim();
    match kind {
        PrimitiveKind::I8 => trimmed
            .parse::<i8>()
            .map(Value::I8)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::I16 => trimmed
            .parse::<i16>()
            .map(Value::I16)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::U16 => trimmed
            .parse::<u16>()
            .map(Value::U16)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::I32 => trimmed
            .parse::<i32>()
            .map(Value::I32)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::U32 => trimmed
            .parse::<u32>()
            .map(Value::U32)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::I64 => trimmed
            .parse::<i64>()
            .map(Value::I64)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::U64 => trimmed
            .parse::<u64>()
            .map(Value::U64)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::F32 => trimmed
            .parse::<f32>()
            .map(Value::F32)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::F64 => trimmed
            .parse::<f64>()
            .map(Value::F64)
            .map_err(|_| ctx.coercion_error(token, kind)),
        PrimitiveKind::Str => Ok(Value::Str(token.to_string())),
        PrimitiveKind::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(ctx.coercion_error(token, kind))
            }
        }
        PrimitiveKind::Enum(name) => {
            let members = resolver
                .enum_members(name)
                .ok_or_else(|| ctx.enum_error(token, name))?;
            if members.iter().any(|member| member == trimmed) {
                Ok(Value::Enum {
                    ty: name.clone(),
                    member: trimmed.to_string(),
                })
            } else {
                Err(ctx.enum_error(token, name))
            }
        }
    }
}
