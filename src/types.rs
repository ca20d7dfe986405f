use std::path::{Path, PathBuf};

use crate::error::{SheetError, SheetResult};

//==============================================================================
// Type descriptors
//==============================================================================

/// Primitive value kinds a sheet column can declare.
///
/// `Enum` covers project-registered enum types; their member lists live in
/// the [`crate::resolver::TypeResolver`] that produced the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Str,
    Bool,
    Enum(String),
}

impl PrimitiveKind {
    /// Canonical token for this kind, as spelled in headers and generated code.
    pub fn canonical(&self) -> &str {
        match self {
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Str => "String",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Enum(name) => name,
        }
    }
}

/// A column's declared type: a primitive or a 1-D array of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Scalar(PrimitiveKind),
    Array(PrimitiveKind),
}

impl TypeDescriptor {
    /// The element kind, ignoring array-ness.
    pub fn kind(&self) -> &PrimitiveKind {
        match self {
            TypeDescriptor::Scalar(kind) | TypeDescriptor::Array(kind) => kind,
        }
    }

    /// Canonical resolver token (`i32`, `i32[]`, `String[]`, ...).
    pub fn token(&self) -> String {
        match self {
            TypeDescriptor::Scalar(kind) => kind.canonical().to_string(),
            TypeDescriptor::Array(kind) => format!("{}[]", kind.canonical()),
        }
    }

    /// Rust type rendering used in generated record sources.
    pub fn rust_type(&self) -> String {
        match self {
            TypeDescriptor::Scalar(kind) => kind.canonical().to_string(),
            TypeDescriptor::Array(kind) => format!("Vec<{}>", kind.canonical()),
        }
    }
}

//==============================================================================
// Field schemas
//==============================================================================

/// One schema entry: a field name bound to a declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered field schema for one sheet.
///
/// Order is significant: column `c` binds to field `c - 1` positionally,
/// never by name. The length must equal the sheet's column count; the
/// extractor enforces that at construction time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FieldSpec> {
        self.fields.get(index)
    }

    /// First declared field, the implicit primary key by convention.
    pub fn key_field(&self) -> Option<&FieldSpec> {
        self.fields.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }
}

//==============================================================================
// Runtime values
//==============================================================================

/// One coerced scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bool(bool),
    Enum { ty: String, member: String },
}

impl Value {
    /// Render as a YAML node for the collection store.
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            Value::I8(v) => serde_yaml::Value::Number((*v as i64).into()),
            Value::I16(v) => serde_yaml::Value::Number((*v as i64).into()),
            Value::U16(v) => serde_yaml::Value::Number((*v as i64).into()),
            Value::I32(v) => serde_yaml::Value::Number((*v as i64).into()),
            Value::U32(v) => serde_yaml::Value::Number((*v as i64).into()),
            Value::I64(v) => serde_yaml::Value::Number((*v).into()),
            Value::U64(v) => serde_yaml::Value::Number((*v).into()),
            Value::F32(v) => serde_yaml::Value::Number((*v as f64).into()),
            Value::F64(v) => serde_yaml::Value::Number((*v).into()),
            Value::Str(v) => serde_yaml::Value::String(v.clone()),
            Value::Bool(v) => serde_yaml::Value::Bool(*v),
            Value::Enum { member, .. } => serde_yaml::Value::String(member.clone()),
        }
    }
}

/// A coerced field value: one scalar or an ordered array of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    Array(Vec<Value>),
}

impl FieldValue {
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            FieldValue::Scalar(value) => value.to_yaml(),
            FieldValue::Array(values) => {
                serde_yaml::Value::Sequence(values.iter().map(Value::to_yaml).collect())
            }
        }
    }
}

//==============================================================================
// Records
//==============================================================================

/// One decoded data row.
///
/// Field slots are fixed at instantiation from the record type's declared
/// fields; assignment is by name and fails when the slot does not exist,
/// which signals a stale generated record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInstance {
    type_name: String,
    slots: Vec<(String, Option<FieldValue>)>,
}

impl RecordInstance {
    pub fn new(type_name: impl Into<String>, field_names: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            slots: field_names.into_iter().map(|name| (name, None)).collect(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn set_field(&mut self, name: &str, value: FieldValue) -> SheetResult<()> {
        match self.slots.iter_mut().find(|(slot, _)| slot == name) {
            Some((_, slot)) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(SheetError::FieldNotFound {
                record_type: self.type_name.clone(),
                field: name.to_string(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Field slots in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.slots
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }
}

/// The ordered records compiled from one sheet's data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCollection {
    pub sheet_name: String,
    pub record_type: String,
    pub records: Vec<RecordInstance>,
}

impl RecordCollection {
    pub fn new(sheet_name: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            record_type: record_type.into(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//==============================================================================
// Sheet handles
//==============================================================================

/// A named sheet within a named workbook, with its selection state.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetHandle {
    pub workbook_path: PathBuf,
    pub sheet_name: String,
    pub enabled: bool,
}

impl SheetHandle {
    pub fn new(workbook_path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            workbook_path: workbook_path.into(),
            sheet_name: sheet_name.into(),
            enabled: true,
        }
    }

    /// Workbook file name without extension, used in generated paths.
    pub fn workbook_stem(&self) -> String {
        Path::new(&self.workbook_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
