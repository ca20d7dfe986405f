//! Sheetgen - schema-driven spreadsheet compiler
//!
//! This library reads workbooks whose sheets carry a two-row header schema
//! (row 1: field names, row 2: type tokens), generates strongly-typed record
//! sources from that schema, and compiles the data rows into persisted
//! record collections with every cell coerced to its declared type.
//!
//! # Features
//!
//! - Closed type-token table with short and canonical spellings, arrays and
//!   project-registered enums/aliases
//! - Template-based record source generation (four-placeholder contract)
//! - Fail-fast row compilation with positional cell errors
//! - YAML collection persistence, one document per sheet
//!
//! # Example
//!
//! ```no_run
//! use sheetgen::excel::Workbook;
//! use sheetgen::registry::RecordSpec;
//! use sheetgen::resolver::TypeResolver;
//! use sheetgen::types::SheetHandle;
//!
//! let resolver = TypeResolver::with_builtins();
//! let mut workbook = Workbook::open("items.xlsx")?;
//! let handle = SheetHandle::new("items.xlsx", "Items");
//!
//! let grid = workbook.grid(&handle.sheet_name)?;
//! let schema = sheetgen::schema::from_sheet_headers(&grid, &handle, &resolver)?;
//! let spec = RecordSpec::from_schema("Items", &schema);
//! let collection = sheetgen::compiler::compile_sheet(&grid, &handle, &schema, &spec, &resolver)?;
//!
//! println!("Compiled {} records", collection.len());
//! # Ok::<(), sheetgen::error::SheetError>(())
//! ```

pub mod cli;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod excel;
pub mod loader;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{SheetError, SheetResult};
pub use registry::{RecordSpec, RecordTypeRegistry};
pub use resolver::TypeResolver;
pub use types::{
    FieldSchema, FieldSpec, FieldValue, PrimitiveKind, RecordCollection, RecordInstance,
    SheetHandle, TypeDescriptor, Value,
};
