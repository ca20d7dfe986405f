//! Record source generation.
//!
//! Renders a field schema into Rust record source by literal placeholder
//! substitution over a template. The four placeholders are the whole
//! contract: `#CLASS_TYPE#`, `#KEY_TYPE#`, `#KEY_NAME#`, `#SHEETDATA#`.
//! A template missing a placeholder simply gets no substitution there; the
//! caller is responsible for supplying a well-formed template.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SheetResult;
use crate::types::FieldSchema;

/// Template compiled into the binary; `--template` or the project config
/// overrides it.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/record.rs.tmpl");

/// Render `schema` into record source for `class_name`.
///
/// The first schema field is the implicit primary key: its type and name
/// fill `#KEY_TYPE#` and `#KEY_NAME#`. Uniqueness of key values is not
/// checked here or at compile time.
pub fn generate(schema: &FieldSchema, class_name: &str, template: &str) -> String {
    let (key_type, key_name) = match schema.key_field() {
        Some(key) => (key.ty.rust_type(), key.name.clone()),
        None => (String::new(), String::new()),
    };

    let mut declarations = String::new();
    for field in schema.iter() {
        declarations.push_str(&format!(
            "    pub {}: {},\n\n",
            field.name,
            field.ty.rust_type()
        ));
    }

    template
        .replace("#CLASS_TYPE#", class_name)
        .replace("#KEY_TYPE#", &key_type)
        .replace("#KEY_NAME#", &key_name)
        .replace("#SHEETDATA#", &declarations)
}

/// Generate and write record source to
/// `<codegen_dir>/<workbook_stem>/<class_name>.rs`, creating directories as
/// needed. Returns the written path.
pub fn write_record_source(
    schema: &FieldSchema,
    class_name: &str,
    template: &str,
    codegen_dir: &Path,
    workbook_stem: &str,
) -> SheetResult<PathBuf> {
    let dir = codegen_dir.join(workbook_stem);
    fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{class_name}.rs"));
    fs::write(&path, generate(schema, class_name, template))?;
    tracing::info!(path = %path.display(), "wrote record source");
    Ok(path)
}
