//! Record type registry.
//!
//! The original design resolved record types reflectively at runtime; here
//! the same "resolve by name" contract is an explicit, immutable registry of
//! [`RecordSpec`]s constructed alongside code generation. A spec knows the
//! record's declared fields in order and can stamp out empty
//! [`RecordInstance`]s for the row compiler to fill.

use std::collections::HashMap;

use crate::error::{SheetError, SheetResult};
use crate::types::{FieldSchema, RecordInstance};

/// A record type's name and declared fields (name, resolver token), in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSpec {
    pub type_name: String,
    pub fields: Vec<(String, String)>,
}

impl RecordSpec {
    /// Derive the spec the generator would emit for `schema`, keeping code
    /// generation and registration in lockstep.
    pub fn from_schema(type_name: impl Into<String>, schema: &FieldSchema) -> Self {
        Self {
            type_name: type_name.into(),
            fields: schema
                .iter()
                .map(|field| (field.name.clone(), field.ty.token()))
                .collect(),
        }
    }

    /// Recover a spec from generated record source by reading the field
    /// declarations of `pub struct <type_name>`. This is the introspection
    /// path for the "use an existing record type" mode.
    pub fn parse_source(type_name: &str, source: &str) -> SheetResult<RecordSpec> {
        let needle = format!("pub struct {type_name} {{");
        let start = source
            .find(&needle)
            .ok_or_else(|| SheetError::TypeNotFound(type_name.to_string()))?;
        let body = &source[start + needle.len()..];

        let mut fields = Vec::new();
        for line in body.lines() {
            let line = line.trim();
            if line.starts_with('}') {
                break;
            }
            if let Some(decl) = line.strip_prefix("pub ") {
                if let Some((name, ty)) = decl.split_once(':') {
                    let ty = ty.trim().trim_end_matches(',').trim();
                    fields.push((name.trim().to_string(), rust_type_to_token(ty)));
                }
            }
        }

        Ok(RecordSpec {
            type_name: type_name.to_string(),
            fields,
        })
    }

    /// A fresh instance with one empty slot per declared field.
    pub fn instantiate(&self) -> RecordInstance {
        RecordInstance::new(
            self.type_name.clone(),
            self.fields.iter().map(|(name, _)| name.clone()).collect(),
        )
    }
}

/// `Vec<i32>` → `i32[]`; anything else passes through unchanged.
fn rust_type_to_token(ty: &str) -> String {
    ty.strip_prefix("Vec<")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|inner| format!("{}[]", inner.trim()))
        .unwrap_or_else(|| ty.to_string())
}

/// Name-keyed registry of record specs. Built once by the embedding caller
/// and handed to the components that need it.
#[derive(Debug, Default)]
pub struct RecordTypeRegistry {
    specs: HashMap<String, RecordSpec>,
}

impl RecordTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: RecordSpec) {
        self.specs.insert(spec.type_name.clone(), spec);
    }

    pub fn get(&self, type_name: &str) -> Option<&RecordSpec> {
        self.specs.get(type_name)
    }

    pub fn instantiate(&self, type_name: &str) -> SheetResult<RecordInstance> {
        self.specs
            .get(type_name)
            .map(RecordSpec::instantiate)
            .ok_or_else(|| SheetError::TypeNotFound(type_name.to_string()))
    }
}
