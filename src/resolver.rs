//! Type token resolution.
//!
//! Maps the textual type tokens found in a sheet's second header row (or in a
//! generated record's field declarations) to concrete [`TypeDescriptor`]s.
//! The table is fixed at construction: built-in primitives in both their
//! short and canonical spellings, the `[]` array form of each, plus any
//! project-registered enums and aliases. Lookup is exact and case-sensitive;
//! an unknown token is a hard failure for the caller, never a default.

use std::collections::HashMap;

use crate::error::{SheetError, SheetResult};
use crate::types::{PrimitiveKind, TypeDescriptor};

/// (short spelling, canonical spelling, kind) for every built-in primitive.
const PRIMITIVES: &[(&str, &str, PrimitiveKind)] = &[
    ("sbyte", "i8", PrimitiveKind::I8),
    ("short", "i16", PrimitiveKind::I16),
    ("ushort", "u16", PrimitiveKind::U16),
    ("int", "i32", PrimitiveKind::I32),
    ("uint", "u32", PrimitiveKind::U32),
    ("long", "i64", PrimitiveKind::I64),
    ("ulong", "u64", PrimitiveKind::U64),
    ("float", "f32", PrimitiveKind::F32),
    ("double", "f64", PrimitiveKind::F64),
    ("string", "String", PrimitiveKind::Str),
    ("bool", "bool", PrimitiveKind::Bool),
];

/// Immutable token table. Build one with [`TypeResolver::builder`] and pass
/// it to the components that need it; there is no process-wide instance.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    table: HashMap<String, TypeDescriptor>,
    enums: HashMap<String, Vec<String>>,
}

impl TypeResolver {
    pub fn builder() -> TypeResolverBuilder {
        TypeResolverBuilder::default()
    }

    /// Built-in primitives only, no enums or aliases.
    pub fn with_builtins() -> Self {
        let mut table = HashMap::new();
        for (short, canonical, kind) in PRIMITIVES {
            table.insert(short.to_string(), TypeDescriptor::Scalar(kind.clone()));
            table.insert(canonical.to_string(), TypeDescriptor::Scalar(kind.clone()));
            table.insert(format!("{short}[]"), TypeDescriptor::Array(kind.clone()));
            table.insert(format!("{canonical}[]"), TypeDescriptor::Array(kind.clone()));
        }
        Self {
            table,
            enums: HashMap::new(),
        }
    }

    /// Resolve a type token. Exact match, case-sensitive.
    pub fn resolve(&self, token: &str) -> Option<&TypeDescriptor> {
        self.table.get(token)
    }

    /// Member names of a registered enum, in registration order.
    pub fn enum_members(&self, name: &str) -> Option<&[String]> {
        self.enums.get(name).map(Vec::as_slice)
    }
}

/// Builder collecting the project-registered extension points before the
/// table is frozen.
#[derive(Debug, Default)]
pub struct TypeResolverBuilder {
    enums: Vec<(String, Vec<String>)>,
    aliases: Vec<(String, String)>,
}

impl TypeResolverBuilder {
    /// Register an enum type; `name` and `name[]` become resolvable tokens
    /// and the member list drives enum coercion.
    pub fn register_enum(
        mut self,
        name: impl Into<String>,
        members: Vec<String>,
    ) -> Self {
        self.enums.push((name.into(), members));
        self
    }

    /// Register an extra token that resolves to whatever `target` resolves
    /// to. The target must itself be resolvable once the table is built.
    pub fn register_alias(mut self, token: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.push((token.into(), target.into()));
        self
    }

    pub fn build(self) -> SheetResult<TypeResolver> {
        let mut resolver = TypeResolver::with_builtins();

        for (name, members) in self.enums {
            let kind = PrimitiveKind::Enum(name.clone());
            resolver
                .table
                .insert(name.clone(), TypeDescriptor::Scalar(kind.clone()));
            resolver
                .table
                .insert(format!("{name}[]"), TypeDescriptor::Array(kind));
            resolver.enums.insert(name, members);
        }

        // Aliases resolve last so they can point at enums as well.
        for (token, target) in self.aliases {
            let descriptor = resolver
                .table
                .get(&target)
                .cloned()
                .ok_or_else(|| {
                    SheetError::Config(format!(
                        "alias '{token}' points at unresolvable token '{target}'"
                    ))
                })?;
            resolver.table.insert(token, descriptor);
        }

        Ok(resolver)
    }
}
