//! Project configuration.
//!
//! An optional `sheetgen.yaml` next to the workbook (or passed with
//! `--config`) supplies the closed extension points - registered enums and
//! type aliases - plus default paths. CLI flags override file values; a
//! missing file means defaults and the built-in type table only.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SheetError, SheetResult};
use crate::resolver::TypeResolver;

pub const CONFIG_FILE_NAME: &str = "sheetgen.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Record source template; the embedded default is used when unset.
    pub template: Option<PathBuf>,

    /// Directory for generated record sources.
    pub codegen_dir: Option<PathBuf>,

    /// Directory for persisted collections.
    pub export_dir: Option<PathBuf>,

    /// Registered enum types: name -> ordered member list.
    #[serde(default)]
    pub enums: BTreeMap<String, Vec<String>>,

    /// Extra type tokens: alias -> target token.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> SheetResult<Self> {
        let text = fs::read_to_string(path)?;
        serde_yaml::from_str(&text)
            .map_err(|e| SheetError::Config(format!("{}: {e}", path.display())))
    }

    /// Look for `sheetgen.yaml` in `dir`; absent is not an error.
    pub fn discover(dir: &Path) -> SheetResult<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Ok(Some(Self::load(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Build the type resolver with this project's enums and aliases.
    pub fn build_resolver(&self) -> SheetResult<TypeResolver> {
        let mut builder = TypeResolver::builder();
        for (name, members) in &self.enums {
            builder = builder.register_enum(name.clone(), members.clone());
        }
        for (token, target) in &self.aliases {
            builder = builder.register_alias(token.clone(), target.clone());
        }
        builder.build()
    }
}
