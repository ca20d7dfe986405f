//! Sheet loading orchestration.
//!
//! Iterates the enabled sheets of a workbook in selection order and drives
//! schema extraction, code generation, row compilation and persistence.
//! Each sheet either fully completes or is reported as aborted with the
//! first error encountered; an aborted sheet never stops its siblings.

use std::path::{Path, PathBuf};

use crate::codegen;
use crate::error::SheetError;
use crate::excel::Workbook;
use crate::registry::{RecordSpec, RecordTypeRegistry};
use crate::resolver::TypeResolver;
use crate::schema;
use crate::store::CollectionStore;
use crate::types::SheetHandle;

/// Terminal state of one sheet's pipeline run.
#[derive(Debug)]
pub enum SheetOutcome {
    Generated { path: PathBuf },
    Compiled { path: PathBuf, records: usize },
    Aborted(SheetError),
}

#[derive(Debug)]
pub struct SheetReport {
    pub sheet: String,
    pub outcome: SheetOutcome,
}

/// Per-sheet outcomes for one workbook pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub sheets: Vec<SheetReport>,
}

impl LoadReport {
    pub fn succeeded(&self) -> usize {
        self.sheets
            .iter()
            .filter(|r| !matches!(r.outcome, SheetOutcome::Aborted(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.sheets.len() - self.succeeded()
    }
}

/// Handles for every sheet in the workbook; `only` narrows the selection to
/// the named sheets. Requested names missing from the workbook are logged
/// and skipped.
pub fn select_sheets(workbook: &Workbook, only: Option<&[String]>) -> Vec<SheetHandle> {
    let mut handles = workbook.sheet_handles();
    if let Some(only) = only {
        for handle in &mut handles {
            handle.enabled = only.iter().any(|name| name == &handle.sheet_name);
        }
        for name in only {
            if !handles.iter().any(|h| &h.sheet_name == name) {
                tracing::warn!(sheet = %name, "requested sheet not found in workbook");
            }
        }
    }
    handles
}

pub struct SheetLoader<'a> {
    resolver: &'a TypeResolver,
    registry: RecordTypeRegistry,
}

impl<'a> SheetLoader<'a> {
    pub fn new(resolver: &'a TypeResolver, registry: RecordTypeRegistry) -> Self {
        Self { resolver, registry }
    }

    pub fn registry(&self) -> &RecordTypeRegistry {
        &self.registry
    }

    /// Generate record sources for the enabled sheets. Each generated type
    /// is registered so a subsequent compile pass in the same run can
    /// resolve it by name.
    pub fn generate_sources(
        &mut self,
        workbook: &mut Workbook,
        handles: &[SheetHandle],
        template: &str,
        codegen_dir: &Path,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        let stem = workbook.stem();

        for handle in handles.iter().filter(|h| h.enabled) {
            let outcome = self
                .generate_one(workbook, handle, template, codegen_dir, &stem)
                .unwrap_or_else(SheetOutcome::Aborted);
            report.sheets.push(SheetReport {
                sheet: handle.sheet_name.clone(),
                outcome,
            });
        }
        report
    }

    fn generate_one(
        &mut self,
        workbook: &mut Workbook,
        handle: &SheetHandle,
        template: &str,
        codegen_dir: &Path,
        stem: &str,
    ) -> Result<SheetOutcome, SheetError> {
        let grid = workbook.grid(&handle.sheet_name)?;
        let schema = schema::from_sheet_headers(&grid, handle, self.resolver)?;
        let path = codegen::write_record_source(
            &schema,
            &handle.sheet_name,
            template,
            codegen_dir,
            stem,
        )?;
        self.registry
            .register(RecordSpec::from_schema(handle.sheet_name.clone(), &schema));
        Ok(SheetOutcome::Generated { path })
    }

    /// Compile the enabled sheets into persisted collections. With
    /// `record_type` set, every sheet is decoded against that registered
    /// type instead of its own header rows.
    pub fn compile_sheets(
        &mut self,
        workbook: &mut Workbook,
        handles: &[SheetHandle],
        record_type: Option<&str>,
        store: &CollectionStore,
    ) -> LoadReport {
        let mut report = LoadReport::default();

        for handle in handles.iter().filter(|h| h.enabled) {
            let outcome = self
                .compile_one(workbook, handle, record_type, store)
                .unwrap_or_else(SheetOutcome::Aborted);
            report.sheets.push(SheetReport {
                sheet: handle.sheet_name.clone(),
                outcome,
            });
        }
        report
    }

    fn compile_one(
        &mut self,
        workbook: &mut Workbook,
        handle: &SheetHandle,
        record_type: Option<&str>,
        store: &CollectionStore,
    ) -> Result<SheetOutcome, SheetError> {
        let grid = workbook.grid(&handle.sheet_name)?;

        let (schema, spec) = match record_type {
            Some(type_name) => {
                let schema = schema::from_record_type(type_name, &self.registry, self.resolver)?;
                // from_record_type already failed if the type is missing.
                let spec = self
                    .registry
                    .get(type_name)
                    .cloned()
                    .ok_or_else(|| SheetError::TypeNotFound(type_name.to_string()))?;
                (schema, spec)
            }
            None => {
                let schema = schema::from_sheet_headers(&grid, handle, self.resolver)?;
                let spec = RecordSpec::from_schema(handle.sheet_name.clone(), &schema);
                (schema, spec)
            }
        };

        let collection =
            crate::compiler::compile_sheet(&grid, handle, &schema, &spec, self.resolver)?;
        let records = collection.len();
        let path = store.save(&collection)?;
        Ok(SheetOutcome::Compiled { path, records })
    }
}
