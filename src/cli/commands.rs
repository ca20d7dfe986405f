use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::codegen;
use crate::config::ProjectConfig;
use crate::error::{SheetError, SheetResult};
use crate::excel::Workbook;
use crate::loader::{select_sheets, LoadReport, SheetLoader, SheetOutcome};
use crate::registry::{RecordSpec, RecordTypeRegistry};
use crate::store::CollectionStore;

const DEFAULT_CODEGEN_DIR: &str = "generated";
const DEFAULT_EXPORT_DIR: &str = "data";

/// Execute the sheets command - list the sheets in a workbook
pub fn sheets(workbook: PathBuf) -> SheetResult<()> {
    let workbook = Workbook::open(&workbook)?;

    println!("{}", "📋 Sheets".bold().green());
    println!("   Workbook: {}\n", workbook.path().display());
    for name in workbook.sheet_names() {
        println!("   {}", name.bright_blue());
    }
    Ok(())
}

/// Execute the generate command - write record sources for the selected sheets
pub fn generate(
    workbook: PathBuf,
    only: Option<Vec<String>>,
    template: Option<PathBuf>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
) -> SheetResult<()> {
    let config = load_config(config.as_deref(), &workbook)?;
    let resolver = config.build_resolver()?;

    let template_text = match template.or_else(|| config.template.clone()) {
        Some(path) => fs::read_to_string(path)?,
        None => codegen::DEFAULT_TEMPLATE.to_string(),
    };
    let codegen_dir = out
        .or_else(|| config.codegen_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CODEGEN_DIR));

    println!("{}", "🛠  Sheetgen - Generating record sources".bold().green());
    println!("   Workbook: {}", workbook.display());
    println!("   Output: {}\n", codegen_dir.display());

    let mut workbook = Workbook::open(&workbook)?;
    let handles = select_sheets(&workbook, only.as_deref());
    let mut loader = SheetLoader::new(&resolver, RecordTypeRegistry::new());

    let report = loader.generate_sources(&mut workbook, &handles, &template_text, &codegen_dir);
    print_report(&report)
}

/// Execute the compile command - build persisted collections from the
/// selected sheets
pub fn compile(
    workbook: PathBuf,
    only: Option<Vec<String>>,
    record_type: Option<String>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
) -> SheetResult<()> {
    let config = load_config(config.as_deref(), &workbook)?;
    let resolver = config.build_resolver()?;

    let export_dir = out
        .or_else(|| config.export_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));
    let store = CollectionStore::new(&export_dir);

    println!("{}", "📦 Sheetgen - Compiling sheets".bold().green());
    println!("   Workbook: {}", workbook.display());
    if let Some(ref name) = record_type {
        println!("   Record type: {}", name.bright_yellow().bold());
    }
    println!("   Output: {}\n", export_dir.display());

    let mut registry = RecordTypeRegistry::new();
    if let Some(ref type_name) = record_type {
        let codegen_dir = config
            .codegen_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CODEGEN_DIR));
        registry.register(load_record_spec(&workbook, &codegen_dir, type_name)?);
    }

    let mut workbook = Workbook::open(&workbook)?;
    let handles = select_sheets(&workbook, only.as_deref());
    let mut loader = SheetLoader::new(&resolver, registry);

    let report = loader.compile_sheets(&mut workbook, &handles, record_type.as_deref(), &store);
    print_report(&report)
}

/// Read a previously generated record source and recover its spec.
fn load_record_spec(
    workbook: &Path,
    codegen_dir: &Path,
    type_name: &str,
) -> SheetResult<RecordSpec> {
    let stem = workbook
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let path = codegen_dir.join(&stem).join(format!("{type_name}.rs"));
    if !path.is_file() {
        return Err(SheetError::TypeNotFound(type_name.to_string()));
    }
    let source = fs::read_to_string(&path)?;
    RecordSpec::parse_source(type_name, &source)
}

fn load_config(config: Option<&Path>, workbook: &Path) -> SheetResult<ProjectConfig> {
    match config {
        Some(path) => ProjectConfig::load(path),
        None => {
            let dir = workbook.parent().unwrap_or_else(|| Path::new("."));
            Ok(ProjectConfig::discover(dir)?.unwrap_or_default())
        }
    }
}

fn print_report(report: &LoadReport) -> SheetResult<()> {
    for sheet in &report.sheets {
        match &sheet.outcome {
            SheetOutcome::Generated { path } => {
                println!(
                    "   {} {} → {}",
                    "✅".green(),
                    sheet.sheet.bright_blue(),
                    path.display()
                );
            }
            SheetOutcome::Compiled { path, records } => {
                println!(
                    "   {} {} → {} ({} records)",
                    "✅".green(),
                    sheet.sheet.bright_blue(),
                    path.display(),
                    records
                );
            }
            SheetOutcome::Aborted(err) => {
                println!("   {} {}: {}", "❌".red(), sheet.sheet.bright_blue(), err);
            }
        }
    }

    println!(
        "\n{}",
        format!(
            "Done: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        )
        .bold()
    );

    if report.failed() > 0 {
        return Err(SheetError::Workbook(format!(
            "{} of {} sheets failed",
            report.failed(),
            report.sheets.len()
        )));
    }
    Ok(())
}
