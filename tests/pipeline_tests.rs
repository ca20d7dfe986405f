//! End-to-end pipeline tests over real .xlsx fixtures

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use sheetgen::codegen;
use sheetgen::compiler;
use sheetgen::excel::Workbook;
use sheetgen::loader::{select_sheets, SheetLoader, SheetOutcome};
use sheetgen::registry::{RecordSpec, RecordTypeRegistry};
use sheetgen::resolver::TypeResolver;
use sheetgen::schema;
use sheetgen::store::CollectionStore;
use sheetgen::types::{FieldValue, SheetHandle, Value};
use sheetgen::SheetError;

/// Items sheet: 3 columns, comment row, two data rows.
fn write_items_workbook(path: &Path) {
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Items").unwrap();

    for (col, name) in ["id", "name", "score"].iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (col, token) in ["int", "string", "int[]"].iter().enumerate() {
        sheet.write_string(1, col as u16, *token).unwrap();
    }
    sheet.write_string(2, 0, "unique key").unwrap();
    sheet.write_string(2, 1, "display name").unwrap();
    sheet.write_string(2, 2, "space separated").unwrap();

    sheet.write_number(3, 0, 7.0).unwrap();
    sheet.write_string(3, 1, "Alice").unwrap();
    sheet.write_string(3, 2, "10 20 30").unwrap();

    sheet.write_number(4, 0, 8.0).unwrap();
    sheet.write_string(4, 1, "Bob").unwrap();
    sheet.write_string(4, 2, "5").unwrap();

    workbook.save(path).unwrap();
}

/// Adds a second sheet whose type row carries an unresolvable token.
fn write_mixed_workbook(path: &Path) {
    let mut workbook = XlsxWorkbook::new();

    let good = workbook.add_worksheet();
    good.set_name("Good").unwrap();
    good.write_string(0, 0, "id").unwrap();
    good.write_string(1, 0, "int").unwrap();
    good.write_string(2, 0, "key").unwrap();
    good.write_number(3, 0, 1.0).unwrap();

    let bad = workbook.add_worksheet();
    bad.set_name("Bad").unwrap();
    bad.write_string(0, 0, "blob").unwrap();
    bad.write_string(1, 0, "Object").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn test_compile_items_end_to_end() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");
    write_items_workbook(&xlsx);

    let resolver = TypeResolver::with_builtins();
    let mut workbook = Workbook::open(&xlsx).unwrap();
    let handle = SheetHandle::new(&xlsx, "Items");

    let grid = workbook.grid("Items").unwrap();
    let schema = schema::from_sheet_headers(&grid, &handle, &resolver).unwrap();
    assert_eq!(schema.len(), 3);

    let spec = RecordSpec::from_schema("Items", &schema);
    let collection = compiler::compile_sheet(&grid, &handle, &schema, &spec, &resolver).unwrap();

    assert_eq!(collection.len(), 2);
    let alice = &collection.records[0];
    assert_eq!(alice.get("id"), Some(&FieldValue::Scalar(Value::I32(7))));
    assert_eq!(
        alice.get("name"),
        Some(&FieldValue::Scalar(Value::Str("Alice".to_string())))
    );
    assert_eq!(
        alice.get("score"),
        Some(&FieldValue::Array(vec![
            Value::I32(10),
            Value::I32(20),
            Value::I32(30)
        ]))
    );

    let store = CollectionStore::new(dir.path().join("data"));
    let saved = store.save(&collection).unwrap();
    let text = fs::read_to_string(saved).unwrap();
    assert!(text.contains("record_type: Items"));
    assert!(text.contains("name: Alice"));
    assert!(text.contains("- 30"));
}

#[test]
fn test_schema_round_trips_through_generated_source() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");
    write_items_workbook(&xlsx);

    let resolver = TypeResolver::with_builtins();
    let mut workbook = Workbook::open(&xlsx).unwrap();
    let handle = SheetHandle::new(&xlsx, "Items");
    let grid = workbook.grid("Items").unwrap();

    let schema = schema::from_sheet_headers(&grid, &handle, &resolver).unwrap();
    let source = codegen::generate(&schema, "Items", codegen::DEFAULT_TEMPLATE);

    let mut registry = RecordTypeRegistry::new();
    registry.register(RecordSpec::parse_source("Items", &source).unwrap());

    let recovered = schema::from_record_type("Items", &registry, &resolver).unwrap();
    assert_eq!(recovered, schema);
}

#[test]
fn test_stale_record_type_is_schema_mismatch() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");
    write_items_workbook(&xlsx);

    let resolver = TypeResolver::with_builtins();
    let mut workbook = Workbook::open(&xlsx).unwrap();
    let handle = SheetHandle::new(&xlsx, "Items");
    let grid = workbook.grid("Items").unwrap();

    // Declares one field more than the sheet has columns.
    let mut registry = RecordTypeRegistry::new();
    registry.register(RecordSpec {
        type_name: "Items".to_string(),
        fields: vec![
            ("id".to_string(), "i32".to_string()),
            ("name".to_string(), "String".to_string()),
            ("score".to_string(), "i32[]".to_string()),
            ("level".to_string(), "i32".to_string()),
        ],
    });

    let schema = schema::from_record_type("Items", &registry, &resolver).unwrap();
    let spec = registry.get("Items").cloned().unwrap();
    let err = compiler::compile_sheet(&grid, &handle, &schema, &spec, &resolver).unwrap_err();

    assert!(matches!(
        err,
        SheetError::SchemaMismatch {
            expected: 4,
            actual: 3,
            ..
        }
    ));
}

#[test]
fn test_loader_generates_then_compiles() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");
    write_items_workbook(&xlsx);

    let resolver = TypeResolver::with_builtins();
    let mut workbook = Workbook::open(&xlsx).unwrap();
    let handles = select_sheets(&workbook, None);
    let mut loader = SheetLoader::new(&resolver, RecordTypeRegistry::new());

    let codegen_dir = dir.path().join("generated");
    let report = loader.generate_sources(
        &mut workbook,
        &handles,
        codegen::DEFAULT_TEMPLATE,
        &codegen_dir,
    );
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 0);

    let generated = codegen_dir.join("items").join("Items.rs");
    assert!(generated.is_file());
    let source = fs::read_to_string(&generated).unwrap();
    assert!(source.contains("pub struct Items {"));
    assert!(source.contains("pub score: Vec<i32>,"));

    // The generate pass registered the type; compile against it by name.
    let store = CollectionStore::new(dir.path().join("data"));
    let report = loader.compile_sheets(&mut workbook, &handles, Some("Items"), &store);
    assert_eq!(report.succeeded(), 1);
    assert!(dir.path().join("data").join("Items.yaml").is_file());
}

#[test]
fn test_failed_sheet_does_not_stop_siblings() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("mixed.xlsx");
    write_mixed_workbook(&xlsx);

    let resolver = TypeResolver::with_builtins();
    let mut workbook = Workbook::open(&xlsx).unwrap();
    let handles = select_sheets(&workbook, None);
    let mut loader = SheetLoader::new(&resolver, RecordTypeRegistry::new());

    let store = CollectionStore::new(dir.path().join("data"));
    let report = loader.compile_sheets(&mut workbook, &handles, None, &store);

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);

    let bad = report
        .sheets
        .iter()
        .find(|r| r.sheet == "Bad")
        .unwrap();
    assert!(matches!(
        bad.outcome,
        SheetOutcome::Aborted(SheetError::UnknownType { .. })
    ));
    assert!(dir.path().join("data").join("Good.yaml").is_file());
    assert!(!dir.path().join("data").join("Bad.yaml").exists());
}

#[test]
fn test_sheet_selection_narrows_processing() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("mixed.xlsx");
    write_mixed_workbook(&xlsx);

    let resolver = TypeResolver::with_builtins();
    let mut workbook = Workbook::open(&xlsx).unwrap();
    let only = vec!["Good".to_string()];
    let handles = select_sheets(&workbook, Some(&only));
    let mut loader = SheetLoader::new(&resolver, RecordTypeRegistry::new());

    let store = CollectionStore::new(dir.path().join("data"));
    let report = loader.compile_sheets(&mut workbook, &handles, None, &store);

    assert_eq!(report.sheets.len(), 1);
    assert_eq!(report.sheets[0].sheet, "Good");
}

#[test]
fn test_bad_cell_aborts_sheet_with_position() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");

    let mut xlsx_workbook = XlsxWorkbook::new();
    let sheet = xlsx_workbook.add_worksheet();
    sheet.set_name("Items").unwrap();
    sheet.write_string(0, 0, "id").unwrap();
    sheet.write_string(0, 1, "score").unwrap();
    sheet.write_string(1, 0, "int").unwrap();
    sheet.write_string(1, 1, "int[]").unwrap();
    sheet.write_number(3, 0, 7.0).unwrap();
    sheet.write_string(3, 1, "10 x 30").unwrap();
    xlsx_workbook.save(&xlsx).unwrap();

    let resolver = TypeResolver::with_builtins();
    let mut workbook = Workbook::open(&xlsx).unwrap();
    let handle = SheetHandle::new(&xlsx, "Items");
    let grid = workbook.grid("Items").unwrap();

    let schema = schema::from_sheet_headers(&grid, &handle, &resolver).unwrap();
    let spec = RecordSpec::from_schema("Items", &schema);
    let err = compiler::compile_sheet(&grid, &handle, &schema, &spec, &resolver).unwrap_err();

    assert!(matches!(
        err,
        SheetError::TypeCoercion { ref value, row: 4, col: 2, .. } if value == "x"
    ));
}
