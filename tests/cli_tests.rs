//! CLI integration tests (binary-level)

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::path::Path;
use tempfile::TempDir;

fn sheetgen() -> Command {
    Command::cargo_bin("sheetgen").unwrap()
}

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
    sheet.write_number(3, 0, 7.0).unwrap();
    sheet.write_string(3, 1, "Alice").unwrap();
    sheet.write_string(3, 2, "10 20 30").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn test_sheets_lists_sheet_names() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");
    write_items_workbook(&xlsx);

    sheetgen()
        .arg("sheets")
        .arg(&xlsx)
        .assert()
        .success()
        .stdout(predicate::str::contains("Items"));
}

#[test]
fn test_generate_writes_record_source() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");
    write_items_workbook(&xlsx);
    let out = dir.path().join("generated");

    sheetgen()
        .arg("generate")
        .arg(&xlsx)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 succeeded, 0 failed"));

    let generated = out.join("items").join("Items.rs");
    assert!(generated.is_file());
    let source = std::fs::read_to_string(generated).unwrap();
    assert!(source.contains("pub struct Items {"));
    assert!(source.contains("pub id: i32,"));
}

#[test]
fn test_compile_writes_collection() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");
    write_items_workbook(&xlsx);
    let out = dir.path().join("data");

    sheetgen()
        .arg("compile")
        .arg(&xlsx)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 records"));

    let yaml = std::fs::read_to_string(out.join("Items.yaml")).unwrap();
    assert!(yaml.contains("name: Alice"));
}

#[test]
fn test_compile_reports_bad_cell() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");

    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Items").unwrap();
    sheet.write_string(0, 0, "id").unwrap();
    sheet.write_string(1, 0, "int").unwrap();
    sheet.write_string(3, 0, "not a number").unwrap();
    workbook.save(&xlsx).unwrap();

    sheetgen()
        .arg("compile")
        .arg(&xlsx)
        .arg("--out")
        .arg(dir.path().join("data"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("not a number"));
}

#[test]
fn test_missing_workbook_fails() {
    sheetgen()
        .arg("sheets")
        .arg("no/such/workbook.xlsx")
        .assert()
        .failure()
        .stderr(predicate::str::contains("workbook"));
}

#[test]
fn test_compile_with_unknown_record_type_fails() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("items.xlsx");
    write_items_workbook(&xlsx);

    sheetgen()
        .arg("compile")
        .arg(&xlsx)
        .arg("--record-type")
        .arg("Missing")
        .arg("--out")
        .arg(dir.path().join("data"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing"));
}
