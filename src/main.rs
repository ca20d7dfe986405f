use anyhow::Context;
use clap::{Parser, Subcommand};
use sheetgen::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetgen")]
#[command(about = "Schema-driven spreadsheet compiler: sheets in, typed records out.")]
#[command(long_about = "Sheetgen - Schema-driven spreadsheet compiler

Sheets declare their own schema in two header rows (row 1: field names,
row 2: type tokens; row 3 is reserved for comments, data starts at row 4).

COMMANDS:
  sheets     - List the sheets in a workbook
  generate   - Generate typed record sources from sheet schemas
  compile    - Compile data rows into persisted YAML collections

EXAMPLES:
  sheetgen sheets items.xlsx
  sheetgen generate items.xlsx --out src/generated
  sheetgen compile items.xlsx --out data
  sheetgen compile items.xlsx --record-type Items   # reuse a generated type

Type tokens accept short and canonical spellings (int / i32, string /
String, ...) plus the [] array form of each. Project enums and aliases are
registered in sheetgen.yaml next to the workbook.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets in a workbook
    Sheets {
        /// Path to the workbook (.xlsx)
        workbook: PathBuf,
    },

    #[command(long_about = "Generate typed record sources from sheet schemas.

Reads the two header rows of every selected sheet, resolves the declared
types, and renders one record source per sheet through the template's
four placeholders (#CLASS_TYPE#, #KEY_TYPE#, #KEY_NAME#, #SHEETDATA#).
The first declared field is the record key by convention.

Sources land in <out>/<workbook-stem>/<SheetName>.rs.

EXAMPLE:
  sheetgen generate items.xlsx --sheets Items,Npcs --out src/generated")]
    /// Generate typed record sources from sheet schemas
    Generate {
        /// Path to the workbook (.xlsx)
        workbook: PathBuf,

        /// Only process the named sheets (comma separated)
        #[arg(long, value_delimiter = ',')]
        sheets: Option<Vec<String>>,

        /// Record source template (embedded default when omitted)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Output directory for generated sources
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Project config file (default: sheetgen.yaml next to the workbook)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    #[command(long_about = "Compile data rows into persisted YAML collections.

Every cell is coerced to its schema-declared type; array cells are split
on spaces and coerced element-wise. Compilation is fail-fast: the first
bad cell aborts its sheet with the exact row, column and offending value.
Sibling sheets are still attempted.

With --record-type, all selected sheets are decoded against a previously
generated record type instead of their own header rows.

EXAMPLES:
  sheetgen compile items.xlsx --out data
  sheetgen compile items.xlsx --record-type Items --out data")]
    /// Compile data rows into persisted YAML collections
    Compile {
        /// Path to the workbook (.xlsx)
        workbook: PathBuf,

        /// Only process the named sheets (comma separated)
        #[arg(long, value_delimiter = ',')]
        sheets: Option<Vec<String>>,

        /// Decode against this generated record type instead of sheet headers
        #[arg(short, long)]
        record_type: Option<String>,

        /// Output directory for persisted collections
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Project config file (default: sheetgen.yaml next to the workbook)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetgen=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sheets { workbook } => {
            cli::sheets(workbook).context("failed to list sheets")?
        }

        Commands::Generate {
            workbook,
            sheets,
            template,
            out,
            config,
        } => cli::generate(workbook, sheets, template, out, config)
            .context("record source generation failed")?,

        Commands::Compile {
            workbook,
            sheets,
            record_type,
            out,
            config,
        } => cli::compile(workbook, sheets, record_type, out, config)
            .context("sheet compilation failed")?,
    }

    Ok(())
}
