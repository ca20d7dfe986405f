use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("sheet '{workbook}/{sheet}' has no data region")]
    EmptySheet { workbook: String, sheet: String },

    #[error("unknown type token '{token}' in column {column}")]
    UnknownType { token: String, column: usize },

    #[error("record type '{0}' does not exist")]
    TypeNotFound(String),

    #[error("sheet '{sheet}': record type declares {expected} fields but the sheet has {actual} columns")]
    SchemaMismatch {
        sheet: String,
        expected: usize,
        actual: usize,
    },

    #[error("sheet '{sheet}': value '{value}' at row {row}, column {col} cannot be converted to {target}")]
    TypeCoercion {
        sheet: String,
        value: String,
        target: String,
        row: usize,
        col: usize,
    },

    #[error("sheet '{sheet}': '{value}' at row {row}, column {col} is not a member of enum {enum_name}")]
    InvalidEnumValue {
        sheet: String,
        value: String,
        enum_name: String,
        row: usize,
        col: usize,
    },

    #[error("record type '{record_type}' has no field '{field}'; regenerate the record source")]
    FieldNotFound { record_type: String, field: String },

    #[error("sheet '{sheet}': invalid header at column {column}: {reason}")]
    InvalidHeader {
        sheet: String,
        column: usize,
        reason: String,
    },

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
