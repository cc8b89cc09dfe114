use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty compare set, empty key list, etc.).
    ConfigValidation(String),
    /// A declared column name appears more than once in a dataset.
    DuplicateColumn { dataset: String, column: String },
    /// A row carries a field that is not among the declared columns.
    UnknownRowField { dataset: String, row: usize, field: String },
    /// A requested compare/key/projection column is absent from a dataset.
    MissingColumn { dataset: String, column: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DuplicateColumn { dataset, column } => {
                write!(f, "dataset '{dataset}': duplicate column '{column}'")
            }
            Self::UnknownRowField { dataset, row, field } => {
                write!(f, "dataset '{dataset}', row {row}: unknown field '{field}'")
            }
            Self::MissingColumn { dataset, column } => {
                write!(f, "dataset '{dataset}': missing column '{column}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
