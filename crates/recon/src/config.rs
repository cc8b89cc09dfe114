use serde::Deserialize;

use crate::error::ReconError;

/// Which columns to compare and how rows are aligned.
///
/// Without key columns, rows are aligned by index and the comparison stops
/// at the shorter dataset. With key columns, rows are aligned by the
/// ordered tuple of key values and the union of keys from both sides is
/// compared.
#[derive(Debug, Clone, Deserialize)]
pub struct CompareConfig {
    /// Columns whose values are compared.
    pub compare: Vec<String>,
    /// Key columns for row alignment; positional alignment when absent.
    #[serde(default)]
    pub keys: Option<Vec<String>>,
    /// Project both datasets to their common column set before validation,
    /// so column order and one-sided columns are ignored.
    #[serde(default)]
    pub ignore_column_order: bool,
}

impl CompareConfig {
    pub fn positional(compare: Vec<String>) -> Self {
        Self {
            compare,
            keys: None,
            ignore_column_order: false,
        }
    }

    pub fn keyed(compare: Vec<String>, keys: Vec<String>) -> Self {
        Self {
            compare,
            keys: Some(keys),
            ignore_column_order: false,
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.compare.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one compare column is required".into(),
            ));
        }
        if let Some(keys) = &self.keys {
            if keys.is_empty() {
                return Err(ReconError::ConfigValidation(
                    "keys must name at least one column when present".into(),
                ));
            }
        }
        Ok(())
    }
}
