use std::collections::{HashMap, HashSet};

use crate::error::ReconError;

/// An immutable, column-homogeneous table of string-valued rows.
///
/// Every row exposes exactly the declared columns: construction trims all
/// values and fills fields absent from the source with the empty string.
/// The `name` identifies the dataset in error reports (usually the file
/// label the loader read it from).
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

impl Dataset {
    /// Build a dataset from raw column names and row mappings.
    ///
    /// Normalization never fails: absent fields default to the empty
    /// string and every value is whitespace-trimmed. A row field outside
    /// the declared columns, or a duplicate column name, is a schema
    /// error.
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<HashMap<String, String>>,
    ) -> Result<Self, ReconError> {
        let name = name.into();

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ReconError::DuplicateColumn {
                    dataset: name.clone(),
                    column: column.clone(),
                });
            }
        }

        let mut normalized = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            if let Some(field) = row.keys().find(|f| !columns.contains(*f)) {
                return Err(ReconError::UnknownRowField {
                    dataset: name.clone(),
                    row: i,
                    field: field.clone(),
                });
            }
            let mut fields = HashMap::with_capacity(columns.len());
            for column in &columns {
                let value = row
                    .get(column)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default();
                fields.insert(column.clone(), value);
            }
            normalized.push(fields);
        }

        Ok(Self {
            name,
            columns,
            rows: normalized,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[HashMap<String, String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// New dataset restricted to the given columns, preserving row order.
    pub fn project(&self, columns: &[String]) -> Result<Dataset, ReconError> {
        for column in columns {
            if !self.has_column(column) {
                return Err(ReconError::MissingColumn {
                    dataset: self.name.clone(),
                    column: column.clone(),
                });
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| (c.clone(), row.get(c).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect();

        Ok(Dataset {
            name: self.name.clone(),
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Columns present in both datasets, in this dataset's column order.
    pub fn common_columns(&self, other: &Dataset) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| other.has_column(c))
            .cloned()
            .collect()
    }
}
