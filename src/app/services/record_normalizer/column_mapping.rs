//! Header analysis for delimited sources
//!
//! Published exports are not consistent about column naming (`ParkingZone`,
//! `parking_zone`, `Parking Zone`), so lookups compare names with case and
//! punctuation removed.

use std::collections::HashMap;

/// Column names of a source and their positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Column names as they appear in the header, trimmed
    pub columns: Vec<String>,

    /// Normalized column name to index mapping
    pub name_to_index: HashMap<String, usize>,
}

impl ColumnMapping {
    /// Analyze a header row
    ///
    /// When two columns normalize to the same name the first one wins.
    pub fn analyze<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = headers
            .into_iter()
            .map(|header| header.as_ref().trim().to_string())
            .collect();

        let mut name_to_index = HashMap::new();
        for (index, column) in columns.iter().enumerate() {
            name_to_index
                .entry(Self::normalize_name(column))
                .or_insert(index);
        }

        Self {
            columns,
            name_to_index,
        }
    }

    /// Lowercase a column name and drop everything but letters and digits
    pub fn normalize_name(name: &str) -> String {
        name.chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// Get the index for a given column name
    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index
            .get(&Self::normalize_name(column_name))
            .copied()
    }

    /// Check if a column exists in the mapping
    pub fn has_column(&self, column_name: &str) -> bool {
        self.get_index(column_name).is_some()
    }

    /// Required columns the header does not provide
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.has_column(column))
            .map(|column| column.to_string())
            .collect()
    }

    /// Number of columns in the header
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
