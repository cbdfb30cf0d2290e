//! Table metadata visible to the optimizer.

use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Named, typed field of a row type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Metadata of a (possibly partitioned) table
#[derive(Debug, Clone, PartialEq)]
pub struct TableMeta {
    pub name: String,
    /// Columns stored in the data files
    pub columns: Vec<Field>,
    /// Columns encoded in the storage layout; they follow the data columns
    /// in the row type
    pub partition_columns: Vec<Field>,
    /// Estimated rows scanned
    pub row_count: f64,
}

impl TableMeta {
    pub fn new(name: impl Into<String>, columns: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            columns,
            partition_columns: Vec::new(),
            row_count: 0.0,
        }
    }

    pub fn with_partition_columns(mut self, partition_columns: Vec<Field>) -> Self {
        self.partition_columns = partition_columns;
        self
    }

    pub fn with_row_count(mut self, row_count: f64) -> Self {
        self.row_count = row_count;
        self
    }

    /// Data columns followed by partition columns
    pub fn row_type(&self) -> Vec<Field> {
        self.columns
            .iter()
            .chain(self.partition_columns.iter())
            .cloned()
            .collect()
    }

    pub fn width(&self) -> usize {
        self.columns.len() + self.partition_columns.len()
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.columns
            .get(index)
            .or_else(|| self.partition_columns.get(index.checked_sub(self.columns.len())?))
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .chain(self.partition_columns.iter())
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn partition_column_names(&self) -> HashSet<String> {
        self.partition_columns.iter().map(|f| f.name.clone()).collect()
    }

    pub fn is_partitioned(&self) -> bool {
        !self.partition_columns.is_empty()
    }

    pub fn is_partition_column(&self, index: usize) -> bool {
        index >= self.columns.len() && index < self.width()
    }

    /// True when every referenced field is a partition column; vacuously
    /// true for no references
    pub fn contains_partition_columns_only(&self, indices: &BTreeSet<usize>) -> bool {
        indices.iter().all(|&index| self.is_partition_column(index))
    }
}
