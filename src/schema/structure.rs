//! Column metadata as reported by table structure introspection.

use alloc::string::String;

/// One column of a table structure.
///
/// Only `name` and `is_primary_key` drive SQL generation; the other fields are
/// carried so that the backend payload can be deserialized as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnInfo {
    /// The column name.
    pub name: String,
    /// The declared type, as reported by the database.
    pub data_type: String,
    /// Whether the column accepts NULL.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_nullable: bool,
    /// Whether the column is part of the primary key.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_primary_key: bool,
    /// The default value expression, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_value: Option<String>,
    /// The column comment, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: Option<String>,
}

impl ColumnInfo {
    /// Creates a non-nullable, non-key column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Marks the column as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }
}
