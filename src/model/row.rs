//! Row model structures.

use super::CellValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A named value within a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Column header from the source sheet
    pub name: String,
    /// Cell value (never absent, possibly [`CellValue::Empty`])
    pub value: CellValue,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One record: an ordered list of fields in source column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(name, value)` pairs, keeping their order.
    ///
    /// # Example
    ///
    /// ```
    /// use rowpdf::{CellValue, Row};
    ///
    /// let row = Row::from_pairs([("Name", CellValue::text("Ada")), ("Age", 36.0.into())]);
    /// assert_eq!(row.names().collect::<Vec<_>>(), ["Name", "Age"]);
    /// ```
    pub fn from_pairs<N, V, I>(pairs: I) -> Self
    where
        N: Into<String>,
        V: Into<CellValue>,
        I: IntoIterator<Item = (N, V)>,
    {
        Self {
            fields: pairs.into_iter().map(|(n, v)| Field::new(n, v)).collect(),
        }
    }

    /// Append a field.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether every field is empty.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.value.is_empty())
    }

    /// Iterate over the fields in column order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Field names in column order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Look up a value by column name.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Get the fields as a slice.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Serializes as a JSON-style object with keys in column order.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}
