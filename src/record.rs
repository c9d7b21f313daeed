use crate::col::ColumnKeys;
use crate::error::{Error, Result};
use crate::value::Value;

/// One row of a result, with its values bound to the column keys of the exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    keys: ColumnKeys,
    values: Vec<Value>,
}

impl Record {
    /// Bind positional `values` to `keys`
    ///
    /// Fails with [`Error::MalformedRecord`] when the lengths differ.
    /// No record is produced in that case.
    pub fn new(keys: ColumnKeys, values: Vec<Value>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(Error::MalformedRecord {
                expected: keys.len(),
                actual: values.len(),
            });
        }
        Ok(Self { keys, values })
    }

    pub fn keys(&self) -> &ColumnKeys {
        &self.keys
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value of the column named `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.keys.index_of(key).and_then(|idx| self.values.get(idx))
    }

    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(key, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
