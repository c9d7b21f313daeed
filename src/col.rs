use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

use tracing::warn;

use crate::constant::FIELDS_KEY;
use crate::error::{Error, Result};
use crate::value::{Metadata, Value};

/// Ordered column names of one result
///
/// Cloning is cheap: every record of an exchange shares the same allocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnKeys(Arc<[String]>);

impl ColumnKeys {
    pub fn new(keys: Vec<String>) -> Self {
        Self(Arc::from(keys))
    }

    /// Read the `"fields"` entry of a metadata map
    ///
    /// A missing entry yields empty keys. An entry that is not a list of strings is rejected.
    pub fn from_metadata(meta: &Metadata) -> Result<Self> {
        let Some(fields) = meta.get(FIELDS_KEY) else {
            return Ok(Self::default());
        };
        let list = fields.as_list().ok_or_else(|| {
            let found = fields.type_name();
            Error::MalformedMetadata(format!("'{FIELDS_KEY}' must be a List, got {found}"))
        })?;
        let names = list
            .iter()
            .map(|field| match field {
                Value::String(name) => Ok(name.clone()),
                other => {
                    let found = other.type_name();
                    Err(Error::MalformedMetadata(format!(
                        "'{FIELDS_KEY}' entries must be String, got {found}"
                    )))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        let keys = Self::new(names);
        if let Some(duplicate) = keys.first_duplicate() {
            warn!(%duplicate, "duplicate column name, lookups by name return the first");
        }
        Ok(keys)
    }

    /// Position of the first key equal to `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|key| key == name)
    }

    /// First name that appears more than once
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.0
            .iter()
            .map(String::as_str)
            .find(|key| !seen.insert(*key))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Deref for ColumnKeys {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
