//! Column types and declared schemas.

use serde::{Deserialize, Serialize};

/// Type of a frame column.
///
/// `Long` carries epoch-millisecond timestamps and identifiers; `Double`
/// carries metric values and classification flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColType {
    Double,
    Long,
    String,
}

impl ColType {
    /// Short type name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ColType::Double => "double",
            ColType::Long => "long",
            ColType::String => "string",
        }
    }
}

/// An ordered set of named, typed fields a source is expected to deliver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<(String, ColType)>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field; the last declaration wins on duplicate names.
    pub fn with_field(mut self, name: impl Into<String>, col_type: ColType) -> Self {
        let name = name.into();
        if let Some(existing) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = col_type;
        } else {
            self.fields.push((name, col_type));
        }
        self
    }

    pub fn field_type(&self, name: &str) -> Option<ColType> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, ColType)> {
        self.fields.iter().map(|(n, t)| (n.as_str(), *t))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
