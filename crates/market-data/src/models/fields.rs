use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Caller-selected output columns, in request order.
///
/// An empty selection means "every column the vendor returns".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSelection(Vec<String>);

impl FieldSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Force-includes `mandatory` and drops duplicate names.
    ///
    /// Caller fields keep their order, missing mandatory fields are appended.
    /// An empty selection stays empty since it already covers every column.
    pub fn with_mandatory(self, mandatory: &[&str]) -> Self {
        if self.0.is_empty() {
            return self;
        }

        let mut seen = HashSet::new();
        let fields = self
            .0
            .into_iter()
            .chain(mandatory.iter().map(|f| f.to_string()))
            .filter(|f| seen.insert(f.clone()))
            .collect();
        Self(fields)
    }

    /// Comma-separated form used on the wire.
    pub fn to_param(&self) -> String {
        self.0.join(",")
    }
}

impl From<Vec<String>> for FieldSelection {
    fn from(fields: Vec<String>) -> Self {
        Self(
            fields
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
        )
    }
}

impl From<&[&str]> for FieldSelection {
    fn from(fields: &[&str]) -> Self {
        fields
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .into()
    }
}
