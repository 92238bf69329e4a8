use serde::{Deserialize, Serialize};

use super::naming::generate_name;

/// Reference to a table held by the compute server.
///
/// Serializes to the wire-level table reference, e.g.
/// `{"name": "input", "caslib": "dlib", "replace": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasTable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caslib: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub replace: bool,
}

impl CasTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            caslib: None,
            replace: false,
        }
    }

    /// A table with a freshly generated unique name.
    pub fn generated() -> Self {
        Self::new(generate_name())
    }

    pub fn in_caslib(mut self, caslib: impl Into<String>) -> Self {
        self.caslib = Some(caslib.into());
        self
    }

    pub fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }

    /// This table as an action input: same name and caslib, no replace flag.
    pub fn as_input(&self) -> CasTable {
        Self {
            name: self.name.clone(),
            caslib: self.caslib.clone(),
            replace: false,
        }
    }

    /// The table as named in FedSQL text, qualified by its caslib when set.
    pub fn sql_name(&self) -> String {
        match &self.caslib {
            Some(caslib) => format!("{}.{}", caslib, self.name),
            None => self.name.clone(),
        }
    }
}

impl From<&str> for CasTable {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
