//! XBuckets composite resource
//!
//! Strict decode of the observed composite document into a typed record. Only
//! the fields the function reads are modelled; everything else is ignored.

use crate::error::DecodeError;
use serde::de::{DeserializeOwned, Error as _};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Type identifiers of the composite, kept opaque. Only used for logging, so
/// missing or non-string values read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMeta {
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    fn from_document(document: &Map<String, Value>) -> Self {
        let field = |key: &str| {
            document
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            api_version: field("apiVersion"),
            kind: field("kind"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

/// Declared intent: where to create buckets and what to call them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct XBucketsSpec {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub names: Vec<String>,
}

/// Observed XBuckets composite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XBuckets {
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: XBucketsSpec,
}

impl XBuckets {
    /// Decode a composite from its generic document form
    pub fn from_document(document: &Map<String, Value>) -> Result<Self, DecodeError> {
        let type_meta = TypeMeta::from_document(document);
        let metadata: ObjectMeta = decode_block(document, "metadata", "composite metadata")?;
        let spec: XBucketsSpec = decode_block(document, "spec", "composite spec")?;

        if metadata.name.is_empty() {
            return Err(DecodeError::EmptyName);
        }

        Ok(Self {
            type_meta,
            metadata,
            spec,
        })
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn region(&self) -> Option<&str> {
        self.spec.region.as_deref()
    }

    /// Key of the composed resource for a logical name: `<composite>-<logical>`
    pub fn composed_name(&self, logical_name: &str) -> String {
        format!("{}-{}", self.metadata.name, logical_name)
    }

    /// Logical names that appear more than once, each reported once, in order
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.spec
            .names
            .iter()
            .map(String::as_str)
            .filter(|name| !seen.insert(*name) && reported.insert(*name))
            .collect()
    }
}

fn decode_block<T: DeserializeOwned>(
    document: &Map<String, Value>,
    key: &'static str,
    what: &'static str,
) -> Result<T, DecodeError> {
    let Some(block) = document.get(key) else {
        return Err(DecodeError::malformed(
            what,
            serde_json::Error::missing_field(key),
        ));
    };
    T::deserialize(block).map_err(|e| DecodeError::malformed(what, e))
}
