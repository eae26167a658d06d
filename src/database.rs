use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::Error;
use crate::property::Property;

/// Kind tag carried in the `object` field of a wire record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Database,
    Page,
    List,
    Block,
    User,
    #[serde(untagged)]
    Other(String),
}

/// Schema of one hosted database: identity, timestamps, title, and the
/// property definitions its pages must conform to.
///
/// `object` and `id` are required on the wire; everything else decodes to its
/// empty form when absent. Values are plain data, immutable by convention
/// after decoding, and safe to share across threads read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub object: ObjectType,
    pub id: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_edited_time: Option<OffsetDateTime>,
    /// Title as an ordered sequence of rich-text spans. The span structure
    /// belongs to the page-content model and is carried through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title: Vec<Value>,
    /// Property name to definition, in the order the service returned them.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Property>,
}

impl Database {
    /// Decodes a database record from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw).map_err(Error::Decoding)
    }

    /// Renders the record back to its JSON wire form.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Encoding)
    }
}
