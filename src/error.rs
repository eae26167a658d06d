use thiserror::Error;

use crate::property::PropertyType;

/// Errors surfaced by this crate.
///
/// Everything here is synchronous and local to the caller; no variant implies
/// a retryable condition. An unrecognized property type on the wire is *not*
/// an error — it decodes into [`crate::PropertyConfig::Unknown`].
#[derive(Debug, Error)]
pub enum Error {
    /// The wire record was malformed or missing a required field.
    #[error("failed to decode wire record: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The value could not be rendered back to JSON.
    #[error("failed to encode record: {0}")]
    Encoding(#[source] serde_json::Error),

    /// A typed payload accessor was called on a property of a different type.
    #[error("property is of type '{actual}', not '{requested}'")]
    InvalidVariantAccess {
        requested: PropertyType,
        actual: PropertyType,
    },
}
