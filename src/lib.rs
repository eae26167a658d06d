//! Typed model of a Notion database's property schema.
//!
//! A [`Database`] mirrors the JSON record the service returns for one hosted
//! database: identity, timestamps, a rich-text title, and a named map of
//! [`Property`] definitions. Each property carries exactly one configuration
//! payload matching its declared type, and property types the service adds
//! after this crate was built still decode and re-encode losslessly.
//!
//! Transport, authentication, pagination, and the page-content (block) model
//! live elsewhere; this crate is a pure wire-to-value mapping.

mod database;
mod error;
mod property;

pub use database::{Database, ObjectType};
pub use error::Error;
pub use property::{
    Color, FormulaConfig, NumberConfig, NumberFormat, Property, PropertyConfig, PropertyType,
    RelationConfig, RollupConfig, SelectConfig, SelectOption,
};
