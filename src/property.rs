use std::fmt;

use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Error;

/// One column definition of a database schema.
///
/// The wire shape is `{"id": …, "type": …, "<type>": {…}}` where the payload
/// key is named after the type tag (`files` for the `file` type). Exactly one
/// payload is ever present, and [`PropertyConfig`] makes that structural.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: String,
    pub config: PropertyConfig,
}

/// The type-specific configuration payload of a [`Property`].
///
/// Variants without data correspond to property types whose wire payload is
/// an empty object. `Unknown` keeps the raw tag and payload of property types
/// introduced by the service after this crate was built, so such schemas
/// still round-trip losslessly.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyConfig {
    Title,
    RichText,
    Number(NumberConfig),
    Select(SelectConfig),
    MultiSelect(SelectConfig),
    Date,
    People,
    File,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    Formula(FormulaConfig),
    Relation(RelationConfig),
    Rollup(RollupConfig),
    CreatedTime,
    CreatedBy,
    LastEditedTime,
    LastEditedBy,
    UniqueId,
    Unknown { type_name: String, config: Value },
}

/// Discriminator tag of a property, as spelled on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Title,
    RichText,
    Number,
    Select,
    MultiSelect,
    Date,
    People,
    File,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    Formula,
    Relation,
    Rollup,
    CreatedTime,
    CreatedBy,
    LastEditedTime,
    LastEditedBy,
    UniqueId,
    #[serde(untagged)]
    Unknown(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::Title => "title",
            PropertyType::RichText => "rich_text",
            PropertyType::Number => "number",
            PropertyType::Select => "select",
            PropertyType::MultiSelect => "multi_select",
            PropertyType::Date => "date",
            PropertyType::People => "people",
            PropertyType::File => "file",
            PropertyType::Checkbox => "checkbox",
            PropertyType::Url => "url",
            PropertyType::Email => "email",
            PropertyType::PhoneNumber => "phone_number",
            PropertyType::Formula => "formula",
            PropertyType::Relation => "relation",
            PropertyType::Rollup => "rollup",
            PropertyType::CreatedTime => "created_time",
            PropertyType::CreatedBy => "created_by",
            PropertyType::LastEditedTime => "last_edited_time",
            PropertyType::LastEditedBy => "last_edited_by",
            PropertyType::UniqueId => "unique_id",
            PropertyType::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display format of a `number` property.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    #[default]
    Number,
    NumberWithCommas,
    Percent,
    Dollar,
    Euro,
    Pound,
    Yen,
    Ruble,
    Rupee,
    Won,
    Yuan,
    /// A format this crate does not know about; the raw wire string is kept
    /// so it re-encodes unchanged.
    #[serde(untagged)]
    Unrecognized(String),
}

/// Option color palette used by select and multi-select properties.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    #[serde(untagged)]
    Unrecognized(String),
}

/// One labeled choice of a select or multi-select property.
///
/// `id` is stable across renames; the position in the option sequence defines
/// display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NumberConfig {
    #[serde(default)]
    pub format: NumberFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectConfig {
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormulaConfig {
    /// Formula expression in the service's own language; opaque here.
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationConfig {
    #[serde(default)]
    pub database_id: String,
    #[serde(default)]
    pub synced_property_name: String,
    #[serde(default)]
    pub synced_property_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RollupConfig {
    #[serde(default)]
    pub relation_property_name: String,
    #[serde(default)]
    pub relation_property_id: String,
    #[serde(default)]
    pub rollup_property_name: String,
    #[serde(default)]
    pub rollup_property_id: String,
    /// Aggregation function name; an open set controlled by the service.
    #[serde(default)]
    pub function: String,
}

impl PropertyConfig {
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyConfig::Title => PropertyType::Title,
            PropertyConfig::RichText => PropertyType::RichText,
            PropertyConfig::Number(_) => PropertyType::Number,
            PropertyConfig::Select(_) => PropertyType::Select,
            PropertyConfig::MultiSelect(_) => PropertyType::MultiSelect,
            PropertyConfig::Date => PropertyType::Date,
            PropertyConfig::People => PropertyType::People,
            PropertyConfig::File => PropertyType::File,
            PropertyConfig::Checkbox => PropertyType::Checkbox,
            PropertyConfig::Url => PropertyType::Url,
            PropertyConfig::Email => PropertyType::Email,
            PropertyConfig::PhoneNumber => PropertyType::PhoneNumber,
            PropertyConfig::Formula(_) => PropertyType::Formula,
            PropertyConfig::Relation(_) => PropertyType::Relation,
            PropertyConfig::Rollup(_) => PropertyType::Rollup,
            PropertyConfig::CreatedTime => PropertyType::CreatedTime,
            PropertyConfig::CreatedBy => PropertyType::CreatedBy,
            PropertyConfig::LastEditedTime => PropertyType::LastEditedTime,
            PropertyConfig::LastEditedBy => PropertyType::LastEditedBy,
            PropertyConfig::UniqueId => PropertyType::UniqueId,
            PropertyConfig::Unknown { type_name, .. } => {
                PropertyType::Unknown(type_name.clone())
            }
        }
    }
}

impl Property {
    pub fn property_type(&self) -> PropertyType {
        self.config.property_type()
    }

    /// Configuration of a `number` property.
    pub fn number(&self) -> Result<&NumberConfig, Error> {
        match &self.config {
            PropertyConfig::Number(config) => Ok(config),
            other => Err(variant_mismatch(PropertyType::Number, other)),
        }
    }

    /// Configuration of a `select` property.
    pub fn select(&self) -> Result<&SelectConfig, Error> {
        match &self.config {
            PropertyConfig::Select(config) => Ok(config),
            other => Err(variant_mismatch(PropertyType::Select, other)),
        }
    }

    /// Configuration of a `multi_select` property.
    pub fn multi_select(&self) -> Result<&SelectConfig, Error> {
        match &self.config {
            PropertyConfig::MultiSelect(config) => Ok(config),
            other => Err(variant_mismatch(PropertyType::MultiSelect, other)),
        }
    }

    /// Configuration of a `formula` property.
    pub fn formula(&self) -> Result<&FormulaConfig, Error> {
        match &self.config {
            PropertyConfig::Formula(config) => Ok(config),
            other => Err(variant_mismatch(PropertyType::Formula, other)),
        }
    }

    /// Configuration of a `relation` property.
    pub fn relation(&self) -> Result<&RelationConfig, Error> {
        match &self.config {
            PropertyConfig::Relation(config) => Ok(config),
            other => Err(variant_mismatch(PropertyType::Relation, other)),
        }
    }

    /// Configuration of a `rollup` property.
    pub fn rollup(&self) -> Result<&RollupConfig, Error> {
        match &self.config {
            PropertyConfig::Rollup(config) => Ok(config),
            other => Err(variant_mismatch(PropertyType::Rollup, other)),
        }
    }
}

fn variant_mismatch(requested: PropertyType, actual: &PropertyConfig) -> Error {
    Error::InvalidVariantAccess {
        requested,
        actual: actual.property_type(),
    }
}

#[derive(Deserialize)]
struct PropertyWire {
    id: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn take_config<T, E>(extra: &mut Map<String, Value>, key: &str) -> Result<T, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    // An absent payload key for a known type decodes as that payload's
    // defaults, matching the sparse-field convention of the wire format.
    let raw = extra
        .remove(key)
        .unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::from_value(raw).map_err(de::Error::custom)
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let PropertyWire {
            id,
            type_name,
            mut extra,
        } = PropertyWire::deserialize(deserializer)?;

        let config = match type_name.as_str() {
            "title" => PropertyConfig::Title,
            "rich_text" => PropertyConfig::RichText,
            "number" => PropertyConfig::Number(take_config(&mut extra, "number")?),
            "select" => PropertyConfig::Select(take_config(&mut extra, "select")?),
            "multi_select" => {
                PropertyConfig::MultiSelect(take_config(&mut extra, "multi_select")?)
            }
            "date" => PropertyConfig::Date,
            "people" => PropertyConfig::People,
            "file" => PropertyConfig::File,
            "checkbox" => PropertyConfig::Checkbox,
            "url" => PropertyConfig::Url,
            "email" => PropertyConfig::Email,
            "phone_number" => PropertyConfig::PhoneNumber,
            "formula" => PropertyConfig::Formula(take_config(&mut extra, "formula")?),
            "relation" => PropertyConfig::Relation(take_config(&mut extra, "relation")?),
            "rollup" => PropertyConfig::Rollup(take_config(&mut extra, "rollup")?),
            "created_time" => PropertyConfig::CreatedTime,
            "created_by" => PropertyConfig::CreatedBy,
            "last_edited_time" => PropertyConfig::LastEditedTime,
            "last_edited_by" => PropertyConfig::LastEditedBy,
            "unique_id" => PropertyConfig::UniqueId,
            other => {
                tracing::debug!(
                    property_type = other,
                    "unrecognized property type, keeping raw payload"
                );
                PropertyConfig::Unknown {
                    type_name: other.to_string(),
                    config: extra.remove(other).unwrap_or(Value::Null),
                }
            }
        };

        Ok(Property { id, config })
    }
}

impl Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct EmptyConfig {}

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", self.property_type().as_str())?;
        match &self.config {
            PropertyConfig::Number(config) => map.serialize_entry("number", config)?,
            PropertyConfig::Select(config) => map.serialize_entry("select", config)?,
            PropertyConfig::MultiSelect(config) => {
                map.serialize_entry("multi_select", config)?
            }
            PropertyConfig::Formula(config) => map.serialize_entry("formula", config)?,
            PropertyConfig::Relation(config) => map.serialize_entry("relation", config)?,
            PropertyConfig::Rollup(config) => map.serialize_entry("rollup", config)?,
            // The `file` type is the one tag whose payload key differs.
            PropertyConfig::File => map.serialize_entry("files", &EmptyConfig {})?,
            PropertyConfig::Unknown { type_name, config } => {
                if !config.is_null() {
                    map.serialize_entry(type_name, config)?;
                }
            }
            unit => map.serialize_entry(unit.property_type().as_str(), &EmptyConfig {})?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(raw: Value) -> Property {
        serde_json::from_value(raw).expect("property should decode")
    }

    #[test]
    fn decodes_select_options_in_order() {
        let property = decode(json!({
            "id": "p1",
            "type": "select",
            "select": {
                "options": [
                    {"name": "Red", "id": "o1", "color": "red"},
                    {"name": "Blue", "id": "o2", "color": "blue"}
                ]
            }
        }));

        assert_eq!(property.property_type(), PropertyType::Select);
        let options = &property.select().unwrap().options;
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].name, "Red");
        assert_eq!(options[0].color, Color::Red);
        assert_eq!(options[1].name, "Blue");
        assert_eq!(options[1].id, "o2");
    }

    #[test]
    fn rejects_mismatched_variant_access() {
        let property = decode(json!({
            "id": "p1",
            "type": "select",
            "select": {"options": []}
        }));

        let err = property.multi_select().unwrap_err();
        match err {
            Error::InvalidVariantAccess { requested, actual } => {
                assert_eq!(requested, PropertyType::MultiSelect);
                assert_eq!(actual, PropertyType::Select);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn preserves_unknown_property_types() {
        let raw = json!({
            "id": "p9",
            "type": "status",
            "status": {
                "options": [{"name": "Todo", "id": "s1", "color": "gray"}],
                "groups": []
            }
        });

        let property = decode(raw.clone());
        assert_eq!(
            property.property_type(),
            PropertyType::Unknown("status".to_string())
        );

        let encoded = serde_json::to_value(&property).unwrap();
        assert_eq!(encoded, raw);
    }

    #[test]
    fn unknown_type_without_payload_omits_the_key() {
        let property = decode(json!({"id": "p9", "type": "status"}));
        let encoded = serde_json::to_value(&property).unwrap();
        assert_eq!(encoded, json!({"id": "p9", "type": "status"}));
    }

    #[test]
    fn encodes_only_the_matching_payload() {
        let property = Property {
            id: "p2".to_string(),
            config: PropertyConfig::Number(NumberConfig {
                format: NumberFormat::Percent,
            }),
        };

        let encoded = serde_json::to_value(&property).unwrap();
        let keys: Vec<&str> = encoded
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["id", "type", "number"]);
        assert_eq!(encoded["number"], json!({"format": "percent"}));
    }

    #[test]
    fn unit_variants_encode_an_empty_object() {
        let property = Property {
            id: "p3".to_string(),
            config: PropertyConfig::Checkbox,
        };

        let encoded = serde_json::to_value(&property).unwrap();
        assert_eq!(
            encoded,
            json!({"id": "p3", "type": "checkbox", "checkbox": {}})
        );
    }

    #[test]
    fn file_payload_lives_under_the_files_key() {
        let property = decode(json!({"id": "p4", "type": "file", "files": {}}));
        assert_eq!(property.config, PropertyConfig::File);

        let encoded = serde_json::to_value(&property).unwrap();
        assert_eq!(encoded, json!({"id": "p4", "type": "file", "files": {}}));
    }

    #[test]
    fn missing_payload_for_a_known_type_decodes_to_defaults() {
        let property = decode(json!({"id": "p5", "type": "select"}));
        assert!(property.select().unwrap().options.is_empty());
    }

    #[test]
    fn decodes_relation_and_rollup_configs() {
        let relation = decode(json!({
            "id": "p6",
            "type": "relation",
            "relation": {
                "database_id": "db-42",
                "synced_property_name": "Tasks",
                "synced_property_id": "q0"
            }
        }));
        let config = relation.relation().unwrap();
        assert_eq!(config.database_id, "db-42");
        assert_eq!(config.synced_property_name, "Tasks");
        assert_eq!(config.synced_property_id, "q0");

        let rollup = decode(json!({
            "id": "p7",
            "type": "rollup",
            "rollup": {
                "relation_property_name": "Tasks",
                "relation_property_id": "q0",
                "rollup_property_name": "Estimate",
                "rollup_property_id": "q1",
                "function": "sum"
            }
        }));
        let config = rollup.rollup().unwrap();
        assert_eq!(config.rollup_property_name, "Estimate");
        assert_eq!(config.function, "sum");
    }

    #[test]
    fn unrecognized_number_format_round_trips() {
        let property = decode(json!({
            "id": "p8",
            "type": "number",
            "number": {"format": "franc"}
        }));
        assert_eq!(
            property.number().unwrap().format,
            NumberFormat::Unrecognized("franc".to_string())
        );

        let encoded = serde_json::to_value(&property).unwrap();
        assert_eq!(encoded["number"]["format"], json!("franc"));
    }

    #[test]
    fn unrecognized_option_color_round_trips() {
        let property = decode(json!({
            "id": "p1",
            "type": "multi_select",
            "multi_select": {
                "options": [{"name": "Soon", "id": "o1", "color": "chartreuse"}]
            }
        }));
        let options = &property.multi_select().unwrap().options;
        assert_eq!(
            options[0].color,
            Color::Unrecognized("chartreuse".to_string())
        );

        let encoded = serde_json::to_value(&property).unwrap();
        assert_eq!(
            encoded["multi_select"]["options"][0]["color"],
            json!("chartreuse")
        );
    }

    #[test]
    fn missing_type_is_a_decoding_error() {
        let result: Result<Property, _> = serde_json::from_value(json!({"id": "p1"}));
        assert!(result.is_err());
    }
}
