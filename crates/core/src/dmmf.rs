//! Raw input document: the flattened data-model metadata (DMMF) supplied by
//! the host. These shapes mirror the wire format exactly; all derived
//! structure (relation pairing, eligibility flags) lives in [`crate::model`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmmfDocument {
    pub datamodel: Datamodel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Datamodel {
    #[serde(default)]
    pub models: Vec<DmmfModel>,
    #[serde(default)]
    pub enums: Vec<DmmfEnum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmmfModel {
    pub name: String,
    #[serde(default, rename = "dbName")]
    pub db_name: Option<String>,
    pub fields: Vec<DmmfField>,
    /// Groups of field names forming composite unique constraints.
    #[serde(default, rename = "uniqueFields")]
    pub unique_fields: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmmfField {
    pub name: String,
    pub kind: DmmfFieldKind,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, rename = "isRequired")]
    pub is_required: bool,
    #[serde(default, rename = "isList")]
    pub is_list: bool,
    #[serde(default, rename = "isId")]
    pub is_id: bool,
    #[serde(default, rename = "isUnique")]
    pub is_unique: bool,
    /// Shared token pairing the two sides of a relation.
    #[serde(default, rename = "relationName")]
    pub relation_name: Option<String>,
    /// Scalar fields on this model storing the relation's foreign key.
    #[serde(default, rename = "relationFromFields")]
    pub relation_from_fields: Vec<String>,
    #[serde(default, rename = "relationToFields")]
    pub relation_to_fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DmmfFieldKind {
    Scalar,
    Object,
    Enum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmmfEnum {
    pub name: String,
    pub values: Vec<String>,
}

impl DmmfDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl DmmfField {
    /// True for fields that carry a value directly (scalar or enum), as
    /// opposed to object fields describing a relation.
    pub fn is_value_field(&self) -> bool {
        matches!(self.kind, DmmfFieldKind::Scalar | DmmfFieldKind::Enum)
    }
}
