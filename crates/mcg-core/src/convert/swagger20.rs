//! The subset of the Swagger 2.0 document shape that conversion emits.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for host and base path until a declaration supplies them.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Serialize)]
pub struct SwaggerDocument {
    pub swagger: String,

    pub info: Info,

    pub host: String,

    #[serde(rename = "basePath")]
    pub base_path: String,

    #[serde(rename = "x-resources", skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceEntry>,

    pub paths: IndexMap<String, IndexMap<String, Operation>>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, Value>,
}

impl Default for SwaggerDocument {
    fn default() -> Self {
        Self {
            swagger: "2.0".to_string(),
            info: Info::default(),
            host: UNKNOWN.to_string(),
            base_path: UNKNOWN.to_string(),
            resources: Vec::new(),
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Info {
    pub title: String,

    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct License {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Resource-level metadata carried under `x-resources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    pub responses: IndexMap<String, Response>,

    /// Flat list of OAuth2 scope names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(flatten)]
    pub data_type: DataType,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<DataType>,
}

impl Response {
    pub fn success(schema: Option<DataType>) -> Self {
        Self {
            description: "Success".to_string(),
            schema,
        }
    }
}

/// A type reference: a primitive, an array, a model `$ref`, or a `schema` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataType {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<DataType>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<DataType>>,
}

impl DataType {
    pub fn primitive(type_name: &str, format: Option<&str>) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            format: format.map(String::from),
            ..Self::default()
        }
    }

    /// A `$ref` to a model under `#/definitions`. Already-qualified references
    /// are kept as written.
    pub fn model(name: &str) -> Self {
        let reference = if name.contains('#') {
            name.to_string()
        } else {
            format!("#/definitions/{name}")
        };
        Self {
            reference: Some(reference),
            ..Self::default()
        }
    }

    pub fn array(items: DataType) -> Self {
        Self {
            type_name: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    pub fn schema(inner: DataType) -> Self {
        Self {
            schema: Some(Box::new(inner)),
            ..Self::default()
        }
    }
}
