//! Swagger 1.2 resource listing and API declaration shapes.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::convert::swagger20::ResourceEntry;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListing {
    pub swagger_version: String,

    pub api_version: Option<String>,

    #[serde(default)]
    pub apis: Vec<ResourceEntry>,

    pub info: Option<ListingInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub terms_of_service_url: Option<String>,
    pub contact: Option<String>,
    pub license: Option<String>,
    pub license_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeclaration {
    pub api_version: Option<String>,

    pub base_path: Option<String>,

    pub resource_path: Option<String>,

    pub produces: Option<Vec<String>>,

    pub consumes: Option<Vec<String>>,

    pub authorizations: Option<Value>,

    #[serde(default)]
    pub apis: Vec<Api>,

    #[serde(default)]
    pub models: IndexMap<String, ModelDeclaration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub path: String,

    #[serde(default)]
    pub operations: Vec<OperationDeclaration>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDeclaration {
    pub method: String,

    pub summary: Option<String>,

    pub notes: Option<String>,

    pub nickname: Option<String>,

    #[serde(rename = "type")]
    pub type_name: Option<String>,

    #[serde(rename = "$ref")]
    pub reference: Option<String>,

    pub format: Option<String>,

    pub items: Option<Items>,

    pub produces: Option<Vec<String>>,

    pub consumes: Option<Vec<String>>,

    pub authorizations: Option<Value>,

    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,

    #[serde(default)]
    pub response_messages: Vec<ResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDeclaration {
    pub name: String,

    pub param_type: String,

    pub description: Option<String>,

    pub required: Option<bool>,

    #[serde(rename = "type")]
    pub type_name: Option<String>,

    #[serde(rename = "$ref")]
    pub reference: Option<String>,

    pub format: Option<String>,

    pub items: Option<Items>,

    pub allow_multiple: Option<bool>,

    pub unique_items: Option<bool>,
}

/// Element type of an array in 1.2: a primitive `type` or a model `$ref`.
#[derive(Debug, Clone, Deserialize)]
pub struct Items {
    #[serde(rename = "type")]
    pub type_name: Option<String>,

    #[serde(rename = "$ref")]
    pub reference: Option<String>,

    pub format: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    /// Usually a number, occasionally a string.
    pub code: Value,

    #[serde(default)]
    pub message: String,

    pub response_model: Option<String>,
}

impl ResponseMessage {
    pub fn status(&self) -> String {
        match &self.code {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDeclaration {
    pub description: Option<String>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}
