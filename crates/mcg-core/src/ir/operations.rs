use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP method of an operation. Only these verbs become operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    /// Recognized path-item keys, in the order they are visited.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// The lowercase key used in a path item.
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP verb + path pair with the fields the builder derives from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub path: String,

    pub method: HttpMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub produces: Vec<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    /// Security requirements as written: requirement objects for 2.0 sources,
    /// a flat scope list for converted 1.2 sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Value>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    #[serde(default)]
    pub path_params: Vec<Parameter>,

    #[serde(default)]
    pub query_params: Vec<Parameter>,

    #[serde(default)]
    pub header_params: Vec<Parameter>,

    #[serde(default)]
    pub form_params: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_param: Option<Parameter>,

    #[serde(default)]
    pub required_params: Vec<Parameter>,

    #[serde(default)]
    pub is_query_builder: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_builder_name: Option<String>,

    /// Source keys without a typed field, plus renderer decorations.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Operation {
    /// Recompute the parameter partitions and the query-builder flag from
    /// `parameters`.
    pub fn refresh_derived(&mut self) {
        let by_location = |location: ParameterLocation| -> Vec<Parameter> {
            self.parameters
                .iter()
                .filter(|p| p.location == location)
                .cloned()
                .collect()
        };

        let path_params = by_location(ParameterLocation::Path);
        let query_params = by_location(ParameterLocation::Query);
        let header_params = by_location(ParameterLocation::Header);
        let form_params = by_location(ParameterLocation::FormData);
        let body_param = self
            .parameters
            .iter()
            .find(|p| p.location == ParameterLocation::Body)
            .cloned();
        let required_params = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .cloned()
            .collect();

        self.path_params = path_params;
        self.query_params = query_params;
        self.header_params = header_params;
        self.form_params = form_params;
        self.body_param = body_param;
        self.required_params = required_params;
        self.is_query_builder = self.qualifies_as_query_builder();
    }

    /// GET with more than two parameters, none required, all in query or header.
    pub fn qualifies_as_query_builder(&self) -> bool {
        self.method == HttpMethod::Get
            && self.parameters.len() > 2
            && self.parameters.iter().all(|p| {
                !p.required
                    && matches!(
                        p.location,
                        ParameterLocation::Query | ParameterLocation::Header
                    )
            })
    }

    /// The response for `200`, else `201`.
    pub fn success_response(&self) -> Option<&Response> {
        self.responses
            .get("200")
            .or_else(|| self.responses.get("201"))
    }

    /// A label for log and error messages.
    pub fn label(&self) -> String {
        match &self.operation_id {
            Some(id) => id.clone(),
            None => format!("{} {}", self.method, self.path),
        }
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    FormData,
    Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}
