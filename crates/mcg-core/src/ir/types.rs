use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::operations::Operation;
use super::schemas::Model;

/// The normalized, grouped, decorated model handed to renderers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiModel {
    pub info: Info,
    pub host: Option<String>,
    pub base_path: Option<String>,
    /// Resources sorted case-insensitively by name.
    pub resources: IndexMap<String, Resource>,
    /// Models reachable from operations, sorted case-insensitively by name.
    pub models: IndexMap<String, Model>,
    /// Operations flagged as query-builder candidates, in resource order.
    pub query_builders: Vec<Operation>,
}

impl ApiModel {
    pub fn operations(&self) -> impl Iterator<Item = (&Resource, &Operation)> {
        self.resources
            .values()
            .flat_map(|r| r.operations.iter().map(move |op| (r, op)))
    }
}

/// API metadata from the document's `info` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// A named grouping of operations, derived from tags or path shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,

    pub description: String,

    pub operations: Vec<Operation>,

    /// Collection groups first, entity groups next, action groups last.
    pub groups: IndexMap<String, Group>,

    /// Imports contributed by decorations of this resource and its
    /// operations, parameters, and responses, sorted.
    #[serde(default)]
    pub imports: Vec<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Resource {
    pub fn group_operations<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Operation> {
        group
            .operation_indices
            .iter()
            .filter_map(|&i| self.operations.get(i))
    }
}

/// A sub-grouping of a resource's operations by path shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Indices into the owning resource's `operations`.
    pub operation_indices: Vec<usize>,
}
