use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::BuildError;
use crate::ir::{Model, Operation, Parameter, Property, Resource, Response};

/// The six decoration points, visited in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Resource,
    Operation,
    Parameter,
    Response,
    Model,
    Property,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::Resource => "resource",
            HookKind::Operation => "operation",
            HookKind::Parameter => "parameter",
            HookKind::Response => "response",
            HookKind::Model => "model",
            HookKind::Property => "property",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a hook hands back: fields to merge onto its target and imports the
/// rendered output will need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoration {
    pub fields: Map<String, Value>,
    pub imports: Vec<String>,
}

impl Decoration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    pub fn imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(imports.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.imports.is_empty()
    }
}

pub type ResourceHook = Box<dyn Fn(&Resource, &str) -> Option<Decoration> + Send + Sync>;
pub type OperationHook =
    Box<dyn Fn(&Operation, &Resource, &str) -> Option<Decoration> + Send + Sync>;
pub type ParameterHook =
    Box<dyn Fn(&Parameter, &Operation, &Resource, &str) -> Option<Decoration> + Send + Sync>;
pub type ResponseHook =
    Box<dyn Fn(&Response, &Operation, &Resource, &str) -> Option<Decoration> + Send + Sync>;
pub type ModelHook = Box<dyn Fn(&Model, &str) -> Option<Decoration> + Send + Sync>;
pub type PropertyHook = Box<dyn Fn(&Property, &Model) -> Option<Decoration> + Send + Sync>;

/// The hook table a renderer registers with the model builder. Every slot is
/// optional; an empty table leaves the model undecorated.
#[derive(Default)]
pub struct DecorationHooks {
    resource: Option<ResourceHook>,
    operation: Option<OperationHook>,
    parameter: Option<ParameterHook>,
    response: Option<ResponseHook>,
    model: Option<ModelHook>,
    property: Option<PropertyHook>,
}

impl DecorationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_resource<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Resource, &str) -> Option<Decoration> + Send + Sync + 'static,
    {
        self.resource = Some(Box::new(hook));
        self
    }

    pub fn on_operation<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Operation, &Resource, &str) -> Option<Decoration> + Send + Sync + 'static,
    {
        self.operation = Some(Box::new(hook));
        self
    }

    pub fn on_parameter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Parameter, &Operation, &Resource, &str) -> Option<Decoration>
            + Send
            + Sync
            + 'static,
    {
        self.parameter = Some(Box::new(hook));
        self
    }

    /// The last argument is the response's status code.
    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Response, &Operation, &Resource, &str) -> Option<Decoration>
            + Send
            + Sync
            + 'static,
    {
        self.response = Some(Box::new(hook));
        self
    }

    pub fn on_model<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Model, &str) -> Option<Decoration> + Send + Sync + 'static,
    {
        self.model = Some(Box::new(hook));
        self
    }

    pub fn on_property<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Property, &Model) -> Option<Decoration> + Send + Sync + 'static,
    {
        self.property = Some(Box::new(hook));
        self
    }

    pub fn is_registered(&self, kind: HookKind) -> bool {
        match kind {
            HookKind::Resource => self.resource.is_some(),
            HookKind::Operation => self.operation.is_some(),
            HookKind::Parameter => self.parameter.is_some(),
            HookKind::Response => self.response.is_some(),
            HookKind::Model => self.model.is_some(),
            HookKind::Property => self.property.is_some(),
        }
    }

    pub(crate) fn resource(&self, resource: &Resource, name: &str) -> Option<Decoration> {
        self.resource.as_ref().and_then(|hook| hook(resource, name))
    }

    pub(crate) fn operation(
        &self,
        operation: &Operation,
        resource: &Resource,
        name: &str,
    ) -> Option<Decoration> {
        self.operation
            .as_ref()
            .and_then(|hook| hook(operation, resource, name))
    }

    pub(crate) fn parameter(
        &self,
        parameter: &Parameter,
        operation: &Operation,
        resource: &Resource,
        name: &str,
    ) -> Option<Decoration> {
        self.parameter
            .as_ref()
            .and_then(|hook| hook(parameter, operation, resource, name))
    }

    pub(crate) fn response(
        &self,
        response: &Response,
        operation: &Operation,
        resource: &Resource,
        status: &str,
    ) -> Option<Decoration> {
        self.response
            .as_ref()
            .and_then(|hook| hook(response, operation, resource, status))
    }

    pub(crate) fn model(&self, model: &Model, name: &str) -> Option<Decoration> {
        self.model.as_ref().and_then(|hook| hook(model, name))
    }

    pub(crate) fn property(&self, property: &Property, model: &Model) -> Option<Decoration> {
        self.property
            .as_ref()
            .and_then(|hook| hook(property, model))
    }
}

impl fmt::Debug for DecorationHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<&str> = [
            HookKind::Resource,
            HookKind::Operation,
            HookKind::Parameter,
            HookKind::Response,
            HookKind::Model,
            HookKind::Property,
        ]
        .into_iter()
        .filter(|kind| self.is_registered(*kind))
        .map(|kind| kind.as_str())
        .collect();

        f.debug_struct("DecorationHooks")
            .field("registered", &registered)
            .finish()
    }
}

/// Shallow-merge `fields` onto `target`. Keys naming a typed field replace it;
/// anything else lands in the target's extension map.
pub fn merge_fields<T>(
    target: &mut T,
    fields: Map<String, Value>,
    kind: HookKind,
    label: &str,
) -> Result<(), BuildError>
where
    T: Serialize + DeserializeOwned,
{
    if fields.is_empty() {
        return Ok(());
    }

    let decoration_error = |source| BuildError::Decoration {
        kind,
        target: label.to_string(),
        source,
    };

    let mut object = match serde_json::to_value(&*target).map_err(decoration_error)? {
        Value::Object(object) => object,
        _ => Map::new(),
    };
    object.extend(fields);

    *target = serde_json::from_value(Value::Object(object)).map_err(decoration_error)?;
    Ok(())
}

/// Merge `imports` into a sorted, duplicate-free list.
pub fn merge_imports(into: &mut Vec<String>, imports: Vec<String>) {
    if imports.is_empty() {
        return;
    }
    into.extend(imports);
    into.sort();
    into.dedup();
}
