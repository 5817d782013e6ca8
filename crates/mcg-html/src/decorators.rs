use heck::ToKebabCase;
use mcg_core::ir::{Model, Operation, Parameter, ParameterLocation, Property, Resource};
use mcg_core::parse::ref_resolve::{find_ref, ref_of, reference_name};
use mcg_core::{Decoration, DecorationHooks};
use serde_json::Value;

/// Hooks that prepare the model for the documentation page.
pub fn hooks() -> DecorationHooks {
    DecorationHooks::new()
        .on_resource(decorate_resource)
        .on_operation(decorate_operation)
        .on_parameter(decorate_parameter)
        .on_model(decorate_model)
        .on_property(decorate_property)
}

fn decorate_resource(_resource: &Resource, name: &str) -> Option<Decoration> {
    Some(Decoration::new().field("anchor", format!("resource-{}", name.to_kebab_case())))
}

fn decorate_operation(operation: &Operation, _resource: &Resource, name: &str) -> Option<Decoration> {
    let anchor = match &operation.operation_id {
        Some(id) => format!("op-{}-{}", name.to_kebab_case(), id.to_kebab_case()),
        None => format!(
            "op-{}-{}-{}",
            name.to_kebab_case(),
            operation.method.key(),
            operation.path.to_kebab_case()
        ),
    };

    let mut decoration = Decoration::new().field("anchor", anchor);

    if let Some(body) = &operation.body_param {
        decoration = decoration.field("body", type_label(&to_value(body)));
    }

    let response = operation
        .responses
        .get("200")
        .and_then(|r| r.schema.as_ref())
        .map(type_label);
    if let Some(response) = response {
        decoration = decoration.field("response", response);
    }

    Some(decoration)
}

fn decorate_parameter(
    parameter: &Parameter,
    _operation: &Operation,
    _resource: &Resource,
    _name: &str,
) -> Option<Decoration> {
    let location = match parameter.location {
        ParameterLocation::Path => "path",
        ParameterLocation::Query => "query",
        ParameterLocation::Header => "header",
        ParameterLocation::FormData => "form",
        ParameterLocation::Body => "body",
    };

    let value = to_value(parameter);
    let mut decoration = Decoration::new()
        .field("displayIn", location)
        .field("displayType", type_label(&value));
    if let Some(link) = model_link(&value) {
        decoration = decoration.field("link", link);
    }
    Some(decoration)
}

fn decorate_model(_model: &Model, name: &str) -> Option<Decoration> {
    Some(Decoration::new().field("anchor", model_anchor(name)))
}

fn decorate_property(property: &Property, _model: &Model) -> Option<Decoration> {
    let value = to_value(property);
    let mut decoration = Decoration::new().field("displayType", type_label(&value));
    if let Some(link) = model_link(&value) {
        decoration = decoration.field("link", link);
    }
    Some(decoration)
}

pub fn model_anchor(name: &str) -> String {
    format!("model-{}", name.to_kebab_case())
}

/// Human-readable type of a parameter, property, or schema node, with model
/// references shortened to the model name.
pub fn type_label(node: &Value) -> String {
    if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
        return reference_name(reference).to_string();
    }
    if let Some(schema) = node.get("schema").filter(|s| s.is_object()) {
        return type_label(schema);
    }

    match node.get("type").and_then(Value::as_str) {
        Some("array") => {
            let items = node
                .get("items")
                .map(type_label)
                .unwrap_or_else(|| "object".to_string());
            format!("{items}[]")
        }
        Some(type_name) => match node.get("format").and_then(Value::as_str) {
            Some(format) => format!("{type_name} ({format})"),
            None => type_name.to_string(),
        },
        None => "object".to_string(),
    }
}

/// Anchor of the model a node refers to, looking through `schema` and `items`.
pub fn model_link(node: &Value) -> Option<String> {
    let reference = ref_of(find_ref(node))?;
    Some(model_anchor(reference_name(reference)))
}

fn to_value<T: serde::Serialize>(item: &T) -> Value {
    serde_json::to_value(item).unwrap_or(Value::Null)
}
