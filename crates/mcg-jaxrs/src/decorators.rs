use std::sync::Arc;

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use mcg_core::ir::{HttpMethod, Model, Operation, Parameter, ParameterLocation, Property, Resource};
use mcg_core::{Decoration, DecorationHooks};
use serde_json::Value;

use crate::type_mapper::{JavaType, TypeMapper, java_identifier};

pub const JSON: &str = "application/json";
pub const NOT_NULL: &str = "javax.validation.constraints.NotNull";
pub const GENERIC_TYPE: &str = "javax.ws.rs.core.GenericType";

/// Extension naming the client method for an operation.
const OPERATION_NAME_KEY: &str = "x-resource-operation";

/// Hooks that attach Java names, types, and imports for the JAX-RS client.
pub fn hooks(model_package: &str) -> DecorationHooks {
    let mapper = Arc::new(TypeMapper::new(model_package));

    let for_operation = Arc::clone(&mapper);
    let for_parameter = Arc::clone(&mapper);
    let for_property = Arc::clone(&mapper);

    DecorationHooks::new()
        .on_resource(decorate_resource)
        .on_operation(move |operation, _resource, _name| {
            Some(decorate_operation(&for_operation, operation))
        })
        .on_parameter(move |parameter, _operation, _resource, _name| {
            Some(decorate_parameter(&for_parameter, parameter))
        })
        .on_model(decorate_model)
        .on_property(move |property, _model| Some(decorate_property(&for_property, property)))
}

pub fn resource_class(name: &str) -> String {
    format!("{}Resource", name.to_upper_camel_case())
}

fn decorate_resource(_resource: &Resource, name: &str) -> Option<Decoration> {
    Some(
        Decoration::new()
            .field("className", resource_class(name))
            .field("fieldName", name.to_lower_camel_case())
            .import("java.util.List"),
    )
}

fn decorate_operation(mapper: &TypeMapper, operation: &Operation) -> Decoration {
    let returns = operation
        .success_response()
        .and_then(|r| r.schema.as_ref())
        .map(|schema| mapper.java_type(schema))
        .unwrap_or_else(|| mapper.java_type(&Value::Null));

    let parse_as = if returns.is_void() {
        Value::Null
    } else if returns.is_generic() {
        Value::from(format!("new GenericType<{}>() {{}}", returns.name))
    } else {
        Value::from(format!("{}.class", returns.name))
    };

    let content_type = match operation.method {
        HttpMethod::Get | HttpMethod::Delete => Value::Null,
        _ => Value::from(preferred_media_type(&operation.consumes)),
    };

    let mut decoration = Decoration::new()
        .field("methodName", operation_name(operation))
        .field("methodLc", operation.method.key())
        .field("returnType", returns.name.clone())
        .field("hasReturn", !returns.is_void())
        .field("parseAs", parse_as)
        .field("pathParts", path_parts(&operation.path))
        .field("accepts", preferred_media_type(&operation.produces))
        .field("contentType", content_type)
        .imports(returns.imports.iter().cloned());

    if returns.is_generic() {
        decoration = decoration.import(GENERIC_TYPE);
    }
    decoration
}

fn decorate_parameter(mapper: &TypeMapper, parameter: &Parameter) -> Decoration {
    let java = mapper.java_type(&to_value(parameter));
    let client_method = match parameter.location {
        ParameterLocation::Path => "pathParam",
        ParameterLocation::Query => "queryParam",
        ParameterLocation::Header => "header",
        ParameterLocation::FormData => "formParam",
        ParameterLocation::Body => "entity",
    };

    Decoration::new()
        .field("javaType", java.name)
        .field("javaName", java_identifier(&parameter.name))
        .field("clientMethod", client_method)
        .imports(java.imports)
}

fn decorate_model(model: &Model, name: &str) -> Option<Decoration> {
    let class_name = name.to_upper_camel_case();
    let parameters: Vec<&str> = model
        .extensions
        .get("typeParameters")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect();

    let declaration = if parameters.is_empty() {
        class_name.clone()
    } else {
        format!("{}<{}>", class_name, parameters.join(", "))
    };

    Some(
        Decoration::new()
            .field("className", class_name)
            .field("classDeclaration", declaration),
    )
}

fn decorate_property(mapper: &TypeMapper, property: &Property) -> Decoration {
    let java = mapper.java_type(&to_value(property));
    let field = java_identifier(&property.name);
    let accessor = property.name.to_upper_camel_case();

    // models share a package and never import each other
    let own_package = format!("{}.", mapper.model_package());
    let imports = java
        .imports
        .into_iter()
        .filter(|import| !import.starts_with(&own_package));

    let mut decoration = Decoration::new()
        .field("javaType", java.name)
        .field("fieldName", field)
        .field("getter", format!("get{accessor}"))
        .field("setter", format!("set{accessor}"))
        .imports(imports);

    if property.required {
        decoration = decoration
            .field("annotations", vec!["@NotNull"])
            .import(NOT_NULL);
    }
    decoration
}

/// `x-resource-operation`, then the operation id, then a name built from the
/// method and path.
pub fn operation_name(operation: &Operation) -> String {
    let explicit = operation
        .extensions
        .get(OPERATION_NAME_KEY)
        .and_then(Value::as_str)
        .or(operation.operation_id.as_deref());

    match explicit {
        Some(name) => java_identifier(name),
        None => java_identifier(&format!(
            "{} {}",
            operation.method.key(),
            operation.path.replace(['{', '}'], " ")
        )),
    }
}

/// The path as Java string-concatenation operands: literals quoted, template
/// variables passed through `String.valueOf`.
pub fn path_parts(path: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        if open > 0 {
            parts.push(java_string(&rest[..open]));
        }
        parts.push(format!("String.valueOf({})", java_identifier(&rest[open + 1..close])));
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        parts.push(java_string(rest));
    }
    parts
}

/// A quoted Java string literal.
fn java_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// JSON when offered, else the first listed type, else JSON.
pub fn preferred_media_type(types: &[String]) -> String {
    if types.is_empty() || types.iter().any(|t| t == JSON) {
        JSON.to_string()
    } else {
        types[0].clone()
    }
}

/// Java type of a typed dictionary's value, or `Object`.
pub fn dictionary_value_type(value: Option<&Property>) -> String {
    value
        .and_then(|p| p.extensions.get("javaType"))
        .and_then(Value::as_str)
        .filter(|name| *name != JavaType::VOID)
        .unwrap_or("Object")
        .to_string()
}

fn to_value<T: serde::Serialize>(item: &T) -> Value {
    serde_json::to_value(item).unwrap_or(Value::Null)
}
