pub mod types;

use async_trait::async_trait;
use futures::future::try_join_all;
use log::{info, warn};
use serde_json::{Map, Number, Value};

use crate::error::ConversionError;
use crate::fetch::DocumentFetcher;
use crate::parse;

use super::DialectConverter;
use super::markup::html_to_markdown;
use super::swagger20::{
    Contact, DataType, Info, License, Operation, Parameter, Response, SwaggerDocument, UNKNOWN,
};
use types::{
    ApiDeclaration, Items, ModelDeclaration, OperationDeclaration, ParameterDeclaration,
    ResourceListing,
};

/// Types that stay primitive when converted; anything else names a model.
pub const PRIMITIVE_TYPES: &[&str] = &["integer", "number", "string", "boolean", "File"];

/// Converts a Swagger 1.2 resource listing and its API declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Swagger12Converter;

#[async_trait]
impl DialectConverter for Swagger12Converter {
    fn source_version(&self) -> &'static str {
        "Swagger 1.2"
    }

    fn applies(&self, document: &Value) -> bool {
        document.get("swaggerVersion").and_then(Value::as_str) == Some("1.2")
    }

    async fn convert(
        &self,
        url: &str,
        document: &Value,
        fetcher: &dyn DocumentFetcher,
    ) -> Result<Value, ConversionError> {
        let listing: ResourceListing =
            serde_json::from_value(document.clone()).map_err(|source| {
                ConversionError::Malformed {
                    url: url.to_string(),
                    source,
                }
            })?;

        let declaration_urls: Vec<String> = listing
            .apis
            .iter()
            .map(|api| declaration_url(url, &api.path))
            .collect();

        let declarations =
            try_join_all(declaration_urls.iter().map(|u| fetch_declaration(fetcher, u))).await?;

        let converted = convert_listing(&listing, &declaration_urls, &declarations)?;
        serde_json::to_value(converted).map_err(|source| ConversionError::Malformed {
            url: url.to_string(),
            source,
        })
    }
}

/// URL of a resource's API declaration, relative to the listing URL.
pub fn declaration_url(listing_url: &str, resource_path: &str) -> String {
    let base = listing_url
        .strip_suffix("/resources.json")
        .unwrap_or(listing_url);
    format!("{}{}", base, resource_path.replace("{format}", "json"))
}

async fn fetch_declaration(
    fetcher: &dyn DocumentFetcher,
    url: &str,
) -> Result<ApiDeclaration, ConversionError> {
    info!("fetching API declaration {url}");
    let fetched = fetcher.fetch(url).await?;
    let value = parse::from_body(&fetched.body, fetched.content_type.as_deref()).map_err(
        |source| ConversionError::Parse {
            url: url.to_string(),
            source,
        },
    )?;
    serde_json::from_value(value).map_err(|source| ConversionError::Malformed {
        url: url.to_string(),
        source,
    })
}

/// Merge a resource listing and its declarations into one 2.0 document.
///
/// Declarations are processed in listing order, so the first declaration
/// that names a usable `basePath` decides host and base path.
pub fn convert_listing(
    listing: &ResourceListing,
    declaration_urls: &[String],
    declarations: &[ApiDeclaration],
) -> Result<SwaggerDocument, ConversionError> {
    let mut v2 = SwaggerDocument {
        info: convert_info(listing),
        resources: listing.apis.clone(),
        ..SwaggerDocument::default()
    };

    for (url, declaration) in declaration_urls.iter().zip(declarations) {
        if v2.info.version.is_empty() {
            if let Some(version) = &declaration.api_version {
                v2.info.version = version.clone();
            }
        }

        if v2.host == UNKNOWN || v2.base_path == UNKNOWN {
            if let Some(base_path) = &declaration.base_path {
                match split_base_path(base_path) {
                    Some((host, path)) => {
                        v2.host = host;
                        v2.base_path = path;
                    }
                    None => warn!("ignoring unparsable basePath '{base_path}' in {url}"),
                }
            }
        }

        let resource_security = oauth_scopes(declaration.authorizations.as_ref());

        for api in &declaration.apis {
            let item = v2.paths.entry(api.path.clone()).or_default();
            for operation in &api.operations {
                let converted = convert_operation(
                    operation,
                    declaration,
                    resource_security.as_ref(),
                    &api.path,
                )?;
                item.insert(operation.method.to_lowercase(), converted);
            }
        }

        for (name, model) in &declaration.models {
            v2.definitions.insert(name.clone(), convert_model(model));
        }
    }

    Ok(v2)
}

fn convert_info(listing: &ResourceListing) -> Info {
    let mut info = Info {
        version: listing.api_version.clone().unwrap_or_default(),
        ..Info::default()
    };

    let Some(source) = &listing.info else {
        return info;
    };

    info.title = source.title.clone().unwrap_or_default();
    info.description = source.description.as_deref().map(html_to_markdown);
    info.terms_of_service = source.terms_of_service_url.clone();
    info.contact = source.contact.clone().map(|name| Contact { name });

    if source.license.is_some() || source.license_url.is_some() {
        info.license = Some(License {
            name: source.license.clone(),
            url: source.license_url.clone(),
        });
    }

    info
}

/// Host (with port) and path of an absolute base URL.
fn split_base_path(base_path: &str) -> Option<(String, String)> {
    let parsed = url::Url::parse(base_path).ok()?;
    let host = parsed.host_str()?;
    let host = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Some((host, parsed.path().to_string()))
}

/// Flatten OAuth2 scope authorizations into scope names.
///
/// Accepts both `{"oauth": {"scopes": [...]}}` and the standard
/// `{"oauth2": [{"scope": ...}]}` shape. Other schemes such as `api_key` or
/// `basic` carry no scopes and are skipped. `None` when no OAuth2 entry is
/// present.
pub fn oauth_scopes(authorizations: Option<&Value>) -> Option<Vec<String>> {
    let entries = authorizations?.as_object()?;
    let mut found = false;
    let mut scopes = Vec::new();

    for (name, value) in entries {
        let oauth = matches!(name.as_str(), "oauth" | "oauth2");
        let list = match value {
            Value::Array(items) if oauth => Some(items),
            Value::Object(obj) => obj.get("scopes").and_then(Value::as_array),
            _ => None,
        };
        if let Some(list) = list {
            found = true;
            scopes.extend(
                list.iter()
                    .filter_map(|s| s.get("scope").and_then(Value::as_str))
                    .map(String::from),
            );
        }
    }

    found.then_some(scopes)
}

fn convert_operation(
    operation: &OperationDeclaration,
    declaration: &ApiDeclaration,
    resource_security: Option<&Vec<String>>,
    path: &str,
) -> Result<Operation, ConversionError> {
    let context = OperationContext {
        resource: declaration.resource_path.as_deref().unwrap_or(path),
        operation: operation.nickname.as_deref().unwrap_or(&operation.method),
    };

    let parameters = operation
        .parameters
        .iter()
        .map(|p| convert_parameter(p, &context))
        .collect::<Result<Vec<_>, _>>()?;

    let security = oauth_scopes(operation.authorizations.as_ref())
        .or_else(|| resource_security.cloned());

    Ok(Operation {
        summary: operation.summary.clone(),
        description: operation.notes.as_deref().map(html_to_markdown),
        operation_id: operation.nickname.clone(),
        produces: operation
            .produces
            .clone()
            .or_else(|| declaration.produces.clone()),
        consumes: operation
            .consumes
            .clone()
            .or_else(|| declaration.consumes.clone()),
        parameters,
        responses: convert_responses(operation, &context)?,
        security,
    })
}

struct OperationContext<'a> {
    resource: &'a str,
    operation: &'a str,
}

impl OperationContext<'_> {
    fn describe(&self) -> String {
        format!("operation '{}' in {}", self.operation, self.resource)
    }
}

pub fn is_primitive(type_name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&type_name)
}

fn convert_parameter(
    parameter: &ParameterDeclaration,
    context: &OperationContext<'_>,
) -> Result<Parameter, ConversionError> {
    let is_body = parameter.param_type == "body";
    let location = match parameter.param_type.as_str() {
        "form" => "formData".to_string(),
        other => other.to_string(),
    };

    let mut data_type = parameter_type(parameter, is_body, context)?;
    if parameter.allow_multiple.unwrap_or(false) {
        data_type = DataType::array(data_type);
    }

    Ok(Parameter {
        name: parameter.name.clone(),
        location,
        description: parameter.description.as_deref().map(html_to_markdown),
        required: is_body || parameter.required.unwrap_or(false),
        unique_items: parameter.unique_items,
        data_type,
    })
}

fn parameter_type(
    parameter: &ParameterDeclaration,
    is_body: bool,
    context: &OperationContext<'_>,
) -> Result<DataType, ConversionError> {
    let declared = parameter.type_name.as_deref();

    if is_body && declared == Some("array") {
        let items = parameter
            .items
            .as_ref()
            .ok_or_else(|| ConversionError::MissingItems {
                context: format!("parameter '{}' of {}", parameter.name, context.describe()),
            })?;
        // The item model is promoted to the parameter's own schema; the array
        // wrapper is dropped.
        return match items.reference.as_deref() {
            Some(model) => Ok(DataType::schema(DataType::model(model))),
            None => Ok(DataType::schema(DataType::array(item_type(items, context)?))),
        };
    }

    match declared.or(parameter.reference.as_deref()) {
        Some(t) if is_primitive(t) => Ok(primitive_parameter(t, parameter.format.as_deref())),
        Some("array") => {
            let items = parameter
                .items
                .as_ref()
                .ok_or_else(|| ConversionError::MissingItems {
                    context: format!("parameter '{}' of {}", parameter.name, context.describe()),
                })?;
            Ok(DataType::array(item_type(items, context)?))
        }
        Some(model) => Ok(DataType::schema(DataType::model(model))),
        None => Err(ConversionError::MissingType {
            resource: context.resource.to_string(),
            operation: context.operation.to_string(),
            parameter: parameter.name.clone(),
        }),
    }
}

/// Parameters have no file primitive at this layer.
fn primitive_parameter(type_name: &str, format: Option<&str>) -> DataType {
    let type_name = if type_name == "File" { "string" } else { type_name };
    DataType::primitive(type_name, format)
}

fn item_type(items: &Items, context: &OperationContext<'_>) -> Result<DataType, ConversionError> {
    match (items.reference.as_deref(), items.type_name.as_deref()) {
        (Some(model), _) => Ok(DataType::model(model)),
        (None, Some(t)) if is_primitive(t) => Ok(primitive_parameter(t, items.format.as_deref())),
        (None, Some(model)) => Ok(DataType::model(model)),
        (None, None) => Err(ConversionError::MissingItems {
            context: context.describe(),
        }),
    }
}

fn convert_responses(
    operation: &OperationDeclaration,
    context: &OperationContext<'_>,
) -> Result<indexmap::IndexMap<String, Response>, ConversionError> {
    let mut responses = indexmap::IndexMap::new();

    if let Some(schema) = return_type(operation, context)? {
        responses.insert("200".to_string(), Response::success(Some(schema)));
    }

    for message in &operation.response_messages {
        let status = message.status();
        let schema = message.response_model.as_deref().map(DataType::model);
        match responses.get_mut(&status) {
            Some(existing) => {
                existing.description = message.message.clone();
                if schema.is_some() {
                    existing.schema = schema;
                }
            }
            None => {
                responses.insert(
                    status,
                    Response {
                        description: message.message.clone(),
                        schema,
                    },
                );
            }
        }
    }

    if responses.is_empty() {
        responses.insert("200".to_string(), Response::success(None));
    }

    Ok(responses)
}

fn return_type(
    operation: &OperationDeclaration,
    context: &OperationContext<'_>,
) -> Result<Option<DataType>, ConversionError> {
    let declared = operation
        .type_name
        .as_deref()
        .or(operation.reference.as_deref());

    match declared {
        None | Some("void") => Ok(None),
        Some("array") => {
            let items = operation
                .items
                .as_ref()
                .ok_or_else(|| ConversionError::MissingItems {
                    context: format!("return type of {}", context.describe()),
                })?;
            Ok(Some(DataType::array(item_type(items, context)?)))
        }
        Some("File") => Ok(Some(DataType::primitive("file", None))),
        Some(t) if is_primitive(t) => Ok(Some(DataType::primitive(t, operation.format.as_deref()))),
        Some(model) => Ok(Some(DataType::model(model))),
    }
}

/// Copy a model, flagging required properties and coercing numeric bounds.
///
/// Property `$ref`s stay as written; they name sibling definitions.
pub fn convert_model(model: &ModelDeclaration) -> Value {
    let mut definition = Map::new();

    if let Some(description) = &model.description {
        definition.insert("description".into(), Value::String(description.clone()));
    }
    if !model.required.is_empty() {
        definition.insert(
            "required".into(),
            Value::Array(model.required.iter().cloned().map(Value::String).collect()),
        );
    }

    let properties: Map<String, Value> = model
        .properties
        .iter()
        .map(|(name, property)| {
            (
                name.clone(),
                convert_property(property, model.required.contains(name)),
            )
        })
        .collect();
    definition.insert("properties".into(), Value::Object(properties));

    Value::Object(definition)
}

fn convert_property(property: &Value, required: bool) -> Value {
    let mut prop = property.as_object().cloned().unwrap_or_default();
    prop.insert("required".into(), Value::Bool(required));

    let integer = match prop.get("type").and_then(Value::as_str) {
        Some("integer") => true,
        Some("number") => false,
        _ => return Value::Object(prop),
    };

    for key in ["minimum", "maximum"] {
        if let Some(coerced) = prop.get(key).and_then(|v| coerce_bound(v, integer)) {
            prop.insert(key.into(), coerced);
        }
    }

    Value::Object(prop)
}

fn coerce_bound(value: &Value, integer: bool) -> Option<Value> {
    let number = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };

    if integer {
        let truncated = number.trunc();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
            Some(Value::Number(Number::from(truncated as i64)))
        } else {
            warn!("integer bound {value} is out of range; keeping it as written");
            None
        }
    } else {
        Number::from_f64(number).map(Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn context() -> OperationContext<'static> {
        OperationContext {
            resource: "/pets",
            operation: "addPet",
        }
    }

    fn parameter(value: Value) -> ParameterDeclaration {
        serde_json::from_value(value).unwrap()
    }

    fn converted(value: Value) -> Value {
        let param = convert_parameter(&parameter(value), &context()).unwrap();
        serde_json::to_value(param).unwrap()
    }

    #[test]
    fn test_body_parameter_forced_required() {
        let out = converted(json!({
            "name": "body", "paramType": "body", "type": "Pet", "required": false
        }));
        assert_eq!(out["required"], true);
        assert_eq!(out["in"], "body");
    }

    #[test]
    fn test_primitive_dispatch() {
        let out = converted(json!({
            "name": "limit", "paramType": "query", "type": "integer", "format": "int32"
        }));
        assert_eq!(out["type"], "integer");
        assert_eq!(out["format"], "int32");
        assert!(out.get("schema").is_none());
        assert_eq!(out["required"], false);
    }

    #[test]
    fn test_model_dispatch() {
        let out = converted(json!({"name": "w", "paramType": "body", "type": "Widget"}));
        assert_eq!(out["schema"], json!({"$ref": "#/definitions/Widget"}));
        assert!(out.get("type").is_none());
    }

    #[test]
    fn test_array_body_promotes_item_model() {
        let out = converted(json!({
            "name": "body", "paramType": "body", "type": "array", "items": {"$ref": "Widget"}
        }));
        assert_eq!(out["schema"], json!({"$ref": "#/definitions/Widget"}));
    }

    #[test]
    fn test_allow_multiple_wraps_type() {
        let out = converted(json!({
            "name": "status", "paramType": "query", "type": "string", "allowMultiple": true
        }));
        assert_eq!(out["type"], "array");
        assert_eq!(out["items"], json!({"type": "string"}));
    }

    #[test]
    fn test_form_file_parameter() {
        let out = converted(json!({"name": "file", "paramType": "form", "type": "File"}));
        assert_eq!(out["in"], "formData");
        assert_eq!(out["type"], "string");
    }

    #[test]
    fn test_missing_type_is_error() {
        let err = convert_parameter(
            &parameter(json!({"name": "x", "paramType": "query"})),
            &context(),
        )
        .unwrap_err();
        assert!(matches!(err, ConversionError::MissingType { .. }));
    }

    #[test]
    fn test_oauth_scopes_shapes() {
        let legacy = json!({"oauth": {"scopes": [{"scope": "read"}, {"scope": "write"}]}});
        assert_eq!(oauth_scopes(Some(&legacy)), Some(vec!["read".into(), "write".into()]));

        let standard = json!({"oauth2": [{"scope": "pets:write", "description": "x"}]});
        assert_eq!(oauth_scopes(Some(&standard)), Some(vec!["pets:write".into()]));

        assert_eq!(oauth_scopes(Some(&json!({}))), None);
        assert_eq!(oauth_scopes(None), None);
    }

    #[test]
    fn test_model_bounds_coerced() {
        let model: ModelDeclaration = serde_json::from_value(json!({
            "required": ["id"],
            "properties": {
                "id": {"type": "integer", "minimum": "1.7", "maximum": "10"},
                "ratio": {"type": "number", "minimum": "0.5"},
                "owner": {"$ref": "Owner"}
            }
        }))
        .unwrap();

        let out = convert_model(&model);
        assert_eq!(out["properties"]["id"]["minimum"], 1);
        assert_eq!(out["properties"]["id"]["maximum"], 10);
        assert_eq!(out["properties"]["id"]["required"], true);
        assert_eq!(out["properties"]["ratio"]["minimum"], 0.5);
        assert_eq!(out["properties"]["owner"]["$ref"], "Owner");
        assert_eq!(out["required"], json!(["id"]));
    }

    #[test]
    fn test_declaration_url() {
        assert_eq!(
            declaration_url("http://api.test/v1/resources.json", "/pets.{format}"),
            "http://api.test/v1/pets.json"
        );
        assert_eq!(
            declaration_url("http://api.test/api-docs", "/pets"),
            "http://api.test/api-docs/pets"
        );
    }

    #[test]
    fn test_split_base_path() {
        assert_eq!(
            split_base_path("https://api.test:8443/v1"),
            Some(("api.test:8443".to_string(), "/v1".to_string()))
        );
        assert_eq!(split_base_path("/relative"), None);
    }

    fn listing(value: Value) -> ResourceListing {
        serde_json::from_value(value).unwrap()
    }

    fn declaration(value: Value) -> ApiDeclaration {
        serde_json::from_value(value).unwrap()
    }

    fn operation(value: Value) -> OperationDeclaration {
        serde_json::from_value(value).unwrap()
    }

    fn responses(value: Value) -> Value {
        let converted = convert_responses(&operation(value), &context()).unwrap();
        serde_json::to_value(converted).unwrap()
    }

    #[test]
    fn test_non_oauth_authorizations_have_no_scopes() {
        assert_eq!(oauth_scopes(Some(&json!({"api_key": []}))), None);
        assert_eq!(oauth_scopes(Some(&json!({"basic": [], "api_key": {}}))), None);

        let mixed = json!({"api_key": [], "oauth2": [{"scope": "pets:read"}]});
        assert_eq!(oauth_scopes(Some(&mixed)), Some(vec!["pets:read".into()]));
    }

    #[test]
    fn test_operation_security_falls_back_to_resource() {
        let decl = declaration(json!({
            "basePath": "http://api.test/v1",
            "resourcePath": "/pets",
            "authorizations": {"oauth2": [{"scope": "pets:read"}]},
            "apis": [{
                "path": "/pets",
                "operations": [
                    {"method": "GET", "nickname": "listPets", "authorizations": {"api_key": []}},
                    {"method": "POST", "nickname": "addPet",
                     "authorizations": {"oauth2": [{"scope": "pets:write"}]}},
                    {"method": "PUT", "nickname": "updatePet"}
                ]
            }]
        }));

        let v2 = convert_listing(
            &listing(json!({"swaggerVersion": "1.2", "apis": [{"path": "/pets"}]})),
            &["http://api.test/api-docs/pets".to_string()],
            &[decl],
        )
        .unwrap();

        let item = &v2.paths["/pets"];
        assert_eq!(item["get"].security, Some(vec!["pets:read".to_string()]));
        assert_eq!(item["post"].security, Some(vec!["pets:write".to_string()]));
        assert_eq!(item["put"].security, Some(vec!["pets:read".to_string()]));
    }

    #[test]
    fn test_first_declaration_decides_host_and_version() {
        let first = declaration(json!({
            "apiVersion": "2.1",
            "basePath": "https://first.test:8443/api",
            "apis": [{"path": "/pets", "operations": [{"method": "GET", "nickname": "listPets"}]}]
        }));
        let second = declaration(json!({
            "apiVersion": "9.9",
            "basePath": "https://second.test/other",
            "apis": [{"path": "/stores", "operations": [{"method": "GET", "nickname": "listStores"}]}]
        }));

        let v2 = convert_listing(
            &listing(json!({
                "swaggerVersion": "1.2",
                "apis": [{"path": "/pets"}, {"path": "/stores"}]
            })),
            &[
                "http://api.test/api-docs/pets".to_string(),
                "http://api.test/api-docs/stores".to_string(),
            ],
            &[first, second],
        )
        .unwrap();

        assert_eq!(v2.host, "first.test:8443");
        assert_eq!(v2.base_path, "/api");
        assert_eq!(v2.info.version, "2.1");
        assert!(v2.paths.contains_key("/pets"));
        assert!(v2.paths.contains_key("/stores"));
    }

    #[test]
    fn test_listing_version_wins_over_declaration() {
        let v2 = convert_listing(
            &listing(json!({"swaggerVersion": "1.2", "apiVersion": "1.0.0", "apis": []})),
            &["http://api.test/api-docs/pets".to_string()],
            &[declaration(json!({"apiVersion": "2.1", "apis": []}))],
        )
        .unwrap();

        assert_eq!(v2.info.version, "1.0.0");
        assert_eq!(v2.host, UNKNOWN);
    }

    #[test]
    fn test_info_contact_and_license() {
        let info = convert_info(&listing(json!({
            "swaggerVersion": "1.2",
            "info": {
                "title": "Pets",
                "description": "All <b>pets</b>",
                "termsOfServiceUrl": "http://api.test/terms",
                "contact": "pets@api.test",
                "license": "Apache 2.0",
                "licenseUrl": "http://www.apache.org/licenses/LICENSE-2.0.html"
            }
        })));

        let out = serde_json::to_value(info).unwrap();
        assert_eq!(out["title"], "Pets");
        assert_eq!(out["description"], "All **pets**");
        assert_eq!(out["termsOfService"], "http://api.test/terms");
        assert_eq!(out["contact"], json!({"name": "pets@api.test"}));
        assert_eq!(
            out["license"],
            json!({"name": "Apache 2.0", "url": "http://www.apache.org/licenses/LICENSE-2.0.html"})
        );
    }

    #[test]
    fn test_license_url_alone() {
        let info = convert_info(&listing(json!({
            "swaggerVersion": "1.2",
            "info": {"title": "Pets", "licenseUrl": "http://license.test"}
        })));
        let out = serde_json::to_value(info).unwrap();
        assert_eq!(out["license"], json!({"url": "http://license.test"}));
        assert!(out.get("contact").is_none());
    }

    #[test]
    fn test_notes_become_markdown_description() {
        let decl = declaration(json!({"resourcePath": "/pets", "apis": []}));
        let op = operation(json!({
            "method": "GET",
            "nickname": "getPet",
            "summary": "Find pet",
            "notes": "Returns a pet when <code>id</code> &lt; 10"
        }));

        let converted = convert_operation(&op, &decl, None, "/pets/{id}").unwrap();
        assert_eq!(
            converted.description.as_deref(),
            Some("Returns a pet when `id` < 10")
        );
        assert_eq!(converted.operation_id.as_deref(), Some("getPet"));
        assert_eq!(converted.security, None);
    }

    #[test]
    fn test_void_operation_defaults_to_success() {
        assert_eq!(
            responses(json!({"method": "DELETE", "type": "void"})),
            json!({"200": {"description": "Success"}})
        );
    }

    #[test]
    fn test_model_return_type() {
        assert_eq!(
            responses(json!({"method": "GET", "type": "Pet"})),
            json!({"200": {"description": "Success", "schema": {"$ref": "#/definitions/Pet"}}})
        );
    }

    #[test]
    fn test_primitive_and_array_return_types() {
        assert_eq!(
            responses(json!({"method": "GET", "type": "integer", "format": "int64"}))["200"]["schema"],
            json!({"type": "integer", "format": "int64"})
        );
        assert_eq!(
            responses(json!({"method": "GET", "type": "array", "items": {"$ref": "Pet"}}))["200"]["schema"],
            json!({"type": "array", "items": {"$ref": "#/definitions/Pet"}})
        );
    }

    #[test]
    fn test_response_messages() {
        let out = responses(json!({
            "method": "GET",
            "type": "Pet",
            "responseMessages": [
                {"code": 200, "message": "The pet"},
                {"code": 400, "message": "Invalid ID supplied"},
                {"code": 404, "message": "Pet not found", "responseModel": "ApiError"}
            ]
        }));

        assert_eq!(
            out,
            json!({
                "200": {"description": "The pet", "schema": {"$ref": "#/definitions/Pet"}},
                "400": {"description": "Invalid ID supplied"},
                "404": {"description": "Pet not found", "schema": {"$ref": "#/definitions/ApiError"}}
            })
        );
    }

    #[test]
    fn test_response_messages_on_void_operation() {
        let out = responses(json!({
            "method": "POST",
            "type": "void",
            "responseMessages": [{"code": "405", "message": "Invalid input"}]
        }));
        assert_eq!(out, json!({"405": {"description": "Invalid input"}}));
    }

    #[test]
    fn test_out_of_range_integer_bound_kept() {
        let model: ModelDeclaration = serde_json::from_value(json!({
            "properties": {
                "big": {"type": "integer", "minimum": "-1e30", "maximum": "1e30"},
                "edge": {"type": "integer", "maximum": 9223372036854775807.0}
            }
        }))
        .unwrap();

        let out = convert_model(&model);
        assert_eq!(out["properties"]["big"]["minimum"], "-1e30");
        assert_eq!(out["properties"]["big"]["maximum"], "1e30");
        assert_eq!(out["properties"]["edge"]["maximum"], 9223372036854775807.0);
    }
}
