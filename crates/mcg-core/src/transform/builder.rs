use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::document::DocumentMap;
use crate::error::BuildError;
use crate::ir::grouping::{capitalize, place_operation, sort_case_insensitive, sort_groups};
use crate::ir::{
    ApiModel, Dictionary, Group, HttpMethod, Info, Model, Operation, Parameter,
    ParameterLocation, Property, Resource, Response,
};
use crate::parse::ref_resolve::{RefResolver, find_ref, ref_of, reference_name};

use super::decorate::{DecorationHooks, HookKind, merge_fields, merge_imports};

/// Build the decorated [`ApiModel`] from a loaded document set.
pub fn build(documents: &DocumentMap, hooks: &DecorationHooks) -> Result<ApiModel, BuildError> {
    let root = documents.root();
    if !root.is_object() {
        return Err(BuildError::MissingRoot);
    }

    let resolver = RefResolver::new(documents);
    let defaults = MediaDefaults {
        produces: string_list(root.get("produces")),
        consumes: string_list(root.get("consumes")),
    };

    let info = match root.get("info") {
        Some(info) => from_node::<Info>(info, || "info".to_string())?,
        None => Info::default(),
    };

    // Phase 1: enumerate operations, discovering models as we go
    let mut discovery = ModelDiscovery::new(resolver);
    let mut resources: IndexMap<String, Resource> = IndexMap::new();

    for (path, item) in object_entries(root.get("paths")) {
        let resolved = resolver.resolve(item, root, None);
        let Some(methods) = resolved.value.and_then(Value::as_object) else {
            warn!("path item for {path} could not be resolved, skipping");
            continue;
        };

        for (key, node) in methods {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            let operation = build_operation(
                path,
                method,
                node,
                resolved.root,
                &defaults,
                &mut discovery,
            )?;
            if let Some(operation) = operation {
                add_to_resource(&mut resources, operation, root);
            }
        }
    }

    // Phase 2: ordering and query builders
    for resource in resources.values_mut() {
        sort_groups(&mut resource.groups);
        tag_query_builders(resource);
    }
    sort_case_insensitive(&mut resources);

    let mut models = discovery.into_models()?;
    sort_case_insensitive(&mut models);

    // Phase 3: decoration
    decorate_resources(&mut resources, hooks)?;
    decorate_models(&mut models, hooks)?;

    let query_builders = resources
        .values()
        .flat_map(|r| r.operations.iter())
        .filter(|op| op.is_query_builder)
        .cloned()
        .collect();

    Ok(ApiModel {
        info,
        host: root.get("host").and_then(Value::as_str).map(str::to_string),
        base_path: root
            .get("basePath")
            .and_then(Value::as_str)
            .map(str::to_string),
        resources,
        models,
        query_builders,
    })
}

struct MediaDefaults {
    produces: Vec<String>,
    consumes: Vec<String>,
}

fn build_operation<'a>(
    path: &str,
    method: HttpMethod,
    node: &'a Value,
    root: &'a Value,
    defaults: &MediaDefaults,
    discovery: &mut ModelDiscovery<'a>,
) -> Result<Option<Operation>, BuildError> {
    let Some(source) = node.as_object() else {
        warn!("{method} {path} is not an object, skipping");
        return Ok(None);
    };
    let label = format!("{method} {path}");

    let mut fields: Map<String, Value> = source
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "parameters" | "responses"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    fields.insert("path".into(), Value::String(path.to_string()));
    fields.insert("method".into(), Value::String(method.as_str().to_string()));

    let mut operation = from_node::<Operation>(&Value::Object(fields), || label.clone())?;

    for param in source
        .get("parameters")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let resolved = discovery.resolver.resolve(param, root, None);
        let Some(value) = resolved.value.filter(|v| ref_of(v).is_none()) else {
            warn!("unresolved parameter reference in {label}: {param}");
            continue;
        };

        discovery.visit(value, resolved.root, resolved.parent);

        let mut parameter = from_node::<Parameter>(value, || format!("parameter of {label}"))?;
        if parameter.location == ParameterLocation::Body {
            parameter.required = true;
        }
        operation.parameters.push(parameter);
    }

    for (status, response) in object_entries(source.get("responses")) {
        let resolved = discovery.resolver.resolve(response, root, None);
        let Some(value) = resolved.value.filter(|v| ref_of(v).is_none()) else {
            warn!("unresolved response reference in {label} ({status})");
            continue;
        };

        discovery.visit(value, resolved.root, resolved.parent);

        let response = from_node::<Response>(value, || format!("response {status} of {label}"))?;
        operation.responses.insert(status.clone(), response);
    }

    if operation.produces.is_empty() {
        operation.produces = defaults.produces.clone();
    }
    if operation.consumes.is_empty() {
        operation.consumes = defaults.consumes.clone();
    }

    operation.refresh_derived();
    Ok(Some(operation))
}

fn add_to_resource(resources: &mut IndexMap<String, Resource>, operation: Operation, root: &Value) {
    let placement = place_operation(&operation.path, &operation.tags);

    let resource = resources
        .entry(placement.resource.clone())
        .or_insert_with(|| Resource {
            description: resource_description(root, &operation.path, &placement.resource),
            name: placement.resource.clone(),
            operations: Vec::new(),
            groups: IndexMap::new(),
            imports: Vec::new(),
            extensions: Map::new(),
        });

    let index = resource.operations.len();
    resource.operations.push(operation);
    resource
        .groups
        .entry(placement.group.clone())
        .or_insert_with(|| Group {
            name: placement.group,
            description: String::new(),
            operation_indices: Vec::new(),
        })
        .operation_indices
        .push(index);
}

/// Description from the first `x-resources` entry prefixing the path, then a
/// top-level tag of the same name, then a generic fallback.
fn resource_description(root: &Value, path: &str, name: &str) -> String {
    let from_listing = root
        .get("x-resources")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|entry| {
            entry
                .get("path")
                .and_then(Value::as_str)
                .is_some_and(|prefix| path.starts_with(prefix))
        })
        .and_then(|entry| entry.get("description"))
        .and_then(Value::as_str);

    let from_tags = || {
        root.get("tags")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find(|tag| tag.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|tag| tag.get("description"))
            .and_then(Value::as_str)
    };

    from_listing
        .filter(|d| !d.is_empty())
        .or_else(|| from_tags().filter(|d| !d.is_empty()))
        .map_or_else(|| format!("Operations for {name}"), str::to_string)
}

fn tag_query_builders(resource: &mut Resource) {
    let builder_name = format!("{}Query", capitalize(&resource.name));
    for operation in &mut resource.operations {
        operation.query_builder_name = operation
            .is_query_builder
            .then(|| builder_name.clone());
    }
}

fn decorate_resources(
    resources: &mut IndexMap<String, Resource>,
    hooks: &DecorationHooks,
) -> Result<(), BuildError> {
    for (name, resource) in resources.iter_mut() {
        if let Some(decoration) = hooks.resource(resource, name) {
            merge_fields(resource, decoration.fields, HookKind::Resource, name)?;
            merge_imports(&mut resource.imports, decoration.imports);
        }

        for index in 0..resource.operations.len() {
            decorate_operation(resource, index, name, hooks)?;
        }
        tag_query_builders(resource);
    }
    Ok(())
}

fn decorate_operation(
    resource: &mut Resource,
    index: usize,
    name: &str,
    hooks: &DecorationHooks,
) -> Result<(), BuildError> {
    let label = resource.operations[index].label();

    if let Some(decoration) = hooks.operation(&resource.operations[index], resource, name) {
        merge_fields(
            &mut resource.operations[index],
            decoration.fields,
            HookKind::Operation,
            &label,
        )?;
        merge_imports(&mut resource.imports, decoration.imports);
    }

    for p in 0..resource.operations[index].parameters.len() {
        let operation = &resource.operations[index];
        let Some(decoration) = hooks.parameter(&operation.parameters[p], operation, resource, name)
        else {
            continue;
        };
        let target = format!("{} of {label}", operation.parameters[p].name);
        merge_fields(
            &mut resource.operations[index].parameters[p],
            decoration.fields,
            HookKind::Parameter,
            &target,
        )?;
        merge_imports(&mut resource.imports, decoration.imports);
    }

    let statuses: Vec<String> = resource.operations[index].responses.keys().cloned().collect();
    for status in statuses {
        let operation = &resource.operations[index];
        let Some(decoration) = hooks.response(&operation.responses[&status], operation, resource, &status)
        else {
            continue;
        };
        if let Some(response) = resource.operations[index].responses.get_mut(&status) {
            let target = format!("{status} of {label}");
            merge_fields(response, decoration.fields, HookKind::Response, &target)?;
        }
        merge_imports(&mut resource.imports, decoration.imports);
    }

    resource.operations[index].refresh_derived();
    Ok(())
}

fn decorate_models(
    models: &mut IndexMap<String, Model>,
    hooks: &DecorationHooks,
) -> Result<(), BuildError> {
    for (name, model) in models.iter_mut() {
        if let Some(decoration) = hooks.model(model, name) {
            merge_fields(model, decoration.fields, HookKind::Model, name)?;
            merge_imports(&mut model.imports, decoration.imports);
        }

        let keys: Vec<String> = model.properties.keys().cloned().collect();
        for key in keys {
            let Some(decoration) = hooks.property(&model.properties[&key], model) else {
                continue;
            };
            if let Some(property) = model.properties.get_mut(&key) {
                let target = format!("{name}.{key}");
                merge_fields(property, decoration.fields, HookKind::Property, &target)?;
            }
            merge_imports(&mut model.imports, decoration.imports);
        }

        let value_decoration = match &model.dictionary {
            Some(Dictionary::Typed { value, .. }) => hooks.property(value, model),
            _ => None,
        };
        if let Some(decoration) = value_decoration {
            if let Some(Dictionary::Typed { value, .. }) = model.dictionary.as_mut() {
                let target = format!("{name}.{}", value.name);
                merge_fields(&mut **value, decoration.fields, HookKind::Property, &target)?;
            }
            merge_imports(&mut model.imports, decoration.imports);
        }
    }
    Ok(())
}

/// A model found during discovery, with the context needed to resolve the
/// references inside it.
#[derive(Debug, Clone, Copy)]
struct Discovered<'a> {
    value: &'a Value,
    parent: Option<&'a Value>,
    root: &'a Value,
}

/// Memoized walk from operation schemas to every model they reach.
///
/// A model is registered before its members are scanned, so a reference back
/// to a model already in the map ends the descent.
struct ModelDiscovery<'a> {
    resolver: RefResolver<'a>,
    found: IndexMap<String, Discovered<'a>>,
}

impl<'a> ModelDiscovery<'a> {
    fn new(resolver: RefResolver<'a>) -> Self {
        Self {
            resolver,
            found: IndexMap::new(),
        }
    }

    fn visit(&mut self, node: &'a Value, root: &'a Value, parent: Option<&'a Value>) {
        let target = find_ref(node);
        match ref_of(target) {
            Some(reference) => self.register(reference, target, root, parent),
            None => self.scan(target, root, parent),
        }
    }

    fn register(
        &mut self,
        reference: &str,
        node: &'a Value,
        root: &'a Value,
        parent: Option<&'a Value>,
    ) {
        let name = reference_name(reference);
        if self.found.contains_key(name) {
            return;
        }

        let Some(resolved) = self.follow(node, root, parent) else {
            warn!("could not resolve model reference {reference}");
            return;
        };

        debug!("discovered model {name}");
        self.found.insert(name.to_string(), resolved);
        self.scan(resolved.value, resolved.root, resolved.parent);
    }

    /// Resolve `node`, following chains of references to a concrete schema.
    fn follow(
        &self,
        node: &'a Value,
        root: &'a Value,
        parent: Option<&'a Value>,
    ) -> Option<Discovered<'a>> {
        let mut seen = HashSet::new();
        let mut current = node;
        let mut root = root;
        let mut parent = parent;

        while let Some(reference) = ref_of(current) {
            if !seen.insert(reference) {
                return None;
            }
            let resolved = self.resolver.resolve(current, root, parent);
            let value = resolved.value?;
            if std::ptr::eq(value, current) {
                return None;
            }
            current = value;
            root = resolved.root;
            parent = resolved.parent;
        }

        Some(Discovered {
            value: current,
            parent,
            root,
        })
    }

    fn scan(&mut self, schema: &'a Value, root: &'a Value, parent: Option<&'a Value>) {
        for (_, property) in object_entries(schema.get("properties")) {
            self.visit(property, root, parent);
        }
        for member in schema.get("allOf").and_then(Value::as_array).into_iter().flatten() {
            self.visit(member, root, parent);
        }
        if let Some(additional) = schema.get("additionalProperties").filter(|a| a.is_object()) {
            self.visit(additional, root, parent);
        }
        for (_, member) in object_entries(schema.get("patternProperties")) {
            self.visit(member, root, parent);
        }
    }

    fn into_models(self) -> Result<IndexMap<String, Model>, BuildError> {
        let resolver = self.resolver;
        self.found
            .iter()
            .map(|(name, found)| Ok((name.clone(), build_model(name, found, &resolver)?)))
            .collect()
    }
}

/// Keys consumed into typed `Model` fields; everything else is carried as an
/// extension.
const MODEL_KEYS: [&str; 6] = [
    "description",
    "properties",
    "required",
    "allOf",
    "additionalProperties",
    "patternProperties",
];

fn build_model<'a>(
    name: &str,
    found: &Discovered<'a>,
    resolver: &RefResolver<'a>,
) -> Result<Model, BuildError> {
    let mut members = Members::default();
    let mut visiting = HashSet::new();
    members.collect(found.value, found.root, found.parent, resolver, &mut visiting);

    let properties = members
        .properties
        .iter()
        .map(|(key, node)| {
            let required = members.required.contains(key);
            Ok((key.clone(), build_property(key, node, required, name)?))
        })
        .collect::<Result<IndexMap<_, _>, BuildError>>()?;

    let dictionary = match found.value.get("additionalProperties") {
        Some(Value::Bool(true)) => Some(Dictionary::Untyped),
        Some(schema) if schema.is_object() => Some(Dictionary::Typed {
            key_pattern: ".*".to_string(),
            value: Box::new(build_property("value", schema, false, name)?),
        }),
        _ => match object_entries(found.value.get("patternProperties")).next() {
            Some((pattern, schema)) => Some(Dictionary::Typed {
                key_pattern: pattern.clone(),
                value: Box::new(build_property("value", schema, false, name)?),
            }),
            None => None,
        },
    };

    let extensions = found
        .value
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(key, _)| !MODEL_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(Model {
        name: name.to_string(),
        description: found
            .value
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        properties,
        required: members.required,
        dictionary,
        imports: Vec::new(),
        extensions,
    })
}

/// Properties and required names of a schema with its `allOf` members merged
/// in, members first.
#[derive(Default)]
struct Members<'a> {
    properties: IndexMap<String, &'a Value>,
    required: Vec<String>,
}

impl<'a> Members<'a> {
    fn collect(
        &mut self,
        schema: &'a Value,
        root: &'a Value,
        parent: Option<&'a Value>,
        resolver: &RefResolver<'a>,
        visiting: &mut HashSet<*const Value>,
    ) {
        if !visiting.insert(schema as *const Value) {
            return;
        }

        for member in schema.get("allOf").and_then(Value::as_array).into_iter().flatten() {
            let resolved = resolver.resolve(member, root, parent);
            match resolved.value.filter(|v| ref_of(v).is_none()) {
                Some(value) => self.collect(value, resolved.root, resolved.parent, resolver, visiting),
                None => warn!("could not resolve allOf member {member}"),
            }
        }

        for (key, node) in object_entries(schema.get("properties")) {
            self.properties.insert(key.clone(), node);
        }

        for name in string_list(schema.get("required")) {
            if !self.required.contains(&name) {
                self.required.push(name);
            }
        }
    }
}

fn build_property(
    name: &str,
    node: &Value,
    required: bool,
    model: &str,
) -> Result<Property, BuildError> {
    let mut fields = node.as_object().cloned().unwrap_or_default();
    fields.insert("name".into(), Value::String(name.to_string()));
    fields.insert("required".into(), Value::Bool(required));

    from_node::<Property>(&Value::Object(fields), || format!("property {model}.{name}"))
}

fn from_node<T>(node: &Value, context: impl FnOnce() -> String) -> Result<T, BuildError>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(node).map_err(|source| BuildError::Malformed {
        context: context(),
        source,
    })
}

fn object_entries(node: Option<&Value>) -> impl Iterator<Item = (&String, &Value)> {
    node.and_then(Value::as_object).into_iter().flatten()
}

fn string_list(node: Option<&Value>) -> Vec<String> {
    node.and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}
