use serde_json::Value;

use crate::document::DocumentMap;

/// Key that marks a reference node.
pub const REF_KEY: &str = "$ref";

/// Outcome of resolving a node that may be a `$ref`.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRef<'a> {
    /// The dereferenced node, `None` when the pointer leads nowhere.
    pub value: Option<&'a Value>,
    /// Structural container of `value`, used for legacy sibling lookups.
    pub parent: Option<&'a Value>,
    /// Document the pointer was walked in.
    pub root: &'a Value,
}

/// Resolves `$ref` pointers against a root document or a cross-document URL.
///
/// Resolution never follows a reference found at the destination, so cyclic
/// documents cannot make it loop. Callers that descend through the result are
/// responsible for their own cycle detection.
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    documents: &'a DocumentMap,
}

impl<'a> RefResolver<'a> {
    pub fn new(documents: &'a DocumentMap) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &'a DocumentMap {
        self.documents
    }

    /// Resolve `node` against the entry document.
    pub fn resolve_in_root(&self, node: &'a Value) -> ResolvedRef<'a> {
        self.resolve(node, self.documents.root(), None)
    }

    pub fn resolve(
        &self,
        node: &'a Value,
        root: &'a Value,
        parent: Option<&'a Value>,
    ) -> ResolvedRef<'a> {
        let Some(reference) = ref_of(node) else {
            return ResolvedRef {
                value: Some(node),
                parent,
                root,
            };
        };

        let (href, path) = split_ref(reference);
        let mut root = root;

        if is_remote(href) {
            match self.documents.get(href) {
                Some(document) => root = document,
                None if path.is_some() => {
                    return ResolvedRef {
                        value: None,
                        parent: None,
                        root,
                    };
                }
                None => {}
            }
        }

        match path {
            Some(path) => walk(root, path),
            None => {
                let value = parent
                    .and_then(|p| p.get(reference))
                    .unwrap_or(node);
                ResolvedRef {
                    value: Some(value),
                    parent,
                    root,
                }
            }
        }
    }
}

fn walk<'a>(root: &'a Value, path: &str) -> ResolvedRef<'a> {
    let mut value = Some(root);
    let mut parent = None;

    for segment in path.trim_start_matches('/').split('/') {
        let Some(current) = value else { break };
        parent = Some(current);
        value = current.get(segment);
    }

    ResolvedRef {
        value,
        parent,
        root,
    }
}

/// The `$ref` string of a node, if it is a reference.
pub fn ref_of(node: &Value) -> Option<&str> {
    node.get(REF_KEY).and_then(Value::as_str)
}

/// Split a reference into its `href` and optional path part.
pub fn split_ref(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('#') {
        Some((href, path)) if !path.is_empty() => (href, Some(path)),
        Some((href, _)) => (href, None),
        None => (reference, None),
    }
}

/// Whether an `href` names another document by absolute HTTP(S) URL.
pub fn is_remote(href: &str) -> bool {
    href.starts_with("http:") || href.starts_with("https:")
}

/// Name a reference points at: the text after the last `/`.
pub fn reference_name(reference: &str) -> &str {
    reference
        .rfind('/')
        .map_or(reference, |i| &reference[i + 1..])
}

/// Descend through `schema` and `items` wrappers to the node carrying a `$ref`.
///
/// Returns the innermost node reached, which callers check with [`ref_of`].
pub fn find_ref(node: &Value) -> &Value {
    let mut current = node;
    loop {
        if ref_of(current).is_some() {
            return current;
        }
        if let Some(schema) = current.get("schema").filter(|s| s.is_object()) {
            current = schema;
        } else if let Some(items) = current.get("items").filter(|i| i.is_object()) {
            current = items;
        } else {
            return current;
        }
    }
}
