pub mod ref_resolve;

use serde_json::Value;

use crate::error::ParseError;

/// Content types whose bodies are parsed as YAML. Everything else is JSON.
pub const YAML_MIME_TYPES: &[&str] = &[
    "text/yaml",
    "text/x-yaml",
    "application/yaml",
    "application/x-yaml",
];

/// Description dialect of a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Swagger 2.0, consumed as-is.
    Swagger20,
    /// Anything else; a converter has to claim it.
    Other,
}

/// Parse a document from YAML.
pub fn from_yaml(input: &str) -> Result<Value, ParseError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse a document from JSON.
pub fn from_json(input: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(input)?)
}

/// Parse a fetched body, choosing YAML or JSON from its declared content type.
pub fn from_body(body: &str, content_type: Option<&str>) -> Result<Value, ParseError> {
    if is_yaml_mime(content_type) {
        from_yaml(body)
    } else {
        from_json(body)
    }
}

/// Whether a `Content-Type` header value names YAML. Parameters after `;` are ignored.
pub fn is_yaml_mime(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .is_some_and(|mime| YAML_MIME_TYPES.contains(&mime.as_str()))
}

/// Detect the dialect from the `swagger` version marker.
pub fn detect_dialect(document: &Value) -> Dialect {
    let is_v2 = match document.get("swagger") {
        Some(Value::String(s)) => s == "2.0" || s == "2",
        Some(Value::Number(n)) => n.as_f64() == Some(2.0),
        _ => false,
    };

    if is_v2 {
        Dialect::Swagger20
    } else {
        Dialect::Other
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_yaml_mime_detection() {
        assert!(is_yaml_mime(Some("application/x-yaml")));
        assert!(is_yaml_mime(Some("text/yaml; charset=utf-8")));
        assert!(!is_yaml_mime(Some("application/json")));
        assert!(!is_yaml_mime(None));
    }

    #[test]
    fn test_from_body_dispatch() {
        let yaml = from_body("swagger: '2.0'\npaths: {}\n", Some("text/yaml")).unwrap();
        assert_eq!(yaml["swagger"], "2.0");

        let json = from_body(r#"{"swagger": 2.0}"#, Some("application/json")).unwrap();
        assert_eq!(detect_dialect(&json), Dialect::Swagger20);
    }

    #[test]
    fn test_detect_dialect() {
        assert_eq!(detect_dialect(&json!({"swagger": "2.0"})), Dialect::Swagger20);
        assert_eq!(detect_dialect(&json!({"swagger": 2})), Dialect::Swagger20);
        assert_eq!(detect_dialect(&json!({"swaggerVersion": "1.2"})), Dialect::Other);
        assert_eq!(detect_dialect(&json!({"openapi": "3.0.0"})), Dialect::Other);
    }
}
