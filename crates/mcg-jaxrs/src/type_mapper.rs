use mcg_core::parse::ref_resolve::reference_name;
use serde_json::Value;

/// A Java type expression plus the imports it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaType {
    pub name: String,
    pub imports: Vec<String>,
}

impl JavaType {
    pub const VOID: &'static str = "void";

    fn simple(name: impl Into<String>) -> Self {
        let name = name.into();
        let imports = standard_import(&name).into_iter().map(String::from).collect();
        Self { name, imports }
    }

    pub fn is_void(&self) -> bool {
        self.name == Self::VOID
    }

    /// Whether the type has type arguments and needs a `GenericType` to parse.
    pub fn is_generic(&self) -> bool {
        self.name.contains('<')
    }
}

fn primitive_class(type_name: &str) -> Option<&'static str> {
    match type_name {
        "integer" => Some("Integer"),
        "number" => Some("BigDecimal"),
        "string" => Some("String"),
        "boolean" => Some("Boolean"),
        "File" | "file" => Some("InputStream"),
        "object" => Some("Object"),
        _ => None,
    }
}

fn format_class(format: &str) -> Option<&'static str> {
    match format {
        "int32" => Some("Integer"),
        "int64" => Some("Long"),
        "float" => Some("Float"),
        "double" => Some("BigDecimal"),
        "byte" => Some("String"),
        "date" => Some("LocalDate"),
        "date-time" => Some("DateTime"),
        _ => None,
    }
}

fn standard_import(class: &str) -> Option<&'static str> {
    match class {
        "BigDecimal" => Some("java.math.BigDecimal"),
        "List" => Some("java.util.List"),
        "Set" => Some("java.util.Set"),
        "Map" => Some("java.util.Map"),
        "LocalDate" => Some("org.joda.time.LocalDate"),
        "DateTime" => Some("org.joda.time.DateTime"),
        "InputStream" => Some("java.io.InputStream"),
        _ => None,
    }
}

/// Maps schema-shaped nodes to Java types, importing models from one package.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    model_package: String,
}

impl TypeMapper {
    pub fn new(model_package: impl Into<String>) -> Self {
        Self {
            model_package: model_package.into(),
        }
    }

    pub fn model_package(&self) -> &str {
        &self.model_package
    }

    /// Java type of a parameter, property, response schema, or `items` node.
    /// Nodes with no type information map to `void`.
    pub fn java_type(&self, node: &Value) -> JavaType {
        if let Some(type_name) = node.get("type").and_then(Value::as_str) {
            return match type_name {
                "array" => self.collection(node),
                _ => self.scalar(type_name, node.get("format").and_then(Value::as_str)),
            };
        }

        if let Some(schema) = node.get("schema").filter(|s| s.is_object()) {
            if schema.get("$ref").is_some() {
                return self.model(schema, node);
            }
            return self.java_type(schema);
        }

        if node.get("$ref").is_some() {
            return self.model(node, node);
        }

        JavaType::simple(JavaType::VOID)
    }

    fn collection(&self, node: &Value) -> JavaType {
        let unique = node
            .get("uniqueItems")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let mut java = JavaType::simple(if unique { "Set" } else { "List" });

        if let Some(items) = node.get("items").filter(|i| i.is_object()) {
            let item = self.java_type(items);
            java.name = format!("{}<{}>", java.name, item.name);
            java.imports.extend(item.imports);
        }
        java
    }

    fn scalar(&self, type_name: &str, format: Option<&str>) -> JavaType {
        let class = format
            .and_then(format_class)
            .or_else(|| primitive_class(type_name))
            .unwrap_or(type_name);
        JavaType::simple(class)
    }

    /// A model reference. Type arguments come from `typeArguments` on the
    /// referring node.
    fn model(&self, reference_node: &Value, owner: &Value) -> JavaType {
        let reference = reference_node
            .get("$ref")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let class = reference_name(reference).to_string();
        let mut imports = vec![format!("{}.{}", self.model_package, class)];

        let arguments: Vec<&str> = owner
            .get("typeArguments")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .collect();

        let name = if arguments.is_empty() {
            class
        } else {
            for argument in &arguments {
                if let Some(import) = standard_import(argument) {
                    imports.push(import.to_string());
                }
            }
            format!("{}<{}>", class, arguments.join(", "))
        };

        JavaType { name, imports }
    }
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
];

/// A lowerCamelCase Java identifier, prefixed with `_` when it would collide
/// with a keyword.
pub fn java_identifier(name: &str) -> String {
    use heck::ToLowerCamelCase;

    let ident = name.to_lower_camel_case();
    if JAVA_KEYWORDS.contains(&ident.as_str()) || ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mapper() -> TypeMapper {
        TypeMapper::new("com.example.model")
    }

    #[test]
    fn test_primitives() {
        let m = mapper();
        assert_eq!(m.java_type(&json!({"type": "string"})).name, "String");
        assert_eq!(m.java_type(&json!({"type": "boolean"})).name, "Boolean");
        assert_eq!(m.java_type(&json!({"type": "integer"})).name, "Integer");
        assert_eq!(
            m.java_type(&json!({"type": "integer", "format": "int64"})).name,
            "Long"
        );

        let decimal = m.java_type(&json!({"type": "number"}));
        assert_eq!(decimal.name, "BigDecimal");
        assert_eq!(decimal.imports, ["java.math.BigDecimal"]);
    }

    #[test]
    fn test_dates_and_files() {
        let m = mapper();
        let date = m.java_type(&json!({"type": "string", "format": "date-time"}));
        assert_eq!(date.name, "DateTime");
        assert_eq!(date.imports, ["org.joda.time.DateTime"]);

        let file = m.java_type(&json!({"type": "file"}));
        assert_eq!(file.name, "InputStream");
        assert_eq!(file.imports, ["java.io.InputStream"]);
    }

    #[test]
    fn test_collections() {
        let m = mapper();
        let list = m.java_type(&json!({"type": "array", "items": {"$ref": "#/definitions/Pet"}}));
        assert_eq!(list.name, "List<Pet>");
        assert_eq!(list.imports, ["java.util.List", "com.example.model.Pet"]);

        let set = m.java_type(&json!({
            "type": "array",
            "uniqueItems": true,
            "items": {"type": "string"}
        }));
        assert_eq!(set.name, "Set<String>");
        assert!(set.is_generic());
    }

    #[test]
    fn test_model_references() {
        let m = mapper();
        let body = m.java_type(&json!({"in": "body", "schema": {"$ref": "#/definitions/Order"}}));
        assert_eq!(body.name, "Order");
        assert_eq!(body.imports, ["com.example.model.Order"]);

        let legacy = m.java_type(&json!({"$ref": "Category"}));
        assert_eq!(legacy.name, "Category");

        let generic = m.java_type(&json!({
            "schema": {"$ref": "#/definitions/Page"},
            "typeArguments": ["Pet"]
        }));
        assert_eq!(generic.name, "Page<Pet>");
    }

    #[test]
    fn test_void() {
        assert!(mapper().java_type(&json!({})).is_void());
        assert!(mapper().java_type(&json!({"description": "No content"})).is_void());
    }

    #[test]
    fn test_java_identifier() {
        assert_eq!(java_identifier("pet_id"), "petId");
        assert_eq!(java_identifier("X-Trace-Id"), "xTraceId");
        assert_eq!(java_identifier("class"), "_class");
        assert_eq!(java_identifier("2fa"), "_2fa");
    }
}
