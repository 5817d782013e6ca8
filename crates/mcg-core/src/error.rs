use thiserror::Error;

use crate::transform::decorate::HookKind;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a document could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The server answered with a non-success status.
    Status(u16),
    /// Connection, TLS, or I/O failure before a response was read.
    Transport(String),
}

#[derive(Debug, Clone, Error)]
#[error("failed to fetch {url}: {}", describe_fetch(.kind))]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            kind: FetchErrorKind::Status(status),
        }
    }

    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: FetchErrorKind::Transport(reason.into()),
        }
    }
}

fn describe_fetch(kind: &FetchErrorKind) -> String {
    match kind {
        FetchErrorKind::Status(code) => format!("error {code}"),
        FetchErrorKind::Transport(reason) => format!("connection refused: {reason}"),
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to retrieve API declaration: {0}")]
    Declaration(#[from] FetchError),

    #[error("failed to parse API declaration {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("malformed API declaration {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "parameter '{parameter}' of operation '{operation}' in {resource} has neither a primitive type nor a model name"
    )]
    MissingType {
        resource: String,
        operation: String,
        parameter: String,
    },

    #[error("array type in {context} declares no items")]
    MissingItems { context: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("could not find suitable convertor for {url}")]
    UnsupportedDialect { url: String },

    #[error("conversion of {url} failed: {source}")]
    Conversion {
        url: String,
        #[source]
        source: ConversionError,
    },
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("entry document has no root")]
    MissingRoot,

    #[error("malformed {context}: {source}")]
    Malformed {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} decoration of '{target}' produced an invalid value: {source}")]
    Decoration {
        kind: HookKind,
        target: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("generator failed: {0}")]
    Other(String),
}

/// Failure anywhere between fetching the entry document and the built model.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Build(#[from] BuildError),
}
