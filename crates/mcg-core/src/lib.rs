pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod fetch;
pub mod ir;
pub mod load;
pub mod parse;
pub mod sink;
pub mod templates;
pub mod transform;

pub use document::DocumentMap;
pub use error::{BuildError, GeneratorError, LoadError, NormalizeError};
pub use fetch::DocumentFetcher;
pub use load::DocumentLoader;
pub use transform::{Decoration, DecorationHooks, HookKind};

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// A renderer: decorates the model through hooks, then turns it into files.
pub trait CodeGenerator {
    /// Short name used on the command line and in logs.
    fn id(&self) -> &'static str;

    /// Decoration hooks applied while the model is built.
    fn hooks(&self) -> DecorationHooks {
        DecorationHooks::new()
    }

    /// Output entries `clean` must leave in place.
    fn preserve(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate(&self, model: &ir::ApiModel) -> Result<Vec<GeneratedFile>, GeneratorError>;
}

/// Load `entry_url` (converting legacy documents), then build the model with
/// `hooks` applied.
pub async fn normalize(
    fetcher: &dyn DocumentFetcher,
    entry_url: &str,
    hooks: &DecorationHooks,
) -> Result<ir::ApiModel, NormalizeError> {
    let documents = DocumentLoader::new(fetcher).load(entry_url).await?;
    log::info!("loaded {} document(s) from {entry_url}", documents.len());
    Ok(transform::build(&documents, hooks)?)
}
