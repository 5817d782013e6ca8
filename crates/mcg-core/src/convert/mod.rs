pub mod markup;
pub mod swagger12;
pub mod swagger20;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConversionError;
use crate::fetch::DocumentFetcher;

pub use swagger12::Swagger12Converter;

/// Translates a legacy description dialect into a Swagger 2.0 document.
#[async_trait]
pub trait DialectConverter: Send + Sync {
    /// Human-readable name of the dialect this converter reads.
    fn source_version(&self) -> &'static str;

    /// Whether `document` is written in this converter's dialect.
    fn applies(&self, document: &Value) -> bool;

    /// Produce the 2.0 document. `url` is where `document` was fetched from;
    /// any further documents the dialect needs are fetched through `fetcher`.
    async fn convert(
        &self,
        url: &str,
        document: &Value,
        fetcher: &dyn DocumentFetcher,
    ) -> Result<Value, ConversionError>;
}

/// Converters available by default, in detection order.
pub fn default_converters() -> Vec<Box<dyn DialectConverter>> {
    vec![Box::new(Swagger12Converter)]
}
