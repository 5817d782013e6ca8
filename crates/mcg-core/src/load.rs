use std::collections::HashSet;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, info};
use serde_json::Value;

use crate::convert::{DialectConverter, default_converters};
use crate::document::DocumentMap;
use crate::error::LoadError;
use crate::fetch::DocumentFetcher;
use crate::parse::ref_resolve::{REF_KEY, is_remote, split_ref};
use crate::parse::{self, Dialect, detect_dialect};

/// Fetches an entry document, normalizes its dialect, and pulls in every
/// document it references by absolute URL.
pub struct DocumentLoader<'f> {
    fetcher: &'f dyn DocumentFetcher,
    converters: Vec<Box<dyn DialectConverter>>,
}

impl<'f> DocumentLoader<'f> {
    /// A loader with the default converters registered.
    pub fn new(fetcher: &'f dyn DocumentFetcher) -> Self {
        Self {
            fetcher,
            converters: default_converters(),
        }
    }

    /// A loader with no converters; only 2.0 documents load.
    pub fn without_converters(fetcher: &'f dyn DocumentFetcher) -> Self {
        Self {
            fetcher,
            converters: Vec::new(),
        }
    }

    /// Register a converter after the existing ones.
    pub fn with_converter(mut self, converter: Box<dyn DialectConverter>) -> Self {
        self.converters.push(converter);
        self
    }

    pub async fn load(&self, entry_url: &str) -> Result<DocumentMap, LoadError> {
        let entry = self.fetch_document(entry_url).await?;

        let root = match detect_dialect(&entry) {
            Dialect::Swagger20 => entry,
            Dialect::Other => {
                let converter = self
                    .converters
                    .iter()
                    .find(|c| c.applies(&entry))
                    .ok_or_else(|| LoadError::UnsupportedDialect {
                        url: entry_url.to_string(),
                    })?;

                info!("converting {} to Swagger 2.0", converter.source_version());
                converter
                    .convert(entry_url, &entry, self.fetcher)
                    .await
                    .map_err(|source| LoadError::Conversion {
                        url: entry_url.to_string(),
                        source,
                    })?
            }
        };

        self.load_references(entry_url, root).await
    }

    /// Fetch every document reachable from `root` through absolute-URL `$ref`s.
    ///
    /// Each URL is fetched once. Fetches run concurrently on the calling task
    /// and the set grows as fetched documents reveal further references. The
    /// first failure is returned and the remaining fetches are dropped.
    pub async fn load_references(
        &self,
        entry_url: &str,
        root: Value,
    ) -> Result<DocumentMap, LoadError> {
        let mut requested = HashSet::from([entry_url.to_string()]);
        let mut pending = FuturesUnordered::new();

        for href in remote_references(&root) {
            if requested.insert(href.clone()) {
                info!("importing {href}");
                pending.push(self.fetch_owned(href));
            }
        }

        let mut documents = DocumentMap::new(entry_url, root);

        while let Some(result) = pending.next().await {
            let (url, document) = result?;

            for href in remote_references(&document) {
                if requested.insert(href.clone()) {
                    info!("importing {href} (referenced from {url})");
                    pending.push(self.fetch_owned(href));
                }
            }

            debug!("loaded {url}");
            documents.insert(url, document);
        }

        Ok(documents)
    }

    async fn fetch_owned(&self, url: String) -> Result<(String, Value), LoadError> {
        let document = self.fetch_document(&url).await?;
        Ok((url, document))
    }

    async fn fetch_document(&self, url: &str) -> Result<Value, LoadError> {
        let fetched = self.fetcher.fetch(url).await?;
        parse::from_body(&fetched.body, fetched.content_type.as_deref()).map_err(|source| {
            LoadError::Parse {
                url: url.to_string(),
                source,
            }
        })
    }
}

/// Absolute document URLs named by `$ref`s anywhere in `document`, in
/// discovery order without duplicates.
pub fn remote_references(document: &Value) -> Vec<String> {
    let mut found = Vec::new();
    collect_remote(document, &mut found);
    found
}

fn collect_remote(node: &Value, found: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::String(reference) if key == REF_KEY && !reference.starts_with('#') => {
                        let (href, _) = split_ref(reference);
                        if is_remote(href) && !found.iter().any(|f| f == href) {
                            found.push(href.to_string());
                        }
                    }
                    _ => collect_remote(value, found),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_remote(item, found);
            }
        }
        _ => {}
    }
}
