use indexmap::IndexMap;
use serde_json::Value;

/// Key under which the entry document can always be looked up.
pub const ROOT_KEY: &str = "root";

/// Every document fetched for one generation run, keyed by URL.
///
/// The entry document is stored under its own URL and is also reachable
/// through [`ROOT_KEY`]. Documents are never mutated once inserted.
#[derive(Debug, Clone)]
pub struct DocumentMap {
    entry_url: String,
    documents: IndexMap<String, Value>,
}

impl DocumentMap {
    pub fn new(entry_url: impl Into<String>, root: Value) -> Self {
        let entry_url = entry_url.into();
        let mut documents = IndexMap::new();
        documents.insert(entry_url.clone(), root);
        Self {
            entry_url,
            documents,
        }
    }

    pub fn entry_url(&self) -> &str {
        &self.entry_url
    }

    pub fn root(&self) -> &Value {
        &self.documents[&self.entry_url]
    }

    /// Look up a document by URL, or the entry document by [`ROOT_KEY`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key == ROOT_KEY {
            return Some(self.root());
        }
        self.documents.get(key)
    }

    pub fn contains(&self, url: &str) -> bool {
        url == ROOT_KEY || self.documents.contains_key(url)
    }

    /// Insert a fetched document. The first document stored for a URL wins.
    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.documents.entry(url.into()).or_insert(document);
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
