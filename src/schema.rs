//! Index field schema and lifecycle.
//!
//! The schema is authoritative: it is applied in full whenever the index is
//! (re)created, so no partial-schema state is ever queryable.

use serde_json::{Value, json};
use tracing::info;

use crate::error::StoreResult;
use crate::store::SearchStore;

/// Field kinds understood by the backend mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Exact-match, aggregatable.
    Keyword,
    /// Numeric ordinal.
    Integer,
    /// Full-text analyzed.
    Text,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }
}

/// Declaration of field name → kind, rendered as the backend mappings body.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    fields: Vec<(&'static str, FieldKind)>,
}

impl IndexSchema {
    /// The paragraph-document schema: exact-match title/author, integer
    /// location, analyzed text body.
    pub fn paragraphs() -> Self {
        Self {
            fields: vec![
                ("title", FieldKind::Keyword),
                ("author", FieldKind::Keyword),
                ("location", FieldKind::Integer),
                ("text", FieldKind::Text),
            ],
        }
    }

    /// Render the mappings body sent at index creation.
    pub fn mappings_body(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for (name, kind) in &self.fields {
            properties.insert((*name).to_string(), json!({ "type": kind.as_str() }));
        }
        json!({ "mappings": { "properties": Value::Object(properties) } })
    }
}

/// Owns create/destroy of the destination index.
pub struct SchemaManager<'a> {
    store: &'a dyn SearchStore,
}

impl<'a> SchemaManager<'a> {
    pub fn new(store: &'a dyn SearchStore) -> Self {
        Self { store }
    }

    /// Destructive reset: delete the index if present, then create it fresh
    /// with `schema`. Idempotent across runs (same end state regardless of
    /// prior state) but not safe to run while other readers or writers use
    /// the index — deletion is visible immediately.
    pub fn reset_index(&self, index: &str, schema: &IndexSchema) -> StoreResult<()> {
        if self.store.index_exists(index)? {
            info!("index \"{index}\" already exists, deleting");
            self.store.delete_index(index)?;
        }
        self.store.create_index(index, &schema.mappings_body())?;
        info!("created index \"{index}\"");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mappings_body_declares_all_four_fields() {
        let body = IndexSchema::paragraphs().mappings_body();
        let props = &body["mappings"]["properties"];
        assert_eq!(props["title"]["type"], "keyword");
        assert_eq!(props["author"]["type"], "keyword");
        assert_eq!(props["location"]["type"], "integer");
        assert_eq!(props["text"]["type"], "text");
        assert_eq!(props.as_object().unwrap().len(), 4);
    }
}
