use crate::QueryEngine;
use std::sync::Arc;

/// Options used when constructing a [`Document`](crate::Document)
#[derive(Default)]
pub struct DocumentConfig {
    /// Selector engine backing `query_selector`. Matches nothing when unset.
    pub query_engine: Option<Arc<dyn QueryEngine>>,
}
