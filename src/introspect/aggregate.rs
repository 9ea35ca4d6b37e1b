//! Response aggregation.

use std::sync::Arc;

use crate::entropy::IdGenerator;
use crate::http::request::RequestView;
use crate::introspect::document::Document;
use crate::introspect::facet::{extract, Facet};

/// Assembles response documents from a list of facets.
#[derive(Clone)]
pub struct Aggregator {
    ids: Arc<dyn IdGenerator>,
}

impl Aggregator {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Build a document whose keys are `facets` in order.
    ///
    /// A facet listed twice keeps its first position.
    pub fn aggregate(&self, view: &RequestView, facets: &[Facet]) -> Document {
        let mut doc = Document::new();
        for &facet in facets {
            if doc.get(facet.name()).is_some() {
                continue;
            }
            doc.insert(facet.name(), extract(view, facet, self.ids.as_ref()));
        }
        doc
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator").finish_non_exhaustive()
    }
}
