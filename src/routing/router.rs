//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store registered routes
//! - Look up the handler for a request path
//! - Return the matched route or an explicit miss
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) exact lookup via HashMap, then O(n) prefix scan
//! - Longest prefix wins, so `/anything/` beats `/` style catch-alls
//! - The table knows nothing about methods; handlers check those

use std::collections::HashMap;

use crate::routing::matcher::PathPattern;

/// A successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub pattern: &'a PathPattern,
    pub handler: &'a H,
}

/// Immutable path → handler table.
#[derive(Debug)]
pub struct RouteTable<H> {
    exact: HashMap<String, (PathPattern, H)>,
    /// Sorted by descending prefix length.
    prefixes: Vec<(PathPattern, H)>,
}

impl<H> RouteTable<H> {
    pub fn builder() -> RouteTableBuilder<H> {
        RouteTableBuilder { routes: Vec::new() }
    }

    /// Find the handler for `path`: exact routes first, then longest prefix.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_, H>> {
        if let Some((pattern, handler)) = self.exact.get(path) {
            return Some(RouteMatch { pattern, handler });
        }
        self.prefixes
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(pattern, handler)| RouteMatch { pattern, handler })
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects routes before freezing them into a [`RouteTable`].
pub struct RouteTableBuilder<H> {
    routes: Vec<(PathPattern, H)>,
}

impl<H> RouteTableBuilder<H> {
    pub fn exact(mut self, path: &str, handler: H) -> Self {
        self.routes.push((PathPattern::exact(path), handler));
        self
    }

    pub fn prefix(mut self, prefix: &str, handler: H) -> Self {
        self.routes.push((PathPattern::prefix(prefix), handler));
        self
    }

    /// Freeze the table. A pattern registered twice keeps the last handler.
    pub fn build(self) -> RouteTable<H> {
        let mut exact = HashMap::new();
        let mut prefixes: Vec<(PathPattern, H)> = Vec::new();

        for (pattern, handler) in self.routes {
            match &pattern {
                PathPattern::Exact(path) => {
                    exact.insert(path.clone(), (pattern, handler));
                }
                PathPattern::Prefix(_) => {
                    prefixes.retain(|(p, _)| *p != pattern);
                    prefixes.push((pattern, handler));
                }
            }
        }

        prefixes.sort_by(|(a, _), (b, _)| b.as_str().len().cmp(&a.as_str().len()));
        RouteTable { exact, prefixes }
    }
}
