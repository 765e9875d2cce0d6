//! Tree-sitter S-expression queries.

use streaming_iterator::StreamingIterator;

use crate::adapter::LanguageAdapter;
use crate::error::SyntaxError;
use crate::node::SyntaxNode;

/// Capture name that selects the reported node of a query match.
const NODE_CAPTURE: &str = "node";

/// A compiled Tree-sitter query.
///
/// Each match reports the node captured as `@node`. Queries without an
/// `@node` capture report the first capture of every match instead.
#[derive(Debug)]
pub struct Query {
    inner: tree_sitter::Query,
    source: String,
    node_capture: Option<u32>,
}

impl Query {
    /// Compiles a query against the adapter's grammar.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::InvalidQuery`] when the query does not
    /// compile.
    pub fn compile(source: &str, adapter: &dyn LanguageAdapter) -> Result<Self, SyntaxError> {
        let inner = tree_sitter::Query::new(&adapter.grammar(), source)
            .map_err(|err| SyntaxError::invalid_query(adapter.name(), err.to_string()))?;
        let node_capture = inner
            .capture_names()
            .iter()
            .position(|name| *name == NODE_CAPTURE)
            .and_then(|index| u32::try_from(index).ok());
        Ok(Self {
            inner,
            source: source.to_owned(),
            node_capture,
        })
    }

    /// Returns the query source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Runs the query below `root` (inclusive).
    ///
    /// Results are deduplicated and returned in document pre-order.
    #[must_use]
    pub fn find_all<'t>(&self, root: SyntaxNode<'t>) -> Vec<SyntaxNode<'t>> {
        let mut cursor = tree_sitter::QueryCursor::new();
        let mut matches = cursor.matches(&self.inner, root.raw(), root.source().as_bytes());
        let mut found: Vec<SyntaxNode<'t>> = Vec::new();

        while let Some(query_match) = matches.next() {
            let capture = match self.node_capture {
                Some(index) => query_match
                    .captures
                    .iter()
                    .find(|capture| capture.index == index),
                None => query_match.captures.first(),
            };
            if let Some(capture) = capture {
                let node = root.wrap(capture.node);
                if !found.contains(&node) {
                    found.push(node);
                }
            }
        }

        // Outer nodes precede the nodes they contain.
        found.sort_by(|left, right| {
            left.start_byte()
                .cmp(&right.start_byte())
                .then_with(|| right.end_byte().cmp(&left.end_byte()))
        });
        found
    }
}
