use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A crawled (or discovered) page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNode {
    pub url: String,
    /// BFS layer the node was created in. The root is 0.
    pub depth: usize,
}

impl fmt::Display for PageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A hyperlink from one page to another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkEdge;

impl fmt::Display for LinkEdge {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

/// Append-only link graph plus the visited set that indexes it.
///
/// The visited map is the single source of truth for "does this URL have a
/// node". Nodes and edges are never removed.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    graph: DiGraph<PageNode, LinkEdge>,
    visited: HashMap<String, NodeIndex>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node for `url` if none exists yet.
    ///
    /// Returns `Some(index)` only when the node is new; this is the sole
    /// acceptance signal for a discovered link.
    pub fn add_node(&mut self, url: &str, depth: usize) -> Option<NodeIndex> {
        if self.visited.contains_key(url) {
            return None;
        }
        let idx = self.graph.add_node(PageNode {
            url: url.to_string(),
            depth,
        });
        self.visited.insert(url.to_string(), idx);
        Some(idx)
    }

    /// Add a directed edge between two existing nodes.
    ///
    /// Missing endpoints and repeated `(src, dst)` pairs are silently
    /// ignored; the return value says whether an edge was created.
    pub fn add_edge(&mut self, src: &str, dst: &str) -> bool {
        let (Some(&from), Some(&to)) = (self.visited.get(src), self.visited.get(dst)) else {
            return false;
        };
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, LinkEdge);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.visited.contains_key(url)
    }

    pub fn node_index(&self, url: &str) -> Option<NodeIndex> {
        self.visited.get(url).copied()
    }

    pub fn depth_of(&self, url: &str) -> Option<usize> {
        self.node_index(url).map(|idx| self.graph[idx].depth)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &PageNode> {
        self.graph.node_weights()
    }

    /// Edges as `(source, target)` URLs, in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_indices().filter_map(|e| {
            let (from, to) = self.graph.edge_endpoints(e)?;
            Some((self.graph[from].url.as_str(), self.graph[to].url.as_str()))
        })
    }

    /// Outgoing links of `url`, in the order they were added.
    pub fn children(&self, url: &str) -> Vec<&str> {
        self.edges()
            .filter(|(src, _)| *src == url)
            .map(|(_, dst)| dst)
            .collect()
    }

    pub fn inner(&self) -> &DiGraph<PageNode, LinkEdge> {
        &self.graph
    }
}
