use std::collections::{BTreeSet, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use tracing::debug;

use crate::data_models::SearchResult;

pub const VIS_NETWORK_SCRIPT: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultNode {
    pub title: String,
    pub url: String,
}

/// Edge weight: the lowercase words both titles have in common, sorted.
pub type SharedWords = Vec<String>;

#[derive(Debug, Clone)]
pub struct GraphStyle {
    pub width: String,
    pub height: String,
    pub bgcolor: String,
    pub font_color: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "500px".to_string(),
            bgcolor: "#222222".to_string(),
            font_color: "white".to_string(),
        }
    }
}

/// Undirected graph over one search's results; node `i` is result `i`.
#[derive(Debug, Clone)]
pub struct RelatednessGraph {
    inner: UnGraph<ResultNode, SharedWords>,
}

/// Lowercased, whitespace-split word set of a title. Punctuation stays attached.
pub fn title_words(title: &str) -> HashSet<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Builds the relatedness graph, or `None` when there are fewer than two results.
pub fn build_graph(results: &[SearchResult]) -> Option<RelatednessGraph> {
    if results.len() < 2 {
        return None;
    }

    let k = results.len();
    let mut inner: UnGraph<ResultNode, SharedWords> = UnGraph::with_capacity(k, k * (k - 1) / 2);
    let words: Vec<HashSet<String>> = results.iter().map(|r| title_words(&r.title)).collect();
    for r in results {
        inner.add_node(ResultNode {
            title: r.title.clone(),
            url: r.url.clone(),
        });
    }

    for i in 0..k {
        for j in (i + 1)..k {
            let shared: BTreeSet<&String> = words[i].intersection(&words[j]).collect();
            if !shared.is_empty() {
                inner.add_edge(
                    NodeIndex::new(i),
                    NodeIndex::new(j),
                    shared.into_iter().cloned().collect(),
                );
            }
        }
    }

    debug!(
        nodes = inner.node_count(),
        edges = inner.edge_count(),
        "built relatedness graph"
    );
    Some(RelatednessGraph { inner })
}

#[derive(Serialize)]
struct VisNode<'a> {
    id: usize,
    label: &'a str,
    title: &'a str,
}

#[derive(Serialize)]
struct VisEdge {
    from: usize,
    to: usize,
    title: String,
}

impl RelatednessGraph {
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn node(&self, index: usize) -> Option<&ResultNode> {
        self.inner.node_weight(NodeIndex::new(index))
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.inner
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    pub fn shared_words(&self, a: usize, b: usize) -> Option<&SharedWords> {
        self.inner
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .and_then(|e| self.inner.edge_weight(e))
    }

    /// Edges as `(lower, higher)` node index pairs, in insertion order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.inner
            .edge_indices()
            .filter_map(|e| self.inner.edge_endpoints(e))
            .map(|(a, b)| (a.index().min(b.index()), a.index().max(b.index())))
            .collect()
    }

    /// Serializes the graph into a standalone HTML document with a
    /// force-directed layout. Node and edge data are inlined, but the
    /// vis-network script is loaded from unpkg, so viewing the document
    /// needs network access.
    pub fn to_html(&self, style: &GraphStyle) -> String {
        let nodes: Vec<VisNode> = self
            .inner
            .node_indices()
            .map(|i| {
                let n = &self.inner[i];
                VisNode {
                    id: i.index(),
                    label: &n.title,
                    title: &n.url,
                }
            })
            .collect();
        let edges: Vec<VisEdge> = self
            .inner
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.inner.edge_endpoints(e)?;
                Some(VisEdge {
                    from: a.index(),
                    to: b.index(),
                    title: self.inner[e].join(", "),
                })
            })
            .collect();

        let nodes_json = script_safe_json(&nodes);
        let edges_json = script_safe_json(&edges);
        let bgcolor = html_escape::encode_double_quoted_attribute(&style.bgcolor);
        let width = html_escape::encode_double_quoted_attribute(&style.width);
        let height = html_escape::encode_double_quoted_attribute(&style.height);
        let font_color = script_safe_json(&style.font_color);

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="{VIS_NETWORK_SCRIPT}"></script>
<style>
html, body {{ margin: 0; background-color: {bgcolor}; }}
#graph {{ width: {width}; height: {height}; background-color: {bgcolor}; }}
</style>
</head>
<body>
<div id="graph"></div>
<script>
var nodes = new vis.DataSet({nodes_json});
var edges = new vis.DataSet({edges_json});
var options = {{
  nodes: {{ shape: "dot", size: 16, font: {{ color: {font_color} }} }},
  edges: {{ color: {{ inherit: true }}, smooth: false }},
  physics: {{ enabled: true, solver: "barnesHut" }}
}};
new vis.Network(document.getElementById("graph"), {{ nodes: nodes, edges: edges }}, options);
</script>
</body>
</html>
"#
        )
    }
}

// JSON placed inside <script> must not be able to close the tag.
fn script_safe_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}
