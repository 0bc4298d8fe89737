//! # Graph Projection
//!
//! Node layout for a full trace:
//!
//! ```text
//! seed → c0 → c1 → … → cN → a0 → a1 → … → aM
//!                              │         │
//!                         a[k-3]→OP_RETURN  a[k]→TXID
//! ```
//!
//! Node identifiers are stable (`seed`, `c<i>`, `a<i>`, `op_return`,
//! `txid`) so the same trace always projects to the same graph.

use serde::Serialize;

use cpv_replay::{ExplorerTemplate, FullTrace, ReplayTrace, OP_RETURN_OFFSET};

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The proof's initial hash.
    Seed,
    /// An entry of the commitment trace.
    Commitment,
    /// An entry of the anchor trace.
    Anchor,
    /// The derived OP_RETURN value.
    OpReturn,
    /// The derived transaction identifier.
    Txid,
}

/// One labeled hash-state node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    /// Hex of the value at this node.
    pub value: String,
    /// External link, set only on the TXID node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// Ordered nodes and edges handed to a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn add_node(&mut self, node: Node) -> String {
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
}

/// Builds a [`Graph`] from a [`FullTrace`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphProjector<'a> {
    explorer: Option<&'a ExplorerTemplate>,
}

impl<'a> GraphProjector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach explorer links to the TXID node.
    pub fn with_explorer(mut self, explorer: &'a ExplorerTemplate) -> Self {
        self.explorer = Some(explorer);
        self
    }

    pub fn project(&self, full: &FullTrace) -> Graph {
        let mut graph = Graph::default();

        let mut previous = graph.add_node(Node {
            id: "seed".to_string(),
            kind: NodeKind::Seed,
            label: "Hash".to_string(),
            value: full.seed.hex().to_string(),
            link: None,
        });

        push_chain(&mut graph, &mut previous, &full.commitment, "c", NodeKind::Commitment);
        let anchor_ids = push_chain(&mut graph, &mut previous, &full.anchor, "a", NodeKind::Anchor);

        let k = full.anchor_index;
        if let Some(op_return) = &full.anchor_info.op_return {
            let id = graph.add_node(Node {
                id: "op_return".to_string(),
                kind: NodeKind::OpReturn,
                label: "OP_RETURN".to_string(),
                value: op_return.clone(),
                link: None,
            });
            if let Some(src) = k.checked_sub(OP_RETURN_OFFSET).and_then(|i| anchor_ids.get(i)) {
                graph.add_edge(src, &id);
            }
        }

        let txid = &full.anchor_info.txid;
        let id = graph.add_node(Node {
            id: "txid".to_string(),
            kind: NodeKind::Txid,
            label: "TXID".to_string(),
            value: txid.clone(),
            link: self.explorer.map(|e| e.link(txid)),
        });
        if let Some(src) = anchor_ids.get(k) {
            graph.add_edge(src, &id);
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "projected trace graph"
        );
        graph
    }
}

fn push_chain(
    graph: &mut Graph,
    previous: &mut String,
    trace: &ReplayTrace,
    prefix: &str,
    kind: NodeKind,
) -> Vec<String> {
    let mut ids = Vec::with_capacity(trace.len());
    for (i, entry) in trace.iter().enumerate() {
        let id = graph.add_node(Node {
            id: format!("{prefix}{i}"),
            kind,
            label: entry.label.to_string(),
            value: entry.value.hex().to_string(),
            link: None,
        });
        graph.add_edge(previous, &id);
        *previous = id.clone();
        ids.push(id);
    }
    ids
}
