//! Graphviz DOT serialization.

use std::fmt::Write;

use crate::graph::{Graph, NodeKind};

/// Serialize `graph` as a DOT digraph.
///
/// Node labels carry the step label and the hex value on separate lines.
/// The TXID node carries its explorer link as `URL` so SVG output is
/// clickable.
pub fn to_dot(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("digraph proof {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [shape=box, fontname=\"monospace\", fontsize=10];\n");

    for node in &graph.nodes {
        let label = format!("{}\n{}", node.label, node.value);
        // Writing to a String cannot fail.
        let _ = write!(out, "  \"{}\" [label=\"{}\"", escape(&node.id), escape(&label));
        match node.kind {
            NodeKind::Seed => out.push_str(", style=bold"),
            NodeKind::OpReturn | NodeKind::Txid => {
                out.push_str(", style=filled, fillcolor=\"#f5deb3\"")
            }
            NodeKind::Commitment | NodeKind::Anchor => {}
        }
        if let Some(link) = &node.link {
            let _ = write!(out, ", URL=\"{}\", target=\"_blank\"", escape(link));
        }
        out.push_str("];\n");
    }

    for edge in &graph.edges {
        let _ = writeln!(out, "  \"{}\" -> \"{}\";", escape(&edge.from), escape(&edge.to));
    }

    out.push_str("}\n");
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}
