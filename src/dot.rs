use std::borrow::Cow;
use std::io::{self, Write};

use crate::graph::AstGraph;

/// Serialize the graph in Graphviz DOT form.
///
/// One vertex statement per node (`<id> [label="..."];`) in creation order,
/// then one edge statement per parent -> child pair. Ids are the dense
/// creation-order indices, root = 0. An empty graph emits a valid empty
/// digraph declaration.
pub fn write_dot<W: Write>(out: &mut W, graph: &AstGraph) -> io::Result<()> {
    writeln!(out, "digraph ast {{")?;
    for (id, label) in graph.nodes() {
        writeln!(out, "  {} [label=\"{}\"];", id, escape_label(label))?;
    }
    for (parent, child) in graph.edges() {
        writeln!(out, "  {parent} -> {child};")?;
    }
    writeln!(out, "}}")
}

/// Render the graph to an in-memory DOT string.
pub fn dot_string(graph: &AstGraph) -> String {
    let mut buf = Vec::new();
    write_dot(&mut buf, graph).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("DOT output is UTF-8")
}

/// The label attribute is double-quoted; a quote inside the label would end
/// the attribute early, so it is substituted with a visually similar single
/// quote.
fn escape_label(label: &str) -> Cow<'_, str> {
    if label.contains('"') {
        Cow::Owned(label.replace('"', "'"))
    } else {
        Cow::Borrowed(label)
    }
}
