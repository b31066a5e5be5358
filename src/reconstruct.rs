use petgraph::graph::NodeIndex;
use std::io;

use crate::ansi::strip_ansi;
use crate::error::VizResult;
use crate::filter::FilterSet;
use crate::graph::AstGraph;

/// Characters clang uses to draw the tree prefix of a dump line.
const FORMATTING_CHARS: &[char] = &[' ', '-', '|', '`'];

/// Rebuilds the tree encoded by a dump's indentation prefixes.
///
/// The dump carries no parent pointers; the parent of a depth-`d` line is the
/// most recently seen line at depth `d - 1`. The reconstructor keeps that
/// "most recent node per depth" record in an ancestor path that is truncated
/// and extended once per line, so the whole parse is a single O(n) pass with
/// no recursion.
pub struct TreeReconstructor<'f> {
    filters: &'f FilterSet,
}

impl<'f> TreeReconstructor<'f> {
    pub fn new(filters: &'f FilterSet) -> Self {
        Self { filters }
    }

    /// Consume a line stream and build the graph.
    ///
    /// The first line is the unconditioned root label: it carries no prefix
    /// and display filters are not applied to it. An empty stream yields an
    /// empty graph; a root-only stream yields a single node and no edges.
    pub fn reconstruct<I>(&self, lines: I) -> VizResult<AstGraph>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut graph = AstGraph::new();
        let mut iter = lines.into_iter();

        let Some(first) = iter.next() else {
            return Ok(graph);
        };
        let root_label = strip_ansi(&first?).into_owned();

        // Ancestor path: slot d holds the most recently created node at
        // depth d for the currently open path.
        let mut path: Vec<NodeIndex> = vec![graph.add_root(root_label)];

        let mut held: Option<(usize, String)> = None;
        loop {
            let (depth, raw_label) = match held.take() {
                Some(entry) => entry,
                None => match iter.next() {
                    Some(line) => split_prefix(&strip_ansi(&line?)),
                    None => break,
                },
            };

            if self.filters.prunes(&raw_label) {
                // Drop the line and its subtree without creating nodes. The
                // ancestor path must stay exactly as it was: the pruned
                // subtree never becomes anyone's parent.
                held = skip_subtree(&mut iter, depth)?;
                continue;
            }

            let depth = effective_depth(depth, path.len());
            path.truncate(depth);
            let parent = path[depth - 1];
            let node = graph.add_child(parent, self.filters.apply_display(&raw_label));
            path.push(node);
        }

        Ok(graph)
    }
}

/// Split a dump line into its computed depth and raw label.
///
/// Depth counts the leading run of formatting characters; every tree level
/// adds exactly two of them (`| `, `|-`, `` `-``), so depth = count / 2. The
/// remainder of the line, to end-of-line, is the raw label. A line with no
/// label text yields an empty label, which is accepted.
fn split_prefix(line: &str) -> (usize, String) {
    let start = line
        .find(|c| !FORMATTING_CHARS.contains(&c))
        .unwrap_or(line.len());
    (start / 2, line[start..].to_string())
}

/// Deterministic fallbacks for out-of-range depths: a non-root line computing
/// to depth 0 attaches to the root, and a depth skipping past the open path
/// clamps to the deepest open ancestor.
fn effective_depth(depth: usize, path_len: usize) -> usize {
    depth.clamp(1, path_len)
}

/// Discard lines strictly deeper than `depth`. Returns the first line at or
/// above it, which the caller processes normally.
fn skip_subtree<I>(iter: &mut I, depth: usize) -> VizResult<Option<(usize, String)>>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut dropped = 0usize;
    for line in iter {
        let entry = split_prefix(&strip_ansi(&line?));
        if entry.0 <= depth {
            crate::debug_event!(lines = dropped, "pruned implicit subtree");
            return Ok(Some(entry));
        }
        dropped += 1;
    }
    crate::debug_event!(lines = dropped, "pruned implicit subtree at end of input");
    Ok(None)
}
