//! Convert clang AST dumps into Graphviz DOT graphs.
//!
//! The dump's indentation prefix is the only structure clang emits; the
//! crate rebuilds the tree from it ([`reconstruct`]), optionally rewrites
//! node labels and prunes compiler-synthesized subtrees ([`filter`]), and
//! serializes the result as a digraph ([`dot`]).

pub mod ansi;
pub mod cli;
pub mod config;
pub mod dot;
pub mod error;
pub mod filter;
pub mod graph;
pub mod reconstruct;
pub mod telemetry;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::VizResult;
use crate::filter::FilterSet;
use crate::graph::AstGraph;
use crate::reconstruct::TreeReconstructor;

/// Engine driving one dump-to-graph conversion.
pub struct Converter {
    filters: FilterSet,
}

impl Converter {
    pub fn new(filters: FilterSet) -> Self {
        Self { filters }
    }

    /// Reconstruct the tree from a buffered line stream.
    pub fn convert<R: BufRead>(&self, reader: R) -> VizResult<AstGraph> {
        TreeReconstructor::new(&self.filters).reconstruct(reader.lines())
    }

    /// Reconstruct the tree from an in-memory dump.
    pub fn convert_str(&self, input: &str) -> VizResult<AstGraph> {
        TreeReconstructor::new(&self.filters)
            .reconstruct(input.lines().map(|l| Ok(l.to_string())))
    }
}

/// Full file-level pipeline: validate filter tokens, read the dump, write the
/// DOT file.
///
/// Tokens are validated before either file is touched, so a configuration
/// error never creates or truncates the output file. The output is opened
/// with truncate-at-open semantics once configuration and input both
/// resolved.
pub fn run_conversion(input: &Path, output: &Path, tokens: &[String]) -> Result<()> {
    let filters = FilterSet::parse_args(tokens)?;
    crate::debug_event!(?filters, "filter configuration resolved");
    let converter = Converter::new(filters);

    let infile = File::open(input)
        .with_context(|| format!("failed to open input file: {}", input.display()))?;
    let graph = crate::instrument_block!("reconstruct", {
        converter.convert(BufReader::new(infile))
    })
    .with_context(|| format!("failed to read input file: {}", input.display()))?;
    crate::debug_event!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "tree reconstructed"
    );

    let outfile = File::create(output)
        .with_context(|| format!("failed to open output file: {}", output.display()))?;
    let mut writer = BufWriter::new(outfile);
    crate::instrument_block!("emit", { dot::write_dot(&mut writer, &graph) })
        .with_context(|| format!("failed to write output file: {}", output.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to write output file: {}", output.display()))?;

    Ok(())
}
