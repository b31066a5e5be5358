use clap::Parser;
use std::path::PathBuf;

/// ast2dot CLI options.
#[derive(Debug, Parser)]
#[command(
    name = "ast2dot",
    version,
    about = "Convert a clang AST dump into a Graphviz DOT graph"
)]
pub struct Args {
    /// AST dump file to read.
    #[arg(value_name = "INPUT", required_unless_present = "list")]
    pub input: Option<PathBuf>,

    /// DOT file to write.
    #[arg(value_name = "OUTPUT", required_unless_present = "list")]
    pub output: Option<PathBuf>,

    /// Space-separated filter tokens (repeatable). See --list for names.
    #[arg(short = 'f', long = "format", value_name = "FILTERS")]
    pub format: Vec<String>,

    /// List the recognized filter names and exit.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Config file path. Defaults to an upward search for ast2dot.toml from
    /// the input file's directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
