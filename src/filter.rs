use crate::error::{Ast2DotError, VizResult};
use std::collections::BTreeSet;

/// Marker clang prints when a node carries no usable source range.
const INVALID_SLOC_MARKER: &str = "<<invalid sloc>>";

/// Marker clang prints on nodes that contain parse errors.
const CONTAINS_ERRORS_MARKER: &str = "contains-errors";

/// Standalone word marking compiler-synthesized declarations. Whole-token
/// match only, so node kinds such as `ImplicitCastExpr` never match.
const IMPLICIT_MARKER: &str = "implicit";

const NODE_ID_PREFIX: &str = "0x";

const TYPEDEF_DECL_KIND: &str = "TypedefDecl";
const TYPEDEF_KEYWORD: &str = "typedef";

/// Label-rewriting filters. Applied to a surviving line's raw label before
/// the node is created; they never change tree shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayFilter {
    /// Remove `0x...` address tokens.
    StripNodeId,
    /// Remove the `<<invalid sloc>>` marker.
    StripLocation,
    /// Remove the `contains-errors` marker.
    StripErrorFlag,
    /// Rewrite the `TypedefDecl` kind token to `typedef`. Superseded; kept
    /// for backward format compatibility.
    RenameTypedefKeyword,
}

/// Tree-shape filters. Checked against the raw, pre-rewrite label; a match
/// drops the line and its entire subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StructuralFilter {
    /// Skip compiler-synthesized (`implicit`) nodes and their subtrees.
    OmitImplicit,
}

/// Static metadata describing a recognized filter token.
#[derive(Debug)]
pub struct FilterDescriptor {
    pub token: &'static str,
    pub description: &'static str,
    pub deprecated: bool,
}

/// The closed set of recognized filter tokens. Anything else is a
/// configuration error.
pub const FILTERS: &[FilterDescriptor] = &[
    FilterDescriptor {
        token: "no-node-id",
        description: "Strip 0x... node addresses from labels",
        deprecated: false,
    },
    FilterDescriptor {
        token: "no-loc",
        description: "Strip the <<invalid sloc>> marker from labels",
        deprecated: false,
    },
    FilterDescriptor {
        token: "no-errors",
        description: "Strip the contains-errors marker from labels",
        deprecated: false,
    },
    FilterDescriptor {
        token: "no-implicit",
        description: "Omit compiler-synthesized nodes and their subtrees",
        deprecated: false,
    },
    FilterDescriptor {
        token: "fancy",
        description: "Preset: no-node-id no-errors no-loc no-implicit",
        deprecated: false,
    },
    FilterDescriptor {
        token: "typedef",
        description: "Rewrite TypedefDecl to the typedef keyword",
        deprecated: true,
    },
];

/// Constituents of the `fancy` preset.
const FANCY_PRESET: &[&str] = &["no-node-id", "no-errors", "no-loc", "no-implicit"];

/// Immutable filter configuration for one conversion run.
///
/// Display and structural filters are kept as two separate sets and combined
/// here at configuration-build time; enabling a token twice (directly or via
/// the `fancy` preset) is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    display: BTreeSet<DisplayFilter>,
    structural: BTreeSet<StructuralFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_display(mut self, filter: DisplayFilter) -> Self {
        self.display.insert(filter);
        self
    }

    #[must_use]
    pub fn with_structural(mut self, filter: StructuralFilter) -> Self {
        self.structural.insert(filter);
        self
    }

    /// Build a set from individual filter tokens.
    ///
    /// Fails on the first unrecognized token, before any parsing begins; a
    /// partially built set is never observable.
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> VizResult<Self> {
        let mut set = Self::new();
        for token in tokens {
            set.enable(token)?;
        }
        Ok(set)
    }

    /// Build a set from `--format` style values, each holding zero or more
    /// space-separated tokens.
    pub fn parse_args(values: &[String]) -> VizResult<Self> {
        Self::from_tokens(values.iter().flat_map(|v| v.split_whitespace()))
    }

    fn enable(&mut self, token: &str) -> VizResult<()> {
        match token {
            "no-node-id" => {
                self.display.insert(DisplayFilter::StripNodeId);
            }
            "no-loc" => {
                self.display.insert(DisplayFilter::StripLocation);
            }
            "no-errors" => {
                self.display.insert(DisplayFilter::StripErrorFlag);
            }
            "no-implicit" => {
                self.structural.insert(StructuralFilter::OmitImplicit);
            }
            "typedef" => {
                self.display.insert(DisplayFilter::RenameTypedefKeyword);
            }
            "fancy" => {
                for constituent in FANCY_PRESET {
                    self.enable(constituent)?;
                }
            }
            other => return Err(Ast2DotError::UnknownFilter(other.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty() && self.structural.is_empty()
    }

    /// Run every enabled display filter over a raw label.
    ///
    /// The filters rewrite disjoint literal markers, so the application order
    /// cannot change the result; each one is idempotent because it removes
    /// every matching occurrence in a single pass.
    pub fn apply_display(&self, raw: &str) -> String {
        let mut label = raw.to_string();
        for filter in &self.display {
            label = match filter {
                DisplayFilter::StripNodeId => strip_node_id(&label),
                DisplayFilter::StripLocation => remove_marker(&label, INVALID_SLOC_MARKER),
                DisplayFilter::StripErrorFlag => remove_marker(&label, CONTAINS_ERRORS_MARKER),
                DisplayFilter::RenameTypedefKeyword => {
                    label.replace(TYPEDEF_DECL_KIND, TYPEDEF_KEYWORD)
                }
            };
        }
        label
    }

    /// Whether a line with this raw label starts a subtree to be dropped.
    pub fn prunes(&self, raw_label: &str) -> bool {
        self.structural.contains(&StructuralFilter::OmitImplicit)
            && raw_label
                .split_whitespace()
                .any(|token| token == IMPLICIT_MARKER)
    }
}

/// Remove every whitespace-delimited `0x...` token, with one adjacent space.
fn strip_node_id(label: &str) -> String {
    let mut out = label.to_string();
    while let Some(start) = find_node_id(&out) {
        let end = out[start..]
            .find(char::is_whitespace)
            .map(|offset| start + offset)
            .unwrap_or(out.len());
        remove_range_with_adjacent_space(&mut out, start, end);
    }
    out
}

/// Byte offset of the next address token: a `0x` at a token boundary that is
/// followed by at least one hex digit.
fn find_node_id(label: &str) -> Option<usize> {
    let bytes = label.as_bytes();
    let mut search = 0;
    while let Some(offset) = label[search..].find(NODE_ID_PREFIX) {
        let start = search + offset;
        let at_token_start = start == 0 || bytes[start - 1].is_ascii_whitespace();
        let has_digits = label[start + NODE_ID_PREFIX.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_hexdigit());
        if at_token_start && has_digits {
            return Some(start);
        }
        search = start + NODE_ID_PREFIX.len();
    }
    None
}

/// Remove every verbatim occurrence of `marker`, with one adjacent space.
fn remove_marker(label: &str, marker: &str) -> String {
    let mut out = label.to_string();
    while let Some(start) = out.find(marker) {
        remove_range_with_adjacent_space(&mut out, start, start + marker.len());
    }
    out
}

/// Delete `start..end` plus one adjacent space: the following space when
/// present, otherwise the preceding one. Keeps interior spacing single after
/// a mid-label removal and avoids dangling edge spaces.
fn remove_range_with_adjacent_space(text: &mut String, start: usize, end: usize) {
    let mut start = start;
    let mut end = end;
    if text[end..].starts_with(' ') {
        end += 1;
    } else if text[..start].ends_with(' ') {
        start -= 1;
    }
    text.replace_range(start..end, "");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_list_builds_empty_set() {
        let set = FilterSet::from_tokens([]).expect("empty set");
        assert!(set.is_empty());
    }

    #[test]
    fn unknown_token_is_a_configuration_error() {
        let err = FilterSet::from_tokens(["no-such-filter"]).unwrap_err();
        assert!(matches!(err, Ast2DotError::UnknownFilter(t) if t == "no-such-filter"));
    }

    #[test]
    fn format_values_split_on_whitespace() {
        let set = FilterSet::parse_args(&["no-node-id no-loc".to_string()]).expect("parse");
        assert_eq!(
            set,
            FilterSet::from_tokens(["no-node-id", "no-loc"]).expect("tokens")
        );
    }

    #[test]
    fn fancy_preset_equals_its_constituents() {
        let preset = FilterSet::from_tokens(["fancy"]).expect("preset");
        let explicit = FilterSet::from_tokens(["no-node-id", "no-errors", "no-loc", "no-implicit"])
            .expect("explicit");
        assert_eq!(preset, explicit);
    }

    #[test]
    fn preset_is_idempotent_with_explicit_subset() {
        let doubled = FilterSet::from_tokens(["fancy", "no-node-id", "no-implicit", "fancy"])
            .expect("doubled");
        let preset = FilterSet::from_tokens(["fancy"]).expect("preset");
        assert_eq!(doubled, preset);
    }

    #[test]
    fn strip_node_id_removes_address_tokens() {
        let set = FilterSet::new().with_display(DisplayFilter::StripNodeId);
        assert_eq!(
            set.apply_display("VarDecl 0x55f1a8c09688 x 'int'"),
            "VarDecl x 'int'"
        );
    }

    #[test]
    fn strip_node_id_removes_every_address() {
        let set = FilterSet::new().with_display(DisplayFilter::StripNodeId);
        assert_eq!(
            set.apply_display("FunctionDecl 0x1a prev 0x2b main 'int ()'"),
            "FunctionDecl prev main 'int ()'"
        );
    }

    #[test]
    fn strip_node_id_ignores_labels_without_marker() {
        let set = FilterSet::new().with_display(DisplayFilter::StripNodeId);
        assert_eq!(set.apply_display("CompoundStmt"), "CompoundStmt");
    }

    #[test]
    fn strip_node_id_requires_hex_digits() {
        let set = FilterSet::new().with_display(DisplayFilter::StripNodeId);
        assert_eq!(set.apply_display("VarDecl 0xzz x"), "VarDecl 0xzz x");
    }

    #[test]
    fn strip_location_removes_invalid_sloc_marker() {
        let set = FilterSet::new().with_display(DisplayFilter::StripLocation);
        assert_eq!(
            set.apply_display("TypedefDecl <<invalid sloc>> __int128_t"),
            "TypedefDecl __int128_t"
        );
    }

    #[test]
    fn strip_error_flag_removes_contains_errors_marker() {
        let set = FilterSet::new().with_display(DisplayFilter::StripErrorFlag);
        assert_eq!(
            set.apply_display("RecoveryExpr contains-errors 'int'"),
            "RecoveryExpr 'int'"
        );
    }

    #[test]
    fn trailing_marker_leaves_no_dangling_space() {
        let set = FilterSet::new().with_display(DisplayFilter::StripNodeId);
        assert_eq!(set.apply_display("CompoundStmt 0x1f"), "CompoundStmt");
    }

    #[test]
    fn typedef_rename_rewrites_decl_kind() {
        let set = FilterSet::new().with_display(DisplayFilter::RenameTypedefKeyword);
        assert_eq!(
            set.apply_display("TypedefDecl 0x1 __int128_t"),
            "typedef 0x1 __int128_t"
        );
    }

    #[test]
    fn display_filters_are_idempotent() {
        let set = FilterSet::from_tokens(["no-node-id", "no-loc", "no-errors", "typedef"])
            .expect("tokens");
        let raw = "TypedefDecl 0x9 <<invalid sloc>> contains-errors __int128_t";
        let once = set.apply_display(raw);
        assert_eq!(set.apply_display(&once), once);
    }

    #[test]
    fn filters_do_not_touch_unrelated_labels() {
        let set = FilterSet::from_tokens(["no-node-id", "no-loc", "no-errors"]).expect("tokens");
        let label = "ReturnStmt <col:10> 'int'";
        assert_eq!(set.apply_display(label), label);
    }

    #[test]
    fn combined_filters_normalize_interior_spaces() {
        let set = FilterSet::from_tokens(["no-node-id", "no-loc"]).expect("tokens");
        assert_eq!(
            set.apply_display("VarDecl 0x2 <<invalid sloc>> x 'int'"),
            "VarDecl x 'int'"
        );
    }

    #[test]
    fn prunes_matches_standalone_implicit_word() {
        let set = FilterSet::from_tokens(["no-implicit"]).expect("tokens");
        assert!(set.prunes("TypedefDecl 0x1 implicit __int128_t"));
        assert!(!set.prunes("ImplicitCastExpr 0x1 'int' <LValueToRValue>"));
    }

    #[test]
    fn prunes_is_inert_without_structural_filters() {
        let set = FilterSet::from_tokens(["no-node-id"]).expect("tokens");
        assert!(!set.prunes("TypedefDecl 0x1 implicit __int128_t"));
    }

    #[test]
    fn descriptor_table_covers_every_token_once() {
        let mut tokens: Vec<_> = FILTERS.iter().map(|d| d.token).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), FILTERS.len());
        for descriptor in FILTERS {
            assert!(FilterSet::from_tokens([descriptor.token]).is_ok());
        }
    }
}
