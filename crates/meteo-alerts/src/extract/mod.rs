//! HTML table extraction from alert description fragments.
//!
//! Two traversals are available: a streaming token walk over `quick_xml`
//! and a full-tree walk over a `scraper` DOM. Both lower the markup to the
//! same stream of [`CellEvent`]s and feed it through one [`Collector`], so
//! cell order, label association and anchor selection are shared logic.

pub mod tokens;
pub mod tree;

use std::fmt;
use std::str::FromStr;

use crate::types::{ExtractResult, Extraction, LabelValuePair, TableCell};

pub use tokens::extract_tokens;
pub use tree::extract_tree;

/// Which traversal to run over the fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Single-pass walk over a lenient token stream.
    TokenWalk,
    /// Parse into a DOM, then walk it in document order.
    #[default]
    TreeWalk,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tokens" | "token" | "stream" => Ok(Strategy::TokenWalk),
            "tree" | "dom" => Ok(Strategy::TreeWalk),
            other => Err(format!(
                "unknown extraction strategy '{other}' (expected 'tree' or 'tokens')"
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::TokenWalk => f.write_str("tokens"),
            Strategy::TreeWalk => f.write_str("tree"),
        }
    }
}

/// Extract cells, label/value pairs and the graphic anchor from `html`.
///
/// Empty input is a valid, empty extraction. Input with no markup at all
/// is [`ExtractError::NotMarkup`](crate::ExtractError::NotMarkup).
pub fn extract(html: &str, strategy: Strategy) -> ExtractResult<Extraction> {
    match strategy {
        Strategy::TokenWalk => extract_tokens(html),
        Strategy::TreeWalk => extract_tree(html),
    }
}

/// Structural events produced by either traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CellEvent {
    TableStart,
    TableEnd,
    /// A `<th>` closed; `text` is its trimmed descendant text.
    Header { text: String },
    /// A `<td>` closed. `direct_text` only covers the cell's own text nodes
    /// and decides whether the cell can be a label's value.
    Data { text: String, direct_text: String },
    Anchor { href: String },
}

/// Label association state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LabelState {
    AwaitingLabel,
    AwaitingValue { label: String },
}

/// Accumulates [`CellEvent`]s into an [`Extraction`].
///
/// All traversal state lives here, so each extraction is independent.
#[derive(Debug)]
pub(crate) struct Collector {
    out: Extraction,
    state: LabelState,
    scopes: Vec<usize>,
    next_table: usize,
}

impl Collector {
    pub(crate) fn new() -> Self {
        Self {
            out: Extraction::default(),
            state: LabelState::AwaitingLabel,
            // Scope 0 holds cells found outside any <table>.
            scopes: vec![0],
            next_table: 1,
        }
    }

    fn current_scope(&self) -> usize {
        self.scopes.last().copied().unwrap_or(0)
    }

    pub(crate) fn push(&mut self, event: CellEvent) {
        match event {
            CellEvent::TableStart => {
                self.scopes.push(self.next_table);
                self.next_table += 1;
                self.state = LabelState::AwaitingLabel;
            }
            CellEvent::TableEnd => {
                if self.scopes.len() > 1 {
                    self.scopes.pop();
                }
                self.state = LabelState::AwaitingLabel;
            }
            CellEvent::Header { text } => {
                self.out.headed_tables.insert(self.current_scope());
                self.state = LabelState::AwaitingValue { label: text };
            }
            CellEvent::Data { text, direct_text } => {
                // A cell made only of nested markup (e.g. a lone anchor) is
                // not a value for the pending label.
                if let LabelState::AwaitingValue { label } = &self.state {
                    if !direct_text.is_empty() {
                        self.out.pairs.push(LabelValuePair {
                            label: label.clone(),
                            value: text.clone(),
                        });
                    }
                }
                let table = self.current_scope();
                self.out.cells.push(TableCell { text, table });
            }
            CellEvent::Anchor { href } => {
                self.out.anchor = Some(href);
            }
        }
    }

    pub(crate) fn finish(self) -> Extraction {
        self.out
    }
}
