//! Core data types for feed items, extracted table content, and alert records.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// One entry from the alert feed, before any HTML is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    /// Opaque HTML fragment carried in the item's description.
    pub description_html: String,
    /// Publication timestamp exactly as the feed wrote it.
    pub published_raw: String,
}

/// A `<td>` cell found in the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Concatenated descendant text, trimmed.
    pub text: String,
    /// Id of the innermost enclosing table scope. Scope 0 is the fragment root.
    pub table: usize,
}

/// A header cell associated with the value cell that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelValuePair {
    pub label: String,
    pub value: String,
}

/// Everything the extractor recovered from one fragment, uninterpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Data cells in document order.
    pub cells: Vec<TableCell>,
    /// Label/value associations in document order.
    pub pairs: Vec<LabelValuePair>,
    /// `href` of the last anchor in the fragment.
    pub anchor: Option<String>,
    /// Table scopes that contained at least one header cell.
    pub headed_tables: BTreeSet<usize>,
}

impl Extraction {
    /// Data cells from tables without any header cell, in document order.
    pub fn positional_cells(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .filter(|c| !self.headed_tables.contains(&c.table))
            .map(|c| c.text.as_str())
    }

    /// Merge the pairs into a map; later labels overwrite earlier ones.
    pub fn label_map(&self) -> HashMap<&str, &str> {
        self.pairs
            .iter()
            .map(|p| (p.label.as_str(), p.value.as_str()))
            .collect()
    }

    /// Texts of all data cells, in document order.
    pub fn cell_texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.pairs.is_empty() && self.anchor.is_none()
    }
}

/// The eight attributes an alert's table can supply.
///
/// Declaration order is the positional order used for header-less tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Status,
    Event,
    Severity,
    StartTime,
    EndTime,
    Description,
    Area,
    GraphicLink,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::Status,
        CanonicalField::Event,
        CanonicalField::Severity,
        CanonicalField::StartTime,
        CanonicalField::EndTime,
        CanonicalField::Description,
        CanonicalField::Area,
        CanonicalField::GraphicLink,
    ];

    /// Field assigned to the cell at `index` in a header-less table.
    pub fn from_position(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Status => "status",
            CanonicalField::Event => "event",
            CanonicalField::Severity => "severity",
            CanonicalField::StartTime => "start_time",
            CanonicalField::EndTime => "end_time",
            CanonicalField::Description => "description",
            CanonicalField::Area => "area",
            CanonicalField::GraphicLink => "graphic_link",
        }
    }
}

/// Canonical, fully populated alert record.
///
/// Every field is always present; missing data is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub title: String,
    pub link: String,
    pub published_raw: String,
    pub status: String,
    pub event: String,
    pub severity: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub area: String,
    pub graphic_link: String,
}

impl AlertRecord {
    /// A record carrying only the item's pass-through fields.
    pub fn from_item(item: &RawItem) -> Self {
        Self {
            title: item.title.clone(),
            link: item.link.clone(),
            published_raw: item.published_raw.clone(),
            ..Self::default()
        }
    }

    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Status => &self.status,
            CanonicalField::Event => &self.event,
            CanonicalField::Severity => &self.severity,
            CanonicalField::StartTime => &self.start_time,
            CanonicalField::EndTime => &self.end_time,
            CanonicalField::Description => &self.description,
            CanonicalField::Area => &self.area,
            CanonicalField::GraphicLink => &self.graphic_link,
        }
    }

    pub fn field_mut(&mut self, field: CanonicalField) -> &mut String {
        match field {
            CanonicalField::Status => &mut self.status,
            CanonicalField::Event => &mut self.event,
            CanonicalField::Severity => &mut self.severity,
            CanonicalField::StartTime => &mut self.start_time,
            CanonicalField::EndTime => &mut self.end_time,
            CanonicalField::Description => &mut self.description,
            CanonicalField::Area => &mut self.area,
            CanonicalField::GraphicLink => &mut self.graphic_link,
        }
    }
}

/// Errors raised while extracting a fragment.
///
/// Only structurally unusable input is an error; missing cells are not.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Not markup: fragment contains no HTML elements")]
    NotMarkup,

    #[error("Tokenize error at byte {position}: {message}")]
    Tokenize { position: u64, message: String },
}

/// Convenience result type.
pub type ExtractResult<T> = Result<T, ExtractError>;
