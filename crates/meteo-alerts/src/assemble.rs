//! Map extracted table content onto the canonical [`AlertRecord`].
//!
//! Precedence, highest first:
//! 1. the fragment's anchor, for `graphic_link`;
//! 2. recognized label/value pairs with a non-empty value;
//! 3. positional cells from header-less tables, filling only empty fields.

use rayon::prelude::*;
use tracing::debug;

use crate::extract::{extract, Strategy};
use crate::labels::canonical_field;
use crate::types::{AlertRecord, CanonicalField, ExtractError, Extraction, RawItem};

/// Result of assembling one feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Always fully populated, even when extraction failed.
    pub record: AlertRecord,
    /// Set when the description could not be parsed at all.
    pub error: Option<ExtractError>,
}

impl Assembly {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Build a record from an item's pass-through fields and an extraction.
pub fn assemble(item: &RawItem, extraction: &Extraction) -> AlertRecord {
    let mut record = AlertRecord::from_item(item);

    // Document order, so a later pair overwrites an earlier one for the
    // same field, including pairs spelled with different synonyms.
    for pair in &extraction.pairs {
        let value = pair.value.trim();
        if value.is_empty() {
            continue;
        }
        match canonical_field(&pair.label) {
            Some(field) => *record.field_mut(field) = value.to_string(),
            None => debug!(label = %pair.label, "ignoring unrecognized label"),
        }
    }

    for (index, text) in extraction.positional_cells().enumerate() {
        let Some(field) = CanonicalField::from_position(index) else {
            break;
        };
        let slot = record.field_mut(field);
        if slot.is_empty() {
            *slot = text.trim().to_string();
        }
    }

    if let Some(href) = extraction.anchor.as_deref().map(str::trim) {
        if !href.is_empty() {
            record.graphic_link = href.to_string();
        }
    }

    record
}

/// Extract and assemble a single item.
///
/// Extraction failures are reported alongside a record that carries only
/// the pass-through fields.
pub fn assemble_item(item: &RawItem, strategy: Strategy) -> Assembly {
    match extract(&item.description_html, strategy) {
        Ok(extraction) => {
            debug!(
                title = %item.title,
                cells = extraction.cells.len(),
                pairs = extraction.pairs.len(),
                has_anchor = extraction.anchor.is_some(),
                "extracted alert table"
            );
            Assembly {
                record: assemble(item, &extraction),
                error: None,
            }
        }
        Err(e) => Assembly {
            record: AlertRecord::from_item(item),
            error: Some(e),
        },
    }
}

/// Assemble a batch of items in parallel, preserving input order.
pub fn assemble_all(items: &[RawItem], strategy: Strategy) -> Vec<Assembly> {
    items
        .par_iter()
        .map(|item| assemble_item(item, strategy))
        .collect()
}
