//! Meteo Alerts — turns the HTML table embedded in a meteorological alert
//! feed item into a canonical, fully populated alert record.

pub mod assemble;
pub mod extract;
pub mod labels;
pub mod types;

pub use assemble::{assemble, assemble_all, assemble_item, Assembly};
pub use extract::{extract, extract_tokens, extract_tree, Strategy};
pub use labels::canonical_field;
pub use types::*;
