//! Header label spellings observed in the feed, mapped to canonical fields.
//!
//! Matching is exact and case-sensitive. Accented and unaccented spellings
//! are separate entries.

use crate::types::CanonicalField;

/// Observed label spelling → canonical field.
pub const LABEL_SYNONYMS: &[(&str, CanonicalField)] = &[
    ("Status", CanonicalField::Status),
    ("Evento", CanonicalField::Event),
    ("Severidade", CanonicalField::Severity),
    ("Início", CanonicalField::StartTime),
    ("Inicio", CanonicalField::StartTime),
    ("Fim", CanonicalField::EndTime),
    ("Descrição", CanonicalField::Description),
    ("Descricao", CanonicalField::Description),
    ("Área", CanonicalField::Area),
    ("Area", CanonicalField::Area),
    ("Link Gráfico", CanonicalField::GraphicLink),
    ("Link Grafico", CanonicalField::GraphicLink),
    ("Gráfico", CanonicalField::GraphicLink),
    ("Grafico", CanonicalField::GraphicLink),
];

/// Resolve a header label to its canonical field.
///
/// Surrounding whitespace is ignored; anything else must match exactly.
/// Unknown labels yield `None`.
pub fn canonical_field(label: &str) -> Option<CanonicalField> {
    let label = label.trim();
    LABEL_SYNONYMS
        .iter()
        .find(|(spelling, _)| *spelling == label)
        .map(|(_, field)| *field)
}
