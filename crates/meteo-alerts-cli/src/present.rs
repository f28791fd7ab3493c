//! Render alert records as fixed-width text or JSON.

use std::io::{self, Write};

use meteo_alerts::{AlertRecord, CanonicalField};

/// How records are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Portuguese column label used in text output.
pub fn display_label(field: CanonicalField) -> &'static str {
    match field {
        CanonicalField::Status => "Status",
        CanonicalField::Event => "Evento",
        CanonicalField::Severity => "Severidade",
        CanonicalField::StartTime => "Início",
        CanonicalField::EndTime => "Fim",
        CanonicalField::Description => "Descrição",
        CanonicalField::Area => "Área",
        CanonicalField::GraphicLink => "Link Gráfico",
    }
}

pub fn render<W: Write>(records: &[AlertRecord], format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Text => render_text(records, out),
        OutputFormat::Json => render_json(records, out),
    }
}

pub fn render_text<W: Write>(records: &[AlertRecord], out: &mut W) -> io::Result<()> {
    writeln!(out, "Avisos retornados: {}", records.len())?;
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "Aviso #{}", i + 1)?;
        writeln!(out, "Título: {}", record.title)?;
        writeln!(out, "Link: {}", record.link)?;
        writeln!(out, "Data de Publicação: {}", record.published_raw)?;
        for field in CanonicalField::ALL {
            writeln!(out, "{:<15}: {}", display_label(field), record.field(field))?;
        }
        writeln!(out, "-----")?;
    }
    Ok(())
}

pub fn render_json<W: Write>(records: &[AlertRecord], out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, records).map_err(io::Error::from)?;
    writeln!(out)
}
