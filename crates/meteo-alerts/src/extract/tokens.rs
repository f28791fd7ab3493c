//! Single-pass token walk over a lenient `quick_xml` reader.
//!
//! The reader runs with end-name checks disabled, so HTML quirks such as
//! unclosed cells or stray end tags do not stop the walk. Cell boundaries
//! the markup leaves implicit are closed the way an HTML parser would close
//! them.

use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use tracing::debug;

use super::{CellEvent, Collector};
use crate::types::{ExtractError, ExtractResult, Extraction};

/// Elements that never have content or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const ROW_ELEMENTS: &[&str] = &["tr", "tbody", "thead", "tfoot"];

/// Walk `html` as a token stream, collecting cells without building a tree.
pub fn extract_tokens(html: &str) -> ExtractResult<Extraction> {
    if html.trim().is_empty() {
        return Ok(Extraction::default());
    }

    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.check_comments = false;

    let mut walker = TokenWalker::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => walker.open(&e, false),
            Ok(Event::Empty(e)) => walker.open(&e, true),
            Ok(Event::End(e)) => walker.close(&tag_name(e.local_name().as_ref())),
            Ok(Event::Text(e)) => walker.text(&decode_text(&e)),
            Ok(Event::Eof) => break,
            Err(e) => {
                if !walker.saw_element {
                    return Err(ExtractError::Tokenize {
                        position: reader.error_position(),
                        message: e.to_string(),
                    });
                }
                debug!(
                    position = reader.error_position(),
                    error = %e,
                    "token walk stopped early; keeping partial extraction"
                );
                break;
            }
            // Comments, CDATA, doctype and processing instructions carry no cells.
            Ok(_) => {}
        }
    }

    if !walker.saw_element {
        return Err(ExtractError::NotMarkup);
    }
    Ok(walker.finish())
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn decode_text(e: &BytesText<'_>) -> String {
    match e.unescape_with(resolve_html5_entity) {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(e).into_owned(),
    }
}

/// An open `<td>` or `<th>`.
#[derive(Debug)]
struct CellFrame {
    header: bool,
    text: String,
    direct: String,
    /// Elements currently open inside this cell.
    depth: usize,
    /// Table nesting level the cell belongs to.
    table_depth: usize,
}

#[derive(Debug)]
struct TokenWalker {
    collector: Collector,
    cells: Vec<CellFrame>,
    table_depth: usize,
    saw_element: bool,
}

impl TokenWalker {
    fn new() -> Self {
        Self {
            collector: Collector::new(),
            cells: Vec::new(),
            table_depth: 0,
            saw_element: false,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        self.saw_element = true;
        let name = tag_name(e.local_name().as_ref());
        let void = empty || VOID_ELEMENTS.contains(&name.as_str());

        match name.as_str() {
            "table" => {
                self.collector.push(CellEvent::TableStart);
                if void {
                    self.collector.push(CellEvent::TableEnd);
                } else {
                    self.nest();
                    self.table_depth += 1;
                }
            }
            "td" | "th" => {
                self.close_cells_at(self.table_depth);
                let frame = CellFrame {
                    header: name == "th",
                    text: String::new(),
                    direct: String::new(),
                    depth: 0,
                    table_depth: self.table_depth,
                };
                if void {
                    self.emit(frame);
                } else {
                    self.nest();
                    self.cells.push(frame);
                }
            }
            _ => {
                if ROW_ELEMENTS.contains(&name.as_str()) {
                    self.close_cells_at(self.table_depth);
                }
                if name == "a" {
                    if let Some(href) = href_of(e) {
                        self.collector.push(CellEvent::Anchor { href });
                    }
                }
                if !void {
                    self.nest();
                }
            }
        }
    }

    fn close(&mut self, name: &str) {
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        match name {
            "td" | "th" => {
                let closes_top = self
                    .cells
                    .last()
                    .is_some_and(|c| c.table_depth == self.table_depth);
                if closes_top {
                    if let Some(frame) = self.cells.pop() {
                        self.unnest();
                        self.emit(frame);
                    }
                }
            }
            "table" => {
                if self.table_depth == 0 {
                    return;
                }
                self.close_cells_at(self.table_depth);
                self.table_depth -= 1;
                self.unnest();
                self.collector.push(CellEvent::TableEnd);
            }
            _ => {
                if ROW_ELEMENTS.contains(&name) {
                    self.close_cells_at(self.table_depth);
                }
                self.unnest();
            }
        }
    }

    fn text(&mut self, text: &str) {
        for frame in &mut self.cells {
            frame.text.push_str(text);
            if frame.depth == 0 {
                frame.direct.push_str(text);
            }
        }
    }

    /// An element opened inside every currently open cell.
    fn nest(&mut self) {
        for frame in &mut self.cells {
            frame.depth += 1;
        }
    }

    fn unnest(&mut self) {
        for frame in &mut self.cells {
            frame.depth = frame.depth.saturating_sub(1);
        }
    }

    /// Close every open cell at or below table nesting level `depth`.
    fn close_cells_at(&mut self, depth: usize) {
        while self.cells.last().is_some_and(|c| c.table_depth >= depth) {
            if let Some(frame) = self.cells.pop() {
                self.unnest();
                self.emit(frame);
            }
        }
    }

    fn emit(&mut self, frame: CellFrame) {
        let text = frame.text.trim().to_string();
        let event = if frame.header {
            CellEvent::Header { text }
        } else {
            CellEvent::Data {
                text,
                direct_text: frame.direct.trim().to_string(),
            }
        };
        self.collector.push(event);
    }

    fn finish(mut self) -> Extraction {
        self.close_cells_at(0);
        while self.table_depth > 0 {
            self.table_depth -= 1;
            self.collector.push(CellEvent::TableEnd);
        }
        self.collector.finish()
    }
}

fn href_of(e: &BytesStart<'_>) -> Option<String> {
    e.html_attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref().eq_ignore_ascii_case(b"href"))
        .map(|attr| {
            attr.unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned())
        })
}
