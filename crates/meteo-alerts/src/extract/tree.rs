//! Full-tree traversal over a `scraper` DOM.

use scraper::{ElementRef, Html};

use super::{CellEvent, Collector};
use crate::types::{ExtractError, ExtractResult, Extraction};

enum Visit<'a> {
    Open(ElementRef<'a>),
    Close(ElementRef<'a>),
}

/// Parse `html` as a fragment and walk the resulting tree in document order.
///
/// The walk uses an explicit stack, so deeply nested input cannot exhaust
/// the call stack.
pub fn extract_tree(html: &str) -> ExtractResult<Extraction> {
    if html.trim().is_empty() {
        return Ok(Extraction::default());
    }

    // Outside a table context the HTML parser drops stray cell and row
    // tags, so bare cells get a wrapper that emits no table events.
    let bare_cells = has_bare_cells(html);
    let fragment = if bare_cells {
        Html::parse_fragment(&format!("<table>{html}</table>"))
    } else {
        Html::parse_fragment(html)
    };
    let mut collector = Collector::new();
    let mut saw_element = false;

    let root = fragment.root_element();
    let mut stack: Vec<Visit<'_>> = root
        .children()
        .filter_map(ElementRef::wrap)
        .map(Visit::Open)
        .collect();
    stack.reverse();

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Open(el) => {
                saw_element = true;
                match el.value().name() {
                    "table" if !bare_cells => collector.push(CellEvent::TableStart),
                    "a" => {
                        if let Some(href) = el.value().attr("href") {
                            collector.push(CellEvent::Anchor {
                                href: href.to_string(),
                            });
                        }
                    }
                    _ => {}
                }
                stack.push(Visit::Close(el));
                let children: Vec<_> = el.children().filter_map(ElementRef::wrap).collect();
                stack.extend(children.into_iter().rev().map(Visit::Open));
            }
            Visit::Close(el) => match el.value().name() {
                "table" if !bare_cells => collector.push(CellEvent::TableEnd),
                "th" => collector.push(CellEvent::Header {
                    text: descendant_text(el),
                }),
                "td" => collector.push(CellEvent::Data {
                    text: descendant_text(el),
                    direct_text: direct_text(el),
                }),
                _ => {}
            },
        }
    }

    if !saw_element {
        return Err(ExtractError::NotMarkup);
    }
    Ok(collector.finish())
}

/// True when `html` has cell or row tags but no `<table>` to hold them.
fn has_bare_cells(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    !lower.contains("<table") && ["<td", "<th", "<tr"].iter().any(|tag| lower.contains(tag))
}

fn descendant_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn direct_text(el: ElementRef<'_>) -> String {
    el.children()
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect::<String>()
        .trim()
        .to_string()
}
