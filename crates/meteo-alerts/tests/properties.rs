//! Behavioural tests for extraction and assembly.
//!
//! Covers traversal equivalence, idempotence, record completeness, label
//! precedence, positional degradation, anchor selection and an end-to-end
//! alert fragment.

use meteo_alerts::{
    assemble, assemble_item, extract, extract_tokens, extract_tree, AlertRecord, CanonicalField,
    ExtractError, RawItem, Strategy,
};

// ─────────────────────── fixtures ───────────────────────

/// Labelled layout, as published by the alert feed.
const LABELLED_ALERT: &str = r#"<table>
  <tr><th align="left">Status</th><td>Aviso ativo</td></tr>
  <tr><th align="left">Evento</th><td>Acumulado de Chuva</td></tr>
  <tr><th align="left">Severidade</th><td>Perigo Potencial</td></tr>
  <tr><th align="left">Início</th><td>2024-05-14 10:00:00.0</td></tr>
  <tr><th align="left">Fim</th><td>2024-05-15 10:00:00.0</td></tr>
  <tr><th align="left">Descrição</th><td>Chuva entre 20 e 30 mm/h ou até 50 mm/dia.</td></tr>
  <tr><th align="left">Área</th><td>Aviso para as Áreas: Centro Ocidental Rio-grandense</td></tr>
  <tr><th align="left">Link Gráfico</th><td><a href="http://alert-as.inmet.gov.br/cap_12/alert/45123.png">Clique aqui</a></td></tr>
</table>"#;

/// Header-less layout: one generic cell per canonical position.
const POSITIONAL_ALERT: &str = "<table><tr>\
    <td>Aviso ativo</td><td>Vendaval</td><td>Moderada</td>\
    <td>2024-05-14 10:00</td><td>2024-05-14 22:00</td>\
    <td>Ventos de 60 km/h.</td><td>Litoral Norte</td>\
    <td><a href=\"https://img/v.png\">gráfico</a></td>\
    </tr></table>";

const END_TO_END: &str = r#"<table><tr><th>Severidade</th><td>Crítica</td></tr><tr><th>Evento</th><td>Chuvas Intensas</td></tr><tr><td><a href="https://img/x.png">graf</a></td></tr></table>"#;

fn well_formed_corpus() -> Vec<&'static str> {
    vec![
        LABELLED_ALERT,
        POSITIONAL_ALERT,
        END_TO_END,
        "<table><tr><td>a</td><td>b</td><td>c</td></tr></table>",
        "<table><thead><tr><th>Evento</th></tr></thead><tbody><tr><td>Geada</td></tr></tbody></table>",
        "<table><tr><th>Área</th><td>Serra <b>Gaúcha</b> e <i>Campos</i></td></tr></table>",
        "<table><tr><th>Evento</th><td>um</td><td>dois</td></tr></table>",
        "<p>nota</p><table><tr><td>x &amp; y</td></tr></table><a href=\"x\">1</a><a href=\"y\">2</a>",
        "<table><tr><th>Severidade</th><td>Crítica</td></tr></table>\
         <table><tr><td>1</td><td>2</td><td>Moderada</td></tr></table>",
        "<table><tr><td><table><tr><th>Evento</th><td>Granizo</td></tr></table></td></tr></table>",
        "<div><span>sem tabela</span></div>",
        "<td>Aviso ativo</td><td>Geada</td><td>Perigo</td>",
        "<tr><th>Severidade</th><td>Crítica</td></tr>",
        "<p>nota</p><td>x</td><td><a href=\"https://img/g.png\">graf</a></td>",
        "<th>Evento</th><td>Ressaca</td>",
    ]
}

fn item_with(html: &str) -> RawItem {
    RawItem {
        title: "Aviso de Acumulado de Chuva".into(),
        link: "https://alertas2.inmet.gov.br/45123".into(),
        description_html: html.into(),
        published_raw: "Tue, 14 May 2024 10:32:00 -0300".into(),
    }
}

fn extracted_fields(record: &AlertRecord) -> Vec<(&'static str, &str)> {
    CanonicalField::ALL
        .iter()
        .map(|f| (f.as_str(), record.field(*f)))
        .collect()
}

// ─────────────────────── traversal equivalence ───────────────────────

#[test]
fn token_and_tree_walks_agree_on_well_formed_input() {
    for html in well_formed_corpus() {
        let tokens = extract_tokens(html).expect("token walk");
        let tree = extract_tree(html).expect("tree walk");
        assert_eq!(tokens, tree, "strategies diverged on {html}");
    }
}

#[test]
fn token_and_tree_walks_build_identical_records() {
    for html in well_formed_corpus() {
        let item = item_with(html);
        let a = assemble_item(&item, Strategy::TokenWalk);
        let b = assemble_item(&item, Strategy::TreeWalk);
        assert_eq!(a, b, "records diverged on {html}");
    }
}

// ─────────────────────── idempotence ───────────────────────

#[test]
fn extraction_is_idempotent() {
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let item = item_with(LABELLED_ALERT);
        let first = assemble_item(&item, strategy);
        for _ in 0..5 {
            assert_eq!(assemble_item(&item, strategy), first);
        }
    }
}

// ─────────────────────── completeness ───────────────────────

#[test]
fn every_field_present_for_any_input() {
    let inputs = [
        "",
        "   ",
        "texto puro",
        "<",
        "<<<>>>",
        "&&&;",
        "</td></td></table>",
        "<table><tr><td>",
        "<table><th>Evento",
        "<td>solto</td>",
        "<a href=>",
        "<![CDATA[x]]>",
        "<!-- só comentário -->",
        "\u{0}\u{1}<td>\u{7f}</td>",
    ];
    for html in inputs {
        for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
            let assembly = assemble_item(&item_with(html), strategy);
            let value = serde_json::to_value(&assembly.record).unwrap();
            let obj = value.as_object().unwrap();
            assert_eq!(obj.len(), 11, "input {html:?}");
            assert!(obj.values().all(|v| v.is_string()), "input {html:?}");
            assert_eq!(assembly.record.title, "Aviso de Acumulado de Chuva");
        }
    }
}

#[test]
fn fragments_with_cells_never_fail() {
    let inputs = [
        "<td>solto</td>",
        "<td>Aviso ativo</td><td>Geada</td><td>Perigo</td>",
        "<tr><th>Severidade</th><td>Crítica</td></tr>",
        "<table><tr><td>",
        "<table><th>Evento",
        "<p>nota</p><td>x</td>",
    ];
    for html in inputs {
        let item = item_with(html);
        let tokens = assemble_item(&item, Strategy::TokenWalk);
        let tree = assemble_item(&item, Strategy::TreeWalk);
        assert!(tokens.is_ok(), "token walk failed on {html:?}");
        assert!(tree.is_ok(), "tree walk failed on {html:?}");
        assert_eq!(tokens, tree, "strategies diverged on {html:?}");
    }
}

#[test]
fn empty_description_is_not_an_error() {
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let assembly = assemble_item(&item_with(""), strategy);
        assert!(assembly.is_ok());
        assert!(extracted_fields(&assembly.record)
            .iter()
            .all(|(_, v)| v.is_empty()));
    }
}

#[test]
fn non_markup_is_reported_not_fatal() {
    let items = vec![
        item_with("isto não é html"),
        item_with(END_TO_END),
    ];
    let out = meteo_alerts::assemble_all(&items, Strategy::TreeWalk);
    assert_eq!(out[0].error, Some(ExtractError::NotMarkup));
    assert_eq!(out[0].record.link, "https://alertas2.inmet.gov.br/45123");
    assert!(out[1].is_ok());
    assert_eq!(out[1].record.event, "Chuvas Intensas");
}

// ─────────────────────── precedence & degradation ───────────────────────

#[test]
fn label_value_beats_positional_cell() {
    let html = "<table><tr><th>Severidade</th><td>Crítica</td></tr></table>\
        <table><tr><td>Aviso ativo</td><td>Vendaval</td><td>Moderada</td><td>ini</td>\
        <td>fim</td><td>desc</td><td>área</td><td>graf</td></tr></table>";
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let record = assemble_item(&item_with(html), strategy).record;
        assert_eq!(record.severity, "Crítica");
        assert_eq!(record.status, "Aviso ativo");
        assert_eq!(record.event, "Vendaval");
        assert_eq!(record.area, "área");
    }
}

#[test]
fn three_cells_fill_first_three_fields() {
    let html = "<table><tr><td>Aviso ativo</td><td>Geada</td><td>Perigo</td></tr></table>";
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let assembly = assemble_item(&item_with(html), strategy);
        assert!(assembly.is_ok());
        let r = assembly.record;
        assert_eq!(r.status, "Aviso ativo");
        assert_eq!(r.event, "Geada");
        assert_eq!(r.severity, "Perigo");
        for field in &CanonicalField::ALL[3..] {
            assert_eq!(r.field(*field), "", "{} should be empty", field.as_str());
        }
    }
}

#[test]
fn bare_cells_degrade_without_a_table() {
    let html = "<td>Aviso ativo</td><td>Geada</td><td>Perigo</td>";
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let assembly = assemble_item(&item_with(html), strategy);
        assert_eq!(assembly.error, None, "{strategy}");
        let r = assembly.record;
        assert_eq!(r.status, "Aviso ativo");
        assert_eq!(r.event, "Geada");
        assert_eq!(r.severity, "Perigo");
        assert_eq!(r.start_time, "");
    }
}

#[test]
fn bare_labelled_row_binds_value() {
    let html = "<tr><th>Severidade</th><td>Crítica</td></tr>";
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let assembly = assemble_item(&item_with(html), strategy);
        assert_eq!(assembly.error, None, "{strategy}");
        assert_eq!(assembly.record.severity, "Crítica");
        assert_eq!(assembly.record.status, "");
    }
}

#[test]
fn positional_layout_fills_all_fields() {
    let record = assemble_item(&item_with(POSITIONAL_ALERT), Strategy::TreeWalk).record;
    assert_eq!(record.status, "Aviso ativo");
    assert_eq!(record.event, "Vendaval");
    assert_eq!(record.severity, "Moderada");
    assert_eq!(record.start_time, "2024-05-14 10:00");
    assert_eq!(record.end_time, "2024-05-14 22:00");
    assert_eq!(record.description, "Ventos de 60 km/h.");
    assert_eq!(record.area, "Litoral Norte");
    assert_eq!(record.graphic_link, "https://img/v.png");
}

// ─────────────────────── anchors ───────────────────────

#[test]
fn last_anchor_wins() {
    let html = r#"<a href="x">primeiro</a><p><a href="y">segundo</a></p>"#;
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let ex = extract(html, strategy).unwrap();
        assert_eq!(ex.anchor.as_deref(), Some("y"));
        let record = assemble(&item_with(html), &ex);
        assert_eq!(record.graphic_link, "y");
    }
}

#[test]
fn anchor_without_href_is_ignored() {
    let html = r#"<a href="x">com</a><a name="y">sem</a>"#;
    let ex = extract(html, Strategy::TokenWalk).unwrap();
    assert_eq!(ex.anchor.as_deref(), Some("x"));
}

// ─────────────────────── end to end ───────────────────────

#[test]
fn end_to_end_fragment() {
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let assembly = assemble_item(&item_with(END_TO_END), strategy);
        assert!(assembly.is_ok());
        let r = assembly.record;
        assert_eq!(r.severity, "Crítica");
        assert_eq!(r.event, "Chuvas Intensas");
        assert_eq!(r.graphic_link, "https://img/x.png");
        for (name, value) in extracted_fields(&r) {
            if !matches!(name, "severity" | "event" | "graphic_link") {
                assert_eq!(value, "", "{name} should be empty");
            }
        }
        assert_eq!(r.published_raw, "Tue, 14 May 2024 10:32:00 -0300");
    }
}

#[test]
fn labelled_feed_table() {
    let r = assemble_item(&item_with(LABELLED_ALERT), Strategy::TokenWalk).record;
    assert_eq!(r.status, "Aviso ativo");
    assert_eq!(r.event, "Acumulado de Chuva");
    assert_eq!(r.severity, "Perigo Potencial");
    assert_eq!(r.start_time, "2024-05-14 10:00:00.0");
    assert_eq!(r.end_time, "2024-05-15 10:00:00.0");
    assert_eq!(r.description, "Chuva entre 20 e 30 mm/h ou até 50 mm/dia.");
    assert_eq!(
        r.area,
        "Aviso para as Áreas: Centro Ocidental Rio-grandense"
    );
    assert_eq!(
        r.graphic_link,
        "http://alert-as.inmet.gov.br/cap_12/alert/45123.png"
    );
}

#[test]
fn formatted_value_keeps_full_text() {
    let html = "<table><tr><th>Área</th><td>Serra <b>Gaúcha</b> e <i>Campos</i></td></tr></table>";
    for strategy in [Strategy::TokenWalk, Strategy::TreeWalk] {
        let r = assemble_item(&item_with(html), strategy).record;
        assert_eq!(r.area, "Serra Gaúcha e Campos");
    }
}

#[test]
fn reordered_rows_resolve_by_label() {
    let html = "<table><tr><th>Fim</th><td>amanhã</td></tr>\
        <tr><th>Evento</th><td>Onda de Calor</td></tr>\
        <tr><th>Status</th><td>Aviso ativo</td></tr></table>";
    let r = assemble_item(&item_with(html), Strategy::TreeWalk).record;
    assert_eq!(r.end_time, "amanhã");
    assert_eq!(r.event, "Onda de Calor");
    assert_eq!(r.status, "Aviso ativo");
    assert_eq!(r.severity, "");
}
