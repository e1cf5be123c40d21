//! Integration tests for the Folio rendering pipeline.
//!
//! These tests exercise the full path from JSON or API calls to PDF bytes.
//! They verify:
//! - Requests deserialize and replay as engine calls
//! - PDF output is structurally valid
//! - Page breaks, columns and rows land content where expected
//! - Page numbers and the table of contents appear in the output
//! - `render` persists to the configured path

use folio::error::FolioError;
use folio::layout::LayoutEngine;
use folio::model::*;
use folio::request::{example_request_json, DocumentRequest};
use folio::surface::{DrawOp, Surface};

// ─── Helpers ────────────────────────────────────────────────────

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(
        bytes.windows(5).any(|w| w == b"%%EOF"),
        "Missing %%EOF marker"
    );
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(
        bytes.windows(7).any(|w| w == b"trailer"),
        "Missing trailer"
    );
}

fn page_count_in(bytes: &[u8]) -> usize {
    let text = String::from_utf8_lossy(bytes);
    let start = text.find("/Count ").expect("pages tree") + "/Count ".len();
    text[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .expect("page count")
}

fn layout_request(json: &str) -> LayoutEngine {
    let request: DocumentRequest = serde_json::from_str(json).expect("valid request");
    let mut engine = LayoutEngine::new();
    request.apply(&mut engine).expect("request applies");
    engine
}

fn texts_on(engine: &LayoutEngine, page: usize) -> Vec<String> {
    engine.surface().pages()[page]
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { lines, .. } => Some(lines.join(" ")),
            _ => None,
        })
        .collect()
}

const PNG_4X4: &str = "iVBORw0KGgoAAAANSUhEUgAAAAQAAAAECAIAAAAmkwkpAAAAEElEQVR4nGNw6j4FRwzEcQCNMhlxDCX/UgAAAABJRU5ErkJggg==";

// ─── Basic Pipeline Tests ───────────────────────────────────────

#[test]
fn test_empty_request_is_one_numbered_page() {
    let bytes = folio::render_json("{}").unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(page_count_in(&bytes), 1);
}

#[test]
fn test_empty_document_still_gets_a_footer() {
    let mut engine = LayoutEngine::new();
    engine.get_buffer().unwrap();
    assert_eq!(texts_on(&engine, 0), ["Page 1 of 1"]);
}

#[test]
fn test_example_request_renders() {
    let bytes = folio::render_json(example_request_json()).unwrap();
    assert_valid_pdf(&bytes);
    // two content pages plus the contents page
    assert_eq!(page_count_in(&bytes), 3);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Title (Sales Report 2023)"));
    assert!(text.contains("/Author (Folio)"));
    assert!(text.contains("/Subtype /Image"));
    assert!(text.contains("/BaseFont /Helvetica-Bold"));
}

#[test]
fn test_malformed_json_reports_a_hint() {
    let err = folio::render_json(r#"{ "contents": [ { "type": "text", } ] }"#).unwrap_err();
    assert!(matches!(err, FolioError::Parse { .. }));
    assert!(err.to_string().contains("Hint:"));
}

#[test]
fn test_unknown_content_type_is_a_parse_error() {
    let err = folio::render_json(r#"{ "contents": [ { "type": "video" } ] }"#).unwrap_err();
    assert!(matches!(err, FolioError::Parse { .. }));
}

#[test]
fn test_bad_image_bytes_propagate() {
    let json = r#"{ "contents": [ { "type": "image", "data": "aGVsbG8gd29ybGQ=" } ] }"#;
    let err = folio::render_json(json).unwrap_err();
    assert!(matches!(err, FolioError::Image(_)));
}

// ─── Layout Through Requests ────────────────────────────────────

#[test]
fn test_new_page_content_starts_page_two() {
    let engine = layout_request(
        r#"{ "contents": [
            { "type": "text", "data": "First" },
            { "type": "newPage" },
            { "type": "text", "data": "Second" }
        ] }"#,
    );
    assert_eq!(engine.page_count(), 2);
    assert_eq!(texts_on(&engine, 0), ["First"]);
    assert_eq!(texts_on(&engine, 1), ["Second"]);
}

#[test]
fn test_long_text_wraps_to_the_column() {
    let long = "lorem ipsum dolor sit amet ".repeat(40);
    let json = serde_json::json!({
        "layout": { "columns": 2, "margin": 20, "gap": 15 },
        "contents": [ { "type": "text", "data": long } ]
    });
    let engine = layout_request(&json.to_string());
    let width = engine.cursor().content_width;
    let fonts = engine.surface().fonts();
    let spec = folio::font::FontSpec::default();

    match &engine.surface().pages()[0].ops[0] {
        DrawOp::Text { lines, x, .. } => {
            assert!(lines.len() > 5);
            assert_eq!(*x, 20.0);
            for line in lines {
                assert!(fonts.measure_string(line, &spec, 12.0) <= width + 1e-9);
            }
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_many_paragraphs_fill_columns_then_pages() {
    let paragraph = serde_json::json!({
        "type": "text",
        "data": "A paragraph that takes a few lines once it is wrapped into a narrow column of text."
    });
    let json = serde_json::json!({
        "layout": { "columns": 2, "margin": 20, "gap": 15 },
        "contents": vec![paragraph; 60]
    });
    let engine = layout_request(&json.to_string());
    assert!(engine.page_count() >= 2);

    let xs: Vec<f64> = engine.surface().pages()[0]
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, .. } => Some(*x),
            _ => None,
        })
        .collect();
    // second column starts at 20 + (595.28 - 40 - 15) / 2 + 15
    assert!(xs.contains(&20.0));
    assert!(xs.iter().any(|x| (x - 305.14).abs() < 1e-6));
}

#[test]
fn test_row_columns_share_a_top() {
    let engine = layout_request(
        r#"{ "contents": [
            { "type": "row", "columns": [
                { "span": 4, "contents": [ { "type": "text", "data": "left" } ] },
                { "span": 8, "contents": [
                    { "type": "text", "data": "right one" },
                    { "type": "text", "data": "right two" }
                ] }
            ] },
            { "type": "text", "data": "after" }
        ] }"#,
    );
    let tops: Vec<(String, f64)> = engine.surface().pages()[0]
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { lines, y, .. } => Some((lines.join(" "), *y)),
            _ => None,
        })
        .collect();
    assert_eq!(tops[0], ("left".to_string(), 20.0));
    assert_eq!(tops[1], ("right one".to_string(), 20.0));
    assert_eq!(tops[2], ("right two".to_string(), 32.0));
    // two 12pt lines in the tallest column, plus the 20pt row gap
    assert_eq!(tops[3], ("after".to_string(), 20.0 + 24.0 + 20.0));
}

#[test]
fn test_long_table_repeats_its_header() {
    let rows: Vec<serde_json::Value> = (0..120)
        .map(|i| serde_json::json!({ "id": i, "item": format!("Item {i}"), "price": 9.5 }))
        .collect();
    let json = serde_json::json!({
        "contents": [ {
            "type": "table",
            "data": { "tableName": "Inventory", "tableData": rows },
            "options": { "theme": "grid" }
        } ]
    });
    let mut engine = layout_request(&json.to_string());
    assert!(engine.page_count() >= 3);
    for page in 0..engine.page_count() {
        assert!(
            texts_on(&engine, page).iter().any(|t| t == "item"),
            "page {page} lacks the header row"
        );
    }
    let bytes = engine.get_buffer().unwrap();
    assert_valid_pdf(&bytes);
}

// ─── Finishing ──────────────────────────────────────────────────

#[test]
fn test_contents_page_is_inserted_second() {
    let json = r#"{
        "title": "Annual Report",
        "contents": [
            { "type": "newPage" },
            { "type": "text", "data": "Revenue", "options": { "addToIndex": true } }
        ]
    }"#;
    let mut engine = layout_request(json);
    engine.get_buffer().unwrap();

    assert_eq!(engine.page_count(), 3);
    let contents = texts_on(&engine, 1);
    assert!(contents.iter().any(|t| t == "Table of Contents"));
    assert!(contents.iter().any(|t| t == "Annual Report"));
    assert!(contents.iter().any(|t| t == "Revenue"));
    assert!(texts_on(&engine, 2).iter().any(|t| t == "Revenue"));
    assert!(!contents.iter().any(|t| t.starts_with("Page ")));
    assert!(texts_on(&engine, 0).contains(&"Page 1 of 2".to_string()));
    assert!(texts_on(&engine, 2).contains(&"Page 2 of 2".to_string()));
    assert_eq!(
        engine
            .toc_entries()
            .iter()
            .map(|e| (e.label.as_str(), e.page_number))
            .collect::<Vec<_>>(),
        [("Annual Report", 2), ("Revenue", 3)]
    );
}

#[test]
fn test_times_default_font_reaches_the_pdf() {
    let bytes = folio::render_json(
        r#"{ "defaultFont": "times", "contents": [ { "type": "text", "data": "serif" } ] }"#,
    )
    .unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/BaseFont /Times-Roman"));
    // the footer stays in Helvetica
    assert!(text.contains("/BaseFont /Helvetica "));
}

#[test]
fn test_render_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");

    let mut engine = LayoutEngine::new();
    engine.set_file_path(&path);
    engine
        .add_text("Saved", &TextOptions::sized(16.0).with_style(FontStyle::Bold))
        .unwrap();
    engine
        .add_image(
            &base64_png(),
            &ImageOptions {
                height: Some(40.0),
                ..Default::default()
            },
        )
        .unwrap();

    let written = engine.render().unwrap();
    assert_eq!(written, path);
    let bytes = std::fs::read(&path).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(engine.surface().page_count(), 1);
}

#[test]
fn test_render_to_missing_directory_fails_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.pdf");

    let mut engine = LayoutEngine::new();
    engine.set_file_path(&path);
    engine.add_text("x", &TextOptions::default()).unwrap();
    match engine.render() {
        Err(FolioError::Io { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_reset_between_documents() {
    let mut engine = LayoutEngine::new();
    engine
        .add_text("one", &TextOptions::default().indexed())
        .unwrap();
    let first = engine.get_buffer().unwrap();
    assert_eq!(page_count_in(&first), 2);

    engine.reset();
    engine.add_text("two", &TextOptions::default()).unwrap();
    let second = engine.get_buffer().unwrap();
    assert_eq!(page_count_in(&second), 1);
    assert!(engine.toc_entries().is_empty());
}

fn base64_png() -> Vec<u8> {
    folio::image_loader::decode_base64(PNG_4X4).unwrap()
}

#[test]
fn test_report_template() {
    let json = r#"{
        "reportTitle": "Monthly Sales Report",
        "author": "J. Doe",
        "date": "2024-01-01",
        "summary": "Sales rose in every region.",
        "tableData": [ { "region": "North", "total": 1200 }, { "region": "South", "total": 950 } ],
        "conclusions": "Keep going."
    }"#;
    let bytes = folio::render_report_json(json).unwrap();
    assert_valid_pdf(&bytes);
    // title page, contents page, body page
    assert_eq!(page_count_in(&bytes), 3);
}

#[test]
fn test_table_cells_from_json_are_printed_verbatim() {
    let engine = layout_request(
        r#"{ "contents": [ {
            "type": "table",
            "data": { "tableData": [
                { "note": "2023-04-09T23:30:00-05:00", "tags": ["a", "b"] }
            ] }
        } ] }"#,
    );
    let body = engine.surface().pages()[0]
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { lines, .. } => Some(lines.join(" ")),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert!(body.iter().any(|t| t == "2023-04-09T23:30:00-05:00"));
    assert!(body.iter().any(|t| t == r#"["a","b"]"#));
}
