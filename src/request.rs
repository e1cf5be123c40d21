//! # Document Requests
//!
//! A JSON description of a document: optional title and default font, a
//! column layout, and an ordered list of content blocks. Applying a request
//! replays the blocks as engine calls, in order.
//!
//! ```json
//! { "title": "Sales 2023",
//!   "contents": [
//!     { "type": "text", "data": "Hello", "options": { "fontSize": 14 } },
//!     { "type": "newLine", "options": { "count": 2 } },
//!     { "type": "row", "columns": [ { "span": 6, "contents": [] } ] }
//!   ] }
//! ```
//!
//! [`ReportTemplate`] builds a fixed report layout from a handful of fields.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::Result;
use crate::image_loader::decode_base64;
use crate::layout::LayoutEngine;
use crate::model::{
    ColumnLayoutOptions, FontStyle, ImageOptions, Metadata, TableOptions, TableRow, TableTheme,
    TextOptions,
};
use crate::surface::Surface;

const TITLE_SIZE: f64 = 18.0;

/// A whole document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Bold 18pt heading, recorded in the table of contents.
    pub title: Option<String>,
    pub default_font: Option<String>,
    pub layout: Option<ColumnLayoutOptions>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub contents: Vec<Content>,
}

/// One content block.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
    Text {
        data: String,
        #[serde(default)]
        options: TextOptions,
    },
    Table {
        data: TableData,
        #[serde(default)]
        options: TableOptions,
    },
    NewPage,
    NewLine {
        #[serde(default)]
        options: NewLineOptions,
    },
    Image {
        /// Base64, optionally as a `data:` URI.
        data: String,
        #[serde(default)]
        options: ImageOptions,
    },
    Row {
        columns: Vec<RowColumn>,
    },
}

/// Rows and naming of a table block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub table_name: Option<String>,
    #[serde(default)]
    pub table_data: Vec<TableRow>,
    #[serde(default)]
    pub ignore_fields: HashSet<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct NewLineOptions {
    pub count: usize,
}

impl Default for NewLineOptions {
    fn default() -> Self {
        Self { count: 1 }
    }
}

/// One grid column of a row block.
#[derive(Debug, Clone, Deserialize)]
pub struct RowColumn {
    pub span: u32,
    #[serde(default)]
    pub contents: Vec<Content>,
}

impl DocumentRequest {
    /// Issue the request's calls against `engine`.
    pub fn apply<S: Surface>(&self, engine: &mut LayoutEngine<S>) -> Result<()> {
        if let Some(font) = &self.default_font {
            engine.set_default_font(font);
        }
        if let Some(layout) = &self.layout {
            engine.set_layout_columns(layout)?;
        }
        if let Some(title) = &self.title {
            let options = TextOptions::sized(TITLE_SIZE)
                .with_style(FontStyle::Bold)
                .indexed();
            engine.add_text(title, &options)?;
            engine.add_new_line(2)?;
        }
        self.contents.iter().try_for_each(|content| content.apply(engine))
    }

    /// Metadata for the PDF info dictionary, titled after the document
    /// when no explicit title is given.
    pub fn resolved_metadata(&self) -> Metadata {
        let mut metadata = self.metadata.clone();
        if metadata.title.is_none() {
            metadata.title = self.title.clone();
        }
        metadata
    }
}

impl Content {
    pub fn apply<S: Surface>(&self, engine: &mut LayoutEngine<S>) -> Result<()> {
        match self {
            Content::Text { data, options } => engine.add_text(data, options),
            Content::Table { data, options } => {
                let mut options = options.clone();
                if data.table_name.is_some() {
                    options.table_name = data.table_name.clone();
                }
                options.ignore_fields.extend(data.ignore_fields.iter().cloned());
                engine.add_generic_table(&data.table_data, &options)
            }
            Content::NewPage => engine.add_new_page(),
            Content::NewLine { options } => engine.add_new_line(options.count),
            Content::Image { data, options } => {
                if data.trim().is_empty() {
                    return Ok(());
                }
                let bytes = decode_base64(data)?;
                engine.add_image(&bytes, options)
            }
            Content::Row { columns } => {
                engine.start_row()?;
                for column in columns {
                    engine.add_col(column.span, |engine| {
                        column
                            .contents
                            .iter()
                            .try_for_each(|content| content.apply(engine))
                    })?;
                }
                engine.end_row()
            }
        }
    }
}

/// The fixed report layout: a title page, then summary, data table and
/// conclusions, each listed in the table of contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTemplate {
    pub report_title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub table_data: Vec<TableRow>,
    pub conclusions: Option<String>,
}

impl ReportTemplate {
    pub fn apply<S: Surface>(&self, engine: &mut LayoutEngine<S>) -> Result<()> {
        let heading = |size: f64| TextOptions::sized(size).with_style(FontStyle::Bold).indexed();

        engine.add_text(self.report_title.as_deref().unwrap_or("Report"), &heading(24.0))?;
        engine.add_new_line(2)?;
        if let Some(author) = &self.author {
            engine.add_text(&format!("Author: {author}"), &TextOptions::default())?;
        }
        if let Some(date) = &self.date {
            engine.add_text(&format!("Date: {date}"), &TextOptions::default())?;
        }
        engine.add_new_page()?;

        if let Some(summary) = &self.summary {
            engine.add_text("Executive Summary", &heading(16.0))?;
            engine.add_new_line(1)?;
            engine.add_text(summary, &TextOptions::default())?;
            engine.add_new_line(2)?;
        }
        if !self.table_data.is_empty() {
            let options = TableOptions {
                add_to_index: true,
                theme: TableTheme::Grid,
                ..TableOptions::named("Data Analysis")
            };
            engine.add_generic_table(&self.table_data, &options)?;
            engine.add_new_line(2)?;
        }
        if let Some(conclusions) = &self.conclusions {
            engine.add_text("Conclusions", &heading(16.0))?;
            engine.add_new_line(1)?;
            engine.add_text(conclusions, &TextOptions::default())?;
        }
        Ok(())
    }
}

/// A sample request exercising every content type.
pub fn example_request_json() -> &'static str {
    r##"{
  "title": "Sales Report 2023",
  "defaultFont": "helvetica",
  "metadata": { "author": "Folio", "subject": "Quarterly sales" },
  "contents": [
    {
      "type": "text",
      "data": "This report summarises product sales across all regions for the 2023 financial year.",
      "options": { "fontSize": 12 }
    },
    {
      "type": "table",
      "data": {
        "tableName": "Quarterly Sales",
        "tableData": [
          { "product": "Widget", "quarter": "Q1", "units": 120, "revenue": 2400.5, "closed": "2023-03-31", "internalId": "w-1" },
          { "product": "Gadget", "quarter": "Q1", "units": 80, "revenue": 3120.0, "closed": "2023-03-31", "internalId": "g-1" },
          { "product": "Widget", "quarter": "Q2", "units": 150, "revenue": 3000.0, "closed": "2023-06-30", "internalId": "w-2" },
          { "product": "Gizmo", "quarter": "Q2", "units": null, "revenue": 0, "closed": "2023-06-30", "internalId": "z-2" }
        ],
        "ignoreFields": ["internalId"]
      },
      "options": { "addToIndex": true, "theme": "striped" }
    },
    { "type": "newLine", "options": { "count": 2 } },
    {
      "type": "row",
      "columns": [
        {
          "span": 6,
          "contents": [
            { "type": "text", "data": "Highlights", "options": { "fontSize": 14, "fontStyle": "bold" } },
            { "type": "text", "data": "Widget volume grew 25% quarter on quarter while Gadget held steady." }
          ]
        },
        {
          "span": 6,
          "contents": [
            { "type": "image", "data": "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAQAAAAECAIAAAAmkwkpAAAAEElEQVR4nGNw6j4FRwzEcQCNMhlxDCX/UgAAAABJRU5ErkJggg==", "options": { "height": 60, "format": "PNG" } }
          ]
        }
      ]
    },
    { "type": "newPage" },
    {
      "type": "text",
      "data": "Outlook",
      "options": { "fontSize": 16, "fontStyle": "bold", "addToIndex": true }
    },
    {
      "type": "text",
      "data": "Demand is expected to stay strong through the first half of 2024.",
      "options": { "fontStyle": "italic" }
    }
  ]
}
"##
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_parses() {
        let request: DocumentRequest = serde_json::from_str(example_request_json()).unwrap();
        assert_eq!(request.contents.len(), 7);
        assert!(matches!(request.contents[3], Content::Row { ref columns } if columns.len() == 2));
        assert_eq!(
            request.resolved_metadata().title.as_deref(),
            Some("Sales Report 2023")
        );
    }

    #[test]
    fn new_line_count_defaults_to_one() {
        let content: Content = serde_json::from_str(r#"{ "type": "newLine" }"#).unwrap();
        assert!(matches!(content, Content::NewLine { options } if options.count == 1));
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let err = serde_json::from_str::<Content>(r#"{ "type": "chart", "data": [] }"#);
        assert!(err.is_err());
    }

    #[test]
    fn table_rows_keep_key_order() {
        let content: Content = serde_json::from_str(
            r#"{ "type": "table", "data": { "tableData": [ { "z": 1, "a": 2, "m": 3 } ] } }"#,
        )
        .unwrap();
        let Content::Table { data, .. } = content else {
            panic!("expected a table");
        };
        let keys: Vec<&str> = data.table_data[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
