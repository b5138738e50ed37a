//! Renders the report artifact: a title, a summary paragraph and a table.

use crate::summary::MARKUP_LINE_BREAK;
use crate::{utils, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use tracing::debug;

/// Everything a renderer needs to produce a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    /// Plain text, escaped by the renderer.
    title: String,
    /// Escaped markup; `<br/>` is the only tag it may contain.
    body: String,
    /// Plain text cells, header row first.
    table: Vec<Vec<String>>,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>, body: impl Into<String>, table: Vec<Vec<String>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            table,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn table(&self) -> &[Vec<String>] {
        &self.table
    }
}

/// Writes a `ReportDocument` to a file.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, document: &ReportDocument, path: &Path) -> Result<()>;
}

/// Renders reports as a standalone HTML page.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Builds the HTML text for `document`.
    pub fn to_html(&self, document: &ReportDocument) -> String {
        let title = escape_html(document.title());
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        // Writing to a String cannot fail
        let _ = writeln!(html, "<title>{title}</title>");
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(html, "<h1>{title}</h1>");
        let body = document
            .body()
            .replace(MARKUP_LINE_BREAK, &format!("{MARKUP_LINE_BREAK}\n"));
        let _ = writeln!(html, "<p>\n{body}\n</p>");

        let mut rows = document.table().iter();
        html.push_str("<table>\n");
        if let Some(header) = rows.next() {
            html.push_str(&table_row("th", header));
        }
        for row in rows {
            html.push_str(&table_row("td", row));
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

#[async_trait]
impl Renderer for HtmlRenderer {
    async fn render(&self, document: &ReportDocument, path: &Path) -> Result<()> {
        debug!(
            "Rendering '{}' with {} table rows to {}",
            document.title(),
            document.table().len(),
            path.display()
        );
        utils::write(path, self.to_html(document)).await
    }
}

fn table_row(tag: &str, cells: &[String]) -> String {
    let mut row = String::from("<tr>");
    for cell in cells {
        let _ = write!(row, "<{tag}>{}</{tag}>", escape_html(cell));
    }
    row.push_str("</tr>\n");
    row
}

/// Escapes the characters that have special meaning in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
