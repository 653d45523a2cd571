//! Layout config – the intermediate representation between the document
//! composer and PDF rendering. It encodes exactly what goes on each page,
//! with coordinates in points measured from the top-left page corner.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fonts::FontRole;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Geometry of the header table.
    #[serde(default)]
    pub header: HeaderColumns,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// Column geometry of the header table, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderColumns {
    /// Width of the widest label.
    pub label_width: f32,
    /// Left edge of the value column.
    pub value_x: f32,
    /// Space available to values before wrapping.
    pub value_width: f32,
}

/// One page of content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub items: Vec<LayoutItem>,
}

/// Something drawn on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutItem {
    Text(TextRun),
    Rule(HorizontalRule),
    Image(ImageBox),
}

/// What part of the document a text run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKind {
    HeaderLabel,
    HeaderValue,
    Body,
}

/// A single line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub kind: TextKind,
    /// Header row this run belongs to; `None` for body lines.
    pub row: Option<usize>,
    pub x: f32,
    /// Top of the line box.
    pub y: f32,
    pub text: String,
    pub font: FontRole,
    pub font_size: f32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalRule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBox {
    pub path: PathBuf,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DocumentLayout {
    /// Iterate all text runs of the document, page by page.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter())
            .filter_map(|item| match item {
                LayoutItem::Text(run) => Some(run),
                _ => None,
            })
    }

    /// Body lines, in document order.
    pub fn body_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.text_runs().filter(|r| r.kind == TextKind::Body)
    }

    /// Number of distinct header rows.
    pub fn header_row_count(&self) -> usize {
        self.text_runs()
            .filter(|r| r.kind == TextKind::HeaderLabel)
            .count()
    }

    /// The avatar box, if one was placed.
    pub fn image(&self) -> Option<&ImageBox> {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter())
            .find_map(|item| match item {
                LayoutItem::Image(img) => Some(img),
                _ => None,
            })
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}
