//! Render options shared by the script and PDF backends.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Supported physical page formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
}

/// Page dimensions in PDF points (1 pt = 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageFormat {
    pub fn size(self) -> PageSize {
        match self {
            // 210mm × 297mm
            PageFormat::A4 => PageSize {
                width: 595.28,
                height: 841.89,
            },
            // 8.5in × 11in
            PageFormat::Letter => PageSize {
                width: 612.0,
                height: 792.0,
            },
        }
    }
}

impl FromStr for PageFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            _ => Err(RenderError::UnsupportedPageFormat(s.to_string())),
        }
    }
}

impl fmt::Display for PageFormat {
    /// The paper token understood by groff's `.PAPER` macro.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFormat::A4 => f.write_str("A4"),
            PageFormat::Letter => f.write_str("LETTER"),
        }
    }
}

/// Pre-resolved font files. They are opaque here; locating them is the
/// caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPaths {
    pub header: PathBuf,
    pub header_bold: PathBuf,
    pub content: PathBuf,
}

/// Options for a single render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// `"A4"` or `"Letter"` (case-insensitive). Resolved by each backend
    /// before any output is produced.
    pub page_format: String,
    /// Pre-rendered avatar image. `None` means no avatar.
    #[serde(default)]
    pub logo_path: Option<PathBuf>,
    /// Only needed by the PDF backend.
    #[serde(default)]
    pub font_paths: FontPaths,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_format: "A4".to_string(),
            logo_path: None,
            font_paths: FontPaths::default(),
        }
    }
}

impl RenderOptions {
    /// Resolve `page_format` to a known format.
    pub fn resolve_page_format(&self) -> Result<PageFormat, RenderError> {
        self.page_format.parse()
    }

    /// The logo path, ignoring an empty path.
    pub fn logo(&self) -> Option<&std::path::Path> {
        self.logo_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Deserialise options from JSON.
    ///
    /// The error message names the offending setting, e.g. a missing
    /// `page_format` or a `logo_path` that is not a string.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        serde_json::from_str(json).map_err(|e| RenderError::Config(e.to_string()))
    }
}
