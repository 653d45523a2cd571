//! Font loading and text measurement using `ttf-parser`.
//!
//! The PDF backend works with exactly three faces, addressed by
//! [`FontRole`]. Widths are the sum of horizontal glyph advances; there is
//! no kerning or shaping.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::options::FontPaths;

/// Logical font slots used by the layout.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontRole {
    HeaderBold,
    Header,
    Content,
}

impl FontRole {
    pub const ALL: [FontRole; 3] = [FontRole::HeaderBold, FontRole::Header, FontRole::Content];
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontRole::HeaderBold => "header-bold",
            FontRole::Header => "header",
            FontRole::Content => "content",
        })
    }
}

/// A loaded font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API). Empty for
    /// synthetic metrics.
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
    pub descender: f32,
}

impl FontData {
    fn synthetic() -> Self {
        Self {
            bytes: Vec::new(),
            units_per_em: 1000.0,
            ascender: 750.0,
            descender: -250.0,
        }
    }
}

/// The three faces of a render call.
pub struct FontSet {
    fonts: HashMap<FontRole, FontData>,
}

impl FontSet {
    /// Read and validate the three font files.
    pub fn load(paths: &FontPaths) -> Result<Self> {
        let mut set = Self {
            fonts: HashMap::new(),
        };
        for (role, path) in [
            (FontRole::HeaderBold, &paths.header_bold),
            (FontRole::Header, &paths.header),
            (FontRole::Content, &paths.content),
        ] {
            let bytes = std::fs::read(path).map_err(|source| RenderError::FontLoad {
                role,
                path: path.clone(),
                source,
            })?;
            set.load_font(role, path, bytes)?;
            log::debug!("loaded {role} font from '{}'", path.display());
        }
        Ok(set)
    }

    /// Synthetic metrics for every role (0.5 × size per character, 0.55 for
    /// bold). Useful for layout without font files; cannot be rendered.
    pub fn heuristic() -> Self {
        let fonts = FontRole::ALL
            .into_iter()
            .map(|role| (role, FontData::synthetic()))
            .collect();
        Self { fonts }
    }

    fn load_font(&mut self, role: FontRole, path: &Path, bytes: Vec<u8>) -> Result<()> {
        let face = ttf_parser::Face::parse(&bytes, 0).map_err(|_| RenderError::FontParse {
            role,
            path: path.to_path_buf(),
        })?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            descender: face.descender() as f32,
            bytes,
        };
        self.fonts.insert(role, data);
        Ok(())
    }

    pub fn get(&self, role: FontRole) -> Result<&FontData> {
        self.fonts
            .get(&role)
            .ok_or_else(|| RenderError::Measurement(format!("no {role} font loaded")))
    }

    /// Horizontal advance of each character of `text`, in points.
    pub fn advances(&self, text: &str, role: FontRole, font_size: f32) -> Result<Vec<f32>> {
        let data = self.get(role)?;

        if data.bytes.is_empty() {
            let avg = if role == FontRole::HeaderBold { 0.55 } else { 0.5 };
            return Ok(text.chars().map(|_| font_size * avg).collect());
        }

        let face = ttf_parser::Face::parse(&data.bytes, 0)
            .map_err(|e| RenderError::Measurement(format!("{role} font: {e}")))?;
        let scale = font_size / data.units_per_em;
        let advances: Vec<f32> = text
            .chars()
            .map(|ch| match face.glyph_index(ch) {
                Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                // Fallback for missing glyph
                None => font_size * 0.5,
            })
            .collect();
        if advances.iter().any(|a| !a.is_finite() || *a < 0.0) {
            return Err(RenderError::Measurement(format!(
                "invalid glyph advance in {role} font"
            )));
        }
        Ok(advances)
    }

    /// Measure the width of a string at a given font size, in points.
    pub fn measure_text_width(&self, text: &str, role: FontRole, font_size: f32) -> Result<f32> {
        Ok(self.advances(text, role, font_size)?.iter().sum())
    }

    /// Ascender height in points.
    pub fn ascender_pt(&self, role: FontRole, font_size: f32) -> Result<f32> {
        let data = self.get(role)?;
        Ok(data.ascender * font_size / data.units_per_em)
    }

    /// Font bytes for embedding in the PDF; `None` for synthetic metrics.
    pub fn font_bytes(&self, role: FontRole) -> Option<&[u8]> {
        self.fonts.get(&role).and_then(|d| {
            if d.bytes.is_empty() {
                None
            } else {
                Some(d.bytes.as_slice())
            }
        })
    }
}

/// Word-wrap text to fit within `max_width` points. Returns the lines.
///
/// Breaks at spaces; a single word wider than the line is broken between
/// characters. Empty input gives one empty line.
pub fn wrap_text(
    text: &str,
    role: FontRole,
    font_size: f32,
    max_width: f32,
    fonts: &FontSet,
) -> Result<Vec<String>> {
    if !max_width.is_finite() {
        return Err(RenderError::Measurement(format!(
            "invalid wrap width {max_width}"
        )));
    }
    if max_width <= 0.0 || text.is_empty() {
        return Ok(vec![text.to_string()]);
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split(' ').filter(|w| !w.is_empty()).collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{current_line} {word}")
            };
            if fonts.measure_text_width(&candidate, role, font_size)? <= max_width {
                current_line = candidate;
                continue;
            }
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            // The word alone may still be too wide.
            let mut rest = word;
            loop {
                let head = clip_to_width(rest, role, font_size, max_width, fonts)?;
                // Always make progress, even if one character does not fit.
                let take = if head.is_empty() {
                    rest.chars().next().map_or(0, char::len_utf8)
                } else {
                    head.len()
                };
                if take >= rest.len() {
                    current_line = rest.to_string();
                    break;
                }
                lines.push(rest[..take].to_string());
                rest = &rest[take..];
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    Ok(lines)
}

/// The longest prefix of `text` that fits within `max_width` points.
pub fn clip_to_width<'a>(
    text: &'a str,
    role: FontRole,
    font_size: f32,
    max_width: f32,
    fonts: &FontSet,
) -> Result<&'a str> {
    let advances = fonts.advances(text, role, font_size)?;
    let mut width = 0.0f32;
    for ((idx, _), advance) in text.char_indices().zip(advances) {
        width += advance;
        if width > max_width {
            return Ok(&text[..idx]);
        }
    }
    Ok(text)
}
