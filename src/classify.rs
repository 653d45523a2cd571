//! Line classifier – splits a plain-text body into lines, tags every line
//! with a diff-style colour and expands tabs to 8-column stops.
//!
//! Both backends consume the same [`BodyLines`] iterator, so the PDF and the
//! groff output can never disagree on how a line is coloured or indented.
//! Escaping for groff lives here as well ([`escape`]) but is only applied by
//! the script backend.

use std::borrow::Cow;

/// Tab stops are every 8 columns, counted from the start of the line.
pub const TAB_WIDTH: usize = 8;

/// Per-line colour, decided by the first character of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorTag {
    #[default]
    Normal,
    Quoted,
    Added,
    Removed,
}

impl ColorTag {
    /// `>` quoted, `+` added, `-` removed, anything else (or nothing) normal.
    pub fn classify(line: &str) -> Self {
        match line.as_bytes().first() {
            Some(b'>') => ColorTag::Quoted,
            Some(b'+') => ColorTag::Added,
            Some(b'-') => ColorTag::Removed,
            _ => ColorTag::Normal,
        }
    }

    /// Text colour used for this tag, as 8-bit RGB.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            ColorTag::Normal => [0, 0, 0],
            ColorTag::Quoted => [100, 100, 100],
            ColorTag::Added => [0, 128, 0],
            ColorTag::Removed => [255, 0, 0],
        }
    }

    /// Colour name registered in the groff script.
    pub fn script_name(self) -> &'static str {
        match self {
            ColorTag::Normal => "black",
            ColorTag::Quoted => "quotedmail",
            ColorTag::Added => "addedline",
            ColorTag::Removed => "removedline",
        }
    }

    /// The tags that need a custom colour definition in the script.
    pub fn palette() -> [ColorTag; 3] {
        [ColorTag::Quoted, ColorTag::Added, ColorTag::Removed]
    }
}

/// One line of the body, ready for either backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLine<'a> {
    pub color: ColorTag,
    /// Line content with tabs expanded; no trailing newline.
    pub text: Cow<'a, str>,
}

/// Lazy iterator over the classified lines of a body.
///
/// A trailing `\n` does not produce an extra empty line, and an empty body
/// yields nothing.
#[derive(Debug, Clone)]
pub struct BodyLines<'a> {
    rest: &'a str,
}

/// Classify every line of `body`.
pub fn body_lines(body: &str) -> BodyLines<'_> {
    BodyLines { rest: body }
}

impl<'a> Iterator for BodyLines<'a> {
    type Item = BodyLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let raw = match self.rest.find('\n') {
            Some(pos) => {
                let raw = &self.rest[..pos];
                self.rest = &self.rest[pos + 1..];
                raw
            }
            None => std::mem::take(&mut self.rest),
        };
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        Some(BodyLine {
            color: ColorTag::classify(raw),
            text: expand_tabs(raw),
        })
    }
}

/// Replace every tab with spaces up to the next multiple of [`TAB_WIDTH`].
///
/// The column counter starts at 0 for the line and advances by one for
/// every other character, so consecutive tabs and tabs after text all land
/// on real tab stops.
pub fn expand_tabs(line: &str) -> Cow<'_, str> {
    if !line.contains('\t') {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            loop {
                out.push(' ');
                col += 1;
                if col % TAB_WIDTH == 0 {
                    break;
                }
            }
        } else {
            out.push(ch);
            col += 1;
        }
    }
    Cow::Owned(out)
}

/// Escape text so groff treats it literally.
///
/// Backslashes are doubled, and a leading control character (`.` or `'`)
/// is guarded with the zero-width `\&`.
pub fn escape(text: &str) -> Cow<'_, str> {
    let guard = text.starts_with('.') || text.starts_with('\'');
    if !guard && !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    if guard {
        out.push_str("\\&");
    }
    for ch in text.chars() {
        if ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    Cow::Owned(out)
}

/// Tracks the last emitted colour so a switch is only reported on change.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorState {
    current: ColorTag,
}

impl ColorState {
    /// Returns the new tag if it differs from the one currently active.
    pub fn switch(&mut self, tag: ColorTag) -> Option<ColorTag> {
        if self.current == tag {
            return None;
        }
        self.current = tag;
        Some(tag)
    }
}
