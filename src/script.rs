//! Script backend – renders an [`Email`] as a groff `mom` script.
//!
//! The email is first turned into an ordered list of typed [`Directive`]s,
//! then [`serialize`] writes them in mom syntax. The script still has to be
//! piped through `preconv | groff -mom -Tpdf` to become a PDF.

use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;

use crate::classify::{body_lines, escape, ColorState, ColorTag};
use crate::email::{AddressRows, Email, HeaderRow};
use crate::error::Result;
use crate::options::{PageFormat, RenderOptions};

/// Page margin, in points.
const MARGIN_PT: u32 = 50;
/// Base point size of the document.
const BASE_FONT_SIZE: u32 = 10;
/// Edge length of the square avatar, in points.
const LOGO_SIZE_PT: u32 = 50;
/// Width of the header label column, in picas.
const LABEL_COLUMN_PICAS: u32 = 5;
/// Width of the header value column, in picas.
const VALUE_COLUMN_PICAS: u32 = 30;

/// A single instruction for the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    SetPageFormat(PageFormat),
    SetMargins { points: u32 },
    SetBaseFontSize(u32),
    DisableHyphenation,
    DisablePageNumbers,
    DefineColor(ColorTag),
    Start,
    PlaceImage { path: PathBuf, size: u32 },
    BeginHeaderTable,
    AddHeaderRow(HeaderRow),
    EndHeaderTable,
    BeginBody,
    SetBodyColor(ColorTag),
    EmitBodyLine(String),
    EndBody,
}

/// Build the directive sequence for `email`.
///
/// Fails only for configuration errors, before anything is written.
pub fn build_directives(email: &Email, opts: &RenderOptions) -> Result<Vec<Directive>> {
    let format = opts.resolve_page_format()?;

    let mut out = vec![
        Directive::SetPageFormat(format),
        Directive::SetMargins { points: MARGIN_PT },
        Directive::SetBaseFontSize(BASE_FONT_SIZE),
        Directive::DisableHyphenation,
        Directive::DisablePageNumbers,
    ];
    out.extend(ColorTag::palette().into_iter().map(Directive::DefineColor));
    out.push(Directive::Start);

    if let Some(logo) = opts.logo() {
        out.push(Directive::PlaceImage {
            path: logo.to_path_buf(),
            size: LOGO_SIZE_PT,
        });
    }

    out.push(Directive::BeginHeaderTable);
    out.extend(
        email
            .header_rows(AddressRows::OnePerAddress)
            .into_iter()
            .map(Directive::AddHeaderRow),
    );
    out.push(Directive::EndHeaderTable);

    out.push(Directive::BeginBody);
    let mut color = ColorState::default();
    for line in body_lines(&email.text_body) {
        if let Some(tag) = color.switch(line.color) {
            out.push(Directive::SetBodyColor(tag));
        }
        out.push(Directive::EmitBodyLine(line.text.into_owned()));
    }
    out.push(Directive::EndBody);

    Ok(out)
}

/// Serialise directives into mom macro syntax.
pub fn serialize(directives: &[Directive]) -> String {
    let mut s = String::new();
    for d in directives {
        match d {
            Directive::SetPageFormat(format) => {
                s.push_str(&format!(".PAPER {format}\n"));
            }
            Directive::SetMargins { points } => {
                for side in ["L", "R", "T", "B"] {
                    s.push_str(&format!(".{side}_MARGIN {points}p\n"));
                }
            }
            Directive::SetBaseFontSize(size) => s.push_str(&format!(".PT_SIZE {size}\n")),
            Directive::DisableHyphenation => s.push_str(".HY OFF\n"),
            Directive::DisablePageNumbers => s.push_str(".PAGINATE OFF\n"),
            Directive::DefineColor(tag) => {
                let [r, g, b] = tag.rgb();
                s.push_str(&format!(
                    ".NEWCOLOR {} RGB #{r:02x}{g:02x}{b:02x}\n",
                    tag.script_name()
                ));
            }
            Directive::Start => s.push_str(".START\n"),
            Directive::PlaceImage { path, size } => {
                s.push_str(&format!(
                    ".PDF_IMAGE -R {} {size}p {size}p\n.SP -{size}p\n",
                    path.display()
                ));
            }
            Directive::BeginHeaderTable => {
                s.push_str(&format!(".TAB_SET 1 0 {LABEL_COLUMN_PICAS}P R\n"));
                s.push_str(&format!(
                    ".TAB_SET 2 {LABEL_COLUMN_PICAS}P+1m {VALUE_COLUMN_PICAS}P L\n"
                ));
                s.push_str(".TAB 1\n");
            }
            Directive::AddHeaderRow(row) => {
                s.push_str(".FT B\n");
                s.push_str(&header_text(&row.label));
                s.push_str("\n.TN\n.FT R\n");
                s.push_str(&header_text(&row.value));
                s.push_str("\n.TN\n");
            }
            Directive::EndHeaderTable => s.push_str(".TQ\n"),
            // BR keeps input line breaks; long lines are still filled by groff.
            Directive::BeginBody => s.push_str(".SP\n.CODE BR\n"),
            Directive::SetBodyColor(tag) => {
                s.push_str(&format!(".COLOR {}\n", tag.script_name()));
            }
            Directive::EmitBodyLine(text) => {
                // An unterminated last line still needs a newline before `.CODE OFF`.
                s.push_str(&escape(text));
                s.push('\n');
            }
            Directive::EndBody => s.push_str(".CODE OFF\n.COLOR black\n"),
        }
    }
    s
}

/// Header cells are single, non-empty output lines.
fn header_text(text: &str) -> Cow<'_, str> {
    if text.is_empty() {
        // A blank input line would break the tab row.
        return Cow::Borrowed("\\&");
    }
    if text.contains(['\n', '\r']) {
        let flat = text.replace(['\n', '\r'], " ");
        return Cow::Owned(escape(&flat).into_owned());
    }
    escape(text)
}

/// Render `email` as a mom script into `w`.
///
/// Nothing is written unless the whole script could be composed.
pub fn render_script<W: Write>(email: &Email, opts: &RenderOptions, w: &mut W) -> Result<()> {
    let directives = build_directives(email, opts)?;
    let script = serialize(&directives);
    log::debug!(
        "composed mom script: {} directives, {} bytes",
        directives.len(),
        script.len()
    );
    w.write_all(script.as_bytes())?;
    Ok(())
}
