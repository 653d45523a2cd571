//! Pipeline – ties together option resolution, font loading, avatar
//! decoding, layout and rendering into single function calls.

use std::io::Write;

use crate::compose::compose_layout;
use crate::email::Email;
use crate::error::Result;
use crate::fonts::FontSet;
use crate::layout_config::DocumentLayout;
use crate::options::RenderOptions;
use crate::render::{load_avatar, render_pdf, AvatarImage};

/// Everything resolved from [`RenderOptions`] before layout starts.
struct Prepared {
    fonts: FontSet,
    avatar: Option<AvatarImage>,
    layout: DocumentLayout,
}

fn prepare(email: &Email, opts: &RenderOptions) -> Result<Prepared> {
    // Configuration errors surface here, before any output exists.
    let format = opts.resolve_page_format()?;
    let fonts = FontSet::load(&opts.font_paths)?;
    let avatar = opts.logo().and_then(load_avatar);

    let layout = compose_layout(
        email,
        format.size(),
        &fonts,
        avatar.as_ref().map(|a| a.path.as_path()),
    )?;
    Ok(Prepared {
        fonts,
        avatar,
        layout,
    })
}

/// Full pipeline: email → PDF bytes.
pub fn generate_pdf(email: &Email, opts: &RenderOptions) -> Result<Vec<u8>> {
    let p = prepare(email, opts)?;
    render_pdf(&p.layout, &p.fonts, p.avatar.as_ref())
}

/// Render `email` as a PDF into `w`.
///
/// On error nothing has been written.
pub fn render_pdf_to<W: Write>(email: &Email, opts: &RenderOptions, w: &mut W) -> Result<()> {
    let bytes = generate_pdf(email, opts)?;
    w.write_all(&bytes)?;
    Ok(())
}

/// Generate only the layout (no PDF rendering) – useful for testing and for
/// the `layout` output format.
pub fn compute_layout(email: &Email, opts: &RenderOptions) -> Result<DocumentLayout> {
    Ok(prepare(email, opts)?.layout)
}
