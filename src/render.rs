//! PDF renderer – takes a [`DocumentLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API) with the three embedded TrueType faces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use printpdf::font::ParsedFont;
use printpdf::*;

use crate::error::{RenderError, Result};
use crate::fonts::{FontRole, FontSet};
use crate::layout_config::{DocumentLayout, HorizontalRule, ImageBox, LayoutItem, TextRun};

const PT_TO_MM: f32 = 0.352778;

/// A decoded avatar, ready to be embedded as an XObject.
pub struct AvatarImage {
    pub path: PathBuf,
    raw: RawImage,
    px_width: u32,
    px_height: u32,
}

/// Read and decode the avatar at `path`.
///
/// Any failure only means "no avatar": it is logged and `None` is returned.
pub fn load_avatar(path: &Path) -> Option<AvatarImage> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            log::info!("Skipping avatar '{}': {e}", path.display());
            return None;
        }
    };

    // Decode with the `image` crate to obtain pixel dimensions.
    let dyn_img = match ::image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            log::info!("Skipping avatar '{}': decode error: {e}", path.display());
            return None;
        }
    };

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let raw = match RawImage::decode_from_bytes(&bytes, &mut warnings) {
        Ok(r) => r,
        Err(e) => {
            log::info!("Skipping avatar '{}': PDF encode error: {e}", path.display());
            return None;
        }
    };

    Some(AvatarImage {
        path: path.to_path_buf(),
        raw,
        px_width: dyn_img.width(),
        px_height: dyn_img.height(),
    })
}

/// Render a DocumentLayout into PDF bytes.
///
/// Image boxes are drawn only when `avatar` matches their path.
pub fn render_pdf(
    layout: &DocumentLayout,
    fonts: &FontSet,
    avatar: Option<&AvatarImage>,
) -> Result<Vec<u8>> {
    let page_w = Mm(layout.page_width_pt * PT_TO_MM);
    let page_h = Mm(layout.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&layout.title);

    // ── Register fonts ────────────────────────────────────────────────────
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let mut font_ids: HashMap<FontRole, FontId> = HashMap::new();
    for role in FontRole::ALL {
        let bytes = fonts.font_bytes(role).ok_or(RenderError::FontEmbed(role))?;
        let parsed =
            ParsedFont::from_bytes(bytes, 0, &mut warnings).ok_or(RenderError::FontEmbed(role))?;
        font_ids.insert(role, doc.add_font(&parsed));
    }

    let mut ascenders: HashMap<(FontRole, u32), f32> = HashMap::new();
    for run in layout.text_runs() {
        let key = (run.font, run.font_size.to_bits());
        if !ascenders.contains_key(&key) {
            ascenders.insert(key, fonts.ascender_pt(run.font, run.font_size)?);
        }
    }

    let avatar_xobj = avatar.map(|a| (a, doc.add_image(&a.raw)));

    // ── Render pages ──────────────────────────────────────────────────────
    let mut pages = Vec::new();
    for page_layout in &layout.pages {
        let mut ops = Vec::new();
        for item in &page_layout.items {
            match item {
                LayoutItem::Text(run) => {
                    let ascender = ascenders
                        .get(&(run.font, run.font_size.to_bits()))
                        .copied()
                        .unwrap_or(run.font_size * 0.75);
                    render_text(&mut ops, run, &font_ids, layout.page_height_pt, ascender);
                }
                LayoutItem::Rule(rule) => render_rule(&mut ops, rule, layout.page_height_pt),
                LayoutItem::Image(img) => match &avatar_xobj {
                    Some((a, id)) if a.path == img.path => {
                        render_image(&mut ops, img, a, id, layout.page_height_pt)
                    }
                    _ => log::warn!("No decoded image for '{}', skipping", img.path.display()),
                },
            }
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());
    log::debug!("rendered {} page(s), {} bytes", layout.pages.len(), bytes.len());

    Ok(bytes)
}

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(Rgb {
        r: color[0] as f32 / 255.0,
        g: color[1] as f32 / 255.0,
        b: color[2] as f32 / 255.0,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn render_text(
    ops: &mut Vec<Op>,
    run: &TextRun,
    font_ids: &HashMap<FontRole, FontId>,
    page_height: f32,
    ascender: f32,
) {
    if run.text.is_empty() {
        return;
    }
    let Some(font) = font_ids.get(&run.font) else {
        return;
    };

    // PDF coordinate system: origin at bottom-left, y is the baseline.
    let baseline = page_height - run.y - ascender;

    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(run.x),
            y: Pt(baseline),
        },
    });
    ops.push(Op::SetFontSize {
        size: Pt(run.font_size),
        font: font.clone(),
    });
    ops.push(Op::SetFillColor {
        col: rgb(run.color),
    });
    ops.push(Op::WriteText {
        items: vec![TextItem::Text(run.text.clone())],
        font: font.clone(),
    });
    ops.push(Op::EndTextSection);
}

fn render_rule(ops: &mut Vec<Op>, rule: &HorizontalRule, page_height: f32) {
    let y = page_height - rule.y;
    ops.push(Op::SetOutlineColor { col: rgb([0, 0, 0]) });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(rule.thickness),
    });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![point(rule.x1, y), point(rule.x2, y)],
            is_closed: false,
        },
    });
}

fn render_image(
    ops: &mut Vec<Op>,
    img: &ImageBox,
    avatar: &AvatarImage,
    id: &XObjectId,
    page_height: f32,
) {
    // translate_y = bottom edge of image in PDF coordinates.
    let img_bottom_y = page_height - img.y - img.height;

    // At dpi=72 printpdf renders 1 px = 1 pt, so scale = desired_pt / px_dim.
    let scale_x = if avatar.px_width > 0 {
        img.width / avatar.px_width as f32
    } else {
        1.0
    };
    let scale_y = if avatar.px_height > 0 {
        img.height / avatar.px_height as f32
    } else {
        1.0
    };

    ops.push(Op::UseXobject {
        id: id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Pt(img.x)),
            translate_y: Some(Pt(img_bottom_y)),
            dpi: Some(72.0),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            rotate: None,
        },
    });
}
