//! Document composer – lays out the header table, the separator rule and the
//! colour-tagged body onto pages.
//!
//! Handles:
//! - label column sized by the widest bold label
//! - word-wrapped header values beside an optional avatar
//! - body lines clipped (not wrapped) to the content width
//! - page breaks when the cursor passes the bottom margin

use std::path::Path;

use crate::classify::body_lines;
use crate::email::{AddressRows, Email};
use crate::error::Result;
use crate::fonts::{clip_to_width, wrap_text, FontRole, FontSet};
use crate::layout_config::*;
use crate::options::PageSize;

/// Page margin on every side, in points.
pub const PAGE_MARGIN_PT: f32 = 50.0;
/// Edge length of the square avatar.
pub const AVATAR_SIZE_PT: f32 = 50.0;

const HEADER_FONT_SIZE: f32 = 9.0;
const HEADER_LINE_HEIGHT: f32 = 11.0;
/// Space between the label column and the value column.
const LABEL_GAP: f32 = 5.0;
/// Space between the last header line and the separator.
const SEPARATOR_GAP: f32 = 5.0;
const SEPARATOR_THICKNESS: f32 = 0.5;
/// Space between the separator and the first body line.
const BODY_GAP: f32 = 20.0;
const BODY_FONT_SIZE: f32 = 9.0;
const BODY_LINE_HEIGHT: f32 = 12.0;

/// Page lifecycle while laying out the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    ActivePage,
    NeedsNewPage,
}

/// Accumulates pages and tracks the vertical cursor.
struct Composer {
    layout: DocumentLayout,
    current: PageLayout,
    y: f32,
}

impl Composer {
    fn new(title: String, page: PageSize) -> Self {
        Self {
            layout: DocumentLayout {
                title,
                page_width_pt: page.width,
                page_height_pt: page.height,
                header: HeaderColumns::default(),
                pages: Vec::new(),
            },
            current: PageLayout::default(),
            y: PAGE_MARGIN_PT,
        }
    }

    fn push(&mut self, item: LayoutItem) {
        self.current.items.push(item);
    }

    fn new_page(&mut self) {
        let next = PageLayout {
            page_index: self.current.page_index + 1,
            items: Vec::new(),
        };
        self.layout
            .pages
            .push(std::mem::replace(&mut self.current, next));
        self.y = PAGE_MARGIN_PT;
        log::debug!("page break, starting page {}", self.current.page_index + 1);
    }

    fn finish(mut self) -> DocumentLayout {
        self.layout.pages.push(self.current);
        self.layout
    }
}

/// Lay out `email` on pages of the given size.
///
/// `avatar` is the image that will be drawn in the top-right corner, if
/// any; the header values make room for it.
pub fn compose_layout(
    email: &Email,
    page: PageSize,
    fonts: &FontSet,
    avatar: Option<&Path>,
) -> Result<DocumentLayout> {
    let title = if email.subject.is_empty() {
        "mailprint output".to_string()
    } else {
        email.subject.clone()
    };
    let mut c = Composer::new(title, page);

    if let Some(path) = avatar {
        c.push(LayoutItem::Image(ImageBox {
            path: path.to_path_buf(),
            x: page.width - PAGE_MARGIN_PT - AVATAR_SIZE_PT,
            y: PAGE_MARGIN_PT,
            width: AVATAR_SIZE_PT,
            height: AVATAR_SIZE_PT,
        }));
    }

    layout_header(&mut c, email, page, fonts, avatar.is_some())?;
    layout_body(&mut c, email, page, fonts)?;

    Ok(c.finish())
}

fn layout_header(
    c: &mut Composer,
    email: &Email,
    page: PageSize,
    fonts: &FontSet,
    has_avatar: bool,
) -> Result<()> {
    let rows = email.header_rows(AddressRows::Joined);

    let mut label_widths = Vec::with_capacity(rows.len());
    for row in &rows {
        label_widths.push(fonts.measure_text_width(
            &row.label,
            FontRole::HeaderBold,
            HEADER_FONT_SIZE,
        )?);
    }
    let label_width = label_widths.iter().copied().fold(0.0f32, f32::max);

    let value_x = PAGE_MARGIN_PT + label_width + LABEL_GAP;
    let mut value_width = page.width - value_x - PAGE_MARGIN_PT;
    if has_avatar {
        value_width -= AVATAR_SIZE_PT;
    }
    c.layout.header = HeaderColumns {
        label_width,
        value_x,
        value_width,
    };

    c.y = PAGE_MARGIN_PT;
    for (i, (row, w)) in rows.iter().zip(label_widths).enumerate() {
        // Labels are right-aligned within the label column.
        c.push(LayoutItem::Text(TextRun {
            kind: TextKind::HeaderLabel,
            row: Some(i),
            x: PAGE_MARGIN_PT + label_width - w,
            y: c.y,
            text: row.label.clone(),
            font: FontRole::HeaderBold,
            font_size: HEADER_FONT_SIZE,
            color: [0, 0, 0],
        }));

        let lines = wrap_text(
            &row.value,
            FontRole::Header,
            HEADER_FONT_SIZE,
            value_width,
            fonts,
        )?;
        let line_count = lines.len().max(1);
        for (j, line) in lines.into_iter().enumerate() {
            c.push(LayoutItem::Text(TextRun {
                kind: TextKind::HeaderValue,
                row: Some(i),
                x: value_x,
                y: c.y + j as f32 * HEADER_LINE_HEIGHT,
                text: line,
                font: FontRole::Header,
                font_size: HEADER_FONT_SIZE,
                color: [0, 0, 0],
            }));
        }
        c.y += line_count as f32 * HEADER_LINE_HEIGHT;
    }

    let rule_y = c.y + SEPARATOR_GAP;
    c.push(LayoutItem::Rule(HorizontalRule {
        x1: PAGE_MARGIN_PT,
        x2: page.width - PAGE_MARGIN_PT,
        y: rule_y,
        thickness: SEPARATOR_THICKNESS,
    }));
    c.y = rule_y + BODY_GAP;
    Ok(())
}

/// Body lines are clipped to one visual line each; unlike header values
/// they are never wrapped.
fn layout_body(c: &mut Composer, email: &Email, page: PageSize, fonts: &FontSet) -> Result<()> {
    let max_width = page.width - 2.0 * PAGE_MARGIN_PT;
    let bottom = page.height - PAGE_MARGIN_PT;
    let mut state = PageState::ActivePage;

    for line in body_lines(&email.text_body) {
        if c.y > bottom {
            state = PageState::NeedsNewPage;
        }
        if state == PageState::NeedsNewPage {
            c.new_page();
            state = PageState::ActivePage;
        }

        let text = clip_to_width(&line.text, FontRole::Content, BODY_FONT_SIZE, max_width, fonts)?;
        c.push(LayoutItem::Text(TextRun {
            kind: TextKind::Body,
            row: None,
            x: PAGE_MARGIN_PT,
            y: c.y,
            text: text.to_string(),
            font: FontRole::Content,
            font_size: BODY_FONT_SIZE,
            color: line.color.rgb(),
        }));
        c.y += BODY_LINE_HEIGHT;
    }
    Ok(())
}
