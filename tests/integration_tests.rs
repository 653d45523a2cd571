//! Integration tests for the mailprint backends.
//!
//! These tests validate:
//! - Header row selection (Cc / Date) in both backends
//! - Body colouring and tab expansion
//! - Script escaping of groff control characters
//! - PDF output exists and has valid format
//! - Configuration errors leave the sink untouched
//!
//! Tests that need real TrueType files look for common system fonts and
//! return early when none are installed.

use std::path::{Path, PathBuf};

use chrono::DateTime;

use mailprint::classify::ColorTag;
use mailprint::compose::{compose_layout, PAGE_MARGIN_PT};
use mailprint::fonts::FontSet;
use mailprint::layout_config::{DocumentLayout, TextKind};
use mailprint::{
    compute_layout, generate_pdf, render_pdf_to, render_script, Address, Email, FontPaths,
    PageFormat, RenderError, RenderOptions,
};

// =====================================================================
// Helper
// =====================================================================

const FONT_CANDIDATES: &[[&str; 3]] = &[
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    ],
    [
        "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSerif-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    ],
    [
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    ],
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    ],
];

fn system_fonts() -> Option<FontPaths> {
    let found = FONT_CANDIDATES
        .iter()
        .find(|set| set.iter().all(|p| Path::new(p).is_file()))
        .map(|[header, header_bold, content]| FontPaths {
            header: PathBuf::from(*header),
            header_bold: PathBuf::from(*header_bold),
            content: PathBuf::from(*content),
        });
    if found.is_none() {
        eprintln!("no system TrueType fonts found, skipping");
    }
    found
}

fn scenario_email() -> Email {
    Email {
        subject: "Re: Budget".to_string(),
        from: vec![Address::with_name("A", "a@x.com")],
        to: vec![Address::new("b@x.com")],
        text_body: "> quoted\nnormal\n+added\n-removed".to_string(),
        ..Email::default()
    }
}

fn heuristic_layout(email: &Email) -> DocumentLayout {
    compose_layout(email, PageFormat::A4.size(), &FontSet::heuristic(), None).unwrap()
}

fn script(email: &Email, opts: &RenderOptions) -> String {
    let mut out = Vec::new();
    render_script(email, opts, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

fn header_labels(layout: &DocumentLayout) -> Vec<String> {
    layout
        .text_runs()
        .filter(|r| r.kind == TextKind::HeaderLabel)
        .map(|r| r.text.clone())
        .collect()
}

// =====================================================================
// Document composer
// =====================================================================

#[test]
fn scenario_header_rows_and_body_colors() {
    let layout = heuristic_layout(&scenario_email());

    assert_eq!(layout.header_row_count(), 3);
    assert_eq!(header_labels(&layout), ["Subject:", "From:", "To:"]);

    let body: Vec<_> = layout.body_runs().collect();
    assert_eq!(body.len(), 4);
    let colors: Vec<_> = body.iter().map(|r| r.color).collect();
    assert_eq!(
        colors,
        [
            ColorTag::Quoted.rgb(),
            ColorTag::Normal.rgb(),
            ColorTag::Added.rgb(),
            ColorTag::Removed.rgb()
        ]
    );
    assert_eq!(colors[0], [100, 100, 100]);
    assert_eq!(colors[2], [0, 128, 0]);
    assert_eq!(colors[3], [255, 0, 0]);
}

#[test]
fn cc_and_date_rows_only_when_present() {
    let mut em = scenario_email();
    em.cc = vec![Address::new("c@x.com")];
    em.date = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z").ok();
    let layout = heuristic_layout(&em);
    assert_eq!(header_labels(&layout), ["Subject:", "From:", "To:", "Cc:", "Date:"]);
}

#[test]
fn body_follows_separator_and_tabs_are_expanded() {
    let layout = heuristic_layout(&Email {
        text_body: "a\tb".to_string(),
        ..scenario_email()
    });
    let first = layout.body_runs().next().unwrap();
    assert_eq!(first.text, "a       b");
    assert_eq!(first.x, PAGE_MARGIN_PT);
}

#[test]
fn long_body_spans_pages() {
    let body: String = (0..150).map(|i| format!("+line {i}\n")).collect();
    let layout = heuristic_layout(&Email {
        text_body: body,
        ..scenario_email()
    });
    assert!(layout.pages.len() >= 2);
    assert_eq!(layout.body_runs().count(), 150);
    let bottom = layout.page_height_pt - PAGE_MARGIN_PT;
    // A run is only placed while the cursor has not passed the bottom margin.
    assert!(layout.body_runs().all(|r| r.y <= bottom));
}

#[test]
fn unsupported_page_format_writes_zero_bytes() {
    let opts = RenderOptions {
        page_format: "Legal".to_string(),
        font_paths: system_fonts().unwrap_or_default(),
        ..RenderOptions::default()
    };
    let mut sink = Vec::new();
    let err = render_pdf_to(&scenario_email(), &opts, &mut sink).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedPageFormat(ref f) if f == "Legal"));
    assert!(sink.is_empty());
}

#[test]
fn pdf_with_system_fonts() {
    let Some(fonts) = system_fonts() else { return };
    let opts = RenderOptions {
        page_format: "A4".to_string(),
        logo_path: None,
        font_paths: fonts,
    };
    let mut sink = Vec::new();
    render_pdf_to(&scenario_email(), &opts, &mut sink).unwrap();
    assert_valid_pdf(&sink);
}

#[test]
fn letter_pdf_with_many_pages() {
    let Some(fonts) = system_fonts() else { return };
    let opts = RenderOptions {
        page_format: "letter".to_string(),
        logo_path: None,
        font_paths: fonts,
    };
    let body: String = (0..300).map(|i| format!("> line {i}\twith a tab\n")).collect();
    let em = Email {
        text_body: body,
        ..scenario_email()
    };
    let layout = compute_layout(&em, &opts).unwrap();
    assert_eq!(layout.page_width_pt, 612.0);
    assert!(layout.pages.len() > 1);
    assert_valid_pdf(&generate_pdf(&em, &opts).unwrap());
}

#[test]
fn broken_logo_degrades_to_no_avatar() {
    let Some(fonts) = system_fonts() else { return };
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("face.png");
    std::fs::write(&logo, b"not an image").unwrap();

    let opts = RenderOptions {
        page_format: "A4".to_string(),
        logo_path: Some(logo),
        font_paths: fonts,
    };
    let layout = compute_layout(&scenario_email(), &opts).unwrap();
    assert!(layout.image().is_none());
    let full = layout.page_width_pt - layout.header.value_x - PAGE_MARGIN_PT;
    assert_eq!(layout.header.value_width, full);
    assert_valid_pdf(&generate_pdf(&scenario_email(), &opts).unwrap());
}

#[test]
fn png_logo_is_placed_top_right() {
    let Some(fonts) = system_fonts() else { return };
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("face.png");
    image::RgbImage::from_pixel(8, 8, image::Rgb([20, 40, 200]))
        .save(&logo)
        .unwrap();

    let opts = RenderOptions {
        page_format: "A4".to_string(),
        logo_path: Some(logo.clone()),
        font_paths: fonts,
    };
    let layout = compute_layout(&scenario_email(), &opts).unwrap();
    let img = layout.image().expect("avatar placed");
    assert_eq!(img.path, logo);
    assert_eq!(img.y, PAGE_MARGIN_PT);
    assert!(img.x + img.width <= layout.page_width_pt - PAGE_MARGIN_PT + 0.01);
    assert_valid_pdf(&generate_pdf(&scenario_email(), &opts).unwrap());
}

// =====================================================================
// Script renderer
// =====================================================================

#[test]
fn script_escapes_control_subject() {
    let em = Email {
        subject: ".bp oops".to_string(),
        ..scenario_email()
    };
    let out = script(&em, &RenderOptions::default());
    assert!(out.contains("\n\\&.bp oops\n"));
    assert!(!out.contains("\n.bp oops"));
}

#[test]
fn script_escapes_body_lines() {
    let em = Email {
        text_body: ".sp 10\nC:\\temp".to_string(),
        ..scenario_email()
    };
    let out = script(&em, &RenderOptions::default());
    assert!(out.contains("\\&.sp 10\n"));
    assert!(out.contains("C:\\\\temp\n"));
}

#[test]
fn script_header_rows() {
    let out = script(&scenario_email(), &RenderOptions::default());
    assert!(out.contains("Subject:"));
    assert!(out.contains("A <a@x.com>"));
    assert!(!out.contains("Cc:"));
    assert!(!out.contains("Date:"));

    let em = Email {
        cc: vec![Address::new("c1@x.com"), Address::new("c2@x.com")],
        date: DateTime::parse_from_rfc3339("2024-03-05T09:07:02+01:00").ok(),
        ..scenario_email()
    };
    let out = script(&em, &RenderOptions::default());
    assert_eq!(out.matches("Cc:").count(), 1);
    assert!(out.contains("c2@x.com"));
    assert!(out.contains("Tue, 05 Mar 2024 09:07:02 +0100"));
}

#[test]
fn script_skips_empty_address_lists() {
    let em = Email {
        from: Vec::new(),
        ..scenario_email()
    };
    let out = script(&em, &RenderOptions::default());
    assert!(!out.contains("From:"));
    assert!(out.contains("To:"));
}

#[test]
fn script_colors_and_tabs() {
    let em = Email {
        text_body: "x\ty\n> q\n> q2\n+a".to_string(),
        ..scenario_email()
    };
    let out = script(&em, &RenderOptions::default());
    assert!(out.contains("x       y\n.COLOR quotedmail\n> q\n> q2\n.COLOR addedline\n+a\n"));
    assert_eq!(out.matches(".COLOR quotedmail").count(), 1);
}

#[test]
fn script_rejects_unknown_page_format() {
    let opts = RenderOptions {
        page_format: "Tabloid".to_string(),
        ..RenderOptions::default()
    };
    let mut sink = Vec::new();
    let err = render_script(&scenario_email(), &opts, &mut sink).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedPageFormat(_)));
    assert!(sink.is_empty());
}

#[test]
fn script_logo_directive_only_with_logo() {
    let out = script(&scenario_email(), &RenderOptions::default());
    assert!(!out.contains("PDF_IMAGE"));

    let opts = RenderOptions {
        logo_path: Some(PathBuf::from("/tmp/face.pdf")),
        ..RenderOptions::default()
    };
    let out = script(&scenario_email(), &opts);
    assert!(out.contains(".PDF_IMAGE -R /tmp/face.pdf"));
}
