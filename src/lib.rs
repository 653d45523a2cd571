//! # mailprint – printable renderings of email messages
//!
//! This crate turns a parsed email into either a self-contained PDF or a
//! groff `mom` script. Quoted, added and removed lines are coloured
//! diff-style in both outputs. The stages are:
//!
//! 1. **Classify** – split the body into colour-tagged, tab-expanded lines ([`classify`])
//! 2. **Script** – emit typed directives and serialise them as mom macros ([`script`])
//! 3. **Compose** – measure, wrap and paginate the header and body ([`compose`])
//! 4. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! [`parse`] builds the [`Email`] view from a raw RFC 5322 message.

pub mod classify;
pub mod compose;
pub mod email;
pub mod error;
pub mod fonts;
pub mod layout_config;
pub mod options;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod script;

// Re-exports for convenience
pub use email::{Address, Email};
pub use error::{ParseError, RenderError};
pub use options::{FontPaths, PageFormat, RenderOptions};
pub use pipeline::{compute_layout, generate_pdf, render_pdf_to};
pub use script::render_script;
