//! Error types for the rendering backends and the message parser.

use std::path::PathBuf;

use thiserror::Error;

use crate::fonts::FontRole;

/// Errors produced while rendering an email.
///
/// Every variant except [`RenderError::Io`] is raised before a single byte
/// reaches the output sink.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Render options could not be loaded.
    #[error("invalid render options: {0}")]
    Config(String),

    /// The page format is not one of the supported sizes.
    #[error("unsupported page format {0:?} (expected A4 or Letter)")]
    UnsupportedPageFormat(String),

    /// A font file could not be read.
    #[error("failed to read {role} font '{}': {source}", path.display())]
    FontLoad {
        role: FontRole,
        path: PathBuf,
        source: std::io::Error,
    },

    /// A font file was read but is not a usable TrueType/OpenType face.
    #[error("failed to parse {role} font '{}'", path.display())]
    FontParse { role: FontRole, path: PathBuf },

    /// A font has no embeddable TrueType/OpenType data.
    #[error("failed to embed {0} font")]
    FontEmbed(FontRole),

    /// Text width or wrap computation failed.
    #[error("text measurement failed: {0}")]
    Measurement(String),

    /// Writing the finished document to the sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, RenderError>`.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors produced while turning a raw RFC 5322 message into an [`Email`].
///
/// [`Email`]: crate::email::Email
#[derive(Error, Debug)]
pub enum ParseError {
    /// The bytes could not be parsed as a message at all.
    #[error("input is not a parseable email message")]
    Malformed,

    /// The message has no text/plain part.
    #[error("message has no plain text body")]
    MissingTextBody,

    /// The Date header is present but cannot be represented.
    #[error("invalid Date header: {0}")]
    InvalidDate(String),
}
