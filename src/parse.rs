//! Message parsing: turns a raw RFC 5322 message into an [`Email`] view.
//!
//! Uses `mail-parser` for header decoding (RFC 2047 words, address lists,
//! dates) and MIME traversal.

use chrono::DateTime;
use mail_parser::{MessageParser, PartType};

use crate::email::{Address, Email};
use crate::error::ParseError;

/// Parse a complete raw message (headers + body).
///
/// Only the first text/plain part is used as body; HTML-only messages are
/// rejected with [`ParseError::MissingTextBody`].
pub fn parse_message(raw: &[u8]) -> Result<Email, ParseError> {
    let bytes = skip_from_line(raw);
    let msg = MessageParser::default()
        .parse(bytes)
        .ok_or(ParseError::Malformed)?;

    let date = match msg.date() {
        Some(dt) => {
            let rfc3339 = dt.to_rfc3339();
            let parsed = DateTime::parse_from_rfc3339(&rfc3339)
                .map_err(|_| ParseError::InvalidDate(rfc3339.clone()))?;
            Some(parsed)
        }
        None => None,
    };

    let text_body = msg
        .text_body
        .iter()
        .filter_map(|id| msg.part(*id))
        .find_map(|part| match &part.body {
            PartType::Text(text) => Some(text.as_ref()),
            _ => None,
        })
        .ok_or(ParseError::MissingTextBody)?;
    let text_body = text_body
        .strip_suffix("\r\n")
        .or_else(|| text_body.strip_suffix('\n'))
        .unwrap_or(text_body);

    Ok(Email {
        subject: msg.subject().unwrap_or_default().to_string(),
        from: addresses(msg.from()),
        to: addresses(msg.to()),
        cc: addresses(msg.cc()),
        date,
        text_body: text_body.to_string(),
    })
}

/// Flatten an address header, groups included, keeping header order.
fn addresses(header: Option<&mail_parser::Address<'_>>) -> Vec<Address> {
    let addrs: Vec<&mail_parser::Addr<'_>> = match header {
        Some(mail_parser::Address::List(list)) => list.iter().collect(),
        Some(mail_parser::Address::Group(groups)) => {
            groups.iter().flat_map(|g| g.addresses.iter()).collect()
        }
        None => Vec::new(),
    };
    addrs
        .into_iter()
        .filter_map(|a| {
            let address = a.address.as_deref()?;
            Some(Address {
                name: a.name.as_deref().filter(|n| !n.is_empty()).map(String::from),
                address: address.to_string(),
            })
        })
        .collect()
}

/// Strip a leading mbox `From ` separator line, if present.
fn skip_from_line(raw: &[u8]) -> &[u8] {
    if raw.starts_with(b"From ") {
        if let Some(pos) = raw.iter().position(|&b| b == b'\n') {
            return &raw[pos + 1..];
        }
    }
    raw
}
