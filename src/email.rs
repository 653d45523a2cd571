//! The read-only email view shared by both rendering backends.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Date format used in the header block of both backends.
///
/// RFC 1123 with a numeric zone; month and weekday names are fixed English
/// abbreviations, so the output does not depend on the process locale.
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// A parsed email, already decoded to plain UTF-8 text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub subject: String,
    #[serde(default)]
    pub from: Vec<Address>,
    #[serde(default)]
    pub to: Vec<Address>,
    #[serde(default)]
    pub cc: Vec<Address>,
    /// `None` when the message carries no usable Date header.
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub text_body: String,
}

/// A mailbox: optional display name plus the address itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub name: Option<String>,
    pub address: String,
}

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }
}

impl fmt::Display for Address {
    /// `Name <address>` when a non-empty name is present, the bare address otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => write!(f, "{name} <{}>", self.address),
            _ => f.write_str(&self.address),
        }
    }
}

/// Comma-join a list of addresses, preserving order.
pub fn format_addresses(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a message date for the header block.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// How address lists are turned into header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRows {
    /// One row per header, addresses comma-joined.
    Joined,
    /// One row per address; only the first row of a group carries the label.
    OnePerAddress,
}

/// One label/value line of the header block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRow {
    pub label: String,
    pub value: String,
}

impl HeaderRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

impl Email {
    /// Build the header rows in their fixed order: Subject, From, To, Cc
    /// (only when non-empty) and Date (only when present).
    pub fn header_rows(&self, mode: AddressRows) -> Vec<HeaderRow> {
        let mut rows = vec![HeaderRow::new("Subject:", self.subject.as_str())];
        push_address_rows(&mut rows, "From:", &self.from, mode);
        push_address_rows(&mut rows, "To:", &self.to, mode);
        if !self.cc.is_empty() {
            push_address_rows(&mut rows, "Cc:", &self.cc, mode);
        }
        if let Some(date) = &self.date {
            rows.push(HeaderRow::new("Date:", format_date(date)));
        }
        rows
    }
}

fn push_address_rows(rows: &mut Vec<HeaderRow>, label: &str, list: &[Address], mode: AddressRows) {
    match mode {
        AddressRows::Joined => rows.push(HeaderRow::new(label, format_addresses(list))),
        AddressRows::OnePerAddress => {
            for (i, addr) in list.iter().enumerate() {
                let label = if i == 0 { label } else { "" };
                rows.push(HeaderRow::new(label, addr.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Email {
        Email {
            subject: "Re: Budget".to_string(),
            from: vec![Address::with_name("A", "a@x.com")],
            to: vec![Address::new("b@x.com"), Address::with_name("C", "c@x.com")],
            ..Email::default()
        }
    }

    #[test]
    fn address_display() {
        assert_eq!(Address::with_name("A", "a@x.com").to_string(), "A <a@x.com>");
        assert_eq!(Address::new("b@x.com").to_string(), "b@x.com");
        assert_eq!(Address::with_name("", "b@x.com").to_string(), "b@x.com");
    }

    #[test]
    fn joined_rows_skip_cc_and_date() {
        let rows = sample().header_rows(AddressRows::Joined);
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Subject:", "From:", "To:"]);
        assert_eq!(rows[2].value, "b@x.com, C <c@x.com>");
    }

    #[test]
    fn one_row_per_address() {
        let mut em = sample();
        em.cc = vec![Address::new("d@x.com")];
        let rows = em.header_rows(AddressRows::OnePerAddress);
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Subject:", "From:", "To:", "", "Cc:"]);
        assert_eq!(rows[3].value, "C <c@x.com>");
    }

    #[test]
    fn empty_list_has_no_row_per_address() {
        let mut em = sample();
        em.from.clear();
        let rows = em.header_rows(AddressRows::OnePerAddress);
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Subject:", "To:", ""]);

        // The joined table still shows the label with an empty value.
        let rows = em.header_rows(AddressRows::Joined);
        assert_eq!(rows[1].label, "From:");
        assert_eq!(rows[1].value, "");
    }

    #[test]
    fn date_row_is_locale_independent() {
        let mut em = sample();
        em.date = DateTime::parse_from_rfc3339("2024-03-05T09:07:02+01:00").ok();
        let rows = em.header_rows(AddressRows::Joined);
        let last = rows.last().unwrap();
        assert_eq!(last.label, "Date:");
        assert_eq!(last.value, "Tue, 05 Mar 2024 09:07:02 +0100");
    }
}
