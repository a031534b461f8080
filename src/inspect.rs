//! Message inspection: header fetch, tolerant decoding, lenient dates
//!
//! Nothing here fails past its boundary. Every problem becomes a
//! [`Diagnostic`] and the message is left out of the migration.

use crate::report::{Diagnostic, Operation};
use crate::store::{MailStore, Uid};
use chrono::{DateTime, Datelike, NaiveDateTime};
use mailparse::{MailHeader, MailHeaderMap};
use serde::Serialize;
use tracing::debug;

/// What classification needs to know about a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageInfo {
    pub uid: Uid,
    /// Wall-clock time from the Date header, offset dropped.
    pub date: NaiveDateTime,
    pub subject: String,
    pub sender: String,
}

/// Fetch the header block of `uid` from the selected `folder` and
/// inspect it.
pub async fn inspect<S: MailStore>(
    store: &mut S,
    folder: &str,
    uid: Uid,
    max_valid_year: i32,
) -> Result<MessageInfo, Diagnostic> {
    let raw = store
        .fetch_header(uid)
        .await
        .map_err(|e| Diagnostic::message(Operation::Fetch, folder, uid, e.to_string()))?;
    inspect_header(folder, uid, &raw, max_valid_year)
}

/// Decode subject, sender and date from a raw header block.
///
/// Messages without a Date header, with one that cannot be parsed, or
/// dated after `max_valid_year` are excluded.
pub fn inspect_header(
    folder: &str,
    uid: Uid,
    raw: &[u8],
    max_valid_year: i32,
) -> Result<MessageInfo, Diagnostic> {
    let (headers, _) = mailparse::parse_headers(raw).map_err(|e| {
        Diagnostic::message(Operation::Header, folder, uid, format!("unparseable headers: {e}"))
    })?;

    let subject = decode_field(&headers, "Subject", uid).unwrap_or_else(|| "No Subject".to_string());
    let sender = decode_field(&headers, "From", uid).unwrap_or_else(|| "No Sender".to_string());

    let Some(raw_date) = decode_field(&headers, "Date", uid) else {
        return Err(Diagnostic::message(
            Operation::Date,
            folder,
            uid,
            format!("no date header (subject: {subject}, sender: {sender})"),
        ));
    };

    let Some(date) = parse_date(&raw_date) else {
        return Err(Diagnostic::message(
            Operation::Date,
            folder,
            uid,
            format!("unparseable date '{raw_date}' (subject: {subject}, sender: {sender})"),
        ));
    };

    debug!(
        "Message {} date: {}, subject: {}, sender: {}",
        uid, raw_date, subject, sender
    );

    if date.year() > max_valid_year {
        return Err(Diagnostic::message(
            Operation::Date,
            folder,
            uid,
            format!("invalid year {} (subject: {subject}, sender: {sender})", date.year()),
        ));
    }

    Ok(MessageInfo {
        uid,
        date,
        subject,
        sender,
    })
}

/// Decode one header field.
///
/// Strict UTF-8 decoding first; on failure the raw bytes are transcoded
/// lossily (Latin-1) so there is always something to show. Returns
/// `None` for absent or blank fields.
fn decode_field(headers: &[MailHeader<'_>], key: &str, uid: Uid) -> Option<String> {
    let header = headers.get_first_header(key)?;
    let value = header.get_value_utf8().unwrap_or_else(|e| {
        debug!("Failed to decode {} for message {}: {}", key, uid, e);
        header.get_value()
    });
    let value = value.trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// Parse a Date header leniently into a timezone-naive timestamp.
///
/// Tries RFC 2822 (keeping the sender's wall-clock time), then
/// RFC 3339, then `mailparse`'s forgiving date grammar (UTC).
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    let epoch = mailparse::dateparse(trimmed).ok()?;
    DateTime::from_timestamp(epoch, 0).map(|dt| dt.naive_utc())
}
