//! Remote folder catalog entries
//!
//! A [`Folder`] is one line of a LIST response: the server-reported
//! name, the hierarchy delimiter and the attribute flags
//! (`\HasNoChildren`, `\HasChildren`, ...).

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Delimiter recorded for entries whose LIST line carries `NIL`.
pub const NIL_DELIMITER_FALLBACK: &str = ".";

/// A remote mailbox folder as reported by LIST.
///
/// # Examples
///
/// ```
/// use mailbox_archiver::Folder;
///
/// let inbox = Folder::new("INBOX", Some("/"), ["\\HasNoChildren"]);
/// assert!(inbox.is_inbox());
/// assert_eq!(inbox.delimiter, "/");
///
/// let odd = Folder::new("Notes", None, std::iter::empty::<&str>());
/// assert_eq!(odd.delimiter, ".");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    pub name: String,
    pub delimiter: String,
    pub flags: BTreeSet<String>,
}

impl Folder {
    #[must_use]
    pub fn new<I, F>(name: impl Into<String>, delimiter: Option<&str>, flags: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            name: name.into(),
            delimiter: delimiter
                .filter(|d| !d.is_empty())
                .unwrap_or(NIL_DELIMITER_FALLBACK)
                .to_string(),
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// INBOX is case-insensitive in IMAP (RFC 3501 5.1).
    #[must_use]
    pub fn is_inbox(&self) -> bool {
        self.name.eq_ignore_ascii_case("INBOX")
    }

    /// Whether this entry has the given name, honouring INBOX's
    /// case-insensitivity.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        if name.eq_ignore_ascii_case("INBOX") {
            self.is_inbox()
        } else {
            self.name == name
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self.flags.iter().cloned().collect::<Vec<_>>().join(" ");
        write!(
            f,
            "{} (Delimiter: '{}', Flags: {})",
            self.name, self.delimiter, flags
        )
    }
}
