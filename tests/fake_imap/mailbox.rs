//! Test data model for the fake IMAP server
//!
//! Provides a builder-style API for constructing mailbox state:
//!
//! ```ignore
//! let mailbox = MailboxBuilder::new()
//!     .delimiter(".")
//!     .folder("INBOX")
//!         .email(1, false, raw_rfc2822_bytes)
//!         .received(2, date, raw_rfc2822_bytes)
//!     .folder("Archive.2015")
//!     .reject_create("Archive.2018")
//!     .build();
//! ```
//!
//! The `Mailbox` is shared with the fake IMAP server via `Arc` so the
//! server knows which folders exist, what emails they contain and
//! which flags are set. Every command the server receives is appended
//! to `journal` so tests can check what the client sent.

use chrono::NaiveDate;

/// A complete mailbox: named folders holding test emails, plus the
/// server's hierarchy delimiter.
#[derive(Debug, Clone)]
pub struct Mailbox {
    pub delimiter: String,
    pub folders: Vec<Folder>,
    /// CREATE for these names answers NO.
    pub reject_create: Vec<String>,
    /// Every command line received after the greeting, tag stripped.
    pub journal: Vec<String>,
}

impl Mailbox {
    /// Look up a folder by name (case-sensitive except INBOX, matching
    /// real IMAP).
    pub fn get_folder(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| same_name(&f.name, name))
    }

    pub fn get_folder_mut(&mut self, name: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| same_name(&f.name, name))
    }

    /// Add an empty folder. Fails if it exists or is rejected.
    pub fn create_folder(&mut self, name: &str) -> Result<(), &'static str> {
        if self.reject_create.iter().any(|r| r == name) {
            return Err("Invalid mailbox name");
        }
        if self.get_folder(name).is_some() {
            return Err("Mailbox already exists");
        }
        self.folders.push(Folder {
            name: name.to_string(),
            emails: Vec::new(),
        });
        Ok(())
    }

    /// Remove a folder and everything in it.
    pub fn delete_folder(&mut self, name: &str) -> Result<(), &'static str> {
        let before = self.folders.len();
        self.folders.retain(|f| !same_name(&f.name, name));
        if self.folders.len() == before {
            Err("No such mailbox")
        } else {
            Ok(())
        }
    }

    /// Journal entries starting with `prefix`.
    pub fn commands(&self, prefix: &str) -> Vec<&str> {
        self.journal
            .iter()
            .map(String::as_str)
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    if a.eq_ignore_ascii_case("INBOX") {
        b.eq_ignore_ascii_case("INBOX")
    } else {
        a == b
    }
}

/// A single IMAP folder (e.g. "INBOX", "Archive.2015").
#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub emails: Vec<TestEmail>,
}

impl Folder {
    /// UID the next appended message gets.
    pub fn next_uid(&self) -> u32 {
        self.emails.iter().map(|e| e.uid).max().map_or(1, |max| max + 1)
    }
}

/// A test email stored in a folder.
///
/// - `uid`: IMAP UID, unique per folder.
/// - `seen` / `deleted`: the `\Seen` and `\Deleted` flags.
/// - `internal_date`: the date the server received the message. SEARCH
///   BEFORE uses it when set and falls back to the Date header.
/// - `raw`: the complete RFC 2822 message (headers + body) as bytes.
#[derive(Debug, Clone)]
pub struct TestEmail {
    pub uid: u32,
    pub seen: bool,
    pub deleted: bool,
    pub internal_date: Option<NaiveDate>,
    pub raw: Vec<u8>,
}

impl TestEmail {
    /// The header block, up to and including the blank line.
    pub fn header(&self) -> &[u8] {
        self.raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map_or(&self.raw[..], |pos| &self.raw[..pos + 4])
    }
}

/// Builder for constructing a `Mailbox` step by step.
///
/// Call `.folder(name)` to start a new folder, then chain
/// `.email(uid, seen, raw)` calls to add messages to it.
/// Finish with `.build()` to get the final `Mailbox`.
pub struct MailboxBuilder {
    delimiter: String,
    folders: Vec<Folder>,
    reject_create: Vec<String>,
}

impl MailboxBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: "/".to_string(),
            folders: Vec::new(),
            reject_create: Vec::new(),
        }
    }

    /// Hierarchy delimiter reported by LIST (default `/`).
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    /// Add a new folder. Subsequent `.email()` calls add to this folder.
    pub fn folder(mut self, name: &str) -> Self {
        self.folders.push(Folder {
            name: name.to_string(),
            emails: Vec::new(),
        });
        self
    }

    /// Add an email to the most recently added folder.
    ///
    /// # Panics
    ///
    /// Panics if called before any `.folder()` call.
    pub fn email(self, uid: u32, seen: bool, raw: &[u8]) -> Self {
        self.push(TestEmail {
            uid,
            seen,
            deleted: false,
            internal_date: None,
            raw: raw.to_vec(),
        })
    }

    /// Add an email with an explicit internal date.
    pub fn received(self, uid: u32, internal_date: NaiveDate, raw: &[u8]) -> Self {
        self.push(TestEmail {
            uid,
            seen: true,
            deleted: false,
            internal_date: Some(internal_date),
            raw: raw.to_vec(),
        })
    }

    /// Make CREATE fail for `name`.
    pub fn reject_create(mut self, name: &str) -> Self {
        self.reject_create.push(name.to_string());
        self
    }

    fn push(mut self, email: TestEmail) -> Self {
        self.folders
            .last_mut()
            .expect("call .folder() before .email()")
            .emails
            .push(email);
        self
    }

    /// Consume the builder and return the finished `Mailbox`.
    pub fn build(self) -> Mailbox {
        Mailbox {
            delimiter: self.delimiter,
            folders: self.folders,
            reject_create: self.reject_create,
            journal: Vec::new(),
        }
    }
}
