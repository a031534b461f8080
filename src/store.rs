//! The session protocol surface driven by the retention engine
//!
//! Every component talks to the mail store through [`MailStore`]. The
//! live implementation is [`ImapStore`](crate::ImapStore); simulation
//! wraps any store in [`DryRun`](crate::DryRun), which answers the
//! mutating calls itself.
//!
//! Message ids are UIDs of the currently selected folder. They are only
//! meaningful until the next SELECT/EXAMINE and must not be kept
//! across folder switches.

use crate::error::Result;
use crate::flag::Flag;
use crate::folder::Folder;
use chrono::NaiveDate;

/// A message UID within the selected folder.
pub type Uid = u32;

/// Synchronous request/response access to one authenticated mailbox.
///
/// Calls are issued strictly one after another; implementations never
/// need to handle concurrent use.
#[allow(async_fn_in_trait)]
pub trait MailStore {
    /// Whether mutating calls are answered without reaching the server.
    const SIMULATED: bool = false;

    /// LIST every folder. Entries the server reports but that cannot be
    /// parsed are logged and left out.
    async fn list_folders(&mut self) -> Result<Vec<Folder>>;

    /// SELECT a folder read-write.
    async fn select(&mut self, folder: &str) -> Result<()>;

    /// Open a folder read-only (EXAMINE). Stores without a read-only
    /// mode fall back to SELECT.
    async fn examine(&mut self, folder: &str) -> Result<()> {
        self.select(folder).await
    }

    /// The folder opened by the last successful SELECT/EXAMINE, if it
    /// is still open.
    fn selected(&self) -> Option<&str>;

    /// UIDs in the selected folder dated strictly before `cutoff`,
    /// in ascending order.
    async fn search_before(&mut self, cutoff: NaiveDate) -> Result<Vec<Uid>>;

    /// Raw header block of a message in the selected folder.
    async fn fetch_header(&mut self, uid: Uid) -> Result<Vec<u8>>;

    /// COPY a message from the selected folder to `destination`.
    async fn copy(&mut self, uid: Uid, destination: &str) -> Result<()>;

    /// STORE `+FLAGS` on a message in the selected folder.
    async fn add_flag(&mut self, uid: Uid, flag: &Flag) -> Result<()>;

    /// EXPUNGE the selected folder.
    async fn expunge(&mut self) -> Result<()>;

    async fn create(&mut self, folder: &str) -> Result<()>;

    async fn delete(&mut self, folder: &str) -> Result<()>;

    /// CLOSE the selected folder (also drops `\Deleted` messages).
    async fn close(&mut self) -> Result<()>;

    async fn logout(&mut self) -> Result<()>;
}

/// Render a date the way IMAP SEARCH expects it (`1-Jan-2024`).
#[must_use]
pub fn imap_date(date: NaiveDate) -> String {
    date.format("%-d-%b-%Y").to_string()
}
