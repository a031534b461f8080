//! Simulation Mode
//!
//! [`DryRun`] wraps any [`MailStore`]. Reads go to the wrapped store
//! (with SELECT downgraded to EXAMINE), every mutating call is logged
//! with a `dry run:` prefix and reported as successful without reaching
//! the store. The engine runs unchanged on top of it, so the decisions
//! logged are the ones a live run would make.
//!
//! [`PlaceholderStore`] stands in for a server when no connection is
//! wanted.

use crate::error::{Error, Result};
use crate::flag::Flag;
use crate::folder::Folder;
use crate::store::{MailStore, Uid, imap_date};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tracing::info;

/// Non-mutating view of a store.
#[derive(Debug)]
pub struct DryRun<S> {
    inner: S,
}

impl<S: MailStore> DryRun<S> {
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: MailStore> MailStore for DryRun<S> {
    const SIMULATED: bool = true;

    async fn list_folders(&mut self) -> Result<Vec<Folder>> {
        self.inner.list_folders().await
    }

    async fn select(&mut self, folder: &str) -> Result<()> {
        self.inner.examine(folder).await
    }

    async fn examine(&mut self, folder: &str) -> Result<()> {
        self.inner.examine(folder).await
    }

    fn selected(&self) -> Option<&str> {
        self.inner.selected()
    }

    async fn search_before(&mut self, cutoff: NaiveDate) -> Result<Vec<Uid>> {
        self.inner.search_before(cutoff).await
    }

    async fn fetch_header(&mut self, uid: Uid) -> Result<Vec<u8>> {
        self.inner.fetch_header(uid).await
    }

    async fn copy(&mut self, uid: Uid, destination: &str) -> Result<()> {
        info!(
            "dry run: would copy message {} from {} to {}",
            uid,
            self.inner.selected().unwrap_or("?"),
            destination
        );
        Ok(())
    }

    async fn add_flag(&mut self, uid: Uid, flag: &Flag) -> Result<()> {
        info!("dry run: would flag message {} as {}", uid, flag);
        Ok(())
    }

    async fn expunge(&mut self) -> Result<()> {
        info!(
            "dry run: would expunge {}",
            self.inner.selected().unwrap_or("?")
        );
        Ok(())
    }

    async fn create(&mut self, folder: &str) -> Result<()> {
        info!("dry run: would create folder {}", folder);
        Ok(())
    }

    async fn delete(&mut self, folder: &str) -> Result<()> {
        info!("dry run: would delete folder {}", folder);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        info!(
            "dry run: would close {}",
            self.inner.selected().unwrap_or("?")
        );
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.inner.logout().await
    }
}

pub const PLACEHOLDER_DELIMITER: &str = ".";
pub const PLACEHOLDER_FOLDERS: [&str; 3] = ["INBOX", "Archive", "Sent"];
pub const PLACEHOLDER_UID: Uid = 1;
pub const PLACEHOLDER_AGE_DAYS: i64 = 730;

/// Synthetic, read-only mail store.
///
/// Lists `INBOX`, `Archive` and `Sent`; every search in any folder
/// yields one message dated [`PLACEHOLDER_AGE_DAYS`] before `now`.
/// Mutating calls fail, so it is only useful inside [`DryRun`].
#[derive(Debug)]
pub struct PlaceholderStore {
    now: NaiveDateTime,
    selected: Option<String>,
}

impl PlaceholderStore {
    #[must_use]
    pub const fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            selected: None,
        }
    }

    fn header(&self) -> Vec<u8> {
        let date = (self.now - TimeDelta::days(PLACEHOLDER_AGE_DAYS)).and_utc();
        format!(
            "From: simulation@localhost\r\nSubject: (simulated message)\r\nDate: {}\r\n\r\n",
            date.to_rfc2822()
        )
        .into_bytes()
    }

    fn read_only(what: &str) -> Error {
        Error::Imap(format!("Placeholder store cannot {what}"))
    }
}

impl MailStore for PlaceholderStore {
    async fn list_folders(&mut self) -> Result<Vec<Folder>> {
        Ok(PLACEHOLDER_FOLDERS
            .iter()
            .map(|name| Folder::new(*name, Some(PLACEHOLDER_DELIMITER), ["\\HasNoChildren"]))
            .collect())
    }

    async fn select(&mut self, folder: &str) -> Result<()> {
        info!("dry run: using placeholder contents for {}", folder);
        self.selected = Some(folder.to_string());
        Ok(())
    }

    fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    async fn search_before(&mut self, cutoff: NaiveDate) -> Result<Vec<Uid>> {
        info!(
            "dry run: placeholder search before {} yields one message",
            imap_date(cutoff)
        );
        Ok(vec![PLACEHOLDER_UID])
    }

    async fn fetch_header(&mut self, uid: Uid) -> Result<Vec<u8>> {
        if uid == PLACEHOLDER_UID {
            Ok(self.header())
        } else {
            Err(Error::Imap(format!("No header found for UID {uid}")))
        }
    }

    async fn copy(&mut self, _uid: Uid, _destination: &str) -> Result<()> {
        Err(Self::read_only("copy"))
    }

    async fn add_flag(&mut self, _uid: Uid, _flag: &Flag) -> Result<()> {
        Err(Self::read_only("store flags"))
    }

    async fn expunge(&mut self) -> Result<()> {
        Err(Self::read_only("expunge"))
    }

    async fn create(&mut self, _folder: &str) -> Result<()> {
        Err(Self::read_only("create folders"))
    }

    async fn delete(&mut self, _folder: &str) -> Result<()> {
        Err(Self::read_only("delete folders"))
    }

    async fn close(&mut self) -> Result<()> {
        self.selected = None;
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.selected = None;
        Ok(())
    }
}
