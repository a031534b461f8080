//! Live [`MailStore`] backed by an `async-imap` session

use crate::config::ImapConfig;
use crate::connection::{ImapSession, connect_with_retry};
use crate::error::{Error, Result};
use crate::flag::{Flag, store_query};
use crate::folder::Folder;
use crate::retry::RetryPolicy;
use crate::store::{MailStore, Uid, imap_date};
use async_imap::imap_proto::NameAttribute;
use async_imap::types::Fetch;
use chrono::NaiveDate;
use futures::{StreamExt, TryStreamExt};
use tracing::{debug, warn};

/// An authenticated IMAP session plus the name of the folder it has
/// open.
pub struct ImapStore {
    session: ImapSession,
    selected: Option<String>,
}

impl ImapStore {
    #[must_use]
    pub const fn new(session: ImapSession) -> Self {
        Self {
            session,
            selected: None,
        }
    }

    /// Connect and log in, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last connection error once the retry policy is
    /// exhausted.
    pub async fn connect(config: &ImapConfig, retry: &RetryPolicy) -> Result<Self> {
        let session = connect_with_retry(config, retry).await?;
        Ok(Self::new(session))
    }
}

fn attribute_name(attr: &NameAttribute<'_>) -> String {
    match attr {
        NameAttribute::NoInferiors => "\\Noinferiors".to_string(),
        NameAttribute::NoSelect => "\\Noselect".to_string(),
        NameAttribute::Marked => "\\Marked".to_string(),
        NameAttribute::Unmarked => "\\Unmarked".to_string(),
        NameAttribute::Extension(ext) => ext.to_string(),
        other => format!("\\{other:?}"),
    }
}

impl MailStore for ImapStore {
    async fn list_folders(&mut self) -> Result<Vec<Folder>> {
        let mut folder_stream = self
            .session
            .list(Some(""), Some("*"))
            .await
            .map_err(|e| Error::Imap(format!("List folders failed: {e}")))?;

        let mut folders = Vec::new();
        while let Some(item) = folder_stream.next().await {
            match item {
                Ok(name) => folders.push(Folder::new(
                    name.name(),
                    name.delimiter(),
                    name.attributes().iter().map(attribute_name),
                )),
                Err(e) => warn!("Unparseable folder entry: {}", e),
            }
        }
        drop(folder_stream);

        Ok(folders)
    }

    async fn select(&mut self, folder: &str) -> Result<()> {
        self.selected = None;
        self.session
            .select(folder)
            .await
            .map_err(|e| Error::Imap(format!("Failed to select {folder}: {e}")))?;
        self.selected = Some(folder.to_string());
        Ok(())
    }

    async fn examine(&mut self, folder: &str) -> Result<()> {
        self.selected = None;
        self.session
            .examine(folder)
            .await
            .map_err(|e| Error::Imap(format!("Failed to examine {folder}: {e}")))?;
        self.selected = Some(folder.to_string());
        Ok(())
    }

    fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    async fn search_before(&mut self, cutoff: NaiveDate) -> Result<Vec<Uid>> {
        let query = format!("BEFORE {}", imap_date(cutoff));
        let uids = self
            .session
            .uid_search(&query)
            .await
            .map_err(|e| Error::Imap(format!("Search failed: {e}")))?;

        let mut uid_list: Vec<Uid> = uids.into_iter().collect();
        uid_list.sort_unstable();
        debug!("{} messages match '{}'", uid_list.len(), query);
        Ok(uid_list)
    }

    async fn fetch_header(&mut self, uid: Uid) -> Result<Vec<u8>> {
        let messages: Vec<Fetch> = self
            .session
            .uid_fetch(uid.to_string(), "(UID BODY.PEEK[HEADER])")
            .await
            .map_err(|e| Error::Imap(format!("Fetch failed: {e}")))?
            .try_collect()
            .await
            .map_err(|e| Error::Imap(format!("Fetch error: {e}")))?;

        messages
            .iter()
            .find_map(|msg| msg.header().map(<[u8]>::to_vec))
            .ok_or_else(|| Error::Imap(format!("No header found for UID {uid}")))
    }

    async fn copy(&mut self, uid: Uid, destination: &str) -> Result<()> {
        self.session
            .uid_copy(uid.to_string(), destination)
            .await
            .map_err(|e| Error::Imap(format!("Copy to {destination} failed: {e}")))
    }

    async fn add_flag(&mut self, uid: Uid, flag: &Flag) -> Result<()> {
        let query = store_query(std::slice::from_ref(flag));
        let _updates: Vec<Fetch> = self
            .session
            .uid_store(uid.to_string(), &query)
            .await
            .map_err(|e| Error::Imap(format!("Store failed: {e}")))?
            .try_collect()
            .await
            .map_err(|e| Error::Imap(format!("Store error: {e}")))?;
        Ok(())
    }

    async fn expunge(&mut self) -> Result<()> {
        let expunged: Vec<u32> = self
            .session
            .expunge()
            .await
            .map_err(|e| Error::Imap(format!("Expunge failed: {e}")))?
            .try_collect()
            .await
            .map_err(|e| Error::Imap(format!("Expunge error: {e}")))?;
        debug!("Expunged {} messages", expunged.len());
        Ok(())
    }

    async fn create(&mut self, folder: &str) -> Result<()> {
        self.session
            .create(folder)
            .await
            .map_err(|e| Error::Imap(format!("Failed to create {folder}: {e}")))
    }

    async fn delete(&mut self, folder: &str) -> Result<()> {
        self.session
            .delete(folder)
            .await
            .map_err(|e| Error::Imap(format!("Failed to delete {folder}: {e}")))
    }

    async fn close(&mut self) -> Result<()> {
        self.session
            .close()
            .await
            .map_err(|e| Error::Imap(format!("Close failed: {e}")))?;
        self.selected = None;
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.selected = None;
        self.session
            .logout()
            .await
            .map_err(|e| Error::Imap(format!("Logout failed: {e}")))
    }
}
