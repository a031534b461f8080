//! IMAP mailbox retention
//!
//! Moves aged mail out of the inbox into an archive folder, moves aged
//! archive mail into yearly bucket folders (`Archive.2022`,
//! `Archive/2022`, ...) and deletes buckets older than a retention
//! horizon.
//!
//! The engine talks to the server through the [`MailStore`] trait.
//! [`ImapStore`] is the live implementation; wrapping any store in
//! [`DryRun`] gives a simulation that makes the same decisions but
//! never changes the mailbox.

mod archiver;
mod catalog;
mod classify;
mod config;
mod connection;
mod error;
mod flag;
mod folder;
mod imap_store;
mod inspect;
mod migrate;
mod provision;
mod prune;
mod report;
mod retry;
mod simulate;
mod store;

pub use archiver::Archiver;
pub use catalog::{list_catalog, resolve_delimiter};
pub use classify::{ArchiveBucket, BucketMatch, BucketPattern, Destination, RetentionRule, bucket_name};
pub use config::{ArchiverConfig, ImapConfig, RetentionPolicy, Security};
pub use connection::{ImapSession, connect, connect_with_retry};
pub use error::{Error, Result};
pub use flag::{Flag, store_query};
pub use folder::Folder;
pub use imap_store::ImapStore;
pub use inspect::{MessageInfo, inspect, inspect_header, parse_date};
pub use migrate::apply_rule;
pub use provision::{Provisioned, Provisioner};
pub use prune::prune;
pub use report::{Diagnostic, Operation, PruneReport, RuleReport, RunSummary};
pub use retry::{RetryPolicy, retry};
pub use simulate::{DryRun, PlaceholderStore};
pub use store::{MailStore, Uid, imap_date};
