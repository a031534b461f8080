#![allow(dead_code)]

//! Fake IMAP server for integration testing
//!
//! This module provides an in-process IMAP server that speaks enough
//! of the protocol to run the archiver end-to-end:
//!
//! TCP -> greeting -> STARTTLS -> TLS handshake -> LOGIN -> commands -> LOGOUT
//!
//! ## Module layout
//!
//! - `server` -- TCP listener, TLS setup, command journal and dispatch
//! - `handlers/` -- one file per command family (LIST, SELECT, etc.)
//! - `mailbox` -- test data model (folders, emails, builder)
//! - `io` -- shared write helpers

mod handlers;
mod io;
pub mod mailbox;

pub use mailbox::MailboxBuilder;
pub use server::FakeImapServer;
