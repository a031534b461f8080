//! Error types for mailbox-archiver

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("Header parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    /// The mandatory archive folder is missing and could not be created.
    #[error("Cannot proceed without archive folder {0}")]
    BaseFolderUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
