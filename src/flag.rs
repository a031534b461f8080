//! Message flags and STORE queries
//!
//! Relocation only ever sets `\Deleted`.

use std::fmt;

/// An IMAP message flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `\Deleted`: removed by the next EXPUNGE (or CLOSE).
    Deleted,
}

impl Flag {
    /// The IMAP wire representation of this flag.
    #[must_use]
    pub const fn as_imap_str(&self) -> &'static str {
        match self {
            Self::Deleted => "\\Deleted",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_imap_str())
    }
}

/// Render the data item of a silent `STORE` that adds `flags`, e.g.
/// `+FLAGS.SILENT (\Deleted)`.
#[must_use]
pub fn store_query(flags: &[Flag]) -> String {
    let list = flags
        .iter()
        .map(Flag::as_imap_str)
        .collect::<Vec<_>>()
        .join(" ");
    format!("+FLAGS.SILENT ({list})")
}
