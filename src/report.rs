//! Structured diagnostics and the run summary
//!
//! Non-fatal failures never propagate. Each catch point records a
//! [`Diagnostic`] naming the operation, the folder (and message) and the
//! cause, and the reports below aggregate them so a run can be
//! reconstructed without replaying it.

use crate::store::Uid;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// The step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    List,
    Select,
    Search,
    Fetch,
    Header,
    Date,
    Provision,
    Copy,
    Flag,
    Expunge,
    Close,
    Delete,
    Logout,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Select => "select",
            Self::Search => "search",
            Self::Fetch => "fetch",
            Self::Header => "header",
            Self::Date => "date",
            Self::Provision => "provision",
            Self::Copy => "copy",
            Self::Flag => "flag",
            Self::Expunge => "expunge",
            Self::Close => "close",
            Self::Delete => "delete",
            Self::Logout => "logout",
        };
        f.write_str(name)
    }
}

/// One non-fatal failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub operation: Operation,
    pub folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Uid>,
    pub cause: String,
}

impl Diagnostic {
    #[must_use]
    pub fn folder(operation: Operation, folder: &str, cause: impl Into<String>) -> Self {
        Self {
            operation,
            folder: folder.to_string(),
            message: None,
            cause: cause.into(),
        }
    }

    #[must_use]
    pub fn message(operation: Operation, folder: &str, uid: Uid, cause: impl Into<String>) -> Self {
        Self {
            operation,
            folder: folder.to_string(),
            message: Some(uid),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message {
            Some(uid) => write!(
                f,
                "{} failed for message {} in {}: {}",
                self.operation, uid, self.folder, self.cause
            ),
            None => write!(f, "{} failed for {}: {}", self.operation, self.folder, self.cause),
        }
    }
}

/// Outcome of applying one retention rule to its source folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    pub source: String,
    pub cutoff: NaiveDate,
    pub searched: usize,
    pub moved: usize,
    pub skipped: usize,
    /// Copied but left unflagged in the source, so present in both
    /// folders until cleaned up by hand. Included in `skipped`.
    pub duplicated: usize,
    /// SELECT or SEARCH failed and no message was looked at.
    pub aborted: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl RuleReport {
    #[must_use]
    pub const fn new(source: String, cutoff: NaiveDate) -> Self {
        Self {
            source,
            cutoff,
            searched: 0,
            moved: 0,
            skipped: 0,
            duplicated: 0,
            aborted: false,
            diagnostics: Vec::new(),
        }
    }

    /// Record a message that was left in place.
    pub fn skip(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.skipped += 1;
        self.diagnostics.push(diagnostic);
    }

    /// Record a message that was copied but could not be flagged.
    pub fn duplicate(&mut self, diagnostic: Diagnostic) {
        self.duplicated += 1;
        self.skip(diagnostic);
    }

    /// Record a failure that ends the rule application.
    pub fn abort(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.aborted = true;
        self.diagnostics.push(diagnostic);
    }

    /// Record a failure that affects no single message.
    pub fn note(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Outcome of pruning yearly buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub threshold_year: i32,
    pub candidates: Vec<String>,
    pub deleted: Vec<String>,
    /// Nested folders under an old bucket; never deleted automatically.
    pub needs_review: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PruneReport {
    #[must_use]
    pub const fn new(threshold_year: i32) -> Self {
        Self {
            threshold_year,
            candidates: Vec::new(),
            deleted: Vec::new(),
            needs_review: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn fail(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Everything a run did, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub delimiter: String,
    /// Folders created (or, in a dry run, that would have been).
    pub created_folders: Vec<String>,
    pub rules: Vec<RuleReport>,
    pub prune: Option<PruneReport>,
    /// Cleanup problems after the work was done.
    pub diagnostics: Vec<Diagnostic>,
}

impl RunSummary {
    #[must_use]
    pub const fn new(dry_run: bool, delimiter: String) -> Self {
        Self {
            dry_run,
            delimiter,
            created_folders: Vec::new(),
            rules: Vec::new(),
            prune: None,
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn moved(&self) -> usize {
        self.rules.iter().map(|r| r.moved).sum()
    }

    /// Log a per-step summary.
    pub fn log(&self) {
        let prefix = if self.dry_run { "dry run: " } else { "" };
        info!("{}Summary (delimiter '{}')", prefix, self.delimiter);
        for folder in &self.created_folders {
            info!("{}  created folder {}", prefix, folder);
        }
        for rule in &self.rules {
            if rule.aborted {
                info!(
                    "{}  {} (before {}): aborted",
                    prefix, rule.source, rule.cutoff
                );
            } else {
                info!(
                    "{}  {} (before {}): {} searched, {} moved, {} skipped",
                    prefix, rule.source, rule.cutoff, rule.searched, rule.moved, rule.skipped
                );
            }
            if rule.duplicated > 0 {
                warn!(
                    "{}  {}: {} message(s) copied but still in the source, clean up by hand",
                    prefix, rule.source, rule.duplicated
                );
            }
        }
        match &self.prune {
            Some(prune) => {
                info!(
                    "{}  prune before {}: {} candidates, {} deleted",
                    prefix,
                    prune.threshold_year,
                    prune.candidates.len(),
                    prune.deleted.len()
                );
                for folder in &prune.needs_review {
                    info!("{}  needs review (nested bucket): {}", prefix, folder);
                }
            }
            None => info!("{}  pruning disabled", prefix),
        }
    }
}
