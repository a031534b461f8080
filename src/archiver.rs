//! Run orchestration
//!
//! Catalog, delimiter, mandatory archive folder, the two retention
//! rules in order, then pruning. The session is closed and logged out
//! on every exit path.

use crate::catalog::{list_catalog, resolve_delimiter};
use crate::classify::RetentionRule;
use crate::config::RetentionPolicy;
use crate::error::{Error, Result};
use crate::folder::Folder;
use crate::migrate::apply_rule;
use crate::provision::Provisioner;
use crate::prune::prune;
use crate::report::{Diagnostic, Operation, RunSummary};
use crate::store::MailStore;
use chrono::{Datelike, NaiveDateTime};
use tracing::{error, info, warn};

/// Drives one archiving run over a [`MailStore`].
///
/// Whether the run is a simulation follows from the store: wrapping it
/// in [`DryRun`](crate::DryRun) is the only way to get one.
#[derive(Debug, Clone)]
pub struct Archiver<'a> {
    policy: &'a RetentionPolicy,
}

impl<'a> Archiver<'a> {
    #[must_use]
    pub const fn new(policy: &'a RetentionPolicy) -> Self {
        Self { policy }
    }

    /// The two rules, in the order they are applied.
    #[must_use]
    pub fn rules(&self) -> [RetentionRule; 2] {
        [
            RetentionRule::inbox_to_archive(self.policy),
            RetentionRule::archive_to_buckets(self.policy),
        ]
    }

    /// List the catalog and resolve the delimiter without changing
    /// anything, then release the session.
    pub async fn folders<S: MailStore>(&self, store: &mut S) -> (Vec<Folder>, String) {
        let catalog = list_catalog(store).await;
        let delimiter = resolve_delimiter(&catalog, self.policy);
        info!("Using delimiter '{}'", delimiter);
        for diagnostic in release(store).await {
            warn!("{}", diagnostic);
        }
        (catalog, delimiter)
    }

    /// Run every step against `store` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BaseFolderUnavailable`] when the archive base
    /// folder is missing and cannot be created. Everything else is
    /// reported in the returned [`RunSummary`].
    pub async fn run<S: MailStore>(&self, store: &mut S, now: NaiveDateTime) -> Result<RunSummary> {
        let outcome = self.execute(store, now).await;
        let cleanup = release(store).await;

        match outcome {
            Ok(mut summary) => {
                summary.diagnostics.extend(cleanup);
                summary.log();
                Ok(summary)
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }

    async fn execute<S: MailStore>(&self, store: &mut S, now: NaiveDateTime) -> Result<RunSummary> {
        let catalog = list_catalog(store).await;
        let delimiter = resolve_delimiter(&catalog, self.policy);
        info!("Using delimiter '{}'", delimiter);

        let mut summary = RunSummary::new(S::SIMULATED, delimiter.clone());
        let mut provisioner = Provisioner::new(delimiter.as_str());

        let base = self.policy.base_archive_path.as_str();
        if let Err(diagnostic) = provisioner.ensure(store, base).await {
            warn!("{}", diagnostic);
            return Err(Error::BaseFolderUnavailable(base.to_string()));
        }

        for rule in self.rules() {
            let report = apply_rule(store, &rule, &delimiter, &mut provisioner, now).await;
            summary.rules.push(report);
        }

        summary.prune = match self.policy.prune_before_year(now.year()) {
            Some(year) => Some(prune(store, base, &delimiter, year).await),
            None => {
                info!("Pruning disabled");
                None
            }
        };

        summary.created_folders = provisioner.created().to_vec();
        Ok(summary)
    }
}

/// Close the selected folder, if any, then log out. A failed CLOSE does
/// not prevent the LOGOUT.
async fn release<S: MailStore>(store: &mut S) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if let Some(folder) = store.selected().map(str::to_string)
        && let Err(e) = store.close().await
    {
        let diagnostic = Diagnostic::folder(Operation::Close, &folder, e.to_string());
        warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
    }

    if let Err(e) = store.logout().await {
        let diagnostic = Diagnostic::folder(Operation::Logout, "session", e.to_string());
        warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
    }

    diagnostics
}
