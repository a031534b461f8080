//! Folder catalog listing and delimiter resolution

use crate::config::RetentionPolicy;
use crate::folder::Folder;
use crate::store::MailStore;
use tracing::{info, warn};

/// List every folder visible in the session.
///
/// Best effort: a failed LIST is logged and yields an empty catalog.
pub async fn list_catalog<S: MailStore>(store: &mut S) -> Vec<Folder> {
    match store.list_folders().await {
        Ok(folders) => {
            info!("Available folders:");
            for folder in &folders {
                info!(" - {}", folder);
            }
            folders
        }
        Err(e) => {
            warn!("Error listing folders: {}", e);
            Vec::new()
        }
    }
}

/// Pick the one delimiter used for every folder name synthesized this
/// run.
///
/// A forced delimiter always wins. Otherwise the first catalog entry
/// named like the inbox, the archive folder or the archive base lends
/// its delimiter; with no such entry the policy default applies.
#[must_use]
pub fn resolve_delimiter(catalog: &[Folder], policy: &RetentionPolicy) -> String {
    if let Some(forced) = &policy.force_delimiter {
        return forced.clone();
    }

    let candidates = [
        policy.inbox.as_str(),
        policy.archive.as_str(),
        policy.base_archive_path.as_str(),
    ];
    catalog
        .iter()
        .find(|folder| candidates.iter().any(|name| folder.is_named(name)))
        .map_or_else(
            || policy.default_delimiter.clone(),
            |folder| folder.delimiter.clone(),
        )
}
