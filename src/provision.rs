//! Idempotent destination-folder provisioning

use crate::report::{Diagnostic, Operation};
use crate::store::MailStore;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A folder that is known to exist after [`Provisioner::ensure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    /// Already there (seen in a listing or created earlier this run).
    Existing(String),
    /// Created by this call. The name differs from the requested one
    /// when the trailing-separator fallback was used.
    Created(String),
}

impl Provisioned {
    /// The name to use when addressing the folder.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Existing(name) | Self::Created(name) => name,
        }
    }
}

/// Ensures destination folders exist, creating them at most once.
///
/// Every requested name is remembered together with the folder it
/// resolved to, so asking for the same folder again costs no protocol
/// call, even when the trailing-separator fallback picked another name.
#[derive(Debug, Default)]
pub struct Provisioner {
    delimiter: String,
    known: HashMap<String, String>,
    created: Vec<String>,
}

impl Provisioner {
    #[must_use]
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            ..Self::default()
        }
    }

    /// Folders created so far, in creation order.
    #[must_use]
    pub fn created(&self) -> &[String] {
        &self.created
    }

    fn remember(&mut self, requested: &str, resolved: &str) {
        self.known.insert(requested.to_string(), resolved.to_string());
        self.known
            .entry(resolved.to_string())
            .or_insert_with(|| resolved.to_string());
    }

    /// Make sure `name` exists.
    ///
    /// Checks a fresh listing first and only issues CREATE when the
    /// folder is missing. A name ending in a hierarchy separator also
    /// matches a listed folder without it. If CREATE is refused and the
    /// name ends in a separator, one more CREATE is tried without it.
    ///
    /// # Errors
    ///
    /// Returns a [`Diagnostic`] when neither CREATE succeeded.
    pub async fn ensure<S: MailStore>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> Result<Provisioned, Diagnostic> {
        if let Some(resolved) = self.known.get(name) {
            return Ok(Provisioned::Existing(resolved.clone()));
        }

        let stripped = self.strip_trailing_separator(name);
        let fallback = (!stripped.is_empty() && stripped != name).then_some(stripped);

        match store.list_folders().await {
            Ok(folders) => {
                for folder in &folders {
                    self.remember(&folder.name, &folder.name);
                }
                let listed = |wanted: &str| folders.iter().any(|f| f.is_named(wanted));
                let existing = if listed(name) {
                    Some(name)
                } else {
                    fallback.filter(|f| listed(*f))
                };
                if let Some(existing) = existing {
                    debug!("Folder {} already exists", existing);
                    self.remember(name, existing);
                    return Ok(Provisioned::Existing(existing.to_string()));
                }
            }
            Err(e) => warn!("Could not list folders before creating {}: {}", name, e),
        }

        let primary = match store.create(name).await {
            Ok(()) => return Ok(self.record_created(name, name)),
            Err(e) => e,
        };
        warn!("Failed to create folder {}: {}", name, primary);

        let Some(fallback) = fallback else {
            return Err(Diagnostic::folder(
                Operation::Provision,
                name,
                primary.to_string(),
            ));
        };

        info!("Retrying without trailing separator: {}", fallback);
        match store.create(fallback).await {
            Ok(()) => Ok(self.record_created(name, fallback)),
            Err(e) => Err(Diagnostic::folder(
                Operation::Provision,
                name,
                format!("{primary}; fallback {fallback}: {e}"),
            )),
        }
    }

    fn strip_trailing_separator<'a>(&self, name: &'a str) -> &'a str {
        name.trim_end_matches(|c: char| c == '/' || self.delimiter.contains(c))
    }

    fn record_created(&mut self, requested: &str, name: &str) -> Provisioned {
        info!("Created folder: {}", name);
        self.remember(requested, name);
        self.created.push(name.to_string());
        Provisioned::Created(name.to_string())
    }
}
