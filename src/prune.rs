//! Archive Pruner: delete yearly buckets older than a threshold year

use crate::classify::{BucketMatch, BucketPattern};
use crate::report::{Diagnostic, Operation, PruneReport};
use crate::store::MailStore;
use tracing::{info, warn};

/// Delete every bucket `<base><delimiter><YYYY>` with a year strictly
/// below `threshold_year`.
///
/// Each candidate is selected, expunged and closed before DELETE, and
/// a failure on one candidate does not stop the others. Folders below
/// an old bucket are reported under `needs_review` and left alone.
pub async fn prune<S: MailStore>(
    store: &mut S,
    base: &str,
    delimiter: &str,
    threshold_year: i32,
) -> PruneReport {
    let mut report = PruneReport::new(threshold_year);
    info!("Pruning {} buckets older than {}", base, threshold_year);

    let pattern = match BucketPattern::new(base, delimiter) {
        Ok(pattern) => pattern,
        Err(e) => {
            report.fail(Diagnostic::folder(Operation::List, base, e.to_string()));
            return report;
        }
    };

    let folders = match store.list_folders().await {
        Ok(folders) => folders,
        Err(e) => {
            report.fail(Diagnostic::folder(Operation::List, base, e.to_string()));
            return report;
        }
    };

    for folder in folders {
        match pattern.classify(&folder.name) {
            BucketMatch::Bucket(bucket) if bucket.year < threshold_year => {
                report.candidates.push(bucket.name);
            }
            BucketMatch::Nested(bucket) if bucket.year < threshold_year => {
                warn!("Not pruning nested folder {}, needs review", bucket.name);
                report.needs_review.push(bucket.name);
            }
            _ => {}
        }
    }

    if report.candidates.is_empty() {
        info!("No archive folders older than {}", threshold_year);
        return report;
    }
    info!(
        "Found {} archive folders older than {}",
        report.candidates.len(),
        threshold_year
    );

    for name in report.candidates.clone() {
        match prune_bucket(store, &name).await {
            Ok(()) => {
                info!("Deleted folder {}", name);
                report.deleted.push(name);
            }
            Err(diagnostic) => report.fail(diagnostic),
        }
    }

    report
}

async fn prune_bucket<S: MailStore>(store: &mut S, name: &str) -> Result<(), Diagnostic> {
    let fail = |operation, e: crate::Error| Diagnostic::folder(operation, name, e.to_string());

    store
        .select(name)
        .await
        .map_err(|e| fail(Operation::Select, e))?;
    store
        .expunge()
        .await
        .map_err(|e| fail(Operation::Expunge, e))?;
    store.close().await.map_err(|e| fail(Operation::Close, e))?;
    store
        .delete(name)
        .await
        .map_err(|e| fail(Operation::Delete, e))
}
