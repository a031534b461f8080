//! Migration Executor: search, inspect, provision, relocate, expunge

use crate::classify::RetentionRule;
use crate::flag::Flag;
use crate::inspect::inspect;
use crate::provision::Provisioner;
use crate::report::{Diagnostic, Operation, RuleReport};
use crate::store::{MailStore, imap_date};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::info;

/// Apply one retention rule to its source folder.
///
/// Only a failed SELECT or SEARCH aborts the rule. Every per-message
/// failure is recorded and the loop moves on. A message counts as moved
/// once it has been copied and flagged `\Deleted`; flagged messages are
/// expunged together after the loop.
pub async fn apply_rule<S: MailStore>(
    store: &mut S,
    rule: &RetentionRule,
    delimiter: &str,
    provisioner: &mut Provisioner,
    now: NaiveDateTime,
) -> RuleReport {
    let source = rule.source.as_str();
    let Some(cutoff) = rule.cutoff(now) else {
        let mut report = RuleReport::new(rule.source.clone(), NaiveDate::MIN);
        report.abort(Diagnostic::folder(
            Operation::Search,
            source,
            format!("age limit of {} days is out of range", rule.max_age.num_days()),
        ));
        return report;
    };
    let mut report = RuleReport::new(rule.source.clone(), cutoff);
    info!("Applying rule {}", rule);

    if let Err(e) = store.select(source).await {
        report.abort(Diagnostic::folder(Operation::Select, source, e.to_string()));
        return report;
    }

    let uids = match store.search_before(cutoff).await {
        Ok(uids) => uids,
        Err(e) => {
            report.abort(Diagnostic::folder(Operation::Search, source, e.to_string()));
            return report;
        }
    };
    if uids.is_empty() {
        info!("No messages in {} before {}", source, imap_date(cutoff));
        return report;
    }

    report.searched = uids.len();
    info!(
        "Found {} messages in {} before {}",
        uids.len(),
        source,
        imap_date(cutoff)
    );

    for uid in uids {
        let message = match inspect(store, source, uid, now.year()).await {
            Ok(message) => message,
            Err(diagnostic) => {
                report.skip(diagnostic);
                continue;
            }
        };

        let wanted = rule.destination_for(message.date, delimiter);
        let destination = match provisioner.ensure(store, &wanted).await {
            Ok(provisioned) => provisioned.name().to_string(),
            Err(diagnostic) => {
                report.skip(Diagnostic::message(
                    Operation::Provision,
                    source,
                    uid,
                    diagnostic.to_string(),
                ));
                continue;
            }
        };

        if let Err(e) = store.copy(uid, &destination).await {
            report.skip(Diagnostic::message(
                Operation::Copy,
                source,
                uid,
                format!("to {destination}: {e}"),
            ));
            continue;
        }

        if let Err(e) = store.add_flag(uid, &Flag::Deleted).await {
            report.duplicate(Diagnostic::message(
                Operation::Flag,
                source,
                uid,
                format!("copied to {destination} but not flagged: {e}"),
            ));
            continue;
        }

        report.moved += 1;
        info!(
            "Moved message {} from {} to {} (date: {}, subject: {})",
            uid, source, destination, message.date, message.subject
        );
    }

    if let Err(e) = store.expunge().await {
        report.note(Diagnostic::folder(Operation::Expunge, source, e.to_string()));
    }

    info!(
        "Finished {}: {} searched, {} moved, {} skipped",
        source, report.searched, report.moved, report.skipped
    );
    report
}
