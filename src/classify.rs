//! Retention rules and year-bucket naming
//!
//! A [`RetentionRule`] says which folder to scan, how old a message has
//! to be, and where it goes. Bucket names are always
//! `<base><delimiter><YYYY>`; [`BucketPattern`] recognizes them again
//! when pruning.

use crate::config::RetentionPolicy;
use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;
use std::fmt;

/// Where a rule sends the messages it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Always the same folder.
    Folder(String),
    /// A yearly bucket under `base`, picked from the message date.
    YearBuckets { base: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionRule {
    pub source: String,
    pub max_age: TimeDelta,
    pub destination: Destination,
}

impl RetentionRule {
    /// Inbox messages older than `inbox_max_age_days` go to the archive
    /// folder.
    #[must_use]
    pub fn inbox_to_archive(policy: &RetentionPolicy) -> Self {
        Self {
            source: policy.inbox.clone(),
            max_age: TimeDelta::days(i64::from(policy.inbox_max_age_days)),
            destination: Destination::Folder(policy.archive.clone()),
        }
    }

    /// Archive messages older than `archive_max_age_days` go to the
    /// bucket for their year.
    #[must_use]
    pub fn archive_to_buckets(policy: &RetentionPolicy) -> Self {
        Self {
            source: policy.archive.clone(),
            max_age: TimeDelta::days(i64::from(policy.archive_max_age_days)),
            destination: Destination::YearBuckets {
                base: policy.base_archive_path.clone(),
            },
        }
    }

    /// Messages dated strictly before this day are due. `None` when
    /// the age reaches past the earliest representable date.
    #[must_use]
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDate> {
        now.checked_sub_signed(self.max_age).map(|t| t.date())
    }

    /// Destination folder for a message with the given date.
    #[must_use]
    pub fn destination_for(&self, date: NaiveDateTime, delimiter: &str) -> String {
        match &self.destination {
            Destination::Folder(name) => name.clone(),
            Destination::YearBuckets { base } => bucket_name(base, delimiter, date.year()),
        }
    }
}

impl fmt::Display for RetentionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.destination {
            Destination::Folder(name) => name.clone(),
            Destination::YearBuckets { base } => format!("{base} yearly folders"),
        };
        write!(
            f,
            "{} -> {} (older than {} days)",
            self.source,
            target,
            self.max_age.num_days()
        )
    }
}

/// `<base><delimiter><year>`
#[must_use]
pub fn bucket_name(base: &str, delimiter: &str, year: i32) -> String {
    format!("{base}{delimiter}{year}")
}

/// A yearly archive folder found on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBucket {
    pub name: String,
    pub year: i32,
}

/// How a folder name relates to the bucket naming scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketMatch {
    /// `<base><d><YYYY>`, optionally followed by one stray non-word
    /// character.
    Bucket(ArchiveBucket),
    /// Something below a bucket (`<base><d><YYYY><d>...`). Never
    /// deleted automatically.
    Nested(ArchiveBucket),
    NotBucket,
}

/// Recognizes bucket names for one base and delimiter.
#[derive(Debug, Clone)]
pub struct BucketPattern {
    exact: Regex,
    nested: Regex,
}

impl BucketPattern {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the pattern cannot be compiled.
    pub fn new(base: &str, delimiter: &str) -> Result<Self> {
        let base = regex::escape(base);
        let delimiter = regex::escape(delimiter);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| Error::Config(format!("Invalid bucket pattern: {e}")))
        };
        Ok(Self {
            exact: compile(format!(r"^{base}{delimiter}([0-9]{{4}})\W?$"))?,
            nested: compile(format!(r"^{base}{delimiter}([0-9]{{4}}){delimiter}.+$"))?,
        })
    }

    #[must_use]
    pub fn classify(&self, name: &str) -> BucketMatch {
        let year_of = |re: &Regex| {
            re.captures(name)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i32>().ok())
        };
        let bucket = |year| ArchiveBucket {
            name: name.to_string(),
            year,
        };

        if let Some(year) = year_of(&self.exact) {
            BucketMatch::Bucket(bucket(year))
        } else if let Some(year) = year_of(&self.nested) {
            BucketMatch::Nested(bucket(year))
        } else {
            BucketMatch::NotBucket
        }
    }
}
