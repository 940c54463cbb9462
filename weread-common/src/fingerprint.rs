use clap::ValueEnum;
use serde::Deserialize;

use crate::library::SyncRecord;

/// How many characters of content the prefix strategy matches on.
pub const CONTENT_PREFIX_LEN: usize = 20;

/// The fields used to decide whether an incoming record duplicates one
/// already stored downstream. Exactly one strategy is active per run;
/// switching strategies between runs of the same database is unsupported.
#[derive(ValueEnum, Debug, Clone, Copy, Deserialize, Eq, PartialEq)]
pub enum Fingerprint {
    /// Book id plus the mark's exact position range. Cannot false-positive
    /// across distinct marks, but re-fetched marks whose range encoding
    /// drifted will be written again.
    ExactRange,

    /// Book id plus a contains check over the first 20 characters of
    /// content. Tolerant of range drift, but marks shorter than the prefix
    /// with identical text collapse into one.
    ContentPrefix,
}

/// One clause of the destination's boolean filter.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Predicate {
    Equals {
        property: &'static str,
        value: String,
    },
    Contains {
        property: &'static str,
        value: String,
    },
}

impl Fingerprint {
    /// The filter clauses identifying `record` downstream, combined with
    /// logical AND by the caller.
    pub fn predicates(&self, record: &SyncRecord) -> Vec<Predicate> {
        match self {
            Fingerprint::ExactRange => vec![
                Predicate::Equals {
                    property: "Book ID",
                    value: record.book_id.clone(),
                },
                Predicate::Equals {
                    property: "Range",
                    value: record.range.clone(),
                },
            ],
            Fingerprint::ContentPrefix => vec![
                Predicate::Equals {
                    property: "Book ID",
                    value: record.book_id.clone(),
                },
                Predicate::Contains {
                    property: "Content",
                    value: content_prefix(&record.content),
                },
            ],
        }
    }
}

fn content_prefix(content: &str) -> String {
    content.chars().take(CONTENT_PREFIX_LEN).collect()
}
