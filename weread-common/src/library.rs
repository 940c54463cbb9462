use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Wall-clock format used for the destination's date field. No timezone is
/// attached; values are local time at the machine running the sync.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub book_id: String,
    pub title: String,
    pub author: String,
}

/// A single highlighted passage as fetched from the reading service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mark {
    pub text: String,
    pub note: Option<String>,
    /// Epoch seconds; 0 means the service did not report a time.
    pub create_time: i64,
    pub range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub marks: Vec<Mark>,
}

/// The flattened unit of dedup and persistence, one per mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub book_id: String,
    pub book_title: String,
    pub author: String,
    pub chapter: String,
    pub content: String,
    pub create_time: String,
    pub range: String,
}

impl SyncRecord {
    pub fn new(book: &Book, chapter_title: &str, mark: &Mark) -> Self {
        SyncRecord {
            book_id: book.book_id.clone(),
            book_title: book.title.clone(),
            author: book.author.clone(),
            chapter: chapter_title.to_string(),
            content: mark.text.clone(),
            create_time: format_create_time(mark.create_time),
            range: mark.range.clone(),
        }
    }
}

/// Formats epoch seconds as a local wall-clock string. Zero and out-of-range
/// inputs map to the formatted epoch start.
pub fn format_create_time(epoch_seconds: i64) -> String {
    Local
        .timestamp_opt(epoch_seconds, 0)
        .earliest()
        .or_else(|| Local.timestamp_opt(0, 0).earliest())
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "1970-01-01 00:00:00".to_string())
}
