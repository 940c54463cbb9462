use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::library::{Book, Chapter, SyncRecord};

/// The reading service the highlights come from.
#[async_trait]
pub trait Source: Send + Sync {
    /// Lists the books of the authenticated user. One request, no paging.
    async fn list_books(&self) -> Result<Vec<Book>>;

    /// Lists the chapters (with their marks) of one book.
    async fn list_marks(&self, book_id: &str) -> Result<Vec<Chapter>>;
}

/// The store the records are synced into.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Whether a record matching the active fingerprint is already stored.
    async fn exists(&self, record: &SyncRecord) -> Result<bool>;

    /// Writes one new record.
    async fn create(&self, record: &SyncRecord) -> Result<()>;
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct SyncStats {
    pub books: usize,
    pub processed: usize,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub fetch_failures: usize,
}

/// Runs one full sync: collect everything from the source, then push each
/// record through a dedup check and, if novel, a write.
///
/// Fetch failures never abort the run; they are logged, counted in
/// `fetch_failures`, and the affected scope contributes no records. This
/// keeps a failed fetch distinguishable from a genuinely empty library
/// while preserving the always-exit-clean contract of the run.
pub struct Syncer<S, D> {
    source: S,
    destination: D,
    concurrency: usize,
}

impl<S: Source, D: Destination> Syncer<S, D> {
    pub fn new(source: S, destination: D) -> Self {
        Syncer {
            source,
            destination,
            concurrency: 1,
        }
    }

    /// Allows up to `concurrency` per-book mark fetches in flight at once.
    /// Record order stays the source's book order either way; writes are
    /// always sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn run(&self) -> SyncStats {
        let mut stats = SyncStats::default();
        let records = self.collect(&mut stats).await;
        self.push(records, &mut stats).await;
        stats
    }

    async fn collect(&self, stats: &mut SyncStats) -> Vec<SyncRecord> {
        let books = match self.source.list_books().await {
            Ok(books) => books,
            Err(e) => {
                warn!("failed to list books: {}", e);
                stats.fetch_failures += 1;
                return Vec::new();
            }
        };

        stats.books = books.len();
        info!("listed {} books from source", books.len());

        let source = &self.source;
        let fetched: Vec<(Book, Result<Vec<Chapter>>)> = stream::iter(books)
            .map(|book| async move {
                let chapters = source.list_marks(&book.book_id).await;
                (book, chapters)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut records = Vec::new();
        for (book, outcome) in fetched {
            match outcome {
                Ok(chapters) => {
                    for chapter in &chapters {
                        for mark in &chapter.marks {
                            records.push(SyncRecord::new(&book, &chapter.title, mark));
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "failed to fetch marks for {} ({}): {}",
                        book.title, book.book_id, e
                    );
                    stats.fetch_failures += 1;
                }
            }
        }

        debug!("collected {} records", records.len());
        records
    }

    async fn push(&self, records: Vec<SyncRecord>, stats: &mut SyncStats) {
        for record in records {
            stats.processed += 1;
            match self.destination.exists(&record).await {
                Ok(true) => {
                    debug!("already synced: {} - {}", record.book_title, record.chapter);
                    stats.skipped += 1;
                }
                Ok(false) => match self.destination.create(&record).await {
                    Ok(()) => {
                        info!("created record: {} - {}", record.book_title, record.chapter);
                        stats.created += 1;
                    }
                    Err(e) => {
                        warn!(
                            "failed to create record for {} - {}: {}",
                            record.book_title, record.chapter, e
                        );
                        stats.failed += 1;
                    }
                },
                Err(e) => {
                    // Dedup state unknown: skip the write rather than risk
                    // a duplicate; the record is picked up on the next run.
                    warn!(
                        "dedup query failed for {} - {}: {}",
                        record.book_title, record.chapter, e
                    );
                    stats.failed += 1;
                }
            }
        }
    }
}
