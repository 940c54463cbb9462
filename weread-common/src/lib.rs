pub mod error;
pub mod fingerprint;
pub mod library;
pub mod notion;
pub mod sync;

// Re-export commonly used types
pub use error::{Result, SyncError};
pub use fingerprint::Fingerprint;
pub use library::{Book, Chapter, Mark, SyncRecord};
pub use notion::Notion;
pub use sync::{Destination, Source, SyncStats, Syncer};
