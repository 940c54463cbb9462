use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, SyncError};
use crate::fingerprint::{Fingerprint, Predicate};
use crate::library::SyncRecord;
use crate::sync::Destination;

const NOTION_VERSION: &str = "2022-06-28";

/// Client for the destination database. Dedup queries and page creation
/// both target one database, fixed at construction.
pub struct Notion {
    client: reqwest::Client,
    token: String,
    database_id: String,
    fingerprint: Fingerprint,
    api_endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Value>,
}

impl Notion {
    pub fn new(token: &str, database_id: &str, fingerprint: Fingerprint) -> Self {
        Notion {
            client: reqwest::Client::new(),
            token: token.to_string(),
            database_id: database_id.to_string(),
            fingerprint,
            api_endpoint: "https://api.notion.com/v1".parse().unwrap(),
        }
    }

    async fn query_exists(&self, record: &SyncRecord) -> Result<bool> {
        let context = format!("{} - {}", record.book_id, record.range);
        let mut url = self.api_endpoint.clone();
        url.path_segments_mut()
            .unwrap()
            .push("databases")
            .push(&self.database_id)
            .push("query");

        let body = json!({
            "filter": dedup_filter(&self.fingerprint.predicates(record)),
            "page_size": 1,
        });
        debug!("notion dedup query: {}", body);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::Query {
                context: context.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SyncError::Api {
                service: "notion",
                context,
                status: response.status().as_u16(),
            });
        }

        let body: QueryResponse = response.json().await.map_err(|e| SyncError::Query {
            context,
            reason: e.to_string(),
        })?;

        Ok(!body.results.is_empty())
    }

    async fn create_page(&self, record: &SyncRecord) -> Result<()> {
        let context = format!("{} - {}", record.book_title, record.chapter);
        let mut url = self.api_endpoint.clone();
        url.path_segments_mut().unwrap().push("pages");

        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": record_properties(record),
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::Write {
                context: context.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SyncError::Api {
                service: "notion",
                context,
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Destination for Notion {
    async fn exists(&self, record: &SyncRecord) -> Result<bool> {
        self.query_exists(record).await
    }

    async fn create(&self, record: &SyncRecord) -> Result<()> {
        self.create_page(record).await
    }
}

/// Builds the `and` filter body from the active fingerprint's clauses.
pub fn dedup_filter(predicates: &[Predicate]) -> Value {
    let clauses: Vec<Value> = predicates
        .iter()
        .map(|predicate| match predicate {
            Predicate::Equals { property, value } => json!({
                "property": property,
                "rich_text": { "equals": value },
            }),
            Predicate::Contains { property, value } => json!({
                "property": property,
                "rich_text": { "contains": value },
            }),
        })
        .collect();

    json!({ "and": clauses })
}

/// One-to-one mapping of record fields onto the database schema.
pub fn record_properties(record: &SyncRecord) -> Value {
    json!({
        "Book Title": { "title": [{ "text": { "content": record.book_title } }] },
        "Author": rich_text(&record.author),
        "Chapter": rich_text(&record.chapter),
        "Content": rich_text(&record.content),
        "Date": { "date": { "start": record.create_time } },
        "Book ID": rich_text(&record.book_id),
        "Range": rich_text(&record.range),
    })
}

fn rich_text(value: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": value } }] })
}
