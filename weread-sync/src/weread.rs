use async_trait::async_trait;
use reqwest::header::{COOKIE, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use weread_common::{Book, Chapter, Mark, Result, SyncError, Source};

use crate::credential::Credential;

// The service refuses requests without a browser user agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

pub struct WeRead {
    client: reqwest::Client,
    credential: Credential,
    api_endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct NotebooksResponse {
    #[serde(default)]
    books: Vec<NotebookEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotebookEntry {
    book_id: String,
    title: String,
    #[serde(default)]
    author: String,
}

impl From<NotebookEntry> for Book {
    fn from(entry: NotebookEntry) -> Self {
        Book {
            book_id: entry.book_id,
            title: entry.title,
            author: entry.author,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BookmarkListResponse {
    #[serde(default)]
    chapters: Vec<ChapterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChapterEntry {
    #[serde(default)]
    chapter_title: String,
    #[serde(default)]
    marks: Vec<MarkEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkEntry {
    #[serde(default)]
    mark_text: String,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    create_time: i64,
    #[serde(default)]
    range: String,
}

impl From<ChapterEntry> for Chapter {
    fn from(entry: ChapterEntry) -> Self {
        Chapter {
            title: entry.chapter_title,
            marks: entry.marks.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<MarkEntry> for Mark {
    fn from(entry: MarkEntry) -> Self {
        Mark {
            text: entry.mark_text,
            note: entry.note,
            create_time: entry.create_time,
            range: entry.range,
        }
    }
}

impl WeRead {
    pub fn new(credential: Credential) -> Self {
        WeRead {
            client: reqwest::Client::new(),
            credential,
            api_endpoint: "https://i.weread.qq.com".parse().unwrap(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T> {
        debug!("weread api url: {}", url);

        let response = self
            .client
            .get(url)
            .header(COOKIE, self.credential.cookie_header())
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| SyncError::Fetch {
                context: context.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SyncError::Api {
                service: "weread",
                context: context.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| SyncError::Fetch {
            context: context.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Source for WeRead {
    async fn list_books(&self) -> Result<Vec<Book>> {
        info!("fetching notebook list from weread");

        let mut url = self.api_endpoint.clone();
        url.path_segments_mut()
            .unwrap()
            .push("user")
            .push("notebooks");

        let response: NotebooksResponse = self.get_json(url, "user/notebooks").await?;
        Ok(response.books.into_iter().map(Into::into).collect())
    }

    async fn list_marks(&self, book_id: &str) -> Result<Vec<Chapter>> {
        let mut url = self.api_endpoint.clone();
        url.path_segments_mut()
            .unwrap()
            .push("book")
            .push("bookmarklist");
        url.query_pairs_mut().append_pair("bookId", book_id);

        let context = format!("book/bookmarklist bookId={}", book_id);
        let response: BookmarkListResponse = self.get_json(url, &context).await?;
        Ok(response.chapters.into_iter().map(Into::into).collect())
    }
}
