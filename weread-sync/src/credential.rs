use weread_common::{Result, SyncError};

/// Cookie fields the reading service requires for an authenticated session.
const REQUIRED_FIELDS: [&str; 2] = ["wr_vid", "wr_skey"];

/// A validated session cookie. Checked once at startup, before any network
/// call; read-only afterwards.
#[derive(Debug, Clone)]
pub struct Credential {
    raw: String,
}

impl Credential {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SyncError::Config("session cookie is empty".to_string()));
        }

        for field in REQUIRED_FIELDS {
            if !has_field(raw, field) {
                return Err(SyncError::Config(format!(
                    "session cookie is missing the {} field",
                    field
                )));
            }
        }

        Ok(Credential {
            raw: raw.to_string(),
        })
    }

    pub fn cookie_header(&self) -> &str {
        &self.raw
    }
}

fn has_field(cookie: &str, name: &str) -> bool {
    cookie.split(';').any(|pair| {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("").trim();
        let value = parts.next().unwrap_or("").trim();
        key == name && !value.is_empty()
    })
}
