use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A document as returned by the backend.
///
/// Documents are replaced wholesale by later fetches; the client never edits
/// fields of a stored value in place.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: String,
    /// Display order is the server's order.
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub versions: Vec<DocumentVersion>,
}

impl Document {
    /// Case-insensitive substring match over title, content, summary and tags.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self.summary.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
}

impl Author {
    /// Local part of the email address, used as a display name.
    pub fn user_name(&self) -> &str {
        self.email.split('@').next().unwrap_or_default()
    }
}

/// Prior snapshot of a document. Append-only on the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    #[serde(rename = "_id")]
    pub id: String,
    pub version_number: u32,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// One page of documents as reported by either list endpoint.
///
/// The tag endpoint omits `page` and `limit`; any field the server leaves
/// out is `None` and resolved by the caller.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Document>,
    pub total: Option<u64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total_pages: Option<u32>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Document>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Document>>::deserialize(deserializer)?.unwrap_or_default())
}
