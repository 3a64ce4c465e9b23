use super::Document;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Entries shown in the activity sidebar.
pub const RECENT_ACTIVITY_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Edited,
    Viewed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub doc_id: String,
    pub doc_title: String,
    pub user_id: String,
    pub user_name: String,
    pub action: ActivityAction,
    pub timestamp: DateTime<Utc>,
}

/// Derive the activity feed from the head of the current page.
///
/// The backend has no activity endpoint, so entries alternate between edited
/// and viewed and are spaced one hour apart going back from `now`.
pub fn recent_activity(documents: &[Document], now: DateTime<Utc>) -> Vec<Activity> {
    documents
        .iter()
        .take(RECENT_ACTIVITY_LEN)
        .enumerate()
        .map(|(index, doc)| Activity {
            doc_id: doc.id.clone(),
            doc_title: doc.title.clone(),
            user_id: doc.created_by.id.clone(),
            user_name: doc.created_by.user_name().to_string(),
            action: if index % 2 == 0 {
                ActivityAction::Edited
            } else {
                ActivityAction::Viewed
            },
            timestamp: now - Duration::hours(index as i64 + 1),
        })
        .collect()
}
