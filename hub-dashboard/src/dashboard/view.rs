use super::RetrievalMode;
use crate::error::ListError;
use crate::models::{Activity, DisplayRange, Document, PaginationInfo};
use serde::Serialize;

/// Everything the view layer renders, captured at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub search_term: String,
    pub selected_tags: Vec<String>,
    pub mode: RetrievalMode,
    pub documents: Vec<Document>,
    pub pagination: PaginationInfo,
    pub is_loading: bool,
    pub error: Option<ListError>,
    pub all_tags: Vec<String>,
    pub recent_activity: Vec<Activity>,
    pub page_numbers: Vec<u32>,
    pub showing: Option<DisplayRange>,
}
