use crate::error::{ListError, Severity};
use crate::models::{Document, PaginationInfo};

/// Last-known-good page of documents plus loading and error flags.
///
/// A load in flight keeps the previous items visible. Each commit replaces
/// items and pagination together.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    items: Vec<Document>,
    pagination: PaginationInfo,
    is_loading: bool,
    error: Option<ListError>,
}

impl ListState {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationInfo::empty(limit),
            is_loading: false,
            error: None,
        }
    }

    pub fn begin_load(&mut self) {
        self.is_loading = true;
    }

    pub fn commit_success(&mut self, items: Vec<Document>, pagination: PaginationInfo) {
        self.items = items;
        self.pagination = pagination;
        self.error = None;
        self.is_loading = false;
    }

    /// Clear the list and collapse pagination to page 1 with zero results.
    /// `limit` is the page size of the failed request.
    pub fn commit_failure(&mut self, error: ListError, limit: u32) {
        self.items.clear();
        self.pagination = PaginationInfo::empty(limit);
        self.error = Some(error);
        self.is_loading = false;
    }

    /// Remove a dismissible error. Blocking errors stay until a fetch succeeds.
    pub fn dismiss_error(&mut self) -> bool {
        match &self.error {
            Some(error) if error.severity == Severity::Dismissible => {
                self.error = None;
                true
            }
            _ => false,
        }
    }

    pub fn items(&self) -> &[Document] {
        &self.items
    }

    pub fn pagination(&self) -> PaginationInfo {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&ListError> {
        self.error.as_ref()
    }
}
