use crate::models::{Document, PagedResult, PaginationInfo, total_pages_for};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Which pagination path is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RetrievalMode {
    /// No filter: the backend owns pagination.
    ServerPaged,
    /// A search term or tag is active and the client reconciles results.
    LocallyFiltered,
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalMode::ServerPaged => write!(f, "server_paged"),
            RetrievalMode::LocallyFiltered => write!(f, "locally_filtered"),
        }
    }
}

/// The user's current filter predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    search_term: String,
    selected_tags: BTreeSet<String>,
}

impl FilterSet {
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected_tags
    }

    /// Returns false when the term is unchanged.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search_term {
            return false;
        }
        self.search_term = term;
        true
    }

    /// Select or deselect `tag`. Blank tags are ignored and return false.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if tag.trim().is_empty() {
            return false;
        }
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
        true
    }

    pub fn clear(&mut self) {
        self.search_term.clear();
        self.selected_tags.clear();
    }

    /// Lower-cased, trimmed search needle; `None` when there is no text filter.
    pub fn text_predicate(&self) -> Option<String> {
        let trimmed = self.search_term.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    pub fn mode(&self) -> RetrievalMode {
        if self.text_predicate().is_some() || !self.selected_tags.is_empty() {
            RetrievalMode::LocallyFiltered
        } else {
            RetrievalMode::ServerPaged
        }
    }

    /// The fetch that realizes these filters at `page`/`limit`.
    pub fn plan(&self, page: u32, limit: u32) -> FetchPlan {
        let query = if self.selected_tags.is_empty() {
            Query::All
        } else {
            Query::Tags(self.joined_tags())
        };
        FetchPlan {
            query,
            text: self.text_predicate(),
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    fn joined_tags(&self) -> String {
        self.selected_tags
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Endpoint a plan is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    All,
    /// Comma-joined tag list; the server applies the tag predicate.
    Tags(String),
}

/// A single fetch: where to ask, which page, and what to narrow locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub query: Query,
    pub text: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl FetchPlan {
    pub fn unfiltered(page: u32, limit: u32) -> Self {
        Self {
            query: Query::All,
            text: None,
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn mode(&self) -> RetrievalMode {
        if self.query == Query::All && self.text.is_none() {
            RetrievalMode::ServerPaged
        } else {
            RetrievalMode::LocallyFiltered
        }
    }

    pub fn tags(&self) -> Option<&str> {
        match &self.query {
            Query::All => None,
            Query::Tags(tags) => Some(tags),
        }
    }

    /// Turn a server page into the items and pagination to commit.
    ///
    /// The text filter narrows only the page the server returned, after the
    /// server paginated, so a narrowed page can hold fewer than `limit` items
    /// while `total` and `total_pages` describe that page alone.
    pub fn reconcile(&self, result: PagedResult) -> (Vec<Document>, PaginationInfo) {
        let PagedResult {
            data,
            total,
            page,
            limit,
            total_pages,
        } = result;

        if let Some(needle) = &self.text {
            let narrowed: Vec<Document> = data
                .into_iter()
                .filter(|doc| doc.matches_text(needle))
                .collect();
            let pagination = PaginationInfo::computed(narrowed.len() as u64, self.page, self.limit);
            return (narrowed, pagination);
        }

        let total = total.unwrap_or(0);
        let pagination = match self.query {
            Query::All => {
                let limit = limit.filter(|l| *l > 0).unwrap_or(self.limit);
                PaginationInfo {
                    total,
                    page: page.filter(|p| *p > 0).unwrap_or(self.page),
                    limit,
                    total_pages: total_pages.unwrap_or_else(|| total_pages_for(total, limit)),
                }
            }
            Query::Tags(_) => PaginationInfo {
                total,
                page: self.page,
                limit: self.limit,
                total_pages: total_pages.unwrap_or_else(|| total_pages_for(total, self.limit)),
            },
        };
        (data, pagination)
    }
}
