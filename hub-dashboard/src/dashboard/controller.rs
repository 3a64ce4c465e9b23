//! The document list controller.
//!
//! Intents update the filter and cursor state synchronously, take a ticket
//! from the request sequence and only then await the data source. When a
//! response arrives its ticket is checked again: if a newer intent has been
//! issued in the meantime the response is dropped, so the list always
//! reflects the latest intent regardless of completion order.
//!
//! Everything after the ticket is issued runs on a spawned task, so every
//! `begin_load` is followed by a commit even when the caller stops waiting.

use super::{
    DashboardView, FetchPlan, FilterSet, ListState, Query, RequestSequence, RetrievalMode,
    TagIndex, Ticket,
};
use crate::config::DashboardSettings;
use crate::error::{FetchError, ListError};
use crate::models::{Activity, Document, PagedResult, PaginationInfo, recent_activity};
use crate::services::{Credential, DataSource};
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A user action forwarded by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetSearchTerm(String),
    ToggleTag(String),
    ClearFilters,
    PageChange(u32),
    LimitChange(u32),
    /// Re-run the current filters at the current page.
    Refresh,
}

/// What happened to the fetch an intent triggered.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The result was committed to the list.
    Committed,
    /// The fetch failed and the failure was committed to the list.
    Failed(FetchError),
    /// A newer intent was issued first; nothing was committed.
    Superseded,
    /// The intent did not change any filter; no fetch was issued.
    Unchanged,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    page: u32,
    limit: u32,
}

struct ControllerState {
    filters: FilterSet,
    cursor: Cursor,
    list: ListState,
    tags: TagIndex,
    activity: Vec<Activity>,
}

/// Owns the list state and tag index of one mounted list view.
///
/// The debounce, fetch and commit of every intent run on a spawned task, so
/// dropping the future returned by an intent handler does not leave a load
/// without its commit.
pub struct FilterController<S> {
    shared: Arc<Shared<S>>,
}

struct Shared<S> {
    source: S,
    credential: Mutex<Option<Credential>>,
    state: Mutex<ControllerState>,
    list_sequence: RequestSequence,
    tag_sequence: RequestSequence,
    settings: DashboardSettings,
}

/// Result of trying to commit a fetch.
enum Commit {
    Done(FetchOutcome),
    /// The committed page lies past the last page; fetch again.
    Refetch(Ticket, FetchPlan),
}

impl<S: DataSource + 'static> FilterController<S> {
    pub fn new(source: S, credential: Option<Credential>, settings: DashboardSettings) -> Self {
        let limit = settings.default_limit.max(1);
        Self {
            shared: Arc::new(Shared {
                source,
                credential: Mutex::new(credential),
                state: Mutex::new(ControllerState {
                    filters: FilterSet::default(),
                    cursor: Cursor { page: 1, limit },
                    list: ListState::new(limit),
                    tags: TagIndex::default(),
                    activity: Vec::new(),
                }),
                list_sequence: RequestSequence::new(),
                tag_sequence: RequestSequence::new(),
                settings,
            }),
        }
    }

    /// Load the first unfiltered page and the tag sample together.
    pub async fn initialize(&self) -> FetchOutcome {
        let (list, _) = tokio::join!(self.dispatch(Intent::Refresh), self.refresh_tags());
        list
    }

    /// Swap the credential used for subsequent fetches (sign-in, sign-out).
    pub fn set_credential(&self, credential: Option<Credential>) {
        *self
            .shared
            .credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = credential;
    }

    pub async fn set_search_term(&self, term: impl Into<String>) -> FetchOutcome {
        self.dispatch(Intent::SetSearchTerm(term.into())).await
    }

    pub async fn toggle_tag(&self, tag: impl Into<String>) -> FetchOutcome {
        self.dispatch(Intent::ToggleTag(tag.into())).await
    }

    pub async fn clear_filters(&self) -> FetchOutcome {
        self.dispatch(Intent::ClearFilters).await
    }

    pub async fn on_page_change(&self, page: u32) -> FetchOutcome {
        self.dispatch(Intent::PageChange(page)).await
    }

    pub async fn on_limit_change(&self, limit: u32) -> FetchOutcome {
        self.dispatch(Intent::LimitChange(limit)).await
    }

    pub async fn refresh(&self) -> FetchOutcome {
        self.dispatch(Intent::Refresh).await
    }

    /// Close the error banner. Returns false for blocking errors.
    pub fn dismiss_error(&self) -> bool {
        self.state().list.dismiss_error()
    }

    /// Apply an intent and run the fetch it implies.
    ///
    /// Filters and cursor change before this returns its first `Pending`.
    /// Search edits wait out the debounce window first and give up if any
    /// newer intent arrives during it.
    pub async fn dispatch(&self, intent: Intent) -> FetchOutcome {
        let debounce = match intent {
            Intent::SetSearchTerm(_) => self.shared.settings.search_debounce(),
            _ => Duration::ZERO,
        };

        let Some((ticket, plan)) = self.shared.prepare(intent) else {
            return FetchOutcome::Unchanged;
        };

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move { shared.run(ticket, plan, debounce).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => {
                tracing::warn!(seq = ticket.value(), error = %err, "Fetch task cancelled");
                FetchOutcome::Superseded
            }
        }
    }

    /// Re-sample documents and rebuild the tag index.
    ///
    /// On failure the previous tags are kept.
    pub async fn refresh_tags(&self) -> FetchOutcome {
        let shared = &self.shared;
        let ticket = shared.tag_sequence.issue();
        let plan = FetchPlan::unfiltered(1, shared.settings.tag_sample_limit);
        let result = shared.fetch(&plan).await;

        let mut state = self.state();
        if !shared.tag_sequence.is_current(ticket) {
            return FetchOutcome::Superseded;
        }
        match result {
            Ok(sample) => {
                state.tags.rebuild(&sample.data);
                tracing::debug!(
                    sampled = sample.data.len(),
                    tags = state.tags.len(),
                    "Tag index rebuilt"
                );
                FetchOutcome::Committed
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to refresh tag index");
                FetchOutcome::Failed(err)
            }
        }
    }

    pub fn view(&self) -> DashboardView {
        let state = self.state();
        let pagination = state.list.pagination();
        DashboardView {
            search_term: state.filters.search_term().to_string(),
            selected_tags: state.filters.selected_tags().iter().cloned().collect(),
            mode: state.filters.mode(),
            documents: state.list.items().to_vec(),
            pagination,
            is_loading: state.list.is_loading(),
            error: state.list.error().cloned(),
            all_tags: state.tags.to_vec(),
            recent_activity: state.activity.clone(),
            page_numbers: pagination.page_numbers(self.shared.settings.page_window),
            showing: pagination.display_range(),
        }
    }

    pub fn search_term(&self) -> String {
        self.state().filters.search_term().to_string()
    }

    pub fn selected_tags(&self) -> BTreeSet<String> {
        self.state().filters.selected_tags().clone()
    }

    pub fn mode(&self) -> RetrievalMode {
        self.state().filters.mode()
    }

    pub fn documents(&self) -> Vec<Document> {
        self.state().list.items().to_vec()
    }

    pub fn pagination(&self) -> PaginationInfo {
        self.state().list.pagination()
    }

    pub fn is_loading(&self) -> bool {
        self.state().list.is_loading()
    }

    pub fn error(&self) -> Option<ListError> {
        self.state().list.error().cloned()
    }

    pub fn all_tags(&self) -> Vec<String> {
        self.state().tags.to_vec()
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.shared.state()
    }
}

impl<S: DataSource> Shared<S> {
    /// Debounce, fetch and commit one planned load.
    ///
    /// A commit whose page lies past the last page (the page was clamped
    /// against pagination of a mode still in flight) refetches at the last
    /// page. Each retry requests a strictly smaller page, so this ends.
    async fn run(&self, ticket: Ticket, plan: FetchPlan, debounce: Duration) -> FetchOutcome {
        if !debounce.is_zero() {
            tokio::time::sleep(debounce).await;
            if !self.list_sequence.is_current(ticket) {
                tracing::debug!(seq = ticket.value(), "Search superseded during debounce");
                return FetchOutcome::Superseded;
            }
        }

        let (mut ticket, mut plan) = (ticket, plan);
        loop {
            let result = self.fetch(&plan).await;
            match self.commit(ticket, &plan, result) {
                Commit::Done(outcome) => return outcome,
                Commit::Refetch(next_ticket, next_plan) => {
                    ticket = next_ticket;
                    plan = next_plan;
                }
            }
        }
    }

    /// Update filters and cursor for `intent` and issue its ticket.
    fn prepare(&self, intent: Intent) -> Option<(Ticket, FetchPlan)> {
        let mut guard = self.state();
        let state = &mut *guard;

        let page = match intent {
            Intent::SetSearchTerm(term) => {
                if !state.filters.set_search_term(term) {
                    return None;
                }
                1
            }
            Intent::ToggleTag(tag) => {
                if !state.filters.toggle_tag(&tag) {
                    return None;
                }
                1
            }
            Intent::ClearFilters => {
                state.filters.clear();
                1
            }
            Intent::PageChange(requested) => {
                let page = state.list.pagination().clamp_page(requested);
                if page != requested {
                    tracing::debug!(requested, clamped = page, "Page request clamped");
                }
                page
            }
            Intent::LimitChange(limit) => {
                state.cursor.limit = limit.max(1);
                1
            }
            Intent::Refresh => state.cursor.page,
        };
        state.cursor.page = page;

        let plan = state.filters.plan(state.cursor.page, state.cursor.limit);
        let ticket = self.list_sequence.issue();
        state.list.begin_load();

        tracing::info!(
            seq = ticket.value(),
            mode = %plan.mode(),
            page = plan.page,
            limit = plan.limit,
            tags = plan.tags().unwrap_or(""),
            text = plan.text.is_some(),
            "Fetching documents"
        );
        Some((ticket, plan))
    }

    fn commit(
        &self,
        ticket: Ticket,
        plan: &FetchPlan,
        result: Result<PagedResult, FetchError>,
    ) -> Commit {
        let mut guard = self.state();
        let state = &mut *guard;

        if !self.list_sequence.is_current(ticket) {
            tracing::debug!(seq = ticket.value(), "Discarding superseded result");
            return Commit::Done(FetchOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                let (items, pagination) = plan.reconcile(page);
                let last_page = pagination.total_pages.max(1);
                if pagination.page > last_page {
                    tracing::debug!(
                        seq = ticket.value(),
                        page = pagination.page,
                        last_page,
                        "Committed page out of range, refetching last page"
                    );
                    state.cursor.page = last_page;
                    let next = state.filters.plan(last_page, plan.limit);
                    return Commit::Refetch(self.list_sequence.issue(), next);
                }
                tracing::info!(
                    seq = ticket.value(),
                    shown = items.len(),
                    total = pagination.total,
                    total_pages = pagination.total_pages,
                    "Documents committed"
                );
                state.activity = recent_activity(&items, Utc::now());
                state.cursor = Cursor {
                    page: pagination.page,
                    limit: pagination.limit,
                };
                state.list.commit_success(items, pagination);
                Commit::Done(FetchOutcome::Committed)
            }
            Err(err) => {
                tracing::warn!(seq = ticket.value(), error = %err, "Document fetch failed");
                state.activity.clear();
                state.cursor.page = 1;
                state.list.commit_failure(ListError::from(&err), plan.limit);
                Commit::Done(FetchOutcome::Failed(err))
            }
        }
    }

    async fn fetch(&self, plan: &FetchPlan) -> Result<PagedResult, FetchError> {
        let credential = self
            .current_credential()
            .ok_or(FetchError::AuthenticationRequired)?;

        let timeout = self.settings.request_timeout();
        let call = async {
            match &plan.query {
                Query::All => {
                    self.source
                        .fetch_page(&credential, plan.page, plan.limit)
                        .await
                }
                Query::Tags(tags) => {
                    self.source
                        .fetch_by_tags(&credential, tags, plan.page, plan.limit)
                        .await
                }
            }
        };

        tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| FetchError::Timeout { after: timeout })?
    }

    fn current_credential(&self) -> Option<Credential> {
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|credential| !credential.is_blank())
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
