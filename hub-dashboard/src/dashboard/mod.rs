//! Client-side document list engine: reconciles a server-paginated list with
//! the search and tag filters under overlapping asynchronous fetches.

pub mod controller;
pub mod filters;
pub mod list_state;
pub mod sequence;
pub mod tag_index;
pub mod view;

pub use controller::{FetchOutcome, FilterController, Intent};
pub use filters::{FetchPlan, FilterSet, Query, RetrievalMode};
pub use list_state::ListState;
pub use sequence::{RequestSequence, Ticket};
pub use tag_index::TagIndex;
pub use view::DashboardView;
