pub mod activity;
pub mod document;
pub mod draft;
pub mod pagination;

pub use activity::{Activity, ActivityAction, recent_activity};
pub use document::{Author, Document, DocumentVersion, PagedResult};
pub use draft::DocumentDraft;
pub use pagination::{DisplayRange, PaginationInfo, total_pages_for};
