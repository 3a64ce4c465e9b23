pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod services;

pub use dashboard::{DashboardView, FetchOutcome, FilterController, Intent, RetrievalMode};
pub use error::{FetchError, ListError, Severity};
pub use services::{Credential, DataSource, DocumentClient};
