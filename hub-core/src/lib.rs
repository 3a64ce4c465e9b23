//! hub-core: Shared infrastructure for the document hub crates.
pub mod config;
pub mod observability;

pub use serde;
pub use tracing;
