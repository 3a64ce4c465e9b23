pub mod logging;
pub mod request_context;

pub use logging::init_tracing;
pub use request_context::{REQUEST_ID_HEADER, RequestIdClientExt, TaggedRequest, new_request_id};
