pub mod credential;
pub mod data_source;
pub mod document_client;
pub mod editor;

pub use credential::Credential;
pub use data_source::DataSource;
pub use document_client::DocumentClient;
