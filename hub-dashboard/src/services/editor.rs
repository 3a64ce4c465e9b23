use crate::error::SaveError;
use crate::models::{Document, DocumentDraft};
use crate::services::{Credential, DocumentClient};

/// Validate a draft, then create it (`id == None`) or update the existing
/// document.
pub async fn save_draft(
    client: &DocumentClient,
    credential: &Credential,
    id: Option<&str>,
    draft: &DocumentDraft,
) -> Result<Document, SaveError> {
    draft.validate()?;

    let saved = match id {
        None => client.create_document(credential, draft).await?,
        Some(id) => client.update_document(credential, id, draft).await?,
    };
    Ok(saved)
}
