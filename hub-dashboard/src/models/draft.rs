use crate::error::DraftError;
use serde::Serialize;

/// Title and body of a document being created or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentDraft {
    pub title: String,
    pub content: String,
}

impl DocumentDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        let title_blank = self.title.trim().is_empty();
        let content_blank = self.content.trim().is_empty();

        match (title_blank, content_blank) {
            (true, true) => Err(DraftError::MissingTitleAndContent),
            (true, false) => Err(DraftError::MissingTitle),
            (false, true) => Err(DraftError::MissingContent),
            (false, false) => Ok(()),
        }
    }
}
