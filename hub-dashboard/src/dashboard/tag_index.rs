use crate::models::Document;
use std::collections::BTreeSet;

/// Sorted, de-duplicated tags across a sample of documents.
///
/// The sample is a single page of fixed size, so corpora larger than the
/// sample may be missing tags here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    tags: BTreeSet<String>,
}

impl TagIndex {
    /// Replace the index with the tags of `documents`.
    pub fn rebuild(&mut self, documents: &[Document]) {
        self.tags = documents
            .iter()
            .flat_map(|doc| doc.tags.iter().cloned())
            .collect();
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}
