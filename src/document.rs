use serde::Serialize;

/// A piece of fetched text along with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    text: String,
    metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DocumentMetadata {
    pub source: String,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Create a document with only a source and no title or author.
    pub fn from_source(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            text,
            DocumentMetadata {
                source: source.into(),
                ..Default::default()
            },
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A non-empty, ordered set of documents ready to be summarized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBatch(Vec<Document>);

impl DocumentBatch {
    /// Returns `None` when there is nothing to summarize.
    pub fn new(documents: Vec<Document>) -> Option<Self> {
        if documents.is_empty() {
            None
        } else {
            Some(Self(documents))
        }
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn word_count(&self) -> usize {
        self.0.iter().map(Document::word_count).sum()
    }

    /// All document bodies in order, separated by a blank line.
    pub fn joined_text(&self) -> String {
        self.0
            .iter()
            .map(Document::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batches_cannot_be_built() {
        assert!(DocumentBatch::new(Vec::new()).is_none());
    }

    #[test]
    fn joins_documents_in_order() {
        let batch = DocumentBatch::new(vec![
            Document::from_source("a", "first part"),
            Document::from_source("b", "second"),
        ])
        .unwrap();
        assert_eq!(batch.count(), 2);
        assert_eq!(batch.joined_text(), "first part\n\nsecond");
        assert_eq!(batch.word_count(), 3);
    }
}
