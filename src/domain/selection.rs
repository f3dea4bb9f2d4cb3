//! Single-file selection with MIME type validation.

use crate::domain::constants::RESUME_FILE_TYPES;
use crate::domain::errors::DomainError;
use crate::domain::models::UploadedFile;
use serde::Serialize;

/// Tracks one selected file and the last validation error.
///
/// Each call synchronously replaces the prior state, so there is never more
/// than one selection in flight.
///
/// # Examples
///
/// ```
/// use clubapply::domain::{FileSelection, UploadedFile, MIME_PDF};
///
/// let mut selection = FileSelection::default();
/// selection.select_file(Some(UploadedFile::new("cv.pdf", MIME_PDF, vec![1, 2, 3])));
/// assert!(selection.file.is_some());
/// assert!(selection.error.is_none());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct FileSelection {
    pub file: Option<UploadedFile>,
    pub error: Option<String>,
    #[serde(skip)]
    allowed: &'static [&'static str],
}

impl Default for FileSelection {
    fn default() -> Self {
        Self::with_allowed(RESUME_FILE_TYPES)
    }
}

impl FileSelection {
    pub fn with_allowed(allowed: &'static [&'static str]) -> Self {
        Self {
            file: None,
            error: None,
            allowed,
        }
    }

    /// Selects `file`, or clears the selection when `None`.
    ///
    /// A file whose declared MIME type is outside the allow-list is rejected:
    /// the stored file is left unset and `error` describes the problem.
    pub fn select_file(&mut self, file: Option<UploadedFile>) {
        self.error = None;

        let Some(file) = file else {
            self.file = None;
            return;
        };

        if !file.is_accepted(self.allowed) {
            let err = DomainError::UnsupportedFileType {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            };
            tracing::warn!(file = %file.name, mime_type = %file.mime_type, "rejected file selection");
            self.file = None;
            self.error = Some(err.to_string());
            return;
        }

        tracing::debug!(file = %file.name, bytes = file.bytes.len(), "file selected");
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
        self.error = None;
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::{MIME_DOC, MIME_DOCX, MIME_PDF, MIME_TEXT, QUESTION_FILE_TYPES};

    fn file(name: &str, mime: &str) -> UploadedFile {
        UploadedFile::new(name, mime, b"content".to_vec())
    }

    #[test]
    fn test_accepts_pdf_doc_docx() {
        for mime in [MIME_PDF, MIME_DOC, MIME_DOCX] {
            let mut selection = FileSelection::default();
            selection.select_file(Some(file("resume", mime)));
            assert_eq!(selection.file_name(), Some("resume"));
            assert!(selection.error.is_none());
        }
    }

    #[test]
    fn test_rejects_other_types() {
        let mut selection = FileSelection::default();
        selection.select_file(Some(file("photo.png", "image/png")));
        assert!(selection.file.is_none());
        let error = selection.error.clone().unwrap();
        assert!(!error.is_empty());
    }

    #[test]
    fn test_rejection_does_not_keep_previous_file() {
        let mut selection = FileSelection::default();
        selection.select_file(Some(file("resume.pdf", MIME_PDF)));
        selection.select_file(Some(file("notes.txt", MIME_TEXT)));
        assert!(selection.file.is_none());
        assert!(selection.error.is_some());
    }

    #[test]
    fn test_valid_selection_clears_prior_error() {
        let mut selection = FileSelection::default();
        selection.select_file(Some(file("photo.png", "image/png")));
        assert!(selection.error.is_some());

        selection.select_file(Some(file("resume.pdf", MIME_PDF)));
        assert!(selection.error.is_none());
        assert_eq!(selection.file_name(), Some("resume.pdf"));
    }

    #[test]
    fn test_select_none_clears() {
        let mut selection = FileSelection::default();
        selection.select_file(Some(file("resume.pdf", MIME_PDF)));
        selection.select_file(None);
        assert!(selection.file.is_none());
        assert!(selection.error.is_none());
    }

    #[test]
    fn test_clear_file_resets_error() {
        let mut selection = FileSelection::default();
        selection.select_file(Some(file("photo.png", "image/png")));
        selection.clear_file();
        assert!(selection.file.is_none());
        assert!(selection.error.is_none());
    }

    #[test]
    fn test_question_documents_accept_text() {
        let mut selection = FileSelection::with_allowed(QUESTION_FILE_TYPES);
        selection.select_file(Some(file("questions.txt", MIME_TEXT)));
        assert_eq!(selection.file_name(), Some("questions.txt"));
    }
}
