use crate::domain::{MIME_CSV, UploadedFile, mime_type_for};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// File system access for picked documents and exported reports.
pub struct ReportRepository;

impl ReportRepository {
    /// Reads `path` into memory, declaring a MIME type from its extension.
    pub fn load_file(path: &str) -> Result<UploadedFile, String> {
        let path = Path::new(path.trim());
        let bytes = fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_type_for(&name);
        Ok(UploadedFile::new(name, mime_type, bytes))
    }

    pub fn save_report(result: &Value, filename: &str) -> Result<String, String> {
        match serde_json::to_string_pretty(result) {
            Ok(json) => match fs::write(filename, &json) {
                Ok(_) => Ok(filename.to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }

    /// Extracts questions from a plain-text or CSV questions document.
    ///
    /// Text files yield one question per non-blank line; CSV files yield the
    /// first column of each record. Binary documents are not parsed.
    pub fn import_questions(file: &UploadedFile) -> Result<Vec<String>, String> {
        if file.mime_type == MIME_CSV {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(file.bytes.as_slice());
            let mut questions = Vec::new();
            for record in reader.records() {
                let record = record.map_err(|e| format!("Invalid CSV - {}", e))?;
                if let Some(question) = record.get(0).map(str::trim).filter(|q| !q.is_empty()) {
                    questions.push(question.to_string());
                }
            }
            return Ok(questions);
        }

        if file.mime_type.starts_with("text/") {
            let text = String::from_utf8_lossy(&file.bytes);
            return Ok(text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect());
        }

        Ok(Vec::new())
    }
}
