//! Static tables describing the available agents and accepted file types.

use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";
pub const MIME_CSV: &str = "text/csv";
pub const MIME_UNKNOWN: &str = "application/octet-stream";

/// MIME types accepted for resumes.
pub const RESUME_FILE_TYPES: &[&str] = &[MIME_PDF, MIME_DOC, MIME_DOCX];

/// MIME types accepted for application question documents.
pub const QUESTION_FILE_TYPES: &[&str] = &[MIME_PDF, MIME_DOC, MIME_DOCX, MIME_TEXT, MIME_CSV];

/// Maps a file name to the MIME type a browser would declare for it.
pub fn mime_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => MIME_PDF,
        "doc" => MIME_DOC,
        "docx" => MIME_DOCX,
        "txt" => MIME_TEXT,
        "csv" => MIME_CSV,
        _ => MIME_UNKNOWN,
    }
}

/// A named backend capability reached through its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    ResumeTailor,
    InterviewCoach,
    ApplicationCoach,
    InstagramAnalyzer,
    WebsiteAnalyzer,
    Summarizer,
}

impl AgentType {
    /// Every agent, in dashboard order.
    pub const ALL: [AgentType; 6] = [
        AgentType::ResumeTailor,
        AgentType::InterviewCoach,
        AgentType::ApplicationCoach,
        AgentType::InstagramAnalyzer,
        AgentType::WebsiteAnalyzer,
        AgentType::Summarizer,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AgentType::ResumeTailor => "resume_tailor",
            AgentType::InterviewCoach => "interview_coach",
            AgentType::ApplicationCoach => "application_coach",
            AgentType::InstagramAnalyzer => "instagram_analyzer",
            AgentType::WebsiteAnalyzer => "website_analyzer",
            AgentType::Summarizer => "summarizer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentType::ResumeTailor => "Resume Tailor",
            AgentType::InterviewCoach => "Interview Coach",
            AgentType::ApplicationCoach => "Application Coach",
            AgentType::InstagramAnalyzer => "Instagram Analyzer",
            AgentType::WebsiteAnalyzer => "Website Analyzer",
            AgentType::Summarizer => "Content Summarizer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgentType::ResumeTailor => "Optimize your resume for specific job applications",
            AgentType::InterviewCoach => "Get personalized interview preparation and tips",
            AgentType::ApplicationCoach => "Receive guidance on job application strategies",
            AgentType::InstagramAnalyzer => "Analyze Instagram profiles for professional insights",
            AgentType::WebsiteAnalyzer => "Extract and analyze website content",
            AgentType::Summarizer => "Summarize long content into key insights",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AgentType::ResumeTailor => "📄",
            AgentType::InterviewCoach => "🎯",
            AgentType::ApplicationCoach => "💼",
            AgentType::InstagramAnalyzer => "📱",
            AgentType::WebsiteAnalyzer => "🌐",
            AgentType::Summarizer => "📝",
        }
    }

    /// Backend path for this agent.
    pub fn endpoint(&self) -> &'static str {
        match self {
            AgentType::ResumeTailor => "/agents/resume-tailor",
            AgentType::InterviewCoach => "/agents/interview-coach",
            AgentType::ApplicationCoach => "/agents/application-coach",
            AgentType::InstagramAnalyzer => "/agents/instagram-analyzer",
            AgentType::WebsiteAnalyzer => "/agents/website-analyzer",
            AgentType::Summarizer => "/agents/summarizer",
        }
    }

    /// Label shown on the run control while a call is outstanding.
    pub fn busy_label(&self) -> &'static str {
        match self {
            AgentType::ResumeTailor => "Tailoring Resume...",
            AgentType::InterviewCoach => "Preparing Coaching...",
            AgentType::ApplicationCoach => "Generating…",
            AgentType::InstagramAnalyzer | AgentType::WebsiteAnalyzer => "Analyzing...",
            AgentType::Summarizer => "Summarizing...",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AgentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .into_iter()
            .find(|agent| agent.id() == s)
            .ok_or_else(|| DomainError::UnknownAgent(s.to_string()))
    }
}

pub const UPLOAD_RESUME_ENDPOINT: &str = "/upload/resume";
pub const UPLOAD_FIELD_NAME: &str = "file";
