use thiserror::Error;

/// Validation failures raised before anything reaches the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("{0} is required")]
    RequiredField(&'static str),

    #[error("Please enter a URL")]
    EmptyUrl,

    #[error("Please enter a valid URL")]
    InvalidUrl(String),

    #[error("Please select a valid PDF or Word document")]
    UnsupportedFileType { name: String, mime_type: String },

    #[error("Unknown agent type: {0}")]
    UnknownAgent(String),

    #[error("Missing parameter for {agent}: {parameter}")]
    MissingParameter {
        agent: &'static str,
        parameter: &'static str,
    },

    #[error("Choose whether you have a resume ready")]
    ResumeChoiceRequired,

    #[error("Upload your resume to continue")]
    ResumeRequired,
}

pub type DomainResult<T> = Result<T, DomainError>;
