//! Typed agent requests built from loosely-filled parameter bags.

use crate::domain::constants::AgentType;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::UploadedFile;
use crate::domain::validation::{non_empty, validate_url};

/// Caller-supplied parameters for an agent run. Which fields matter depends
/// on the agent; unused ones are ignored.
#[derive(Debug, Clone, Default)]
pub struct AgentParams {
    pub resume: Option<UploadedFile>,
    pub job_description: Option<String>,
    pub experience: Option<String>,
    pub profile_url: Option<String>,
    pub website_url: Option<String>,
    pub instagram_url: Option<String>,
    pub content: Option<String>,
    pub club_name: Option<String>,
    pub school_name: Option<String>,
    pub questions: Vec<String>,
}

/// Everything the application-coach endpoint needs, plus the resume to
/// upload beforehand when one was provided.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationCoachRequest {
    pub job_description: String,
    pub questions: Vec<String>,
    pub website_url: Option<String>,
    pub instagram_url: Option<String>,
    pub club_name: Option<String>,
    pub school_name: Option<String>,
    pub resume: Option<UploadedFile>,
}

/// One fully-validated call to a backend agent.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentRequest {
    TailorResume {
        resume: UploadedFile,
        job_description: String,
        club_name: Option<String>,
        school_name: Option<String>,
    },
    CoachInterview {
        job_description: String,
        experience: String,
    },
    CoachApplication(ApplicationCoachRequest),
    AnalyzeInstagram {
        profile_url: String,
    },
    AnalyzeWebsite {
        website_url: String,
    },
    Summarize {
        content: String,
    },
}

impl AgentRequest {
    /// Builds the request for `agent` from `params`, failing when a required
    /// parameter is blank or a URL does not parse.
    pub fn from_params(agent: AgentType, params: &AgentParams) -> DomainResult<Self> {
        let required = |value: &Option<String>, parameter: &'static str| {
            value
                .as_deref()
                .and_then(non_empty)
                .ok_or(DomainError::MissingParameter {
                    agent: agent.id(),
                    parameter,
                })
        };
        let optional = |value: &Option<String>| value.as_deref().and_then(non_empty);

        let request = match agent {
            AgentType::ResumeTailor => AgentRequest::TailorResume {
                resume: params.resume.clone().ok_or(DomainError::MissingParameter {
                    agent: agent.id(),
                    parameter: "resume",
                })?,
                job_description: required(&params.job_description, "job_description")?,
                club_name: optional(&params.club_name),
                school_name: optional(&params.school_name),
            },
            AgentType::InterviewCoach => AgentRequest::CoachInterview {
                job_description: required(&params.job_description, "job_description")?,
                experience: required(&params.experience, "experience")?,
            },
            AgentType::ApplicationCoach => {
                AgentRequest::CoachApplication(ApplicationCoachRequest {
                    job_description: required(&params.job_description, "job_description")?,
                    questions: params
                        .questions
                        .iter()
                        .filter_map(|q| non_empty(q))
                        .collect(),
                    website_url: optional(&params.website_url),
                    instagram_url: optional(&params.instagram_url),
                    club_name: optional(&params.club_name),
                    school_name: optional(&params.school_name),
                    resume: params.resume.clone(),
                })
            }
            AgentType::InstagramAnalyzer => {
                let url = required(&params.profile_url, "profile_url")?;
                validate_url(&url)?;
                AgentRequest::AnalyzeInstagram { profile_url: url }
            }
            AgentType::WebsiteAnalyzer => {
                let url = required(&params.website_url, "website_url")?;
                validate_url(&url)?;
                AgentRequest::AnalyzeWebsite { website_url: url }
            }
            AgentType::Summarizer => AgentRequest::Summarize {
                content: required(&params.content, "content")?,
            },
        };

        Ok(request)
    }

    pub fn agent_type(&self) -> AgentType {
        match self {
            AgentRequest::TailorResume { .. } => AgentType::ResumeTailor,
            AgentRequest::CoachInterview { .. } => AgentType::InterviewCoach,
            AgentRequest::CoachApplication(_) => AgentType::ApplicationCoach,
            AgentRequest::AnalyzeInstagram { .. } => AgentType::InstagramAnalyzer,
            AgentRequest::AnalyzeWebsite { .. } => AgentType::WebsiteAnalyzer,
            AgentRequest::Summarize { .. } => AgentType::Summarizer,
        }
    }
}
