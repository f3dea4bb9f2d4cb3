//! Agent dispatch: maps each logical agent call onto its backend endpoint
//! and request shape.

use crate::domain::{
    AgentRequest, AgentType, ApplicationCoachRequest, UPLOAD_RESUME_ENDPOINT, UploadedFile,
};
use crate::infrastructure::http::{ApiClient, ApiError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Shared flag a worker checks between the steps of a multi-request call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.is_cancelled() {
            Err(ApiError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Anything that can carry out an [`AgentRequest`].
pub trait AgentBackend: Send + Sync {
    fn dispatch(&self, request: &AgentRequest, cancel: &CancelToken) -> Result<Value, ApiError>;

    /// Address shown to the user when a call fails.
    fn describe(&self) -> String;
}

#[derive(Debug, Serialize)]
struct ResumeTailorBody<'a> {
    resume_path: &'a str,
    job_description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    club_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    school_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct InterviewCoachBody<'a> {
    job_description: &'a str,
    experience: &'a str,
}

#[derive(Debug, Serialize)]
struct ApplicationCoachBody<'a> {
    job_description: &'a str,
    questions: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    website_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instagram_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    club_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    school_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resume_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct InstagramBody<'a> {
    profile_url: &'a str,
}

#[derive(Debug, Serialize)]
struct WebsiteBody<'a> {
    website_url: &'a str,
}

#[derive(Debug, Serialize)]
struct SummarizerBody<'a> {
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UploadResponse {
    resume_path: Option<String>,
}

/// The dispatch service. One method per agent; resume-dependent agents
/// upload the file first and pass the server-side path along.
#[derive(Debug, Clone)]
pub struct AgentService {
    client: ApiClient,
}

impl AgentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Uploads a resume and returns the server-side path, if the backend
    /// reported one.
    pub fn upload_resume(&self, resume: &UploadedFile) -> Result<Option<String>, ApiError> {
        let response = self.client.upload_file(UPLOAD_RESUME_ENDPOINT, resume)?;
        let upload = match serde_json::from_value::<UploadResponse>(response) {
            Ok(upload) => upload,
            Err(err) => {
                warn!(file = %resume.name, error = %err, "unexpected upload response");
                UploadResponse::default()
            }
        };
        debug!(file = %resume.name, path = ?upload.resume_path, "resume uploaded");
        Ok(upload.resume_path)
    }

    pub fn tailor_resume(
        &self,
        resume: &UploadedFile,
        job_description: &str,
        club_name: Option<&str>,
        school_name: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<Value, ApiError> {
        let resume_path = self
            .upload_resume(resume)?
            .ok_or(ApiError::MissingField("resume_path"))?;
        cancel.check()?;
        self.client.post(
            AgentType::ResumeTailor.endpoint(),
            &ResumeTailorBody {
                resume_path: &resume_path,
                job_description,
                club_name,
                school_name,
            },
        )
    }

    pub fn coach_interview(&self, job_description: &str, experience: &str) -> Result<Value, ApiError> {
        self.client.post(
            AgentType::InterviewCoach.endpoint(),
            &InterviewCoachBody {
                job_description,
                experience,
            },
        )
    }

    pub fn coach_application(
        &self,
        request: &ApplicationCoachRequest,
        cancel: &CancelToken,
    ) -> Result<Value, ApiError> {
        let resume_path = match &request.resume {
            Some(resume) => {
                let path = self.upload_resume(resume)?;
                cancel.check()?;
                path
            }
            None => None,
        };

        self.client.post(
            AgentType::ApplicationCoach.endpoint(),
            &ApplicationCoachBody {
                job_description: &request.job_description,
                questions: &request.questions,
                website_url: request.website_url.as_deref(),
                instagram_url: request.instagram_url.as_deref(),
                club_name: request.club_name.as_deref(),
                school_name: request.school_name.as_deref(),
                resume_path,
            },
        )
    }

    pub fn analyze_instagram(&self, profile_url: &str) -> Result<Value, ApiError> {
        self.client.post(
            AgentType::InstagramAnalyzer.endpoint(),
            &InstagramBody { profile_url },
        )
    }

    pub fn analyze_website(&self, website_url: &str) -> Result<Value, ApiError> {
        self.client
            .post(AgentType::WebsiteAnalyzer.endpoint(), &WebsiteBody { website_url })
    }

    pub fn summarize_content(&self, content: &str) -> Result<Value, ApiError> {
        self.client
            .post(AgentType::Summarizer.endpoint(), &SummarizerBody { content })
    }
}

impl AgentBackend for AgentService {
    fn dispatch(&self, request: &AgentRequest, cancel: &CancelToken) -> Result<Value, ApiError> {
        info!(agent = %request.agent_type(), "dispatching agent request");
        match request {
            AgentRequest::TailorResume {
                resume,
                job_description,
                club_name,
                school_name,
            } => self.tailor_resume(
                resume,
                job_description,
                club_name.as_deref(),
                school_name.as_deref(),
                cancel,
            ),
            AgentRequest::CoachInterview {
                job_description,
                experience,
            } => self.coach_interview(job_description, experience),
            AgentRequest::CoachApplication(request) => self.coach_application(request, cancel),
            AgentRequest::AnalyzeInstagram { profile_url } => self.analyze_instagram(profile_url),
            AgentRequest::AnalyzeWebsite { website_url } => self.analyze_website(website_url),
            AgentRequest::Summarize { content } => self.summarize_content(content),
        }
    }

    fn describe(&self) -> String {
        self.client.base_url().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgentParams, MIME_PDF};
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn service(server: &MockServer) -> AgentService {
        AgentService::new(ApiClient::new(server.base_url()).unwrap())
    }

    fn resume() -> UploadedFile {
        UploadedFile::new("resume.pdf", MIME_PDF, b"%PDF-1.4 resume".to_vec())
    }

    #[test]
    fn coach_interview_should_rename_fields() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/agents/interview-coach")
                .json_body(json!({
                    "job_description": "Robotics lead",
                    "experience": "Built a rover"
                }));
            then.status(200).json_body(json!({ "likely_questions": ["Why?"] }));
        });

        let response = service(&server)
            .coach_interview("Robotics lead", "Built a rover")
            .unwrap();

        mock.assert();
        assert_eq!(response["likely_questions"][0], "Why?");
    }

    #[test]
    fn tailor_resume_should_upload_then_send_path() {
        let server = MockServer::start();
        let upload = server.mock(|when, then| {
            when.method(POST).path("/upload/resume");
            then.status(200)
                .json_body(json!({ "resume_path": "/srv/uploads/abc.pdf", "name": "resume.pdf" }));
        });
        let tailor = server.mock(|when, then| {
            when.method(POST)
                .path("/agents/resume-tailor")
                .json_body(json!({
                    "resume_path": "/srv/uploads/abc.pdf",
                    "job_description": "Robotics lead",
                    "club_name": "Robotics Club"
                }));
            then.status(200).json_body(json!({ "top5_fixes": ["Add metrics"] }));
        });

        let response = service(&server)
            .tailor_resume(
                &resume(),
                "Robotics lead",
                Some("Robotics Club"),
                None,
                &CancelToken::new(),
            )
            .unwrap();

        upload.assert();
        tailor.assert();
        assert_eq!(response["top5_fixes"][0], "Add metrics");
    }

    #[test]
    fn tailor_resume_should_fail_without_server_path() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/upload/resume");
            then.status(200).json_body(json!({ "name": "resume.pdf" }));
        });
        let tailor = server.mock(|when, then| {
            when.method(POST).path("/agents/resume-tailor");
            then.status(200).json_body(json!({}));
        });

        let err = service(&server)
            .tailor_resume(&resume(), "Robotics lead", None, None, &CancelToken::new())
            .unwrap_err();

        assert!(matches!(err, ApiError::MissingField("resume_path")));
        assert_eq!(tailor.hits(), 0);
    }

    #[test]
    fn upload_resume_should_treat_malformed_path_as_missing() {
        let server = MockServer::start();
        let upload = server.mock(|when, then| {
            when.method(POST).path("/upload/resume");
            then.status(200).json_body(json!({ "resume_path": 123 }));
        });

        let path = service(&server).upload_resume(&resume()).unwrap();

        assert_eq!(path, None);
        upload.assert();
    }

    #[test]
    fn coach_application_should_omit_absent_optionals() {
        let server = MockServer::start();
        let upload = server.mock(|when, then| {
            when.method(POST).path("/upload/resume");
            then.status(200).json_body(json!({}));
        });
        let coach = server.mock(|when, then| {
            when.method(POST)
                .path("/agents/application-coach")
                .json_body(json!({
                    "job_description": "Robotics Club at Westview High",
                    "questions": ["Why us?"],
                    "club_name": "Robotics Club",
                    "school_name": "Westview High"
                }));
            then.status(200).json_body(json!({ "answers": [] }));
        });

        let request = ApplicationCoachRequest {
            job_description: "Robotics Club at Westview High".to_string(),
            questions: vec!["Why us?".to_string()],
            website_url: None,
            instagram_url: None,
            club_name: Some("Robotics Club".to_string()),
            school_name: Some("Westview High".to_string()),
            resume: None,
        };
        service(&server)
            .coach_application(&request, &CancelToken::new())
            .unwrap();

        assert_eq!(upload.hits(), 0);
        coach.assert();
    }

    #[test]
    fn coach_application_should_stop_after_upload_when_cancelled() {
        let server = MockServer::start();
        let upload = server.mock(|when, then| {
            when.method(POST).path("/upload/resume");
            then.status(200).json_body(json!({ "resume_path": "/srv/a.pdf" }));
        });
        let coach = server.mock(|when, then| {
            when.method(POST).path("/agents/application-coach");
            then.status(200).json_body(json!({}));
        });

        let cancel = CancelToken::new();
        cancel.cancel();
        let request = ApplicationCoachRequest {
            job_description: "Robotics Club at Westview High".to_string(),
            questions: Vec::new(),
            website_url: None,
            instagram_url: None,
            club_name: None,
            school_name: None,
            resume: Some(resume()),
        };
        let err = service(&server)
            .coach_application(&request, &cancel)
            .unwrap_err();

        assert!(matches!(err, ApiError::Cancelled));
        upload.assert();
        assert_eq!(coach.hits(), 0);
    }

    #[test]
    fn dispatch_should_route_by_request_type() {
        let server = MockServer::start();
        let instagram = server.mock(|when, then| {
            when.method(POST)
                .path("/agents/instagram-analyzer")
                .json_body(json!({ "profile_url": "https://instagram.com/robotics" }));
            then.status(200).json_body(json!({ "tone": "upbeat" }));
        });

        let params = AgentParams {
            profile_url: Some("https://instagram.com/robotics".to_string()),
            ..AgentParams::default()
        };
        let request = AgentRequest::from_params(AgentType::InstagramAnalyzer, &params).unwrap();
        let response = service(&server)
            .dispatch(&request, &CancelToken::new())
            .unwrap();

        instagram.assert();
        assert_eq!(response["tone"], "upbeat");
    }

    #[test]
    fn dispatch_should_propagate_backend_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/agents/summarizer");
            then.status(503);
        });

        let request = AgentRequest::Summarize {
            content: "text".to_string(),
        };
        let err = service(&server)
            .dispatch(&request, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { .. }));
    }
}
