//! Standalone agent pages reached from the dashboard.

use crate::application::execution::{AgentExecution, ExecutionError};
use crate::domain::{
    AgentParams, AgentRequest, AgentType, FileSelection, UploadedFile, non_empty, validate_url,
};
use crate::infrastructure::AgentBackend;
use std::sync::Arc;

/// Raw text typed into an agent form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentForm {
    pub resume_path: String,
    pub job_description: String,
    pub experience: String,
    pub club_name: String,
    pub school_name: String,
    pub profile_url: String,
    pub website_url: String,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct AgentPanel {
    pub agent: Option<AgentType>,
    pub form: AgentForm,
    pub resume: FileSelection,
    pub validation_error: Option<String>,
    pub execution: AgentExecution,
}

impl AgentPanel {
    /// Switches to `agent` with an empty form, abandoning any running call.
    pub fn open(&mut self, agent: AgentType) {
        self.execution.cancel();
        *self = AgentPanel {
            agent: Some(agent),
            ..AgentPanel::default()
        };
    }

    pub fn close(&mut self) {
        self.execution.cancel();
        self.agent = None;
    }

    pub fn select_resume(&mut self, file: Option<UploadedFile>) {
        self.resume.select_file(file);
    }

    pub fn reject_resume(&mut self, message: String) {
        self.resume.clear_file();
        self.resume.error = Some(message);
    }

    pub fn params(&self) -> AgentParams {
        AgentParams {
            resume: self.resume.file.clone(),
            job_description: non_empty(&self.form.job_description),
            experience: non_empty(&self.form.experience),
            profile_url: non_empty(&self.form.profile_url),
            website_url: non_empty(&self.form.website_url),
            instagram_url: None,
            content: non_empty(&self.form.content),
            club_name: non_empty(&self.form.club_name),
            school_name: non_empty(&self.form.school_name),
            questions: Vec::new(),
        }
    }

    /// Validates the form and starts the agent in the background.
    ///
    /// Validation problems are stored in `validation_error` and nothing is
    /// sent.
    pub fn run(&mut self, backend: Arc<dyn AgentBackend>) -> Result<(), ExecutionError> {
        let Some(agent) = self.agent else {
            return Ok(());
        };
        self.validation_error = None;

        let url_check = match agent {
            AgentType::InstagramAnalyzer => Some(validate_url(&self.form.profile_url)),
            AgentType::WebsiteAnalyzer => Some(validate_url(&self.form.website_url)),
            _ => None,
        };
        if let Some(Err(err)) = url_check {
            self.validation_error = Some(err.to_string());
            return Err(err.into());
        }

        let request = match AgentRequest::from_params(agent, &self.params()) {
            Ok(request) => request,
            Err(err) => {
                self.validation_error = Some(err.to_string());
                return Err(err.into());
            }
        };

        self.execution.spawn(backend, request)
    }

    pub fn run_label(&self) -> &'static str {
        match self.agent {
            Some(agent) if self.execution.loading => agent.busy_label(),
            Some(AgentType::ResumeTailor) => "Tailor Resume",
            Some(AgentType::InterviewCoach) => "Get Coaching",
            Some(AgentType::ApplicationCoach) => "Get Application Advice",
            Some(AgentType::InstagramAnalyzer) | Some(AgentType::WebsiteAnalyzer) => "Analyze",
            Some(AgentType::Summarizer) => "Summarize",
            None => "Run",
        }
    }
}
