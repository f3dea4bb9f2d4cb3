//! The three-step application wizard and its final submission.

use crate::application::execution::{AgentExecution, Completion, ExecutionError};
use crate::domain::{
    AgentRequest, ApplicationCoachRequest, ApplicationStage, ClubInfo, DomainError, DomainResult,
    ManualProfile, PersonalInfo, ResumeChoice, ShortAnswers, UploadedFile, non_empty, require,
};
use crate::infrastructure::AgentBackend;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    #[default]
    ClubInfo,
    PersonalInfo,
    ShortAnswers,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::ClubInfo => 1,
            WizardStep::PersonalInfo => 2,
            WizardStep::ShortAnswers => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::ClubInfo => "Club Application Assistant",
            WizardStep::PersonalInfo => "Personal Information",
            WizardStep::ShortAnswers => "Short Answer Questions",
        }
    }
}

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub club: ClubInfo,
    pub personal: PersonalInfo,
    pub short_answers: ShortAnswers,
}

/// What happened when the personal-info page was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalOutcome {
    /// Moved on to the short-answer questions.
    Advanced,
    /// The stage has no questions page; generate the application now.
    Generate,
}

/// Owns the [`WizardState`] and is the only thing that changes it.
#[derive(Debug, Default)]
pub struct Wizard {
    state: WizardState,
    pub execution: AgentExecution,
}

impl Wizard {
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn club_mut(&mut self) -> &mut ClubInfo {
        &mut self.state.club
    }

    pub fn profile_mut(&mut self) -> &mut ManualProfile {
        &mut self.state.personal.profile
    }

    pub fn set_stage(&mut self, stage: ApplicationStage) {
        self.state.club.application_stage = stage;
    }

    pub fn set_resume_choice(&mut self, choice: ResumeChoice) {
        self.state.personal.resume_choice = choice;
    }

    pub fn select_resume(&mut self, file: Option<UploadedFile>) {
        self.state.personal.resume.select_file(file);
    }

    pub fn reject_resume(&mut self, message: String) {
        self.state.personal.resume.clear_file();
        self.state.personal.resume.error = Some(message);
    }

    /// Selects a questions document; returns whether it was accepted.
    pub fn select_questions_file(&mut self, file: Option<UploadedFile>) -> bool {
        self.state.short_answers.questions_file.select_file(file);
        self.state.short_answers.questions_file.file.is_some()
    }

    pub fn reject_questions_file(&mut self, message: String) {
        self.state.short_answers.questions_file.clear_file();
        self.state.short_answers.questions_file.error = Some(message);
    }

    pub fn add_question(&mut self) {
        self.state.short_answers.add_question();
    }

    pub fn edit_question(&mut self, index: usize, text: impl Into<String>) {
        self.state.short_answers.edit_question(index, text);
    }

    pub fn remove_question(&mut self, index: usize) {
        self.state.short_answers.remove_question(index);
    }

    pub fn question_mut(&mut self, index: usize) -> Option<&mut String> {
        self.state.short_answers.questions.get_mut(index)
    }

    pub fn import_questions(&mut self, questions: Vec<String>) {
        self.state.short_answers.questions.extend(questions);
    }

    /// Step 1 → 2. Club and school names are required; nothing else is.
    pub fn submit_club_info(&mut self) -> DomainResult<()> {
        let club = &self.state.club;
        if let Err(err) = require("Club name", &club.club_name)
            .and_then(|_| require("School name", &club.school_name))
        {
            warn!(error = %err, "club info incomplete");
            return Err(err);
        }

        self.state.step = WizardStep::PersonalInfo;
        info!(club = %club.club_name.trim(), stage = ?club.application_stage, "club info submitted");
        Ok(())
    }

    /// Step 2 → 3 for online applications; otherwise asks for generation.
    pub fn submit_personal_info(&mut self) -> DomainResult<PersonalOutcome> {
        let personal = &self.state.personal;
        let check = match personal.resume_choice {
            ResumeChoice::Unknown => Err(DomainError::ResumeChoiceRequired),
            ResumeChoice::HasResume if personal.resume.file.is_none() => {
                Err(DomainError::ResumeRequired)
            }
            ResumeChoice::HasResume => Ok(()),
            ResumeChoice::Manual => require("Full name", &personal.profile.name)
                .and_then(|_| require("Email", &personal.profile.email))
                .and_then(|_| require("Education", &personal.profile.education)),
        };
        if let Err(err) = check {
            warn!(error = %err, "personal info incomplete");
            return Err(err);
        }

        if self.state.club.application_stage == ApplicationStage::OnlineApplication {
            self.state.step = WizardStep::ShortAnswers;
            info!("personal info submitted, moving to questions");
            Ok(PersonalOutcome::Advanced)
        } else {
            info!(stage = ?self.state.club.application_stage, "personal info submitted, generating");
            Ok(PersonalOutcome::Generate)
        }
    }

    /// Steps back one page without validation. Any call started from the
    /// page being left is cancelled.
    pub fn go_back(&mut self) {
        self.execution.cancel();
        self.state.step = match self.state.step {
            WizardStep::ClubInfo | WizardStep::PersonalInfo => WizardStep::ClubInfo,
            WizardStep::ShortAnswers => WizardStep::PersonalInfo,
        };
        debug!(step = self.state.step.number(), "navigated back");
    }

    /// The application-coach request for everything collected so far.
    pub fn build_submission(&self) -> ApplicationCoachRequest {
        let club = &self.state.club;
        let resume = match self.state.personal.resume_choice {
            ResumeChoice::HasResume => self.state.personal.resume.file.clone(),
            _ => None,
        };

        ApplicationCoachRequest {
            job_description: club.description(),
            questions: self.state.short_answers.cleaned_questions(),
            website_url: non_empty(&club.website),
            instagram_url: non_empty(&club.instagram),
            club_name: Some(club.club_name.trim().to_string()),
            school_name: Some(club.school_name.trim().to_string()),
            resume,
        }
    }

    /// Starts the final application-coach call. The previous result is
    /// cleared first, so a failure leaves the result area empty.
    pub fn start_final_submit(&mut self, backend: Arc<dyn AgentBackend>) -> Result<(), ExecutionError> {
        if self.execution.loading {
            return Err(ExecutionError::Busy);
        }
        let submission = self.build_submission();
        debug!(questions = submission.questions.len(), has_resume = submission.resume.is_some(), "final submission");
        self.execution.clear_result();
        self.execution
            .spawn(backend, AgentRequest::CoachApplication(submission))
    }

    pub fn poll(&mut self) -> Option<Completion> {
        self.execution.poll()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.execution.loading {
            "Generating…"
        } else {
            "Help me get in"
        }
    }

    /// Label for the personal-info submit control, which depends on stage.
    pub fn personal_submit_label(&self) -> &'static str {
        if self.state.club.application_stage == ApplicationStage::OnlineApplication {
            "Continue to Questions"
        } else if self.execution.loading {
            "Generating…"
        } else {
            "Generate Application"
        }
    }
}
