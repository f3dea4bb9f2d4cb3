//! Top-level state for the terminal interface.
//!
//! [`App`] ties the wizard, the agent dashboard and the agent pages together
//! with the focus, cursor and popup state the UI needs to render.

use crate::application::agent_panel::AgentPanel;
use crate::application::execution::Completion;
use crate::application::fields::Field;
use crate::application::wizard::{PersonalOutcome, Wizard, WizardStep};
use crate::domain::{AgentReport, AgentType, ResumeChoice, UploadedFile};
use crate::infrastructure::{AgentBackend, ReportRepository};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// File the current result is exported to.
pub const REPORT_FILENAME: &str = "clubapply-report.json";

/// Which page is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The three-step application wizard
    Wizard,
    /// The list of standalone agents
    Dashboard,
    /// A single agent's form and results
    Agent,
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use clubapply::application::{App, Screen};
/// use clubapply::infrastructure::{AgentService, ApiClient};
/// use std::sync::Arc;
///
/// let client = ApiClient::new("http://localhost:8000").unwrap();
/// let app = App::new(Arc::new(AgentService::new(client)));
/// assert_eq!(app.screen, Screen::Wizard);
/// assert_eq!(app.focus, 0);
/// ```
pub struct App {
    /// Page currently shown
    pub screen: Screen,
    /// The application wizard
    pub wizard: Wizard,
    /// The agent page opened from the dashboard
    pub agent_panel: AgentPanel,
    /// Highlighted row of the dashboard
    pub dashboard_index: usize,
    /// Index into [`App::fields`] of the focused control
    pub focus: usize,
    /// Cursor position, in characters, within the focused text field
    pub cursor_position: usize,
    /// Typed path of the wizard's resume file
    pub resume_path: String,
    /// Typed path of the questions document
    pub questions_path: String,
    /// Validation message for the current wizard page
    pub form_error: Option<String>,
    /// Modal message that must be dismissed
    pub alert: Option<String>,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Whether the help popup is open
    pub show_help: bool,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Scroll position in the results pane
    pub result_scroll: u16,
    /// Set when the user asks to quit
    pub should_quit: bool,
    backend: Arc<dyn AgentBackend>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("wizard", &self.wizard)
            .field("agent_panel", &self.agent_panel)
            .field("focus", &self.focus)
            .field("backend", &self.backend.describe())
            .finish_non_exhaustive()
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

impl App {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            screen: Screen::Wizard,
            wizard: Wizard::default(),
            agent_panel: AgentPanel::default(),
            dashboard_index: 0,
            focus: 0,
            cursor_position: 0,
            resume_path: String::new(),
            questions_path: String::new(),
            form_error: None,
            alert: None,
            status_message: None,
            show_help: false,
            help_scroll: 0,
            result_scroll: 0,
            should_quit: false,
            backend,
        }
    }

    pub fn backend(&self) -> &dyn AgentBackend {
        self.backend.as_ref()
    }

    /// Focusable controls of the current page, top to bottom.
    pub fn fields(&self) -> Vec<Field> {
        match self.screen {
            Screen::Dashboard => Vec::new(),
            Screen::Agent => self.agent_fields(),
            Screen::Wizard => self.wizard_fields(),
        }
    }

    fn wizard_fields(&self) -> Vec<Field> {
        let state = self.wizard.state();
        match state.step {
            WizardStep::ClubInfo => vec![
                Field::ClubName,
                Field::SchoolName,
                Field::ClubWebsite,
                Field::ClubInstagram,
                Field::ApplicationStage,
                Field::Continue,
            ],
            WizardStep::PersonalInfo => {
                let mut fields = vec![Field::ResumeChoice];
                match state.personal.resume_choice {
                    ResumeChoice::Unknown => {}
                    ResumeChoice::HasResume => fields.extend([Field::ResumePath, Field::Continue]),
                    ResumeChoice::Manual => fields.extend([
                        Field::Name,
                        Field::Email,
                        Field::Phone,
                        Field::Education,
                        Field::Experience,
                        Field::Projects,
                        Field::Skills,
                        Field::Achievements,
                        Field::Continue,
                    ]),
                }
                fields.push(Field::Back);
                fields
            }
            WizardStep::ShortAnswers => {
                let mut fields = vec![Field::QuestionsPath];
                fields.extend((0..state.short_answers.questions.len()).map(Field::Question));
                fields.extend([Field::AddQuestion, Field::Submit, Field::Back]);
                fields
            }
        }
    }

    fn agent_fields(&self) -> Vec<Field> {
        let mut fields = match self.agent_panel.agent {
            None => Vec::new(),
            Some(AgentType::ResumeTailor) | Some(AgentType::ApplicationCoach) => vec![
                Field::AgentResumePath,
                Field::AgentJobDescription,
                Field::AgentClubName,
                Field::AgentSchoolName,
            ],
            Some(AgentType::InterviewCoach) => {
                vec![Field::AgentJobDescription, Field::AgentExperience]
            }
            Some(AgentType::InstagramAnalyzer) => vec![Field::AgentProfileUrl],
            Some(AgentType::WebsiteAnalyzer) => vec![Field::AgentWebsiteUrl],
            Some(AgentType::Summarizer) => vec![Field::AgentContent],
        };
        if self.agent_panel.agent.is_some() {
            fields.push(Field::Run);
        }
        fields
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.fields().get(self.focus).copied()
    }

    /// Current text of a text or path field.
    pub fn text(&self, field: Field) -> Option<&str> {
        let state = self.wizard.state();
        let form = &self.agent_panel.form;
        let text = match field {
            Field::ClubName => &state.club.club_name,
            Field::SchoolName => &state.club.school_name,
            Field::ClubWebsite => &state.club.website,
            Field::ClubInstagram => &state.club.instagram,
            Field::ResumePath => &self.resume_path,
            Field::Name => &state.personal.profile.name,
            Field::Email => &state.personal.profile.email,
            Field::Phone => &state.personal.profile.phone,
            Field::Education => &state.personal.profile.education,
            Field::Experience => &state.personal.profile.experience,
            Field::Projects => &state.personal.profile.projects,
            Field::Skills => &state.personal.profile.skills,
            Field::Achievements => &state.personal.profile.achievements,
            Field::QuestionsPath => &self.questions_path,
            Field::Question(index) => state.short_answers.questions.get(index)?,
            Field::AgentResumePath => &form.resume_path,
            Field::AgentJobDescription => &form.job_description,
            Field::AgentExperience => &form.experience,
            Field::AgentClubName => &form.club_name,
            Field::AgentSchoolName => &form.school_name,
            Field::AgentProfileUrl => &form.profile_url,
            Field::AgentWebsiteUrl => &form.website_url,
            Field::AgentContent => &form.content,
            _ => return None,
        };
        Some(text.as_str())
    }

    /// Mutable text of a text or path field.
    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        let form = &mut self.agent_panel.form;
        match field {
            Field::ClubName => Some(&mut self.wizard.club_mut().club_name),
            Field::SchoolName => Some(&mut self.wizard.club_mut().school_name),
            Field::ClubWebsite => Some(&mut self.wizard.club_mut().website),
            Field::ClubInstagram => Some(&mut self.wizard.club_mut().instagram),
            Field::ResumePath => Some(&mut self.resume_path),
            Field::Name => Some(&mut self.wizard.profile_mut().name),
            Field::Email => Some(&mut self.wizard.profile_mut().email),
            Field::Phone => Some(&mut self.wizard.profile_mut().phone),
            Field::Education => Some(&mut self.wizard.profile_mut().education),
            Field::Experience => Some(&mut self.wizard.profile_mut().experience),
            Field::Projects => Some(&mut self.wizard.profile_mut().projects),
            Field::Skills => Some(&mut self.wizard.profile_mut().skills),
            Field::Achievements => Some(&mut self.wizard.profile_mut().achievements),
            Field::QuestionsPath => Some(&mut self.questions_path),
            Field::Question(index) => self.wizard.question_mut(index),
            Field::AgentResumePath => Some(&mut form.resume_path),
            Field::AgentJobDescription => Some(&mut form.job_description),
            Field::AgentExperience => Some(&mut form.experience),
            Field::AgentClubName => Some(&mut form.club_name),
            Field::AgentSchoolName => Some(&mut form.school_name),
            Field::AgentProfileUrl => Some(&mut form.profile_url),
            Field::AgentWebsiteUrl => Some(&mut form.website_url),
            Field::AgentContent => Some(&mut form.content),
            _ => None,
        }
    }

    /// Moves focus to `index`, clamped to the current page, and puts the
    /// cursor at the end of its text.
    pub fn set_focus(&mut self, index: usize) {
        let count = self.fields().len();
        self.focus = if count == 0 { 0 } else { index.min(count - 1) };
        self.cursor_position = self
            .focused_field()
            .and_then(|field| self.text(field))
            .map(|text| text.chars().count())
            .unwrap_or(0);
    }

    pub fn focus_field(&mut self, field: Field) {
        if let Some(index) = self.fields().iter().position(|f| *f == field) {
            self.set_focus(index);
        }
    }

    pub fn focus_next(&mut self) {
        let count = self.fields().len();
        if count > 0 {
            self.set_focus((self.focus + 1) % count);
        }
    }

    pub fn focus_previous(&mut self) {
        let count = self.fields().len();
        if count > 0 {
            self.set_focus((self.focus + count - 1) % count);
        }
    }

    fn reset_page(&mut self) {
        self.form_error = None;
        self.set_focus(0);
    }

    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let cursor = self.cursor_position;
        if let Some(text) = self.text_mut(field) {
            let at = byte_index(text, cursor);
            text.insert(at, c);
            self.cursor_position += 1;
        }
    }

    pub fn delete_backward(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let cursor = self.cursor_position;
        if cursor == 0 {
            return;
        }
        if let Some(text) = self.text_mut(field) {
            let at = byte_index(text, cursor - 1);
            if at < text.len() {
                text.remove(at);
                self.cursor_position -= 1;
            }
        }
    }

    pub fn delete_forward(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let cursor = self.cursor_position;
        if let Some(text) = self.text_mut(field) {
            let at = byte_index(text, cursor);
            if at < text.len() {
                text.remove(at);
            }
        }
    }

    fn focused_len(&self) -> usize {
        self.focused_field()
            .and_then(|field| self.text(field))
            .map(|text| text.chars().count())
            .unwrap_or(0)
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.focused_len() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.focused_len();
    }

    /// Cycles the focused choice field forwards or backwards.
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focused_field() {
            Some(Field::ApplicationStage) => {
                let stage = self.wizard.state().club.application_stage;
                self.wizard
                    .set_stage(if forward { stage.next() } else { stage.previous() });
            }
            Some(Field::ResumeChoice) => {
                let choice = self.wizard.state().personal.resume_choice;
                self.wizard.set_resume_choice(choice.toggle());
                self.form_error = None;
            }
            _ => {}
        }
    }

    /// Activates the focused button.
    pub fn activate(&mut self) {
        match self.focused_field() {
            Some(Field::Continue) => self.continue_page(),
            Some(Field::Submit) => self.final_submit(),
            Some(Field::Back) => self.go_back(),
            Some(Field::AddQuestion) => self.add_question(),
            Some(Field::Run) => self.run_agent(),
            _ => {}
        }
    }

    fn continue_page(&mut self) {
        match self.wizard.step() {
            WizardStep::ClubInfo => match self.wizard.submit_club_info() {
                Ok(()) => self.reset_page(),
                Err(err) => self.form_error = Some(err.to_string()),
            },
            WizardStep::PersonalInfo => match self.wizard.submit_personal_info() {
                Ok(PersonalOutcome::Advanced) => self.reset_page(),
                Ok(PersonalOutcome::Generate) => {
                    self.form_error = None;
                    self.final_submit();
                }
                Err(err) => self.form_error = Some(err.to_string()),
            },
            WizardStep::ShortAnswers => self.final_submit(),
        }
    }

    /// Starts the application-coach call for everything the wizard holds.
    pub fn final_submit(&mut self) {
        match self.wizard.start_final_submit(self.backend.clone()) {
            Ok(()) => {
                self.result_scroll = 0;
                self.status_message = Some("Generating suggestions...".to_string());
            }
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    pub fn go_back(&mut self) {
        if self.wizard.step() != WizardStep::ClubInfo {
            self.wizard.go_back();
            self.reset_page();
        }
    }

    pub fn add_question(&mut self) {
        if self.wizard.step() != WizardStep::ShortAnswers {
            return;
        }
        self.wizard.add_question();
        let last = self.wizard.state().short_answers.questions.len() - 1;
        self.focus_field(Field::Question(last));
    }

    pub fn remove_focused_question(&mut self) {
        if let Some(Field::Question(index)) = self.focused_field() {
            self.wizard.remove_question(index);
            let focus = self.focus;
            self.set_focus(focus);
        }
    }

    /// The path typed into a path field.
    pub fn path_input(&self, field: Field) -> String {
        self.text(field).map(str::trim).unwrap_or_default().to_string()
    }

    /// Applies a file pick to `field`. `None` clears the selection.
    pub fn set_file_result(&mut self, field: Field, result: Option<Result<UploadedFile, String>>) {
        match (field, result) {
            (Field::ResumePath, None) => self.wizard.select_resume(None),
            (Field::ResumePath, Some(Ok(file))) => self.wizard.select_resume(Some(file)),
            (Field::ResumePath, Some(Err(message))) => self.wizard.reject_resume(message),
            (Field::AgentResumePath, None) => self.agent_panel.select_resume(None),
            (Field::AgentResumePath, Some(Ok(file))) => self.agent_panel.select_resume(Some(file)),
            (Field::AgentResumePath, Some(Err(message))) => self.agent_panel.reject_resume(message),
            (Field::QuestionsPath, None) => {
                self.wizard.select_questions_file(None);
            }
            (Field::QuestionsPath, Some(Ok(file))) => self.attach_questions(file),
            (Field::QuestionsPath, Some(Err(message))) => self.wizard.reject_questions_file(message),
            _ => {}
        }
    }

    fn attach_questions(&mut self, file: UploadedFile) {
        if !self.wizard.select_questions_file(Some(file.clone())) {
            return;
        }
        match ReportRepository::import_questions(&file) {
            Ok(questions) if !questions.is_empty() => {
                let count = questions.len();
                self.wizard.import_questions(questions);
                info!(count, file = %file.name, "imported questions");
                self.status_message = Some(format!("Imported {} questions from {}", count, file.name));
            }
            Ok(_) => self.status_message = Some(format!("Attached {}", file.name)),
            Err(error) => self.status_message = Some(format!("Import failed: {}", error)),
        }
    }

    pub fn open_dashboard(&mut self) {
        if self.screen == Screen::Agent {
            self.agent_panel.close();
        }
        self.screen = Screen::Dashboard;
        self.reset_page();
    }

    pub fn dashboard_next(&mut self) {
        self.dashboard_index = (self.dashboard_index + 1) % AgentType::ALL.len();
    }

    pub fn dashboard_previous(&mut self) {
        let count = AgentType::ALL.len();
        self.dashboard_index = (self.dashboard_index + count - 1) % count;
    }

    /// Opens the agent highlighted on the dashboard.
    pub fn open_selected_agent(&mut self) {
        let agent = AgentType::ALL[self.dashboard_index % AgentType::ALL.len()];
        debug!(%agent, "opening agent");
        self.agent_panel.open(agent);
        self.screen = Screen::Agent;
        self.result_scroll = 0;
        self.reset_page();
    }

    /// Leaves the current page: agent → dashboard → wizard, or one wizard
    /// step back.
    pub fn escape(&mut self) {
        match self.screen {
            Screen::Agent => {
                self.agent_panel.close();
                self.screen = Screen::Dashboard;
                self.reset_page();
            }
            Screen::Dashboard => {
                self.screen = Screen::Wizard;
                self.reset_page();
            }
            Screen::Wizard => self.go_back(),
        }
    }

    pub fn run_agent(&mut self) {
        match self.agent_panel.run(self.backend.clone()) {
            Ok(()) => {
                self.result_scroll = 0;
                self.status_message = None;
            }
            Err(err) => {
                if self.agent_panel.validation_error.is_none() {
                    self.status_message = Some(err.to_string());
                }
            }
        }
    }

    /// Picks up finished agent calls.
    pub fn tick(&mut self) {
        match self.wizard.poll() {
            Some(Completion::Succeeded) => {
                self.result_scroll = 0;
                self.status_message = Some("Suggestions ready".to_string());
            }
            Some(Completion::Failed(_)) => {
                self.status_message = None;
                self.alert = Some(format!(
                    "Failed to generate suggestions. Ensure the backend is running on {}",
                    self.backend.describe()
                ));
            }
            None => {}
        }

        if let Some(Completion::Succeeded) = self.agent_panel.execution.poll() {
            self.result_scroll = 0;
            if let Some(agent) = self.agent_panel.agent {
                self.status_message = Some(format!("{} finished", agent.display_name()));
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        match self.screen {
            Screen::Wizard => self.wizard.execution.loading,
            Screen::Agent => self.agent_panel.execution.loading,
            Screen::Dashboard => false,
        }
    }

    /// Result of the call belonging to the page on screen.
    pub fn current_result(&self) -> Option<&Value> {
        match self.screen {
            Screen::Wizard => self.wizard.execution.result.as_ref(),
            Screen::Agent => self.agent_panel.execution.result.as_ref(),
            Screen::Dashboard => None,
        }
    }

    pub fn current_report(&self) -> Option<AgentReport> {
        self.current_result().map(AgentReport::from_value)
    }

    pub fn scroll_results(&mut self, delta: i32) {
        let next = (self.result_scroll as i32 + delta).max(0);
        self.result_scroll = next.min(u16::MAX as i32) as u16;
    }

    /// Processes the result of exporting the current report.
    pub fn set_save_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => self.status_message = Some(format!("Saved to {}", filename)),
            Err(error) => self.status_message = Some(format!("Save failed: {}", error)),
        }
    }

    /// Processes the result of copying the current report.
    pub fn set_copy_result(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => self.status_message = Some("Copied to clipboard".to_string()),
            Err(error) => self.status_message = Some(format!("Copy failed: {}", error)),
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}
