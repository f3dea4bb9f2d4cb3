use crate::domain::constants::{QUESTION_FILE_TYPES, RESUME_FILE_TYPES};
use crate::domain::selection::FileSelection;
use serde::{Deserialize, Serialize};

/// Where the applicant currently is in the club's admission process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStage {
    #[default]
    OnlineApplication,
    CoffeeChat,
    Interview,
}

impl ApplicationStage {
    pub const ALL: [ApplicationStage; 3] = [
        ApplicationStage::OnlineApplication,
        ApplicationStage::CoffeeChat,
        ApplicationStage::Interview,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStage::OnlineApplication => "Filling out online application",
            ApplicationStage::CoffeeChat => "Coffee chat / Networking",
            ApplicationStage::Interview => "Interview preparation",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubInfo {
    pub club_name: String,
    pub school_name: String,
    pub website: String,
    pub instagram: String,
    pub application_stage: ApplicationStage,
}

impl ClubInfo {
    /// The synthetic "job description" the backend expects for a club.
    pub fn description(&self) -> String {
        let mut description = format!("{} at {}", self.club_name.trim(), self.school_name.trim());
        let website = self.website.trim();
        if !website.is_empty() {
            description.push_str(" - ");
            description.push_str(website);
        }
        description
    }
}

/// Whether the applicant brings a resume file or fills fields in by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeChoice {
    #[default]
    Unknown,
    HasResume,
    Manual,
}

impl ResumeChoice {
    pub fn toggle(self) -> Self {
        match self {
            ResumeChoice::Unknown | ResumeChoice::Manual => ResumeChoice::HasResume,
            ResumeChoice::HasResume => ResumeChoice::Manual,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResumeChoice::Unknown => "Do you have a resume ready?",
            ResumeChoice::HasResume => "Yes, I have a resume",
            ResumeChoice::Manual => "No, I'll fill it out manually",
        }
    }
}

/// Fields entered by hand when no resume is supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub education: String,
    pub experience: String,
    pub projects: String,
    pub skills: String,
    pub achievements: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalInfo {
    pub resume_choice: ResumeChoice,
    pub resume: FileSelection,
    pub profile: ManualProfile,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            resume_choice: ResumeChoice::Unknown,
            resume: FileSelection::with_allowed(RESUME_FILE_TYPES),
            profile: ManualProfile::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortAnswers {
    pub questions_file: FileSelection,
    pub questions: Vec<String>,
}

impl Default for ShortAnswers {
    fn default() -> Self {
        Self {
            questions_file: FileSelection::with_allowed(QUESTION_FILE_TYPES),
            questions: Vec::new(),
        }
    }
}

impl ShortAnswers {
    pub fn add_question(&mut self) {
        self.questions.push(String::new());
    }

    /// Replaces the question at `index`; out-of-range indices are ignored.
    pub fn edit_question(&mut self, index: usize, text: impl Into<String>) {
        if let Some(question) = self.questions.get_mut(index) {
            *question = text.into();
        }
    }

    pub fn remove_question(&mut self, index: usize) {
        if index < self.questions.len() {
            self.questions.remove(index);
        }
    }

    /// Questions with surrounding whitespace removed and blanks dropped.
    pub fn cleaned_questions(&self) -> Vec<String> {
        self.questions
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A file picked by the user, held in memory for the session only.
#[derive(Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_accepted(&self, allowed: &[&str]) -> bool {
        allowed.contains(&self.mime_type.as_str())
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_club_description_without_website() {
        let club = ClubInfo {
            club_name: "Robotics Club".to_string(),
            school_name: "Westview High".to_string(),
            ..ClubInfo::default()
        };
        assert_eq!(club.description(), "Robotics Club at Westview High");
    }

    #[test]
    fn test_club_description_with_website() {
        let club = ClubInfo {
            club_name: "Robotics Club".to_string(),
            school_name: "Westview High".to_string(),
            website: "https://robotics.example.com".to_string(),
            ..ClubInfo::default()
        };
        assert_eq!(
            club.description(),
            "Robotics Club at Westview High - https://robotics.example.com"
        );
    }

    #[test]
    fn test_stage_cycles() {
        let stage = ApplicationStage::OnlineApplication;
        assert_eq!(stage.next(), ApplicationStage::CoffeeChat);
        assert_eq!(stage.previous(), ApplicationStage::Interview);
        assert_eq!(stage.next().next().next(), stage);
    }

    #[test]
    fn test_stage_serializes_kebab_case() {
        let json = serde_json::to_string(&ApplicationStage::OnlineApplication).unwrap();
        assert_eq!(json, "\"online-application\"");
    }

    #[test]
    fn test_add_question_appends_empty_string() {
        let mut answers = ShortAnswers::default();
        answers.questions = vec!["Why us?".to_string(), "Why you?".to_string()];
        answers.add_question();
        assert_eq!(answers.questions.len(), 3);
        assert_eq!(answers.questions[2], "");
    }

    #[test]
    fn test_edit_question_only_touches_one_index() {
        let mut answers = ShortAnswers::default();
        answers.questions = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        answers.edit_question(1, "changed");
        assert_eq!(answers.questions, vec!["a", "changed", "c"]);

        answers.edit_question(7, "ignored");
        assert_eq!(answers.questions.len(), 3);
    }

    #[test]
    fn test_cleaned_questions_trims_and_drops_blanks() {
        let mut answers = ShortAnswers::default();
        answers.questions = vec![
            "  Why robotics?  ".to_string(),
            "   ".to_string(),
            String::new(),
            "Why robotics?".to_string(),
        ];
        assert_eq!(
            answers.cleaned_questions(),
            vec!["Why robotics?", "Why robotics?"]
        );
    }

    #[test]
    fn test_resume_choice_toggle() {
        assert_eq!(ResumeChoice::Unknown.toggle(), ResumeChoice::HasResume);
        assert_eq!(ResumeChoice::HasResume.toggle(), ResumeChoice::Manual);
        assert_eq!(ResumeChoice::Manual.toggle(), ResumeChoice::HasResume);
    }
}
