/// A focusable control on one of the form pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ClubName,
    SchoolName,
    ClubWebsite,
    ClubInstagram,
    ApplicationStage,
    ResumeChoice,
    ResumePath,
    Name,
    Email,
    Phone,
    Education,
    Experience,
    Projects,
    Skills,
    Achievements,
    QuestionsPath,
    Question(usize),
    AddQuestion,
    Continue,
    Submit,
    Back,
    AgentResumePath,
    AgentJobDescription,
    AgentExperience,
    AgentClubName,
    AgentSchoolName,
    AgentProfileUrl,
    AgentWebsiteUrl,
    AgentContent,
    Run,
}

/// How a field reacts to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text; Enter moves on.
    Text,
    /// A file path; Enter loads the file.
    Path,
    /// Left/Right/Space cycle through options.
    Choice,
    /// Enter activates.
    Button,
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::ApplicationStage | Field::ResumeChoice => FieldKind::Choice,
            Field::ResumePath | Field::QuestionsPath | Field::AgentResumePath => FieldKind::Path,
            Field::AddQuestion | Field::Continue | Field::Submit | Field::Back | Field::Run => {
                FieldKind::Button
            }
            _ => FieldKind::Text,
        }
    }

    pub fn label(&self) -> String {
        let label = match self {
            Field::ClubName => "Club Name *",
            Field::SchoolName => "School Name *",
            Field::ClubWebsite => "Club Website",
            Field::ClubInstagram => "Club Instagram (optional)",
            Field::ApplicationStage => "Application Stage *",
            Field::ResumeChoice => "Resume",
            Field::ResumePath | Field::AgentResumePath => "Resume file (PDF, DOC, DOCX)",
            Field::Name => "Full Name *",
            Field::Email => "Email *",
            Field::Phone => "Phone",
            Field::Education => "Education *",
            Field::Experience => "Work/Leadership Experience",
            Field::Projects => "Projects",
            Field::Skills => "Skills & Technologies",
            Field::Achievements => "Achievements & Awards",
            Field::QuestionsPath => "Questions document",
            Field::Question(index) => return format!("Question {}", index + 1),
            Field::AddQuestion => "+ Add Question",
            Field::Continue => "Continue",
            Field::Submit => "Help me get in",
            Field::Back => "← Back",
            Field::AgentJobDescription => "Job Description",
            Field::AgentExperience => "Your Experience",
            Field::AgentClubName => "Club Name",
            Field::AgentSchoolName => "School Name",
            Field::AgentProfileUrl => "Instagram Profile URL",
            Field::AgentWebsiteUrl => "Website URL",
            Field::AgentContent => "Content to Summarize",
            Field::Run => "Run",
        };
        label.to_string()
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::ClubName => "Enter the club name",
            Field::SchoolName => "Enter the school name",
            Field::ClubWebsite | Field::AgentWebsiteUrl => "https://example.com",
            Field::ClubInstagram | Field::AgentProfileUrl => "https://instagram.com/club_handle",
            Field::ResumePath | Field::AgentResumePath => "path/to/resume.pdf, then Enter",
            Field::QuestionsPath => "path/to/questions.txt, then Enter",
            Field::Name => "Your full name",
            Field::Email => "your.email@example.com",
            Field::Education => "Degree, school, graduation year, GPA, etc.",
            Field::Experience => "Work experience, internships, leadership roles",
            Field::Projects => "Relevant projects you've worked on",
            Field::Skills => "Technical skills, languages, tools",
            Field::Achievements => "Awards and recognitions",
            Field::Question(_) => "Enter the application question here...",
            Field::AgentJobDescription => "Paste the job description here...",
            Field::AgentExperience => "Describe your relevant experience...",
            Field::AgentContent => "Paste the content here...",
            _ => "",
        }
    }
}
