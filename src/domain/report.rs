//! Typed view over agent results and their rendering into display blocks.
//!
//! The backend returns loosely-shaped JSON. Recognized sections are parsed
//! one by one so a malformed section is skipped without hiding the others;
//! anything unrecognized falls back to a pretty-printed dump.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a list field, treating `null` the same as a missing key.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClubOverview {
    pub overview: Option<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub mission_values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValueAlignment {
    pub value: Option<String>,
    pub how_to_show_it: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApplicationSection {
    #[serde(deserialize_with = "nullable_vec")]
    pub values_alignment: Vec<ValueAlignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnswerGuide {
    pub question: Option<String>,
    pub structure: Option<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub do_donts: Vec<String>,
    pub example_answer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResumeEdits {
    #[serde(deserialize_with = "nullable_vec")]
    pub top5_fixes: Vec<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub tailored_bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoachingReport {
    pub club: Option<ClubOverview>,
    pub application: Option<ApplicationSection>,
    pub answers: Vec<AnswerGuide>,
    pub resume: Option<ResumeEdits>,
}

/// A backend result, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReport {
    Coaching(CoachingReport),
    Text(String),
    Raw(Value),
}

/// One renderable unit of a report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportBlock {
    Heading(String),
    Text(String),
    Bullet(String),
    Code(String),
}

const COACHING_KEYS: &[&str] = &["club", "application", "answers", "resume"];
const RESUME_KEYS: &[&str] = &["top5_fixes", "tailored_bullets"];

fn section<T: for<'de> Deserialize<'de>>(value: Option<&Value>) -> Option<T> {
    value.and_then(|v| serde_json::from_value(v.clone()).ok())
}

impl AgentReport {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => AgentReport::Text(text.clone()),
            Value::Object(map) if COACHING_KEYS.iter().any(|k| map.contains_key(*k)) => {
                AgentReport::Coaching(CoachingReport {
                    club: section(map.get("club")),
                    application: section(map.get("application")),
                    answers: map
                        .get("answers")
                        .and_then(Value::as_array)
                        .map(|answers| {
                            answers
                                .iter()
                                .filter_map(|a| section::<AnswerGuide>(Some(a)))
                                .collect()
                        })
                        .unwrap_or_default(),
                    resume: section(map.get("resume")),
                })
            }
            Value::Object(map) if RESUME_KEYS.iter().any(|k| map.contains_key(*k)) => {
                AgentReport::Coaching(CoachingReport {
                    resume: section(Some(value)),
                    ..CoachingReport::default()
                })
            }
            other => AgentReport::Raw(other.clone()),
        }
    }

    /// Blocks in display order: club overview, values alignment, answers,
    /// resume edits. Empty sections produce nothing.
    pub fn blocks(&self) -> Vec<ReportBlock> {
        match self {
            AgentReport::Coaching(report) => report.blocks(),
            AgentReport::Text(text) => vec![ReportBlock::Text(text.clone())],
            AgentReport::Raw(value) => {
                let dump = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                vec![ReportBlock::Code(dump)]
            }
        }
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in self.blocks() {
            match block {
                ReportBlock::Heading(h) => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(&h);
                    out.push('\n');
                    out.push_str(&"=".repeat(h.chars().count()));
                }
                ReportBlock::Text(t) | ReportBlock::Code(t) => out.push_str(&t),
                ReportBlock::Bullet(b) => {
                    out.push_str("  • ");
                    out.push_str(&b);
                }
            }
            out.push('\n');
        }
        out
    }
}

fn filled(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

impl CoachingReport {
    pub fn blocks(&self) -> Vec<ReportBlock> {
        let mut blocks = Vec::new();

        if let Some(club) = &self.club {
            let overview = filled(&club.overview);
            if overview.is_some() || !club.mission_values.is_empty() {
                blocks.push(ReportBlock::Heading("About the club".to_string()));
                if let Some(overview) = overview {
                    blocks.push(ReportBlock::Text(overview.to_string()));
                }
                if !club.mission_values.is_empty() {
                    blocks.push(ReportBlock::Text(format!(
                        "Values: {}",
                        club.mission_values.join(", ")
                    )));
                }
            }
        }

        if let Some(application) = &self.application {
            if !application.values_alignment.is_empty() {
                blocks.push(ReportBlock::Heading("Values Alignment".to_string()));
                for alignment in &application.values_alignment {
                    blocks.push(ReportBlock::Bullet(format!(
                        "{}: {}",
                        filled(&alignment.value).unwrap_or("Value"),
                        filled(&alignment.how_to_show_it).unwrap_or("")
                    )));
                }
            }
        }

        if !self.answers.is_empty() {
            blocks.push(ReportBlock::Heading("Answers".to_string()));
            for answer in &self.answers {
                blocks.push(ReportBlock::Text(format!(
                    "Q: {}",
                    filled(&answer.question).unwrap_or("")
                )));
                if let Some(structure) = filled(&answer.structure) {
                    blocks.push(ReportBlock::Text(format!("Structure: {structure}")));
                }
                if !answer.do_donts.is_empty() {
                    blocks.push(ReportBlock::Text(format!(
                        "Do/Don't: {}",
                        answer.do_donts.join(" • ")
                    )));
                }
                if let Some(example) = filled(&answer.example_answer) {
                    blocks.push(ReportBlock::Text(format!("Example: {example}")));
                }
            }
        }

        if let Some(resume) = &self.resume {
            if !resume.top5_fixes.is_empty() || !resume.tailored_bullets.is_empty() {
                blocks.push(ReportBlock::Heading("Resume edits to get in".to_string()));
                if !resume.top5_fixes.is_empty() {
                    blocks.push(ReportBlock::Text("Top fixes:".to_string()));
                    blocks.extend(resume.top5_fixes.iter().cloned().map(ReportBlock::Bullet));
                }
                if !resume.tailored_bullets.is_empty() {
                    blocks.push(ReportBlock::Text("Tailored bullets:".to_string()));
                    blocks.extend(
                        resume
                            .tailored_bullets
                            .iter()
                            .cloned()
                            .map(ReportBlock::Bullet),
                    );
                }
            }
        }

        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_response() -> Value {
        json!({
            "resume": { "top5_fixes": ["Quantify impact"], "tailored_bullets": [] },
            "answers": [{
                "question": "Why robotics?",
                "structure": "Hook, story, tie-back",
                "do_donts": ["Do be specific", "Don't ramble"],
                "example_answer": "I built a rover..."
            }],
            "application": {
                "values_alignment": [{ "value": "Teamwork", "how_to_show_it": "Mention FRC build season" }]
            },
            "club": { "overview": "Builds competition robots.", "mission_values": ["teamwork", "curiosity"] }
        })
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let blocks = AgentReport::from_value(&full_response()).blocks();
        let headings: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ReportBlock::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            vec!["About the club", "Values Alignment", "Answers", "Resume edits to get in"]
        );
        assert!(blocks.contains(&ReportBlock::Text("Values: teamwork, curiosity".to_string())));
        assert!(blocks.contains(&ReportBlock::Text(
            "Do/Don't: Do be specific • Don't ramble".to_string()
        )));
        assert!(blocks.contains(&ReportBlock::Bullet("Quantify impact".to_string())));
        assert!(!blocks.contains(&ReportBlock::Text("Tailored bullets:".to_string())));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let value = json!({ "club": { "overview": "" }, "answers": [], "resume": {} });
        let report = AgentReport::from_value(&value);
        assert!(matches!(report, AgentReport::Coaching(_)));
        assert!(report.blocks().is_empty());
    }

    #[test]
    fn test_malformed_section_skipped_others_kept() {
        let value = json!({
            "club": "not an object",
            "answers": [{ "question": "Why us?" }, 42]
        });
        let blocks = AgentReport::from_value(&value).blocks();
        assert_eq!(blocks[0], ReportBlock::Heading("Answers".to_string()));
        assert_eq!(blocks[1], ReportBlock::Text("Q: Why us?".to_string()));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_bare_resume_tailor_shape() {
        let value = json!({ "top5_fixes": ["a"], "tailored_bullets": ["b"], "format_warnings": [] });
        let blocks = AgentReport::from_value(&value).blocks();
        assert_eq!(blocks[0], ReportBlock::Heading("Resume edits to get in".to_string()));
        assert!(blocks.contains(&ReportBlock::Bullet("b".to_string())));
    }

    #[test]
    fn test_unknown_shape_falls_back_to_dump() {
        let value = json!({ "mission_signals": ["service"] });
        let report = AgentReport::from_value(&value);
        assert!(matches!(report, AgentReport::Raw(_)));
        let ReportBlock::Code(dump) = &report.blocks()[0] else {
            panic!("expected code block");
        };
        assert!(dump.contains("\"mission_signals\""));
    }

    #[test]
    fn test_null_mission_values_keeps_overview() {
        let value = json!({ "club": { "overview": "Builds robots.", "mission_values": null } });
        let blocks = AgentReport::from_value(&value).blocks();
        assert_eq!(blocks[0], ReportBlock::Heading("About the club".to_string()));
        assert!(blocks.contains(&ReportBlock::Text("Builds robots.".to_string())));
    }

    #[test]
    fn test_null_do_donts_keeps_answer() {
        let value = json!({
            "answers": [{ "question": "Why us?", "structure": "STAR", "do_donts": null }]
        });
        let text = AgentReport::from_value(&value).plain_text();
        assert!(text.contains("Why us?"));
        assert!(text.contains("STAR"));
    }

    #[test]
    fn test_string_result() {
        let report = AgentReport::from_value(&json!("Short summary"));
        assert_eq!(report.plain_text(), "Short summary\n");
    }

    #[test]
    fn test_plain_text_underlines_headings() {
        let value = json!({ "club": { "overview": "Robots." } });
        let text = AgentReport::from_value(&value).plain_text();
        assert_eq!(text, "About the club\n==============\nRobots.\n");
    }
}
