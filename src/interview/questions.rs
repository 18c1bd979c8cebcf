use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    #[default]
    Technical,
    Behavioral,
    SystemDesign,
    ProblemSolving,
    Leadership,
}

impl QuestionCategory {
    pub const ALL: [QuestionCategory; 5] = [
        QuestionCategory::Technical,
        QuestionCategory::Behavioral,
        QuestionCategory::SystemDesign,
        QuestionCategory::ProblemSolving,
        QuestionCategory::Leadership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Technical => "technical",
            QuestionCategory::Behavioral => "behavioral",
            QuestionCategory::SystemDesign => "system_design",
            QuestionCategory::ProblemSolving => "problem_solving",
            QuestionCategory::Leadership => "leadership",
        }
    }

    /// Match a label loosely ("System Design", "system-design", "SYSTEM_DESIGN").
    /// Unrecognised labels fall back to the default category.
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "technical" => QuestionCategory::Technical,
            "behavioral" | "behavioural" => QuestionCategory::Behavioral,
            "system_design" => QuestionCategory::SystemDesign,
            "problem_solving" => QuestionCategory::ProblemSolving,
            "leadership" => QuestionCategory::Leadership,
            _ => QuestionCategory::default(),
        }
    }
}

impl<'de> Deserialize<'de> for QuestionCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::from_label).unwrap_or_default())
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "beginner" | "easy" | "junior" => Difficulty::Beginner,
            "intermediate" | "medium" => Difficulty::Intermediate,
            "advanced" | "hard" | "senior" => Difficulty::Advanced,
            _ => Difficulty::default(),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::from_label).unwrap_or_default())
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated interview question with its model answer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InterviewQuestionRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default)]
    pub category: QuestionCategory,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub answer: String,
}

/// Strings as-is, `null` as empty, any other scalar by its JSON text.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl InterviewQuestionRecord {
    fn from_text(role: &str, question: &str, answer: &str) -> Self {
        Self {
            role: role.to_string(),
            category: QuestionCategory::Technical,
            difficulty: Difficulty::Intermediate,
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
        }
    }
}

/// Which strategy produced the parsed questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    Json,
    FencedJson,
    LineHeuristic,
}

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json[ \t]*\r?\n(.*?)\r?\n[ \t]*```").expect("fenced json pattern is valid")
});

const QUESTION_OPENERS: [&str; 6] = ["what", "how", "why", "describe", "explain", "tell"];

/// Parse a generated response into question records.
///
/// Never fails: each tier falls through to the next and a response with no
/// recognisable questions yields an empty list.
pub fn parse_question_response(response: &str, role: &str) -> Vec<InterviewQuestionRecord> {
    parse_question_response_with_tier(response, role).0
}

pub fn parse_question_response_with_tier(response: &str, role: &str) -> (Vec<InterviewQuestionRecord>, ParseTier) {
    if let Some(questions) = parse_json_array(response, role) {
        info!("Parsed {} questions from JSON response", questions.len());
        return (questions, ParseTier::Json);
    }

    debug!("Response is not a JSON array, looking for a fenced json block");
    if let Some(block) = FENCED_JSON.captures(response).and_then(|c| c.get(1)) {
        match parse_json_array(block.as_str(), role) {
            Some(questions) => {
                info!("Parsed {} questions from fenced json block", questions.len());
                return (questions, ParseTier::FencedJson);
            }
            None => warn!("Fenced json block did not parse, falling back to line extraction"),
        }
    }

    let questions = extract_questions_from_lines(response, role);
    info!("Extracted {} questions from text (line fallback)", questions.len());
    (questions, ParseTier::LineHeuristic)
}

fn parse_json_array(text: &str, role: &str) -> Option<Vec<InterviewQuestionRecord>> {
    let mut questions: Vec<InterviewQuestionRecord> = serde_json::from_str(text).ok()?;
    for question in questions.iter_mut().filter(|q| q.role.is_empty()) {
        question.role = role.to_string();
    }
    Some(questions)
}

fn is_question_start(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.ends_with('?')
        || line.starts_with(char::is_numeric)
        || line.starts_with('-')
        || line.starts_with('*')
        || QUESTION_OPENERS.iter().any(|word| lower.starts_with(word))
}

fn extract_questions_from_lines(response: &str, role: &str) -> Vec<InterviewQuestionRecord> {
    let mut questions = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in response.trim().lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_question_start(line) {
            if let Some((question, answer)) = current.take() {
                questions.push(InterviewQuestionRecord::from_text(role, &question, &answer));
            }
            current = Some((line.to_string(), String::new()));
        } else if let Some((_, answer)) = current.as_mut() {
            if !answer.is_empty() {
                answer.push('\n');
            }
            answer.push_str(line);
        }
    }

    if let Some((question, answer)) = current {
        questions.push(InterviewQuestionRecord::from_text(role, &question, &answer));
    }

    questions
}
