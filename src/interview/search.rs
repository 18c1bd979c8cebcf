use log::info;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{cache_key, ResponseCache};
use crate::error::{AnalysisError, Result};
use crate::generative::TextGenerator;
use super::questions::{parse_question_response, Difficulty, InterviewQuestionRecord, QuestionCategory};

pub const QUESTIONS_PER_ROLE: usize = 3;

pub fn build_question_prompt(role: &str) -> String {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
    let categories: Vec<&str> = QuestionCategory::ALL.iter().map(|c| c.as_str()).collect();

    format!(
        r#"Generate {count} interview questions and detailed answers for a {role} role.
Format the response as a JSON array with the following structure:
[
    {{
        "role": "{role}",
        "category": "technical",
        "difficulty": "intermediate",
        "question": "question text",
        "answer": "detailed answer with examples"
    }}
]
Make sure the questions are relevant to the role and include code examples where appropriate.
The difficulty should be one of: {difficulties}.
The category should be one of: {categories}."#,
        count = QUESTIONS_PER_ROLE,
        role = role,
        difficulties = difficulties.join(", "),
        categories = categories.join(", "),
    )
}

/// Generates interview questions for a role, caching results per role
pub struct QuestionSearch {
    generator: Arc<dyn TextGenerator>,
    cache: ResponseCache<Vec<InterviewQuestionRecord>>,
    ttl: Duration,
}

impl QuestionSearch {
    pub fn new(generator: Arc<dyn TextGenerator>, ttl: Duration) -> Self {
        Self {
            generator,
            cache: ResponseCache::new(),
            ttl,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<InterviewQuestionRecord>> {
        let role = query.trim();
        if role.is_empty() {
            return Err(AnalysisError::EmptyQuery);
        }

        let mut params = BTreeMap::new();
        params.insert("query".to_string(), role.to_string());
        let key = cache_key("interview_questions", "search", &params);

        let generator = &self.generator;
        self.cache
            .get_or_try_insert_with(&key, self.ttl, move || async move {
                info!("🤖 Generating interview questions for role: {}", role);
                let response = generator
                    .generate(&build_question_prompt(role))
                    .await
                    .map_err(|e| AnalysisError::Generation(e.to_string()))?;
                Ok::<_, AnalysisError>(parse_question_response(&response, role))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_allowed_values() {
        let prompt = build_question_prompt("Data Engineer");
        assert!(prompt.starts_with("Generate 3 interview questions and detailed answers for a Data Engineer role."));
        assert!(prompt.contains(r#""role": "Data Engineer""#));
        assert!(prompt.contains("one of: beginner, intermediate, advanced."));
        assert!(prompt.contains("one of: technical, behavioral, system_design, problem_solving, leadership."));
    }
}
