use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::interview::{calculate_interview_score, EmotionScores, PauseAnalytics};

/// Number of recent analyses shown in a profile summary
pub const PROFILE_HISTORY_LEN: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewAnalysis {
    pub id: Uuid,
    pub user_id: Uuid,
    pub candidate_name: String,
    pub video_file: String,
    pub transcript: String,
    pub sentiment_score: f64,
    pub emotion_scores: EmotionScores,
    /// `None` when the transcript had no segments
    pub pause_analytics: Option<PauseAnalytics>,
    pub feedback: String,
    pub interview_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewAnalysis {
    pub fn new(
        user_id: Uuid,
        candidate_name: String,
        video_file: String,
        transcript: String,
        sentiment_score: f64,
        emotion_scores: EmotionScores,
        pause_analytics: Option<PauseAnalytics>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            candidate_name,
            video_file,
            transcript,
            sentiment_score,
            emotion_scores,
            pause_analytics,
            feedback: String::new(),
            interview_score: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn calculate_interview_score(&mut self) -> f64 {
        self.interview_score = calculate_interview_score(
            self.sentiment_score,
            &self.emotion_scores,
            self.pause_analytics.as_ref(),
        );
        self.updated_at = Utc::now();
        self.interview_score
    }

    pub fn set_feedback(&mut self, feedback: String) {
        self.feedback = feedback;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewHistoryEntry {
    pub date: DateTime<Utc>,
    pub score: f64,
    pub role: String,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub interviews_completed: usize,
    pub average_score: f64,
    pub last_interview: Option<DateTime<Utc>>,
    pub interview_history: Vec<InterviewHistoryEntry>,
}

impl ProfileSummary {
    /// Summarise a user's analyses. `analyses` must be ordered newest first.
    pub fn from_analyses(analyses: &[InterviewAnalysis]) -> Self {
        let interviews_completed = analyses.len();
        let average_score = if analyses.is_empty() {
            0.0
        } else {
            analyses.iter().map(|a| a.interview_score).sum::<f64>() / interviews_completed as f64
        };

        let interview_history = analyses
            .iter()
            .take(PROFILE_HISTORY_LEN)
            .map(|a| InterviewHistoryEntry {
                date: a.created_at,
                score: a.interview_score,
                role: a.candidate_name.clone(),
                sentiment_score: a.sentiment_score,
            })
            .collect();

        Self {
            interviews_completed,
            average_score,
            last_interview: analyses.first().map(|a| a.created_at),
            interview_history,
        }
    }
}
