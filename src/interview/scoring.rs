use indexmap::IndexMap;

use super::PauseAnalytics;

/// Emotion label -> probability, in the order the classifier reported them
pub type EmotionScores = IndexMap<String, f64>;

// Weights of the composite score. These are tuning values carried over from the
// first scoring model and must stay as they are so stored scores remain comparable.
pub const SENTIMENT_WEIGHT: f64 = 0.4;
pub const EMOTION_WEIGHT: f64 = 0.1;
pub const PAUSE_WEIGHT: f64 = 0.3;

pub const POSITIVE_EMOTIONS: [&str; 3] = ["joy", "confidence", "enthusiasm"];

const PAUSE_COUNT_ALLOWANCE: u32 = 5;
const PAUSE_COUNT_PENALTY: f64 = 0.05;
const PAUSE_LENGTH_ALLOWANCE_SECS: f64 = 2.0;
const PAUSE_LENGTH_PENALTY: f64 = 0.1;

/// Combine sentiment, emotion and pause metrics into one score in `[0.0, 1.0]`.
///
/// Emotions only contribute when the map is non-empty, pauses only when
/// analytics were computed at all (an analysis without transcript segments
/// passes `None`).
pub fn calculate_interview_score(
    sentiment_score: f64,
    emotion_scores: &EmotionScores,
    pause_analytics: Option<&PauseAnalytics>,
) -> f64 {
    let mut score = sentiment_score * SENTIMENT_WEIGHT;

    if !emotion_scores.is_empty() {
        score += POSITIVE_EMOTIONS
            .iter()
            .map(|label| emotion_scores.get(*label).copied().unwrap_or(0.0) * EMOTION_WEIGHT)
            .sum::<f64>();
    }

    if let Some(pauses) = pause_analytics {
        score += pause_component(pauses) * PAUSE_WEIGHT;
    }

    // f64::max/min drop NaN, so a NaN input degrades to 0.0
    score.max(0.0).min(1.0)
}

/// Pacing quality before weighting: 1.0 minus penalties for too many or too long pauses.
pub fn pause_component(pauses: &PauseAnalytics) -> f64 {
    let mut component = 1.0;

    if pauses.total_pauses > PAUSE_COUNT_ALLOWANCE {
        component -= (pauses.total_pauses - PAUSE_COUNT_ALLOWANCE) as f64 * PAUSE_COUNT_PENALTY;
    }
    if pauses.avg_pause > PAUSE_LENGTH_ALLOWANCE_SECS {
        component -= (pauses.avg_pause - PAUSE_LENGTH_ALLOWANCE_SECS) * PAUSE_LENGTH_PENALTY;
    }

    component.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emotions(pairs: &[(&str, f64)]) -> EmotionScores {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn pauses(total_pauses: u32, avg_pause: f64) -> PauseAnalytics {
        PauseAnalytics {
            total_pauses,
            avg_pause,
            pauses: Vec::new(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_weighted_sum() {
        let score = calculate_interview_score(
            0.8,
            &emotions(&[("joy", 0.5), ("confidence", 0.3), ("enthusiasm", 0.2)]),
            Some(&pauses(3, 1.0)),
        );
        assert_close(score, 0.72);
    }

    #[test]
    fn test_excess_pause_penalty() {
        assert_close(pause_component(&pauses(10, 3.0)), 0.65);

        let score = calculate_interview_score(0.0, &EmotionScores::new(), Some(&pauses(10, 3.0)));
        assert_close(score, 0.195);
    }

    #[test]
    fn test_pause_component_floors_at_zero() {
        assert_eq!(pause_component(&pauses(40, 12.0)), 0.0);
    }

    #[test]
    fn test_non_positive_emotions_ignored() {
        let score = calculate_interview_score(
            0.5,
            &emotions(&[("anger", 0.9), ("joy", 0.4)]),
            None,
        );
        assert_close(score, 0.2 + 0.04);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(calculate_interview_score(0.0, &EmotionScores::new(), None), 0.0);
        assert_close(
            calculate_interview_score(0.0, &EmotionScores::new(), Some(&PauseAnalytics::default())),
            0.3,
        );
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(calculate_interview_score(-1.0, &EmotionScores::new(), None), 0.0);

        let high = calculate_interview_score(
            5.0,
            &emotions(&[("joy", 1.0), ("confidence", 1.0), ("enthusiasm", 1.0)]),
            Some(&pauses(0, 0.0)),
        );
        assert_eq!(high, 1.0);

        assert_eq!(calculate_interview_score(f64::NAN, &EmotionScores::new(), None), 0.0);
    }

    #[test]
    fn test_score_always_in_range() {
        let sentiments = [-3.0, -1.0, -0.2, 0.0, 0.3, 0.99, 1.0, 2.5];
        let pause_sets = [None, Some(pauses(0, 0.0)), Some(pauses(7, 2.4)), Some(pauses(100, 30.0))];
        let emotion_sets = [
            EmotionScores::new(),
            emotions(&[("joy", 0.9)]),
            emotions(&[("sadness", 0.7), ("confidence", 0.2), ("enthusiasm", 0.6)]),
        ];

        for sentiment in sentiments {
            for pause_set in &pause_sets {
                for emotion_set in &emotion_sets {
                    let score = calculate_interview_score(sentiment, emotion_set, pause_set.as_ref());
                    assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let e = emotions(&[("joy", 0.31), ("confidence", 0.12)]);
        let p = pauses(6, 2.2);
        let first = calculate_interview_score(0.61, &e, Some(&p));
        let second = calculate_interview_score(0.61, &e, Some(&p));
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
