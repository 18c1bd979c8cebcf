use serde::{Serialize, Deserialize};

/// Gaps at or below this many seconds are treated as normal speech rhythm.
pub const PAUSE_THRESHOLD_SECS: f64 = 0.5;

/// A time-bounded chunk of transcribed speech, as reported by the transcriber
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default)]
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            text: text.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PauseAnalytics {
    #[serde(default)]
    pub total_pauses: u32,
    #[serde(default)]
    pub avg_pause: f64,
    #[serde(default)]
    pub pauses: Vec<f64>,
}

/// Derive pause statistics from consecutive transcript segments.
///
/// Pairs where either timestamp is missing are skipped.
pub fn get_pause_analytics(segments: &[TranscriptSegment]) -> PauseAnalytics {
    let pauses: Vec<f64> = segments
        .windows(2)
        .filter_map(|pair| match (pair[0].end, pair[1].start) {
            (Some(prev_end), Some(curr_start)) => Some(curr_start - prev_end),
            _ => None,
        })
        .filter(|gap| *gap > PAUSE_THRESHOLD_SECS)
        .map(round2)
        .collect();

    let total_pauses = pauses.len() as u32;
    let avg_pause = if pauses.is_empty() {
        0.0
    } else {
        round2(pauses.iter().sum::<f64>() / pauses.len() as f64)
    };

    PauseAnalytics {
        total_pauses,
        avg_pause,
        pauses,
    }
}

/// Two decimals, exact halves going to the even neighbour (1.125 -> 1.12).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_segments() {
        let analytics = get_pause_analytics(&[]);
        assert_eq!(analytics.total_pauses, 0);
        assert_eq!(analytics.avg_pause, 0.0);
        assert!(analytics.pauses.is_empty());
    }

    #[test]
    fn test_single_segment() {
        let analytics = get_pause_analytics(&[TranscriptSegment::new(0.0, 2.0, "Hello")]);
        assert_eq!(analytics, PauseAnalytics::default());
    }

    #[test]
    fn test_pauses_over_threshold() {
        let segments = vec![
            TranscriptSegment::new(0.0, 2.0, "Hi, I'm Sam."),
            TranscriptSegment::new(3.0, 5.0, "I build backends."),   // 1.0s gap
            TranscriptSegment::new(5.3, 7.0, "Mostly in Rust."),     // 0.3s gap, ignored
            TranscriptSegment::new(9.5, 11.0, "And some Python."),   // 2.5s gap
        ];

        let analytics = get_pause_analytics(&segments);
        assert_eq!(analytics.total_pauses, 2);
        assert_eq!(analytics.pauses, vec![1.0, 2.5]);
        assert_eq!(analytics.avg_pause, 1.75);
    }

    #[test]
    fn test_gap_exactly_at_threshold_is_not_a_pause() {
        let segments = vec![
            TranscriptSegment::new(0.0, 1.0, "one"),
            TranscriptSegment::new(1.5, 2.0, "two"),
        ];
        assert_eq!(get_pause_analytics(&segments).total_pauses, 0);
    }

    #[test]
    fn test_rounding() {
        let segments = vec![
            TranscriptSegment::new(0.0, 1.0, "one"),
            TranscriptSegment::new(1.666, 2.0, "two"),
            TranscriptSegment::new(2.789, 3.0, "three"),
        ];

        let analytics = get_pause_analytics(&segments);
        assert_eq!(analytics.pauses, vec![0.67, 0.79]);
        assert_eq!(analytics.avg_pause, 0.73);
    }

    #[test]
    fn test_exact_halves_round_to_even() {
        let segments = vec![
            TranscriptSegment::new(0.0, 1.0, "one"),
            TranscriptSegment::new(2.125, 3.0, "two"),     // 1.125s gap
            TranscriptSegment::new(4.625, 5.0, "three"),   // 1.625s gap
            TranscriptSegment::new(8.125, 9.0, "four"),    // 3.125s gap
        ];

        let analytics = get_pause_analytics(&segments);
        assert_eq!(analytics.pauses, vec![1.12, 1.62, 3.12]);
        assert_eq!(analytics.avg_pause, 1.95);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_missing_timestamps_skip_pair() {
        let segments = vec![
            TranscriptSegment::new(0.0, 1.0, "one"),
            TranscriptSegment { start: None, end: Some(3.0), text: "two".to_string() },
            TranscriptSegment::new(4.0, 5.0, "three"),
        ];

        let analytics = get_pause_analytics(&segments);
        assert_eq!(analytics.total_pauses, 1);
        assert_eq!(analytics.pauses, vec![1.0]);
    }

    #[test]
    fn test_segment_deserializes_without_timestamps() {
        let segment: TranscriptSegment = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(segment.start, None);
        assert_eq!(segment.end, None);
    }
}
