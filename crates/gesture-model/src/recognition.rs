//! Classifier output and the top candidate derived from it.

use serde::{Deserialize, Serialize};

/// One ranked gesture classification for a hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureCategory {
    /// Gesture label, e.g. a letter of the sign alphabet.
    pub category_name: String,
    /// Classifier score in `[0.0, 1.0]`.
    pub score: f32,
}

impl GestureCategory {
    pub fn new(category_name: impl Into<String>, score: f32) -> Self {
        Self {
            category_name: category_name.into(),
            score,
        }
    }
}

/// A hand landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// The point set of a single detected hand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks(pub Vec<Landmark>);

impl HandLandmarks {
    pub fn points(&self) -> &[Landmark] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Classifier output for one frame.
///
/// `gestures[h]` holds the candidates for hand `h`, sorted by descending
/// score. Either list may be empty when no hand was found.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub gestures: Vec<Vec<GestureCategory>>,
    #[serde(default)]
    pub landmarks: Vec<HandLandmarks>,
}

impl RecognitionResult {
    /// A result with no detected hands.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single-hand result carrying one candidate and no landmarks.
    pub fn single(label: impl Into<String>, score: f32) -> Self {
        Self {
            gestures: vec![vec![GestureCategory::new(label, score)]],
            landmarks: Vec::new(),
        }
    }

    /// Whether any hand landmarks were produced.
    pub fn has_hands(&self) -> bool {
        self.landmarks.iter().any(|hand| !hand.is_empty())
    }

    /// Top-ranked candidate of the first hand, normalized.
    ///
    /// Returns `None` when no hand or gesture was detected, or when the
    /// candidate carries an empty label.
    pub fn top_candidate(&self) -> Option<TopCandidate> {
        let category = self.gestures.first()?.first()?;
        TopCandidate::normalized(&category.category_name, category.score)
    }
}

/// The highest-confidence classification of the primary hand in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCandidate {
    pub label: String,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

impl TopCandidate {
    /// Build a candidate, clamping the score into `[0, 1]` (NaN maps to 0).
    pub fn normalized(label: &str, score: f32) -> Option<Self> {
        if label.is_empty() {
            return None;
        }
        let confidence = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        Some(Self {
            label: label.to_string(),
            confidence,
        })
    }

    /// Confidence as a whole percentage in `[0, 100]`.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Parse recognition results from JSONL content (one JSON object per line).
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_results(jsonl: &str) -> Result<Vec<RecognitionResult>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_candidate_uses_first_hand_first_rank() {
        let result = RecognitionResult {
            gestures: vec![
                vec![
                    GestureCategory::new("B", 0.93),
                    GestureCategory::new("D", 0.04),
                ],
                vec![GestureCategory::new("C", 0.99)],
            ],
            landmarks: vec![],
        };
        let top = result.top_candidate().unwrap();
        assert_eq!(top.label, "B");
        assert!((top.confidence - 0.93).abs() < 1e-6);
    }

    #[test]
    fn top_candidate_absent_without_gestures() {
        assert!(RecognitionResult::empty().top_candidate().is_none());

        let hand_without_ranking = RecognitionResult {
            gestures: vec![vec![]],
            landmarks: vec![],
        };
        assert!(hand_without_ranking.top_candidate().is_none());
    }

    #[test]
    fn scores_are_clamped_and_nan_is_zero() {
        assert_eq!(
            TopCandidate::normalized("A", 1.7).unwrap().confidence,
            1.0
        );
        assert_eq!(
            TopCandidate::normalized("A", -0.2).unwrap().confidence,
            0.0
        );
        assert_eq!(
            TopCandidate::normalized("A", f32::NAN).unwrap().confidence,
            0.0
        );
        assert!(TopCandidate::normalized("", 0.99).is_none());
    }

    #[test]
    fn confidence_percent_rounds() {
        let top = TopCandidate::normalized("A", 0.926).unwrap();
        assert_eq!(top.confidence_percent(), 93);
        let top = TopCandidate::normalized("A", 1.0).unwrap();
        assert_eq!(top.confidence_percent(), 100);
    }

    #[test]
    fn has_hands_ignores_empty_point_sets() {
        let mut result = RecognitionResult::single("A", 0.5);
        assert!(!result.has_hands());
        result.landmarks.push(HandLandmarks::default());
        assert!(!result.has_hands());
        result.landmarks.push(HandLandmarks(vec![Landmark {
            x: 0.5,
            y: 0.5,
            z: 0.0,
        }]));
        assert!(result.has_hands());
    }

    #[test]
    fn parse_results_skips_comments_and_blank_lines() {
        let jsonl = r#"
# recorded 2026-10-01
{"gestures":[[{"category_name":"A","score":0.95}]],"landmarks":[[{"x":0.1,"y":0.2}]]}

{"gestures":[],"landmarks":[]}
{}
"#;
        let results = parse_results(jsonl).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].top_candidate().unwrap().label, "A");
        assert_eq!(results[0].landmarks[0].points()[0].z, 0.0);
        assert!(results[1].top_candidate().is_none());
        assert_eq!(results[2], RecognitionResult::empty());
    }
}
