use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;

use super::models::Sentiment;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier failure: {0}")]
    Failure(String),
}

/// Contract for the sentiment collaborator: text in, polarity label out.
///
/// Callers treat the classifier as best-effort; an error must never fail the
/// surrounding feedback submission.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError>;
}

const POSITIVE_THRESHOLD: f64 = 0.1;
const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Polarity weights in [-1, 1] for common English sentiment words
static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("amazing", 0.6),
        ("awesome", 1.0),
        ("best", 1.0),
        ("excellent", 1.0),
        ("fantastic", 0.4),
        ("good", 0.7),
        ("great", 0.8),
        ("happy", 0.8),
        ("helpful", 0.5),
        ("love", 0.5),
        ("nice", 0.6),
        ("perfect", 1.0),
        ("pleasant", 0.7),
        ("wonderful", 1.0),
        ("awful", -1.0),
        ("bad", -0.7),
        ("broken", -0.4),
        ("confusing", -0.3),
        ("disappointed", -0.75),
        ("hate", -0.8),
        ("horrible", -1.0),
        ("poor", -0.4),
        ("slow", -0.3),
        ("terrible", -1.0),
        ("useless", -0.5),
        ("worst", -1.0),
        ("wrong", -0.5),
    ])
});

/// Lexicon-based classifier: averages the polarity of recognized words.
///
/// Text with no recognized words scores 0 and lands on neutral, as does
/// blank input.
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    fn polarity(text: &str) -> f64 {
        let scores: Vec<f64> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .filter_map(|word| LEXICON.get(word.to_lowercase().as_str()).copied())
            .collect();

        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        if text.trim().is_empty() {
            return Ok(Sentiment::Neutral);
        }

        let polarity = Self::polarity(text);
        if polarity > POSITIVE_THRESHOLD {
            Ok(Sentiment::Positive)
        } else if polarity < NEGATIVE_THRESHOLD {
            Ok(Sentiment::Negative)
        } else {
            Ok(Sentiment::Neutral)
        }
    }
}
