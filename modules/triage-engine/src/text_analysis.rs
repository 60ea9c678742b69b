//! Complaint text analysis.
//!
//! A language-model backed analyzer can be plugged in behind [`TextAnalyzer`];
//! [`FallbackTextAnalyzer`] always has the static keyword tables to fall back on.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use triage_common::tables::{
    NEGATIVE_WORDS, TEXT_CATEGORY_KEYWORDS, TEXT_URGENCY_KEYWORDS, URGENT_WORDS,
};
use triage_common::{round_to, Sentiment, TextAnalysis, TriageError, Urgency};

const BASE_CONFIDENCE: f64 = 0.7;
const CONFIDENCE_PER_HIT: f64 = 0.05;
const MAX_KEYWORD_CONFIDENCE: f64 = 0.95;

const MAX_KEYWORDS: usize = 5;
const MIN_KEYWORD_CHARS: usize = 5;

#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str, title: Option<&str>) -> Result<TextAnalysis, TriageError>;
}

/// Static keyword-table analysis. Deterministic and always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTextAnalyzer;

#[async_trait]
impl TextAnalyzer for KeywordTextAnalyzer {
    async fn analyze(&self, text: &str, title: Option<&str>) -> Result<TextAnalysis, TriageError> {
        Ok(analyze_with_keywords(text, title))
    }
}

/// Tries `primary` first and falls back to keyword analysis when it fails
/// or when no primary is configured.
#[derive(Clone, Default)]
pub struct FallbackTextAnalyzer {
    primary: Option<Arc<dyn TextAnalyzer>>,
}

impl FallbackTextAnalyzer {
    pub fn new(primary: Arc<dyn TextAnalyzer>) -> Self {
        Self {
            primary: Some(primary),
        }
    }

    pub fn keywords_only() -> Self {
        Self { primary: None }
    }
}

#[async_trait]
impl TextAnalyzer for FallbackTextAnalyzer {
    async fn analyze(&self, text: &str, title: Option<&str>) -> Result<TextAnalysis, TriageError> {
        if let Some(primary) = &self.primary {
            match primary.analyze(text, title).await {
                Ok(analysis) => return Ok(analysis),
                Err(e) => warn!(error = %e, "Primary text analyzer failed, using keyword tables"),
            }
        }
        Ok(analyze_with_keywords(text, title))
    }
}

/// Keyword-table analysis of `"{title} {text}"`.
pub fn analyze_with_keywords(text: &str, title: Option<&str>) -> TextAnalysis {
    let full = format!("{} {}", title.unwrap_or(""), text).to_lowercase();

    // Highest hit count wins; earlier table entries win ties.
    let mut best: Option<(&str, usize)> = None;
    for &(category, keywords) in TEXT_CATEGORY_KEYWORDS {
        let hits = keywords.iter().filter(|kw| full.contains(*kw)).count();
        if best.is_none_or(|(_, top)| hits > top) {
            best = Some((category, hits));
        }
    }
    let (category, hits) = match best {
        Some((category, hits)) if hits > 0 => (category, hits),
        _ => ("other", 0),
    };

    let confidence =
        (BASE_CONFIDENCE + CONFIDENCE_PER_HIT * hits as f64).min(MAX_KEYWORD_CONFIDENCE);

    let urgency = TEXT_URGENCY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| full.contains(kw)))
        .map(|(urgency, _)| *urgency)
        .unwrap_or(Urgency::Medium);

    let sentiment = if NEGATIVE_WORDS.iter().any(|w| full.contains(w)) {
        Sentiment::Negative
    } else if URGENT_WORDS.iter().any(|w| full.contains(w)) {
        Sentiment::Urgent
    } else {
        Sentiment::Concerned
    };

    let keywords = full
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS && w.chars().all(char::is_alphabetic))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect();

    debug!(category, hits, ?urgency, ?sentiment, "Keyword text analysis");

    TextAnalysis {
        category: category.to_string(),
        confidence: round_to(confidence, 2),
        sentiment,
        urgency,
        keywords,
    }
}

static FENCE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*").expect("static regex"));
static FENCE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("static regex"));

/// Reply shape requested from a language model. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ModelReply {
    category: Option<String>,
    confidence: Option<f64>,
    sentiment: Option<String>,
    urgency: Option<String>,
    keywords: Option<Vec<String>>,
}

/// Parse a language model's JSON reply into a [`TextAnalysis`]. Tolerates a
/// surrounding Markdown code fence; missing fields take defaults and
/// confidence is clamped to `[0.7, 1.0]`.
pub fn parse_model_analysis(raw: &str) -> Result<TextAnalysis, TriageError> {
    let mut body = raw.trim().to_string();
    if body.starts_with("```") {
        body = FENCE_OPEN_RE.replace(&body, "").into_owned();
        body = FENCE_CLOSE_RE.replace(&body, "").into_owned();
    }

    let reply: ModelReply = serde_json::from_str(&body)
        .map_err(|e| TriageError::Analyzer(format!("unparseable model reply: {e}")))?;

    let mut keywords = reply.keywords.unwrap_or_default();
    keywords.truncate(MAX_KEYWORDS);

    Ok(TextAnalysis {
        category: reply.category.unwrap_or_else(|| "other".to_string()),
        confidence: reply.confidence.unwrap_or(0.8).clamp(0.7, 1.0),
        sentiment: reply
            .sentiment
            .as_deref()
            .and_then(Sentiment::parse)
            .unwrap_or(Sentiment::Concerned),
        urgency: reply
            .urgency
            .as_deref()
            .and_then(Urgency::parse)
            .unwrap_or(Urgency::Medium),
        keywords,
    })
}
