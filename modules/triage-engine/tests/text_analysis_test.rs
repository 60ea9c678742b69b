use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use triage_common::{Sentiment, TextAnalysis, TriageError, Urgency};
use triage_engine::{
    parse_model_analysis, FallbackTextAnalyzer, KeywordTextAnalyzer, TextAnalyzer,
};

/// Stands in for a language model: replays a canned reply and counts calls.
struct CannedModel {
    reply: &'static str,
    calls: AtomicUsize,
}

impl CannedModel {
    fn new(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextAnalyzer for CannedModel {
    async fn analyze(&self, _text: &str, _title: Option<&str>) -> Result<TextAnalysis, TriageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        parse_model_analysis(self.reply)
    }
}

struct Offline;

#[async_trait]
impl TextAnalyzer for Offline {
    async fn analyze(&self, _text: &str, _title: Option<&str>) -> Result<TextAnalysis, TriageError> {
        Err(TriageError::Analyzer("connection refused".to_string()))
    }
}

#[tokio::test]
async fn keywords_only_uses_tables() -> anyhow::Result<()> {
    let analyzer = FallbackTextAnalyzer::keywords_only();
    let analysis = analyzer
        .analyze("Sewage pipe burst, water everywhere", Some("Emergency"))
        .await?;

    assert_eq!(analysis.category, "water");
    assert_eq!(analysis.urgency, Urgency::Critical);
    Ok(())
}

#[tokio::test]
async fn model_reply_is_used_when_available() -> anyhow::Result<()> {
    let model = CannedModel::new(
        r#"{"category": "electricity", "confidence": 0.92, "sentiment": "negative", "urgency": "high", "keywords": ["outage"]}"#,
    );
    let analyzer = FallbackTextAnalyzer::new(model.clone());

    let analysis = analyzer.analyze("The whole block has no power", None).await?;

    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    assert_eq!(analysis.category, "electricity");
    assert_eq!(analysis.confidence, 0.92);
    assert_eq!(analysis.sentiment, Sentiment::Negative);
    assert_eq!(analysis.keywords, vec!["outage"]);
    Ok(())
}

#[tokio::test]
async fn failing_model_falls_back_to_keywords() -> anyhow::Result<()> {
    let text = "Garbage piling up near the park";
    let analyzer = FallbackTextAnalyzer::new(Arc::new(Offline));

    let analysis = analyzer.analyze(text, None).await?;
    let expected = KeywordTextAnalyzer.analyze(text, None).await?;

    assert_eq!(analysis, expected);
    assert_eq!(analysis.category, "waste");
    Ok(())
}

#[tokio::test]
async fn unparseable_model_reply_falls_back_to_keywords() -> anyhow::Result<()> {
    let model = CannedModel::new("Sorry, I can't help with that.");
    let analyzer = FallbackTextAnalyzer::new(model.clone());

    let analysis = analyzer.analyze("Streetlight flickering", None).await?;

    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    assert_eq!(analysis.category, "road");
    Ok(())
}
