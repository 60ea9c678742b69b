//! Scoring and clustering core for civic-issue triage.
//!
//! Every entry point is a pure function over its arguments: no I/O, no
//! shared state. Hotspot clustering is seeded so repeated calls agree.

pub mod duplicates;
pub mod hotspots;
pub mod image;
pub mod kmeans;
pub mod priority;
pub mod similarity;
pub mod text_analysis;

pub use duplicates::detect_duplicate;
pub use hotspots::{analyze_hotspots, analyze_hotspots_with, risk_level, HotspotParams};
pub use image::{ImageClassifier, UnavailableImageClassifier};
pub use priority::predict_priority;
pub use text_analysis::{
    analyze_with_keywords, parse_model_analysis, FallbackTextAnalyzer, KeywordTextAnalyzer,
    TextAnalyzer,
};
