use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

/// GeoJSON-style location as stored on an issue: `coordinates` is `[lng, lat]`.
/// Anything past the second element (altitude) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueLocation {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl IssueLocation {
    pub fn point(lng: f64, lat: f64) -> Self {
        Self {
            coordinates: vec![lng, lat],
        }
    }

    /// The `(lng, lat)` pair, if at least two coordinates are present.
    pub fn lng_lat(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lng, lat, ..] => Some((*lng, *lat)),
            _ => None,
        }
    }
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// High and critical clusters become risk zones and drive predictions.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Urgency::Low),
            "medium" => Some(Urgency::Medium),
            "high" => Some(Urgency::High),
            "critical" => Some(Urgency::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Negative,
    Neutral,
    Concerned,
    Urgent,
}

impl Sentiment {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            "concerned" => Some(Sentiment::Concerned),
            "urgent" => Some(Sentiment::Urgent),
            _ => None,
        }
    }
}

// --- Duplicate detection ---

/// The report being submitted, compared against issues already on file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub title: String,
    pub description: String,
    pub category: String,
}

/// An issue already on file. Records come straight from storage, so every
/// field is lenient: ids may be strings or numbers, and missing, null or
/// non-string text reads as empty. A missing identifier reports as `"unknown"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExistingIssue {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "lenient_id")]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

impl ExistingIssue {
    pub fn issue_id(&self) -> &str {
        self.id
            .as_deref()
            .or(self.document_id.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub issue_id: String,
    pub title: String,
    /// Combined text + category score, rounded to two decimals.
    pub similarity_score: f64,
    pub category_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateVerdict {
    pub is_duplicate: bool,
    pub confidence: f64,
    /// Descending by score, at most five entries.
    pub similar_issues: Vec<SimilarityMatch>,
    pub recommendation: String,
}

// --- Hotspots ---

/// An issue as seen by the hotspot analysis. Only issues carrying a
/// location with at least two coordinates take part in clustering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotspotIssue {
    #[serde(default)]
    pub location: Option<IssueLocation>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl HotspotIssue {
    pub fn at(lng: f64, lat: f64) -> Self {
        Self {
            location: Some(IssueLocation::point(lng, lat)),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Index of the k-means label this cluster was built from.
    pub id: usize,
    pub center: GeoPoint,
    pub issue_count: usize,
    pub dominant_category: String,
    pub category_distribution: BTreeMap<String, usize>,
    /// Mean member priority, rounded to one decimal.
    pub avg_priority: f64,
    pub pending_issues: usize,
    pub risk_level: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub location: GeoPoint,
    pub predicted_category: String,
    pub confidence: f64,
    pub timeframe: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotReport {
    pub clusters: Vec<Cluster>,
    pub predictions: Vec<Prediction>,
    pub risk_zones: Vec<Cluster>,
    pub total_issues_analyzed: usize,
    /// Set only when there was not enough data to cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HotspotReport {
    pub fn insufficient(message: &str, total_issues_analyzed: usize) -> Self {
        Self {
            clusters: Vec::new(),
            predictions: Vec::new(),
            risk_zones: Vec::new(),
            total_issues_analyzed,
            message: Some(message.to_string()),
        }
    }
}

// --- Priority ---

fn default_location_density() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityInput {
    pub category: String,
    pub description: String,
    /// Counts are taken as reported; negative values lower the engagement score.
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub verifications: i64,
    /// Share of nearby issues in [0, 1]; hotspot areas score higher.
    #[serde(default = "default_location_density")]
    pub location_density: f64,
}

impl PriorityInput {
    pub fn new(category: &str, description: &str) -> Self {
        Self {
            category: category.to_string(),
            description: description.to_string(),
            upvotes: 0,
            verifications: 0,
            location_density: default_location_density(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityFactors {
    pub category_weight: i32,
    pub urgency_modifier: i32,
    pub engagement_score: f64,
    pub density_modifier: f64,
    pub raw_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    /// Final priority, always within 1..=10.
    pub priority: u8,
    pub factors: PriorityFactors,
}

// --- Collaborator contracts ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub category: String,
    pub confidence: f64,
    pub sentiment: Sentiment,
    pub urgency: Urgency,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub detected_category: String,
    pub confidence: f64,
    pub issues_detected: Vec<String>,
    pub severity: Severity,
}

impl ImageAnalysis {
    /// Verdict reported when an image cannot be analyzed.
    pub fn unreadable() -> Self {
        Self {
            detected_category: "other".to_string(),
            confidence: 0.5,
            issues_detected: vec!["Unable to analyze image clearly".to_string()],
            severity: Severity::Medium,
        }
    }
}

/// Round to a fixed number of decimal places for display. Exact halves
/// go to the even neighbour, so 6.25 shows as 6.2.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
