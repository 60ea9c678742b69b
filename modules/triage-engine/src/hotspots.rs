//! Hotspot analysis: cluster geolocated issues and rate each cluster's risk.
//!
//! Algorithm:
//! 1. Keep issues whose location carries at least `[lng, lat]`
//! 2. Choose `k = clamp(n / 2, 2, 5)` and run seeded k-means
//! 3. Summarize each non-empty cluster (dominant category, mean priority, pending count)
//! 4. Bucket risk from `0.4 * avg_priority + 0.3 * issue_count + 0.3 * pending`
//! 5. Rank clusters by `avg_priority * issue_count`; the first elevated ones
//!    become risk zones and predictions

use std::collections::BTreeMap;

use tracing::{debug, info};

use triage_common::{
    round_to, ClusteringConfig, Cluster, GeoPoint, HotspotIssue, HotspotReport, Prediction,
    Severity, TriageError,
};

use crate::kmeans::{KMeans, Point};

/// Fewer issues (or fewer geolocated issues) than this cannot be clustered.
const MIN_POINTS: usize = 3;

const MIN_CLUSTERS: usize = 2;
const MAX_CLUSTERS: usize = 5;

/// Risk zones and predictions are each capped at this many clusters.
const MAX_RISK_ZONES: usize = 3;
const MAX_PREDICTIONS: usize = 3;

const PREDICTION_TIMEFRAME: &str = "next 30 days";

const DEFAULT_CATEGORY: &str = "other";
const DEFAULT_PRIORITY: i32 = 5;
const PENDING_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq)]
pub struct HotspotParams {
    pub seed: u64,
    pub restarts: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for HotspotParams {
    fn default() -> Self {
        Self::from(&ClusteringConfig::default())
    }
}

impl From<&ClusteringConfig> for HotspotParams {
    fn from(config: &ClusteringConfig) -> Self {
        Self {
            seed: config.seed,
            restarts: config.restarts,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }
}

/// An issue that made it past location filtering.
struct Located<'a> {
    point: Point,
    category: &'a str,
    priority: i32,
    pending: bool,
}

/// Cluster issues with the default parameters (seed 42, 10 restarts).
pub fn analyze_hotspots(issues: &[HotspotIssue]) -> Result<HotspotReport, TriageError> {
    analyze_hotspots_with(issues, &HotspotParams::default())
}

pub fn analyze_hotspots_with(
    issues: &[HotspotIssue],
    params: &HotspotParams,
) -> Result<HotspotReport, TriageError> {
    if issues.len() < MIN_POINTS {
        info!(issues = issues.len(), "Too few issues for hotspot analysis");
        return Ok(HotspotReport::insufficient(
            "Insufficient data for hotspot analysis",
            issues.len(),
        ));
    }

    let located = locate(issues)?;
    let n = located.len();
    if n < MIN_POINTS {
        info!(issues = issues.len(), located = n, "Too few geolocated issues for hotspot analysis");
        return Ok(HotspotReport::insufficient("Insufficient location data", n));
    }

    let k = (n / 2).clamp(MIN_CLUSTERS, MAX_CLUSTERS);
    let points: Vec<Point> = located.iter().map(|l| l.point).collect();
    let fit = KMeans {
        k,
        seed: params.seed,
        restarts: params.restarts,
        max_iterations: params.max_iterations,
        tolerance: params.tolerance,
    }
    .fit(&points)?;

    debug!(points = n, k, inertia = fit.inertia, "Clustered issue locations");

    let mut clusters: Vec<Cluster> = (0..k)
        .filter_map(|label| {
            let members: Vec<&Located> = located
                .iter()
                .zip(&fit.labels)
                .filter(|(_, l)| **l == label)
                .map(|(issue, _)| issue)
                .collect();
            summarize(label, fit.centers[label], &members)
        })
        .collect();

    clusters.sort_by(|a, b| cluster_weight(b).total_cmp(&cluster_weight(a)));

    let risk_zones: Vec<Cluster> = clusters
        .iter()
        .filter(|c| c.risk_level.is_elevated())
        .take(MAX_RISK_ZONES)
        .cloned()
        .collect();

    let predictions = predict(&clusters);

    info!(
        points = n,
        clusters = clusters.len(),
        risk_zones = risk_zones.len(),
        predictions = predictions.len(),
        "Hotspot analysis complete"
    );

    Ok(HotspotReport {
        clusters,
        predictions,
        risk_zones,
        total_issues_analyzed: n,
        message: None,
    })
}

fn locate(issues: &[HotspotIssue]) -> Result<Vec<Located<'_>>, TriageError> {
    let mut located = Vec::with_capacity(issues.len());
    for (idx, issue) in issues.iter().enumerate() {
        let Some((lng, lat)) = issue.location.as_ref().and_then(|l| l.lng_lat()) else {
            continue;
        };
        if !lng.is_finite() || !lat.is_finite() {
            return Err(TriageError::InvalidInput(format!(
                "issue {idx} has non-finite coordinates [{lng}, {lat}]"
            )));
        }
        located.push(Located {
            point: [lng, lat],
            category: issue.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
            priority: issue.priority.unwrap_or(DEFAULT_PRIORITY),
            pending: issue.status.as_deref().unwrap_or(PENDING_STATUS) == PENDING_STATUS,
        });
    }
    Ok(located)
}

fn summarize(label: usize, center: Point, members: &[&Located]) -> Option<Cluster> {
    if members.is_empty() {
        return None;
    }

    let dominant_category = dominant_category(members.iter().map(|m| m.category))?;
    let mut category_distribution = BTreeMap::new();
    for m in members {
        *category_distribution.entry(m.category.to_string()).or_insert(0) += 1;
    }

    let issue_count = members.len();
    let avg_priority =
        members.iter().map(|m| m.priority as f64).sum::<f64>() / issue_count as f64;
    let pending_issues = members.iter().filter(|m| m.pending).count();

    Some(Cluster {
        id: label,
        center: GeoPoint {
            lng: center[0],
            lat: center[1],
        },
        issue_count,
        dominant_category,
        category_distribution,
        avg_priority: round_to(avg_priority, 1),
        pending_issues,
        risk_level: risk_level(avg_priority, issue_count, pending_issues),
    })
}

/// Most frequent category; on equal counts the one seen first wins.
pub fn dominant_category<'a>(categories: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for category in categories {
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((category, n));
        }
    }
    best.map(|(category, _)| category.to_string())
}

/// Bucket a cluster's risk score: `>= 8` critical, `>= 6` high, `>= 4` medium.
pub fn risk_level(avg_priority: f64, issue_count: usize, pending_issues: usize) -> Severity {
    let score = 0.4 * avg_priority + 0.3 * issue_count as f64 + 0.3 * pending_issues as f64;
    if score >= 8.0 {
        Severity::Critical
    } else if score >= 6.0 {
        Severity::High
    } else if score >= 4.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn cluster_weight(cluster: &Cluster) -> f64 {
    cluster.avg_priority * cluster.issue_count as f64
}

/// Elevated clusters, in ranked order, become predicted future problem areas.
fn predict(clusters: &[Cluster]) -> Vec<Prediction> {
    clusters
        .iter()
        .filter(|c| c.risk_level.is_elevated())
        .take(MAX_PREDICTIONS)
        .map(|c| Prediction {
            location: c.center,
            predicted_category: c.dominant_category.clone(),
            confidence: 0.7 + c.avg_priority / 30.0,
            timeframe: PREDICTION_TIMEFRAME.to_string(),
            recommendation: format!(
                "Proactive maintenance recommended for {} issues in this area",
                c.dominant_category
            ),
        })
        .collect()
}
