//! Seeded k-means over 2-D points.
//!
//! Lloyd's algorithm with k-means++ seeding. Every restart draws from a
//! single `StdRng` seeded once, so identical input always yields identical
//! centers and labels. The restart with the lowest inertia wins; the
//! earliest restart wins ties.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use triage_common::TriageError;

pub type Point = [f64; 2];

#[derive(Debug, Clone)]
pub struct KMeans {
    pub k: usize,
    pub seed: u64,
    pub restarts: usize,
    pub max_iterations: usize,
    /// Convergence threshold on total squared center movement, relative to
    /// the mean per-axis variance of the data.
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub centers: Vec<Point>,
    /// Cluster index for each input point, in input order.
    pub labels: Vec<usize>,
    /// Sum of squared distances from each point to its center.
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }

    pub fn fit(&self, points: &[Point]) -> Result<KMeansFit, TriageError> {
        if self.k == 0 || self.k > points.len() {
            return Err(TriageError::InvalidInput(format!(
                "cannot form {} clusters from {} points",
                self.k,
                points.len()
            )));
        }

        let threshold = self.tolerance * mean_variance(points);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;

        for restart in 0..self.restarts.max(1) {
            let centers = plus_plus_init(points, self.k, &mut rng);
            let fit = lloyd(points, centers, self.max_iterations, threshold);
            debug!(restart, inertia = fit.inertia, iterations = fit.iterations, "k-means restart");

            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.ok_or_else(|| TriageError::InvalidInput("k-means produced no solution".to_string()))
    }
}

fn squared_distance(a: &Point, b: &Point) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

fn mean_variance(points: &[Point]) -> f64 {
    let n = points.len() as f64;
    let mut total = 0.0;
    for axis in 0..2 {
        let mean = points.iter().map(|p| p[axis]).sum::<f64>() / n;
        total += points.iter().map(|p| (p[axis] - mean).powi(2)).sum::<f64>() / n;
    }
    total / 2.0
}

/// k-means++: first center uniform, each next center sampled with
/// probability proportional to squared distance from the nearest chosen one.
fn plus_plus_init(points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let n = points.len();
    let mut centers = Vec::with_capacity(k);
    centers.push(points[rng.random_range(0..n)]);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centers[0]))
        .collect();

    while centers.len() < k {
        let total: f64 = nearest.iter().sum();
        let chosen = if total > 0.0 {
            weighted_pick(&nearest, rng.random::<f64>() * total)
        } else {
            // Every point sits on a chosen center already.
            rng.random_range(0..n)
        };

        let center = points[chosen];
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &center));
        }
        centers.push(center);
    }

    centers
}

/// Index whose cumulative weight first exceeds `target`. Zero-weight entries
/// are never picked.
fn weighted_pick(weights: &[f64], mut target: f64) -> usize {
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if target < w {
            return i;
        }
        target -= w;
        last_positive = i;
    }
    last_positive
}

/// Nearest center per point; lowest index wins ties.
fn assign(points: &[Point], centers: &[Point]) -> (Vec<usize>, f64) {
    let mut inertia = 0.0;
    let labels = points
        .iter()
        .map(|p| {
            let (label, dist) = centers
                .iter()
                .enumerate()
                .map(|(i, c)| (i, squared_distance(p, c)))
                .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best });
            inertia += dist;
            label
        })
        .collect();
    (labels, inertia)
}

fn lloyd(points: &[Point], mut centers: Vec<Point>, max_iterations: usize, threshold: f64) -> KMeansFit {
    let k = centers.len();
    let mut iterations = 0;

    for _ in 0..max_iterations.max(1) {
        iterations += 1;
        let (labels, _) = assign(points, &centers);

        let mut sums = vec![[0.0, 0.0]; k];
        let mut counts = vec![0usize; k];
        for (p, &label) in points.iter().zip(&labels) {
            sums[label][0] += p[0];
            sums[label][1] += p[1];
            counts[label] += 1;
        }

        let mut shift = 0.0;
        for c in 0..k {
            // Empty clusters keep their previous center.
            if counts[c] == 0 {
                continue;
            }
            let updated = [sums[c][0] / counts[c] as f64, sums[c][1] / counts[c] as f64];
            shift += squared_distance(&centers[c], &updated);
            centers[c] = updated;
        }

        if shift <= threshold {
            break;
        }
    }

    let (labels, inertia) = assign(points, &centers);
    KMeansFit {
        centers,
        labels,
        inertia,
        iterations,
    }
}
