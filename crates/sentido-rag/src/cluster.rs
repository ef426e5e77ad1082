//! Seeded k-means over chunk embeddings.
//!
//! Centroids are seeded with k-means++ and refined with Lloyd iterations.
//! Several restarts run from the same seeded generator and the lowest
//! inertia wins, so a given seed always yields the same labels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Independent k-means++ initialisations per run.
pub const RESTARTS: usize = 10;

const MAX_ITERATIONS: usize = 300;

#[derive(Debug, Clone)]
pub struct Clustering {
    /// Cluster of each input point, in input order.
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f32>>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
}

impl Clustering {
    /// Number of points per cluster.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}

fn nearest(point: &[f32], centroids: &[Vec<f32>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best.1 {
            best = (idx, d);
        }
    }
    best
}

fn init_plus_plus(points: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())].clone());

    let mut dist: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = dist.iter().sum();
        let pick = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (idx, d) in dist.iter().enumerate() {
                if target < *d {
                    chosen = idx;
                    break;
                }
                target -= d;
            }
            chosen
        } else {
            // All remaining points coincide with a centroid.
            rng.random_range(0..points.len())
        };

        let centroid = points[pick].clone();
        for (d, p) in dist.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }
    centroids
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn lloyd(points: &[Vec<f32>], mut centroids: Vec<Vec<f32>>) -> Clustering {
    let dim = points[0].len();
    let mut labels = vec![usize::MAX; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (label, point) in labels.iter_mut().zip(points) {
            let (idx, _) = nearest(point, &centroids);
            if *label != idx {
                *label = idx;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![vec![0.0f64; dim]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (label, point) in labels.iter().zip(points) {
            counts[*label] += 1;
            for (s, x) in sums[*label].iter_mut().zip(point) {
                *s += f64::from(*x);
            }
        }
        for ((centroid, sum), count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            // An emptied cluster keeps its previous centroid.
            if *count == 0 {
                continue;
            }
            for (c, s) in centroid.iter_mut().zip(sum) {
                *c = (s / *count as f64) as f32;
            }
        }
    }

    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(p, l)| squared_distance(p, &centroids[*l]))
        .sum();
    Clustering {
        labels,
        centroids,
        inertia,
    }
}

/// Partition `points` into `k` clusters.
///
/// `k` is clamped to the number of points. An empty input yields an empty
/// clustering.
#[must_use]
pub fn kmeans(points: &[Vec<f32>], k: usize, seed: u64) -> Clustering {
    let k = k.min(points.len());
    if k == 0 {
        return Clustering {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
        };
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best: Option<Clustering> = None;
    for restart in 0..RESTARTS {
        let run = lloyd(points, init_plus_plus(points, k, &mut rng));
        tracing::debug!(restart, inertia = run.inertia, "k-means restart");
        if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }

    best.unwrap_or(Clustering {
        labels: Vec::new(),
        centroids: Vec::new(),
        inertia: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.0],
            vec![10.0, 10.1],
        ]
    }

    #[test]
    fn separates_well_spaced_blobs() {
        let result = kmeans(&blobs(), 2, 42);
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[1], result.labels[2]);
        assert_eq!(result.labels[3], result.labels[4]);
        assert_ne!(result.labels[0], result.labels[3]);
        assert_eq!(result.sizes(), vec![3, 3]);
        assert!(result.inertia < 0.1);
    }

    #[test]
    fn same_seed_same_labels() {
        let a = kmeans(&blobs(), 3, 7);
        let b = kmeans(&blobs(), 3, 7);
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn k_is_clamped_to_point_count() {
        let points = vec![vec![1.0], vec![2.0], vec![3.0]];
        let result = kmeans(&points, 5, 42);
        assert_eq!(result.centroids.len(), 3);
        assert!(result.inertia.abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_empty_clustering() {
        let result = kmeans(&[], 5, 42);
        assert!(result.labels.is_empty());
        assert!(result.centroids.is_empty());
    }

    #[test]
    fn identical_points_do_not_panic() {
        let points = vec![vec![1.0, 1.0]; 4];
        let result = kmeans(&points, 2, 42);
        assert_eq!(result.labels.len(), 4);
        assert!(result.inertia.abs() < 1e-9);
    }
}
