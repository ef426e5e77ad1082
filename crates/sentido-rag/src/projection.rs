//! 2-D projection of embeddings and the semantic map rendered from it.
//!
//! Points are projected onto their first two principal components, found by
//! power iteration on the centered data without materializing the
//! covariance matrix. The map is a standalone SVG scatter plot coloured by
//! cluster.

use std::path::Path;

use crate::error::RagError;

const POWER_ITERATIONS: usize = 100;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 800.0;
const MARGIN: f64 = 80.0;

/// Viridis stops, dark to light.
const PALETTE: [&str; 9] = [
    "#440154", "#472d7b", "#3b528b", "#2c728e", "#21918c", "#28ae80", "#5ec962", "#addc30",
    "#fde725",
];

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn normalize(v: &mut [f64]) -> bool {
    let norm = dot(v, v).sqrt();
    if norm <= f64::EPSILON {
        return false;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    true
}

/// Top principal direction of `rows`, orthogonal to every vector in `exclude`.
fn principal_axis(rows: &[Vec<f64>], dim: usize, exclude: &[Vec<f64>]) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    let mut v: Vec<f64> = (0..dim).map(|i| 1.0 + (i as f64 * 0.618).sin()).collect();

    for _ in 0..POWER_ITERATIONS {
        for axis in exclude {
            let p = dot(&v, axis);
            for (x, a) in v.iter_mut().zip(axis) {
                *x -= p * a;
            }
        }
        if !normalize(&mut v) {
            return vec![0.0; dim];
        }

        // v <- Xᵀ X v
        let mut next = vec![0.0; dim];
        for row in rows {
            let s = dot(row, &v);
            for (n, r) in next.iter_mut().zip(row) {
                *n += s * r;
            }
        }
        v = next;
    }

    for axis in exclude {
        let p = dot(&v, axis);
        for (x, a) in v.iter_mut().zip(axis) {
            *x -= p * a;
        }
    }
    if normalize(&mut v) {
        v
    } else {
        vec![0.0; dim]
    }
}

/// Project `points` onto their first two principal components.
///
/// Degenerate inputs (no points, zero-width vectors, all points equal)
/// project to the origin.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn project_2d(points: &[Vec<f32>]) -> Vec<[f32; 2]> {
    let Some(dim) = points.first().map(Vec::len) else {
        return Vec::new();
    };

    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let mut mean = vec![0.0f64; dim];
    for p in points {
        for (m, x) in mean.iter_mut().zip(p) {
            *m += f64::from(*x) / n;
        }
    }
    let centered: Vec<Vec<f64>> = points
        .iter()
        .map(|p| p.iter().zip(&mean).map(|(x, m)| f64::from(*x) - m).collect())
        .collect();

    let first = principal_axis(&centered, dim, &[]);
    let second = principal_axis(&centered, dim, std::slice::from_ref(&first));

    centered
        .iter()
        .map(|row| [dot(row, &first) as f32, dot(row, &second) as f32])
        .collect()
}

fn colour(label: usize, clusters: usize) -> &'static str {
    if clusters <= 1 {
        return PALETTE[0];
    }
    PALETTE[label.min(clusters - 1) * (PALETTE.len() - 1) / (clusters - 1)]
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a scatter plot of `points` coloured by `labels`.
///
/// Only the first `min(points.len(), labels.len())` points are drawn.
#[must_use]
pub fn render_svg(points: &[[f32; 2]], labels: &[usize], title: &str) -> String {
    let count = points.len().min(labels.len());
    let points = &points[..count];
    let clusters = labels[..count].iter().max().map_or(0, |m| m + 1);

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    if let Some(first) = points.first() {
        min_x = f64::from(first[0]);
        max_x = min_x;
        min_y = f64::from(first[1]);
        max_y = min_y;
    }
    for p in points {
        min_x = min_x.min(f64::from(p[0]));
        max_x = max_x.max(f64::from(p[0]));
        min_y = min_y.min(f64::from(p[1]));
        max_y = max_y.max(f64::from(p[1]));
    }
    let span_x = (max_x - min_x).max(f64::EPSILON);
    let span_y = (max_y - min_y).max(f64::EPSILON);
    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;

    let mut lines: Vec<String> = Vec::with_capacity(points.len() + clusters + 8);
    lines.push(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    ));
    lines.push(r#"<rect width="100%" height="100%" fill="white"/>"#.to_string());
    lines.push(format!(
        r#"<text x="{}" y="40" font-size="22" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape(title)
    ));
    lines.push(format!(
        r#"<text x="{}" y="{}" font-size="14" text-anchor="middle">Dimensión Latente 1</text>"#,
        WIDTH / 2.0,
        HEIGHT - 25.0
    ));
    lines.push(format!(
        r#"<text x="25" y="{}" font-size="14" text-anchor="middle" transform="rotate(-90 25 {})">Dimensión Latente 2</text>"#,
        HEIGHT / 2.0,
        HEIGHT / 2.0
    ));
    lines.push(format!(
        r##"<rect x="{MARGIN}" y="{MARGIN}" width="{plot_w}" height="{plot_h}" fill="none" stroke="#999"/>"##
    ));

    for (p, label) in points.iter().zip(labels) {
        let cx = MARGIN + (f64::from(p[0]) - min_x) / span_x * plot_w;
        let cy = HEIGHT - MARGIN - (f64::from(p[1]) - min_y) / span_y * plot_h;
        lines.push(format!(
            r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="3" fill="{}" fill-opacity="0.7"/>"#,
            colour(*label, clusters)
        ));
    }

    let legend_x = WIDTH - MARGIN - 140.0;
    lines.push(format!(
        r#"<text x="{legend_x}" y="{}" font-size="13">Clúster Temático</text>"#,
        MARGIN + 20.0
    ));
    for cluster in 0..clusters {
        #[allow(clippy::cast_precision_loss)]
        let y = MARGIN + 40.0 + cluster as f64 * 20.0;
        lines.push(format!(
            r#"<circle cx="{}" cy="{}" r="6" fill="{}"/><text x="{}" y="{}" font-size="12">{cluster}</text>"#,
            legend_x + 6.0,
            y - 4.0,
            colour(cluster, clusters),
            legend_x + 20.0,
            y
        ));
    }
    lines.push("</svg>".to_string());
    let mut svg = lines.join("\n");
    svg.push('\n');
    svg
}

/// Project the first `max_points` embeddings and write the map to `path`,
/// replacing any previous file.
///
/// # Errors
///
/// Returns [`RagError::Io`] if the file cannot be written.
pub fn write_semantic_map(
    path: &Path,
    embeddings: &[Vec<f32>],
    labels: &[usize],
    max_points: usize,
) -> Result<usize, RagError> {
    let count = embeddings.len().min(labels.len()).min(max_points);
    let projected = project_2d(&embeddings[..count]);
    let svg = render_svg(&projected, &labels[..count], "Mapa Semántico");
    std::fs::write(path, svg).map_err(|e| RagError::io(path, e))?;
    tracing::info!(path = %path.display(), points = count, "wrote semantic map");
    Ok(count)
}
