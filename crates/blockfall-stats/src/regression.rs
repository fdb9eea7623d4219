//! Ordinary least squares linear regression with an intercept.
//!
//! The model is fitted on mean-centered data, which removes the intercept from the normal
//! equations:
//!
//! ```text
//! (Xcᵀ Xc) β = Xcᵀ yc        Xc = X − x̄,  yc = y − ȳ
//! intercept  = ȳ − β · x̄
//! ```
//!
//! The normal equations are solved through an eigendecomposition of `XcᵀXc`. Directions
//! whose eigenvalue is negligible are dropped, so linearly dependent features (including
//! fewer samples than features) yield the minimum-norm least-squares solution, the same one
//! a pseudo-inverse gives.
//!
//! # Example
//!
//! ```
//! use blockfall_stats::regression::LinearModel;
//!
//! // y = 1 + 2·a − 3·b
//! let features = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [2.0, 1.0]];
//! let targets = [1.0, 3.0, -2.0, 2.0];
//!
//! let model = LinearModel::fit(&features, &targets).unwrap();
//! assert!((model.intercept() - 1.0).abs() < 1e-9);
//! assert!((model.predict(&[3.0, 2.0]) - 1.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// Reason a [`LinearModel`] could not be fitted.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RegressionError {
    #[display("got {features} feature rows but {targets} targets")]
    LengthMismatch { features: usize, targets: usize },
    #[display("feature row {row} has {actual} values, expected {expected}")]
    RaggedFeatures {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("feature rows are empty")]
    NoFeatures,
    #[display("need at least two distinct samples, got {distinct}")]
    InsufficientSamples { distinct: usize },
    #[display("samples contain a non-finite value")]
    NonFinite,
}

/// Fitted linear function `intercept + Σ coefficientᵢ · xᵢ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

// Eigenvalues smaller than this fraction of the largest one are treated as zero.
const RELATIVE_EIGENVALUE_TOLERANCE: f64 = 1e-10;
const MAX_JACOBI_SWEEPS: usize = 64;
// Off-diagonal mass, relative to the matrix norm, at which the rotations stop.
const JACOBI_CONVERGENCE: f64 = 1e-14;
const NEGLIGIBLE_OFF_DIAGONAL: f64 = 1e-20;

impl LinearModel {
    /// Fits the model to `features` (one row per sample) and `targets`.
    #[expect(clippy::cast_precision_loss)]
    pub fn fit<R>(features: &[R], targets: &[f64]) -> Result<Self, RegressionError>
    where
        R: AsRef<[f64]>,
    {
        if features.len() != targets.len() {
            return Err(RegressionError::LengthMismatch {
                features: features.len(),
                targets: targets.len(),
            });
        }
        let dim = features.first().map_or(0, |row| row.as_ref().len());
        for (row, values) in features.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dim {
                return Err(RegressionError::RaggedFeatures {
                    row,
                    expected: dim,
                    actual: values.len(),
                });
            }
            if !values.iter().all(|v| v.is_finite()) {
                return Err(RegressionError::NonFinite);
            }
        }
        if !targets.iter().all(|v| v.is_finite()) {
            return Err(RegressionError::NonFinite);
        }

        let distinct = count_distinct_rows(features, 2);
        if distinct < 2 {
            return Err(RegressionError::InsufficientSamples { distinct });
        }
        if dim == 0 {
            return Err(RegressionError::NoFeatures);
        }

        let n = features.len() as f64;
        let mut x_mean = vec![0.0; dim];
        for row in features {
            for (m, v) in x_mean.iter_mut().zip(row.as_ref()) {
                *m += v / n;
            }
        }
        let y_mean = targets.iter().sum::<f64>() / n;

        // normal equations XcᵀXc β = Xcᵀyc
        let mut gram = vec![vec![0.0; dim]; dim];
        let mut rhs = vec![0.0; dim];
        for (row, y) in features.iter().zip(targets) {
            let centered: Vec<f64> = row
                .as_ref()
                .iter()
                .zip(&x_mean)
                .map(|(v, m)| v - m)
                .collect();
            let yc = y - y_mean;
            for ((gram_row, r), xi) in gram.iter_mut().zip(&mut rhs).zip(&centered) {
                for (g, xj) in gram_row.iter_mut().zip(&centered) {
                    *g += xi * xj;
                }
                *r += xi * yc;
            }
        }

        let coefficients = solve_min_norm(gram, &rhs);
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(c, m)| c * m)
                .sum::<f64>();
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Evaluates the model at `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have one value per coefficient.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> f64 {
        assert_eq!(x.len(), self.coefficients.len());
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }
}

/// Counts distinct rows, stopping once `limit` have been found.
fn count_distinct_rows<R>(rows: &[R], limit: usize) -> usize
where
    R: AsRef<[f64]>,
{
    let mut distinct: Vec<&[f64]> = Vec::with_capacity(limit);
    for row in rows {
        let row = row.as_ref();
        if !distinct.contains(&row) {
            distinct.push(row);
            if distinct.len() >= limit {
                break;
            }
        }
    }
    distinct.len()
}

/// Minimum-norm solution of the positive semi-definite system `gram · β = rhs`.
///
/// With `gram = V Λ Vᵀ`, the solution is `Σ (vᵢ · rhs / λᵢ) vᵢ` over the non-negligible
/// eigenvalues. `rhs` lies in the range of `gram`, so the dropped directions lose nothing.
fn solve_min_norm(gram: Vec<Vec<f64>>, rhs: &[f64]) -> Vec<f64> {
    let (eigenvalues, eigenvectors) = symmetric_eigen(gram);
    let largest = eigenvalues.iter().copied().fold(0.0_f64, f64::max);
    let tolerance = largest * RELATIVE_EIGENVALUE_TOLERANCE;

    let mut solution = vec![0.0; rhs.len()];
    for (k, lambda) in eigenvalues.into_iter().enumerate() {
        if lambda <= tolerance {
            continue;
        }
        let projection = eigenvectors
            .iter()
            .zip(rhs)
            .map(|(row, b)| row[k] * b)
            .sum::<f64>()
            / lambda;
        for (s, row) in solution.iter_mut().zip(&eigenvectors) {
            *s += projection * row[k];
        }
    }
    solution
}

/// Diagonalizes a symmetric matrix with cyclic Jacobi rotations.
///
/// Returns the eigenvalues and a matrix whose columns are the matching unit eigenvectors.
fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let dim = a.len();
    let mut v: Vec<Vec<f64>> = (0..dim)
        .map(|i| (0..dim).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    let norm = a.iter().flatten().map(|x| x * x).sum::<f64>().sqrt();

    for _ in 0..MAX_JACOBI_SWEEPS {
        let off_diagonal = a
            .iter()
            .enumerate()
            .flat_map(|(p, row)| {
                row.iter()
                    .enumerate()
                    .filter(move |(q, _)| *q != p)
                    .map(|(_, x)| x * x)
            })
            .sum::<f64>()
            .sqrt();
        if off_diagonal <= norm * JACOBI_CONVERGENCE {
            break;
        }

        for p in 0..dim {
            for q in p + 1..dim {
                let apq = a[p][q];
                if apq.abs() <= norm * NEGLIGIBLE_OFF_DIAGONAL {
                    continue;
                }
                // rotation angle that zeroes a[p][q]
                let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + theta.hypot(1.0));
                let c = 1.0 / t.hypot(1.0);
                let s = t * c;
                rotate_columns(&mut a, p, q, c, s);
                rotate_rows(&mut a, p, q, c, s);
                rotate_columns(&mut v, p, q, c, s);
            }
        }
    }

    let eigenvalues = (0..dim).map(|i| a[i][i]).collect();
    (eigenvalues, v)
}

fn rotate_columns(m: &mut [Vec<f64>], p: usize, q: usize, c: f64, s: f64) {
    for row in m {
        let (xp, xq) = (row[p], row[q]);
        row[p] = c * xp - s * xq;
        row[q] = s * xp + c * xq;
    }
}

/// Requires `p < q`.
fn rotate_rows(m: &mut [Vec<f64>], p: usize, q: usize, c: f64, s: f64) {
    let (head, tail) = m.split_at_mut(q);
    for (xp, xq) in head[p].iter_mut().zip(tail[0].iter_mut()) {
        let (vp, vq) = (*xp, *xq);
        *xp = c * vp - s * vq;
        *xq = s * vp + c * vq;
    }
}
