//! Symmetric 3×3 eigendecomposition
//!
//! Cyclic Jacobi rotations: each rotation zeroes one off-diagonal pair, and
//! a handful of sweeps drives the whole off-diagonal mass to round-off. For
//! a 3×3 covariance this is exact enough and has no failure modes beyond
//! the degenerate inputs handled by the identity fallback.

use super::CovarianceMatrix;

/// Upper bound on Jacobi sweeps before giving up.
const MAX_SWEEPS: usize = 64;

/// Convergence: off-diagonal norm relative to the Frobenius norm.
const TOLERANCE: f64 = 1e-15;

/// Variances at or below this are treated as a zero-variance channel.
const MIN_VARIANCE: f64 = 1e-12;

/// Orthonormal eigenvectors with their eigenvalues.
///
/// `vectors[i]` is the unit eigenvector belonging to `values[i]`; pairs are
/// sorted by descending eigenvalue.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenBasis {
    pub vectors: [[f64; 3]; 3],
    pub values: [f64; 3],
    fallback: bool,
}

impl EigenBasis {
    /// The identity basis with unit eigenvalues, used for degenerate input.
    pub fn identity() -> Self {
        Self {
            vectors: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            values: [1.0, 1.0, 1.0],
            fallback: true,
        }
    }

    /// Whether this basis came from the degenerate-input fallback.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Coordinates of `v` along each eigenvector.
    #[inline]
    pub fn project(&self, v: [f64; 3]) -> [f64; 3] {
        self.vectors.map(|e| dot(e, v))
    }

    /// Back from eigen coordinates to component axes.
    #[inline]
    pub fn reproject(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (coord, e) in p.iter().zip(self.vectors.iter()) {
            for k in 0..3 {
                out[k] += coord * e[k];
            }
        }
        out
    }
}

#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Eigendecomposition of a covariance matrix.
///
/// Never fails: non-finite entries, a zero-variance component, or a
/// rotation sequence that does not converge all yield
/// [`EigenBasis::identity`].
pub fn eigendecompose(matrix: &CovarianceMatrix) -> EigenBasis {
    if !matrix.is_finite() {
        tracing::debug!("non-finite covariance, using identity basis");
        return EigenBasis::identity();
    }
    if matrix.diagonal().iter().any(|&v| v <= MIN_VARIANCE) {
        tracing::debug!(
            diagonal = ?matrix.diagonal(),
            "zero-variance component, using identity basis"
        );
        return EigenBasis::identity();
    }
    match jacobi(matrix.0) {
        Some(basis) => basis,
        None => {
            tracing::debug!(
                sweeps = MAX_SWEEPS,
                "jacobi did not converge, using identity basis"
            );
            EigenBasis::identity()
        }
    }
}

fn jacobi(mut a: [[f64; 3]; 3]) -> Option<EigenBasis> {
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    let norm = a.iter().flatten().map(|x| x * x).sum::<f64>().sqrt();

    let mut converged = false;
    for _ in 0..MAX_SWEEPS {
        let off = (a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2]).sqrt();
        if off <= TOLERANCE * norm {
            converged = true;
            break;
        }
        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            rotate(&mut a, &mut v, p, q);
        }
    }
    if !converged {
        return None;
    }

    // Columns of v are the eigenvectors; store them as rows.
    let mut pairs: [([f64; 3], f64); 3] =
        std::array::from_fn(|i| ([v[0][i], v[1][i], v[2][i]], a[i][i]));
    pairs.sort_by(|x, y| y.1.total_cmp(&x.1));

    Some(EigenBasis {
        vectors: pairs.map(|(e, _)| e),
        values: pairs.map(|(_, l)| l),
        fallback: false,
    })
}

/// One Jacobi rotation `A ← Jᵀ A J`, `V ← V J` zeroing `a[p][q]`.
fn rotate(a: &mut [[f64; 3]; 3], v: &mut [[f64; 3]; 3], p: usize, q: usize) {
    let apq = a[p][q];
    if apq == 0.0 {
        return;
    }
    let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
    let t = if theta.abs() > 1e150 {
        0.5 / theta
    } else {
        theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
    };
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    for k in 0..3 {
        let akp = a[k][p];
        let akq = a[k][q];
        a[k][p] = c * akp - s * akq;
        a[k][q] = s * akp + c * akq;
    }
    for k in 0..3 {
        let apk = a[p][k];
        let aqk = a[q][k];
        a[p][k] = c * apk - s * aqk;
        a[q][k] = s * apk + c * aqk;
    }
    for row in v.iter_mut() {
        let vkp = row[p];
        let vkq = row[q];
        row[p] = c * vkp - s * vkq;
        row[q] = s * vkp + c * vkq;
    }
}
