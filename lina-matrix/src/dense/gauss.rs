use log::{debug, trace};
use lina::Real;
use crate::base::{LinSolver, MatStore, MatTrait};
use crate::err::{MatError, Result};
use super::{DnsMat, DnsVec};

// Gaussian elimination on the augmented system [A | b]. The three
// stages are free functions so the QR solver can reuse augmentation
// and back substitution on an already-triangular system.

pub fn augmented<R, M>(a: &M, b: &DnsVec<R>) -> Result<DnsMat<R>>
where R: Real, M: MatStore<R> {
    let (m, n) = a.shape();
    if n != b.dim() {
        return Err(MatError::DimensionMismatch { lhs: a.shape(), rhs: (b.dim(), 1) })
    }

    let aug = DnsMat::generate((m, n + 1), |i, j|
        if j < n { a.get(i, j) } else { b[i] }
    );
    Ok(aug)
}

pub fn forward_eliminate<R>(mut aug: DnsMat<R>, pivot: bool) -> Result<DnsMat<R>>
where R: Real {
    let m = aug.nrows();
    debug!("forward elimination: {:?}, pivot: {pivot}", aug.shape());

    for k in 0..m.saturating_sub(1) {
        if aug[(k, k)].is_zero() {
            if !pivot {
                return Err(MatError::SingularMatrix { pivot: k })
            }
            let swap = max_column_value_row(&aug, k, k);
            if swap == k || aug[(swap, k)].is_zero() {
                return Err(MatError::SingularMatrix { pivot: k })
            }
            aug.swap_rows(k, swap);
            trace!("pivot: swapped rows {k} and {swap}");
        }

        for i in k + 1..m {
            let ratio = aug[(i, k)] / aug[(k, k)];
            for j in k + 1..aug.ncols() {
                aug[(i, j)] = aug[(i, j)] - ratio * aug[(k, j)];
            }
        }
        trace!("eliminated column {k}:\n{aug}");
    }

    Ok(aug)
}

pub fn back_substitute<R>(aug: &DnsMat<R>) -> Result<DnsVec<R>>
where R: Real {
    let m = aug.nrows();
    let last = aug.ncols() - 1;
    let mut result = DnsVec::zero(m);

    for i in (0..m).rev() {
        let mut sum = aug[(i, last)];
        for j in i + 1..m {
            sum = sum - aug[(i, j)] * result[j];
        }
        if aug[(i, i)].is_zero() {
            return Err(MatError::SingularMatrix { pivot: i })
        }
        result[i] = sum / aug[(i, i)];
    }

    Ok(result)
}

// row at or below `start` holding the largest magnitude in `column`
fn max_column_value_row<R>(mat: &DnsMat<R>, column: usize, start: usize) -> usize
where R: Real {
    let mut best = start;
    let mut max_so_far = R::zero();
    for row in start..mat.nrows() {
        if mat[(row, column)].abs() > max_so_far {
            best = row;
            max_so_far = mat[(row, column)].abs();
        }
    }
    best
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GaussSolver {
    pivot: bool
}

impl GaussSolver {
    pub fn new(pivot: bool) -> Self {
        Self { pivot }
    }

    pub fn set_pivot(&mut self, pivot: bool) {
        self.pivot = pivot;
    }
}

impl<R> LinSolver<R> for GaussSolver
where R: Real {
    fn solve<M>(&self, a: &M, b: &DnsVec<R>) -> Result<DnsVec<R>>
    where M: MatStore<R> {
        if !a.is_square() {
            return Err(MatError::DimensionMismatch { lhs: a.shape(), rhs: a.shape() })
        }

        debug!("gauss solve: {:?}, pivot: {}", a.shape(), self.pivot);

        let aug = augmented(a, b)?;
        let aug = forward_eliminate(aug, self.pivot)?;
        back_substitute(&aug)
    }
}
