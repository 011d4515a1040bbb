use std::fmt;
use lina::Real;
use crate::dense::{DnsMat, DnsVec};
use crate::err::{MatError, Result};

pub trait MatTrait {
    fn shape(&self) -> (usize, usize);
    fn nrows(&self) -> usize { self.shape().0 }
    fn ncols(&self) -> usize { self.shape().1 }
    fn is_square(&self) -> bool {
        let (m, n) = self.shape();
        m == n
    }

    fn in_range(&self, i: usize, j: usize) -> bool {
        let (m, n) = self.shape();
        i < m && j < n
    }
}

// The capability every storage variant exposes. `get` is the raw
// in-bounds read (structural zeros included, panics out of range);
// `at` / `set` are the checked forms that carry the error taxonomy.

pub trait MatStore<R>: MatTrait + Clone + fmt::Display
where R: Real {
    fn kind(&self) -> &'static str;

    // pre: (i, j) in range
    fn get(&self, i: usize, j: usize) -> R;

    fn set(&mut self, i: usize, j: usize, value: R) -> Result<()>;

    fn swap_rows(&mut self, i: usize, j: usize) -> Result<()>;

    fn at(&self, i: usize, j: usize) -> Result<R> {
        if !self.in_range(i, j) {
            return Err(MatError::IndexOutOfRange { row: i, col: j, shape: self.shape() })
        }
        Ok(self.get(i, j))
    }

    fn to_dense(&self) -> DnsMat<R> {
        DnsMat::generate(self.shape(), |i, j| self.get(i, j))
    }

    fn read_from(&mut self, _input: &str) -> Result<()> {
        Err(MatError::UnsupportedOperation { op: "read", kind: self.kind() })
    }

    // logical comparison through the zero-aware accessor, so a dense
    // matrix that happens to be triangular in value equals the
    // triangular matrix holding the same entries.
    fn eq_mat<M>(&self, other: &M) -> bool
    where M: MatStore<R> {
        if self.shape() != other.shape() {
            return false
        }
        let (m, n) = self.shape();
        (0..m).all(|i| (0..n).all(|j|
            self.get(i, j) == other.get(i, j)
        ))
    }

    fn mul_vec(&self, rhs: &DnsVec<R>) -> Result<DnsVec<R>> {
        let (m, n) = self.shape();
        if n != rhs.dim() {
            return Err(MatError::DimensionMismatch { lhs: self.shape(), rhs: (rhs.dim(), 1) })
        }
        let entries = (0..m).map(|i|
            (0..n).fold(R::zero(), |acc, j| acc + self.get(i, j) * rhs[j])
        );
        Ok(DnsVec::from_iter(entries))
    }
}

// Solves a square system A x = b.
pub trait LinSolver<R>
where R: Real {
    fn solve<M>(&self, a: &M, b: &DnsVec<R>) -> Result<DnsVec<R>>
    where M: MatStore<R>;
}

pub(crate) fn fmt_grid<R, M>(mat: &M, f: &mut fmt::Formatter<'_>) -> fmt::Result
where R: Real, M: MatStore<R> {
    use itertools::Itertools;
    let (m, n) = mat.shape();
    for i in 0..m {
        let row = (0..n).map(|j| format!("{:>10.5}", mat.get(i, j))).join(" ");
        writeln!(f, "{row}")?;
    }
    Ok(())
}

pub(crate) fn parse_scalar<R>(token: &str) -> Result<R>
where R: Real {
    let value = token.parse::<f64>().map_err(|e|
        MatError::ParseFailure { reason: format!("bad value '{token}': {e}") }
    )?;
    R::from_f64(value).ok_or_else(||
        MatError::ParseFailure { reason: format!("value '{token}' not representable") }
    )
}
