use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use auto_impl_ops::auto_ops;
use lina::Real;
use crate::base::{fmt_grid, MatStore, MatTrait};
use crate::dense::DnsVec;
use crate::err::{MatError, Result};

// Stores the main diagonal only; everything else reads as the
// structural zero and rejects writes.

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagMat<R> {
    shape: (usize, usize),
    diag: Vec<R>
}

impl<R> MatTrait for DiagMat<R> {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }
}

impl<R> DiagMat<R>
where R: Real {
    pub fn zero(shape: (usize, usize)) -> Self {
        let len = shape.0.min(shape.1);
        Self { shape, diag: vec![R::zero(); len] }
    }

    pub fn from_entries<I>(shape: (usize, usize), entries: I) -> Self
    where I: IntoIterator<Item = R> {
        let diag = entries.into_iter().collect::<Vec<_>>();
        assert_eq!(diag.len(), shape.0.min(shape.1));
        Self { shape, diag }
    }

    pub fn id(size: usize) -> Self {
        Self::from_entries((size, size), vec![R::one(); size])
    }

    // narrowing copy: everything off the diagonal is dropped
    pub fn from_mat<M>(other: &M) -> Self
    where M: MatStore<R> {
        let shape = other.shape();
        let entries = (0..shape.0.min(shape.1)).map(|i| other.get(i, i));
        Self::from_entries(shape, entries)
    }

    pub fn diag(&self) -> &[R] {
        &self.diag
    }

    pub fn transpose(&self) -> Self {
        let (m, n) = self.shape;
        Self { shape: (n, m), diag: self.diag.clone() }
    }
}

#[auto_ops]
impl<R> AddAssign<&DiagMat<R>> for DiagMat<R>
where R: Real {
    fn add_assign(&mut self, rhs: &Self) {
        assert_eq!(self.shape(), rhs.shape());
        for (a, b) in self.diag.iter_mut().zip(rhs.diag.iter()) {
            *a = *a + *b;
        }
    }
}

#[auto_ops]
impl<R> SubAssign<&DiagMat<R>> for DiagMat<R>
where R: Real {
    fn sub_assign(&mut self, rhs: &Self) {
        assert_eq!(self.shape(), rhs.shape());
        for (a, b) in self.diag.iter_mut().zip(rhs.diag.iter()) {
            *a = *a - *b;
        }
    }
}

impl<R> MulAssign<R> for DiagMat<R>
where R: Real {
    fn mul_assign(&mut self, scalar: R) {
        for a in self.diag.iter_mut() {
            *a = *a * scalar;
        }
    }
}

impl<R> Mul<R> for &DiagMat<R>
where R: Real {
    type Output = DiagMat<R>;
    fn mul(self, scalar: R) -> Self::Output {
        let mut res = self.clone();
        res *= scalar;
        res
    }
}

// Diagonal times diagonal stays diagonal.
#[auto_ops]
impl<'a, 'b, R> Mul<&'b DiagMat<R>> for &'a DiagMat<R>
where R: Real {
    type Output = DiagMat<R>;
    fn mul(self, rhs: &'b DiagMat<R>) -> Self::Output {
        assert_eq!(self.ncols(), rhs.nrows());
        let shape = (self.nrows(), rhs.ncols());
        let entries = (0..shape.0.min(shape.1)).map(|i|
            if i < self.diag.len() && i < rhs.diag.len() {
                self.diag[i] * rhs.diag[i]
            } else {
                R::zero()
            }
        );
        DiagMat::from_entries(shape, entries)
    }
}

impl<R> Neg for &DiagMat<R>
where R: Real {
    type Output = DiagMat<R>;
    fn neg(self) -> Self::Output {
        let diag = self.diag.iter().map(|a| -*a).collect();
        DiagMat { shape: self.shape, diag }
    }
}

impl<R> Neg for DiagMat<R>
where R: Real {
    type Output = DiagMat<R>;
    fn neg(self) -> Self::Output {
        -&self
    }
}

impl<R> MatStore<R> for DiagMat<R>
where R: Real {
    fn kind(&self) -> &'static str {
        "diagonal"
    }

    fn get(&self, i: usize, j: usize) -> R {
        assert!(self.in_range(i, j));
        if i == j { self.diag[i] } else { R::zero() }
    }

    fn set(&mut self, i: usize, j: usize, value: R) -> Result<()> {
        if !self.in_range(i, j) {
            return Err(MatError::IndexOutOfRange { row: i, col: j, shape: self.shape() })
        }
        if i != j {
            return Err(MatError::StructuralViolation { row: i, col: j, kind: self.kind() })
        }
        self.diag[i] = value;
        Ok(())
    }

    // A genuine row swap is not representable here; rejecting beats the
    // silent data loss of zeroing both entries.
    fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        if !self.in_range(i, 0) || !self.in_range(j, 0) {
            return Err(MatError::IndexOutOfRange { row: i.max(j), col: 0, shape: self.shape() })
        }
        if i == j {
            return Ok(())
        }
        Err(MatError::StructuralViolation { row: i, col: j, kind: self.kind() })
    }

    fn mul_vec(&self, rhs: &DnsVec<R>) -> Result<DnsVec<R>> {
        let (m, n) = self.shape();
        if n != rhs.dim() {
            return Err(MatError::DimensionMismatch { lhs: self.shape(), rhs: (rhs.dim(), 1) })
        }
        let entries = (0..m).map(|i|
            if i < self.diag.len() { self.diag[i] * rhs[i] } else { R::zero() }
        );
        Ok(entries.collect())
    }
}

impl<R> Display for DiagMat<R>
where R: Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_grid(self, f)
    }
}
