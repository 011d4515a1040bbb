use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use auto_impl_ops::auto_ops;
use lina::Real;
use crate::base::{fmt_grid, MatStore, MatTrait};
use crate::dense::{DnsMat, DnsVec};
use crate::err::{MatError, Result};

// Square banded storage: the sub-, main and super-diagonal, nothing
// else. Cells with |row - col| > 1 read as the structural zero.

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriDiagMat<R> {
    size: usize,
    sub: Vec<R>,
    main: Vec<R>,
    sup: Vec<R>
}

impl<R> MatTrait for TriDiagMat<R> {
    fn shape(&self) -> (usize, usize) {
        (self.size, self.size)
    }
}

impl<R> TriDiagMat<R>
where R: Real {
    pub fn zero(size: usize) -> Self {
        let off = size.saturating_sub(1);
        Self {
            size,
            sub: vec![R::zero(); off],
            main: vec![R::zero(); size],
            sup: vec![R::zero(); off]
        }
    }

    pub fn from_bands(sub: Vec<R>, main: Vec<R>, sup: Vec<R>) -> Self {
        let size = main.len();
        assert_eq!(sub.len(), size.saturating_sub(1));
        assert_eq!(sup.len(), size.saturating_sub(1));
        Self { size, sub, main, sup }
    }

    pub fn from_mat<M>(other: &M) -> Self
    where M: MatStore<R> {
        assert!(other.is_square());
        let n = other.nrows();
        let mut res = Self::zero(n);
        for i in 0..n {
            res.main[i] = other.get(i, i);
            if i + 1 < n {
                res.sup[i] = other.get(i, i + 1);
                res.sub[i] = other.get(i + 1, i);
            }
        }
        res
    }

    pub fn transpose(&self) -> Self {
        Self {
            size: self.size,
            sub: self.sup.clone(),
            main: self.main.clone(),
            sup: self.sub.clone()
        }
    }
}

#[auto_ops]
impl<R> AddAssign<&TriDiagMat<R>> for TriDiagMat<R>
where R: Real {
    fn add_assign(&mut self, rhs: &Self) {
        assert_eq!(self.shape(), rhs.shape());
        let bands = [
            (&mut self.sub, &rhs.sub),
            (&mut self.main, &rhs.main),
            (&mut self.sup, &rhs.sup)
        ];
        for (lhs, rhs) in bands {
            for (a, b) in lhs.iter_mut().zip(rhs.iter()) {
                *a = *a + *b;
            }
        }
    }
}

#[auto_ops]
impl<R> SubAssign<&TriDiagMat<R>> for TriDiagMat<R>
where R: Real {
    fn sub_assign(&mut self, rhs: &Self) {
        assert_eq!(self.shape(), rhs.shape());
        let bands = [
            (&mut self.sub, &rhs.sub),
            (&mut self.main, &rhs.main),
            (&mut self.sup, &rhs.sup)
        ];
        for (lhs, rhs) in bands {
            for (a, b) in lhs.iter_mut().zip(rhs.iter()) {
                *a = *a - *b;
            }
        }
    }
}

impl<R> MulAssign<R> for TriDiagMat<R>
where R: Real {
    fn mul_assign(&mut self, scalar: R) {
        for band in [&mut self.sub, &mut self.main, &mut self.sup] {
            for a in band.iter_mut() {
                *a = *a * scalar;
            }
        }
    }
}

impl<R> Mul<R> for &TriDiagMat<R>
where R: Real {
    type Output = TriDiagMat<R>;
    fn mul(self, scalar: R) -> Self::Output {
        let mut res = self.clone();
        res *= scalar;
        res
    }
}

// The product of two tridiagonal matrices is pentadiagonal, so it
// cannot stay in this storage.
impl<'a, 'b, R> Mul<&'b TriDiagMat<R>> for &'a TriDiagMat<R>
where R: Real {
    type Output = DnsMat<R>;
    fn mul(self, rhs: &'b TriDiagMat<R>) -> Self::Output {
        assert_eq!(self.ncols(), rhs.nrows());
        let n = self.size;
        DnsMat::generate((n, n), |i, j| {
            let lo = i.saturating_sub(1).max(j.saturating_sub(1));
            let hi = (i + 1).min(j + 1).min(n - 1);
            (lo..=hi).fold(R::zero(), |acc, k|
                acc + self.get(i, k) * rhs.get(k, j)
            )
        })
    }
}

impl<R> Neg for &TriDiagMat<R>
where R: Real {
    type Output = TriDiagMat<R>;
    fn neg(self) -> Self::Output {
        let mut res = self.clone();
        for band in [&mut res.sub, &mut res.main, &mut res.sup] {
            for a in band.iter_mut() {
                *a = -*a;
            }
        }
        res
    }
}

impl<R> Neg for TriDiagMat<R>
where R: Real {
    type Output = TriDiagMat<R>;
    fn neg(self) -> Self::Output {
        -&self
    }
}

impl<R> MatStore<R> for TriDiagMat<R>
where R: Real {
    fn kind(&self) -> &'static str {
        "tridiagonal"
    }

    fn get(&self, i: usize, j: usize) -> R {
        assert!(self.in_range(i, j));
        if i == j {
            self.main[i]
        } else if j + 1 == i {
            self.sub[j]
        } else if j == i + 1 {
            self.sup[i]
        } else {
            R::zero()
        }
    }

    fn set(&mut self, i: usize, j: usize, value: R) -> Result<()> {
        if !self.in_range(i, j) {
            return Err(MatError::IndexOutOfRange { row: i, col: j, shape: self.shape() })
        }
        if i == j {
            self.main[i] = value;
        } else if j + 1 == i {
            self.sub[j] = value;
        } else if j == i + 1 {
            self.sup[i] = value;
        } else {
            return Err(MatError::StructuralViolation { row: i, col: j, kind: self.kind() })
        }
        Ok(())
    }

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
        let n = self.size;
        if n != rhs.dim() {
            return Err(MatError::DimensionMismatch { lhs: self.shape(), rhs: (rhs.dim(), 1) })
        }
        let entries = (0..n).map(|i| {
            let mut acc = self.main[i] * rhs[i];
            if i > 0 {
                acc = acc + self.sub[i - 1] * rhs[i - 1];
            }
            if i + 1 < n {
                acc = acc + self.sup[i] * rhs[i + 1];
            }
            acc
        });
        Ok(entries.collect())
    }
}

impl<R> Display for TriDiagMat<R>
where R: Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_grid(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TriDiagMat<f64> {
        TriDiagMat::from_bands(
            vec![5.0, 4.0, 5.0],
            vec![2.0, 4.0, 3.0, 2.0],
            vec![3.0, 5.0, 1.0]
        )
    }

    #[test]
    fn init() {
        let t = sample();
        assert_eq!(t.shape(), (4, 4));
        assert_eq!(t.get(0, 0), 2.0);
        assert_eq!(t.get(1, 0), 5.0);
        assert_eq!(t.get(0, 1), 3.0);
        assert_eq!(t.get(0, 2), 0.0);
    }

    #[test]
    fn structural_write() {
        let mut t = sample();
        assert!(t.set(2, 1, 9.0).is_ok());
        assert_eq!(
            t.set(0, 2, 1.0),
            Err(MatError::StructuralViolation { row: 0, col: 2, kind: "tridiagonal" })
        );
        assert_eq!(
            t.set(3, 0, 1.0),
            Err(MatError::StructuralViolation { row: 3, col: 0, kind: "tridiagonal" })
        );
    }

    #[test]
    fn add_stays_tridiagonal() {
        let t = sample();
        let sum = &t + &t;
        assert_eq!(sum.get(1, 0), 10.0);
        assert_eq!(sum.get(0, 2), 0.0);
    }

    #[test]
    fn mul_promotes_to_dense() {
        let a = sample();
        let b = TriDiagMat::from_bands(
            vec![3.0, 4.0, 9.0],
            vec![1.0, 8.0, 2.0, 1.0],
            vec![2.0, 4.0, 8.0]
        );
        let prod = &a * &b;
        assert!(prod.eq_mat(&(&a.to_dense() * &b.to_dense())));
        // the product grows a second band off the diagonal
        assert_eq!(prod[(0, 2)], 12.0);
    }

    #[test]
    fn mul_vec() {
        let t = sample();
        let v = DnsVec::from(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.mul_vec(&v).unwrap(), (&t.to_dense() * &v));
    }

    #[test]
    fn transpose_swaps_bands() {
        let t = sample();
        let tt = t.transpose();
        assert_eq!(tt.get(0, 1), 5.0);
        assert_eq!(tt.get(1, 0), 3.0);
        assert!(tt.transpose().eq_mat(&t));
    }

    #[test]
    fn swap_rows_rejected() {
        let mut t = sample();
        assert!(matches!(t.swap_rows(0, 1), Err(MatError::StructuralViolation { .. })));
    }
}
