use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};
use auto_impl_ops::auto_ops;
use lina::Real;
use crate::base::{fmt_grid, MatStore, MatTrait};
use crate::dense::DnsVec;
use crate::err::{MatError, Result};

// One triangular half in a single buffer with a precomputed row-offset
// table. Row i of the upper form stores the `ncols - i` entries at and
// right of the diagonal; the lower form stores the `i + 1` entries at
// and left of it. Transposing flips one form into the other.

fn offsets<F>(nrows: usize, row_len: F) -> (Vec<usize>, usize)
where F: Fn(usize) -> usize {
    let mut offsets = Vec::with_capacity(nrows + 1);
    let mut total = 0;
    for i in 0..=nrows {
        offsets.push(total);
        if i < nrows {
            total += row_len(i);
        }
    }
    (offsets, total)
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpTriMat<R> {
    shape: (usize, usize),
    data: Vec<R>,
    offsets: Vec<usize>
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoTriMat<R> {
    shape: (usize, usize),
    data: Vec<R>,
    offsets: Vec<usize>
}

impl<R> MatTrait for UpTriMat<R> {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }
}

impl<R> MatTrait for LoTriMat<R> {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }
}

impl<R> UpTriMat<R>
where R: Real {
    pub fn zero(shape: (usize, usize)) -> Self {
        let (m, n) = shape;
        let (offsets, total) = offsets(m, |i| n.saturating_sub(i));
        Self { shape, data: vec![R::zero(); total], offsets }
    }

    pub fn from_mat<M>(other: &M) -> Self
    where M: MatStore<R> {
        let (m, n) = other.shape();
        let mut res = Self::zero((m, n));
        for i in 0..m {
            for j in i..n {
                res[(i, j)] = other.get(i, j);
            }
        }
        res
    }

    fn stores(&self, i: usize, j: usize) -> bool {
        self.in_range(i, j) && i <= j
    }

    pub fn transpose(&self) -> LoTriMat<R> {
        let (m, n) = self.shape;
        let mut res = LoTriMat::zero((n, m));
        for i in 0..m {
            for j in i..n {
                res[(j, i)] = self[(i, j)];
            }
        }
        res
    }
}

impl<R> LoTriMat<R>
where R: Real {
    pub fn zero(shape: (usize, usize)) -> Self {
        let (m, n) = shape;
        let (offsets, total) = offsets(m, |i| (i + 1).min(n));
        Self { shape, data: vec![R::zero(); total], offsets }
    }

    pub fn from_mat<M>(other: &M) -> Self
    where M: MatStore<R> {
        let (m, n) = other.shape();
        let mut res = Self::zero((m, n));
        for i in 0..m {
            for j in 0..(i + 1).min(n) {
                res[(i, j)] = other.get(i, j);
            }
        }
        res
    }

    fn stores(&self, i: usize, j: usize) -> bool {
        self.in_range(i, j) && j <= i
    }

    pub fn transpose(&self) -> UpTriMat<R> {
        let (m, n) = self.shape;
        let mut res = UpTriMat::zero((n, m));
        for i in 0..m {
            for j in 0..(i + 1).min(n) {
                res[(j, i)] = self[(i, j)];
            }
        }
        res
    }
}

impl<R> Index<(usize, usize)> for UpTriMat<R> {
    type Output = R;
    fn index(&self, (i, j): (usize, usize)) -> &R {
        assert!(i <= j && j < self.shape.1);
        &self.data[self.offsets[i] + (j - i)]
    }
}

impl<R> IndexMut<(usize, usize)> for UpTriMat<R> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut R {
        assert!(i <= j && j < self.shape.1);
        &mut self.data[self.offsets[i] + (j - i)]
    }
}

impl<R> Index<(usize, usize)> for LoTriMat<R> {
    type Output = R;
    fn index(&self, (i, j): (usize, usize)) -> &R {
        assert!(j <= i && j < self.shape.1);
        &self.data[self.offsets[i] + j]
    }
}

impl<R> IndexMut<(usize, usize)> for LoTriMat<R> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut R {
        assert!(j <= i && j < self.shape.1);
        &mut self.data[self.offsets[i] + j]
    }
}

macro_rules! impl_tri_ops {
    ($t:ident) => {
        #[auto_ops]
        impl<R> AddAssign<&$t<R>> for $t<R>
        where R: Real {
            fn add_assign(&mut self, rhs: &Self) {
                assert_eq!(self.shape(), rhs.shape());
                for (a, b) in self.data.iter_mut().zip(rhs.data.iter()) {
                    *a = *a + *b;
                }
            }
        }

        #[auto_ops]
        impl<R> SubAssign<&$t<R>> for $t<R>
        where R: Real {
            fn sub_assign(&mut self, rhs: &Self) {
                assert_eq!(self.shape(), rhs.shape());
                for (a, b) in self.data.iter_mut().zip(rhs.data.iter()) {
                    *a = *a - *b;
                }
            }
        }

        impl<R> MulAssign<R> for $t<R>
        where R: Real {
            fn mul_assign(&mut self, scalar: R) {
                for a in self.data.iter_mut() {
                    *a = *a * scalar;
                }
            }
        }

        impl<R> Mul<R> for &$t<R>
        where R: Real {
            type Output = $t<R>;
            fn mul(self, scalar: R) -> Self::Output {
                let mut res = self.clone();
                res *= scalar;
                res
            }
        }

        impl<R> Neg for &$t<R>
        where R: Real {
            type Output = $t<R>;
            fn neg(self) -> Self::Output {
                let mut res = self.clone();
                for a in res.data.iter_mut() {
                    *a = -*a;
                }
                res
            }
        }

        impl<R> Neg for $t<R>
        where R: Real {
            type Output = $t<R>;
            fn neg(self) -> Self::Output {
                -&self
            }
        }

        impl<R> Display for $t<R>
        where R: Real {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_grid(self, f)
            }
        }
    }
}

impl_tri_ops!(UpTriMat);
impl_tri_ops!(LoTriMat);

// The product of two upper (resp. lower) triangular matrices is again
// upper (resp. lower) triangular.
#[auto_ops]
impl<'a, 'b, R> Mul<&'b UpTriMat<R>> for &'a UpTriMat<R>
where R: Real {
    type Output = UpTriMat<R>;
    fn mul(self, rhs: &'b UpTriMat<R>) -> Self::Output {
        assert_eq!(self.ncols(), rhs.nrows());
        let (m, p) = (self.nrows(), rhs.ncols());
        let mut res = UpTriMat::zero((m, p));
        for i in 0..m {
            for j in i..p {
                let hi = j.min(self.ncols().saturating_sub(1));
                res[(i, j)] = (i..=hi).fold(R::zero(), |acc, k|
                    acc + self.get(i, k) * rhs.get(k, j)
                );
            }
        }
        res
    }
}

#[auto_ops]
impl<'a, 'b, R> Mul<&'b LoTriMat<R>> for &'a LoTriMat<R>
where R: Real {
    type Output = LoTriMat<R>;
    fn mul(self, rhs: &'b LoTriMat<R>) -> Self::Output {
        assert_eq!(self.ncols(), rhs.nrows());
        let (m, p) = (self.nrows(), rhs.ncols());
        let mut res = LoTriMat::zero((m, p));
        for i in 0..m {
            for j in 0..(i + 1).min(p) {
                let hi = i.min(self.ncols().saturating_sub(1));
                res[(i, j)] = (j..=hi).fold(R::zero(), |acc, k|
                    acc + self.get(i, k) * rhs.get(k, j)
                );
            }
        }
        res
    }
}

impl<R> MatStore<R> for UpTriMat<R>
where R: Real {
    fn kind(&self) -> &'static str {
        "upper-triangular"
    }

    fn get(&self, i: usize, j: usize) -> R {
        assert!(self.in_range(i, j));
        if i <= j { self[(i, j)] } else { R::zero() }
    }

    fn set(&mut self, i: usize, j: usize, value: R) -> Result<()> {
        if !self.in_range(i, j) {
            return Err(MatError::IndexOutOfRange { row: i, col: j, shape: self.shape() })
        }
        if !self.stores(i, j) {
            return Err(MatError::StructuralViolation { row: i, col: j, kind: self.kind() })
        }
        self[(i, j)] = value;
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
        let (m, n) = self.shape();
        if n != rhs.dim() {
            return Err(MatError::DimensionMismatch { lhs: self.shape(), rhs: (rhs.dim(), 1) })
        }
        let entries = (0..m).map(|i|
            (i..n).fold(R::zero(), |acc, j| acc + self[(i, j)] * rhs[j])
        );
        Ok(entries.collect())
    }
}

impl<R> MatStore<R> for LoTriMat<R>
where R: Real {
    fn kind(&self) -> &'static str {
        "lower-triangular"
    }

    fn get(&self, i: usize, j: usize) -> R {
        assert!(self.in_range(i, j));
        if j <= i { self[(i, j)] } else { R::zero() }
    }

    fn set(&mut self, i: usize, j: usize, value: R) -> Result<()> {
        if !self.in_range(i, j) {
            return Err(MatError::IndexOutOfRange { row: i, col: j, shape: self.shape() })
        }
        if !self.stores(i, j) {
            return Err(MatError::StructuralViolation { row: i, col: j, kind: self.kind() })
        }
        self[(i, j)] = value;
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
        let (m, n) = self.shape();
        if n != rhs.dim() {
            return Err(MatError::DimensionMismatch { lhs: self.shape(), rhs: (rhs.dim(), 1) })
        }
        let entries = (0..m).map(|i|
            (0..(i + 1).min(n)).fold(R::zero(), |acc, j|
                acc + self[(i, j)] * rhs[j]
            )
        );
        Ok(entries.collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DnsMat;

    fn up3() -> UpTriMat<f64> {
        let mut u = UpTriMat::zero((3, 3));
        u[(0, 0)] = 1.0; u[(0, 1)] = 2.0; u[(0, 2)] = 3.0;
        u[(1, 1)] = 4.0; u[(1, 2)] = 5.0;
        u[(2, 2)] = 6.0;
        u
    }

    fn lo3() -> LoTriMat<f64> {
        let mut l = LoTriMat::zero((3, 3));
        l[(0, 0)] = 1.0;
        l[(1, 0)] = 2.0; l[(1, 1)] = 3.0;
        l[(2, 0)] = 4.0; l[(2, 1)] = 5.0; l[(2, 2)] = 6.0;
        l
    }

    #[test]
    fn structural_zero_reads() {
        let u = up3();
        assert_eq!(u.get(2, 0), 0.0);
        assert_eq!(u.get(0, 2), 3.0);

        let l = lo3();
        assert_eq!(l.get(0, 2), 0.0);
        assert_eq!(l.get(2, 0), 4.0);
    }

    #[test]
    fn structural_write() {
        let mut u = up3();
        assert_eq!(
            u.set(1, 0, 9.0),
            Err(MatError::StructuralViolation { row: 1, col: 0, kind: "upper-triangular" })
        );
        assert!(u.set(0, 1, 9.0).is_ok());

        let mut l = lo3();
        assert!(l.set(1, 2, 9.0).is_err());
        assert!(l.set(2, 1, 9.0).is_ok());
    }

    #[test]
    fn out_of_range() {
        let u = up3();
        assert!(matches!(u.at(0, 3), Err(MatError::IndexOutOfRange { .. })));
        assert_eq!(u.at(2, 2), Ok(6.0));
    }

    #[test]
    fn add_stays_triangular() {
        let u = up3();
        let sum = &u + &u;
        assert_eq!(sum.get(0, 1), 4.0);
        assert_eq!(sum.get(1, 0), 0.0);
    }

    #[test]
    fn add_roundtrip() {
        let a = up3();
        let b = {
            let mut b = UpTriMat::zero((3, 3));
            b[(0, 2)] = 7.0;
            b[(1, 1)] = -2.5;
            b
        };
        assert_eq!((&a + &b) - &b, a);
    }

    #[test]
    fn mul_stays_triangular() {
        let u = up3();
        let prod = &u * &u;
        // (0, 1): 1*2 + 2*4
        assert_eq!(prod.get(0, 1), 10.0);
        assert_eq!(prod.get(1, 0), 0.0);
        assert!(prod.to_dense().eq_mat(&(&u.to_dense() * &u.to_dense())));

        let l = lo3();
        let prod = &l * &l;
        assert!(prod.to_dense().eq_mat(&(&l.to_dense() * &l.to_dense())));
    }

    #[test]
    fn transpose_flips_type() {
        let u = up3();
        let l: LoTriMat<f64> = u.transpose();
        assert_eq!(l.get(2, 0), 3.0);
        assert_eq!(l.get(0, 2), 0.0);

        // involution across the pair
        let u2: UpTriMat<f64> = l.transpose();
        assert_eq!(u2, u);
    }

    #[test]
    fn from_mat_drops_other_half() {
        let a = DnsMat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);
        let u = UpTriMat::from_mat(&a);
        assert_eq!(u.get(0, 1), 2.0);
        assert_eq!(u.get(1, 0), 0.0);

        let l = LoTriMat::from_mat(&a);
        assert_eq!(l.get(1, 0), 3.0);
        assert_eq!(l.get(0, 1), 0.0);
    }

    #[test]
    fn eq_across_variants() {
        let u = up3();
        let d = DnsMat::from_data((3, 3), [
            1.0, 2.0, 3.0,
            0.0, 4.0, 5.0,
            0.0, 0.0, 6.0
        ]);
        assert!(u.eq_mat(&d));
        assert!(d.eq_mat(&u));
    }

    #[test]
    fn mul_vec() {
        let u = up3();
        let v = DnsVec::from(vec![1.0, 1.0, 1.0]);
        assert_eq!(u.mul_vec(&v).unwrap(), DnsVec::from(vec![6.0, 9.0, 6.0]));

        let l = lo3();
        assert_eq!(l.mul_vec(&v).unwrap(), DnsVec::from(vec![1.0, 5.0, 15.0]));
    }

    #[test]
    fn swap_rows_rejected() {
        let mut u = up3();
        assert!(matches!(u.swap_rows(0, 1), Err(MatError::StructuralViolation { .. })));
    }

    #[test]
    fn read_rejected() {
        let mut u: UpTriMat<f64> = UpTriMat::zero((2, 2));
        assert!(matches!(
            u.read_from("1 2\n0 3\n"),
            Err(MatError::UnsupportedOperation { .. })
        ));
    }
}
