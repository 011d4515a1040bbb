use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};
use auto_impl_ops::auto_ops;
use lina::Real;
use crate::base::{fmt_grid, MatStore, MatTrait};
use crate::err::{MatError, Result};
use super::vec::DnsVec;

// General rows x cols storage: a single row-major buffer.

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DnsMat<R> {
    shape: (usize, usize),
    data: Vec<R>
}

impl<R> MatTrait for DnsMat<R> {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }
}

impl<R> DnsMat<R>
where R: Real {
    pub fn zero(shape: (usize, usize)) -> Self {
        Self { shape, data: vec![R::zero(); shape.0 * shape.1] }
    }

    pub fn from_data<I>(shape: (usize, usize), data: I) -> Self
    where I: IntoIterator<Item = R> {
        let data = data.into_iter().collect::<Vec<_>>();
        assert_eq!(data.len(), shape.0 * shape.1);
        Self { shape, data }
    }

    pub fn generate<F>(shape: (usize, usize), mut f: F) -> Self
    where F: FnMut(usize, usize) -> R {
        let (m, n) = shape;
        let data = (0..m * n).map(|k| f(k / n, k % n)).collect();
        Self { shape, data }
    }

    pub fn id(size: usize) -> Self {
        Self::generate((size, size), |i, j|
            if i == j { R::one() } else { R::zero() }
        )
    }

    pub fn from_mat<M>(other: &M) -> Self
    where M: MatStore<R> {
        other.to_dense()
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|a| a.is_zero())
    }

    pub fn row(&self, i: usize) -> &[R] {
        let n = self.ncols();
        &self.data[i * n .. (i + 1) * n]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [R] {
        let n = self.ncols();
        &mut self.data[i * n .. (i + 1) * n]
    }

    pub fn col_vec(&self, j: usize) -> DnsVec<R> {
        assert!(j < self.ncols());
        (0..self.nrows()).map(|i| self[(i, j)]).collect()
    }

    pub fn set_col(&mut self, j: usize, col: &DnsVec<R>) {
        assert!(j < self.ncols());
        assert_eq!(col.dim(), self.nrows());
        for i in 0..self.nrows() {
            self[(i, j)] = col[i];
        }
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) {
        let n = self.ncols();
        for k in 0..n {
            self.data.swap(i * n + k, j * n + k);
        }
    }

    pub fn transpose(&self) -> Self {
        let (m, n) = self.shape;
        Self::generate((n, m), |i, j| self[(j, i)])
    }

    pub fn diag(&self) -> Vec<R> {
        let (m, n) = self.shape;
        (0..m.min(n)).map(|i| self[(i, i)]).collect()
    }
}

impl<R> Index<(usize, usize)> for DnsMat<R> {
    type Output = R;
    fn index(&self, (i, j): (usize, usize)) -> &R {
        assert!(j < self.shape.1);
        &self.data[i * self.shape.1 + j]
    }
}

impl<R> IndexMut<(usize, usize)> for DnsMat<R> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut R {
        assert!(j < self.shape.1);
        &mut self.data[i * self.shape.1 + j]
    }
}

#[auto_ops]
impl<R> AddAssign<&DnsMat<R>> for DnsMat<R>
where R: Real {
    fn add_assign(&mut self, rhs: &Self) {
        assert_eq!(self.shape(), rhs.shape());
        for (a, b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a + *b;
        }
    }
}

#[auto_ops]
impl<R> SubAssign<&DnsMat<R>> for DnsMat<R>
where R: Real {
    fn sub_assign(&mut self, rhs: &Self) {
        assert_eq!(self.shape(), rhs.shape());
        for (a, b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a - *b;
        }
    }
}

impl<R> MulAssign<R> for DnsMat<R>
where R: Real {
    fn mul_assign(&mut self, scalar: R) {
        for a in self.data.iter_mut() {
            *a = *a * scalar;
        }
    }
}

impl<R> Mul<R> for &DnsMat<R>
where R: Real {
    type Output = DnsMat<R>;
    fn mul(self, scalar: R) -> Self::Output {
        let mut res = self.clone();
        res *= scalar;
        res
    }
}

impl<R> Mul<R> for DnsMat<R>
where R: Real {
    type Output = DnsMat<R>;
    fn mul(mut self, scalar: R) -> Self::Output {
        self *= scalar;
        self
    }
}

#[auto_ops]
impl<'a, 'b, R> Mul<&'b DnsMat<R>> for &'a DnsMat<R>
where R: Real {
    type Output = DnsMat<R>;
    fn mul(self, rhs: &'b DnsMat<R>) -> Self::Output {
        assert_eq!(self.ncols(), rhs.nrows());
        let l = self.ncols();
        DnsMat::generate((self.nrows(), rhs.ncols()), |i, j|
            (0..l).fold(R::zero(), |acc, k| acc + self[(i, k)] * rhs[(k, j)])
        )
    }
}

impl<R> Mul<&DnsVec<R>> for &DnsMat<R>
where R: Real {
    type Output = DnsVec<R>;
    fn mul(self, rhs: &DnsVec<R>) -> Self::Output {
        assert_eq!(self.ncols(), rhs.dim());
        (0..self.nrows()).map(|i|
            self.row(i).iter().zip(rhs.iter())
                .fold(R::zero(), |acc, (a, b)| acc + *a * *b)
        ).collect()
    }
}

impl<R> Neg for &DnsMat<R>
where R: Real {
    type Output = DnsMat<R>;
    fn neg(self) -> Self::Output {
        let data = self.data.iter().map(|a| -*a).collect();
        DnsMat { shape: self.shape, data }
    }
}

impl<R> Neg for DnsMat<R>
where R: Real {
    type Output = DnsMat<R>;
    fn neg(self) -> Self::Output {
        -&self
    }
}

impl<R> MatStore<R> for DnsMat<R>
where R: Real {
    fn kind(&self) -> &'static str {
        "dense"
    }

    fn get(&self, i: usize, j: usize) -> R {
        self[(i, j)]
    }

    fn set(&mut self, i: usize, j: usize, value: R) -> Result<()> {
        if !self.in_range(i, j) {
            return Err(MatError::IndexOutOfRange { row: i, col: j, shape: self.shape() })
        }
        self[(i, j)] = value;
        Ok(())
    }

    fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        if !self.in_range(i, 0) || !self.in_range(j, 0) {
            return Err(MatError::IndexOutOfRange { row: i.max(j), col: 0, shape: self.shape() })
        }
        DnsMat::swap_rows(self, i, j);
        Ok(())
    }

    fn to_dense(&self) -> DnsMat<R> {
        self.clone()
    }

    // one row per line, whitespace-separated values
    fn read_from(&mut self, input: &str) -> Result<()> {
        let (m, n) = self.shape();
        let mut lines = input.lines();
        for i in 0..m {
            let Some(line) = lines.next() else {
                return Err(MatError::ParseFailure {
                    reason: format!("expected {m} rows, got {i}")
                })
            };
            let row = DnsVec::parse(n, line)?;
            self.row_mut(i).copy_from_slice(row.as_slice());
        }
        Ok(())
    }
}

impl<R> Display for DnsMat<R>
where R: Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_grid(self, f)
    }
}
