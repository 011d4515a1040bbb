use std::fmt::{self, Display};
use std::ops::{Add, Mul, MulAssign, Neg, Sub};
use lina::Real;
use crate::base::{MatStore, MatTrait};
use crate::dense::{DnsMat, DnsVec};
use crate::err::{MatError, Result};
use crate::structured::{DiagMat, LoTriMat, TriDiagMat, UpTriMat};

// Owned tagged union over the storage variants. Binary operations
// keep the result structured when both operands share a variant that
// is closed under the operation, and promote to dense otherwise.

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnyMat<R> {
    Dense(DnsMat<R>),
    Diag(DiagMat<R>),
    TriDiag(TriDiagMat<R>),
    Up(UpTriMat<R>),
    Lo(LoTriMat<R>),
}

macro_rules! dispatch {
    ($any:expr, $m:ident => $body:expr) => {
        match $any {
            AnyMat::Dense($m)   => $body,
            AnyMat::Diag($m)    => $body,
            AnyMat::TriDiag($m) => $body,
            AnyMat::Up($m)      => $body,
            AnyMat::Lo($m)      => $body,
        }
    }
}

impl<R> From<DnsMat<R>> for AnyMat<R> {
    fn from(m: DnsMat<R>) -> Self { Self::Dense(m) }
}

impl<R> From<DiagMat<R>> for AnyMat<R> {
    fn from(m: DiagMat<R>) -> Self { Self::Diag(m) }
}

impl<R> From<TriDiagMat<R>> for AnyMat<R> {
    fn from(m: TriDiagMat<R>) -> Self { Self::TriDiag(m) }
}

impl<R> From<UpTriMat<R>> for AnyMat<R> {
    fn from(m: UpTriMat<R>) -> Self { Self::Up(m) }
}

impl<R> From<LoTriMat<R>> for AnyMat<R> {
    fn from(m: LoTriMat<R>) -> Self { Self::Lo(m) }
}

impl<R> MatTrait for AnyMat<R> {
    fn shape(&self) -> (usize, usize) {
        dispatch!(self, m => m.shape())
    }
}

impl<R> AnyMat<R>
where R: Real {
    pub fn checked_add(&self, rhs: &Self) -> Result<Self> {
        if self.shape() != rhs.shape() {
            return Err(MatError::DimensionMismatch { lhs: self.shape(), rhs: rhs.shape() })
        }
        Ok(self.add_impl(rhs))
    }

    pub fn checked_sub(&self, rhs: &Self) -> Result<Self> {
        if self.shape() != rhs.shape() {
            return Err(MatError::DimensionMismatch { lhs: self.shape(), rhs: rhs.shape() })
        }
        Ok(self.sub_impl(rhs))
    }

    pub fn checked_mul(&self, rhs: &Self) -> Result<Self> {
        if self.ncols() != rhs.nrows() {
            return Err(MatError::DimensionMismatch { lhs: self.shape(), rhs: rhs.shape() })
        }
        Ok(self.mul_impl(rhs))
    }

    // pre: shapes match
    fn add_impl(&self, rhs: &Self) -> Self {
        use AnyMat::*;
        match (self, rhs) {
            (Dense(a),   Dense(b))   => (a + b).into(),
            (Diag(a),    Diag(b))    => (a + b).into(),
            (TriDiag(a), TriDiag(b)) => (a + b).into(),
            (Up(a),      Up(b))      => (a + b).into(),
            (Lo(a),      Lo(b))      => (a + b).into(),
            _ => (self.to_dense() + rhs.to_dense()).into(),
        }
    }

    // pre: shapes match
    fn sub_impl(&self, rhs: &Self) -> Self {
        use AnyMat::*;
        match (self, rhs) {
            (Dense(a),   Dense(b))   => (a - b).into(),
            (Diag(a),    Diag(b))    => (a - b).into(),
            (TriDiag(a), TriDiag(b)) => (a - b).into(),
            (Up(a),      Up(b))      => (a - b).into(),
            (Lo(a),      Lo(b))      => (a - b).into(),
            _ => (self.to_dense() - rhs.to_dense()).into(),
        }
    }

    // pre: inner dimensions match
    fn mul_impl(&self, rhs: &Self) -> Self {
        use AnyMat::*;
        match (self, rhs) {
            (Diag(a), Diag(b)) => (a * b).into(),
            (Up(a),   Up(b))   => (a * b).into(),
            (Lo(a),   Lo(b))   => (a * b).into(),
            _ => (&self.to_dense() * &rhs.to_dense()).into(),
        }
    }

    pub fn transpose(&self) -> Self {
        use AnyMat::*;
        match self {
            Dense(a)   => a.transpose().into(),
            Diag(a)    => a.transpose().into(),
            TriDiag(a) => a.transpose().into(),
            Up(a)      => a.transpose().into(),
            Lo(a)      => a.transpose().into(),
        }
    }
}

impl<R> Add for &AnyMat<R>
where R: Real {
    type Output = AnyMat<R>;
    fn add(self, rhs: Self) -> Self::Output {
        assert_eq!(self.shape(), rhs.shape());
        self.add_impl(rhs)
    }
}

impl<R> Sub for &AnyMat<R>
where R: Real {
    type Output = AnyMat<R>;
    fn sub(self, rhs: Self) -> Self::Output {
        assert_eq!(self.shape(), rhs.shape());
        self.sub_impl(rhs)
    }
}

impl<R> Mul for &AnyMat<R>
where R: Real {
    type Output = AnyMat<R>;
    fn mul(self, rhs: Self) -> Self::Output {
        assert_eq!(self.ncols(), rhs.nrows());
        self.mul_impl(rhs)
    }
}

impl<R> MulAssign<R> for AnyMat<R>
where R: Real {
    fn mul_assign(&mut self, scalar: R) {
        dispatch!(self, m => *m *= scalar)
    }
}

impl<R> Neg for &AnyMat<R>
where R: Real {
    type Output = AnyMat<R>;
    fn neg(self) -> Self::Output {
        dispatch!(self, m => (-m).into())
    }
}

impl<R> Neg for AnyMat<R>
where R: Real {
    type Output = AnyMat<R>;
    fn neg(self) -> Self::Output {
        -&self
    }
}

impl<R> MatStore<R> for AnyMat<R>
where R: Real {
    fn kind(&self) -> &'static str {
        dispatch!(self, m => m.kind())
    }

    fn get(&self, i: usize, j: usize) -> R {
        dispatch!(self, m => m.get(i, j))
    }

    fn set(&mut self, i: usize, j: usize, value: R) -> Result<()> {
        dispatch!(self, m => m.set(i, j, value))
    }

    fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        dispatch!(self, m => MatStore::swap_rows(m, i, j))
    }

    fn to_dense(&self) -> DnsMat<R> {
        dispatch!(self, m => m.to_dense())
    }

    fn read_from(&mut self, input: &str) -> Result<()> {
        dispatch!(self, m => m.read_from(input))
    }

    fn mul_vec(&self, rhs: &DnsVec<R>) -> Result<DnsVec<R>> {
        dispatch!(self, m => m.mul_vec(rhs))
    }
}

// logical equality across variants
impl<R> PartialEq for AnyMat<R>
where R: Real {
    fn eq(&self, other: &Self) -> bool {
        self.eq_mat(other)
    }
}

impl<R> Display for AnyMat<R>
where R: Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, m => m.fmt(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense2() -> AnyMat<f64> {
        DnsMat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]).into()
    }

    fn diag2() -> AnyMat<f64> {
        DiagMat::from_entries((2, 2), [5.0, 6.0]).into()
    }

    fn up2() -> AnyMat<f64> {
        let mut u = UpTriMat::zero((2, 2));
        u[(0, 0)] = 1.0; u[(0, 1)] = 2.0;
        u[(1, 1)] = 3.0;
        u.into()
    }

    fn lo2() -> AnyMat<f64> {
        let mut l = LoTriMat::zero((2, 2));
        l[(0, 0)] = 1.0;
        l[(1, 0)] = 2.0; l[(1, 1)] = 3.0;
        l.into()
    }

    #[test]
    fn same_variant_stays_structured() {
        assert!(matches!(&diag2() + &diag2(), AnyMat::Diag(_)));
        assert!(matches!(&up2() + &up2(), AnyMat::Up(_)));
        assert!(matches!(&lo2() - &lo2(), AnyMat::Lo(_)));
        assert!(matches!(&diag2() * &diag2(), AnyMat::Diag(_)));
        assert!(matches!(&up2() * &up2(), AnyMat::Up(_)));
    }

    #[test]
    fn mixed_pairs_promote() {
        assert!(matches!(&diag2() + &dense2(), AnyMat::Dense(_)));
        assert!(matches!(&up2() + &lo2(), AnyMat::Dense(_)));
        assert!(matches!(&diag2() * &up2(), AnyMat::Dense(_)));
    }

    #[test]
    fn promoted_values() {
        let sum = &diag2() + &dense2();
        let expect = DnsMat::from_data((2, 2), [6.0, 2.0, 3.0, 10.0]);
        assert_eq!(sum, expect.into());
    }

    #[test]
    fn checked_mismatch() {
        let a: AnyMat<f64> = DnsMat::zero((2, 3)).into();
        let b = dense2();
        assert!(matches!(a.checked_add(&b), Err(MatError::DimensionMismatch { .. })));
        assert!(matches!(b.checked_mul(&a).unwrap(), AnyMat::Dense(_)));
        assert!(matches!(a.checked_mul(&b), Err(MatError::DimensionMismatch { .. })));
    }

    #[test]
    fn logical_eq() {
        let u = up2();
        let d: AnyMat<f64> = DnsMat::from_data((2, 2), [1.0, 2.0, 0.0, 3.0]).into();
        assert_eq!(u, d);
        assert_ne!(u, dense2());
    }

    #[test]
    fn transpose_flips_triangular() {
        assert!(matches!(up2().transpose(), AnyMat::Lo(_)));
        assert!(matches!(lo2().transpose(), AnyMat::Up(_)));
        assert_eq!(up2().transpose().transpose(), up2());
    }

    #[test]
    fn neg_stays_in_variant() {
        assert!(matches!(-&diag2(), AnyMat::Diag(_)));
        assert!(matches!(-&up2(), AnyMat::Up(_)));
    }

    #[test]
    fn scale_in_place() {
        let mut d = diag2();
        d *= 2.0;
        assert_eq!(d, DiagMat::from_entries((2, 2), [10.0, 12.0]).into());
    }

    #[test]
    fn structural_set_propagates() {
        let mut d = diag2();
        assert!(matches!(
            d.set(0, 1, 1.0),
            Err(MatError::StructuralViolation { .. })
        ));
    }

    #[test]
    fn mul_mismatch_every_pair() {
        let lhs: Vec<AnyMat<f64>> = vec![
            DnsMat::zero((2, 3)).into(),
            DiagMat::zero((2, 3)).into(),
            TriDiagMat::zero(2).into(),
            UpTriMat::zero((2, 3)).into(),
            LoTriMat::zero((2, 3)).into(),
        ];
        let rhs: Vec<AnyMat<f64>> = vec![
            DnsMat::zero((4, 4)).into(),
            DiagMat::zero((4, 4)).into(),
            TriDiagMat::zero(4).into(),
            UpTriMat::zero((4, 4)).into(),
            LoTriMat::zero((4, 4)).into(),
        ];

        for a in &lhs {
            for b in &rhs {
                assert!(
                    matches!(a.checked_mul(b), Err(MatError::DimensionMismatch { .. })),
                    "{} x {} should not type-check dimensions", a.kind(), b.kind()
                );
            }
        }
    }

    #[test]
    fn add_sub_roundtrip_all_variants() {
        let tridiag: AnyMat<f64> = TriDiagMat::from_bands(
            vec![1.0], vec![2.0, 3.0], vec![4.0]
        ).into();

        let pairs = [
            (dense2(), dense2()),
            (diag2(), diag2()),
            (up2(), up2()),
            (lo2(), lo2()),
            (tridiag.clone(), tridiag),
        ];

        for (a, b) in pairs {
            assert_eq!(&(&a + &b) - &b, a);
        }
    }
}
