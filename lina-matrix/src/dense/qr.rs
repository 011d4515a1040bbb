use log::{debug, trace};
use lina::Real;
use crate::base::{LinSolver, MatStore, MatTrait};
use crate::err::{MatError, Result};
use crate::structured::UpTriMat;
use super::{gauss, DnsMat, DnsVec};

// Modified Gram-Schmidt factorization A = Q R, plus the QR eigenvalue
// iteration built on top of it. Q and R are re-derived in full on
// every call; nothing persists between decompositions.

#[derive(Clone, Debug)]
pub struct Qr<R> {
    q: DnsMat<R>,
    r: UpTriMat<R>
}

impl<R> Qr<R>
where R: Real {
    pub fn q(&self) -> &DnsMat<R> {
        &self.q
    }

    pub fn r(&self) -> &UpTriMat<R> {
        &self.r
    }

    pub fn destruct(self) -> (DnsMat<R>, UpTriMat<R>) {
        (self.q, self.r)
    }
}

pub fn qr<R>(a: &DnsMat<R>) -> Result<Qr<R>>
where R: Real {
    let (m, n) = a.shape();
    debug!("qr decomposition: {:?}", a.shape());

    let mut q = DnsMat::zero((m, n));
    let mut r = UpTriMat::zero((n, n));

    for k in 0..n {
        let ak = a.col_vec(k);

        // project out the components along the columns already placed
        let mut offset = DnsVec::zero(m);
        for j in 0..k {
            let qj = q.col_vec(j);
            let rjk = ak.dot(&qj);
            r[(j, k)] = rjk;
            offset += &(qj * rjk);
        }

        let orthogonalized = &ak - &offset;
        let rkk = orthogonalized.magnitude();
        if rkk.is_zero() {
            return Err(MatError::RankDeficient { col: k })
        }

        r[(k, k)] = rkk;
        q.set_col(k, &(&orthogonalized * rkk.recip()));
    }

    Ok(Qr { q, r })
}

// Repeated decomposition and recombination: Q R on even iterations,
// R Q on odd ones. Runs the full budget; the caller reads the
// diagonal of the result as the eigenvalue approximation.
pub fn eigen_iterate<R>(mut a: DnsMat<R>, iterations: usize) -> Result<DnsMat<R>>
where R: Real {
    assert!(a.is_square());
    debug!("qr eigenvalue iteration: {:?}, budget: {iterations}", a.shape());

    for iter in 0..iterations {
        let Qr { q, r } = qr(&a)?;
        let r = r.to_dense();
        a = if iter % 2 == 0 { &q * &r } else { &r * &q };
        trace!("iteration {iter}:\n{a}");
    }

    Ok(a)
}

pub fn eigenvalues<R>(a: DnsMat<R>, iterations: usize) -> Result<Vec<R>>
where R: Real {
    let a = eigen_iterate(a, iterations)?;
    Ok(a.diag())
}

// Solves A x = b through one decomposition: R x = Q^t b, with the
// triangular system handed to Gaussian back substitution.
#[derive(Clone, Copy, Debug, Default)]
pub struct QrSolver;

impl QrSolver {
    pub fn new() -> Self {
        Self
    }
}

impl<R> LinSolver<R> for QrSolver
where R: Real {
    fn solve<M>(&self, a: &M, b: &DnsVec<R>) -> Result<DnsVec<R>>
    where M: MatStore<R> {
        if !a.is_square() {
            return Err(MatError::DimensionMismatch { lhs: a.shape(), rhs: a.shape() })
        }

        debug!("qr solve: {:?}", a.shape());

        let Qr { q, r } = qr(&a.to_dense())?;
        let constants = q.transpose().mul_vec(b)?;

        let aug = gauss::augmented(&r, &constants)?;
        gauss::back_substitute(&aug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn wiki3() -> DnsMat<f64> {
        DnsMat::from_data((3, 3), [
            12.0, -51.0,   4.0,
             6.0, 167.0, -68.0,
            -4.0,  24.0, -41.0
        ])
    }

    #[test]
    fn decompose_known() {
        let a = wiki3();
        let f = qr(&a).unwrap();

        let r = f.r();
        assert!(close(r.get(0, 0), 14.0, 1e-10));
        assert!(close(r.get(1, 1), 175.0, 1e-10));
        assert!(close(r.get(2, 2), 35.0, 1e-10));
    }

    #[test]
    fn q_is_orthonormal() {
        let a = wiki3();
        let (q, _) = qr(&a).unwrap().destruct();

        let qtq = &q.transpose() * &q;
        let id = DnsMat::id(3);
        for i in 0..3 {
            for j in 0..3 {
                assert!(close(qtq[(i, j)], id[(i, j)], 1e-12));
            }
        }
    }

    #[test]
    fn recomposition_recovers_input() {
        let a = wiki3();
        let (q, r) = qr(&a).unwrap().destruct();
        let back = &q * &r.to_dense();
        for i in 0..3 {
            for j in 0..3 {
                assert!(close(back[(i, j)], a[(i, j)], 1e-10));
            }
        }
    }

    #[test]
    fn rank_deficient_input() {
        // the second column is an exact copy of the first, so the
        // residual vanishes exactly
        let a = DnsMat::from_data((2, 2), [1.0, 1.0, 0.0, 0.0]);
        assert_eq!(qr(&a).err(), Some(MatError::RankDeficient { col: 1 }));
    }

    #[test]
    fn zero_column_is_rank_deficient() {
        let a = DnsMat::from_data((2, 2), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(qr(&a).err(), Some(MatError::RankDeficient { col: 0 }));
    }

    #[test]
    fn eigenvalues_symmetric() {
        // eigenvalues 3 and 1
        let a = DnsMat::from_data((2, 2), [2.0, 1.0, 1.0, 2.0]);
        let mut ev = eigenvalues(a, 40).unwrap();
        ev.sort_by(|x, y| y.partial_cmp(x).unwrap());

        assert!(close(ev[0], 3.0, 1e-6));
        assert!(close(ev[1], 1.0, 1e-6));
    }

    #[test]
    fn iteration_budget_is_exact() {
        let a = DnsMat::from_data((2, 2), [2.0, 1.0, 1.0, 2.0]);
        // zero iterations leave the matrix untouched
        let out = eigen_iterate(a.clone(), 0).unwrap();
        assert_eq!(out, a);
    }

    #[test]
    fn solve_matches_gauss() {
        let a = wiki3();
        let b = DnsVec::from(vec![1.0, 2.0, 3.0]);

        let x = QrSolver::new().solve(&a, &b).unwrap();
        let r = &(&a * &x) - &b;
        assert!(r.magnitude() < 1e-10);
    }

    #[test]
    fn solve_rejects_rank_deficient() {
        let a = DnsMat::from_data((2, 2), [1.0, 1.0, 0.0, 0.0]);
        let b = DnsVec::from(vec![1.0, 2.0]);
        let res = QrSolver::new().solve(&a, &b);
        assert_eq!(res, Err(MatError::RankDeficient { col: 1 }));
    }

    #[test]
    fn random_systems_have_small_residual() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);

        for n in [2, 5] {
            let a = DnsMat::generate((n, n), |i, j| {
                let v: f64 = rng.gen_range(-1.0..1.0);
                if i == j { v + 4.0 } else { v }
            });
            let b: DnsVec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();

            let x = QrSolver::new().solve(&a, &b).unwrap();
            let r = &(&a * &x) - &b;
            assert!(r.magnitude() < 1e-10, "residual too large for n = {n}");
        }
    }
}
