use log::debug;
use lina::Real;
use lina_matrix::dense::{DnsMat, DnsVec};
use lina_matrix::{LinSolver, Result};

// Five-point finite-difference assembly for the Poisson equation with
// Dirichlet conditions on a square domain. Each interior grid point
// yields one equation: the point itself with coefficient 1, each
// interior neighbor with -1/4, boundary neighbors and the forcing
// term folded into the right-hand side.

pub struct Boundary<R> {
    pub lower: fn(R) -> R,
    pub upper: fn(R) -> R,
    pub left:  fn(R) -> R,
    pub right: fn(R) -> R,
    pub force: fn(R, R) -> R,
}

pub struct DirichletPoisson<R> {
    x_low: R,
    y_low: R,
    length: R,
    divs: usize
}

impl<R> DirichletPoisson<R>
where R: Real {
    pub fn new(x_low: R, y_low: R, length: R, divs: usize) -> Self {
        assert!(divs >= 2);
        Self { x_low, y_low, length, divs }
    }

    pub fn divs(&self) -> usize {
        self.divs
    }

    // interior points per axis squared
    pub fn dimension(&self) -> usize {
        (self.divs - 1) * (self.divs - 1)
    }

    fn point_offset(&self, x: usize, y: usize) -> usize {
        (x - 1) + (y - 1) * (self.divs - 1)
    }

    fn step(&self) -> R {
        self.length / R::from_usize(self.divs).unwrap()
    }

    pub fn generate(&self, boundary: &Boundary<R>) -> (DnsMat<R>, DnsVec<R>) {
        let n = self.divs;
        let dim = self.dimension();
        let h = self.step();
        let quarter = R::from_f64(0.25).unwrap();

        debug!("generate dirichlet poisson system: divs: {n}, dim: {dim}");

        let mut a = DnsMat::zero((dim, dim));
        let mut b = DnsVec::zero(dim);

        for x in 1..n {
            for y in 1..n {
                let p = self.point_offset(x, y);
                a[(p, p)] = R::one();

                let xr = |i: usize| self.x_low + R::from_usize(i).unwrap() * h;
                let yr = |i: usize| self.y_low + R::from_usize(i).unwrap() * h;

                // left neighbor
                if x == 1 {
                    b[p] = b[p] + quarter * (boundary.left)(yr(y));
                } else {
                    a[(p, self.point_offset(x - 1, y))] = -quarter;
                }

                // right neighbor
                if x + 1 == n {
                    b[p] = b[p] + quarter * (boundary.right)(yr(y));
                } else {
                    a[(p, self.point_offset(x + 1, y))] = -quarter;
                }

                // upper neighbor
                if y + 1 == n {
                    b[p] = b[p] + quarter * (boundary.upper)(xr(x));
                } else {
                    a[(p, self.point_offset(x, y + 1))] = -quarter;
                }

                // lower neighbor
                if y == 1 {
                    b[p] = b[p] + quarter * (boundary.lower)(xr(x));
                } else {
                    a[(p, self.point_offset(x, y - 1))] = -quarter;
                }

                // forcing term
                let f = (boundary.force)(xr(x), yr(y));
                b[p] = b[p] - h * h * f * quarter;
            }
        }

        (a, b)
    }

    pub fn solve<S>(&self, boundary: &Boundary<R>, solver: &S) -> Result<DnsVec<R>>
    where S: LinSolver<R> {
        let (a, b) = self.generate(boundary);
        solver.solve(&a, &b)
    }

    // samples a known solution on the interior grid, for comparison
    // against the approximated points
    pub fn exact(&self, solution: fn(R, R) -> R) -> DnsVec<R> {
        let n = self.divs;
        let h = self.step();
        let mut result = DnsVec::zero(self.dimension());

        for x in 1..n {
            for y in 1..n {
                let xv = self.x_low + R::from_usize(x).unwrap() * h;
                let yv = self.y_low + R::from_usize(y).unwrap() * h;
                result[self.point_offset(x, y)] = solution(xv, yv);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lina_matrix::MatTrait;
    use lina_matrix::dense::gauss::GaussSolver;
    use lina_matrix::dense::qr::QrSolver;

    // u = (1 - x^2)(1 + y^2) on the unit square, which forces
    // f = -2 (x^2 + y^2). The solution is quadratic per axis, so the
    // five-point stencil reproduces it exactly at the grid points.
    fn classic() -> Boundary<f64> {
        Boundary {
            lower: |x| 1.0 - x * x,
            upper: |x| 2.0 * (1.0 - x * x),
            left:  |y| 1.0 + y * y,
            right: |_| 0.0,
            force: |x, y| -2.0 * (x * x + y * y),
        }
    }

    fn classic_solution(x: f64, y: f64) -> f64 {
        (1.0 - x * x) * (1.0 + y * y)
    }

    fn max_abs_diff(a: &DnsVec<f64>, b: &DnsVec<f64>) -> f64 {
        a.iter().zip(b.iter()).fold(0.0, |acc: f64, (x, y)| acc.max((x - y).abs()))
    }

    #[test]
    fn system_shape() {
        let problem = DirichletPoisson::new(0.0, 0.0, 1.0, 4);
        let (a, b) = problem.generate(&classic());
        assert_eq!(a.shape(), (9, 9));
        assert_eq!(b.dim(), 9);
    }

    #[test]
    fn stencil_coefficients() {
        let problem = DirichletPoisson::new(0.0, 0.0, 1.0, 4);
        let (a, _) = problem.generate(&classic());

        // center point (2, 2) has all four neighbors interior
        let p = 4;
        assert_eq!(a[(p, p)], 1.0);
        let neighbors: f64 = (0..a.ncols())
            .filter(|&j| j != p)
            .map(|j| a[(p, j)])
            .sum();
        assert_eq!(neighbors, -1.0);

        // corner point (1, 1) has only two interior neighbors
        let c = 0;
        let row: Vec<f64> = (0..a.ncols()).map(|j| a[(c, j)]).collect();
        assert_eq!(row.iter().filter(|v| **v == -0.25).count(), 2);
    }

    #[test]
    fn gauss_reproduces_exact_solution() {
        for divs in [2, 3, 5] {
            let problem = DirichletPoisson::new(0.0, 0.0, 1.0, divs);
            let solved = problem.solve(&classic(), &GaussSolver::new(true)).unwrap();
            let exact = problem.exact(classic_solution);
            assert!(
                max_abs_diff(&solved, &exact) < 1e-9,
                "divs = {divs}"
            );
        }
    }

    #[test]
    fn qr_reproduces_exact_solution() {
        let problem = DirichletPoisson::new(0.0, 0.0, 1.0, 4);
        let solved = problem.solve(&classic(), &QrSolver::new()).unwrap();
        let exact = problem.exact(classic_solution);
        assert!(max_abs_diff(&solved, &exact) < 1e-9);
    }
}
