use std::fmt::Write;
use lina::util::measure;
use lina_matrix::dense::gauss::GaussSolver;
use lina_matrix::dense::qr::QrSolver;
use lina_poisson::{Boundary, DirichletPoisson};
use crate::app::err::*;
use super::Method;

// Test problem with a known solution: u = (1 - x^2)(1 + y^2) on the
// unit square.

fn forcing(x: f64, y: f64) -> f64 {
    -2.0 * (x * x + y * y)
}

fn left_bound(y: f64) -> f64 {
    1.0 + y * y
}

fn right_bound(y: f64) -> f64 {
    y * 0.0
}

fn upper_bound(x: f64) -> f64 {
    2.0 * (1.0 - x * x)
}

fn lower_bound(x: f64) -> f64 {
    1.0 - x * x
}

fn solution(x: f64, y: f64) -> f64 {
    (1.0 - x * x) * (1.0 + y * y)
}

#[derive(Clone, Debug, clap::Args)]
pub struct Args {
    #[arg(short, long, default_value = "2")]
    pub from: usize,

    #[arg(short, long, default_value = "8")]
    pub to: usize,

    #[arg(short, long, value_enum, default_value = "gauss")]
    pub method: Method,

    #[arg(short, long)]
    pub pivot: bool,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

pub fn dispatch(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    ensure!(args.from >= 2, "need at least 2 divisions, got {}", args.from);
    ensure!(args.from <= args.to, "empty division range {}..={}", args.from, args.to);

    let boundary = Boundary {
        lower: lower_bound,
        upper: upper_bound,
        left:  left_bound,
        right: right_bound,
        force: forcing,
    };

    let mut buff = String::new();

    for divs in args.from..=args.to {
        let problem = DirichletPoisson::new(0.0, 0.0, 1.0, divs);

        let (res, time) = measure(|| match args.method {
            Method::Gauss => problem.solve(&boundary, &GaussSolver::new(args.pivot)),
            Method::Qr    => problem.solve(&boundary, &QrSolver::new()),
        });
        let approx = res?;

        let exact = problem.exact(solution);
        let err = approx.iter().zip(exact.iter())
            .fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs()));

        writeln!(
            buff,
            "divs {divs:>3}: unknowns {:>5}, max error {err:.3e}, time {time:.2?}",
            problem.dimension()
        )?;
    }

    Ok(buff)
}
