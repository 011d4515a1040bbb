use std::fmt::Write;
use lina::util::measure;
use lina_matrix::dense::gauss::GaussSolver;
use lina_matrix::dense::qr::QrSolver;
use lina_matrix::{LinSolver, MatTrait};
use crate::app::err::*;
use super::{read_matrix_block, read_vector, Method};

#[derive(Clone, Debug, clap::Args)]
pub struct Args {
    // file holding `n`, n matrix rows, then n right-hand-side values
    pub input: String,

    #[arg(short, long, value_enum, default_value = "gauss")]
    pub method: Method,

    #[arg(short, long)]
    pub pivot: bool,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

pub fn dispatch(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.input)
        .map_err(|e| Error { msg: format!("cannot read '{}': {e}", args.input) })?;

    let mut lines = text.lines();
    let Some(a) = read_matrix_block(&mut lines)? else {
        return err!("no system found in '{}'", args.input);
    };
    let b = read_vector(&mut lines, a.nrows())?;

    let (res, time) = measure(|| match args.method {
        Method::Gauss => GaussSolver::new(args.pivot).solve(&a, &b),
        Method::Qr    => QrSolver::new().solve(&a, &b),
    });
    let x = res?;

    let mut buff = String::new();
    writeln!(buff, "solved {}x{} system in {time:.2?}", a.nrows(), a.ncols())?;
    writeln!(buff, "x = {x}")?;

    Ok(buff)
}
