use std::fmt::Write;
use lina::util::measure;
use lina_matrix::dense::qr::eigen_iterate;
use crate::app::err::*;
use super::{format_entries, read_matrix_block};

#[derive(Clone, Debug, clap::Args)]
pub struct Args {
    // file holding repeated blocks of `n` followed by n matrix rows
    pub input: String,

    #[arg(short, long, value_delimiter = ',', default_values_t = vec![5, 10, 35])]
    pub iterations: Vec<usize>,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

pub fn dispatch(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.input)
        .map_err(|e| Error { msg: format!("cannot read '{}': {e}", args.input) })?;

    let mut lines = text.lines();
    let mut buff = String::new();
    let mut count = 0;

    while let Some(input) = read_matrix_block(&mut lines)? {
        count += 1;

        for &iters in &args.iterations {
            let (res, time) = measure(|| eigen_iterate(input.clone(), iters));
            let a = res?;

            writeln!(buff, "=== matrix {count}, {iters} iterations ({time:.2?}) ===")?;
            write!(buff, "{a}")?;
            writeln!(buff, "eigenvalues: {}", format_entries(&a.diag()))?;
            writeln!(buff)?;
        }
    }

    ensure!(count > 0, "no matrices found in '{}'", args.input);

    Ok(buff)
}
