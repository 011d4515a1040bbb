pub mod poisson;
pub mod qr;
pub mod solve;

use lina_matrix::dense::{DnsMat, DnsVec};
use lina_matrix::MatStore;
use crate::app::err::*;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
pub enum Method {
    #[default]
    Gauss,
    Qr,
}

// Reads one `n` header line followed by n matrix rows from the line
// iterator. Returns None once the input is exhausted.
pub fn read_matrix_block<'a, I>(lines: &mut I) -> Result<Option<DnsMat<f64>>, Box<dyn std::error::Error>>
where I: Iterator<Item = &'a str> {
    let Some(header) = lines.find(|l| !l.trim().is_empty()) else {
        return Ok(None)
    };

    let n: usize = match header.trim().parse() {
        Ok(n) => n,
        Err(e) => return err!("bad matrix size '{}': {e}", header.trim()),
    };

    let block = lines.take(n).collect::<Vec<_>>().join("\n");
    let mut mat = DnsMat::zero((n, n));
    mat.read_from(&block)?;

    Ok(Some(mat))
}

pub fn read_vector<'a, I>(lines: &mut I, dim: usize) -> Result<DnsVec<f64>, Box<dyn std::error::Error>>
where I: Iterator<Item = &'a str> {
    let rest = lines.collect::<Vec<_>>().join(" ");
    let v = DnsVec::parse(dim, &rest)?;
    Ok(v)
}

pub fn format_entries(values: &[f64]) -> String {
    use itertools::Itertools;
    values.iter().map(|v| format!("{v:.5}")).join("  ")
}
