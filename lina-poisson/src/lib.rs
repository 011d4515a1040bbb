mod dirichlet;

pub use dirichlet::*;
