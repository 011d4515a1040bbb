pub use crate::MatTrait;

mod diag;
mod tri;
mod tridiag;

pub use diag::DiagMat;
pub use tri::{LoTriMat, UpTriMat};
pub use tridiag::TriDiagMat;
