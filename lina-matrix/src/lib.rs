mod base;
mod err;
mod variant;

pub use base::*;
pub use err::*;
pub use variant::AnyMat;

pub mod dense;
pub mod structured;
