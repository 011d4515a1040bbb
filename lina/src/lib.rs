mod abst;

pub use abst::*;

pub mod util;
