use std::fmt::{Debug, Display};
use num_traits::{Float, FromPrimitive};

// The scalar type every matrix and vector is generic over.
// `Float` brings `Copy`, the arithmetic operators, `zero`/`one`,
// `abs` and `sqrt`; the rest is what the containers need to be
// printable and shareable.

pub trait Real:
    Float +
    FromPrimitive +
    Default +
    Debug +
    Display +
    Send +
    Sync +
    'static
{}

impl<T> Real for T where T:
    Float +
    FromPrimitive +
    Default +
    Debug +
    Display +
    Send +
    Sync +
    'static
{}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_abs<R: Real>(values: &[R]) -> R {
        values.iter().fold(R::zero(), |acc, x| acc + x.abs())
    }

    #[test]
    fn f64_is_real() {
        assert_eq!(sum_abs(&[1.0, -2.0, 3.0]), 6.0);
    }

    #[test]
    fn f32_is_real() {
        assert_eq!(sum_abs(&[1.0_f32, -0.5]), 1.5);
    }
}
