use derive_more::{Display, Error};

pub type Result<T> = std::result::Result<T, MatError>;

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum MatError {
    #[display("dimension mismatch: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        lhs: (usize, usize),
        rhs: (usize, usize)
    },

    #[display("write at ({row}, {col}) outside the stored region of a {kind} matrix")]
    StructuralViolation {
        row: usize,
        col: usize,
        kind: &'static str
    },

    #[display("index ({row}, {col}) out of range for shape {shape:?}")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        shape: (usize, usize)
    },

    #[display("zero pivot at row {pivot}, matrix is singular")]
    SingularMatrix {
        pivot: usize
    },

    #[display("column {col} is linearly dependent, cannot orthogonalize")]
    RankDeficient {
        col: usize
    },

    #[display("operation `{op}` is not supported for a {kind} matrix")]
    UnsupportedOperation {
        op: &'static str,
        kind: &'static str
    },

    #[display("parse failure: {reason}")]
    ParseFailure {
        reason: String
    },
}
