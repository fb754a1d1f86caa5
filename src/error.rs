use thiserror::Error;

/// Scene construction errors.
///
/// Tracing itself never fails; degenerate geometry just produces no hits.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Transform matrix is not invertible")]
    NonInvertibleTransform,

    #[error("Invalid material parameter `{parameter}`: {value}")]
    InvalidMaterial {
        parameter: &'static str,
        value: f64,
    },

    #[error("Camera up vector must not be parallel to the view direction")]
    DegenerateView,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
