use thiserror::Error;

/// Errors of problem validation, reduction and backend configuration.
///
/// A solve that reaches a backend and comes back without an optimum is not an
/// error: it is reported as [`crate::Solution::Infeasible`], [`crate::Solution::Unbounded`]
/// or [`crate::Solution::Failed`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QpError
{
    /// Dimension mismatch of a problem component.
    #[error("Shape: {name} must be {expected}, found {found}")]
    Shape {
        name: &'static str,
        expected: String,
        found: String,
    },
    /// One of a matrix/vector pair is supplied without the other.
    #[error("Shape: {present} is supplied without {missing}")]
    Unpaired {
        present: &'static str,
        missing: &'static str,
    },
    /// Bound entry which cannot be folded into linear inequalities.
    #[error("InvalidBound: {side}[{index}] = {value}")]
    InvalidBound {
        side: &'static str,
        index: usize,
        value: f64,
    },
    /// Matrix entry which is infinite or `NaN`.
    #[error("NonFinite: {name}[{row}, {col}] is not finite")]
    NonFinite {
        name: &'static str,
        row: usize,
        col: usize,
    },
    /// `P` is not positive semidefinite within tolerance.
    #[error("Factorization: P is not positive semidefinite, eigenvalue {value:.3e} at index {index} is below tolerance -{tol:.3e}")]
    Factorization {
        index: usize,
        value: f64,
        tol: f64,
    },
    /// No backend registered under the name.
    #[error("UnknownBackend: {0}")]
    UnknownBackend(String),
    /// Option key not recognized by the backend.
    #[error("UnknownOption: {backend} has no option {key}")]
    UnknownOption {
        backend: &'static str,
        key: String,
    },
    /// Option value not parsable for the key.
    #[error("InvalidOption: {backend} option {key} cannot take {value}")]
    InvalidOption {
        backend: &'static str,
        key: String,
        value: String,
    },
}

impl QpError
{
    pub(crate) fn shape(name: &'static str, expected: (usize, usize), found: (usize, usize)) -> Self
    {
        QpError::Shape {
            name,
            expected: format!("{} x {}", expected.0, expected.1),
            found: format!("{} x {}", found.0, found.1),
        }
    }

    pub(crate) fn len(name: &'static str, expected: usize, found: usize) -> Self
    {
        QpError::Shape {
            name,
            expected: format!("length {}", expected),
            found: format!("length {}", found),
        }
    }
}

#[test]
fn test_error_display()
{
    let e = QpError::shape("G", (3, 4), (3, 2));
    assert_eq!(e.to_string(), "Shape: G must be 3 x 4, found 3 x 2");

    let e = QpError::Unpaired {present: "h", missing: "G"};
    assert_eq!(e.to_string(), "Shape: h is supplied without G");

    let e = QpError::NonFinite {name: "P", row: 0, col: 1};
    assert_eq!(e.to_string(), "NonFinite: P[0, 1] is not finite");
}
