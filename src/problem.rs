mod boxineq;
mod socp;
mod qp;

pub use boxineq::*;
pub use socp::*;
pub use qp::*;

//

use crate::{CscMat, QpError};

/// Checks a matrix/vector pair of an optional constraint block.
///
/// Returns `Some` pair if both are given, `None` if neither is given.
pub(crate) fn paired<'a, F>(
    mat: Option<&'a CscMat<F>>, vec: Option<&'a [F]>,
    (name_mat, name_vec): (&'static str, &'static str),
    n: usize) -> Result<Option<(&'a CscMat<F>, &'a [F])>, QpError>
where F: clarabel::algebra::FloatT
{
    match (mat, vec) {
        (Some(mat), Some(vec)) => {
            let (m, n_) = mat.size();
            if n_ != n || vec.len() != m {
                let e = QpError::shape(name_mat, (vec.len(), n), mat.size());
                log::error!("{}", e);
                return Err(e);
            }
            Ok(Some((mat, vec)))
        },
        (None, None) => Ok(None),
        (Some(_), None) => Err(QpError::Unpaired {present: name_mat, missing: name_vec}),
        (None, Some(_)) => Err(QpError::Unpaired {present: name_vec, missing: name_mat}),
    }
}
