//! Diagnostic formatting

use core::fmt::{self, Display};
use clarabel::algebra::FloatT;
use crate::{CscMat, QpError};

/// Formats a constraint block \\(M x \preceq v\\) as a labelled dense matrix and vector.
///
/// Each row of the matrix is printed on a line, and the vector as a single row.
///
/// Returns the formatted text, or [`QpError::Shape`] if the number of rows of `mat`
/// differs from the length of `vec`.
/// * `mat` is the matrix.
/// * `name_mat` is its label.
/// * `vec` is the vector.
/// * `name_vec` is its label.
pub fn format_matrix_vector<F: FloatT>(
    mat: &CscMat<F>, name_mat: &'static str,
    vec: &[F], name_vec: &'static str) -> Result<String, QpError>
{
    let (m, n) = mat.size();
    if vec.len() != m {
        return Err(QpError::len(name_vec, m, vec.len()));
    }

    let mat_block = Block {
        name: name_mat,
        rows: (0.. m).map(|r| (0.. n).map(|c| mat.get(r, c)).collect()).collect(),
    };
    let vec_block = Block {
        name: name_vec,
        rows: vec![vec.to_vec()],
    };

    Ok(format!("{}{}", mat_block, vec_block))
}

/// Labelled rows, one line each.
struct Block<'a, F>
{
    name: &'a str,
    rows: Vec<Vec<F>>,
}

impl<'a, F: Display> Display for Block<'a, F>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        writeln!(f, "{} =", self.name)?;
        for row in self.rows.iter() {
            write!(f, "  [")?;
            for (i, v) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:8.3}", v)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

//

#[test]
fn test_format_matrix_vector()
{
    let g = CscMat::<f64>::from_colmaj(2, 2, &[1., 0., 2.1, 1.]);
    let h = [1.8, -2.];

    let s = format_matrix_vector(&g, "ineq_matrix", &h, "ineq_vector").unwrap();
    assert!(s.contains("ineq_matrix ="));
    assert!(s.contains("ineq_vector ="));
    assert!(s.contains("2.100"));
    assert!(s.contains("1.800"));
    assert_eq!(s.lines().count(), 5);
    assert_eq!(s.lines().nth(1), Some("  [   1.000,    2.100]"));
    assert_eq!(s.lines().nth(4), Some("  [   1.800,   -2.000]"));

    let e = format_matrix_vector(&g, "ineq_matrix", &h[..1], "ineq_vector").unwrap_err();
    assert!(matches!(e, QpError::Shape {name: "ineq_vector", ..}));
}
