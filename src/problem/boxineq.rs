use clarabel::algebra::FloatT;
use crate::{CscMat, QpError};

//

/// Linear inequalities \\(G' x \preceq h'\\) folded from box bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxInequalities<F>
{
    /// \\(G'\\): original rows, then lower-bound rows, then upper-bound rows.
    pub mat_g: CscMat<F>,
    /// \\(h'\\) in the same row order as `mat_g`.
    pub vec_h: Vec<F>,
    /// Number of infinite bound entries which produced no row.
    pub dropped: usize,
}

/// Folds box bounds \\(lb \preceq x \preceq ub\\) into linear inequalities.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js"></script>
///
/// A finite \\(lb_i\\) appends the row \\(-x_i \le -lb_i\\),
/// a finite \\(ub_i\\) appends the row \\(x_i \le ub_i\\).
/// \\(lb_i = -\infty\\) and \\(ub_i = +\infty\\) leave \\(x_i\\) unconstrained on that side and append no row.
///
/// Returns the [`BoxInequalities`], or
/// [`QpError::Unpaired`] if exactly one of `mat_g` and `vec_h` is supplied,
/// [`QpError::Shape`] on dimension mismatch,
/// [`QpError::InvalidBound`] for NaN, \\(lb_i = +\infty\\) or \\(ub_i = -\infty\\).
/// * `mat_g` is \\(G \in \mathbb{R}^{m \times n}\\), if any.
/// * `vec_h` is \\(h \in \mathbb{R}^m\\), if any.
/// * `vec_lb` is \\(lb \in \mathbb{R}^n\\), if any.
/// * `vec_ub` is \\(ub \in \mathbb{R}^n\\), if any.
/// * `n` is a number of variables.
pub fn linear_from_box_inequalities<F: FloatT>(
    mat_g: Option<&CscMat<F>>, vec_h: Option<&[F]>,
    vec_lb: Option<&[F]>, vec_ub: Option<&[F]>,
    n: usize) -> Result<BoxInequalities<F>, QpError>
{
    let (mat_g, vec_h) = match super::paired(mat_g, vec_h, ("G", "h"), n)? {
        Some((g, h)) => (g.clone(), h.to_vec()),
        None => (CscMat::zeros((0, n)), Vec::new()),
    };

    if let Some(lb) = vec_lb {
        if lb.len() != n {
            return Err(QpError::len("lb", n, lb.len()));
        }
    }
    if let Some(ub) = vec_ub {
        if ub.len() != n {
            return Err(QpError::len("ub", n, ub.len()));
        }
    }

    let mut triplets = Vec::new();
    let mut rhs = Vec::new();
    let mut dropped = 0;

    for (i, &v) in vec_lb.unwrap_or(&[]).iter().enumerate() {
        if v == F::neg_infinity() {
            dropped += 1;
        }
        else if v.is_nan() || v == F::infinity() {
            return Err(QpError::InvalidBound {side: "lb", index: i, value: v.to_f64().unwrap_or(f64::NAN)});
        }
        else {
            triplets.push((rhs.len(), i, -F::one()));
            rhs.push(-v);
        }
    }

    for (i, &v) in vec_ub.unwrap_or(&[]).iter().enumerate() {
        if v == F::infinity() {
            dropped += 1;
        }
        else if v.is_nan() || v == F::neg_infinity() {
            return Err(QpError::InvalidBound {side: "ub", index: i, value: v.to_f64().unwrap_or(f64::NAN)});
        }
        else {
            triplets.push((rhs.len(), i, F::one()));
            rhs.push(v);
        }
    }

    if dropped > 0 {
        log::debug!("{} infinite bounds dropped", dropped);
    }

    let mat_bnd = CscMat::from_triplets(rhs.len(), n, triplets);

    let mut vec_h = vec_h;
    vec_h.extend(rhs);

    Ok(BoxInequalities {
        mat_g: mat_g.vstack(&mat_bnd)?,
        vec_h,
        dropped,
    })
}

//

#[test]
fn test_boxineq1()
{
    let g = CscMat::from_triplets(1, 2, [(0, 0, 1.), (0, 1, 1.)]);
    let h = [3.];
    let lb = [-1., f64::NEG_INFINITY];
    let ub = [2., 5.];

    let b = linear_from_box_inequalities(Some(&g), Some(&h[..]), Some(&lb[..]), Some(&ub[..]), 2).unwrap();

    assert_eq!(b.mat_g.size(), (4, 2));
    assert_eq!(b.vec_h, vec![3., 1., 2., 5.]);
    assert_eq!(b.dropped, 1);
    assert_eq!(b.mat_g.get(1, 0), -1.);
    assert_eq!(b.mat_g.get(2, 0), 1.);
    assert_eq!(b.mat_g.get(3, 1), 1.);
}

#[test]
fn test_boxineq_errors()
{
    let g = CscMat::<f64>::identity(2);
    let h = [1., 1.];

    let e = linear_from_box_inequalities(Some(&g), None, Some(&h[..]), None, 2).unwrap_err();
    assert_eq!(e, QpError::Unpaired {present: "G", missing: "h"});

    let e = linear_from_box_inequalities(None, Some(&h[..]), Some(&h[..]), None, 2).unwrap_err();
    assert_eq!(e, QpError::Unpaired {present: "h", missing: "G"});

    let e = linear_from_box_inequalities::<f64>(None, None, Some(&[0.][..]), None, 2).unwrap_err();
    assert!(matches!(e, QpError::Shape {name: "lb", ..}));

    let e = linear_from_box_inequalities::<f64>(None, None, None, Some(&[0., f64::NEG_INFINITY][..]), 2).unwrap_err();
    assert!(matches!(e, QpError::InvalidBound {side: "ub", index: 1, ..}));
}
