use clarabel::algebra::FloatT;
use crate::{CscMat, QpError, psd_factor};

//

/// Partition of the inequality rows of a [`ConeProgram`].
///
/// Rows are ordered as the nonnegative orthant block of `linear` rows,
/// then second-order cone blocks of sizes `soc` in this order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConeDims
{
    /// Number of rows in the nonnegative orthant.
    pub linear: usize,
    /// Size of each second-order cone block.
    pub soc: Vec<usize>,
}

impl ConeDims
{
    /// Total number of rows the partition covers.
    pub fn rows(&self) -> usize
    {
        self.linear + self.soc.iter().sum::<usize>()
    }
}

//

/// Second-order cone program derived from a QP
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js"></script>
///
/// The problem is
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & c^T \hat x \\\\
/// {\rm subject \ to} & G \hat x + s = h \\\\
/// & A \hat x = b \\\\
/// & s \in \mathbb{R}\_+^{l} \times \mathcal{Q}^{k_0} \times \cdots \times \mathcal{Q}^{k_{q-1}},
/// \end{array}
/// \\]
/// where
/// - variables \\( \hat x = (x, t) \in \mathbb{R}^{n + 1} \\)
/// - \\( l, k_0, \ldots, k_{q-1} \\) given by [`ConeDims`].
///
/// \\( \mathcal{Q} \\) is a second-order cone
/// \\( \lbrace (s_0, \bar s) \mid \\| \bar s \\|_2 \le s_0 \rbrace \\).
#[derive(Debug, Clone)]
pub struct ConeProgram<F>
{
    n: usize,
    vec_c: Vec<F>,
    mat_g: CscMat<F>,
    vec_h: Vec<F>,
    dims: ConeDims,
    mat_a: CscMat<F>,
    vec_b: Vec<F>,
}

impl<F: FloatT> ConeProgram<F>
{
    /// Number of variables of the originating QP.
    ///
    /// The cone program itself has `n() + 1` variables.
    pub fn n(&self) -> usize
    {
        self.n
    }

    pub fn vec_c(&self) -> &[F]
    {
        &self.vec_c
    }

    pub fn mat_g(&self) -> &CscMat<F>
    {
        &self.mat_g
    }

    pub fn vec_h(&self) -> &[F]
    {
        &self.vec_h
    }

    pub fn dims(&self) -> &ConeDims
    {
        &self.dims
    }

    /// Equality constraint matrix, with zero rows if no equality is given.
    pub fn mat_a(&self) -> &CscMat<F>
    {
        &self.mat_a
    }

    pub fn vec_b(&self) -> &[F]
    {
        &self.vec_b
    }

    /// Adds equality constraints \\(A x = b\\) of the originating QP.
    ///
    /// \\(A\\) gets a zero column for the epigraph variable.
    /// Returns the [`ConeProgram`] with them, or [`QpError::Shape`] on dimension mismatch.
    /// * `mat_a` is \\(A \in \mathbb{R}^{p \times n}\\).
    /// * `vec_b` is \\(b \in \mathbb{R}^p\\).
    pub fn with_eq(mut self, mat_a: &CscMat<F>, vec_b: &[F]) -> Result<Self, QpError>
    {
        if mat_a.size() != (vec_b.len(), self.n) {
            return Err(QpError::shape("A", (vec_b.len(), self.n), mat_a.size()));
        }

        self.mat_a = mat_a.pad_cols(1);
        self.vec_b = vec_b.to_vec();
        Ok(self)
    }

    /// Recovers the QP solution from a solution of this program.
    ///
    /// Returns the first `n()` coordinates,
    /// or [`QpError::Shape`] unless `x` has `n() + 1` coordinates.
    pub fn extract(&self, x: &[F]) -> Result<Vec<F>, QpError>
    {
        if x.len() != self.n + 1 {
            return Err(QpError::len("x", self.n + 1, x.len()));
        }

        Ok(x[.. self.n].to_vec())
    }
}

//

/// Reduces a QP to a second-order cone program by the epigraph of its objective.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js"></script>
///
/// With \\(P = R^T R\\), the QP
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & {1 \over 2} x^T P x + q^T x \\\\
/// {\rm subject \ to} & G x \preceq h
/// \end{array}
/// \\]
/// is equivalent to minimizing \\(q^T x + t\\) subject to \\(G x \preceq h\\) and
/// \\[
/// \left\\| \left[ \begin{array}{c} {t - 1 \over 2} \\\\ {R x \over \sqrt 2} \end{array} \right] \right\\|_2
/// \le {t + 1 \over 2}
/// \quad \Leftrightarrow \quad
/// {1 \over 2} x^T P x \le t.
/// \\]
/// \\(P = 0\\) still yields a cone block of size 2, which keeps \\(t \ge 0\\).
///
/// Returns the [`ConeProgram`] without equality constraints (see [`ConeProgram::with_eq`]), or
/// [`QpError::Shape`]/[`QpError::Unpaired`] on malformed input,
/// [`QpError::Factorization`] if \\(P\\) is not positive semidefinite.
/// * `sym_p` is \\(P\\).
/// * `vec_q` is \\(q\\).
/// * `mat_g` is \\(G\\), if any.
/// * `vec_h` is \\(h\\), if any.
/// * `eps_zero` is a relative tolerance to determine the rank of \\(P\\).
pub fn socp_from_qp<F: FloatT>(
    sym_p: &CscMat<F>, vec_q: &[F],
    mat_g: Option<&CscMat<F>>, vec_h: Option<&[F]>,
    eps_zero: F) -> Result<ConeProgram<F>, QpError>
{
    let n = vec_q.len();
    if sym_p.size() != (n, n) {
        return Err(QpError::shape("P", (n, n), sym_p.size()));
    }
    let ineq = super::paired(mat_g, vec_h, ("G", "h"), n)?;

    let mat_r = psd_factor(sym_p, eps_zero)?;
    let r = mat_r.size().0;

    let f1 = F::one();
    let f2 = f1 + f1;
    let half = f2.recip();
    let scl_r = -f2.sqrt().recip();

    let (mat_lin, mut vec_h) = match ineq {
        Some((g, h)) => (g.pad_cols(1), h.to_vec()),
        None => (CscMat::zeros((0, n + 1)), Vec::new()),
    };
    let m = vec_h.len();

    // s_0 = (t + 1) / 2, s_1 = (t - 1) / 2, s_2.. = R x / sqrt(2)
    let mat_soc = CscMat::from_triplets(r + 2, n + 1,
        [(0, n, -half), (1, n, -half)].into_iter()
        .chain(mat_r.iter().map(|(i, j, v)| (i + 2, j, scl_r * v)))
    );
    vec_h.push(half);
    vec_h.push(-half);
    vec_h.extend(core::iter::repeat(F::zero()).take(r));

    let mut vec_c = vec_q.to_vec();
    vec_c.push(f1);

    let dims = ConeDims {
        linear: m,
        soc: vec![r + 2],
    };

    log::debug!("cone program: n {}, linear {}, soc {:?}", n + 1, dims.linear, dims.soc);

    Ok(ConeProgram {
        n,
        vec_c,
        mat_g: mat_lin.vstack(&mat_soc)?,
        vec_h,
        dims,
        mat_a: CscMat::zeros((0, n + 1)),
        vec_b: Vec::new(),
    })
}

//

#[cfg(test)]
fn fixture_p() -> CscMat<f64>
{
    let m = [
        1., 2., 0.,
        -8., 3., 2.,
        0., 1., 1.,
    ];
    CscMat::from_triplets(3, 3, (0.. 3).flat_map(|i| (0.. 3).map(move |j| {
        (i, j, (0.. 3).map(|k| m[k * 3 + i] * m[k * 3 + j]).sum::<f64>())
    })))
}

#[test]
fn test_socp_dims()
{
    let p = fixture_p();
    let q = [3., 2., 3.];
    let g = CscMat::from_colmaj(2, 3, &[1., 2., 2., 0., 1., 1.]);
    let h = [3., 2.];

    let cp = socp_from_qp(&p, &q, Some(&g), Some(&h[..]), 1e-9).unwrap();

    assert_eq!(cp.n(), 3);
    assert_eq!(cp.vec_c(), &[3., 2., 3., 1.]);
    assert_eq!(cp.dims(), &ConeDims {linear: 2, soc: vec![5]});
    assert_eq!(cp.mat_g().size(), (cp.dims().rows(), 4));
    assert_eq!(cp.vec_h().len(), cp.dims().rows());
    assert_eq!(cp.mat_a().size(), (0, 4));

    // linear block keeps G with a zero column
    assert_eq!(cp.mat_g().get(1, 0), 2.);
    assert_eq!(cp.mat_g().get(1, 3), 0.);
}

#[test]
fn test_socp_epigraph_boundary()
{
    use float_eq::assert_float_eq;

    let p = fixture_p();
    let q = [0.; 3];
    let cp = socp_from_qp(&p, &q, None, None, 1e-9).unwrap();

    let x = [0.5, -1., 2.];
    let t = 0.5 * x.iter().zip(p.mul_vec(&x)).map(|(a, b)| a * b).sum::<f64>();
    let xt = [x[0], x[1], x[2], t];

    // s = h - G [x; t] lies on the cone boundary when t = x^T P x / 2
    let mut s = cp.vec_h().to_vec();
    cp.mat_g().mul_add(-1., &xt, 1., &mut s);

    assert_float_eq!(s[0], (t + 1.) / 2., abs <= 1e-12);
    assert_float_eq!(s[1], (t - 1.) / 2., abs <= 1e-12);
    let norm = s[1..].iter().map(|e| e * e).sum::<f64>().sqrt();
    assert_float_eq!(norm, s[0], rmax <= 1e-9);
}

#[test]
fn test_socp_zero_p()
{
    let p = CscMat::<f64>::zeros((2, 2));
    let cp = socp_from_qp(&p, &[1., -1.], None, None, 1e-9).unwrap();

    assert_eq!(cp.dims(), &ConeDims {linear: 0, soc: vec![2]});
    assert_eq!(cp.vec_h(), &[0.5, -0.5]);
}

#[test]
fn test_socp_eq_extract()
{
    let p = CscMat::<f64>::identity(2);
    let cp = socp_from_qp(&p, &[0., 0.], None, None, 1e-9).unwrap();

    let a = CscMat::from_colmaj(1, 2, &[1., 1.]);
    let e = cp.clone().with_eq(&a, &[1., 2.]).unwrap_err();
    assert!(matches!(e, QpError::Shape {name: "A", ..}));

    let cp = cp.with_eq(&a, &[1.]).unwrap();
    assert_eq!(cp.mat_a().size(), (1, 3));
    assert_eq!(cp.mat_a().get(0, 2), 0.);

    assert_eq!(cp.extract(&[1., 2., 3.]).unwrap(), vec![1., 2.]);
    assert!(matches!(cp.extract(&[1., 2.]), Err(QpError::Shape {name: "x", ..})));
}

#[test]
fn test_socp_errors()
{
    let p = CscMat::<f64>::identity(3);
    let e = socp_from_qp(&p, &[0., 0.], None, None, 1e-9).unwrap_err();
    assert!(matches!(e, QpError::Shape {name: "P", ..}));

    let e = socp_from_qp(&p, &[0., 0., 0.], None, Some(&[1.][..]), 1e-9).unwrap_err();
    assert_eq!(e, QpError::Unpaired {present: "h", missing: "G"});

    let p = CscMat::from_triplets(2, 2, [(0, 0, 1.), (1, 1, -2.)]);
    let e = socp_from_qp(&p, &[0., 0.], None, None, 1e-9).unwrap_err();
    assert!(matches!(e, QpError::Factorization {..}));
}
