use clarabel::algebra::FloatT;
use crate::{CscMat, QpError, BoxInequalities, ConeProgram, linear_from_box_inequalities, socp_from_qp};

//

/// Quadratic program
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js"></script>
///
/// The problem is
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & {1 \over 2} x^T P x + q^T x \\\\
/// {\rm subject \ to} & G x \preceq h \\\\
/// & A x = b \\\\
/// & lb \preceq x \preceq ub,
/// \end{array}
/// \\]
/// where
/// - variables \\( x \in \mathbb{R}^n \\)
/// - \\( P \in \mathcal{S}\_{+}^n,\ q \in \mathbb{R}^n \\)
/// - \\( G \in \mathbb{R}^{m \times n},\ h \in \mathbb{R}^m \\)
/// - \\( A \in \mathbb{R}^{p \times n},\ b \in \mathbb{R}^p \\)
/// - \\( lb, ub \in (\mathbb{R} \cup \lbrace \pm\infty \rbrace)^n \\).
///
/// Every constraint block is optional.
/// Dimensions are checked by [`ProbQP::check`] before any numerical work.
#[derive(Debug, Clone)]
pub struct ProbQP<F>
{
    sym_p: CscMat<F>,
    vec_q: Vec<F>,
    mat_g: Option<CscMat<F>>,
    vec_h: Option<Vec<F>>,
    mat_a: Option<CscMat<F>>,
    vec_b: Option<Vec<F>>,
    vec_lb: Option<Vec<F>>,
    vec_ub: Option<Vec<F>>,
}

impl<F: FloatT> ProbQP<F>
{
    /// Creates an unconstrained QP.
    ///
    /// Returns the [`ProbQP`] instance.
    /// * `sym_p` is \\(P\\), which shall be symmetric.
    /// * `vec_q` is \\(q\\).
    pub fn new<P: Into<CscMat<F>>>(sym_p: P, vec_q: Vec<F>) -> Self
    {
        ProbQP {
            sym_p: sym_p.into(),
            vec_q,
            mat_g: None,
            vec_h: None,
            mat_a: None,
            vec_b: None,
            vec_lb: None,
            vec_ub: None,
        }
    }

    /// Creates a QP from optional parts, checking its dimensions.
    ///
    /// Returns the [`ProbQP`] instance, or the first error [`ProbQP::check`] finds.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        sym_p: CscMat<F>, vec_q: Vec<F>,
        mat_g: Option<CscMat<F>>, vec_h: Option<Vec<F>>,
        mat_a: Option<CscMat<F>>, vec_b: Option<Vec<F>>,
        vec_lb: Option<Vec<F>>, vec_ub: Option<Vec<F>>) -> Result<Self, QpError>
    {
        let qp = ProbQP {sym_p, vec_q, mat_g, vec_h, mat_a, vec_b, vec_lb, vec_ub};
        qp.check()?;
        Ok(qp)
    }

    /// Adds inequality constraints \\(G x \preceq h\\).
    pub fn with_ineq<G: Into<CscMat<F>>>(mut self, mat_g: G, vec_h: Vec<F>) -> Self
    {
        self.mat_g = Some(mat_g.into());
        self.vec_h = Some(vec_h);
        self
    }

    /// Adds equality constraints \\(A x = b\\).
    pub fn with_eq<A: Into<CscMat<F>>>(mut self, mat_a: A, vec_b: Vec<F>) -> Self
    {
        self.mat_a = Some(mat_a.into());
        self.vec_b = Some(vec_b);
        self
    }

    /// Adds lower bounds \\(lb \preceq x\\). Use `-inf` for an unbounded variable.
    pub fn with_lb(mut self, vec_lb: Vec<F>) -> Self
    {
        self.vec_lb = Some(vec_lb);
        self
    }

    /// Adds upper bounds \\(x \preceq ub\\). Use `+inf` for an unbounded variable.
    pub fn with_ub(mut self, vec_ub: Vec<F>) -> Self
    {
        self.vec_ub = Some(vec_ub);
        self
    }

    /// Number of variables.
    pub fn n(&self) -> usize
    {
        self.vec_q.len()
    }

    pub fn sym_p(&self) -> &CscMat<F>
    {
        &self.sym_p
    }

    pub fn vec_q(&self) -> &[F]
    {
        &self.vec_q
    }

    pub fn mat_g(&self) -> Option<&CscMat<F>>
    {
        self.mat_g.as_ref()
    }

    pub fn vec_h(&self) -> Option<&[F]>
    {
        self.vec_h.as_deref()
    }

    pub fn mat_a(&self) -> Option<&CscMat<F>>
    {
        self.mat_a.as_ref()
    }

    pub fn vec_b(&self) -> Option<&[F]>
    {
        self.vec_b.as_deref()
    }

    pub fn vec_lb(&self) -> Option<&[F]>
    {
        self.vec_lb.as_deref()
    }

    pub fn vec_ub(&self) -> Option<&[F]>
    {
        self.vec_ub.as_deref()
    }

    /// Checks if bounds are given.
    pub fn has_bounds(&self) -> bool
    {
        self.vec_lb.is_some() || self.vec_ub.is_some()
    }

    /// Checks dimensions of all the parts.
    ///
    /// Returns `Ok`, or [`QpError::Shape`]/[`QpError::Unpaired`] for the first mismatch found,
    /// or [`QpError::NonFinite`] for an infinite or `NaN` entry of \\(P\\).
    pub fn check(&self) -> Result<(), QpError>
    {
        let n = self.n();

        if self.sym_p.size() != (n, n) {
            return Err(QpError::shape("P", (n, n), self.sym_p.size()));
        }
        if let Some((row, col)) = self.sym_p.find_non_finite() {
            return Err(QpError::NonFinite {name: "P", row, col});
        }
        super::paired(self.mat_g(), self.vec_h(), ("G", "h"), n)?;
        super::paired(self.mat_a(), self.vec_b(), ("A", "b"), n)?;

        if let Some(lb) = self.vec_lb() {
            if lb.len() != n {
                return Err(QpError::len("lb", n, lb.len()));
            }
        }
        if let Some(ub) = self.vec_ub() {
            if ub.len() != n {
                return Err(QpError::len("ub", n, ub.len()));
            }
        }

        Ok(())
    }

    /// Folds the bounds into the inequality constraints.
    ///
    /// Returns the result of [`linear_from_box_inequalities`] for this QP.
    pub fn box_folded(&self) -> Result<BoxInequalities<F>, QpError>
    {
        linear_from_box_inequalities(
            self.mat_g(), self.vec_h(),
            self.vec_lb(), self.vec_ub(),
            self.n()
        )
    }

    /// Reduces to a second-order cone program.
    ///
    /// Bounds are folded by [`ProbQP::box_folded`], then [`socp_from_qp`] is applied
    /// and equality constraints are added.
    /// Returns the [`ConeProgram`] and the number of infinite bounds dropped.
    /// * `eps_zero` is a relative tolerance to determine the rank of \\(P\\).
    pub fn to_socp(&self, eps_zero: F) -> Result<(ConeProgram<F>, usize), QpError>
    {
        self.check()?;

        let (cp, dropped) = if self.has_bounds() {
            let b = self.box_folded()?;
            let cp = socp_from_qp(&self.sym_p, &self.vec_q, Some(&b.mat_g), Some(b.vec_h.as_slice()), eps_zero)?;
            (cp, b.dropped)
        }
        else {
            let cp = socp_from_qp(&self.sym_p, &self.vec_q, self.mat_g(), self.vec_h(), eps_zero)?;
            (cp, 0)
        };

        let cp = match (self.mat_a(), self.vec_b()) {
            (Some(a), Some(b)) => cp.with_eq(a, b)?,
            _ => cp,
        };

        Ok((cp, dropped))
    }

    /// Objective value \\({1 \over 2} x^T P x + q^T x\\).
    pub fn objective(&self, x: &[F]) -> Result<F, QpError>
    {
        if x.len() != self.n() {
            return Err(QpError::len("x", self.n(), x.len()));
        }

        let two = F::one() + F::one();
        let px = self.sym_p.mul_vec(x);
        let val = x.iter().zip(px.iter().zip(&self.vec_q))
            .fold(F::zero(), |acc, (&xi, (&pxi, &qi))| acc + xi * (pxi / two + qi));
        Ok(val)
    }
}

//

#[test]
fn test_qp_check()
{
    let p = CscMat::<f64>::identity(2);

    let qp = ProbQP::new(p.clone(), vec![1., 1.])
        .with_ineq(CscMat::<f64>::identity(3), vec![0.; 3]);
    assert!(matches!(qp.check(), Err(QpError::Shape {name: "G", ..})));

    let qp = ProbQP::new(p.clone(), vec![1., 1.]).with_ub(vec![1.]);
    assert!(matches!(qp.check(), Err(QpError::Shape {name: "ub", ..})));

    let e = ProbQP::from_parts(p.clone(), vec![1., 1.], None, None, Some(p.clone()), None, None, None).unwrap_err();
    assert_eq!(e, QpError::Unpaired {present: "A", missing: "b"});

    let qp = ProbQP::new(p, vec![1., 1.]).with_lb(vec![0., f64::NEG_INFINITY]);
    assert!(qp.check().is_ok());
    assert!(qp.has_bounds());
}

#[test]
fn test_qp_to_socp()
{
    let p = CscMat::<f64>::identity(2);
    let qp = ProbQP::new(p, vec![1., 1.])
        .with_ineq(CscMat::<f64>::from_colmaj(1, 2, &[1., 1.]), vec![1.])
        .with_eq(CscMat::<f64>::from_colmaj(1, 2, &[1., -1.]), vec![0.])
        .with_lb(vec![-1., f64::NEG_INFINITY])
        .with_ub(vec![f64::INFINITY, 1.]);

    let (cp, dropped) = qp.to_socp(1e-9).unwrap();

    assert_eq!(dropped, 2);
    assert_eq!(cp.dims().linear, 3);
    assert_eq!(cp.dims().soc, vec![4]);
    assert_eq!(cp.mat_a().size(), (1, 3));
    assert_eq!(qp.objective(&[1., 2.]).unwrap(), 2.5 + 3.);
}
