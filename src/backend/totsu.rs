use num_traits::{Float, Zero};
use clarabel::algebra::FloatT;
use totsu_core::solver::{Solver, SolverError, SliceLike, LinAlg, Operator, Cone};
use totsu_core::{FloatGeneric, ConeRPos, ConeSOC, ConeZero, splitm_mut};
use crate::{ProbQP, CscMat, ConeProgram, ConeDims, QpError, Solution, SolveOptions, SolveReport};
use super::{QpBackend, Capability, TotsuParam, ReductionParam, set_totsu_option, set_reduction_option};

//

/// [`CscMat`] as a linear [`Operator`].
pub struct CscOp<'a, L: LinAlg>
{
    mat: &'a CscMat<L::F>,
}

impl<'a, L: LinAlg> CscOp<'a, L>
where L::F: FloatT
{
    pub fn new(mat: &'a CscMat<L::F>) -> Self
    {
        CscOp {mat}
    }
}

impl<'a, L: LinAlg> Operator<L> for CscOp<'a, L>
where L::F: FloatT
{
    fn size(&self) -> (usize, usize)
    {
        self.mat.size()
    }

    fn op(&self, alpha: L::F, x: &L::Sl, beta: L::F, y: &mut L::Sl)
    {
        // y = a*mat*x + b*y
        self.mat.mul_add(alpha, x.get_ref(), beta, y.get_mut());
    }

    fn trans_op(&self, alpha: L::F, x: &L::Sl, beta: L::F, y: &mut L::Sl)
    {
        // y = a*mat^T*x + b*y
        self.mat.trans_mul_add(alpha, x.get_ref(), beta, y.get_mut());
    }

    fn absadd_cols(&self, tau: &mut L::Sl)
    {
        let a = self.mat.as_clarabel();

        for (c, t) in tau.get_mut().iter_mut().enumerate() {
            let sum = a.nzval[a.colptr[c].. a.colptr[c + 1]].iter()
                .fold(L::F::zero(), |s, v| s + v.abs());
            *t = *t + sum;
        }
    }

    fn absadd_rows(&self, sigma: &mut L::Sl)
    {
        let sigma_mut = sigma.get_mut();

        for (r, _, v) in self.mat.iter() {
            sigma_mut[r] = sigma_mut[r] + v.abs();
        }
    }
}

//

/// Product of cones in the row order of a [`ConeProgram`] followed by equality rows.
pub struct ProgramCone<L: LinAlg>
{
    dims: ConeDims,
    p: usize,
    cone_rpos: ConeRPos<L>,
    cone_soc: ConeSOC<L>,
    cone_zero: ConeZero<L>,
}

impl<L: LinAlg> ProgramCone<L>
{
    pub fn new(dims: &ConeDims, p: usize) -> Self
    {
        ProgramCone {
            dims: dims.clone(),
            p,
            cone_rpos: ConeRPos::new(),
            cone_soc: ConeSOC::new(),
            cone_zero: ConeZero::new(),
        }
    }
}

impl<L: LinAlg> Cone<L> for ProgramCone<L>
{
    fn proj(&mut self, dual_cone: bool, x: &mut L::Sl) -> Result<(), ()>
    {
        let l = self.dims.linear;

        {
            splitm_mut!(x, (x_l; l));
            self.cone_rpos.proj(dual_cone, &mut x_l)?;
        }

        let mut done = l;

        for &k in &self.dims.soc {
            splitm_mut!(x, (_x_done; done), (x_k; k));
            done += k;

            self.cone_soc.proj(dual_cone, &mut x_k)?;
        }

        splitm_mut!(x, (_x_done; done), (x_p; self.p));

        self.cone_zero.proj(dual_cone, &mut x_p)?;
        Ok(())
    }

    fn product_group<G: Fn(&mut L::Sl) + Copy>(&self, dp_tau: &mut L::Sl, group: G)
    {
        let l = self.dims.linear;

        {
            splitm_mut!(dp_tau, (t_l; l));
            self.cone_rpos.product_group(&mut t_l, group);
        }

        let mut done = l;

        for &k in &self.dims.soc {
            splitm_mut!(dp_tau, (_t_done; done), (t_k; k));
            done += k;

            self.cone_soc.product_group(&mut t_k, group);
        }

        splitm_mut!(dp_tau, (_t_done; done), (t_p; self.p));

        self.cone_zero.product_group(&mut t_p, group);
    }
}

//

/// Data of a [`ConeProgram`] laid out as \\(\min c^T x\\) s.t. \\(A x + s = b,\ s \in \mathcal{K}\\).
struct TotsuData
{
    vec_c: CscMat<f64>,
    mat_a: CscMat<f64>,
    vec_b: CscMat<f64>,
}

impl TotsuData
{
    fn new(cp: &ConeProgram<f64>) -> Result<Self, QpError>
    {
        let n1 = cp.n() + 1;
        let mut vec_b = cp.vec_h().to_vec();
        vec_b.extend_from_slice(cp.vec_b());

        Ok(TotsuData {
            vec_c: CscMat::from_colmaj(n1, 1, cp.vec_c()),
            mat_a: cp.mat_g().vstack(cp.mat_a())?,
            vec_b: CscMat::from_colmaj(vec_b.len(), 1, &vec_b),
        })
    }
}

//

/// Backend `totsu`: first-order conic solver of [`totsu_core`] on the epigraph reduction.
///
/// Accuracy is governed by [`TotsuParam::eps_acc`]; expect around `1e-3` with the defaults.
/// Progress is logged through `log` rather than printed.
/// Unlike [`TotsuParam::default`], `max_iter` is limited to [`TOTSU_MAX_ITER`],
/// so that a problem which does not converge ends in [`Solution::Failed`].
#[derive(Debug, Clone)]
pub struct TotsuBackend
{
    /// Solver parameters.
    pub par: TotsuParam,
    /// Reduction parameters.
    pub red: ReductionParam,
}

/// Default iteration limit of [`TotsuBackend`].
pub const TOTSU_MAX_ITER: usize = 100_000;

impl Default for TotsuBackend
{
    fn default() -> Self
    {
        TotsuBackend {
            par: TotsuParam {
                max_iter: Some(TOTSU_MAX_ITER),
                ..Default::default()
            },
            red: ReductionParam::default(),
        }
    }
}

impl TotsuBackend
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Changes solver parameters.
    ///
    /// Returns [`TotsuBackend`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut TotsuParam)
    {
        f(&mut self.par);
        self
    }

    /// Solves a [`ConeProgram`] and recovers the QP solution.
    pub fn solve_socp(&self, cp: &ConeProgram<f64>) -> Result<Solution<f64>, QpError>
    {
        type La = FloatGeneric<f64>;

        let data = TotsuData::new(cp)?;
        let n_eq = cp.vec_b().len();

        let op_c = CscOp::<La>::new(&data.vec_c);
        let op_a = CscOp::<La>::new(&data.mat_a);
        let op_b = CscOp::<La>::new(&data.vec_b);
        let cone = ProgramCone::<La>::new(cp.dims(), n_eq);

        let mut work = vec![0.; Solver::<La>::query_worklen(op_a.size())];

        let s = Solver::<La>::new().par(|p| *p = self.par.clone());
        let sol = match s.solve((op_c, op_a, op_b, cone, &mut work)) {
            Ok((x, _)) => Solution::Optimal(cp.extract(x)?),
            Err(SolverError::Infeasible) => Solution::Infeasible,
            Err(SolverError::Unbounded) => Solution::Unbounded,
            Err(e) => {
                log::warn!("totsu: {}", e);
                Solution::Failed(e.to_string())
            },
        };
        Ok(sol)
    }
}

impl QpBackend for TotsuBackend
{
    fn name(&self) -> &'static str
    {
        "totsu"
    }

    fn capability(&self) -> Capability
    {
        Capability::ConeProgram
    }

    fn set_option(&mut self, key: &str, value: &str) -> Result<(), QpError>
    {
        let name = self.name();
        if set_reduction_option(&mut self.red, name, key, value)? {
            return Ok(());
        }
        set_totsu_option(&mut self.par, key, value)
    }

    fn solve(&self, qp: &ProbQP<f64>, opts: &SolveOptions) -> Result<SolveReport<f64>, QpError>
    {
        let mut report = super::start_report(self.name(), opts);

        let cp = super::reduce(qp, &self.red, &mut report)?;
        log::debug!("{}: {:?}", self.name(), self.par);

        report.solution = self.solve_socp(&cp)?;
        Ok(report)
    }
}

//

#[test]
fn test_cscop_absadd()
{
    type La = FloatGeneric<f64>;

    let m = CscMat::from_triplets(2, 3, [(0, 0, -1.), (1, 0, 2.), (1, 2, -3.)]);
    let op = CscOp::<La>::new(&m);

    let mut tau = vec![1.; 3];
    op.absadd_cols(&mut tau);
    assert_eq!(tau, vec![4., 1., 4.]);

    let mut sigma = vec![0.; 2];
    op.absadd_rows(&mut sigma);
    assert_eq!(sigma, vec![1., 5.]);

    let mut y = vec![1.; 3];
    op.trans_op(1., &[1., 1.], 0., &mut y);
    assert_eq!(y, vec![1., 0., -3.]);
}

#[test]
fn test_totsu_socp()
{
    use float_eq::assert_float_eq;

    let _ = env_logger::builder().is_test(true).try_init();

    // minimize (x - 1)^2 / 2 subject to x <= 0.5
    let p = CscMat::<f64>::identity(1);
    let qp = ProbQP::new(p, vec![-1.]).with_ineq(CscMat::<f64>::identity(1), vec![0.5]);

    let b = TotsuBackend::new();
    assert_eq!(b.par.max_iter, Some(TOTSU_MAX_ITER));
    let r = b.solve(&qp, &SolveOptions::default()).unwrap();

    assert_eq!(r.backend, "totsu");
    assert_float_eq!(r.solution.x().unwrap(), [0.5].as_ref(), abs_all <= 1e-3);
}

#[test]
fn test_totsu_excess_iter()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize x subject to x <= 1: no optimum, ends by the iteration limit
    let qp = ProbQP::new(CscMat::<f64>::zeros((1, 1)), vec![1.])
        .with_ineq(CscMat::<f64>::identity(1), vec![1.]);

    let b = TotsuBackend::new().par(|p| p.max_iter = Some(100));
    let r = b.solve(&qp, &SolveOptions::default()).unwrap();
    assert!(matches!(r.solution, Solution::Failed(_) | Solution::Unbounded), "{:?}", r.solution);
}
