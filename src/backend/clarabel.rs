use clarabel::algebra::CscMatrix;
use clarabel::solver::{DefaultSolver, IPSolver, SolverStatus, SupportedConeT};
use clarabel::solver::{ZeroConeT, NonnegativeConeT, SecondOrderConeT};
use crate::{ProbQP, CscMat, ConeProgram, QpError, Solution, Notice, SolveOptions, SolveReport};
use super::{QpBackend, Capability, ClarabelParam, ReductionParam, set_clarabel_option, set_reduction_option};

//

/// Data of `clarabel`: \\(\min {1 \over 2} x^T P x + q^T x\\) s.t. \\(A x + s = b,\ s \in \mathcal{K}\\).
struct ClarabelData
{
    sym_p: CscMatrix<f64>,
    vec_q: Vec<f64>,
    mat_a: CscMatrix<f64>,
    vec_b: Vec<f64>,
    cones: Vec<SupportedConeT<f64>>,
}

impl ClarabelData
{
    /// Zero cone rows of `mat_eq`, then nonnegative rows of `mat_lin`, then `soc` blocks of `mat_lin`.
    #[allow(clippy::too_many_arguments)]
    fn new(
        sym_p: &CscMat<f64>, vec_q: &[f64],
        mat_eq: &CscMat<f64>, vec_eq: &[f64],
        mat_lin: &CscMat<f64>, vec_lin: &[f64],
        linear: usize, soc: &[usize]) -> Result<Self, QpError>
    {
        let mut vec_b = vec_eq.to_vec();
        vec_b.extend_from_slice(vec_lin);

        let mut cones = Vec::new();
        if !vec_eq.is_empty() {
            cones.push(ZeroConeT(vec_eq.len()));
        }
        if linear > 0 {
            cones.push(NonnegativeConeT(linear));
        }
        cones.extend(soc.iter().filter(|&&k| k > 0).map(|&k| SecondOrderConeT(k)));

        Ok(ClarabelData {
            sym_p: sym_p.triu().into_clarabel(),
            vec_q: vec_q.to_vec(),
            mat_a: mat_eq.vstack(mat_lin)?.into_clarabel(),
            vec_b,
            cones,
        })
    }

    fn from_socp(cp: &ConeProgram<f64>) -> Result<Self, QpError>
    {
        let n1 = cp.n() + 1;
        let dims = cp.dims();

        Self::new(
            &CscMat::zeros((n1, n1)), cp.vec_c(),
            cp.mat_a(), cp.vec_b(),
            cp.mat_g(), cp.vec_h(),
            dims.linear, &dims.soc
        )
    }
}

//

/// Backends `clarabel` and `clarabel_qp`: interior-point solver of [`clarabel`].
///
/// `clarabel` solves the epigraph reduction as a second-order cone program.
/// `clarabel_qp` passes \\(P\\) as it is and serves as the reference of the reduction.
#[derive(Debug, Clone)]
pub struct ClarabelBackend
{
    direct: bool,
    /// Solver parameters.
    pub par: ClarabelParam,
    /// Reduction parameters, unused by `clarabel_qp`.
    pub red: ReductionParam,
}

impl ClarabelBackend
{
    fn with(direct: bool) -> Self
    {
        let mut par = ClarabelParam::default();
        par.verbose = false;
        if !direct {
            // the epigraph variable carries the objective, so its gap needs tighter tolerances
            par.tol_gap_abs = 1e-10;
            par.tol_gap_rel = 1e-10;
            par.tol_feas = 1e-10;
        }

        ClarabelBackend {
            direct,
            par,
            red: ReductionParam::default(),
        }
    }

    /// Creates `clarabel`, the cone program backend.
    pub fn conic() -> Self
    {
        Self::with(false)
    }

    /// Creates `clarabel_qp`, the direct QP backend.
    pub fn direct() -> Self
    {
        Self::with(true)
    }

    /// Changes solver parameters.
    ///
    /// Returns [`ClarabelBackend`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut ClarabelParam)
    {
        f(&mut self.par);
        self
    }

    /// Solves and interprets the status.
    ///
    /// The optimal vector is that of the `clarabel` variables as it is.
    fn run(&self, data: ClarabelData, verbose: bool, report: &mut SolveReport<f64>) -> Solution<f64>
    {
        let mut settings = self.par.clone();
        settings.verbose |= verbose;

        let solver = DefaultSolver::new(
            &data.sym_p, &data.vec_q,
            &data.mat_a, &data.vec_b,
            &data.cones, settings
        );
        let mut solver = match solver {
            Ok(solver) => solver,
            Err(e) => {
                log::warn!("{}: setup failed: {:?}", self.name(), e);
                return Solution::Failed(format!("{:?}", e));
            },
        };
        solver.solve();

        let status = solver.solution.status;
        log::debug!("{}: {:?} in {} iterations", self.name(), status, solver.solution.iterations);

        if matches!(status,
            SolverStatus::AlmostSolved |
            SolverStatus::AlmostPrimalInfeasible |
            SolverStatus::AlmostDualInfeasible
        ) {
            report.notice(Notice::InaccurateSolution {
                backend: self.name(),
                status: format!("{:?}", status),
            });
        }

        match status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => Solution::Optimal(solver.solution.x),
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => Solution::Infeasible,
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => Solution::Unbounded,
            _ => {
                log::warn!("{}: {:?}", self.name(), status);
                Solution::Failed(format!("{:?}", status))
            },
        }
    }
}

impl QpBackend for ClarabelBackend
{
    fn name(&self) -> &'static str
    {
        if self.direct {"clarabel_qp"} else {"clarabel"}
    }

    fn capability(&self) -> Capability
    {
        if self.direct {Capability::Qp} else {Capability::ConeProgram}
    }

    fn set_option(&mut self, key: &str, value: &str) -> Result<(), QpError>
    {
        let name = self.name();
        if !self.direct && set_reduction_option(&mut self.red, name, key, value)? {
            return Ok(());
        }
        set_clarabel_option(&mut self.par, name, key, value)
    }

    fn solve(&self, qp: &ProbQP<f64>, opts: &SolveOptions) -> Result<SolveReport<f64>, QpError>
    {
        let mut report = super::start_report(self.name(), opts);

        if self.direct {
            qp.check()?;
            let b = qp.box_folded()?;
            if b.dropped > 0 {
                report.notice(Notice::InfiniteBoundsDropped {count: b.dropped});
            }

            let n = qp.n();
            let (mat_eq, vec_eq) = match (qp.mat_a(), qp.vec_b()) {
                (Some(a), Some(v)) => (a.clone(), v.to_vec()),
                _ => (CscMat::zeros((0, n)), Vec::new()),
            };

            let data = ClarabelData::new(
                &qp.sym_p().sym_part(), qp.vec_q(),
                &mat_eq, &vec_eq,
                &b.mat_g, &b.vec_h,
                b.vec_h.len(), &[]
            )?;
            let sol = self.run(data, opts.verbose, &mut report);
            report.solution = sol;
        }
        else {
            let cp = super::reduce(qp, &self.red, &mut report)?;

            let data = ClarabelData::from_socp(&cp)?;
            let sol = self.run(data, opts.verbose, &mut report);
            report.solution = match sol {
                Solution::Optimal(x) => Solution::Optimal(cp.extract(&x)?),
                sol => sol,
            };
        }

        Ok(report)
    }
}

//

#[test]
fn test_clarabel_data()
{
    let cp = crate::socp_from_qp(
        &CscMat::<f64>::identity(2), &[1., 0.],
        Some(&CscMat::from_triplets(1, 2, [(0, 1, 1.)])), Some(&[2.][..]),
        1e-9
    ).unwrap().with_eq(&CscMat::from_triplets(1, 2, [(0, 0, 1.)]), &[0.5]).unwrap();

    let d = ClarabelData::from_socp(&cp).unwrap();

    assert_eq!((d.sym_p.m, d.sym_p.n, d.sym_p.nnz()), (3, 3, 0));
    // zero cone row, one linear row, then a cone of rank 2 + 2
    assert_eq!((d.mat_a.m, d.mat_a.n), (6, 3));
    assert_eq!(d.vec_b, vec![0.5, 2., 0.5, -0.5, 0., 0.]);
    assert_eq!(d.cones.len(), 3);
    assert!(matches!(d.cones[0], ZeroConeT(1)));
    assert!(matches!(d.cones[1], NonnegativeConeT(1)));
    assert!(matches!(d.cones[2], SecondOrderConeT(4)));
}

#[test]
fn test_clarabel_tolerances()
{
    let conic = ClarabelBackend::conic();
    let direct = ClarabelBackend::direct();

    assert_eq!(conic.par.tol_gap_abs, 1e-10);
    assert_eq!(conic.par.tol_feas, 1e-10);
    assert_eq!(direct.par.tol_gap_abs, ClarabelParam::default().tol_gap_abs);
    assert!(!conic.par.verbose && !direct.par.verbose);
}

#[test]
fn test_clarabel_direct()
{
    use float_eq::assert_float_eq;

    let _ = env_logger::builder().is_test(true).try_init();

    // minimize (x0 - 1)^2 / 2 + x1^2 subject to x0 <= 0.5, x1 >= 1
    let p = CscMat::<f64>::from_triplets(2, 2, [(0, 0, 1.), (1, 1, 2.)]);
    let qp = ProbQP::new(p, vec![-1., 0.])
        .with_ub(vec![0.5, f64::INFINITY])
        .with_lb(vec![f64::NEG_INFINITY, 1.]);

    for b in [ClarabelBackend::direct(), ClarabelBackend::conic()] {
        let r = b.solve(&qp, &SolveOptions::default()).unwrap();
        assert!(r.notices.contains(&Notice::InfiniteBoundsDropped {count: 2}));
        assert_float_eq!(r.solution.x().unwrap(), [0.5, 1.].as_ref(), abs_all <= 1e-5);
    }
}
