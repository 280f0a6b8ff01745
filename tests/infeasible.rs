use qpsocp::prelude::*;
use qpsocp::*;

//

/// Inequality and equality constraints are inconsistent.
fn fixture() -> ProbQP<f64>
{
    let m = MatBuild::<f64>::new(MatType::General(3, 3)).iter_rowmaj(&[
        1., 2., 0.,
        -8., 3., 2.,
        0., 1., 1.,
    ]);
    let sym_p = MatBuild::<f64>::new(MatType::SymPack(3))
        .by_fn(|r, c| (0.. 3).map(|k| m[(k, r)] * m[(k, c)]).sum());
    let vec_q = (0.. 3).map(|c| 3. * m[(0, c)] + 2. * m[(1, c)] + 3. * m[(2, c)]).collect();

    let mat_g = MatBuild::<f64>::new(MatType::General(3, 3)).iter_rowmaj(&[
        1., 1., 1.,
        2., 0., 1.,
        -1., 2., -1.,
    ]);
    let mat_a = CscMat::<f64>::from_colmaj(1, 3, &[1., 1., 1.]);

    ProbQP::new(sym_p, vec_q)
        .with_ineq(mat_g, vec![3., 2., -2.])
        .with_eq(mat_a, vec![42.])
}

//

#[test]
fn test_infeasible_eq()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = Registry::with_defaults();

    let qp = fixture();
    for name in ["clarabel", "clarabel_qp"] {
        let rslt = reg.solve(name, &qp, &SolveOptions::default()).unwrap();
        println!("{}: {:?}", name, rslt);

        assert_eq!(rslt.solution, Solution::Infeasible);
        assert_eq!(rslt.solution.x(), None);
    }
}

#[test]
fn test_infeasible_bounds()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // lb > ub is folded as it is and detected by the solver
    let qp = ProbQP::new(CscMat::<f64>::identity(1), vec![0.])
        .with_lb(vec![1.])
        .with_ub(vec![0.]);

    let reg = Registry::with_defaults();
    for name in ["clarabel", "clarabel_qp"] {
        let rslt = reg.solve(name, &qp, &SolveOptions::default()).unwrap();
        assert_eq!(rslt.solution, Solution::Infeasible);
    }
}

#[test]
fn test_unbounded()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize -x0 subject to x1 <= 1
    let qp = ProbQP::new(CscMat::<f64>::zeros((2, 2)), vec![-1., 0.])
        .with_ineq(CscMat::<f64>::from_colmaj(1, 2, &[0., 1.]), vec![1.]);

    let reg = Registry::with_defaults();
    for name in ["clarabel", "clarabel_qp"] {
        let rslt = reg.solve(name, &qp, &SolveOptions::default()).unwrap();
        assert_eq!(rslt.solution, Solution::Unbounded);
    }
}

#[test]
fn test_unbounded_totsu_default()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // same LP as test_unbounded; the default iteration limit ends the solve
    let qp = ProbQP::new(CscMat::<f64>::zeros((2, 2)), vec![-1., 0.])
        .with_ineq(CscMat::<f64>::from_colmaj(1, 2, &[0., 1.]), vec![1.]);

    let reg = Registry::with_defaults();
    let rslt = reg.solve("totsu", &qp, &SolveOptions::default()).unwrap();
    println!("totsu: {}", rslt.solution);

    assert!(matches!(rslt.solution, Solution::Failed(_) | Solution::Unbounded));
    assert_eq!(rslt.solution.x(), None);
}
