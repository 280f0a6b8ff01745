use float_eq::assert_float_eq;
use qpsocp::prelude::*;
use qpsocp::*;

//

#[test]
fn test_socp_reduction_dims()
{
    // P of rank 1
    let p = CscMat::<f64>::from_colmaj(3, 3, &[
        1., 1., 0.,
        1., 1., 0.,
        0., 0., 0.,
    ]);
    let g = CscMat::<f64>::from_colmaj(2, 3, &[1., 0., 0., 1., 0., 0.]);

    let cp = socp_from_qp(&p, &[1., 2., 3.], Some(&g), Some(&[1., 1.][..]), 1e-9).unwrap();

    assert_eq!(cp.dims(), &ConeDims {linear: 2, soc: vec![3]});
    assert_eq!(cp.dims().rows(), 5);
    assert_eq!(cp.mat_g().size(), (5, 4));
    assert_eq!(cp.vec_c(), &[1., 2., 3., 1.]);
    assert_eq!(cp.vec_h(), &[1., 1., 0.5, -0.5, 0.]);
}

#[test]
fn test_socp_lp()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // P = 0: minimize x0 + x1 subject to x >= 1, x0 - x1 = 0.5
    let qp = ProbQP::new(CscMat::<f64>::zeros((2, 2)), vec![1., 1.])
        .with_lb(vec![1., 1.])
        .with_eq(CscMat::<f64>::from_colmaj(1, 2, &[1., -1.]), vec![0.5]);

    let (cp, dropped) = qp.to_socp(1e-9).unwrap();
    assert_eq!(dropped, 0);
    assert_eq!(cp.dims().soc, vec![2]);

    let mut reg = Registry::with_defaults();
    reg.set_option("totsu", "max_iter", "100000").unwrap();

    let rslt = reg.solve("clarabel", &qp, &SolveOptions::default()).unwrap();
    assert_float_eq!(rslt.solution.x().unwrap(), [1.5, 1.].as_ref(), abs_all <= 1e-5);

    let rslt = reg.solve("totsu", &qp, &SolveOptions::default()).unwrap();
    assert_float_eq!(rslt.solution.x().unwrap(), [1.5, 1.].as_ref(), abs_all <= 1e-3);
}

#[test]
fn test_socp_totsu_perpendicular()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let qp = ProbQP::new(CscMat::<f64>::identity(2), vec![1., 2.])
        .with_ineq(CscMat::<f64>::from_colmaj(1, 2, &[-1. / 2., -1. / 3.]), vec![-1.]);

    let b = TotsuBackend::new().par(|p| p.max_iter = Some(100_000));
    let (cp, _) = qp.to_socp(b.red.eps_zero).unwrap();

    let sol = b.solve_socp(&cp).unwrap();
    assert_float_eq!(sol.x().unwrap(), [2., 0.].as_ref(), abs_all <= 1e-3);
}

#[test]
fn test_socp_not_psd()
{
    let qp = ProbQP::new(CscMat::<f64>::from_colmaj(2, 2, &[1., 2., 2., 1.]), vec![0., 0.]);

    assert!(matches!(qp.to_socp(1e-9), Err(QpError::Factorization {..})));

    // rejected before reaching the solver
    let reg = Registry::with_defaults();
    assert!(matches!(reg.solve("totsu", &qp, &SolveOptions::default()), Err(QpError::Factorization {..})));
}
