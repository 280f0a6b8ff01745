use float_eq::assert_float_eq;
use qpsocp::prelude::*;
use qpsocp::*;

//

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
        1., 2., 1.,
        2., 0., 1.,
        -1., 2., -1.,
    ]);
    let mat_a = CscMat::<f64>::from_colmaj(1, 3, &[1., 1., 1.]);

    ProbQP::new(sym_p, vec_q)
        .with_ineq(mat_g, vec![3., 2., -2.])
        .with_eq(mat_a, vec![1.])
}

//

#[test]
fn test_boxineq_rows()
{
    let qp = fixture()
        .with_lb(vec![-1., -2., -0.5])
        .with_ub(vec![1., -0.2, 1.]);

    let b = qp.box_folded().unwrap();
    println!("{}", format_matrix_vector(&b.mat_g, "ineq_matrix", &b.vec_h, "ineq_vector").unwrap());

    assert_eq!(b.mat_g.size(), (9, 3));
    assert_eq!(b.dropped, 0);
    assert_eq!(&b.vec_h[3..], &[1., 2., 0.5, 1., -0.2, 1.]);
    for i in 0.. 3 {
        assert_eq!(b.mat_g.get(3 + i, i), -1.);
        assert_eq!(b.mat_g.get(6 + i, i), 1.);
    }
}

#[test]
fn test_boxineq_solve()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let lb = vec![-1., -2., -0.5];
    let ub = vec![1., -0.2, 1.];
    let qp = fixture().with_lb(lb.clone()).with_ub(ub.clone());

    let reg = Registry::with_defaults();
    for name in ["clarabel", "clarabel_qp"] {
        let rslt = reg.solve(name, &qp, &SolveOptions::default()).unwrap();
        assert!(!rslt.notices.iter().any(|n| matches!(n, Notice::InfiniteBoundsDropped {..})));

        let x = rslt.solution.into_x().unwrap();
        assert_float_eq!(x.as_slice(), [0.41463415, -0.41463415, 1.].as_ref(), abs_all <= 1e-4);

        for i in 0.. 3 {
            assert!(x[i] >= lb[i] - 1e-8);
            assert!(x[i] <= ub[i] + 1e-8);
        }
    }
}

#[test]
fn test_boxineq_infinite()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // infinite bounds leave the problem as it is
    let qp = fixture()
        .with_lb(vec![f64::NEG_INFINITY; 3])
        .with_ub(vec![f64::INFINITY; 3]);

    let b = qp.box_folded().unwrap();
    assert_eq!(b.mat_g.size(), (3, 3));
    assert_eq!(b.dropped, 6);

    let reg = Registry::with_defaults();
    let rslt = reg.solve("clarabel", &qp, &SolveOptions::default()).unwrap();
    assert!(rslt.notices.contains(&Notice::InfiniteBoundsDropped {count: 6}));
    assert_float_eq!(rslt.solution.x().unwrap(), [0.30769231, -0.69230769, 1.38461538].as_ref(), abs_all <= 1e-4);
}

#[test]
fn test_boxineq_invalid()
{
    let qp = fixture().with_lb(vec![0., f64::INFINITY, 0.]);
    let e = qp.box_folded().unwrap_err();
    assert!(matches!(e, QpError::InvalidBound {side: "lb", index: 1, ..}));

    let qp = fixture().with_ub(vec![0., 0., f64::NAN]);
    let reg = Registry::with_defaults();
    let e = reg.solve("clarabel_qp", &qp, &SolveOptions::default()).unwrap_err();
    assert!(matches!(e, QpError::InvalidBound {side: "ub", index: 2, ..}));
}
